use std::path::PathBuf;
use thiserror::Error;

/// Error type for map loading, tileset decoding and GID resolution.
#[derive(Debug, Error)]
pub enum MapError {
    /// File I/O error
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON parse error
    #[error("Failed to parse JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Unsupported file format (non-JSON)
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    /// The map description breaks an invariant the geometry relies on
    #[error("Invalid map: {0}")]
    InvalidMap(String),
    /// A tile layer's data length does not match width * height
    #[error("Invalid size for layer '{layer}': expected {expected} tiles, found {actual}")]
    InvalidLayerSize {
        layer: String,
        expected: usize,
        actual: usize,
    },
    /// A tileset image could not be decoded
    #[error("Failed to decode tileset image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// A decoded tileset image is too small for the size its tileset declares
    #[error(
        "Tileset image {} is {}x{}, smaller than the declared {}x{}",
        .path.display(), .actual.0, .actual.1, .expected.0, .expected.1
    )]
    ImageSize {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    /// Number of supplied tileset images differs from the number of tilesets
    #[error("Expected {expected} tileset images, got {actual}")]
    TilesetCount { expected: usize, actual: usize },
    /// GID is 0 or past the last tile of the last tileset
    #[error("GID {gid} is outside the tile range 1..={tile_count}")]
    GidOutOfRange { gid: u32, tile_count: u32 },
}
