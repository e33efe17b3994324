use crate::error::MapError;
use crate::gid::Gid;
use crate::loader::json_loader::{decode_map_file, decode_map_str};
use macroquad::math::{ivec2, IVec2};
use std::path::{Path, PathBuf};

/// Pixel offset applied to every tile drawn from a tileset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileOffset {
    pub x: i32,
    pub y: i32,
}

impl From<TileOffset> for IVec2 {
    fn from(o: TileOffset) -> Self {
        ivec2(o.x, o.y)
    }
}

/// Image a tileset slices its tiles from, with the size the map file declares for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetImage {
    /// Image path, already resolved against the file that referenced it.
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// A grid of equally sized tiles cut from one image, contributing a contiguous GID range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
    pub name: String,
    pub image: TilesetImage,
    /// Tile size in pixels; may differ from the map's tile size.
    pub tile_w: u32,
    pub tile_h: u32,
    /// Applied to every tile placed from this tileset.
    pub offset: TileOffset,
}

impl Tileset {
    pub fn columns(&self) -> u32 {
        self.image.width.checked_div(self.tile_w).unwrap_or(0)
    }

    pub fn rows(&self) -> u32 {
        self.image.height.checked_div(self.tile_h).unwrap_or(0)
    }

    /// Number of whole tiles in the image.
    pub fn tile_count(&self) -> u32 {
        self.columns() * self.rows()
    }
}

/// Payload of a [`Layer`].
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    /// Row-major grid of raw GIDs.
    Tiles {
        width: usize,
        height: usize,
        data: Vec<u32>, // raw GIDs, flip flags included
    },
    /// Object, image and group layers; kept only so layer order is preserved.
    Other,
}

/// Map layer in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub visible: bool,
    pub kind: LayerKind,
}

impl Layer {
    /// Non-empty cells of a tile layer as `(col, row, gid)`, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (i32, i32, Gid)> + '_ {
        let (width, data): (usize, &[u32]) = match &self.kind {
            LayerKind::Tiles { width, data, .. } => ((*width).max(1), data),
            LayerKind::Other => (1, &[]),
        };
        data.iter().enumerate().filter_map(move |(idx, &raw)| {
            let gid = Gid(raw);
            if gid.is_empty() {
                return None;
            }
            Some(((idx % width) as i32, (idx / width) as i32, gid))
        })
    }
}

/// Isometric map description: grid size, tile size, tilesets in GID order, layers.
#[derive(Debug, Clone)]
pub struct Map {
    /// Map size in tiles.
    pub width: u32,
    pub height: u32,
    /// Grid cell size in pixels.
    pub tile_w: u32,
    pub tile_h: u32,
    tilesets: Vec<Tileset>,
    layers: Vec<Layer>,
    // cumulative tile count after each tileset; tileset i owns GIDs (ends[i-1], ends[i]]
    tile_ends: Vec<u32>,
}

impl Map {
    /// Build a map, checking that every size the geometry divides by is non-zero.
    pub fn new(
        width: u32,
        height: u32,
        tile_w: u32,
        tile_h: u32,
        tilesets: Vec<Tileset>,
        layers: Vec<Layer>,
    ) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::InvalidMap(format!(
                "map size must be positive, got {width}x{height} tiles"
            )));
        }
        if tile_w == 0 || tile_h == 0 {
            return Err(MapError::InvalidMap(format!(
                "tile size must be positive, got {tile_w}x{tile_h} px"
            )));
        }

        let mut tile_ends = Vec::with_capacity(tilesets.len());
        let mut total = 0u32;
        for ts in &tilesets {
            if ts.tile_w == 0 || ts.tile_h == 0 {
                return Err(MapError::InvalidMap(format!(
                    "tileset '{}' has a zero tile size",
                    ts.name
                )));
            }
            if ts.image.width % ts.tile_w != 0 || ts.image.height % ts.tile_h != 0 {
                log::warn!(
                    "tileset '{}': image {}x{} is not a multiple of tile size {}x{}, partial tiles ignored",
                    ts.name,
                    ts.image.width,
                    ts.image.height,
                    ts.tile_w,
                    ts.tile_h
                );
            }
            total = total.saturating_add(ts.tile_count());
            tile_ends.push(total);
        }

        Ok(Self {
            width,
            height,
            tile_w,
            tile_h,
            tilesets,
            layers,
            tile_ends,
        })
    }

    /// Load a Tiled JSON map; tileset image paths are resolved next to the file naming them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        decode_map_file(path.as_ref())
    }

    /// Parse Tiled JSON text; relative tileset image paths resolve against `map_dir`.
    pub fn from_json_str(txt: &str, map_dir: impl AsRef<Path>) -> Result<Self, MapError> {
        decode_map_str(txt, map_dir.as_ref())
    }

    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Total number of tiles across all tilesets, i.e. the highest valid GID.
    pub fn tile_count(&self) -> u32 {
        self.tile_ends.last().copied().unwrap_or(0)
    }

    /// Tallest tile of any tileset, 0 without tilesets.
    pub fn max_tile_height(&self) -> u32 {
        self.tilesets.iter().map(|ts| ts.tile_h).max().unwrap_or(0)
    }

    /// Tileset owning `gid` (flip flags ignored) with its index.
    pub fn tileset_for_gid(&self, gid: Gid) -> Result<(usize, &Tileset), MapError> {
        let id = gid.global_tile_id();
        let out_of_range = || MapError::GidOutOfRange {
            gid: id,
            tile_count: self.tile_count(),
        };
        if id == 0 {
            return Err(out_of_range());
        }
        let idx = self.tile_ends.partition_point(|&end| end < id);
        self.tilesets
            .get(idx)
            .map(|ts| (idx, ts))
            .ok_or_else(out_of_range)
    }

    pub fn tile_offset(&self, gid: Gid) -> Result<TileOffset, MapError> {
        self.tileset_for_gid(gid).map(|(_, ts)| ts.offset)
    }
}
