#![warn(missing_docs)]

//! Isometric tile placement and tileset sprite slicing for Tiled maps.
//!
//! [`Map`] turns grid cells into diamond-projected pixel rectangles and resolves
//! which tileset a GID belongs to; [`TilesetImages`] decodes the tileset artwork and
//! hands out a [`TileCatalog`] of borrowed per-tile sprites indexed by GID.

mod catalog;
mod error;
mod geom;
mod gid;
mod iso;
mod loader {
    pub mod json_loader;
}
mod map;

pub use catalog::{TileCatalog, TileSprite, TilesetImages};
pub use error::MapError;
pub use geom::PixelRect;
pub use gid::{Gid, FLIP_D, FLIP_H, FLIP_MASK, FLIP_V};
pub use loader::json_loader::{decode_map_file, decode_map_str};
pub use map::{Layer, LayerKind, Map, TileOffset, Tileset, TilesetImage};
