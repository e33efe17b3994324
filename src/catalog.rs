//! Tileset image decoding and the flattened per-GID sprite catalog.

use crate::error::MapError;
use crate::gid::Gid;
use crate::map::{Map, Tileset};
use image::{DynamicImage, GenericImageView, SubImage};
use std::path::PathBuf;

/// Borrowed view of one tile inside a decoded tileset image.
pub type TileSprite<'a> = SubImage<&'a DynamicImage>;

struct LoadedTileset {
    source: PathBuf,
    image: DynamicImage,
    tile_w: u32,
    tile_h: u32,
    columns: u32,
    rows: u32,
}

/// Decoded images of every tileset of a map, in tileset order.
pub struct TilesetImages {
    tilesets: Vec<LoadedTileset>,
}

impl TilesetImages {
    /// Decode every tileset image from disk.
    pub fn load(map: &Map) -> Result<Self, MapError> {
        let images = map
            .tilesets()
            .iter()
            .map(|ts| {
                log::debug!("decoding tileset '{}' from {}", ts.name, ts.image.source.display());
                image::open(&ts.image.source).map_err(|source| MapError::Decode {
                    path: ts.image.source.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_images(map, images)
    }

    /// Pair already-decoded images with the map's tilesets, one image per tileset.
    pub fn from_images(map: &Map, images: Vec<DynamicImage>) -> Result<Self, MapError> {
        if images.len() != map.tilesets().len() {
            return Err(MapError::TilesetCount {
                expected: map.tilesets().len(),
                actual: images.len(),
            });
        }

        let tilesets = map
            .tilesets()
            .iter()
            .zip(images)
            .map(|(ts, image)| loaded(ts, image))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tilesets })
    }

    /// Slice every image into tiles, row by row, tilesets concatenated in order.
    /// Slot 0 stays empty so the catalog is indexed directly by GID.
    pub fn catalog(&self) -> TileCatalog<'_> {
        let total: u32 = self.tilesets.iter().map(|t| t.columns * t.rows).sum();
        let mut tiles = Vec::with_capacity(total as usize + 1);
        tiles.push(None);

        for ts in &self.tilesets {
            for row in 0..ts.rows {
                for col in 0..ts.columns {
                    tiles.push(Some(ts.image.view(
                        col * ts.tile_w,
                        row * ts.tile_h,
                        ts.tile_w,
                        ts.tile_h,
                    )));
                }
            }
        }

        log::info!(
            "built tile catalog: {} tiles from {} tilesets",
            tiles.len() - 1,
            self.tilesets.len()
        );
        TileCatalog { tiles }
    }
}

fn loaded(ts: &Tileset, image: DynamicImage) -> Result<LoadedTileset, MapError> {
    let (w, h) = image.dimensions();
    if w < ts.image.width || h < ts.image.height {
        return Err(MapError::ImageSize {
            path: ts.image.source.clone(),
            expected: (ts.image.width, ts.image.height),
            actual: (w, h),
        });
    }
    if (w, h) != (ts.image.width, ts.image.height) {
        log::warn!(
            "tileset '{}': image {} is {w}x{h}, only the declared {}x{} is used",
            ts.name,
            ts.image.source.display(),
            ts.image.width,
            ts.image.height
        );
    }
    Ok(LoadedTileset {
        source: ts.image.source.clone(),
        image,
        tile_w: ts.tile_w,
        tile_h: ts.tile_h,
        columns: ts.columns(),
        rows: ts.rows(),
    })
}

/// Every tile sprite of a map indexed by GID; index 0 is the empty tile.
pub struct TileCatalog<'a> {
    tiles: Vec<Option<TileSprite<'a>>>,
}

impl<'a> TileCatalog<'a> {
    /// Sprite for `gid` with flip flags ignored; `None` for GID 0 or unknown GIDs.
    pub fn get(&self, gid: Gid) -> Option<&TileSprite<'a>> {
        self.tiles
            .get(gid.global_tile_id() as usize)
            .and_then(Option::as_ref)
    }

    /// Number of slots, including the reserved slot 0.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.len() <= 1
    }

    pub fn as_slice(&self) -> &[Option<TileSprite<'a>>] {
        &self.tiles
    }

    /// `(gid, sprite)` for every tile, in GID order.
    pub fn iter(&self) -> impl Iterator<Item = (Gid, &TileSprite<'a>)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|s| (Gid(i as u32), s)))
    }
}

impl Map {
    /// Decode this map's tileset images; see [`TilesetImages::load`].
    pub fn decode_tilesets(&self) -> Result<TilesetImages, MapError> {
        TilesetImages::load(self)
    }
}

impl std::fmt::Debug for TilesetImages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tilesets.iter().map(|t| &t.source))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tests::tileset;
    use image::{Rgba, RgbaImage};

    fn gradient(w: u32, h: u32, blue: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
            Rgba([x as u8, y as u8, blue, 255])
        }))
    }

    fn scenario_map() -> Map {
        Map::new(
            2,
            2,
            64,
            32,
            vec![tileset("ground", (128, 64), (64, 32), (0, 0))],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn catalog_reserves_slot_zero() {
        let map = scenario_map();
        let images = TilesetImages::from_images(&map, vec![gradient(128, 64, 0)]).unwrap();
        let catalog = images.catalog();
        assert_eq!(catalog.len(), 5);
        assert!(!catalog.is_empty());
        assert!(catalog.as_slice()[0].is_none());
        assert!(catalog.get(Gid::EMPTY).is_none());
        assert!(catalog.get(Gid(5)).is_none());
    }

    #[test]
    fn tiles_are_sliced_row_major() {
        let map = scenario_map();
        let images = TilesetImages::from_images(&map, vec![gradient(128, 64, 0)]).unwrap();
        let catalog = images.catalog();

        let corners: Vec<_> = catalog
            .iter()
            .map(|(_, s)| {
                let Rgba([x, y, _, _]) = s.get_pixel(0, 0);
                (x, y)
            })
            .collect();
        assert_eq!(corners, vec![(0, 0), (64, 0), (0, 32), (64, 32)]);

        let sprite = catalog.get(Gid(4)).unwrap();
        assert_eq!(sprite.dimensions(), (64, 32));
        assert_eq!(sprite.get_pixel(10, 5), Rgba([74, 37, 0, 255]));
    }

    #[test]
    fn length_sums_all_tilesets() {
        let map = Map::new(
            4,
            4,
            64,
            32,
            vec![
                tileset("ground", (128, 64), (64, 32), (0, 0)),
                tileset("trees", (192, 128), (64, 64), (0, 0)),
                tileset("props", (32, 32), (16, 16), (0, 0)),
            ],
            vec![],
        )
        .unwrap();
        let images = TilesetImages::from_images(
            &map,
            vec![gradient(128, 64, 0), gradient(192, 128, 1), gradient(32, 32, 2)],
        )
        .unwrap();
        let catalog = images.catalog();
        assert_eq!(catalog.len(), 1 + 4 + 6 + 4);
        assert_eq!(catalog.len() as u32, map.tile_count() + 1);

        // first tile of the second tileset follows the last of the first
        let Rgba([_, _, blue, _]) = catalog.get(Gid(5)).unwrap().get_pixel(0, 0);
        assert_eq!(blue, 1);
        let Rgba([_, _, blue, _]) = catalog.get(Gid(4)).unwrap().get_pixel(0, 0);
        assert_eq!(blue, 0);
        assert_eq!(catalog.get(Gid(11)).unwrap().dimensions(), (16, 16));
    }

    #[test]
    fn lookup_ignores_flip_flags() {
        let map = scenario_map();
        let images = TilesetImages::from_images(&map, vec![gradient(128, 64, 0)]).unwrap();
        let catalog = images.catalog();
        let flipped = Gid(2 | crate::gid::FLIP_H | crate::gid::FLIP_V);
        assert_eq!(
            catalog.get(flipped).unwrap().get_pixel(0, 0),
            catalog.get(Gid(2)).unwrap().get_pixel(0, 0)
        );
    }

    #[test]
    fn rejects_image_smaller_than_declared() {
        let map = scenario_map();
        let err = TilesetImages::from_images(&map, vec![gradient(64, 64, 0)]).unwrap_err();
        assert!(matches!(
            err,
            MapError::ImageSize { expected: (128, 64), actual: (64, 64), .. }
        ));
    }

    #[test]
    fn rejects_missing_images() {
        let map = scenario_map();
        let err = TilesetImages::from_images(&map, vec![]).unwrap_err();
        assert!(matches!(err, MapError::TilesetCount { expected: 1, actual: 0 }));
    }

    #[test]
    fn unreadable_image_is_a_decode_error() {
        let map = scenario_map();
        let err = map.decode_tilesets().unwrap_err();
        assert!(matches!(err, MapError::Decode { .. }));
    }
}
