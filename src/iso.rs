//! Diamond-projection geometry: grid cells to pixel rectangles.

use crate::error::MapError;
use crate::geom::{px, PixelRect};
use crate::gid::Gid;
use crate::map::Map;
use macroquad::math::ivec2;

impl Map {
    /// Pixel bounds of the whole map, padded at the bottom by the tallest tileset tile.
    pub fn map_rect(&self) -> PixelRect {
        let width = u64::from(self.width) * u64::from(self.tile_w);
        let height = u64::from(self.height) * u64::from(self.tile_h)
            + u64::from(self.max_tile_height());
        PixelRect::new(0, 0, px(width), px(height))
    }

    /// Destination rectangle of grid cell (`col`, `row`).
    ///
    /// Column steps go right-and-down, row steps go left-and-down, starting from the
    /// horizontal center of the map. Half-tile steps use truncating integer division,
    /// so odd tile sizes lose a pixel per step. Everything sits `max_tile_height`
    /// below the top so tall tiles anchored to row 0 are not clipped.
    pub fn tile_rect(&self, col: i32, row: i32) -> PixelRect {
        let tile_w = px(self.tile_w.into());
        let tile_h = px(self.tile_h.into());
        let block_w = tile_w / 2;
        let block_h = tile_h / 2;
        let map_w = px(u64::from(self.width) * u64::from(self.tile_w));

        let min_x = (map_w / 2 - block_w)
            .saturating_sub(row.saturating_mul(block_w))
            .saturating_add(col.saturating_mul(block_w));
        let min_y = row
            .saturating_mul(block_h)
            .saturating_add(col.saturating_mul(block_h));

        PixelRect::new(
            min_x,
            min_y,
            min_x.saturating_add(tile_w),
            min_y.saturating_add(tile_h),
        )
        .translate(ivec2(0, px(self.max_tile_height().into())))
    }

    /// Screen rectangle for a sprite of `source`'s size drawn at (`col`, `row`).
    ///
    /// The sprite's bottom edge sits on the cell's bottom edge, then the owning
    /// tileset's offset is applied. Fails if `gid` is 0 or past the last tileset.
    pub fn placement_rect(
        &self,
        col: i32,
        row: i32,
        gid: Gid,
        source: PixelRect,
    ) -> Result<PixelRect, MapError> {
        let offset = self.tile_offset(gid)?;
        let mut rect = self.tile_rect(col, row);
        rect.min.y = rect
            .min
            .y
            .saturating_add(px(self.tile_h.into()).saturating_sub(source.height()));
        rect.max.y = rect.min.y.saturating_add(source.height());
        rect.max.x = rect.min.x.saturating_add(source.width());
        Ok(rect.translate(offset.into()))
    }
}
