use macroquad::math::{ivec2, IVec2, Rect};

/// Pixel length as a signed coordinate, clamped to `i32::MAX`.
#[inline]
pub(crate) fn px(len: u64) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

/// Axis-aligned integer rectangle in pixel space, `min` inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    pub min: IVec2,
    pub max: IVec2,
}

impl PixelRect {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        PixelRect {
            min: ivec2(min_x, min_y),
            max: ivec2(max_x, max_y),
        }
    }

    /// Rectangle of the given size anchored at the origin.
    pub fn from_size(width: u32, height: u32) -> Self {
        PixelRect::new(0, 0, px(width.into()), px(height.into()))
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.max.x.saturating_sub(self.min.x)
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.max.y.saturating_sub(self.min.y)
    }

    /// Rectangle moved by `delta`, saturating at the `i32` range.
    #[inline]
    pub fn translate(self, delta: IVec2) -> Self {
        let shift = |p: IVec2| ivec2(p.x.saturating_add(delta.x), p.y.saturating_add(delta.y));
        PixelRect {
            min: shift(self.min),
            max: shift(self.max),
        }
    }

    /// Same center, width and height swapped: the rect a quarter turn maps onto `self`.
    pub fn transposed(self) -> Self {
        let (w, h) = (self.width(), self.height());
        let min = ivec2(
            self.min.x.saturating_add((w - h) / 2),
            self.min.y.saturating_add((h - w) / 2),
        );
        PixelRect {
            min,
            max: ivec2(min.x.saturating_add(h), min.y.saturating_add(w)),
        }
    }
}

impl From<PixelRect> for Rect {
    fn from(r: PixelRect) -> Self {
        Rect::new(
            r.min.x as f32,
            r.min.y as f32,
            r.width() as f32,
            r.height() as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_keeps_size() {
        let r = PixelRect::new(32, 32, 96, 64).translate(ivec2(-5, 7));
        assert_eq!(r, PixelRect::new(27, 39, 91, 71));
        assert_eq!((r.width(), r.height()), (64, 32));
    }

    #[test]
    fn oversized_lengths_clamp_instead_of_wrapping() {
        let r = PixelRect::from_size(u32::MAX, 3_000_000_000);
        assert_eq!(r.max, ivec2(i32::MAX, i32::MAX));
        let moved = r.translate(ivec2(10, 10));
        assert_eq!(moved.max, ivec2(i32::MAX, i32::MAX));
        assert_eq!(moved.min, ivec2(10, 10));
    }

    #[test]
    fn transposed_swaps_extent_around_center() {
        let r = PixelRect::new(36, 30, 100, 62); // 64x32
        let t = r.transposed();
        assert_eq!((t.width(), t.height()), (32, 64));
        assert_eq!(t, PixelRect::new(52, 14, 84, 78));
        assert_eq!(t.transposed(), r);
    }

    #[test]
    fn converts_to_macroquad_rect() {
        let r: Rect = PixelRect::new(10, 20, 74, 52).into();
        assert_eq!((r.x, r.y, r.w, r.h), (10.0, 20.0, 64.0, 32.0));
    }
}
