/// Tiled global tile ID: a 1-based catalog index in the low 29 bits plus three flip flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Gid(pub u32);

/// Horizontal flip flag (bit 31).
pub const FLIP_H: u32 = 0x8000_0000;
/// Vertical flip flag (bit 30).
pub const FLIP_V: u32 = 0x4000_0000;
/// Diagonal flip flag (bit 29), i.e. swap x and y before the other flips.
pub const FLIP_D: u32 = 0x2000_0000;
/// All three flip flags.
pub const FLIP_MASK: u32 = FLIP_H | FLIP_V | FLIP_D;

impl Gid {
    /// The "no tile" GID.
    pub const EMPTY: Gid = Gid(0);

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// GID with the flip flags cleared; this is the catalog index.
    #[inline]
    pub fn global_tile_id(self) -> u32 {
        self.0 & !FLIP_MASK
    }

    #[inline]
    pub fn is_horizontal_flip(self) -> bool {
        (self.0 & FLIP_H) != 0
    }

    #[inline]
    pub fn is_vertical_flip(self) -> bool {
        (self.0 & FLIP_V) != 0
    }

    #[inline]
    pub fn is_diagonal_flip(self) -> bool {
        (self.0 & FLIP_D) != 0
    }

    /// True if any of the three flip flags is set.
    #[inline]
    pub fn is_flip(self) -> bool {
        (self.0 & FLIP_MASK) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.global_tile_id() == 0
    }
}

impl From<u32> for Gid {
    fn from(raw: u32) -> Self {
        Gid(raw)
    }
}
