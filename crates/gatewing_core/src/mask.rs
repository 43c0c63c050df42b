//! Per-cell coverage masks used for exact-shape collision tests.
//!
//! A mask is a `width` x `height` grid of set/clear cells stored as packed
//! rows of `u64` words. Overlap tests place a second mask at an integer
//! offset and report the first cell covered by both.

const WORD_BITS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl CoverageMask {
    /// An empty mask.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(WORD_BITS);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    #[must_use]
    pub fn from_fn<F>(width: u32, height: u32, covered: F) -> Self
    where
        F: Fn(u32, u32) -> bool,
    {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if covered(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Every cell covered, like a fully opaque sprite.
    #[must_use]
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Ellipse inscribed in the bounding box. The corners stay clear.
    #[must_use]
    pub fn ellipse(width: u32, height: u32) -> Self {
        let rx = f64::from(width) / 2.0;
        let ry = f64::from(height) / 2.0;
        Self::from_fn(width, height, |x, y| {
            let dx = (f64::from(x) + 0.5 - rx) / rx;
            let dy = (f64::from(y) + 0.5 - ry) / ry;
            dx * dx + dy * dy <= 1.0
        })
    }

    /// Builds a mask from text rows; `#` is covered, anything else is clear.
    ///
    /// ```
    /// use gatewing_core::mask::CoverageMask;
    ///
    /// let mask = CoverageMask::from_rows(&[".#.", "###"]);
    /// assert_eq!((mask.width(), mask.height()), (3, 2));
    /// assert!(!mask.get(0, 0));
    /// assert!(mask.get(1, 0));
    /// ```
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut mask = Self::new(width, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    mask.set(x as u32, y as u32, true);
                }
            }
        }
        mask
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn word_index(&self, x: u32, y: u32) -> (usize, u64) {
        let x = x as usize;
        let idx = y as usize * self.words_per_row + x / WORD_BITS;
        (idx, 1u64 << (x % WORD_BITS))
    }

    /// Out-of-range cells read as clear.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (idx, bit) = self.word_index(x, y);
        self.bits[idx] & bit != 0
    }

    /// Out-of-range writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, covered: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (idx, bit) = self.word_index(x, y);
        if covered {
            self.bits[idx] |= bit;
        } else {
            self.bits[idx] &= !bit;
        }
    }

    /// Number of covered cells.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// First cell of `self` (row-major) also covered by `other` when
    /// `other`'s origin sits at `offset` in `self`'s coordinates.
    #[must_use]
    pub fn overlap(&self, other: &CoverageMask, offset: (i32, i32)) -> Option<(u32, u32)> {
        let (ox, oy) = (i64::from(offset.0), i64::from(offset.1));
        let x_start = ox.max(0);
        let x_end = (ox + i64::from(other.width)).min(i64::from(self.width));
        let y_start = oy.max(0);
        let y_end = (oy + i64::from(other.height)).min(i64::from(self.height));
        if x_start >= x_end || y_start >= y_end {
            return None;
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x as u32, y as u32) && other.get((x - ox) as u32, (y - oy) as u32) {
                    return Some((x as u32, y as u32));
                }
            }
        }
        None
    }

    #[must_use]
    pub fn overlaps(&self, other: &CoverageMask, offset: (i32, i32)) -> bool {
        self.overlap(other, offset).is_some()
    }
}
