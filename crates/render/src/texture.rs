//! Packed 1-bit wall texture and the vertical texel lookup.
//!
//! A texture is 64 columns, one per wall offset. Each column is two 32-bit
//! words: word 0 holds texel rows 0..32 (bit `v`), word 1 rows 32..64 (bit
//! `v - 32`). This is the raw layout of a 64×64 1-bit bitmap stored row by
//! row, LSB first, read sideways.

use crate::projection::Viewport;

/// Texels per side.
pub const TEXTURE_SIZE: usize = 64;
const WORDS: usize = TEXTURE_SIZE * 2;

/// Errors from building a texture.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("packed texture needs {expected} words, got {found}")]
    WordCount { expected: usize, found: usize },
}

/// Which half-column is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    /// From the midline upward.
    Top,
    /// From the midline downward.
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    columns: [[u32; 2]; TEXTURE_SIZE],
}

impl Texture {
    /// Wrap raw packed words, two per column.
    pub fn from_packed_words(words: &[u32]) -> Result<Self, TextureError> {
        if words.len() != WORDS {
            return Err(TextureError::WordCount {
                expected: WORDS,
                found: words.len(),
            });
        }
        let mut columns = [[0u32; 2]; TEXTURE_SIZE];
        for (col, pair) in columns.iter_mut().zip(words.chunks_exact(2)) {
            *col = [pair[0], pair[1]];
        }
        Ok(Self { columns })
    }

    /// Build from a predicate over `(offset, row)`, both `0..64`, row 0 at the top.
    pub fn from_fn(mut lit: impl FnMut(usize, usize) -> bool) -> Self {
        let mut columns = [[0u32; 2]; TEXTURE_SIZE];
        for (u, col) in columns.iter_mut().enumerate() {
            for v in 0..TEXTURE_SIZE {
                if lit(u, v) {
                    col[v / 32] |= 1 << (v % 32);
                }
            }
        }
        Self { columns }
    }

    /// Every texel lit: walls render as solid light columns.
    pub fn solid() -> Self {
        Self::from_fn(|_, _| true)
    }

    /// White bricks, 16 texels per course, joints offset every other course.
    pub fn brick() -> Self {
        Self::from_fn(|u, v| {
            let course = v / 16;
            let bed_joint = v % 16 == 0;
            let head_joint = (u + if course % 2 == 0 { 0 } else { 16 }) % 32 == 0;
            !(bed_joint || head_joint)
        })
    }

    /// Texel at `(offset, row)`.
    pub fn texel(&self, u: usize, v: usize) -> bool {
        (self.columns[u % TEXTURE_SIZE][(v / 32) % 2] >> (v % 32)) & 1 == 1
    }

    /// Texel for a half-column scan. `t` counts away from the midline: the top
    /// pass walks rows 31 down to 0, the bottom pass rows 32 up to 63.
    pub fn sample(&self, offset: u8, half: Half, t: u32) -> bool {
        let [upper, lower] = self.columns[offset as usize % TEXTURE_SIZE];
        let t = t & 31;
        match half {
            Half::Top => (upper >> (31 - t)) & 1 == 1,
            Half::Bottom => (lower >> t) & 1 == 1,
        }
    }

    pub fn packed_words(&self) -> Vec<u32> {
        self.columns.iter().flatten().copied().collect()
    }
}

impl Default for Texture {
    fn default() -> Self {
        Self::brick()
    }
}

/// Texel step for scan row `scan` of a column whose corrected distance is
/// `corrected`: `((scan · corrected) / screen_height) >> 16`.
///
/// Nearer walls advance more slowly through the texture, so each texel spans
/// more screen rows. Within a projected column this is always below 32.
pub fn vertical_texel(scan: usize, corrected: i64, viewport: Viewport) -> u32 {
    let h = viewport.height.max(1) as i64;
    (((scan as i64 * corrected) / h) >> 16) as u32
}
