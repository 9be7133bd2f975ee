//! Pixel sinks: the only place that knows a framebuffer's memory layout.
//!
//! The frame renderer hands every pixel to a [`PixelSink`]; swapping the sink
//! swaps the output encoding without touching ray or projection math.

use serde::{Deserialize, Serialize};

use crate::projection::Viewport;

/// Errors from wrapping a framebuffer.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("framebuffer holds {found} {unit}, {viewport:?} needs {needed}")]
    TooSmall {
        viewport: Viewport,
        unit: &'static str,
        needed: usize,
        found: usize,
    },
}

/// Write-only pixel target.
pub trait PixelSink {
    fn viewport(&self) -> Viewport;

    /// Pre-fill everything the wall pass may not cover.
    fn fill_background(&mut self);

    /// Emit one wall pixel. Coordinates outside the viewport are ignored.
    fn put(&mut self, x: usize, y: usize, lit: bool);
}

/// Output encoding, chosen at configuration time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PixelFormat {
    /// One bit per pixel, 32 pixels per word, LSB = leftmost.
    #[default]
    PackedMono,
    /// One palette byte per pixel.
    Indexed,
}

/// Palette bytes for the indexed layout (ARGB2222 on the reference display).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub sky: u8,
    pub floor: u8,
    pub lit: u8,
    pub unlit: u8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky: 0b1100_0011,
            floor: 0b1100_1000,
            lit: 0b1111_0000,
            unlit: 0b1100_0000,
        }
    }
}

/// Words per row in the packed layout.
pub const fn packed_stride(width: usize) -> usize {
    width.div_ceil(32)
}

/// Packed monochrome framebuffer.
///
/// Background is all zero (dark); wall texels are OR-ed in, so an unlit texel
/// leaves whatever is already there.
#[derive(Debug, Clone)]
pub struct PackedMonoSink<B> {
    buf: B,
    viewport: Viewport,
    stride: usize,
}

impl<B: AsRef<[u32]> + AsMut<[u32]>> PackedMonoSink<B> {
    pub fn new(buf: B, viewport: Viewport) -> Result<Self, SinkError> {
        let stride = packed_stride(viewport.width);
        let needed = stride * viewport.height;
        let found = buf.as_ref().len();
        if found < needed {
            return Err(SinkError::TooSmall {
                viewport,
                unit: "words",
                needed,
                found,
            });
        }
        Ok(Self {
            buf,
            viewport,
            stride,
        })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        if x >= self.viewport.width || y >= self.viewport.height {
            return false;
        }
        (self.buf.as_ref()[y * self.stride + x / 32] >> (x % 32)) & 1 == 1
    }

    pub fn words(&self) -> &[u32] {
        self.buf.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.buf
    }
}

impl PackedMonoSink<Vec<u32>> {
    /// Allocate a zeroed framebuffer for `viewport`.
    pub fn owned(viewport: Viewport) -> Self {
        let stride = packed_stride(viewport.width);
        Self {
            buf: vec![0; stride * viewport.height],
            viewport,
            stride,
        }
    }
}

impl<B: AsRef<[u32]> + AsMut<[u32]>> PixelSink for PackedMonoSink<B> {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn fill_background(&mut self) {
        let n = self.stride * self.viewport.height;
        self.buf.as_mut()[..n].fill(0);
    }

    fn put(&mut self, x: usize, y: usize, lit: bool) {
        if !lit || x >= self.viewport.width || y >= self.viewport.height {
            return;
        }
        self.buf.as_mut()[y * self.stride + x / 32] |= 1 << (x % 32);
    }
}

/// Byte-per-pixel indexed framebuffer.
///
/// Background is sky above the midline and floor from the midline down.
#[derive(Debug, Clone)]
pub struct IndexedSink<B> {
    buf: B,
    viewport: Viewport,
    palette: Palette,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> IndexedSink<B> {
    pub fn new(buf: B, viewport: Viewport, palette: Palette) -> Result<Self, SinkError> {
        let needed = viewport.width * viewport.height;
        let found = buf.as_ref().len();
        if found < needed {
            return Err(SinkError::TooSmall {
                viewport,
                unit: "bytes",
                needed,
                found,
            });
        }
        Ok(Self {
            buf,
            viewport,
            palette,
        })
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.viewport.width || y >= self.viewport.height {
            return None;
        }
        Some(self.buf.as_ref()[y * self.viewport.width + x])
    }

    pub fn bytes(&self) -> &[u8] {
        self.buf.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.buf
    }
}

impl IndexedSink<Vec<u8>> {
    pub fn owned(viewport: Viewport, palette: Palette) -> Self {
        Self {
            buf: vec![0; viewport.width * viewport.height],
            viewport,
            palette,
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> PixelSink for IndexedSink<B> {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn fill_background(&mut self) {
        let w = self.viewport.width;
        let split = self.viewport.midline() * w;
        let end = w * self.viewport.height;
        let buf = self.buf.as_mut();
        buf[..split].fill(self.palette.sky);
        buf[split..end].fill(self.palette.floor);
    }

    fn put(&mut self, x: usize, y: usize, lit: bool) {
        if x >= self.viewport.width || y >= self.viewport.height {
            return;
        }
        let value = if lit {
            self.palette.lit
        } else {
            self.palette.unlit
        };
        self.buf.as_mut()[y * self.viewport.width + x] = value;
    }
}

/// An owned framebuffer in whichever layout the configuration picked.
#[derive(Debug, Clone)]
pub enum Framebuffer {
    PackedMono(PackedMonoSink<Vec<u32>>),
    Indexed(IndexedSink<Vec<u8>>),
}

impl Framebuffer {
    pub fn new(format: PixelFormat, viewport: Viewport, palette: Palette) -> Self {
        match format {
            PixelFormat::PackedMono => Self::PackedMono(PackedMonoSink::owned(viewport)),
            PixelFormat::Indexed => Self::Indexed(IndexedSink::owned(viewport, palette)),
        }
    }

    pub fn format(&self) -> PixelFormat {
        match self {
            Self::PackedMono(_) => PixelFormat::PackedMono,
            Self::Indexed(_) => PixelFormat::Indexed,
        }
    }
}

impl PixelSink for Framebuffer {
    fn viewport(&self) -> Viewport {
        match self {
            Self::PackedMono(s) => s.viewport(),
            Self::Indexed(s) => s.viewport(),
        }
    }

    fn fill_background(&mut self) {
        match self {
            Self::PackedMono(s) => s.fill_background(),
            Self::Indexed(s) => s.fill_background(),
        }
    }

    fn put(&mut self, x: usize, y: usize, lit: bool) {
        match self {
            Self::PackedMono(s) => s.put(x, y, lit),
            Self::Indexed(s) => s.put(x, y, lit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_stride_rounds_up() {
        assert_eq!(packed_stride(144), 5);
        assert_eq!(packed_stride(128), 4);
        assert_eq!(packed_stride(1), 1);
    }

    #[test]
    fn packed_addresses_word_and_bit_lane() {
        let mut sink = PackedMonoSink::owned(Viewport::PEBBLE);
        sink.put(0, 0, true);
        sink.put(33, 2, true);
        sink.put(143, 167, true);
        let words = sink.words();
        assert_eq!(words[0], 1);
        assert_eq!(words[2 * 5 + 1], 1 << 1);
        assert_eq!(words[167 * 5 + 4], 1 << 15);
        assert!(sink.is_lit(33, 2));
        assert!(!sink.is_lit(34, 2));
    }

    #[test]
    fn packed_unlit_never_clears() {
        let mut sink = PackedMonoSink::owned(Viewport::new(8, 8));
        sink.put(3, 3, true);
        sink.put(3, 3, false);
        assert!(sink.is_lit(3, 3));
        sink.fill_background();
        assert!(!sink.is_lit(3, 3));
    }

    #[test]
    fn out_of_range_puts_are_ignored() {
        let mut sink = PackedMonoSink::owned(Viewport::new(8, 8));
        sink.put(8, 0, true);
        sink.put(0, 8, true);
        assert!(sink.words().iter().all(|&w| w == 0));
    }

    #[test]
    fn borrowed_slices_work_as_sinks() {
        let mut raw = [0u32; 5 * 168];
        {
            let mut sink = PackedMonoSink::new(&mut raw[..], Viewport::PEBBLE).unwrap();
            sink.put(40, 1, true);
        }
        assert_eq!(raw[5 + 1], 1 << 8);
    }

    #[test]
    fn short_buffers_are_rejected() {
        let err = PackedMonoSink::new(vec![0u32; 10], Viewport::PEBBLE).unwrap_err();
        assert!(matches!(err, SinkError::TooSmall { needed: 840, .. }));
        let err = IndexedSink::new(vec![0u8; 10], Viewport::PEBBLE, Palette::default());
        assert!(err.is_err());
    }

    #[test]
    fn indexed_background_splits_at_midline() {
        let palette = Palette::default();
        let mut sink = IndexedSink::owned(Viewport::PEBBLE, palette);
        sink.fill_background();
        assert_eq!(sink.pixel(10, 83), Some(palette.sky));
        assert_eq!(sink.pixel(10, 84), Some(palette.floor));
        assert_eq!(sink.pixel(143, 167), Some(palette.floor));
    }

    #[test]
    fn indexed_put_writes_lit_or_unlit() {
        let palette = Palette::default();
        let mut sink = IndexedSink::owned(Viewport::new(4, 4), palette);
        sink.fill_background();
        sink.put(1, 1, true);
        sink.put(2, 1, false);
        assert_eq!(sink.pixel(1, 1), Some(palette.lit));
        assert_eq!(sink.pixel(2, 1), Some(palette.unlit));
        assert_eq!(sink.pixel(3, 1), Some(palette.sky));
    }

    #[test]
    fn framebuffer_dispatches_on_format() {
        let fb = Framebuffer::new(PixelFormat::Indexed, Viewport::PEBBLE, Palette::default());
        assert_eq!(fb.format(), PixelFormat::Indexed);
        assert_eq!(fb.viewport(), Viewport::PEBBLE);
    }
}
