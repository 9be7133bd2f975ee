//! Text and image dumps of a rendered framebuffer, for the CLI and debugging.

use crate::sink::{Framebuffer, PixelSink};

const SHADES: [char; 5] = [' ', '.', ':', '+', '#'];

impl Framebuffer {
    /// Down-sample into text, one character per `cell_w`×`cell_h` block.
    ///
    /// Packed mono blocks are shaded by lit-pixel density. Indexed blocks use
    /// the majority pixel: `#` lit wall, `=` unlit wall, `~` sky, `_` floor.
    pub fn ascii(&self, cell_w: usize, cell_h: usize) -> String {
        let vp = self.viewport();
        let (cw, ch) = (cell_w.max(1), cell_h.max(1));
        let mut out = String::new();
        for by in (0..vp.height).step_by(ch) {
            for bx in (0..vp.width).step_by(cw) {
                let xs = bx..(bx + cw).min(vp.width);
                let ys = by..(by + ch).min(vp.height);
                let area = xs.len() * ys.len();
                out.push(match self {
                    Self::PackedMono(s) => {
                        let lit = ys
                            .flat_map(|y| xs.clone().map(move |x| (x, y)))
                            .filter(|&(x, y)| s.is_lit(x, y))
                            .count();
                        SHADES[lit * (SHADES.len() - 1) / area.max(1)]
                    }
                    Self::Indexed(s) => {
                        let p = s.palette();
                        let mut counts = [0usize; 4];
                        for y in ys {
                            for x in xs.clone() {
                                match s.pixel(x, y) {
                                    Some(v) if v == p.lit => counts[0] += 1,
                                    Some(v) if v == p.unlit => counts[1] += 1,
                                    Some(v) if v == p.sky => counts[2] += 1,
                                    _ => counts[3] += 1,
                                }
                            }
                        }
                        let best = (0..4).max_by_key(|&i| (counts[i], 4 - i)).unwrap_or(3);
                        ['#', '=', '~', '_'][best]
                    }
                });
            }
            out.push('\n');
        }
        out
    }

    /// Encode as a binary Netpbm image: P4 (PBM) for packed mono, P6 (PPM)
    /// for indexed, expanding ARGB2222 palette bytes to 8-bit RGB.
    pub fn to_netpbm(&self) -> Vec<u8> {
        let vp = self.viewport();
        match self {
            Self::PackedMono(s) => {
                let mut out = format!("P4\n{} {}\n", vp.width, vp.height).into_bytes();
                let row_bytes = vp.width.div_ceil(8);
                for y in 0..vp.height {
                    let mut row = vec![0u8; row_bytes];
                    for x in 0..vp.width {
                        // PBM: 1 is black, MSB first.
                        if !s.is_lit(x, y) {
                            row[x / 8] |= 0x80 >> (x % 8);
                        }
                    }
                    out.extend_from_slice(&row);
                }
                out
            }
            Self::Indexed(s) => {
                let mut out = format!("P6\n{} {}\n255\n", vp.width, vp.height).into_bytes();
                for &b in &s.bytes()[..vp.width * vp.height] {
                    let channel = |shift: u8| ((b >> shift) & 0b11) * 85;
                    out.extend_from_slice(&[channel(4), channel(2), channel(0)]);
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::projection::Viewport;
    use crate::sink::{Framebuffer, Palette, PixelFormat, PixelSink};

    #[test]
    fn mono_ascii_shades_by_density() {
        let mut fb = Framebuffer::new(PixelFormat::PackedMono, Viewport::new(4, 2), Palette::default());
        for y in 0..2 {
            fb.put(0, y, true);
            fb.put(1, y, true);
        }
        fb.put(2, 0, true);
        assert_eq!(fb.ascii(2, 2), "#.\n");
    }

    #[test]
    fn indexed_ascii_uses_majority_pixel() {
        let mut fb = Framebuffer::new(PixelFormat::Indexed, Viewport::new(2, 4), Palette::default());
        fb.fill_background();
        fb.put(0, 0, true);
        assert_eq!(fb.ascii(1, 2), "#~\n__\n");
    }

    #[test]
    fn pbm_header_and_size() {
        let fb = Framebuffer::new(PixelFormat::PackedMono, Viewport::PEBBLE, Palette::default());
        let img = fb.to_netpbm();
        let header = b"P4\n144 168\n";
        assert!(img.starts_with(header));
        assert_eq!(img.len(), header.len() + 18 * 168);
        // Unlit everywhere -> all black bits.
        assert!(img[header.len()..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn ppm_expands_palette_channels() {
        let mut fb = Framebuffer::new(PixelFormat::Indexed, Viewport::new(1, 2), Palette::default());
        fb.fill_background();
        let img = fb.to_netpbm();
        let header = b"P6\n1 2\n255\n";
        assert_eq!(&img[header.len()..], &[0, 0, 255, 0, 170, 0]);
    }
}
