//! RGBA pixel buffers.

use crate::error::{Result, SnapError};

/// Opaque black, the clear color of rendered frames and composite margins.
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// A width x height RGBA8 image, top-left origin, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    /// Creates an opaque black frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, BLACK)
    }

    /// Creates a frame with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let pixels = color.iter().copied().cycle().take(count * 4).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wraps an existing RGBA buffer, which must hold exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(SnapError::InvalidConfig(format!(
                "{width}x{height} frame needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Returns the pixel at (x, y), or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        let mut px = [0; 4];
        px.copy_from_slice(&self.pixels[i..i + 4]);
        Some(px)
    }

    /// Sets the pixel at (x, y); writes outside the frame are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x < self.width && y < self.height {
            let i = self.offset(x, y);
            self.pixels[i..i + 4].copy_from_slice(&color);
        }
    }

    /// Copies `src` with its top-left corner at (x, y), clipped to this frame.
    pub fn paste(&mut self, src: &Frame, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let cols = src.width.min(self.width - x) as usize;
        let rows = src.height.min(self.height - y);
        for row in 0..rows {
            let dst = self.offset(x, y + row);
            let from = src.offset(0, row);
            self.pixels[dst..dst + cols * 4].copy_from_slice(&src.pixels[from..from + cols * 4]);
        }
    }

    /// Alpha-composites `src` over this frame at (x, y), clipped.
    ///
    /// The destination keeps its own alpha.
    pub fn blend_over(&mut self, src: &Frame, x: u32, y: u32) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                let (dx, dy) = (x + sx, y + sy);
                let (Some(s), Some(d)) = (src.pixel(sx, sy), self.pixel(dx, dy)) else {
                    continue;
                };
                let a = u32::from(s[3]);
                let mut out = d;
                for c in 0..3 {
                    let mixed = (u32::from(s[c]) * a + u32::from(d[c]) * (255 - a) + 127) / 255;
                    out[c] = u8::try_from(mixed).unwrap_or(u8::MAX);
                }
                self.set_pixel(dx, dy, out);
            }
        }
    }

    /// Returns the frame rotated 90 degrees counter-clockwise.
    #[must_use]
    pub fn rotate_ccw(&self) -> Frame {
        let mut out = Frame::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(px) = self.pixel(x, y) {
                    out.set_pixel(y, self.width - 1 - x, px);
                }
            }
        }
        out
    }

    /// Returns the frame surrounded by a border of `color`.
    #[must_use]
    pub fn padded(&self, horizontal: u32, vertical: u32, color: [u8; 4]) -> Frame {
        let mut out = Frame::filled(
            self.width + 2 * horizontal,
            self.height + 2 * vertical,
            color,
        );
        out.paste(self, horizontal, vertical);
        out
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Converts a linear 0..1 color channel to a byte.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
