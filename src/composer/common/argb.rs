//! Packed 32-bit pixel buffers.
//!
//! Pixels are stored as `0xAARRGGBB`: alpha in the most significant byte,
//! then red, green and blue. Source images are converted to this layout once
//! at decode time and the composed image is produced in it; conversion to
//! the byte order an encoder expects happens only when writing.

use std::fmt;
use std::str::FromStr;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = String;

    /// Parses `WIDTHxHEIGHT`, e.g. `640x480`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
        let width: u32 = w.trim().parse().map_err(|_| format!("invalid width `{}`", w.trim()))?;
        let height: u32 = h.trim().parse().map_err(|_| format!("invalid height `{}`", h.trim()))?;
        if width == 0 || height == 0 {
            return Err(format!("size must be at least 1x1, got {width}x{height}"));
        }
        Ok(Self::new(width, height))
    }
}

/// Image held as row-major packed ARGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgbImage {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl ArgbImage {
    /// Wraps an existing pixel buffer. Returns `None` if the buffer length
    /// does not match `size`.
    pub fn from_pixels(size: Size, pixels: Vec<u32>) -> Option<Self> {
        (pixels.len() == size.pixel_count()).then_some(Self {
            width: size.width,
            height: size.height,
            pixels,
        })
    }

    /// Builds an image by evaluating `f` at every coordinate, row by row.
    pub fn from_fn(size: Size, mut f: impl FnMut(u32, u32) -> u32) -> Self {
        let mut pixels = Vec::with_capacity(size.pixel_count());
        for y in 0..size.height {
            for x in 0..size.width {
                pixels.push(f(x, y));
            }
        }

        Self {
            width: size.width,
            height: size.height,
            pixels,
        }
    }

    pub fn from_rgba8(image: &RgbaImage) -> Self {
        let pixels = image
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                u32::from_be_bytes([a, r, g, b])
            })
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            pixels,
        }
    }

    pub fn to_rgba8(&self) -> RgbaImage {
        let bytes = self
            .pixels
            .iter()
            .flat_map(|&argb| {
                let [a, r, g, b] = argb.to_be_bytes();
                [r, g, b, a]
            })
            .collect();

        // Length is width * height * 4 by construction.
        RgbaImage::from_raw(self.width, self.height, bytes)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Packed pixel at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

/// Image as loaded from a source file.
pub type DecodedImage = ArgbImage;

/// Image produced by a composition pass.
pub type ComposedImage = ArgbImage;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parses_width_by_height() {
        assert_eq!("640x480".parse::<Size>().unwrap(), Size::new(640, 480));
        assert_eq!(" 3 X 2 ".parse::<Size>().unwrap(), Size::new(3, 2));
    }

    #[test]
    fn size_rejects_malformed_and_empty() {
        assert!("640".parse::<Size>().is_err());
        assert!("ax2".parse::<Size>().is_err());
        assert!("0x5".parse::<Size>().is_err());
        assert!("-1x5".parse::<Size>().is_err());
    }

    #[test]
    fn size_default_is_one_by_one() {
        assert_eq!(Size::default(), Size::new(1, 1));
        assert_eq!(Size::default().to_string(), "1x1");
    }

    #[test]
    fn rgba8_bytes_are_packed_alpha_first() {
        let rgba = RgbaImage::from_raw(1, 1, vec![0x11, 0x22, 0x33, 0x44]).unwrap();
        let argb = ArgbImage::from_rgba8(&rgba);
        assert_eq!(argb.pixel(0, 0), 0x4411_2233);
        assert_eq!(argb.to_rgba8().into_raw(), vec![0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn pixels_are_row_major() {
        let img = ArgbImage::from_pixels(Size::new(2, 2), vec![1, 2, 3, 4]).unwrap();
        assert_eq!(img.pixel(1, 0), 2);
        assert_eq!(img.pixel(0, 1), 3);
    }

    #[test]
    fn from_fn_visits_rows_top_to_bottom() {
        let img = ArgbImage::from_fn(Size::new(3, 2), |x, y| y * 10 + x);
        assert_eq!(img.pixels(), &[0, 1, 2, 10, 11, 12]);
    }

    #[test]
    fn from_pixels_rejects_wrong_length() {
        assert!(ArgbImage::from_pixels(Size::new(2, 2), vec![0; 3]).is_none());
    }
}
