//! Page rasters, decode options and decode errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an entry's bytes could not be turned into frames.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Zero-sized or otherwise unusable dimensions were requested.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The codec rejected the bytes (unknown format, truncation, bad data).
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// Interpolation used when a page is scaled up to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Nearest,
    /// Maps to `image`'s `Triangle` filter.
    #[default]
    Bilinear,
    Lanczos3,
}

impl FilterType {
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        use image::imageops::FilterType as Image;

        match self {
            FilterType::Nearest => Image::Nearest,
            FilterType::Bilinear => Image::Triangle,
            FilterType::Lanczos3 => Image::Lanczos3,
        }
    }
}

/// Options controlling how a selected entry is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Rotate/flip static pages according to their EXIF orientation tag.
    pub apply_exif_orientation: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            apply_exif_orientation: true,
        }
    }
}

/// One page raster, RGB8, row-major.
///
/// Frames are never mutated once decoded; the page store and the viewport
/// share them through `Arc<Frame>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len() as u64, width as u64 * height as u64 * 3);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Copy into an `RgbImage`, or `None` if the buffer length is off.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Expand the pixel buffer to RGBA with an opaque alpha channel.
    pub fn to_rgba_pixels(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() / 3 * 4);
        for px in self.pixels.chunks_exact(3) {
            out.extend_from_slice(px);
            out.push(255);
        }
        out
    }

    /// True for a zero-area frame.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
