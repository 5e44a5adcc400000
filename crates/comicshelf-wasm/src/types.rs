//! WASM-compatible wrapper types for page rasters.

use std::sync::Arc;

use comicshelf_core::Frame;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A page bitmap handed to JavaScript for painting.
///
/// The frame is shared with the reader, so holding a `JsFrame` costs no
/// copy until `pixels()` or `rgba_pixels()` is called.
#[wasm_bindgen]
pub struct JsFrame {
    frame: Arc<Frame>,
}

#[wasm_bindgen]
impl JsFrame {
    /// Bitmap width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.frame.width
    }

    /// Bitmap height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.frame.height
    }

    /// Number of bytes in the RGB pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.frame.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.frame.pixels.clone()
    }

    /// Returns RGBA pixel data, ready for `new ImageData(...)`.
    pub fn rgba_pixels(&self) -> Vec<u8> {
        self.frame.to_rgba_pixels()
    }
}

impl JsFrame {
    pub(crate) fn from_frame(frame: &Arc<Frame>) -> Self {
        Self {
            frame: Arc::clone(frame),
        }
    }
}

/// Summary returned to JavaScript after a book is loaded.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct LoadSummary {
    pub pages: usize,
    pub selected: usize,
    pub skipped: Vec<SkippedEntry>,
}

/// An entry that was selected but could not be decoded.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct SkippedEntry {
    pub entry: String,
    pub reason: String,
}
