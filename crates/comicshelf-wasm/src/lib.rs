//! Comicshelf WASM - WebAssembly bindings for the Comicshelf reader
//!
//! This crate exposes the comicshelf-core reading pipeline to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `reader` - Book loading, page navigation and viewport control
//! - `types` - WASM-compatible wrapper types for page bitmaps
//! - `logging` - Forwards core log events to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { init_logging, JsBookReader } from '@comicshelf/wasm';
//!
//! await init();
//! init_logging('info');
//!
//! const reader = new JsBookReader(undefined, canvas.width, canvas.height);
//! reader.load_zip(file.name, new Uint8Array(await file.arrayBuffer()));
//! const page = reader.displayed();
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(page.rgba_pixels()), page.width), ...reader.pan());
//! ```

use wasm_bindgen::prelude::*;

mod logging;
mod reader;
mod types;

pub use logging::init_logging;
pub use reader::JsBookReader;
pub use types::JsFrame;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
