//! Routes `tracing` events from the core crate to the browser console.

use std::io;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;
use wasm_bindgen::prelude::*;

/// Install a console subscriber.
///
/// # Arguments
/// * `level` - An `EnvFilter` directive such as `"info"` or
///   `"comicshelf_core=debug"`
///
/// # Errors
/// Returns error if the directive is invalid or a subscriber is already set
#[wasm_bindgen]
pub fn init_logging(level: &str) -> Result<(), JsValue> {
    let filter = EnvFilter::try_new(level)
        .map_err(|e| JsValue::from_str(&format!("Invalid log filter '{}': {}", level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(MakeConsoleWriter)
        .with_ansi(false)
        .without_time()
        .try_init()
        .map_err(|_| JsValue::from_str("Logging already initialized"))
}

#[derive(Debug, Clone, Copy, Default)]
struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::default()
    }
}

/// Buffers one formatted event and logs it on drop.
#[derive(Debug, Default)]
struct ConsoleWriter {
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn take_line(&mut self) -> Option<String> {
        let bytes = std::mem::take(&mut self.buffer);
        let line = String::from_utf8_lossy(&bytes);
        let line = line.trim_end();
        (!line.is_empty()).then(|| line.to_string())
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(line) = self.take_line() {
            web_sys::console::log_1(&JsValue::from_str(&line));
        }
    }
}
