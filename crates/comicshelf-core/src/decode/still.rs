//! Still page decoding.

use std::io::Cursor;

use image::ImageReader;

use super::orientation::{orient, read_orientation};
use super::{DecodeError, DecodeOptions, Frame};

/// Decode a still page from bytes into exactly one frame.
///
/// The format is sniffed from the bytes, so `.jpg`, `.jpeg` and any extra
/// static suffix enabled in the selector share this path.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if the bytes cannot be decoded.
pub fn decode_still(bytes: &[u8], options: &DecodeOptions) -> Result<Frame, DecodeError> {
    let mut img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(corrupted)?
        .decode()
        .map_err(corrupted)?;

    if options.apply_exif_orientation {
        if let Some(tag) = read_orientation(bytes) {
            img = orient(img, tag);
        }
    }

    Ok(Frame::from_rgb_image(img.into_rgb8()))
}

fn corrupted(e: impl std::fmt::Display) -> DecodeError {
    DecodeError::CorruptedFile(e.to_string())
}
