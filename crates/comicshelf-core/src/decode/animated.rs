//! Animated GIF decoding.
//!
//! Every embedded frame becomes its own page. The GIF decoder composites
//! each frame onto the logical screen (honouring disposal methods), so the
//! resulting frames all share the canvas dimensions.

use std::io::Cursor;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage};

use super::{DecodeError, Frame};

const EXTENSION_INTRODUCER: u8 = 0x21;
const IMAGE_DESCRIPTOR: u8 = 0x2C;
const TRAILER: u8 = 0x3B;
/// Header (6 bytes) plus logical screen descriptor (7 bytes).
const SCREEN_END: usize = 13;

/// Decode every frame of a GIF in encoded order.
///
/// A GIF without image data yields an empty list rather than an error.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if the header or any frame fails
/// to decode. No partial frame list is returned in that case.
pub fn decode_animated(bytes: &[u8]) -> Result<Vec<Frame>, DecodeError> {
    if has_image_data(bytes) == Some(false) {
        tracing::debug!("gif reaches its trailer without image data");
        return Ok(Vec::new());
    }

    let decoder = GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    Ok(frames
        .into_iter()
        .map(|frame| {
            let rgb = DynamicImage::ImageRgba8(frame.into_buffer()).into_rgb8();
            Frame::from_rgb_image(rgb)
        })
        .collect())
}

/// Walk the block stream up to the first image descriptor.
///
/// `Some(false)` means the trailer came first. `None` means the stream is
/// malformed or truncated and is left for the decoder to report.
fn has_image_data(bytes: &[u8]) -> Option<bool> {
    if !bytes.starts_with(b"GIF87a") && !bytes.starts_with(b"GIF89a") {
        return None;
    }

    let screen_flags = *bytes.get(10)?;
    let mut pos = SCREEN_END;
    if screen_flags & 0x80 != 0 {
        pos += 3 * (1usize << ((screen_flags & 0x07) + 1));
    }

    loop {
        match *bytes.get(pos)? {
            IMAGE_DESCRIPTOR => return Some(true),
            TRAILER => return Some(false),
            EXTENSION_INTRODUCER => {
                // Introducer and label, then sub-blocks up to the zero terminator
                pos += 2;
                loop {
                    let len = *bytes.get(pos)? as usize;
                    pos += 1 + len;
                    if len == 0 {
                        break;
                    }
                }
            }
            _ => return None,
        }
    }
}
