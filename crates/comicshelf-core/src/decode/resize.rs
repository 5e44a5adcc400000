//! Frame resampling for the viewport's scale-to-fit rule.

use super::{DecodeError, Frame, FilterType};

/// Resize a frame to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for a zero target dimension and
/// `DecodeError::CorruptedFile` if the pixel buffer does not match the
/// frame dimensions.
pub fn resize(
    frame: &Frame,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Frame, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if frame.width == width && frame.height == height {
        return Ok(frame.clone());
    }

    let Some(source) = frame.to_rgb_image() else {
        return Err(DecodeError::CorruptedFile(format!(
            "pixel buffer of {} bytes does not fit {}x{}",
            frame.pixels.len(),
            frame.width,
            frame.height
        )));
    };

    Ok(Frame::from_rgb_image(image::imageops::resize(
        &source,
        width,
        height,
        filter.to_image_filter(),
    )))
}

/// Scale a frame so its width equals `target_width`, preserving aspect ratio.
///
/// The height is scaled by the same factor and truncated toward zero,
/// never below one pixel.
pub fn scale_to_width(
    frame: &Frame,
    target_width: u32,
    filter: FilterType,
) -> Result<Frame, DecodeError> {
    let (width, height) = scaled_dimensions(frame.width, frame.height, target_width);
    resize(frame, width, height, filter)
}

/// Dimensions of a `width x height` frame scaled to `target_width`.
pub(crate) fn scaled_dimensions(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    // height * (target / width), truncated; integer math keeps exact ratios exact
    let new_height = height as u64 * target_width as u64 / width as u64;
    (target_width, new_height.clamp(1, u32::MAX as u64) as u32)
}
