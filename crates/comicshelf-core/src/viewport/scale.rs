//! Scale-to-fit rule for the displayed bitmap.
//!
//! Pages narrower than the viewport are scaled up to the viewport width
//! with the aspect ratio preserved. Pages at least as wide as the viewport
//! are shown at native resolution; nothing is ever scaled down.

use std::sync::Arc;

use crate::decode::{scale_to_width, scaled_dimensions, FilterType, Frame};

/// Compute the bitmap to display for `source` in a viewport `viewport_width` wide.
///
/// `current` is the bitmap displayed so far. If it already has the target
/// dimensions it is reused, so re-applying the rule is a no-op.
pub(crate) fn fit_to_width(
    source: &Arc<Frame>,
    current: Option<&Arc<Frame>>,
    viewport_width: u32,
    filter: FilterType,
) -> Arc<Frame> {
    if viewport_width <= source.width {
        return Arc::clone(source);
    }

    let (width, height) = scaled_dimensions(source.width, source.height, viewport_width);
    if let Some(current) = current {
        if current.width == width && current.height == height {
            return Arc::clone(current);
        }
    }

    match scale_to_width(source, viewport_width, filter) {
        Ok(scaled) => Arc::new(scaled),
        Err(e) => {
            // Degenerate source; native resolution is still a valid display
            tracing::warn!(error = %e, "failed to scale page, showing it unscaled");
            Arc::clone(source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::solid_frame;

    #[test]
    fn test_wider_viewport_scales_up() {
        let source = Arc::new(solid_frame(100, 150, [9, 9, 9]));
        let shown = fit_to_width(&source, None, 160, FilterType::Bilinear);

        assert_eq!((shown.width, shown.height), (160, 240));
        // Solid color survives interpolation
        assert_eq!(&shown.pixels[0..3], &[9, 9, 9]);
    }

    #[test]
    fn test_narrower_viewport_keeps_native() {
        let source = Arc::new(solid_frame(100, 150, [0, 0, 0]));

        let shown = fit_to_width(&source, None, 60, FilterType::Bilinear);
        assert!(Arc::ptr_eq(&shown, &source));

        let shown = fit_to_width(&source, None, 100, FilterType::Bilinear);
        assert!(Arc::ptr_eq(&shown, &source));
    }

    #[test]
    fn test_reapplying_is_a_no_op() {
        let source = Arc::new(solid_frame(40, 30, [0, 0, 0]));
        let first = fit_to_width(&source, None, 80, FilterType::Bilinear);
        let second = fit_to_width(&source, Some(&first), 80, FilterType::Bilinear);

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_shrinking_back_returns_source() {
        let source = Arc::new(solid_frame(40, 30, [0, 0, 0]));
        let scaled = fit_to_width(&source, None, 80, FilterType::Bilinear);
        let shown = fit_to_width(&source, Some(&scaled), 30, FilterType::Bilinear);

        assert!(Arc::ptr_eq(&shown, &source));
    }

    #[test]
    fn test_degenerate_source_falls_back() {
        let source = Arc::new(Frame::new(0, 0, Vec::new()));
        let shown = fit_to_width(&source, None, 10, FilterType::Bilinear);
        assert!(Arc::ptr_eq(&shown, &source));
    }
}
