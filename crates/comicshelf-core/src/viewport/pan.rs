//! Pan clamping.
//!
//! An axis offset is first raised to its lower bound
//! `viewport - content - margin`, then capped at 0. When the content is
//! smaller than the viewport the lower bound is positive and the offset
//! ends up at 0.

use serde::{Deserialize, Serialize};

/// Which source dimension the horizontal "no panning needed" test uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalClampReference {
    /// Lock horizontal pan when the viewport is wider than the source *height*.
    #[default]
    SourceHeight,
    /// Lock horizontal pan when the viewport is wider than the source width.
    SourceWidth,
}

/// Clamp one axis offset into `[viewport - content - margin, 0]`.
pub(crate) fn clamp_axis(offset: i32, viewport: u32, content: u32, margin: u32) -> i32 {
    let lower = viewport as i64 - content as i64 - margin as i64;
    (offset as i64).max(lower).min(0) as i32
}

/// Clamp the horizontal offset.
///
/// `source_width`/`source_height` are the native page dimensions; the
/// horizontal bound is computed from the native width even when the page
/// is displayed scaled.
pub(crate) fn clamp_x(
    offset: i32,
    viewport_width: u32,
    source_width: u32,
    source_height: u32,
    margin: u32,
    reference: HorizontalClampReference,
) -> i32 {
    let locked_above = match reference {
        HorizontalClampReference::SourceHeight => source_height,
        HorizontalClampReference::SourceWidth => source_width,
    };

    if viewport_width > locked_above {
        0
    } else {
        clamp_axis(offset, viewport_width, source_width, margin)
    }
}

/// Clamp the vertical offset against the displayed bitmap height.
pub(crate) fn clamp_y(offset: i32, viewport_height: u32, displayed_height: u32, margin: u32) -> i32 {
    clamp_axis(offset, viewport_height, displayed_height, margin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_axis_within_range() {
        assert_eq!(clamp_axis(-100, 800, 1750, 25), -100);
    }

    #[test]
    fn test_clamp_axis_lower_bound() {
        // 800 - 1750 - 25 = -975
        assert_eq!(clamp_axis(-2000, 800, 1750, 25), -975);
    }

    #[test]
    fn test_clamp_axis_never_positive() {
        assert_eq!(clamp_axis(40, 800, 1750, 25), 0);
    }

    #[test]
    fn test_clamp_axis_small_content_pins_zero() {
        // Lower bound 800 - 300 - 25 = 475 > 0
        assert_eq!(clamp_axis(-10, 800, 300, 25), 0);
        assert_eq!(clamp_axis(10, 800, 300, 25), 0);
    }

    #[test]
    fn test_clamp_axis_extremes_do_not_overflow() {
        assert_eq!(clamp_axis(i32::MIN, 0, u32::MAX, 25), i32::MIN);
        assert_eq!(clamp_axis(i32::MIN, 0, 10, u32::MAX), i32::MIN);
    }

    #[test]
    fn test_clamp_x_locked_by_height() {
        // Viewport 1200 wide, page 2000x1000: 1200 > 1000 so x is locked
        let x = clamp_x(-300, 1200, 2000, 1000, 25, HorizontalClampReference::SourceHeight);
        assert_eq!(x, 0);

        // The width-based reference lets it pan instead
        let x = clamp_x(-300, 1200, 2000, 1000, 25, HorizontalClampReference::SourceWidth);
        assert_eq!(x, -300);
    }

    #[test]
    fn test_clamp_x_bounded_by_native_width() {
        let x = clamp_x(-5000, 800, 1750, 900, 25, HorizontalClampReference::SourceHeight);
        assert_eq!(x, -975);
    }

    #[test]
    fn test_clamp_y_uses_margin() {
        assert_eq!(clamp_y(-1000, 600, 900, 25), -325);
        assert_eq!(clamp_y(-1000, 600, 900, 0), -300);
    }

    #[test]
    fn test_reference_serde_names() {
        let r: HorizontalClampReference = serde_json::from_str("\"source_width\"").unwrap();
        assert_eq!(r, HorizontalClampReference::SourceWidth);
    }
}
