//! Viewport transform engine: what bitmap to paint, and where.
//!
//! The viewport owns a [`ViewportState`] and reacts to host events one at
//! a time:
//!
//! - `set_frame` makes a page active (pan resets when the page changes)
//! - `resize` re-applies the scale rule and re-clamps the existing pan
//! - `drag` / `press` + `drag_to` move the pan, clamped after every step
//!
//! # Coordinate System
//!
//! Pan offsets are in display units relative to the top-left corner of the
//! viewport. Offsets are never positive: panning reveals content to the
//! right of and below the viewport, with at most `pan_margin` units of
//! empty space beyond the page edge.

mod pan;
mod scale;

pub use pan::HorizontalClampReference;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::decode::{FilterType, Frame};

/// Default empty space allowed beyond the page edge while panning.
pub const DEFAULT_PAN_MARGIN: u32 = 25;

/// Viewport configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Empty space (display units) allowed beyond a page edge.
    pub pan_margin: u32,
    /// Interpolation used when a page is scaled up to the viewport width.
    pub scale_filter: FilterType,
    /// Source dimension compared against the viewport width to lock horizontal pan.
    pub horizontal_clamp: HorizontalClampReference,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            pan_margin: DEFAULT_PAN_MARGIN,
            scale_filter: FilterType::Bilinear,
            horizontal_clamp: HorizontalClampReference::SourceHeight,
        }
    }
}

/// Everything the host needs to paint the current page.
#[derive(Debug, Clone, Default)]
pub struct ViewportState {
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// The active page at native resolution.
    pub source_frame: Option<Arc<Frame>>,
    /// The bitmap to paint; the source itself when no scaling applies.
    pub displayed_bitmap: Option<Arc<Frame>>,
    pub pan_x: i32,
    pub pan_y: i32,
}

/// Scale and pan engine for one on-screen viewport.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    config: ViewportConfig,
    state: ViewportState,
    /// Last pointer position seen by `press`/`drag_to`.
    anchor: Option<(i32, i32)>,
}

impl Viewport {
    pub fn new(config: ViewportConfig, width: u32, height: u32) -> Self {
        Self {
            config,
            state: ViewportState {
                viewport_width: width,
                viewport_height: height,
                ..Default::default()
            },
            anchor: None,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn size(&self) -> (u32, u32) {
        (self.state.viewport_width, self.state.viewport_height)
    }

    pub fn pan(&self) -> (i32, i32) {
        (self.state.pan_x, self.state.pan_y)
    }

    pub fn source(&self) -> Option<&Arc<Frame>> {
        self.state.source_frame.as_ref()
    }

    pub fn displayed(&self) -> Option<&Arc<Frame>> {
        self.state.displayed_bitmap.as_ref()
    }

    /// Make `frame` the active page.
    ///
    /// A different page resets the pan to `(0, 0)`; handing back the page
    /// that is already active (e.g. after a clamped navigation step) keeps
    /// the current pan.
    pub fn set_frame(&mut self, frame: Arc<Frame>) {
        if self
            .state
            .source_frame
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &frame))
        {
            return;
        }

        let displayed = scale::fit_to_width(
            &frame,
            None,
            self.state.viewport_width,
            self.config.scale_filter,
        );

        self.state.source_frame = Some(frame);
        self.state.displayed_bitmap = Some(displayed);
        self.state.pan_x = 0;
        self.state.pan_y = 0;
        tracing::trace!("viewport page changed");
    }

    /// Drop the active page, e.g. when the reader closes the book.
    pub fn clear(&mut self) {
        self.state.source_frame = None;
        self.state.displayed_bitmap = None;
        self.state.pan_x = 0;
        self.state.pan_y = 0;
        self.anchor = None;
    }

    /// Apply a new viewport size.
    ///
    /// The scale rule is re-evaluated and the existing pan is re-clamped
    /// against the new size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.state.viewport_width = width;
        self.state.viewport_height = height;

        let Some(source) = self.state.source_frame.as_ref() else {
            return;
        };

        let displayed = scale::fit_to_width(
            source,
            self.state.displayed_bitmap.as_ref(),
            width,
            self.config.scale_filter,
        );
        self.state.displayed_bitmap = Some(displayed);
        self.clamp_pan();
    }

    /// Add a drag delta to the pan and clamp it.
    pub fn drag(&mut self, dx: i32, dy: i32) {
        if self.state.source_frame.is_none() {
            return;
        }

        self.state.pan_x = self.state.pan_x.saturating_add(dx);
        self.state.pan_y = self.state.pan_y.saturating_add(dy);
        self.clamp_pan();
    }

    /// Record the pointer position where a drag starts.
    pub fn press(&mut self, x: i32, y: i32) {
        self.anchor = Some((x, y));
    }

    /// Pan by the pointer movement since the last `press`/`drag_to`.
    ///
    /// Without a preceding `press` the first call only sets the anchor.
    pub fn drag_to(&mut self, x: i32, y: i32) {
        let (ax, ay) = self.anchor.unwrap_or((x, y));
        self.anchor = Some((x, y));
        self.drag(x.saturating_sub(ax), y.saturating_sub(ay));
    }

    /// End the current pointer drag.
    pub fn release(&mut self) {
        self.anchor = None;
    }

    fn clamp_pan(&mut self) {
        let (Some(source), Some(displayed)) =
            (&self.state.source_frame, &self.state.displayed_bitmap)
        else {
            return;
        };

        let margin = self.config.pan_margin;
        let pan_x = pan::clamp_x(
            self.state.pan_x,
            self.state.viewport_width,
            source.width,
            source.height,
            margin,
            self.config.horizontal_clamp,
        );
        let pan_y = pan::clamp_y(
            self.state.pan_y,
            self.state.viewport_height,
            displayed.height,
            margin,
        );

        self.state.pan_x = pan_x;
        self.state.pan_y = pan_y;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::test_support::solid_frame;
    use proptest::prelude::*;

    /// Page and viewport dimensions (kept small so scaling stays fast).
    fn dims_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=120, 1u32..=120)
    }

    fn drags_strategy() -> impl Strategy<Value = Vec<(i32, i32)>> {
        prop::collection::vec((-300i32..=300, -300i32..=300), 0..25)
    }

    /// Offset lies in `[lower, 0]`, or is pinned to 0 when that range is empty.
    fn within(offset: i32, viewport: u32, content: u32) -> bool {
        let lower = viewport as i64 - content as i64 - DEFAULT_PAN_MARGIN as i64;
        offset <= 0 && (offset as i64 >= lower || (lower > 0 && offset == 0))
    }

    proptest! {
        /// Property: the displayed bitmap is never smaller than the native page.
        #[test]
        fn prop_never_downscaled(
            (sw, sh) in dims_strategy(),
            (vw, vh) in dims_strategy(),
        ) {
            let source = Arc::new(solid_frame(sw, sh, [1, 2, 3]));
            let mut vp = Viewport::new(ViewportConfig::default(), vw, vh);
            vp.set_frame(Arc::clone(&source));
            let shown = vp.displayed().unwrap();

            prop_assert!(shown.width >= sw);
            prop_assert!(shown.height >= sh);

            if vw > sw {
                prop_assert_eq!(shown.width, vw);
                prop_assert_eq!(shown.height, (sh as u64 * vw as u64 / sw as u64).max(1) as u32);
            } else {
                prop_assert!(Arc::ptr_eq(shown, &source));
            }
        }

        /// Property: pan stays inside the margin after any drag sequence and resize.
        #[test]
        fn prop_pan_stays_clamped(
            (sw, sh) in dims_strategy(),
            (vw, vh) in dims_strategy(),
            (rw, rh) in dims_strategy(),
            drags in drags_strategy(),
        ) {
            let mut vp = Viewport::new(ViewportConfig::default(), vw, vh);
            vp.set_frame(Arc::new(solid_frame(sw, sh, [0, 0, 0])));

            for (i, (dx, dy)) in drags.into_iter().enumerate() {
                if i == 5 {
                    vp.resize(rw, rh);
                }
                vp.drag(dx, dy);

                let (w, h) = vp.size();
                let (px, py) = vp.pan();
                let displayed_h = vp.displayed().unwrap().height;

                prop_assert!(within(py, h, displayed_h), "pan_y {} out of range", py);
                if w > sh {
                    prop_assert_eq!(px, 0);
                } else {
                    prop_assert!(within(px, w, sw), "pan_x {} out of range", px);
                }
            }
        }

        /// Property: re-applying a resize to the same size changes nothing.
        #[test]
        fn prop_resize_idempotent(
            (sw, sh) in dims_strategy(),
            (vw, vh) in dims_strategy(),
            (dx, dy) in (-300i32..=300, -300i32..=300),
        ) {
            let mut vp = Viewport::new(ViewportConfig::default(), vw, vh);
            vp.set_frame(Arc::new(solid_frame(sw, sh, [0, 0, 0])));
            vp.drag(dx, dy);

            let before_bitmap = Arc::clone(vp.displayed().unwrap());
            let before_pan = vp.pan();
            vp.resize(vw, vh);

            prop_assert!(Arc::ptr_eq(vp.displayed().unwrap(), &before_bitmap));
            prop_assert_eq!(vp.pan(), before_pan);
        }
    }
}
