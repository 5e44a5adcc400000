//! Page decoding for Comicshelf.
//!
//! This module provides functionality for:
//! - Decoding still pages (JPEG, plus any configured extra static format)
//! - Expanding animated GIFs into one frame per embedded image
//! - Scaling frames for the viewport
//!
//! # Architecture
//!
//! Decoding is synchronous and single-threaded. A host that wants a
//! responsive UI runs extraction on a worker and hands the resulting
//! frames back; frames are immutable and cheap to share.

mod animated;
mod orientation;
mod resize;
mod still;
mod types;

pub use animated::decode_animated;
pub use resize::{resize, scale_to_width};
pub use still::decode_still;
pub use types::{DecodeError, DecodeOptions, FilterType, Frame};

pub(crate) use resize::scaled_dimensions;

use crate::selector::{EntryKind, SelectedEntry};

/// Decode one selected entry into its ordered list of frames.
///
/// Still entries yield exactly one frame; animated entries yield every
/// embedded frame in encoded order (possibly none).
pub fn decode_entry(
    entry: &SelectedEntry<'_>,
    options: &DecodeOptions,
) -> Result<Vec<Frame>, DecodeError> {
    match entry.kind {
        EntryKind::Static => decode_still(&entry.entry.content, options).map(|frame| vec![frame]),
        EntryKind::Animated => decode_animated(&entry.entry.content),
    }
}
