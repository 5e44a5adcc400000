//! Comicshelf Core - comic book reader library
//!
//! This crate provides the reading pipeline for Comicshelf: opening
//! `.cbz`/`.cbr`/`.nhlcomic` archives, selecting and decoding page images,
//! navigating the resulting page sequence, and computing how the current
//! page is scaled and panned inside a viewport.

pub mod archive;
pub mod decode;
pub mod library;
pub mod pipeline;
pub mod selector;
pub mod store;
pub mod viewport;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use archive::{ArchiveError, ArchiveKind, ArchiveReader, ArchiveRegistry, Entry, ZipReader};
pub use decode::{DecodeError, DecodeOptions, FilterType, Frame};
pub use library::Library;
pub use pipeline::{extract_pages, DecodeFailure, Extraction, ExtractionReport};
pub use selector::{select_entries, EntryKind, SelectedEntry, SelectorConfig};
pub use store::{CursorRequest, Navigation, PageSequence, PageStore, PageView};
pub use viewport::{HorizontalClampReference, Viewport, ViewportConfig, ViewportState};

/// Errors surfaced by the reader pipeline.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The file suffix does not name a known archive kind, or no reader
    /// is registered for it.
    #[error("Unsupported archive format: {0}")]
    UnsupportedFormat(String),

    /// The archive could not be opened or its structure is broken.
    #[error("Failed to open archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: ArchiveError,
    },

    /// No entry produced a page.
    #[error("Archive contains no readable pages")]
    EmptySequence,

    #[error("Page {index} out of range (book has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },
}

/// Reader settings, usually deserialized from a host-provided JSON object.
///
/// Every field is optional when deserializing; missing fields take their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub selector: SelectorConfig,
    pub decode: DecodeOptions,
    pub viewport: ViewportConfig,
}
