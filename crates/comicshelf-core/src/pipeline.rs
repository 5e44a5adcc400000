//! Extraction pipeline: archive entries in, ordered page sequence out.
//!
//! Selection and decoding run back to back. A page that fails to decode is
//! recorded in the [`ExtractionReport`] and skipped; only sequence-level
//! failures (nothing selectable, nothing decodable) reach the caller as
//! errors.

use std::sync::Arc;

use crate::archive::Entry;
use crate::decode::{decode_entry, DecodeError, Frame};
use crate::selector::select_entries;
use crate::store::PageSequence;
use crate::{ReaderConfig, ReaderError};

/// A single entry that could not be turned into pages.
#[derive(Debug)]
pub struct DecodeFailure {
    /// Entry name inside the archive.
    pub entry: String,
    pub source: DecodeError,
}

/// What happened while extracting one archive.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// Number of entries that passed selection.
    pub selected: usize,
    /// Entries skipped because their bytes failed to decode.
    pub skipped: Vec<DecodeFailure>,
}

/// The result of a successful extraction.
#[derive(Debug)]
pub struct Extraction {
    pub sequence: PageSequence,
    pub report: ExtractionReport,
}

/// Select, order and decode the pages of one archive.
///
/// Frames of an animated entry are inserted contiguously, in embedded
/// order, before the frames of the next entry.
///
/// # Errors
///
/// Returns `ReaderError::EmptySequence` if no entry is selectable or every
/// selected entry decoded to zero frames.
pub fn extract_pages(entries: &[Entry], config: &ReaderConfig) -> Result<Extraction, ReaderError> {
    let selected = select_entries(entries, &config.selector)?;

    let mut frames: Vec<Arc<Frame>> = Vec::new();
    let mut report = ExtractionReport {
        selected: selected.len(),
        skipped: Vec::new(),
    };

    for entry in &selected {
        match decode_entry(entry, &config.decode) {
            Ok(decoded) => {
                tracing::debug!(entry = entry.name(), frames = decoded.len(), "decoded entry");
                frames.extend(decoded.into_iter().map(Arc::new));
            }
            Err(source) => {
                tracing::warn!(entry = entry.name(), error = %source, "skipping undecodable entry");
                report.skipped.push(DecodeFailure {
                    entry: entry.name().to_string(),
                    source,
                });
            }
        }
    }

    let sequence = PageSequence::new(frames)?;
    Ok(Extraction { sequence, report })
}
