//! Library: decode-on-first-open cache of page stores keyed by archive path.
//!
//! Opening a book the first time extracts it; later opens reuse the cached
//! store, including its cursor, so the reader resumes on the last viewed
//! page. Nothing is evicted automatically.

use std::collections::{hash_map, HashMap};
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveKind, ArchiveReader, ArchiveRegistry};
use crate::pipeline::{extract_pages, ExtractionReport};
use crate::store::PageStore;
use crate::{ReaderConfig, ReaderError};

/// Cache of loaded books.
#[derive(Debug)]
pub struct Library {
    config: ReaderConfig,
    registry: ArchiveRegistry,
    books: HashMap<PathBuf, PageStore>,
}

impl Default for Library {
    fn default() -> Self {
        Self::new(ReaderConfig::default())
    }
}

impl Library {
    /// A library using the built-in archive readers.
    pub fn new(config: ReaderConfig) -> Self {
        Self::with_registry(config, ArchiveRegistry::with_defaults())
    }

    pub fn with_registry(config: ReaderConfig, registry: ArchiveRegistry) -> Self {
        Self {
            config,
            registry,
            books: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Install (or replace) the reader for a container kind.
    pub fn register_reader(&mut self, kind: ArchiveKind, reader: impl ArchiveReader + 'static) {
        self.registry.register(kind, reader);
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.books.contains_key(path)
    }

    /// Number of cached books.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Open a book, extracting it only if it is not cached yet.
    ///
    /// The returned report is `None` when the cached store was reused.
    pub fn open(
        &mut self,
        path: &Path,
    ) -> Result<(&mut PageStore, Option<ExtractionReport>), ReaderError> {
        match self.books.entry(path.to_path_buf()) {
            hash_map::Entry::Occupied(cached) => {
                tracing::debug!(path = %path.display(), "reusing cached book");
                Ok((cached.into_mut(), None))
            }
            hash_map::Entry::Vacant(slot) => {
                let (store, report) = extract_book(&self.registry, &self.config, path)?;
                Ok((slot.insert(store), Some(report)))
            }
        }
    }

    /// Extract a book and replace any cached copy, resetting its cursor.
    ///
    /// On failure the previously cached copy (if any) is left untouched.
    pub fn reload(&mut self, path: &Path) -> Result<ExtractionReport, ReaderError> {
        let (store, report) = extract_book(&self.registry, &self.config, path)?;
        self.books.insert(path.to_path_buf(), store);
        Ok(report)
    }

    /// Access a cached book without extracting.
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut PageStore> {
        self.books.get_mut(path)
    }

    /// Remove a book from the cache. Returns whether it was cached.
    pub fn evict(&mut self, path: &Path) -> bool {
        let evicted = self.books.remove(path).is_some();
        if evicted {
            tracing::info!(path = %path.display(), "evicted book");
        }
        evicted
    }
}

fn extract_book(
    registry: &ArchiveRegistry,
    config: &ReaderConfig,
    path: &Path,
) -> Result<(PageStore, ExtractionReport), ReaderError> {
    let entries = registry.open(path)?;
    let extraction = extract_pages(&entries, config)?;

    tracing::info!(
        path = %path.display(),
        pages = extraction.sequence.len(),
        skipped = extraction.report.skipped.len(),
        "loaded book"
    );

    Ok((PageStore::with_sequence(extraction.sequence), extraction.report))
}
