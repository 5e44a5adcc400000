//! Archive containers and the capability that opens them.
//!
//! ## Architecture
//!
//! Each container format is one [`ArchiveReader`] implementation that turns
//! a path into a flat list of [`Entry`] values. The extraction pipeline
//! never sees which reader produced the entries.
//!
//! - `.cbz` / `.nhlcomic` are ZIP containers, read by [`ZipReader`]
//! - `.cbr` is a RAR container; no reader ships with the core, hosts plug
//!   one in through [`ArchiveRegistry::register`]

mod zip;

pub use self::zip::ZipReader;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::ReaderError;

/// Errors produced while opening an archive container.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The container structure is damaged or uses unsupported features.
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),
}

/// One named byte stream inside an archive.
#[derive(Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path of the entry inside the archive.
    pub name: String,
    /// Uncompressed entry bytes.
    pub content: Vec<u8>,
}

impl Entry {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .finish()
    }
}

/// Container format of a comic archive, derived from its file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    /// `.cbz` and `.nhlcomic`
    Zip,
    /// `.cbr`
    Rar,
}

impl ArchiveKind {
    /// Determine the container kind from a path's suffix.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;

        if name.ends_with(".cbz") || name.ends_with(".nhlcomic") {
            Some(ArchiveKind::Zip)
        } else if name.ends_with(".cbr") {
            Some(ArchiveKind::Rar)
        } else {
            None
        }
    }
}

/// Whether a path looks like a comic archive the reader recognizes.
///
/// Intended as the filter for a host's directory walk.
pub fn is_supported_archive(path: &Path) -> bool {
    ArchiveKind::from_path(path).is_some()
}

/// Capability that lists the entries of one container format.
///
/// Readers are `Send + Sync` so a [`crate::Library`] can move to a worker thread.
pub trait ArchiveReader: Send + Sync {
    /// Read every file entry of the archive at `path`.
    ///
    /// Entry order is irrelevant; the selector imposes its own.
    fn open_entries(&self, path: &Path) -> Result<Vec<Entry>, ArchiveError>;
}

/// Maps container kinds to the readers able to open them.
#[derive(Default)]
pub struct ArchiveRegistry {
    readers: HashMap<ArchiveKind, Box<dyn ArchiveReader>>,
}

impl ArchiveRegistry {
    /// An empty registry; every archive is unsupported until a reader is registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in ZIP reader.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ArchiveKind::Zip, ZipReader);
        registry
    }

    /// Install (or replace) the reader for `kind`.
    pub fn register(&mut self, kind: ArchiveKind, reader: impl ArchiveReader + 'static) {
        self.readers.insert(kind, Box::new(reader));
    }

    pub fn supports(&self, kind: ArchiveKind) -> bool {
        self.readers.contains_key(&kind)
    }

    /// Open the archive at `path` with the reader registered for its kind.
    ///
    /// # Errors
    ///
    /// - `ReaderError::UnsupportedFormat` if the suffix is unknown or no
    ///   reader is registered for the kind
    /// - `ReaderError::Archive` if the reader fails
    pub fn open(&self, path: &Path) -> Result<Vec<Entry>, ReaderError> {
        let kind = ArchiveKind::from_path(path)
            .ok_or_else(|| ReaderError::UnsupportedFormat(path.display().to_string()))?;

        let reader = self.readers.get(&kind).ok_or_else(|| {
            ReaderError::UnsupportedFormat(format!("no reader registered for {:?} archives", kind))
        })?;

        reader
            .open_entries(path)
            .map_err(|source| ReaderError::Archive {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl fmt::Debug for ArchiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveRegistry")
            .field("kinds", &self.readers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct FixedReader(Vec<Entry>);

    impl ArchiveReader for FixedReader {
        fn open_entries(&self, _path: &Path) -> Result<Vec<Entry>, ArchiveError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(ArchiveKind::from_path(Path::new("a/b.cbz")), Some(ArchiveKind::Zip));
        assert_eq!(
            ArchiveKind::from_path(Path::new("issue.nhlcomic")),
            Some(ArchiveKind::Zip)
        );
        assert_eq!(ArchiveKind::from_path(Path::new("x.cbr")), Some(ArchiveKind::Rar));
        assert_eq!(ArchiveKind::from_path(Path::new("x.zip")), None);
        assert_eq!(ArchiveKind::from_path(Path::new("x.CBZ")), None);
        assert_eq!(ArchiveKind::from_path(Path::new("")), None);
    }

    #[test]
    fn test_is_supported_archive() {
        assert!(is_supported_archive(Path::new("/comics/saga-01.cbz")));
        assert!(!is_supported_archive(Path::new("/comics/cover.jpg")));
    }

    #[test]
    fn test_unknown_suffix_is_unsupported() {
        let registry = ArchiveRegistry::with_defaults();
        let result = registry.open(Path::new("notes.txt"));
        assert!(matches!(result, Err(ReaderError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_rar_without_reader_is_unsupported() {
        let registry = ArchiveRegistry::with_defaults();
        assert!(registry.supports(ArchiveKind::Zip));
        assert!(!registry.supports(ArchiveKind::Rar));

        let result = registry.open(Path::new("book.cbr"));
        assert!(matches!(result, Err(ReaderError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_registered_reader_is_used() {
        let mut registry = ArchiveRegistry::new();
        registry.register(
            ArchiveKind::Rar,
            FixedReader(vec![Entry::new("p1.jpg", vec![1, 2, 3])]),
        );

        let entries = registry.open(Path::new("book.cbr")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "p1.jpg");
    }

    #[test]
    fn test_missing_file_maps_to_archive_error() {
        let registry = ArchiveRegistry::with_defaults();
        let path = PathBuf::from("/definitely/not/here/book.cbz");

        match registry.open(&path) {
            Err(ReaderError::Archive { path: p, source }) => {
                assert_eq!(p, path);
                assert!(matches!(source, ArchiveError::Io(_)));
            }
            other => panic!("Expected archive error, got {:?}", other),
        }
    }

    #[test]
    fn test_entry_debug_omits_bytes() {
        let entry = Entry::new("a.jpg", vec![0u8; 4096]);
        assert_eq!(format!("{:?}", entry), "Entry { name: \"a.jpg\", len: 4096 }");
    }
}
