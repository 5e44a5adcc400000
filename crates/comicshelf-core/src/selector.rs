//! Entry selection: which archive entries become pages, and in what order.
//!
//! Entries are kept when their name ends with a recognized suffix and are
//! ordered by a plain codepoint comparison of their names, so the page
//! order never depends on the order the container happened to store them.

use serde::{Deserialize, Serialize};

use crate::archive::Entry;
use crate::ReaderError;

const STATIC_SUFFIXES: [&str; 2] = [".jpg", ".jpeg"];
const ANIMATED_SUFFIX: &str = ".gif";

/// How a selected entry is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// One still raster, one page.
    Static,
    /// A GIF whose every embedded frame becomes a page.
    Animated,
}

/// Selector configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Additional suffixes (including the dot, e.g. `".png"`) decoded as
    /// still pages alongside `.jpg`/`.jpeg`.
    pub extra_static_suffixes: Vec<String>,
}

impl SelectorConfig {
    /// Classify an entry name, or `None` when it is not a page.
    pub fn classify(&self, name: &str) -> Option<EntryKind> {
        if name.ends_with('/') {
            return None;
        }

        if name.ends_with(ANIMATED_SUFFIX) {
            return Some(EntryKind::Animated);
        }

        let is_static = STATIC_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
            || self
                .extra_static_suffixes
                .iter()
                .any(|suffix| !suffix.is_empty() && name.ends_with(suffix.as_str()));

        is_static.then_some(EntryKind::Static)
    }
}

/// An entry chosen for decoding, borrowed from the caller's list.
#[derive(Debug, Clone, Copy)]
pub struct SelectedEntry<'a> {
    pub entry: &'a Entry,
    pub kind: EntryKind,
}

impl SelectedEntry<'_> {
    pub fn name(&self) -> &str {
        &self.entry.name
    }
}

/// Filter `entries` down to page entries sorted ascending by name.
///
/// The input slice is left untouched.
///
/// # Errors
///
/// Returns `ReaderError::EmptySequence` when no entry qualifies.
pub fn select_entries<'a>(
    entries: &'a [Entry],
    config: &SelectorConfig,
) -> Result<Vec<SelectedEntry<'a>>, ReaderError> {
    let mut selected: Vec<SelectedEntry<'a>> = entries
        .iter()
        .filter_map(|entry| {
            config
                .classify(&entry.name)
                .map(|kind| SelectedEntry { entry, kind })
        })
        .collect();

    if selected.is_empty() {
        return Err(ReaderError::EmptySequence);
    }

    selected.sort_by(|a, b| a.entry.name.cmp(&b.entry.name));
    Ok(selected)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn name_strategy() -> impl Strategy<Value = String> {
        ("[a-zA-Z0-9_/]{0,8}", prop::sample::select(vec![".jpg", ".jpeg", ".gif", ".txt", ".xml"]))
            .prop_map(|(stem, ext)| format!("{}{}", stem, ext))
    }

    proptest! {
        /// Property: selection is sorted, and contains exactly the page entries.
        #[test]
        fn prop_selection_sorted_and_complete(names in prop::collection::vec(name_strategy(), 0..20)) {
            let input: Vec<Entry> = names.iter().map(|n| Entry::new(n.clone(), Vec::new())).collect();
            let config = SelectorConfig::default();
            let expected = input.iter().filter(|e| config.classify(&e.name).is_some()).count();

            match select_entries(&input, &config) {
                Ok(selected) => {
                    prop_assert_eq!(selected.len(), expected);
                    for pair in selected.windows(2) {
                        prop_assert!(pair[0].name() <= pair[1].name());
                    }
                }
                Err(ReaderError::EmptySequence) => prop_assert_eq!(expected, 0),
                Err(e) => prop_assert!(false, "unexpected error {:?}", e),
            }
        }
    }
}
