//! Page store: the loaded page sequence plus a navigation cursor.
//!
//! The store is a two-state machine, `Empty` or `Loaded(cursor)`. Loading
//! an empty sequence is refused and leaves the store exactly as it was.
//! Navigation clamps at both ends and never wraps around.

use std::sync::Arc;

use crate::decode::Frame;
use crate::ReaderError;

/// Ordered, non-empty list of frames extracted from one archive.
#[derive(Debug, Clone)]
pub struct PageSequence {
    frames: Vec<Arc<Frame>>,
}

impl PageSequence {
    /// Build a sequence, refusing an empty frame list.
    pub fn new(frames: Vec<Arc<Frame>>) -> Result<Self, ReaderError> {
        if frames.is_empty() {
            return Err(ReaderError::EmptySequence);
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Never true for a constructed sequence.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Arc<Frame>] {
        &self.frames
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Frame>> {
        self.frames.get(index)
    }
}

/// Which page `PageStore::current` should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorRequest {
    /// Keep the cursor where it is (restore the last viewed page).
    Keep,
    /// Move the cursor to this index.
    Index(usize),
}

/// Outcome of a `previous`/`next` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor moved by one page.
    Moved,
    /// The cursor was already at the boundary; the same page is returned.
    AtBoundary,
}

/// The page at the cursor.
#[derive(Debug, Clone)]
pub struct PageView {
    pub index: usize,
    pub count: usize,
    pub frame: Arc<Frame>,
}

#[derive(Debug, Clone)]
enum State {
    Empty,
    Loaded { sequence: PageSequence, cursor: usize },
}

/// Holds the pages of one archive and where the reader is in it.
#[derive(Debug, Clone)]
pub struct PageStore {
    state: State,
}

impl Default for PageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PageStore {
    pub fn new() -> Self {
        Self { state: State::Empty }
    }

    /// Create a store already loaded with `sequence`, cursor at 0.
    pub fn with_sequence(sequence: PageSequence) -> Self {
        Self {
            state: State::Loaded {
                sequence,
                cursor: 0,
            },
        }
    }

    /// Load a frame list, placing the cursor on the first page.
    ///
    /// Returns the page count.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::EmptySequence` for an empty list; the store
    /// keeps its previous state.
    pub fn load(&mut self, frames: Vec<Arc<Frame>>) -> Result<usize, ReaderError> {
        let sequence = PageSequence::new(frames)?;
        Ok(self.install(sequence))
    }

    /// Install an already-validated sequence, cursor at 0.
    pub fn install(&mut self, sequence: PageSequence) -> usize {
        let count = sequence.len();
        self.state = State::Loaded {
            sequence,
            cursor: 0,
        };
        count
    }

    /// Drop the loaded sequence.
    pub fn unload(&mut self) {
        self.state = State::Empty;
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded { .. })
    }

    /// Number of pages, 0 when empty.
    pub fn len(&self) -> usize {
        match &self.state {
            State::Empty => 0,
            State::Loaded { sequence, .. } => sequence.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursor position, `None` when empty.
    pub fn cursor(&self) -> Option<usize> {
        match self.state {
            State::Empty => None,
            State::Loaded { cursor, .. } => Some(cursor),
        }
    }

    /// Return the page at the cursor, optionally moving the cursor first.
    ///
    /// Returns `Ok(None)` when the store is empty.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::PageOutOfRange` for an index past the end; the
    /// cursor is left unchanged.
    pub fn current(&mut self, request: CursorRequest) -> Result<Option<PageView>, ReaderError> {
        let State::Loaded { sequence, cursor } = &mut self.state else {
            return Ok(None);
        };

        if let CursorRequest::Index(index) = request {
            if index >= sequence.len() {
                return Err(ReaderError::PageOutOfRange {
                    index,
                    count: sequence.len(),
                });
            }
            *cursor = index;
        }

        Ok(Some(view(sequence, *cursor)))
    }

    /// Step back one page, clamping at the first page.
    pub fn previous(&mut self) -> Option<(PageView, Navigation)> {
        let State::Loaded { sequence, cursor } = &mut self.state else {
            return None;
        };

        let nav = if *cursor == 0 {
            Navigation::AtBoundary
        } else {
            *cursor -= 1;
            Navigation::Moved
        };

        Some((view(sequence, *cursor), nav))
    }

    /// Step forward one page, clamping at the last page.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(PageView, Navigation)> {
        let State::Loaded { sequence, cursor } = &mut self.state else {
            return None;
        };

        let nav = if *cursor + 1 >= sequence.len() {
            Navigation::AtBoundary
        } else {
            *cursor += 1;
            Navigation::Moved
        };

        Some((view(sequence, *cursor), nav))
    }
}

fn view(sequence: &PageSequence, cursor: usize) -> PageView {
    PageView {
        index: cursor,
        count: sequence.len(),
        frame: Arc::clone(&sequence.frames[cursor]),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
