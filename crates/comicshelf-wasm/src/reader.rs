//! Book reader WASM bindings.
//!
//! [`JsBookReader`] ties one page store to one viewport. Every navigation
//! call hands the resulting page to the viewport, so after any call the
//! host only needs `displayed()` and `pan()` to repaint.
//!
//! # Example
//!
//! ```typescript
//! import { JsBookReader } from '@comicshelf/wasm';
//!
//! const reader = new JsBookReader({ viewport: { pan_margin: 25 } }, canvas.width, canvas.height);
//! const summary = reader.load_zip('saga.cbz', new Uint8Array(await file.arrayBuffer()));
//! console.log(`Loaded ${summary.pages} pages`);
//!
//! reader.next();
//! const frame = reader.displayed();
//! const [x, y] = reader.pan();
//! ```

use std::path::PathBuf;

use comicshelf_core::{
    extract_pages, CursorRequest, Entry, Navigation, PageStore, PageView, ReaderConfig,
    ReaderError, Viewport, ZipReader,
};
use wasm_bindgen::prelude::*;

use crate::types::{JsFrame, LoadSummary, SkippedEntry};

/// Reader state without any JavaScript types, so it can be driven natively.
#[derive(Debug)]
pub(crate) struct Session {
    config: ReaderConfig,
    store: PageStore,
    viewport: Viewport,
}

impl Session {
    pub(crate) fn new(config: ReaderConfig, width: u32, height: u32) -> Self {
        let viewport = Viewport::new(config.viewport.clone(), width, height);
        Self {
            config,
            store: PageStore::new(),
            viewport,
        }
    }

    /// Read a ZIP container from memory and load its pages.
    pub(crate) fn load_zip(&mut self, name: &str, bytes: &[u8]) -> Result<LoadSummary, ReaderError> {
        let entries = ZipReader::read_entries(bytes).map_err(|source| ReaderError::Archive {
            path: PathBuf::from(name),
            source,
        })?;

        let summary = self.load_entries(&entries)?;
        tracing::info!(
            name,
            pages = summary.pages,
            skipped = summary.skipped.len(),
            "loaded book"
        );
        Ok(summary)
    }

    /// Load already-extracted entries, replacing the current book.
    ///
    /// On error the current book and viewport are left untouched.
    pub(crate) fn load_entries(&mut self, entries: &[Entry]) -> Result<LoadSummary, ReaderError> {
        let extraction = extract_pages(entries, &self.config)?;

        let summary = LoadSummary {
            pages: extraction.sequence.len(),
            selected: extraction.report.selected,
            skipped: extraction
                .report
                .skipped
                .into_iter()
                .map(|failure| SkippedEntry {
                    entry: failure.entry,
                    reason: failure.source.to_string(),
                })
                .collect(),
        };

        self.store.install(extraction.sequence);
        let first = self.store.current(CursorRequest::Keep)?;
        self.show(first);
        Ok(summary)
    }

    pub(crate) fn page_count(&self) -> usize {
        self.store.len()
    }

    pub(crate) fn page_index(&self) -> Option<usize> {
        self.store.cursor()
    }

    pub(crate) fn previous(&mut self) -> Option<(usize, Navigation)> {
        let (page, nav) = self.store.previous()?;
        Some((self.show_page(page), nav))
    }

    pub(crate) fn next(&mut self) -> Option<(usize, Navigation)> {
        let (page, nav) = self.store.next()?;
        Some((self.show_page(page), nav))
    }

    pub(crate) fn select(&mut self, request: CursorRequest) -> Result<Option<usize>, ReaderError> {
        let page = self.store.current(request)?;
        Ok(self.show(page))
    }

    pub(crate) fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub(crate) fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub(crate) fn close(&mut self) {
        self.store.unload();
        self.viewport.clear();
    }

    fn show(&mut self, page: Option<PageView>) -> Option<usize> {
        page.map(|page| self.show_page(page))
    }

    fn show_page(&mut self, page: PageView) -> usize {
        self.viewport.set_frame(page.frame);
        page.index
    }
}

/// A comic book reader: one loaded book plus its viewport.
#[wasm_bindgen]
pub struct JsBookReader {
    session: Session,
}

#[wasm_bindgen]
impl JsBookReader {
    /// Create a reader for a viewport of `width` x `height` display units.
    ///
    /// # Arguments
    /// * `config` - Reader configuration object, or `undefined` for defaults
    ///
    /// # Errors
    /// Returns error if the config object cannot be deserialized
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, width: u32, height: u32) -> Result<JsBookReader, JsValue> {
        let config: ReaderConfig = if config.is_undefined() || config.is_null() {
            ReaderConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid reader config: {}", e)))?
        };

        Ok(JsBookReader {
            session: Session::new(config, width, height),
        })
    }

    /// Load a `.cbz`/`.nhlcomic` book from its bytes.
    ///
    /// Returns `{ pages, selected, skipped: [{ entry, reason }] }`.
    ///
    /// # Errors
    /// Returns error if the archive is damaged or holds no readable pages;
    /// the previously loaded book stays open in that case.
    pub fn load_zip(&mut self, name: &str, bytes: &[u8]) -> Result<JsValue, JsValue> {
        let summary = self.session.load_zip(name, bytes).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Number of pages in the loaded book (0 when nothing is loaded).
    #[wasm_bindgen(getter)]
    pub fn page_count(&self) -> usize {
        self.session.page_count()
    }

    /// Index of the current page, `undefined` when nothing is loaded.
    #[wasm_bindgen(getter)]
    pub fn page_index(&self) -> Option<usize> {
        self.session.page_index()
    }

    /// Go back one page. Returns the new index; stays on the first page.
    pub fn previous(&mut self) -> Option<usize> {
        self.session.previous().map(|(index, _)| index)
    }

    /// Go forward one page. Returns the new index; stays on the last page.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<usize> {
        self.session.next().map(|(index, _)| index)
    }

    /// Jump to `index`.
    ///
    /// # Errors
    /// Returns error if `index` is past the last page
    pub fn select(&mut self, index: usize) -> Result<Option<usize>, JsValue> {
        self.session
            .select(CursorRequest::Index(index))
            .map_err(to_js_error)
    }

    /// Show the page the cursor is on, e.g. when reopening a view.
    pub fn restore(&mut self) -> Option<usize> {
        self.session.select(CursorRequest::Keep).ok().flatten()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.session.viewport_mut().resize(width, height);
    }

    /// Pan by a relative delta.
    pub fn drag(&mut self, dx: i32, dy: i32) {
        self.session.viewport_mut().drag(dx, dy);
    }

    /// Pointer down at absolute viewport coordinates.
    pub fn press(&mut self, x: i32, y: i32) {
        self.session.viewport_mut().press(x, y);
    }

    /// Pointer moved to absolute viewport coordinates while pressed.
    pub fn drag_to(&mut self, x: i32, y: i32) {
        self.session.viewport_mut().drag_to(x, y);
    }

    pub fn release(&mut self) {
        self.session.viewport_mut().release();
    }

    /// The bitmap to paint for the current page.
    pub fn displayed(&self) -> Option<JsFrame> {
        self.session.viewport().displayed().map(JsFrame::from_frame)
    }

    /// Current pan offset as `[x, y]`.
    pub fn pan(&self) -> js_sys::Int32Array {
        let (x, y) = self.session.viewport().pan();
        js_sys::Int32Array::from(&[x, y][..])
    }

    /// Unload the book and clear the viewport.
    pub fn close(&mut self) {
        self.session.close();
    }
}

fn to_js_error(e: ReaderError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
