//! Positioned text tokens and the document collaborator
//!
//! A document is a sequence of pages; each page yields its words in reading
//! order, each word tagged with its bounding box in native page coordinates
//! (top-down, unscaled). Rendering scale is never stored here.

pub mod json;
#[cfg(feature = "pdf")]
pub mod pdf;

use crate::{ChantError, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Axis-aligned bounding box `(x0, y0, x1, y1)` with y growing downwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Multiply every edge by `factor` (page space to display space)
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            x0: self.x0 * factor,
            y0: self.y0 * factor,
            x1: self.x1 * factor,
            y1: self.y1 * factor,
        }
    }

    /// Inclusive on all four edges
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.x0 <= x && x <= self.x1 && self.y0 <= y && y <= self.y1
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A single positioned word extracted from a page
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub bbox: BBox,
    /// Position of this token in the page's full token set
    pub original_index: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, bbox: BBox, original_index: usize) -> Self {
        Self {
            text: text.into(),
            bbox,
            original_index,
        }
    }
}

/// All tokens on one page in extraction order, plus the page height
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageTokenSet {
    pub tokens: Vec<Token>,
    pub height: f32,
}

impl PageTokenSet {
    /// Build a page from `(text, bbox)` pairs, numbering tokens in order
    pub fn from_words<I, S>(words: I, height: f32) -> Self
    where
        I: IntoIterator<Item = (S, BBox)>,
        S: Into<String>,
    {
        let tokens = words
            .into_iter()
            .enumerate()
            .map(|(idx, (text, bbox))| Token::new(text, bbox, idx))
            .collect();
        Self { tokens, height }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Look up a token by its original index
    pub fn get(&self, original_index: usize) -> Option<&Token> {
        self.tokens.get(original_index)
    }
}

/// Source of paginated, position-tagged text
///
/// Implemented by word files, PDF extraction and in-memory fixtures.
pub trait Document {
    /// Number of pages; may be zero for an empty document
    fn page_count(&self) -> usize;

    /// Ordered tokens of a page (page number is already in range)
    fn tokens(&self, page: usize) -> Result<Vec<Token>>;

    /// Height of a page in native units
    fn page_height(&self, page: usize) -> Result<f32>;
}

/// Clamp a requested page number into `[0, page_count)`
///
/// An empty document clamps everything to page 0.
pub fn clamp_page(page: usize, page_count: usize) -> usize {
    page.min(page_count.saturating_sub(1))
}

/// Fetch the full token set of a page
///
/// Out-of-range page numbers are clamped. Tokens are renumbered when their
/// `original_index` does not match their position, so the index always
/// addresses the returned set.
pub fn extract_page(doc: &dyn Document, page: usize) -> Result<PageTokenSet> {
    let count = doc.page_count();
    if count == 0 {
        return Ok(PageTokenSet::default());
    }

    let page = clamp_page(page, count);
    let mut tokens = doc.tokens(page)?;
    let height = doc.page_height(page)?;

    let mut renumbered = 0;
    for (idx, token) in tokens.iter_mut().enumerate() {
        if token.original_index != idx {
            token.original_index = idx;
            renumbered += 1;
        }
    }
    if renumbered > 0 {
        warn!("Page {}: renumbered {} tokens", page, renumbered);
    }

    debug!("Extracted {} tokens from page {} (height {})", tokens.len(), page, height);
    Ok(PageTokenSet { tokens, height })
}

/// Document held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<PageTokenSet>,
}

impl MemoryDocument {
    pub fn new(pages: Vec<PageTokenSet>) -> Self {
        Self { pages }
    }

    pub fn pages(&self) -> &[PageTokenSet] {
        &self.pages
    }
}

impl Document for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn tokens(&self, page: usize) -> Result<Vec<Token>> {
        self.pages
            .get(page)
            .map(|p| p.tokens.clone())
            .ok_or_else(|| ChantError::Document(format!("No page {}", page)))
    }

    fn page_height(&self, page: usize) -> Result<f32> {
        self.pages
            .get(page)
            .map(|p| p.height)
            .ok_or_else(|| ChantError::Document(format!("No page {}", page)))
    }
}

/// Open a document by file extension
///
/// `.json` word files are always supported; `.pdf` needs the `pdf` feature.
pub fn open(path: &Path) -> Result<MemoryDocument> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => json::load_words(path),
        #[cfg(feature = "pdf")]
        Some("pdf") => pdf::load_pdf(path),
        #[cfg(not(feature = "pdf"))]
        Some("pdf") => Err(ChantError::Document(
            "PDF support not compiled in (rebuild with --features pdf)".to_string(),
        )),
        _ => Err(ChantError::Document(format!(
            "Unsupported document type: {}",
            path.display()
        ))),
    }
}
