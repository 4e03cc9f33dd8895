//! PDF word extraction via pdfium
//!
//! pdfium reports characters with bottom-up bounds in PDF points. Characters
//! are grouped into words and converted to top-down page coordinates. The
//! whole document is extracted up front since the document is static.

use super::{BBox, MemoryDocument, PageTokenSet};
use crate::{ChantError, Result};
use log::{debug, info};
use pdfium_render::prelude::*;
use std::path::Path;

/// A character with top-down bounds
#[derive(Debug, Clone, Copy)]
struct PlacedChar {
    ch: char,
    bbox: BBox,
}

/// Horizontal gap, as a share of the line height, that separates two words
/// even without a space character between them
const WORD_GAP_RATIO: f32 = 0.3;

/// Word being assembled from consecutive characters
#[derive(Default)]
struct WordBuilder {
    text: String,
    bbox: Option<BBox>,
}

impl WordBuilder {
    fn push(&mut self, placed: PlacedChar) {
        self.text.push(placed.ch);
        self.bbox = Some(match self.bbox {
            Some(b) => BBox::new(
                b.x0.min(placed.bbox.x0),
                b.y0.min(placed.bbox.y0),
                b.x1.max(placed.bbox.x1),
                b.y1.max(placed.bbox.y1),
            ),
            None => placed.bbox,
        });
    }

    /// A new word starts when the character drops to another line, jumps
    /// backwards or leaves a wide gap
    fn breaks_before(&self, next: &PlacedChar) -> bool {
        match self.bbox {
            Some(b) => {
                let line_height = b.height().max(next.bbox.height()).max(1.0);
                let center = (b.y0 + b.y1) / 2.0;
                let next_center = (next.bbox.y0 + next.bbox.y1) / 2.0;
                (center - next_center).abs() > line_height / 2.0
                    || next.bbox.x0 < b.x0
                    || next.bbox.x0 - b.x1 > line_height * WORD_GAP_RATIO
            }
            None => false,
        }
    }

    fn take(&mut self) -> Option<(String, BBox)> {
        let bbox = self.bbox.take()?;
        let text = std::mem::take(&mut self.text);
        Some((text, bbox))
    }
}

/// Group characters into words, splitting on whitespace and line breaks
fn group_words(chars: &[PlacedChar]) -> Vec<(String, BBox)> {
    let mut words = Vec::new();
    let mut current = WordBuilder::default();

    for placed in chars {
        if placed.ch.is_whitespace() {
            words.extend(current.take());
            continue;
        }
        if current.breaks_before(placed) {
            words.extend(current.take());
        }
        current.push(*placed);
    }
    words.extend(current.take());

    words
}

/// Extract every page of a PDF into an in-memory document
#[allow(deprecated)] // PdfRect field access deprecated in 0.8.28
pub fn load_pdf(path: &Path) -> Result<MemoryDocument> {
    let bindings = Pdfium::bind_to_system_library()
        .map_err(|e| ChantError::Document(format!("pdfium library unavailable: {}", e)))?;
    let pdfium = Pdfium::new(bindings);
    let doc = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| ChantError::Document(format!("Failed to open PDF: {}", e)))?;

    let mut pages = Vec::new();
    for (page_idx, page) in doc.pages().iter().enumerate() {
        let height = page.height().value;
        let text = page
            .text()
            .map_err(|e| ChantError::Document(format!("Failed to extract text: {}", e)))?;

        let mut chars = Vec::new();
        for ch in text.chars().iter() {
            if let (Some(unicode_ch), Ok(rect)) = (ch.unicode_char(), ch.loose_bounds()) {
                chars.push(PlacedChar {
                    ch: unicode_ch,
                    bbox: BBox::new(
                        rect.left.value,
                        height - rect.top.value,
                        rect.right.value,
                        height - rect.bottom.value,
                    ),
                });
            }
        }

        let set = PageTokenSet::from_words(group_words(&chars), height);
        debug!("PDF page {}: {} words", page_idx + 1, set.len());
        pages.push(set);
    }

    info!("Extracted {} pages from {}", pages.len(), path.display());
    Ok(MemoryDocument::new(pages))
}
