//! Pre-extracted word files
//!
//! Pages are stored as JSON in the word-tuple layout used by common PDF word
//! extractors:
//!
//! ```json
//! {"pages": [{"height": 842.0, "words": [[72.0, 90.5, 110.2, 104.0, "Namo"]]}]}
//! ```
//!
//! Tuples carrying the extra `block, line, word` numbers are accepted too.

use super::{BBox, MemoryDocument, PageTokenSet};
use crate::{ChantError, Result};
use log::{debug, info};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct WordFile {
    pages: Vec<WordPage>,
}

#[derive(Debug, Deserialize)]
struct WordPage {
    height: f32,
    #[serde(default)]
    words: Vec<WordTuple>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WordTuple {
    Numbered((f32, f32, f32, f32, String, u32, u32, u32)),
    Plain((f32, f32, f32, f32, String)),
}

impl WordTuple {
    fn into_word(self) -> (String, BBox) {
        match self {
            WordTuple::Numbered((x0, y0, x1, y1, text, ..)) | WordTuple::Plain((x0, y0, x1, y1, text)) => {
                (text, BBox::new(x0, y0, x1, y1))
            }
        }
    }
}

/// Parse a word file from a JSON string
pub fn parse_words(json: &str) -> Result<MemoryDocument> {
    let file: WordFile = serde_json::from_str(json)?;

    let mut pages = Vec::with_capacity(file.pages.len());
    for (idx, page) in file.pages.into_iter().enumerate() {
        if !page.height.is_finite() || page.height <= 0.0 {
            return Err(ChantError::Document(format!(
                "Page {} has invalid height {}",
                idx + 1,
                page.height
            )));
        }

        let words = page
            .words
            .into_iter()
            .map(WordTuple::into_word)
            .filter(|(text, _)| !text.trim().is_empty());
        let set = PageTokenSet::from_words(words, page.height);
        debug!("Word file page {}: {} words", idx + 1, set.len());
        pages.push(set);
    }

    Ok(MemoryDocument::new(pages))
}

/// Load a word file from disk
pub fn load_words(path: &Path) -> Result<MemoryDocument> {
    let contents = std::fs::read_to_string(path)?;
    let doc = parse_words(&contents)?;
    info!("Loaded {} pages from {}", doc.pages().len(), path.display());
    Ok(doc)
}
