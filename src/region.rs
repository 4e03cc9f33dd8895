//! Header/footer region filtering
//!
//! Splits a page's tokens into the narratable body and the excluded margins
//! using ratios of the page height. Coordinates are top-down, so the header is
//! the band near `y = 0` and the footer the band near `y = height`.

use crate::document::Token;
use log::trace;

/// Default share of the page height treated as header
pub const HEADER_RATIO: f32 = 0.10;

/// Default share of the page height treated as footer
pub const FOOTER_RATIO: f32 = 0.02;

/// Ordered body tokens of a page
///
/// Each token keeps its `original_index` into the page's full token set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyTokenSet {
    pub tokens: Vec<Token>,
}

impl BodyTokenSet {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, body_index: usize) -> Option<&Token> {
        self.tokens.get(body_index)
    }

    pub fn texts(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Classifies tokens as body or header/footer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFilter {
    pub header_ratio: f32,
    pub footer_ratio: f32,
}

impl Default for RegionFilter {
    fn default() -> Self {
        Self {
            header_ratio: HEADER_RATIO,
            footer_ratio: FOOTER_RATIO,
        }
    }
}

impl RegionFilter {
    pub fn new(header_ratio: f32, footer_ratio: f32) -> Self {
        Self {
            header_ratio,
            footer_ratio,
        }
    }

    /// Bottom edge above the header line
    pub fn in_header(&self, token: &Token, page_height: f32) -> bool {
        token.bbox.y1 < self.header_ratio * page_height
    }

    /// Top edge below the footer line
    pub fn in_footer(&self, token: &Token, page_height: f32) -> bool {
        token.bbox.y0 > (1.0 - self.footer_ratio) * page_height
    }

    pub fn is_excluded(&self, token: &Token, page_height: f32) -> bool {
        self.in_header(token, page_height) || self.in_footer(token, page_height)
    }

    /// Keep body tokens in their original relative order
    pub fn filter(&self, tokens: &[Token], page_height: f32) -> BodyTokenSet {
        let tokens: Vec<Token> = tokens
            .iter()
            .filter(|t| {
                let excluded = self.is_excluded(t, page_height);
                if excluded {
                    trace!("Excluding margin token {:?}", t.text);
                }
                !excluded
            })
            .cloned()
            .collect();
        BodyTokenSet { tokens }
    }
}
