//! Per-page token layout cache
//!
//! Documents are static, so each page's full token set and body partition
//! are computed once on first visit and reused.

use crate::document::{extract_page, Document, PageTokenSet, Token};
use crate::region::{BodyTokenSet, RegionFilter};
use crate::Result;
use log::debug;
use std::collections::HashMap;
use std::rc::Rc;

/// Full and body token sets of one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub full: PageTokenSet,
    pub body: BodyTokenSet,
}

impl PageLayout {
    pub fn new(full: PageTokenSet, filter: &RegionFilter) -> Self {
        let body = filter.filter(&full.tokens, full.height);
        Self { full, body }
    }

    /// The full-set token behind a body index
    pub fn body_token(&self, body_index: usize) -> Option<&Token> {
        let token = self.body.get(body_index)?;
        self.full.get(token.original_index).or(Some(token))
    }
}

/// Cache of page layouts keyed by page number
#[derive(Debug, Default)]
pub struct LayoutCache {
    filter: RegionFilter,
    pages: HashMap<usize, Rc<PageLayout>>,
}

impl LayoutCache {
    pub fn new(filter: RegionFilter) -> Self {
        Self {
            filter,
            pages: HashMap::new(),
        }
    }

    pub fn filter(&self) -> &RegionFilter {
        &self.filter
    }

    /// Layout of `page`, extracting and filtering it on first use
    pub fn get(&mut self, doc: &dyn Document, page: usize) -> Result<Rc<PageLayout>> {
        if let Some(layout) = self.pages.get(&page) {
            return Ok(Rc::clone(layout));
        }

        let layout = Rc::new(PageLayout::new(extract_page(doc, page)?, &self.filter));
        debug!(
            "Page {}: {} tokens, {} in body",
            page,
            layout.full.len(),
            layout.body.len()
        );
        self.pages.insert(page, Rc::clone(&layout));
        Ok(layout)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
