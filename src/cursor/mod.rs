//! Reading cursor state
//!
//! The cursor tracks which page is shown, which body word is next to be
//! spoken and whether continuous reading is active. The advance logic that
//! drives it lives on `State` in `state/mod.rs`, which owns the narrator and
//! presentation handles.

pub mod click;
pub mod transition;

pub use click::resolve_click;
pub use transition::{on_page_exhausted, PageAction};

/// Playback status of the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
}

/// Position of the reading cursor
///
/// Invariants: `page < total_pages` (for non-empty documents) and
/// `body_index <= body length of page`; `body_index == len` means the page
/// is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadingState {
    pub page: usize,
    pub body_index: usize,
    pub play: PlayState,
}

impl ReadingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.play == PlayState::Playing
    }

    /// Move to `page` clamped into `[0, total_pages)`, restarting at its first word
    ///
    /// Returns true if the page changed.
    pub fn seek_page(&mut self, page: usize, total_pages: usize) -> bool {
        let page = crate::document::clamp_page(page, total_pages);
        let changed = page != self.page;
        self.page = page;
        self.body_index = 0;
        changed
    }

    /// Clamp the body index to a page's body length
    pub fn clamp_index(&mut self, body_len: usize) {
        self.body_index = self.body_index.min(body_len);
    }

    pub fn is_exhausted(&self, body_len: usize) -> bool {
        self.body_index >= body_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = ReadingState::new();
        assert_eq!(state.page, 0);
        assert_eq!(state.body_index, 0);
        assert!(!state.is_playing());
    }

    #[test]
    fn test_seek_page_clamps() {
        let mut state = ReadingState::new();
        state.body_index = 4;

        assert!(state.seek_page(12, 10));
        assert_eq!(state.page, 9);
        assert_eq!(state.body_index, 0);

        assert!(!state.seek_page(9, 10));
    }

    #[test]
    fn test_seek_page_empty_document() {
        let mut state = ReadingState::new();
        assert!(!state.seek_page(3, 0));
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_clamp_index() {
        let mut state = ReadingState::new();
        state.body_index = 8;
        state.clamp_index(3);
        assert_eq!(state.body_index, 3);
        assert!(state.is_exhausted(3));

        state.clamp_index(10);
        assert_eq!(state.body_index, 3);
        assert!(!state.is_exhausted(10));
    }
}
