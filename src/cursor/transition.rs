//! Page rollover when the body of a page has been read

/// What the cursor does after exhausting a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Continue on this page from its first body word
    Turn(usize),
    /// End of document; stop reading
    Stop,
}

/// Decide the next action for an exhausted page
pub fn on_page_exhausted(current_page: usize, total_pages: usize) -> PageAction {
    let next = current_page + 1;
    if next < total_pages {
        PageAction::Turn(next)
    } else {
        PageAction::Stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_to_next_page() {
        assert_eq!(on_page_exhausted(0, 3), PageAction::Turn(1));
        assert_eq!(on_page_exhausted(1, 3), PageAction::Turn(2));
    }

    #[test]
    fn test_last_page_stops() {
        assert_eq!(on_page_exhausted(2, 3), PageAction::Stop);
        assert_eq!(on_page_exhausted(0, 1), PageAction::Stop);
    }

    #[test]
    fn test_empty_document_stops() {
        assert_eq!(on_page_exhausted(0, 0), PageAction::Stop);
    }
}
