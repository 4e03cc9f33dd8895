//! Presentation collaborator
//!
//! The reader never draws anything itself. It tells the presentation layer
//! which word to highlight and when the visible page changes; the layer is
//! responsible for display scaling.

use crate::document::{BBox, Token};
use log::info;

/// Receives highlight and page notifications from the reader
pub trait Presentation {
    /// Highlight `token` on `page`, clearing any previous highlight first
    fn on_highlight_requested(&mut self, page: usize, token: &Token);

    /// Re-render `page` (0-based) of `total_pages`
    fn on_page_changed(&mut self, page: usize, total_pages: usize);

    /// Continuous reading started or stopped
    fn on_playback_changed(&mut self, _playing: bool) {}

    /// Report a recoverable problem to the user
    fn on_message(&mut self, _message: &str) {}
}

/// Geometry of the highlight rectangle in display units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightStyle {
    /// Grown on every side of the scaled word box
    pub margin: f32,
    /// Upward shift so the frame sits around the glyphs rather than the baseline
    pub vertical_offset: f32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            margin: 6.0,
            vertical_offset: 4.0,
        }
    }
}

/// Display-space rectangle drawn around a highlighted word
pub fn highlight_rect(bbox: &BBox, scale: f32, style: &HighlightStyle) -> BBox {
    let scaled = bbox.scaled(scale);
    BBox::new(
        scaled.x0 - style.margin,
        scaled.y0 - style.margin - style.vertical_offset,
        scaled.x1 + style.margin,
        scaled.y1 + style.margin - style.vertical_offset,
    )
}

/// Line-oriented presentation for terminals
///
/// Prints the page header on page changes and the highlighted word with its
/// display rectangle.
pub struct TerminalPresentation {
    scale: f32,
    style: HighlightStyle,
    /// Current highlight, replaced on every request
    highlight: Option<(usize, BBox)>,
}

impl TerminalPresentation {
    pub fn new(scale: f32, style: HighlightStyle) -> Self {
        Self {
            scale,
            style,
            highlight: None,
        }
    }

    /// Page and display rectangle of the current highlight
    pub fn highlight(&self) -> Option<(usize, BBox)> {
        self.highlight
    }
}

impl Presentation for TerminalPresentation {
    fn on_highlight_requested(&mut self, page: usize, token: &Token) {
        let rect = highlight_rect(&token.bbox, self.scale, &self.style);
        self.highlight = Some((page, rect));
        println!(
            "  » {:<24} [{:.0},{:.0} {:.0}x{:.0}]",
            token.text,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height()
        );
    }

    fn on_page_changed(&mut self, page: usize, total_pages: usize) {
        self.highlight = None;
        info!("Showing page {} of {}", page + 1, total_pages);
        println!("── Page {} of {} ──", page + 1, total_pages);
    }

    fn on_playback_changed(&mut self, playing: bool) {
        println!("{}", if playing { "Reading…" } else { "Stopped." });
    }

    fn on_message(&mut self, message: &str) {
        println!("! {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rect_default_style() {
        let rect = highlight_rect(&BBox::new(10.0, 20.0, 30.0, 40.0), 2.0, &HighlightStyle::default());
        assert_eq!(rect, BBox::new(14.0, 30.0, 66.0, 82.0));
    }

    #[test]
    fn test_highlight_rect_no_margin() {
        let style = HighlightStyle {
            margin: 0.0,
            vertical_offset: 0.0,
        };
        let rect = highlight_rect(&BBox::new(1.0, 2.0, 3.0, 4.0), 1.0, &style);
        assert_eq!(rect, BBox::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_page_change_clears_highlight() {
        let mut view = TerminalPresentation::new(2.0, HighlightStyle::default());
        let token = Token::new("word", BBox::new(0.0, 0.0, 1.0, 1.0), 0);
        view.on_highlight_requested(0, &token);
        assert!(view.highlight().is_some());

        view.on_page_changed(1, 3);
        assert!(view.highlight().is_none());
    }
}
