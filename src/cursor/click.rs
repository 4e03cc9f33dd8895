//! Pointer click resolution

use crate::document::PageTokenSet;
use crate::region::BodyTokenSet;

/// Find the body index of the word under a display-space point
///
/// Each body token's box is looked up in the full set by its original index,
/// scaled by `display_scale`, and tested inclusively. The first match in
/// body order wins.
pub fn resolve_click(
    point: (f32, f32),
    full: &PageTokenSet,
    body: &BodyTokenSet,
    display_scale: f32,
) -> Option<usize> {
    let (x, y) = point;
    body.tokens.iter().position(|token| {
        let bbox = full
            .get(token.original_index)
            .map(|t| t.bbox)
            .unwrap_or(token.bbox);
        bbox.scaled(display_scale).contains(x, y)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BBox;
    use crate::region::RegionFilter;

    fn page() -> (PageTokenSet, BodyTokenSet) {
        let full = PageTokenSet::from_words(
            vec![
                ("Header", BBox::new(10.0, 5.0, 60.0, 15.0)),
                ("alpha", BBox::new(10.0, 200.0, 50.0, 212.0)),
                ("beta", BBox::new(55.0, 200.0, 90.0, 212.0)),
            ],
            800.0,
        );
        let body = RegionFilter::default().filter(&full.tokens, full.height);
        (full, body)
    }

    #[test]
    fn test_point_inside_scaled_box() {
        let (full, body) = page();
        // beta spans x 110..180, y 400..424 at 2x
        assert_eq!(resolve_click((150.0, 410.0), &full, &body, 2.0), Some(1));
        assert_eq!(resolve_click((30.0, 410.0), &full, &body, 2.0), Some(0));
    }

    #[test]
    fn test_edges_inclusive() {
        let (full, body) = page();
        assert_eq!(resolve_click((20.0, 400.0), &full, &body, 2.0), Some(0));
        assert_eq!(resolve_click((100.0, 424.0), &full, &body, 2.0), Some(0));
    }

    #[test]
    fn test_point_outside_all_boxes() {
        let (full, body) = page();
        assert_eq!(resolve_click((500.0, 500.0), &full, &body, 2.0), None);
    }

    #[test]
    fn test_header_word_not_clickable() {
        let (full, body) = page();
        assert_eq!(resolve_click((40.0, 20.0), &full, &body, 2.0), None);
    }

    #[test]
    fn test_first_overlapping_token_wins() {
        let full = PageTokenSet::from_words(
            vec![
                ("left", BBox::new(0.0, 100.0, 20.0, 110.0)),
                ("right", BBox::new(20.0, 100.0, 40.0, 110.0)),
            ],
            800.0,
        );
        let body = RegionFilter::default().filter(&full.tokens, full.height);
        assert_eq!(resolve_click((20.0, 105.0), &full, &body, 1.0), Some(0));
    }
}
