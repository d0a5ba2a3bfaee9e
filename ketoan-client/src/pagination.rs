//! Pagination control model
//!
//! Page-button window and navigation affordances derived from a page
//! envelope's pagination metadata.

use shared::response::PaginationMeta;

/// Distance from the current page that is always shown.
const NEIGHBOURS: u32 = 1;

/// One slot in the pagination bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    Ellipsis,
}

/// Page buttons for `pages` total pages around `current`.
///
/// The first and last page are always present, plus every page within one of
/// `current`. A gap between shown pages collapses into one `Ellipsis`.
pub fn page_window(pages: u32, current: u32) -> Vec<PageLink> {
    let mut links = Vec::new();
    let mut last_shown: Option<u32> = None;

    for page in shown_pages(pages, current) {
        if let Some(prev) = last_shown
            && page > prev + 1
        {
            links.push(PageLink::Ellipsis);
        }
        links.push(PageLink::Page(page));
        last_shown = Some(page);
    }

    links
}

/// Sorted, deduplicated page numbers that get a button.
fn shown_pages(pages: u32, current: u32) -> Vec<u32> {
    if pages == 0 {
        return Vec::new();
    }
    let mut shown = vec![1, pages];
    let low = current.saturating_sub(NEIGHBOURS).max(1);
    let high = current.saturating_add(NEIGHBOURS).min(pages);
    if low <= high {
        shown.extend(low..=high);
    }
    shown.sort_unstable();
    shown.dedup();
    shown
}

/// Everything a view needs to render its pagination bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub current: u32,
    pub pages: u32,
    pub total: u64,
    pub links: Vec<PageLink>,
    /// Hidden when everything fits on one page
    pub show_controls: bool,
    pub has_previous: bool,
    pub has_next: bool,
    /// 1-based index of the first row on this page, 0 when empty
    pub first_item: u64,
    /// 1-based index of the last row on this page, 0 when empty
    pub last_item: u64,
}

impl PaginationView {
    pub fn from_meta(meta: &PaginationMeta, current: u32) -> Self {
        let pages = meta.pages;
        let limit = u64::from(meta.limit);
        let (first_item, last_item) = if meta.total == 0 || current == 0 || current > pages {
            (0, 0)
        } else {
            let first = u64::from(current - 1) * limit + 1;
            (first, (first + limit - 1).min(meta.total))
        };

        Self {
            current,
            pages,
            total: meta.total,
            links: page_window(pages, current),
            show_controls: pages > 1,
            has_previous: current > 1,
            has_next: current < pages,
            first_item,
            last_item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLink::{Ellipsis, Page};

    #[test]
    fn window_around_middle_page() {
        assert_eq!(
            page_window(20, 10),
            vec![Page(1), Ellipsis, Page(9), Page(10), Page(11), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn window_at_edges() {
        assert_eq!(page_window(20, 1), vec![Page(1), Page(2), Ellipsis, Page(20)]);
        assert_eq!(page_window(20, 20), vec![Page(1), Ellipsis, Page(19), Page(20)]);
        assert_eq!(page_window(20, 3), vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(20)]);
    }

    #[test]
    fn adjacent_pages_have_no_ellipsis() {
        assert_eq!(page_window(4, 2), vec![Page(1), Page(2), Page(3), Page(4)]);
        assert_eq!(page_window(5, 3), vec![Page(1), Page(2), Page(3), Page(4), Page(5)]);
    }

    #[test]
    fn tiny_and_empty() {
        assert!(page_window(0, 1).is_empty());
        assert_eq!(page_window(1, 1), vec![Page(1)]);
        assert_eq!(page_window(2, 1), vec![Page(1), Page(2)]);
    }

    #[test]
    fn out_of_range_current_still_anchors_edges() {
        assert_eq!(page_window(5, 9), vec![Page(1), Ellipsis, Page(5)]);
    }

    #[test]
    fn view_for_middle_page() {
        let meta = PaginationMeta::new(3, 10, 42);
        let view = PaginationView::from_meta(&meta, 3);
        assert_eq!(view.pages, 5);
        assert!(view.show_controls);
        assert!(view.has_previous);
        assert!(view.has_next);
        assert_eq!((view.first_item, view.last_item), (21, 30));

        let last = PaginationView::from_meta(&meta, 5);
        assert!(!last.has_next);
        assert_eq!((last.first_item, last.last_item), (41, 42));
    }

    #[test]
    fn single_page_hides_controls() {
        let meta = PaginationMeta::new(1, 10, 2);
        let view = PaginationView::from_meta(&meta, 1);
        assert!(!view.show_controls);
        assert!(!view.has_previous);
        assert!(!view.has_next);
        assert_eq!((view.first_item, view.last_item), (1, 2));
    }

    #[test]
    fn empty_result() {
        let meta = PaginationMeta::new(1, 10, 0);
        let view = PaginationView::from_meta(&meta, 1);
        assert_eq!(view.pages, 0);
        assert!(!view.show_controls);
        assert!(view.links.is_empty());
        assert_eq!((view.first_item, view.last_item), (0, 0));
    }
}
