//! Page slicing and the page-number strip rendered under listing results.

use serde::{Serialize, Serializer};

/// Page counts at or below this are rendered in full without ellipses.
const FULL_STRIP_LIMIT: usize = 7;

/// One entry of the page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageMarker::Page(number) => serializer.serialize_u64(*number as u64),
            PageMarker::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Builds the strip of page links for `current_page` out of `total_pages` (both 1-based).
///
/// Short ranges are listed in full. Longer ranges always show the first and last page plus
/// the neighbours of the current page, with an ellipsis standing in for any skipped run.
pub fn page_numbers(current_page: usize, total_pages: usize) -> Vec<PageMarker> {
    if total_pages <= FULL_STRIP_LIMIT {
        return (1..=total_pages).map(PageMarker::Page).collect();
    }

    let current = current_page.clamp(1, total_pages);
    let window_start = current.saturating_sub(1).max(2);
    let window_end = (current + 1).min(total_pages - 1);

    let mut markers = vec![PageMarker::Page(1)];
    if window_start > 2 {
        markers.push(PageMarker::Ellipsis);
    }
    markers.extend((window_start..=window_end).map(PageMarker::Page));
    if window_end < total_pages - 1 {
        markers.push(PageMarker::Ellipsis);
    }
    markers.push(PageMarker::Page(total_pages));
    markers
}

/// A single page cut out of an ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    pub fn page_numbers(&self) -> Vec<PageMarker> {
        page_numbers(self.current_page, self.total_pages)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}

pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    total_items.div_ceil(per_page.max(1))
}

/// Slices `items` into the requested 1-based page. Out-of-range pages clamp to the nearest
/// valid page so a stale page number after narrowing a filter still shows results.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, per_page);
    let current_page = page.clamp(1, total_pages.max(1));
    let start = (current_page - 1) * per_page;

    let items = items.into_iter().skip(start).take(per_page).collect();

    Page {
        items,
        current_page,
        per_page,
        total_pages,
        total_items,
    }
}
