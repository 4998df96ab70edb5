//! Fixed-size pages over the view set.

use std::ops::RangeInclusive;

use serde::Serialize;
use thiserror::Error;

/// Numbered page buttons shown at once.
pub const PAGE_WINDOW: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("page {requested} is outside 1..={total_pages}")]
    OutOfRange { requested: usize, total_pages: usize },
}

/// One page of a view set.
#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    pub number: usize,
    pub total_pages: usize,
    pub items: &'a [T],
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Slice out page `page` (1-based). Pages outside `1..=total_pages` are
/// rejected rather than clamped.
pub fn paginate<T>(view: &[T], page: usize, page_size: usize) -> Result<Page<'_, T>, PageError> {
    let page_size = page_size.max(1);
    let total = total_pages(view.len(), page_size);
    if page < 1 || page > total {
        return Err(PageError::OutOfRange {
            requested: page,
            total_pages: total,
        });
    }

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(view.len());
    Ok(Page {
        number: page,
        total_pages: total,
        items: &view[start..end],
    })
}

/// Up to [`PAGE_WINDOW`] page numbers around `current`, shifted to stay
/// inside `1..=total`.
pub fn page_window(current: usize, total: usize) -> RangeInclusive<usize> {
    if total == 0 {
        return 1..=0;
    }
    let half = PAGE_WINDOW / 2;
    let mut start = current.saturating_sub(half).max(1);
    let mut end = (current + half).min(total);

    if start == 1 {
        end = total.min(PAGE_WINDOW);
    } else if end == total {
        start = total.saturating_sub(PAGE_WINDOW - 1).max(1);
    }
    start..=end
}

/// Parse the "jump to page" input. Only whole numbers inside `1..=total` count.
pub fn parse_jump(input: &str, total: usize) -> Option<usize> {
    let page = input.trim().parse::<usize>().ok()?;
    (1..=total).contains(&page).then_some(page)
}

/// Everything needed to draw the pagination bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationControls {
    pub current: usize,
    pub total_pages: usize,
    pub first_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub last_enabled: bool,
    pub window: Vec<usize>,
    pub jump_label: String,
}

impl PaginationControls {
    /// `None` when there is nothing to paginate.
    pub fn build(current: usize, total: usize) -> Option<Self> {
        if total == 0 {
            return None;
        }
        Some(Self {
            current,
            total_pages: total,
            first_enabled: current > 1,
            prev_enabled: current > 1,
            next_enabled: current < total,
            last_enabled: current < total,
            window: page_window(current, total).collect(),
            jump_label: format!("of {total} [Enter]"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hundred_twenty_records_make_three_pages() {
        let view: Vec<usize> = (0..120).collect();
        let last = paginate(&view, 3, 50).unwrap();
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.items.len(), 20);
        assert_eq!(last.items[0], 100);

        assert_eq!(
            paginate(&view, 4, 50),
            Err(PageError::OutOfRange {
                requested: 4,
                total_pages: 3
            })
        );
        assert!(paginate(&view, 0, 50).is_err());
    }

    #[test]
    fn pages_reassemble_the_view_set() {
        for len in [0usize, 1, 49, 50, 51, 137] {
            let view: Vec<usize> = (0..len).collect();
            let total = total_pages(len, 50);
            let mut rebuilt = Vec::new();
            for page in 1..=total {
                let slice = paginate(&view, page, 50).unwrap();
                assert!(slice.items.len() <= 50);
                rebuilt.extend_from_slice(slice.items);
            }
            assert_eq!(rebuilt, view);
        }
    }

    #[test]
    fn empty_view_has_no_pages() {
        let view: Vec<u8> = Vec::new();
        assert_eq!(total_pages(0, 50), 0);
        assert!(paginate(&view, 1, 50).is_err());
        assert!(PaginationControls::build(1, 0).is_none());
    }

    #[test]
    fn window_anchors_to_edges() {
        assert_eq!(page_window(1, 10), 1..=5);
        assert_eq!(page_window(2, 10), 1..=5);
        assert_eq!(page_window(6, 10), 4..=8);
        assert_eq!(page_window(9, 10), 6..=10);
        assert_eq!(page_window(10, 10), 6..=10);
        assert_eq!(page_window(2, 3), 1..=3);
        assert_eq!(page_window(1, 1), 1..=1);
    }

    #[test]
    fn jump_input_rejects_out_of_range_and_garbage() {
        assert_eq!(parse_jump("2", 3), Some(2));
        assert_eq!(parse_jump(" 3 ", 3), Some(3));
        assert_eq!(parse_jump("0", 3), None);
        assert_eq!(parse_jump("4", 3), None);
        assert_eq!(parse_jump("two", 3), None);
        assert_eq!(parse_jump("", 3), None);
    }

    #[test]
    fn controls_disable_edges() {
        let first = PaginationControls::build(1, 3).unwrap();
        assert!(!first.first_enabled && !first.prev_enabled);
        assert!(first.next_enabled && first.last_enabled);
        assert_eq!(first.jump_label, "of 3 [Enter]");

        let last = PaginationControls::build(3, 3).unwrap();
        assert!(last.prev_enabled);
        assert!(!last.next_enabled && !last.last_enabled);
        assert_eq!(last.window, vec![1, 2, 3]);
    }
}
