//! Reading result pages and computing pagination

use serde_json::Value;
use std::fmt;

use crate::products::DiamondRecord;

/// Diamonds and total hit count pulled from an inventory response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub diamonds: Vec<DiamondRecord>,
    pub total: u64,
}

impl SearchPage {
    /// Missing or malformed sections read as empty. A missing or zero total
    /// falls back to the number of diamonds on the page.
    pub fn from_body(body: &Value) -> Self {
        let inner = body.pointer("/response/body");

        let diamonds = inner
            .and_then(|b| b.get("diamonds"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .cloned()
                    .filter_map(DiamondRecord::from_value)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let total = inner
            .and_then(|b| b.pointer("/search_results/total_diamonds_found"))
            .and_then(|t| t.as_u64().or_else(|| t.as_str().and_then(|s| s.trim().parse().ok())))
            .filter(|&t| t > 0)
            .unwrap_or(diamonds.len() as u64);

        Self { diamonds, total }
    }

    pub fn is_empty(&self) -> bool {
        self.diamonds.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page { number: u64, current: bool },
    Ellipsis,
}

/// Position of one page within a result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
    /// 1-based index of the first result shown, 0 when there are none
    pub start: u64,
    pub end: u64,
}

impl PageWindow {
    pub fn new(current: u64, page_size: u64, total: u64) -> Self {
        let page_size = page_size.max(1);
        let current = current.max(1);
        let total_pages = total.div_ceil(page_size);

        let (start, end) = if total == 0 {
            (0, 0)
        } else {
            let start = (current - 1).saturating_mul(page_size).saturating_add(1);
            (start, current.saturating_mul(page_size).min(total))
        };

        Self {
            current,
            page_size,
            total,
            total_pages,
            start,
            end,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    /// Page buttons: two either side of the current page, plus the first and
    /// last page separated by an ellipsis when they are not adjacent
    pub fn items(&self) -> Vec<PageItem> {
        let mut items = Vec::new();
        if self.total_pages <= 1 {
            return items;
        }

        let current = self.current;
        let last = self.total_pages;
        let page = |number| PageItem::Page {
            number,
            current: number == current,
        };

        if current > 3 {
            items.push(page(1));
            if current > 4 {
                items.push(PageItem::Ellipsis);
            }
        }

        let first_shown = current.saturating_sub(2).max(1);
        let last_shown = current.saturating_add(2).min(last);
        items.extend((first_shown..=last_shown).map(page));

        if current.saturating_add(2) < last {
            if current.saturating_add(3) < last {
                items.push(PageItem::Ellipsis);
            }
            items.push(page(last));
        }

        items
    }
}

impl fmt::Display for PageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return write!(f, "No results");
        }
        write!(
            f,
            "Showing {}-{} of {} results (page {} of {})",
            self.start, self.end, self.total, self.current, self.total_pages
        )
    }
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page { number, current: true } => write!(f, "[{number}]"),
            PageItem::Page { number, .. } => write!(f, "{number}"),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbers(items: &[PageItem]) -> String {
        items.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_page_reads_diamonds_and_total() {
        let body = json!({
            "response": {"body": {
                "diamonds": [{"diamond_id": 1}, {"diamond_id": 2}, "junk"],
                "search_results": {"total_diamonds_found": 42}
            }}
        });
        let page = SearchPage::from_body(&body);

        assert_eq!(page.diamonds.len(), 2);
        assert_eq!(page.total, 42);
    }

    #[test]
    fn test_total_falls_back_to_diamond_count() {
        let body = json!({
            "response": {"body": {
                "diamonds": [{"diamond_id": 1}],
                "search_results": {"total_diamonds_found": 0}
            }}
        });
        assert_eq!(SearchPage::from_body(&body).total, 1);

        let empty = SearchPage::from_body(&json!({"error": "nope"}));
        assert!(empty.is_empty());
        assert_eq!(empty.total, 0);
    }

    #[test]
    fn test_window_ranges() {
        let window = PageWindow::new(3, 20, 42);
        assert_eq!(window.total_pages, 3);
        assert_eq!((window.start, window.end), (41, 42));
        assert!(window.has_previous());
        assert!(!window.has_next());
        assert_eq!(window.to_string(), "Showing 41-42 of 42 results (page 3 of 3)");

        let none = PageWindow::new(1, 20, 0);
        assert_eq!(none.total_pages, 0);
        assert_eq!((none.start, none.end), (0, 0));
        assert_eq!(none.to_string(), "No results");
    }

    #[test]
    fn test_items_near_start() {
        assert_eq!(numbers(&PageWindow::new(1, 10, 100).items()), "[1] 2 3 ... 10");
        assert_eq!(numbers(&PageWindow::new(4, 10, 100).items()), "1 2 3 [4] 5 6 ... 10");
    }

    #[test]
    fn test_items_in_middle_and_end() {
        assert_eq!(numbers(&PageWindow::new(5, 10, 100).items()), "1 ... 3 4 [5] 6 7 ... 10");
        assert_eq!(numbers(&PageWindow::new(8, 10, 100).items()), "1 ... 6 7 [8] 9 10");
        assert_eq!(numbers(&PageWindow::new(7, 10, 100).items()), "1 ... 5 6 [7] 8 9 10");
    }

    #[test]
    fn test_single_page_has_no_items() {
        assert!(PageWindow::new(1, 50, 12).items().is_empty());
    }
}
