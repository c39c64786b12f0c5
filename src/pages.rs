//! Page selection parsing and paged content
//!
//! Page selections use the familiar print-dialog syntax: `1, 3-5, 9`.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound::{Excluded, Unbounded};

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound for ranges when the document's page count is unknown
pub const MAX_UNBOUNDED_PAGE: u32 = 10_000;

/// Parse a page selection like `"1, 3-5"` into sorted, unique page numbers.
///
/// Ranges are inclusive and need `start <= end`; the end is clamped to
/// `page_count` when known. Malformed tokens are ignored. Single numbers are
/// kept as written, so callers still filter out pages the document lacks.
pub fn parse_page_numbers(input: &str, page_count: Option<u32>) -> Vec<u32> {
    static RANGE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(\d+)\s*-\s*(\d+)$").unwrap());

    let mut pages = BTreeSet::new();

    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(caps) = RANGE_RE.captures(token) {
            let (Ok(start), Ok(end)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
                continue;
            };
            if start > end {
                continue;
            }
            let end = end.min(page_count.unwrap_or(MAX_UNBOUNDED_PAGE));
            pages.extend(start..=end);
        } else if let Ok(page) = token.parse::<u32>() {
            pages.insert(page);
        }
    }

    pages.into_iter().collect()
}

/// The selection meaning "every page"
pub fn default_selection(page_count: u32) -> String {
    format!("1-{}", page_count)
}

/// Per-page text keyed by page number, with a cursor on the current page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagedContent {
    pages: BTreeMap<u32, String>,
    current: Option<u32>,
}

impl PagedContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(page, text)` pairs; the cursor starts on the lowest page
    pub fn from_pages<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = (u32, String)>,
    {
        let pages: BTreeMap<u32, String> = pages.into_iter().collect();
        let current = pages.keys().next().copied();
        Self { pages, current }
    }

    /// Insert or replace a page. The first inserted page becomes current.
    pub fn insert(&mut self, page: u32, text: String) {
        self.pages.insert(page, text);
        if self.current.is_none() {
            self.current = Some(page);
        }
    }

    pub fn get(&self, page: u32) -> Option<&str> {
        self.pages.get(&page).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    pub fn first_page(&self) -> Option<u32> {
        self.pages.keys().next().copied()
    }

    pub fn last_page(&self) -> Option<u32> {
        self.pages.keys().next_back().copied()
    }

    pub fn current_page(&self) -> Option<u32> {
        self.current
    }

    pub fn current_text(&self) -> Option<&str> {
        self.current.and_then(|page| self.get(page))
    }

    /// Move the cursor to `page`; returns `false` if no such page exists
    pub fn set_current(&mut self, page: u32) -> bool {
        if self.pages.contains_key(&page) {
            self.current = Some(page);
            true
        } else {
            false
        }
    }

    pub fn has_prev(&self) -> bool {
        matches!((self.current, self.first_page()), (Some(c), Some(first)) if c > first)
    }

    pub fn has_next(&self) -> bool {
        matches!((self.current, self.last_page()), (Some(c), Some(last)) if c < last)
    }

    /// Advance to the next page in order; returns whether the cursor moved
    pub fn next_page(&mut self) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        match self.pages.range((Excluded(current), Unbounded)).next() {
            Some((&page, _)) => {
                self.current = Some(page);
                true
            }
            None => false,
        }
    }

    /// Step back to the previous page in order; returns whether the cursor moved
    pub fn prev_page(&mut self) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        match self.pages.range(..current).next_back() {
            Some((&page, _)) => {
                self.current = Some(page);
                true
            }
            None => false,
        }
    }

    /// Position of the current page as `"i/n"`, 1-based
    pub fn counter(&self) -> Option<String> {
        let current = self.current?;
        let position = self.pages.keys().position(|&p| p == current)?;
        Some(format!("{}/{}", position + 1, self.pages.len()))
    }

    /// Pages in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.pages.iter().map(|(&page, text)| (page, text.as_str()))
    }
}
