//! Highlight a query across every page at once
//!
//! Each page gets its own [`WordView`], so pages are independent and are
//! searched in parallel.

use crate::highlight::Highlighter;
use crate::pages::PagedContent;
use crate::words::WordView;

use rayon::prelude::*;

/// Highlight result for one page
#[derive(Debug, Clone)]
pub struct PageHits {
    pub page: u32,
    pub matches: usize,
    /// The page's word view with markers applied
    pub view: WordView,
}

impl PageHits {
    pub fn html(&self) -> String {
        self.view.tree().render_html(self.view.container())
    }
}

/// Highlight `query` on every page, returning pages in ascending order.
///
/// Pages without a match are included with `matches == 0`.
pub fn search_pages(content: &PagedContent, query: &str, highlighter: &Highlighter) -> Vec<PageHits> {
    let pages: Vec<(u32, &str)> = content.iter().collect();

    pages
        .into_par_iter()
        .map(|(page, text)| {
            let mut view = WordView::build(text);
            let container = view.container();
            let matches = highlighter.find_and_highlight(view.tree_mut(), container, query);
            PageHits {
                page,
                matches,
                view,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pages_counts_per_page() {
        let content = PagedContent::from_pages(vec![
            (2, "Rust and more rust".to_string()),
            (1, "nothing".to_string()),
            (5, "trust".to_string()),
        ]);
        let hits = search_pages(&content, "rust", &Highlighter::default());

        let summary: Vec<(u32, usize)> = hits.iter().map(|h| (h.page, h.matches)).collect();
        assert_eq!(summary, vec![(1, 0), (2, 2), (5, 1)]);
        assert!(hits[2].html().contains("t<span class=\"highlight\">rust</span>"));
    }

    #[test]
    fn test_blank_query_has_no_hits() {
        let content = PagedContent::from_pages(vec![(1, "a b c".to_string())]);
        let hits = search_pages(&content, " ", &Highlighter::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].matches, 0);
    }
}
