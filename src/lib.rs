//! PDF text workbench: page extraction, paged views and in-place search highlighting
//!
//! This crate provides:
//! - Per-page text extraction from PDFs with a page selection syntax (`1, 3-5`)
//! - An arena-backed text tree and a highlight engine that marks every
//!   case-insensitive literal match of a query in place
//! - Word views with two-click range selection
//! - An explicit application state driven by pure update functions
//! - Markdown and HTML export of formatted pages

pub mod export;
pub mod extractor;
pub mod format;
pub mod highlight;
pub mod pages;
pub mod search;
pub mod state;
pub mod tree;
pub mod words;

pub use extractor::{extract_pages, extract_pages_mem, page_count, page_count_mem};
pub use highlight::{find_and_highlight, HighlightOptions, Highlighter};
pub use pages::{parse_page_numbers, PagedContent};
pub use search::{search_pages, PageHits};
pub use state::{update, Action, AppState, Notice, NoticeKind, View};
pub use tree::{NodeId, NodeKind, TextTree};
pub use words::{split_words, SelectionStep, WordSelection, WordView};

#[derive(Debug, thiserror::Error)]
pub enum WorkbenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("No valid pages in selection {0:?} (e.g. 1, 3-5)")]
    NoPagesSelected(String),
    #[error("Could not find text on the specified pages")]
    NoText,
}

impl From<lopdf::Error> for WorkbenchError {
    fn from(e: lopdf::Error) -> Self {
        WorkbenchError::Parse(e.to_string())
    }
}
