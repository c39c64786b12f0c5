//! Application state and its update function
//!
//! All view state (page cursors, word view, selection, last notice) lives in
//! one [`AppState`] value. [`update`] consumes a state and an [`Action`] and
//! returns the next state, so every transition can be tested on its own.

use crate::highlight::{HighlightOptions, Highlighter};
use crate::pages::PagedContent;
use crate::tree::TextTree;
use crate::words::{SelectionStep, WordSelection, WordView};

use log::debug;

/// Which of the two text panes an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Extracted,
    Formatted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A user-facing status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    /// Freshly extracted pages replace the extracted pane
    Extracted(PagedContent),
    /// Freshly formatted pages replace the formatted pane
    Formatted(PagedContent),
    NextPage(View),
    PrevPage(View),
    /// A selection click on the word with this index in the extracted pane
    SelectWord(usize),
    Find { view: View, query: String },
    Reset,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub extracted: PagedContent,
    pub formatted: PagedContent,
    /// Word layout of the current extracted page
    pub word_view: Option<WordView>,
    /// Container of the formatted pane: the current formatted page, or the
    /// last completed word selection
    pub formatted_view: Option<TextTree>,
    pub selection: WordSelection,
    /// Text produced by the last completed word selection
    pub selected_text: Option<String>,
    /// Marker count of the last search, per pane
    pub last_matches: Option<(View, usize)>,
    pub notice: Option<Notice>,
    pub highlight: HighlightOptions,
}

impl AppState {
    pub fn new(highlight: HighlightOptions) -> Self {
        Self {
            highlight,
            ..Default::default()
        }
    }

    fn rebuild_extracted_view(&mut self) {
        self.word_view = self.extracted.current_text().map(WordView::build);
        self.selection.reset();
    }

    fn rebuild_formatted_view(&mut self) {
        self.formatted_view = self
            .formatted
            .current_text()
            .map(|text| TextTree::from_text("div", text));
    }

    fn content_mut(&mut self, view: View) -> &mut PagedContent {
        match view {
            View::Extracted => &mut self.extracted,
            View::Formatted => &mut self.formatted,
        }
    }

    fn rebuild(&mut self, view: View) {
        match view {
            View::Extracted => self.rebuild_extracted_view(),
            View::Formatted => self.rebuild_formatted_view(),
        }
    }
}

/// Formatted pane content for a completed word selection: `div > p > text`
fn selection_view(text: &str) -> TextTree {
    let mut tree = TextTree::new("div");
    let root = tree.root();
    let p = tree.append_element(root, "p");
    tree.append_text(p, text);
    tree
}

/// Apply `action` to `state`, returning the next state
pub fn update(mut state: AppState, action: Action) -> AppState {
    state.notice = None;

    match action {
        Action::Extracted(content) => {
            state.extracted = content;
            state.selected_text = None;
            state.last_matches = None;
            state.rebuild_extracted_view();
            state.notice = Some(if state.extracted.is_empty() {
                Notice::error("Could not find text on the specified pages.")
            } else {
                Notice::success(format!("Extracted {} page(s).", state.extracted.len()))
            });
        }
        Action::Formatted(content) => {
            state.formatted = content;
            state.last_matches = None;
            state.rebuild_formatted_view();
            state.notice = Some(if state.formatted.is_empty() {
                Notice::error("Smart formatting failed for all pages.")
            } else {
                Notice::success("Smart formatting completed.")
            });
        }
        Action::NextPage(view) => {
            if state.content_mut(view).next_page() {
                state.rebuild(view);
            }
        }
        Action::PrevPage(view) => {
            if state.content_mut(view).prev_page() {
                state.rebuild(view);
            }
        }
        Action::SelectWord(index) => {
            let in_view = state
                .word_view
                .as_ref()
                .map(|v| index < v.words().len())
                .unwrap_or(false);
            if !in_view {
                debug!("ignoring selection click on word {}", index);
                return state;
            }
            let step = state.selection.click(index);
            if let Some(view) = state.word_view.as_mut() {
                match step {
                    SelectionStep::Started(anchor) => {
                        view.mark_anchor(anchor);
                        state.notice = Some(Notice::success(
                            "Selection started. Right-click on the end word to finish.",
                        ));
                    }
                    SelectionStep::Completed(range) => {
                        view.mark_range(range.clone());
                        let text = view.selected_text(range);
                        state.formatted_view = Some(selection_view(&text));
                        state.selected_text = Some(text);
                        state.notice = Some(Notice::success("Specific text extracted successfully!"));
                    }
                }
            }
        }
        Action::Find { view, query } => {
            let highlighter = Highlighter::new(state.highlight.clone());
            let matches = match view {
                View::Extracted => state.word_view.as_mut().map(|v| {
                    let container = v.container();
                    highlighter.find_and_highlight(v.tree_mut(), container, &query)
                }),
                View::Formatted => state.formatted_view.as_mut().map(|tree| {
                    let container = tree.root();
                    highlighter.find_and_highlight(tree, container, &query)
                }),
            };
            state.last_matches = matches.map(|count| (view, count));
        }
        Action::Reset => {
            state = AppState::new(state.highlight);
            state.notice = Some(Notice::success("Application has been reset."));
        }
    }

    state
}
