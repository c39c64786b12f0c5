//! Word views and two-click word range selection
//!
//! A page's text is laid out as one `span.word` per whitespace-separated word,
//! each tagged with its index, so a click target maps straight back to a word.

use std::ops::RangeInclusive;

use crate::tree::{NodeId, TextTree};

pub const WORD_CLASS: &str = "word";
pub const SELECTED_CLASS: &str = "selected";
pub const WORD_INDEX_ATTR: &str = "data-word-index";

/// Split text into words on whitespace runs
pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// A page rendered as indexed word spans
#[derive(Debug, Clone)]
pub struct WordView {
    tree: TextTree,
    words: Vec<String>,
    spans: Vec<NodeId>,
}

impl WordView {
    /// Lay out `page_text` as `div > div > (span.word "w", " ")*`
    pub fn build(page_text: &str) -> Self {
        let mut tree = TextTree::new("div");
        let root = tree.root();
        let page = tree.append_element(root, "div");

        let words = split_words(page_text);
        let mut spans = Vec::with_capacity(words.len());
        for (index, word) in words.iter().enumerate() {
            let span = tree.append_element(page, "span");
            tree.add_class(span, WORD_CLASS);
            tree.set_attr(span, WORD_INDEX_ATTR, &index.to_string());
            tree.append_text(span, word);
            tree.append_text(page, " ");
            spans.push(span);
        }

        Self { tree, words, spans }
    }

    pub fn tree(&self) -> &TextTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut TextTree {
        &mut self.tree
    }

    /// Root of the view, the container searches run against
    pub fn container(&self) -> NodeId {
        self.tree.root()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn spans(&self) -> &[NodeId] {
        &self.spans
    }

    /// Word index for a click on `target`, looking through enclosing nodes
    /// (a click may land on a highlight marker inside the word span)
    pub fn word_index_at(&self, target: NodeId) -> Option<usize> {
        let mut node = Some(target);
        while let Some(id) = node {
            if !self.tree.contains(id) {
                return None;
            }
            if self.tree.has_class(id, WORD_CLASS) {
                return self.tree.attr(id, WORD_INDEX_ATTR)?.parse().ok();
            }
            node = self.tree.parent(id);
        }
        None
    }

    /// Mark only the word at `index` as selected
    pub fn mark_anchor(&mut self, index: usize) {
        self.mark_range(index..=index);
    }

    /// Mark words inside `range` as selected and unmark all others
    pub fn mark_range(&mut self, range: RangeInclusive<usize>) {
        for (index, &span) in self.spans.iter().enumerate() {
            if range.contains(&index) {
                self.tree.add_class(span, SELECTED_CLASS);
            } else {
                self.tree.remove_class(span, SELECTED_CLASS);
            }
        }
    }

    pub fn clear_marks(&mut self) {
        for &span in &self.spans {
            self.tree.remove_class(span, SELECTED_CLASS);
        }
    }

    /// Indices of currently selected words
    pub fn marked(&self) -> Vec<usize> {
        self.spans
            .iter()
            .enumerate()
            .filter(|(_, &span)| self.tree.has_class(span, SELECTED_CLASS))
            .map(|(index, _)| index)
            .collect()
    }

    /// Words inside `range` joined by single spaces
    pub fn selected_text(&self, range: RangeInclusive<usize>) -> String {
        let end = (*range.end()).min(self.words.len().saturating_sub(1));
        self.words
            .get(*range.start()..=end)
            .map(|words| words.join(" "))
            .unwrap_or_default()
    }
}

/// Outcome of a click in a [`WordSelection`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStep {
    /// First click: the anchor word
    Started(usize),
    /// Second click: the ordered, inclusive range between anchor and this word
    Completed(RangeInclusive<usize>),
}

/// Two-click selection of a word range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordSelection {
    anchor: Option<usize>,
}

impl WordSelection {
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn click(&mut self, index: usize) -> SelectionStep {
        match self.anchor.take() {
            None => {
                self.anchor = Some(index);
                SelectionStep::Started(index)
            }
            Some(anchor) => SelectionStep::Completed(anchor.min(index)..=anchor.max(index)),
        }
    }

    pub fn reset(&mut self) {
        self.anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::find_and_highlight;
    use crate::tree::NodeKind;

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("  one\ttwo \n three  "), vec!["one", "two", "three"]);
        assert!(split_words(" \n ").is_empty());
    }

    #[test]
    fn test_build_layout() {
        let view = WordView::build("Hello  brave\nworld");
        assert_eq!(view.words(), ["Hello", "brave", "world"]);
        assert_eq!(view.spans().len(), 3);
        assert_eq!(view.tree().text_content(view.container()), "Hello brave world ");
        assert_eq!(
            view.tree().attr(view.spans()[1], WORD_INDEX_ATTR),
            Some("1")
        );
    }

    #[test]
    fn test_selection_clicks() {
        let mut selection = WordSelection::default();
        assert_eq!(selection.click(5), SelectionStep::Started(5));
        assert_eq!(selection.anchor(), Some(5));
        assert_eq!(selection.click(2), SelectionStep::Completed(2..=5));
        assert_eq!(selection.anchor(), None);
        assert_eq!(selection.click(1), SelectionStep::Started(1));
        assert_eq!(selection.click(1), SelectionStep::Completed(1..=1));
    }

    #[test]
    fn test_mark_range_and_text() {
        let mut view = WordView::build("a b c d e");
        view.mark_anchor(3);
        assert_eq!(view.marked(), vec![3]);
        view.mark_range(1..=3);
        assert_eq!(view.marked(), vec![1, 2, 3]);
        assert_eq!(view.selected_text(1..=3), "b c d");
        assert_eq!(view.selected_text(3..=99), "d e");
        assert_eq!(view.selected_text(7..=9), "");
        view.clear_marks();
        assert!(view.marked().is_empty());
    }

    #[test]
    fn test_word_index_through_marker() {
        let mut view = WordView::build("alpha beta");
        let container = view.container();
        find_and_highlight(view.tree_mut(), container, "bet");

        let span = view.spans()[1];
        let marker = view.tree().children(span)[0];
        assert!(matches!(view.tree().kind(marker), NodeKind::Marker { .. }));
        assert_eq!(view.word_index_at(marker), Some(1));
        assert_eq!(view.word_index_at(container), None);
    }
}
