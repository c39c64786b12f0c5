//! In-place search highlighting on a [`TextTree`]
//!
//! Every call starts by reverting the markers left by the previous call, so
//! the tree never carries highlight state from one query to the next:
//! 1. Revert: unwrap each marker back into plain text and merge adjacent text
//! 2. Stop there if the query is blank
//! 3. Wrap every case-insensitive literal match, left to right and
//!    non-overlapping, in a fresh marker

use crate::tree::{NodeId, NodeKind, TextTree};

use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// Options for the highlight engine
#[derive(Debug, Clone)]
pub struct HighlightOptions {
    /// Class carried by inserted markers; only markers with this class are reverted
    pub marker_class: String,
    /// Elements whose direct text children are never searched
    pub skip_tags: Vec<String>,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            marker_class: "highlight".to_string(),
            skip_tags: vec!["script".to_string(), "style".to_string()],
        }
    }
}

/// Highlight engine bound to a set of options
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    options: HighlightOptions,
}

impl Highlighter {
    pub fn new(options: HighlightOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HighlightOptions {
        &self.options
    }

    /// Remove every marker under `container`, restoring merged plain text.
    ///
    /// Returns the number of markers removed.
    pub fn clear_highlights(&self, tree: &mut TextTree, container: NodeId) -> usize {
        let mut parents: Vec<NodeId> = Vec::new();
        let mut seen = HashSet::new();
        for id in tree.descendants(container) {
            if !self.is_marker(tree, id) {
                continue;
            }
            if let Some(parent) = tree.parent(id) {
                if seen.insert(parent) {
                    parents.push(parent);
                }
            }
        }

        // Each parent's child list is rebuilt once, however many markers it holds
        let mut removed = 0;
        for parent in parents {
            // Slot of an unwrapped nested marker may now hold a plain text node
            if !tree.contains(parent) {
                continue;
            }
            removed += tree.unwrap_children(parent, |tree, id| self.is_marker(tree, id));
            tree.normalize(parent);
        }

        removed
    }

    /// Revert previous highlights, then mark every match of `query`.
    ///
    /// Returns the number of markers inserted. A blank query only clears.
    pub fn find_and_highlight(&self, tree: &mut TextTree, container: NodeId, query: &str) -> usize {
        let reverted = self.clear_highlights(tree, container);
        debug!("reverted {} highlight(s)", reverted);

        if query.trim().is_empty() {
            return 0;
        }

        let pattern = match build_pattern(query) {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!("cannot search for query of {} bytes: {}", query.len(), e);
                return 0;
            }
        };

        let leaves: Vec<NodeId> = tree
            .descendants(container)
            .into_iter()
            .filter(|&id| matches!(tree.text(id), Some(text) if pattern.is_match(text)))
            .filter(|&id| !self.is_skipped(tree, id))
            .collect();

        let mut inserted = 0;
        for leaf in leaves {
            let Some(text) = tree.text(leaf).map(str::to_string) else {
                continue;
            };

            let mut sequence = Vec::new();
            let mut last_end = 0;
            for mat in pattern.find_iter(&text) {
                if mat.start() > last_end {
                    sequence.push(tree.create_text(&text[last_end..mat.start()]));
                }
                sequence.push(tree.create_marker(&self.options.marker_class, mat.as_str()));
                last_end = mat.end();
            }
            if last_end < text.len() {
                sequence.push(tree.create_text(&text[last_end..]));
            }

            let markers = sequence
                .iter()
                .filter(|&&id| matches!(tree.kind(id), NodeKind::Marker { .. }))
                .count();
            if tree.replace_with(leaf, &sequence) {
                inserted += markers;
            } else {
                for id in sequence {
                    tree.remove(id);
                }
            }
        }

        debug!("highlighted {} match(es) for {:?}", inserted, query);
        inserted
    }

    fn is_marker(&self, tree: &TextTree, id: NodeId) -> bool {
        matches!(tree.kind(id), NodeKind::Marker { class } if *class == self.options.marker_class)
    }

    /// Text whose parent is a non-content element (script, style, ...)
    fn is_skipped(&self, tree: &TextTree, id: NodeId) -> bool {
        tree.parent(id)
            .and_then(|parent| tree.tag(parent))
            .map(|tag| {
                self.options
                    .skip_tags
                    .iter()
                    .any(|skip| skip.eq_ignore_ascii_case(tag))
            })
            .unwrap_or(false)
    }
}

/// Highlight `query` under `container` with default options
pub fn find_and_highlight(tree: &mut TextTree, container: NodeId, query: &str) -> usize {
    Highlighter::default().find_and_highlight(tree, container, query)
}

/// Compile `query` as a case-insensitive literal pattern
fn build_pattern(query: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
}
