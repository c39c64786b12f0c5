//! Arena-backed text tree
//!
//! Nodes live in a flat arena and refer to each other by [`NodeId`]. Element,
//! text and highlight-marker nodes share one [`NodeKind`] enum, so in-place
//! rewrites (splitting a text leaf, unwrapping a marker) are index updates
//! rather than reference surgery. Removed subtrees are released to a free
//! list and their slots reused by later allocations.

use std::ops::Index;

/// Handle to a node in a [`TextTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A structural element (`div`, `span`, `script`, ...)
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    /// A text leaf
    Text(String),
    /// A highlight marker wrapping a single text child
    Marker { class: String },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A tree of element, text and marker nodes rooted at a single element
#[derive(Debug, Clone)]
pub struct TextTree {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
}

impl TextTree {
    /// Create a tree with an empty root element
    pub fn new(root_tag: &str) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.create_element(root_tag);
        tree
    }

    /// Create a tree whose root holds `text` as a single text leaf
    pub fn from_text(root_tag: &str, text: &str) -> Self {
        let mut tree = Self::new(root_tag);
        if !text.is_empty() {
            let root = tree.root;
            tree.append_text(root, text);
        }
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node, `None` if the id was released
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of nodes currently allocated (attached or detached)
    pub fn live_node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            kind,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.nodes.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => node,
            None => panic!("node {:?} was released", id),
        }
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
        })
    }

    /// Create a detached text leaf
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    /// Create a detached marker holding `text` as its only child
    pub fn create_marker(&mut self, class: &str, text: &str) -> NodeId {
        let marker = self.alloc(NodeKind::Marker {
            class: class.to_string(),
        });
        let leaf = self.create_text(text);
        self.append_child(marker, leaf);
        marker
    }

    /// Append `child` as the last child of `parent`, detaching it first if needed
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.create_text(text);
        self.append_child(parent, id);
        id
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != id);
        }
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self[id].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self[id].children
    }

    /// Text of a text leaf, `None` for elements and markers
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self[id].kind {
            NodeKind::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Tag name of an element, `None` for text and markers
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self[id].kind {
            NodeKind::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self[id].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodeKind::Marker { class } if name == "class" => Some(class.as_str()),
            _ => None,
        }
    }

    /// Set an attribute on an element; ignored for text and markers
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.node_mut(id).kind {
            match attrs.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let classes = match self.attr(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", &classes);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if !self.has_class(id, class) {
            return;
        }
        let classes = self
            .attr(id, "class")
            .unwrap_or_default()
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(id, "class", &classes);
    }

    /// All nodes below `id` in document (pre-)order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self[id].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self[next].children.iter().rev().copied());
        }
        out
    }

    /// Concatenated text of every text leaf at or below `id`
    pub fn text_content(&self, id: NodeId) -> String {
        if let NodeKind::Text(text) = &self[id].kind {
            return text.clone();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.text(d))
            .collect()
    }

    /// Replace `old` with the detached nodes in `replacements`, in order.
    ///
    /// `old` and its subtree are released. Returns `false` (and leaves the
    /// tree untouched) when `old` has no parent.
    pub fn replace_with(&mut self, old: NodeId, replacements: &[NodeId]) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        let Some(position) = self[parent].children.iter().position(|&c| c == old) else {
            return false;
        };
        for &new in replacements {
            self.detach(new);
            self.node_mut(new).parent = Some(parent);
        }
        self.node_mut(parent)
            .children
            .splice(position..=position, replacements.iter().copied());
        self.node_mut(old).parent = None;
        self.release(old);
        true
    }

    /// Replace every child of `parent` accepted by `unwrap` with a plain text
    /// node holding its text content, in one pass over the child list.
    ///
    /// Returns the number of children replaced.
    pub fn unwrap_children<F>(&mut self, parent: NodeId, unwrap: F) -> usize
    where
        F: Fn(&TextTree, NodeId) -> bool,
    {
        let children = self[parent].children.clone();
        let mut rebuilt = Vec::with_capacity(children.len());
        let mut replaced = 0;

        for child in children {
            if !unwrap(self, child) {
                rebuilt.push(child);
                continue;
            }
            let text = self.text_content(child);
            self.release(child);
            let plain = self.alloc(NodeKind::Text(text));
            self.node_mut(plain).parent = Some(parent);
            rebuilt.push(plain);
            replaced += 1;
        }

        self.node_mut(parent).children = rebuilt;
        replaced
    }

    /// Detach `id` from its parent and release its whole subtree
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
        self.release(id);
    }

    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes[next.0].take() {
                stack.extend(node.children);
                self.free.push(next.0);
            }
        }
    }

    /// Merge adjacent text children and drop empty ones, recursively
    pub fn normalize(&mut self, id: NodeId) {
        let children = self[id].children.clone();
        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());

        for child in children {
            let text = self.text(child).map(str::to_string);
            match text {
                Some(text) if text.is_empty() => self.release(child),
                Some(text) => {
                    let previous = kept.last().copied().filter(|&p| self.text(p).is_some());
                    match previous {
                        Some(prev) => {
                            if let NodeKind::Text(existing) = &mut self.node_mut(prev).kind {
                                existing.push_str(&text);
                            }
                            self.release(child);
                        }
                        None => kept.push(child),
                    }
                }
                None => {
                    self.normalize(child);
                    kept.push(child);
                }
            }
        }

        self.node_mut(id).children = kept;
    }

    /// Serialize the subtree at `id` as HTML
    pub fn render_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.render_into(id, &mut out);
        out
    }

    fn render_into(&self, id: NodeId, out: &mut String) {
        match &self[id].kind {
            NodeKind::Text(text) => out.push_str(&escape_html(text)),
            NodeKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attrs {
                    out.push_str(&format!(" {}=\"{}\"", key, escape_html(value)));
                }
                out.push('>');
                for &child in &self[id].children {
                    self.render_into(child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
            NodeKind::Marker { class } => {
                out.push_str(&format!("<span class=\"{}\">", escape_html(class)));
                for &child in &self[id].children {
                    self.render_into(child, out);
                }
                out.push_str("</span>");
            }
        }
    }
}

impl Index<NodeId> for TextTree {
    type Output = Node;

    /// Panics if `id` was released
    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node {:?} was released", id),
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (TextTree, NodeId, NodeId) {
        let mut tree = TextTree::new("div");
        let root = tree.root();
        let p = tree.append_element(root, "p");
        tree.append_text(p, "Hello ");
        let b = tree.append_element(p, "b");
        tree.append_text(b, "bold");
        tree.append_text(p, " world");
        (tree, p, b)
    }

    #[test]
    fn test_text_content_in_document_order() {
        let (tree, p, b) = sample();
        assert_eq!(tree.text_content(tree.root()), "Hello bold world");
        assert_eq!(tree.text_content(p), "Hello bold world");
        assert_eq!(tree.text_content(b), "bold");
    }

    #[test]
    fn test_descendants_preorder() {
        let (tree, p, b) = sample();
        let d = tree.descendants(tree.root());
        assert_eq!(d.len(), 5);
        assert_eq!(d[0], p);
        assert_eq!(tree.text(d[1]), Some("Hello "));
        assert_eq!(d[2], b);
        assert_eq!(tree.text(d[3]), Some("bold"));
        assert_eq!(tree.text(d[4]), Some(" world"));
    }

    #[test]
    fn test_replace_with_preserves_sibling_order() {
        let (mut tree, p, b) = sample();
        let x = tree.create_text("[");
        let y = tree.create_text("]");
        assert!(tree.replace_with(b, &[x, y]));
        assert_eq!(tree.children(p).len(), 4);
        assert_eq!(tree.text_content(p), "Hello [] world");
        assert!(!tree.contains(b));
    }

    #[test]
    fn test_replace_root_is_refused() {
        let (mut tree, _, _) = sample();
        let root = tree.root();
        let x = tree.create_text("x");
        assert!(!tree.replace_with(root, &[x]));
        assert!(tree.contains(root));
    }

    #[test]
    fn test_normalize_merges_and_drops_empty() {
        let mut tree = TextTree::new("div");
        let root = tree.root();
        tree.append_text(root, "a");
        tree.append_text(root, "");
        tree.append_text(root, "b");
        let span = tree.append_element(root, "span");
        tree.append_text(span, "c");
        tree.append_text(span, "d");
        tree.append_text(root, "e");

        tree.normalize(root);

        assert_eq!(tree.children(root).len(), 3);
        assert_eq!(tree.text(tree.children(root)[0]), Some("ab"));
        assert_eq!(tree.children(span).len(), 1);
        assert_eq!(tree.text_content(root), "abcde");
    }

    #[test]
    fn test_unwrap_children_in_place() {
        let mut tree = TextTree::new("div");
        let root = tree.root();
        tree.append_text(root, "a ");
        let m1 = tree.create_marker("highlight", "b");
        tree.append_child(root, m1);
        let em = tree.append_element(root, "em");
        tree.append_text(em, "c");
        let m2 = tree.create_marker("other", "d");
        tree.append_child(root, m2);
        let before = tree.live_node_count();

        let replaced = tree.unwrap_children(root, |t, id| t.has_class(id, "highlight"));
        assert_eq!(replaced, 1);
        assert_eq!(tree.live_node_count(), before - 1);
        let kids = tree.children(root).to_vec();
        assert_eq!(kids.len(), 4);
        assert_eq!(tree.text(kids[1]), Some("b"));
        assert_eq!(tree.parent(kids[1]), Some(root));
        assert_eq!(kids[2], em);
        assert_eq!(kids[3], m2);
        assert_eq!(tree.text_content(root), "a bcd");
    }

    #[test]
    fn test_released_slots_are_reused() {
        let (mut tree, _, b) = sample();
        let before = tree.live_node_count();
        tree.remove(b);
        assert_eq!(tree.live_node_count(), before - 2);
        tree.create_text("again");
        tree.create_text("again");
        assert_eq!(tree.live_node_count(), before);
    }

    #[test]
    fn test_classes() {
        let mut tree = TextTree::new("div");
        let span = tree.append_element(tree.root(), "span");
        tree.add_class(span, "word");
        tree.add_class(span, "selected");
        tree.add_class(span, "word");
        assert_eq!(tree.attr(span, "class"), Some("word selected"));
        tree.remove_class(span, "word");
        assert!(!tree.has_class(span, "word"));
        assert!(tree.has_class(span, "selected"));
    }

    #[test]
    fn test_render_html_escapes() {
        let mut tree = TextTree::new("div");
        let root = tree.root();
        tree.append_text(root, "a < b & ");
        let marker = tree.create_marker("highlight", "c");
        tree.append_child(root, marker);
        assert_eq!(
            tree.render_html(root),
            "<div>a &lt; b &amp; <span class=\"highlight\">c</span></div>"
        );
    }
}
