// Chunk: docs/chunks/surface_tree - Editable surface node tree
//!
//! The editable surface a user types into.
//!
//! A `Surface` is a root element owning a tree of elements and text leaves,
//! plus the user's selection expressed as DOM-style boundary points. The
//! content can be replaced wholesale from rendered markup (what a render does)
//! or edited in place (what a user does), which is exactly the split the sync
//! layer has to reconcile: after a user edit the only thing known is that the
//! text leaves now read differently.

use log::warn;

use twin_edit_text::utf16;

use crate::markup::{self, MarkupNode};
use crate::node::{next_surface_id, Node, NodeId, NodeKind, Position, Selection};

const ROOT: u32 = 0;

/// An editable region: a node tree plus a selection.
#[derive(Debug, Clone)]
pub struct Surface {
    id: u32,
    epoch: u32,
    nodes: Vec<Node>,
    selection: Option<Selection>,
}

impl Surface {
    /// Creates an empty surface whose root element is a `div`.
    pub fn new() -> Self {
        Self {
            id: next_surface_id(),
            epoch: 0,
            nodes: vec![Node::element("div", None)],
            selection: None,
        }
    }

    /// Creates a surface and loads `markup` into it.
    pub fn from_markup(markup: &str) -> Self {
        let mut surface = Self::new();
        surface.set_markup(markup);
        surface
    }

    // ==================== Tree access ====================

    /// The root element.
    pub fn root(&self) -> NodeId {
        self.id_of(ROOT)
    }

    /// Returns true if `node` is the root or a node currently attached under it.
    ///
    /// Ids from another surface, or from content that was replaced since the
    /// id was handed out, are not contained.
    pub fn contains(&self, node: NodeId) -> bool {
        self.resolve(node).is_some()
    }

    /// Number of children of `node` (0 for text leaves and unknown ids).
    pub fn child_count(&self, node: NodeId) -> usize {
        self.resolve(node)
            .map(|idx| self.nodes[idx as usize].children.len())
            .unwrap_or(0)
    }

    /// Children of `node` in order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        match self.resolve(node) {
            Some(idx) => self.nodes[idx as usize]
                .children
                .iter()
                .map(|&c| self.id_of(c))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Tag name of an element, `None` for text leaves.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        let idx = self.resolve(node)?;
        match &self.nodes[idx as usize].kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Text of a text leaf, `None` for elements.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        let idx = self.resolve(node)?;
        match &self.nodes[idx as usize].kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    /// Length of a node's text in UTF-16 units (0 for elements).
    pub fn text_len(&self, node: NodeId) -> usize {
        self.text(node).map(utf16::len).unwrap_or(0)
    }

    /// Text leaves in document order.
    pub fn text_leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        self.collect_leaves(ROOT, &mut leaves);
        leaves.into_iter().map(|idx| self.id_of(idx)).collect()
    }

    /// Concatenation of all text leaves, exactly as stored.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for idx in self.leaf_indices() {
            if let NodeKind::Text(text) = &self.nodes[idx as usize].kind {
                out.push_str(text);
            }
        }
        out
    }

    /// The text the sync layer compares: [`text_content`](Self::text_content)
    /// with non-breaking spaces read as ordinary spaces.
    pub fn flattened_text(&self) -> String {
        utf16::normalize_nbsp(&self.text_content())
    }

    /// UTF-16 length of the content strictly before `pos`.
    ///
    /// This is the length of a range from the start of the root to `pos`.
    /// Returns `None` if `pos` is not inside this surface.
    pub fn text_len_before(&self, pos: Position) -> Option<usize> {
        let target = self.resolve(pos.node)?;
        let mut total = 0;
        if self.measure(ROOT, target, pos.offset, &mut total) {
            Some(total)
        } else {
            None
        }
    }

    /// Serializes the content (excluding the root element) back to markup.
    pub fn markup(&self) -> String {
        let mut out = String::new();
        for &child in &self.nodes[ROOT as usize].children {
            self.write_markup(child, &mut out);
        }
        out
    }

    // ==================== Content replacement ====================

    /// Replaces the root's content with parsed `markup` (like assigning
    /// `innerHTML`).
    ///
    /// Every node id from the previous content stops resolving. A selection
    /// collapses to the start of the root, as a live DOM range would. Markup
    /// that fails to parse is loaded as a single text leaf holding the raw
    /// markup.
    pub fn set_markup(&mut self, markup: &str) {
        let parsed = match markup::parse(markup) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!("surface {}: loading unparseable markup as text: {}", self.id, err);
                vec![MarkupNode::Text(markup.to_string())]
            }
        };

        self.epoch += 1;
        self.nodes.truncate(1);
        self.nodes[ROOT as usize].children.clear();
        for node in &parsed {
            self.build(node, ROOT);
        }

        // Every old node is gone, so any live selection ends up at (root, 0).
        if self.selection.is_some() {
            self.selection = Some(Selection::caret(Position::new(self.root(), 0)));
        }
    }

    // ==================== Selection ====================

    /// The active selection, if any.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Installs a selection. Endpoints are taken as given; nodes outside the
    /// surface are allowed, and are what "selection outside the surface"
    /// means to callers.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Selects from `anchor` to `focus`.
    pub fn select(&mut self, anchor: Position, focus: Position) {
        self.selection = Some(Selection::new(anchor, focus));
    }

    // ==================== User editing ====================

    /// Replaces the flat range `[start, end)` with `text`, editing text
    /// leaves in place, and leaves a caret after the inserted text.
    ///
    /// Models what typing, pasting or deleting does to the surface: the tree
    /// shape is preserved and only leaf text changes. Offsets are clamped.
    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        let total = utf16::len(&self.text_content());
        let start = start.min(total);
        let end = end.clamp(start, total);

        let leaves = self.leaf_indices();
        if leaves.is_empty() {
            if text.is_empty() {
                return;
            }
            let idx = self.push_node(Node::text(text, Some(ROOT)));
            self.nodes[ROOT as usize].children.push(idx);
            let caret = Position::new(self.id_of(idx), utf16::len(text));
            self.selection = Some(Selection::caret(caret));
            return;
        }

        let mut insert_at: Option<(u32, usize)> = None;
        let mut count = 0;
        for idx in leaves {
            let leaf_text = match &self.nodes[idx as usize].kind {
                NodeKind::Text(t) => t.clone(),
                NodeKind::Element { .. } => continue,
            };
            let len = utf16::len(&leaf_text);
            let leaf_start = count;
            let leaf_end = count + len;
            count = leaf_end;

            if insert_at.is_none() && leaf_end >= start {
                insert_at = Some((idx, start - leaf_start));
            }
            let cut_from = start.max(leaf_start);
            let cut_to = end.min(leaf_end);
            if cut_from < cut_to {
                let local_from = utf16::byte_index(&leaf_text, cut_from - leaf_start);
                let local_to = utf16::byte_index(&leaf_text, cut_to - leaf_start);
                let mut edited = leaf_text;
                edited.replace_range(local_from..local_to, "");
                self.nodes[idx as usize].kind = NodeKind::Text(edited);
            }
        }

        if let Some((idx, local)) = insert_at {
            if let NodeKind::Text(leaf_text) = &mut self.nodes[idx as usize].kind {
                let at = utf16::byte_index(leaf_text, local);
                leaf_text.insert_str(at, text);
            }
            let caret = Position::new(self.id_of(idx), local + utf16::len(text));
            self.selection = Some(Selection::caret(caret));
        }
    }

    /// Inserts `text` at the current selection, replacing it if it is a range.
    ///
    /// With no selection the text goes at the end of the content.
    pub fn type_text(&mut self, text: &str) {
        let (start, end) = self.selection_span();
        self.replace_range(start, end, text);
    }

    /// Deletes the selected range, or the character before a caret.
    pub fn delete_backward(&mut self) {
        let (start, end) = self.selection_span();
        if start != end {
            self.replace_range(start, end, "");
            return;
        }
        if start == 0 {
            return;
        }
        let content = self.text_content();
        let before = utf16::slice(&content, 0, start);
        let width = before.chars().last().map(char::len_utf16).unwrap_or(1);
        self.replace_range(start - width, start, "");
    }

    /// Overwrites the text of one leaf directly.
    pub fn set_leaf_text(&mut self, leaf: NodeId, text: &str) {
        if let Some(idx) = self.resolve(leaf) {
            if let NodeKind::Text(existing) = &mut self.nodes[idx as usize].kind {
                *existing = text.to_string();
            }
        }
    }

    // ==================== Internals ====================

    fn id_of(&self, index: u32) -> NodeId {
        NodeId {
            surface: self.id,
            epoch: self.epoch,
            index,
        }
    }

    fn resolve(&self, node: NodeId) -> Option<u32> {
        if node.surface != self.id {
            return None;
        }
        if node.index == ROOT {
            return Some(ROOT);
        }
        if node.epoch != self.epoch || node.index as usize >= self.nodes.len() {
            return None;
        }
        // Walk up to make sure the node is still attached.
        let mut current = node.index;
        while let Some(parent) = self.nodes[current as usize].parent {
            if parent == ROOT {
                return Some(node.index);
            }
            current = parent;
        }
        None
    }

    fn push_node(&mut self, node: Node) -> u32 {
        self.nodes.push(node);
        (self.nodes.len() - 1) as u32
    }

    fn build(&mut self, node: &MarkupNode, parent: u32) {
        match node {
            MarkupNode::Text(text) => {
                let idx = self.push_node(Node::text(text.clone(), Some(parent)));
                self.nodes[parent as usize].children.push(idx);
            }
            MarkupNode::Element { tag, children } => {
                let idx = self.push_node(Node::element(tag.clone(), Some(parent)));
                self.nodes[parent as usize].children.push(idx);
                for child in children {
                    self.build(child, idx);
                }
            }
        }
    }

    fn leaf_indices(&self) -> Vec<u32> {
        let mut leaves = Vec::new();
        self.collect_leaves(ROOT, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, idx: u32, out: &mut Vec<u32>) {
        let node = &self.nodes[idx as usize];
        match node.kind {
            NodeKind::Text(_) => out.push(idx),
            NodeKind::Element { .. } => {
                for &child in &node.children {
                    self.collect_leaves(child, out);
                }
            }
        }
    }

    /// Pre-order walk adding text lengths to `total` until the boundary
    /// `(target, offset)` is reached. Returns true once it has been.
    fn measure(&self, idx: u32, target: u32, offset: usize, total: &mut usize) -> bool {
        let node = &self.nodes[idx as usize];
        match &node.kind {
            NodeKind::Text(text) => {
                let len = utf16::len(text);
                if idx == target {
                    *total += offset.min(len);
                    return true;
                }
                *total += len;
                false
            }
            NodeKind::Element { .. } => {
                for (i, &child) in node.children.iter().enumerate() {
                    if idx == target && i == offset {
                        return true;
                    }
                    if self.measure(child, target, offset, total) {
                        return true;
                    }
                }
                idx == target
            }
        }
    }

    fn selection_span(&self) -> (usize, usize) {
        let end_of_text = utf16::len(&self.text_content());
        match self.selection {
            Some(sel) => {
                let a = self.text_len_before(sel.anchor).unwrap_or(end_of_text);
                let f = self.text_len_before(sel.focus).unwrap_or(end_of_text);
                (a.min(f), a.max(f))
            }
            None => (end_of_text, end_of_text),
        }
    }

    fn write_markup(&self, idx: u32, out: &mut String) {
        let node = &self.nodes[idx as usize];
        match &node.kind {
            NodeKind::Text(text) => out.push_str(&markup::escape(text)),
            NodeKind::Element { tag } => {
                out.push('<');
                out.push_str(tag);
                out.push('>');
                for &child in &node.children {
                    self.write_markup(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Puts a selection inside the first text leaf.
    fn select_in_first_leaf(surface: &mut Surface, anchor: usize, focus: usize) {
        let leaf = surface.text_leaves()[0];
        surface.select(Position::new(leaf, anchor), Position::new(leaf, focus));
    }

    #[test]
    fn new_surface_is_empty() {
        let surface = Surface::new();
        assert_eq!(surface.text_content(), "");
        assert!(surface.text_leaves().is_empty());
        assert!(surface.selection().is_none());
    }

    #[test]
    fn set_markup_builds_tree() {
        let surface = Surface::from_markup("<p>ab<strong>cd</strong>e</p>");
        assert_eq!(surface.text_content(), "abcde");
        assert_eq!(surface.text_leaves().len(), 3);
        let p = surface.children(surface.root())[0];
        assert_eq!(surface.tag(p), Some("p"));
        assert_eq!(surface.child_count(p), 3);
    }

    #[test]
    fn flattened_text_normalizes_nbsp() {
        let surface = Surface::from_markup("a&nbsp;b");
        assert_eq!(surface.text_content(), "a\u{00A0}b");
        assert_eq!(surface.flattened_text(), "a b");
    }

    #[test]
    fn replace_invalidates_old_ids() {
        let mut surface = Surface::from_markup("<p>old</p>");
        let leaf = surface.text_leaves()[0];
        assert!(surface.contains(leaf));

        surface.set_markup("<p>new</p>");
        assert!(!surface.contains(leaf));
        assert!(surface.contains(surface.root()));
    }

    #[test]
    fn ids_from_other_surfaces_are_not_contained() {
        let a = Surface::from_markup("x");
        let b = Surface::from_markup("x");
        assert!(!b.contains(a.text_leaves()[0]));
        assert!(!b.contains(a.root()));
    }

    #[test]
    fn replace_collapses_stale_selection_to_root_start() {
        let mut surface = Surface::from_markup("<p>hello</p>");
        select_in_first_leaf(&mut surface, 1, 3);
        surface.set_markup("<p>hello</p>");
        let sel = surface.selection().unwrap();
        assert_eq!(sel.anchor, Position::new(surface.root(), 0));
        assert!(sel.is_collapsed());
    }

    #[test]
    fn unparseable_markup_becomes_text() {
        let surface = Surface::from_markup("a<b");
        assert_eq!(surface.text_content(), "a<b");
    }

    #[test]
    fn text_len_before_text_boundary() {
        let surface = Surface::from_markup("<p>ab<em>cd</em>ef</p>");
        let leaves = surface.text_leaves();
        assert_eq!(surface.text_len_before(Position::new(leaves[1], 1)), Some(3));
        assert_eq!(surface.text_len_before(Position::new(leaves[2], 0)), Some(4));
    }

    #[test]
    fn text_len_before_element_boundary() {
        let surface = Surface::from_markup("<p>ab<em>cd</em>ef</p>");
        let p = surface.children(surface.root())[0];
        assert_eq!(surface.text_len_before(Position::new(p, 0)), Some(0));
        assert_eq!(surface.text_len_before(Position::new(p, 2)), Some(4));
        assert_eq!(surface.text_len_before(Position::new(p, 3)), Some(6));
        let root = surface.root();
        assert_eq!(surface.text_len_before(Position::new(root, 1)), Some(6));
    }

    #[test]
    fn text_len_before_foreign_position_is_none() {
        let a = Surface::from_markup("abc");
        let b = Surface::from_markup("abc");
        assert_eq!(b.text_len_before(Position::new(a.text_leaves()[0], 1)), None);
    }

    #[test]
    fn replace_range_within_leaf() {
        let mut surface = Surface::from_markup("<p>hello</p>");
        surface.replace_range(0, 0, "X");
        assert_eq!(surface.text_content(), "Xhello");
        assert_eq!(surface.markup(), "<p>Xhello</p>");
    }

    #[test]
    fn replace_range_across_leaves() {
        let mut surface = Surface::from_markup("ab<strong>cd</strong>ef");
        surface.replace_range(1, 5, "Z");
        assert_eq!(surface.text_content(), "aZf");
        assert_eq!(surface.markup(), "aZ<strong></strong>f");
    }

    #[test]
    fn replace_range_on_empty_surface_creates_leaf() {
        let mut surface = Surface::new();
        surface.replace_range(0, 0, "hi");
        assert_eq!(surface.text_content(), "hi");
        assert_eq!(surface.text_leaves().len(), 1);
    }

    #[test]
    fn typing_follows_caret() {
        let mut surface = Surface::from_markup("<p>ac</p>");
        select_in_first_leaf(&mut surface, 1, 1);
        surface.type_text("b");
        surface.type_text("!");
        assert_eq!(surface.text_content(), "ab!c");
    }

    #[test]
    fn typing_replaces_selection() {
        let mut surface = Surface::from_markup("<p>hello world</p>");
        select_in_first_leaf(&mut surface, 11, 6);
        surface.type_text("there");
        assert_eq!(surface.text_content(), "hello there");
    }

    #[test]
    fn delete_backward_removes_whole_surrogate_pair() {
        let mut surface = Surface::from_markup("a\u{1F600}");
        select_in_first_leaf(&mut surface, 3, 3);
        surface.delete_backward();
        assert_eq!(surface.text_content(), "a");
    }

    #[test]
    fn delete_backward_at_start_is_noop() {
        let mut surface = Surface::from_markup("abc");
        select_in_first_leaf(&mut surface, 0, 0);
        surface.delete_backward();
        assert_eq!(surface.text_content(), "abc");
    }
}
