// Chunk: docs/chunks/surface_tree - Editable surface node tree

use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_SURFACE_ID: AtomicU32 = AtomicU32::new(1);

pub(crate) fn next_surface_id() -> u32 {
    NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a node inside a [`Surface`](crate::Surface).
///
/// Ids carry the owning surface and the content epoch they were created in.
/// Replacing a surface's markup starts a new epoch, so ids handed out before
/// the replace no longer resolve (the node is "outside" the surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) surface: u32,
    pub(crate) epoch: u32,
    pub(crate) index: u32,
}

/// A boundary point, as in a DOM range.
///
/// Inside a text leaf `offset` counts UTF-16 code units; inside an element it
/// is a child index (`offset == child_count` means "after the last child").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// The surface's active selection.
///
/// `anchor` is where the user started dragging and `focus` where they
/// stopped, so `focus` may come before `anchor` (a backward selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(at: Position) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Element { tag: String },
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<u32>,
    pub(crate) children: Vec<u32>,
}

impl Node {
    pub(crate) fn element(tag: impl Into<String>, parent: Option<u32>) -> Self {
        Self {
            kind: NodeKind::Element { tag: tag.into() },
            parent,
            children: Vec::new(),
        }
    }

    pub(crate) fn text(text: impl Into<String>, parent: Option<u32>) -> Self {
        Self {
            kind: NodeKind::Text(text.into()),
            parent,
            children: Vec::new(),
        }
    }
}
