// Chunk: docs/chunks/selection_projection - Selection <-> flat offset projection
//!
//! Selection projection between a surface and flat offsets.
//!
//! A render replaces every node of a surface, so a selection held as boundary
//! points does not survive it. Before the render the selection is projected
//! to offsets into the flattened text; afterwards each offset is located in
//! the new tree and the selection reinstalled.
//!
//! Everything here is total. A lost caret is recoverable and must never block
//! editing, so odd inputs degrade to `None` or to a clamped position.

use twin_edit_surface::{Position, Selection, Surface};
use twin_edit_text::Offsets;

/// Projects the surface's selection to flat offsets.
///
/// Returns `None` if there is no selection or either endpoint lies outside
/// the surface. The result is ordered, so a backward selection projects to
/// the same offsets as the equivalent forward one.
pub fn project(surface: &Surface) -> Option<Offsets> {
    let selection = surface.selection()?;
    if !surface.contains(selection.anchor.node) || !surface.contains(selection.focus.node) {
        return None;
    }
    let anchor = surface.text_len_before(selection.anchor)?;
    let focus = surface.text_len_before(selection.focus)?;
    Some(Offsets::new(anchor, focus))
}

/// Locates the boundary point for a flat offset.
///
/// Walks the text leaves in document order and returns the first leaf whose
/// cumulative length reaches `offset`, with the offset local to that leaf.
/// An offset past the end of the text clamps to the end of the root.
pub fn locate(surface: &Surface, offset: usize) -> Position {
    let mut count = 0;
    for leaf in surface.text_leaves() {
        let len = surface.text_len(leaf);
        if count + len >= offset {
            return Position::new(leaf, offset - count);
        }
        count += len;
    }
    let root = surface.root();
    Position::new(root, surface.child_count(root))
}

/// Installs a selection spanning `offsets`. A `None` leaves the surface alone.
pub fn restore(surface: &mut Surface, offsets: Option<Offsets>) {
    let Some(offsets) = offsets else {
        return;
    };
    let start = locate(surface, offsets.start);
    let end = locate(surface, offsets.end);
    surface.set_selection(Selection::new(start, end));
}
