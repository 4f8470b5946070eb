// Chunk: docs/chunks/replica_session - Replica render/sync session
//!
//! Session event types.
//!
//! Everything that can happen to a session from the outside (a surface
//! reporting an edit, the pointer or keyboard settling a selection, a toolbar
//! button, the link switch) arrives as one `SessionEvent` and is processed by
//! [`Session::dispatch`](crate::Session::dispatch) to completion, one at a
//! time.

use twin_edit_engine::MarkKind;

use crate::replica::Side;

/// Where a surface input notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOrigin {
    /// The user edited the surface.
    User,
    /// Script or the system produced the notification.
    Synthetic,
}

/// A toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Mark(MarkKind),
    Clear,
}

/// Unified event type for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A surface's content changed.
    Input { side: Side, origin: InputOrigin },

    /// Pointer released over a surface.
    PointerUp(Side),

    /// Key released in a surface.
    KeyUp(Side),

    /// The document selection moved (may affect either surface).
    SelectionChange,

    /// A toolbar button was pressed in `side`'s pane.
    Toolbar { side: Side, action: ToolbarAction },

    /// The link switch was flipped.
    LinkToggle(bool),

    /// A surface took input focus.
    Focus(Side),

    /// Input focus left both surfaces.
    Blur,
}

impl SessionEvent {
    /// Shorthand for a user-originated input event.
    pub fn user_input(side: Side) -> Self {
        SessionEvent::Input {
            side,
            origin: InputOrigin::User,
        }
    }
}
