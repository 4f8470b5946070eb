// Chunk: docs/chunks/replica_session - Replica render/sync session

use std::fmt;

use twin_edit_engine::{DocHandle, UpdateRecord};
use twin_edit_surface::Surface;
use twin_edit_text::Offsets;

use crate::render::{RenderGate, RenderState};

/// Names one of the two replicas in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The left pane.
    A,
    /// The right pane.
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    /// The other replica.
    pub fn peer(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Tag the replica's document is created with.
    pub fn replica_tag(&self) -> u32 {
        match self {
            Side::A => 1,
            Side::B => 2,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// One side of the editing session.
///
/// Pairs a document handle with the surface it renders into, plus what the
/// sync layer remembers between events:
/// - `last_text`: the flattened text as of the last render or accepted edit
/// - `outbox`: update records held back while the link is offline
/// - the render gate (rendering / suppression flags and render token)
/// - `last_selection`: the most recent non-empty selection, used as the
///   target of mark actions once the live selection has collapsed
#[derive(Debug)]
pub struct Replica {
    pub(crate) side: Side,
    pub(crate) doc: DocHandle,
    pub(crate) surface: Surface,
    pub(crate) last_text: String,
    pub(crate) outbox: Vec<UpdateRecord>,
    pub(crate) gate: RenderGate,
    pub(crate) last_selection: Option<Offsets>,
}

impl Replica {
    pub fn new(side: Side, doc: DocHandle) -> Self {
        Self {
            side,
            doc,
            surface: Surface::new(),
            last_text: String::new(),
            outbox: Vec::new(),
            gate: RenderGate::new(),
            last_selection: None,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn doc(&self) -> DocHandle {
        self.doc
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn last_text(&self) -> &str {
        &self.last_text
    }

    /// Records waiting for the link to come back, oldest first.
    pub fn outbox(&self) -> &[UpdateRecord] {
        &self.outbox
    }

    pub fn is_rendering(&self) -> bool {
        self.gate.is_rendering()
    }

    pub fn suppresses_input(&self) -> bool {
        self.gate.suppresses_input()
    }

    pub fn render_token(&self) -> u64 {
        self.gate.render_token()
    }

    pub fn render_state(&self) -> RenderState {
        self.gate.state()
    }

    pub fn accepts_input(&self) -> bool {
        self.gate.accepts_input()
    }

    pub fn last_selection(&self) -> Option<Offsets> {
        self.last_selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_is_symmetric() {
        for side in Side::BOTH {
            assert_ne!(side, side.peer());
            assert_eq!(side.peer().peer(), side);
        }
    }

    #[test]
    fn new_replica_is_idle_and_empty() {
        let replica = Replica::new(Side::B, DocHandle(2));
        assert_eq!(replica.side(), Side::B);
        assert_eq!(replica.last_text(), "");
        assert!(replica.outbox().is_empty());
        assert!(replica.accepts_input());
        assert_eq!(replica.render_state(), RenderState::Idle);
        assert_eq!(replica.last_selection(), None);
    }
}
