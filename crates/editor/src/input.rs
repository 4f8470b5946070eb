// Chunk: docs/chunks/replica_session - Replica render/sync session
//!
//! Surface input and toolbar handling.
//!
//! A surface reports edits only as "something changed". The sync layer reads
//! the surface's flattened text, diffs it against the text it last knew, and
//! submits the single resulting span to the engine. The engine stays the
//! authority: if it rejects the edit, the local change is thrown away by
//! re-rendering from its state.
//!
//! Mark actions target the live selection when there is one. Pressing a
//! toolbar button usually collapses or moves the live selection first, so the
//! last non-empty selection seen on pointer-up, key-up or selection-change is
//! kept as a fallback.

use log::{debug, warn};

use twin_edit_engine::{DocumentEngine, MarkKind};
use twin_edit_text::{diff_text, utf16, Offsets};

use crate::projector;
use crate::replica::Side;
use crate::session::Session;
use crate::session_event::InputOrigin;

impl<E: DocumentEngine> Session<E> {
    /// Handles an input notification from `side`'s surface.
    ///
    /// Ignored while the replica is rendering or still suppressing input, and
    /// for notifications that did not come from the user.
    pub fn handle_input(&mut self, side: Side, origin: InputOrigin) {
        let replica = &self.replicas[side.index()];
        if origin != InputOrigin::User || !replica.gate.accepts_input() {
            debug!(
                "input_change: {} ignored (origin={:?} rendering={} suppressed={})",
                side,
                origin,
                replica.gate.is_rendering(),
                replica.gate.suppresses_input()
            );
            return;
        }

        let next = replica.surface.flattened_text();
        let Some(delta) = diff_text(&replica.last_text, &next) else {
            return;
        };
        let doc = replica.doc;
        debug!(
            "input_change: {} start={} delete={} insert_len={}",
            side,
            delta.start,
            delta.delete_count,
            delta.insert_len()
        );

        if let Err(err) =
            self.engine
                .apply_edit(doc, delta.start, delta.delete_count, &delta.insert_text)
        {
            warn!("apply_edit: {} rejected edit: {}; re-rendering", doc, err);
            self.render_replica(side, true);
            return;
        }
        debug!("apply_edit: {} ok", doc);

        self.replicas[side.index()].last_text = next;
        self.sync_from(side, side.peer());
    }

    /// Stores `side`'s live selection as its remembered selection if it is
    /// a non-empty range.
    pub fn remember_selection(&mut self, side: Side) {
        let replica = &mut self.replicas[side.index()];
        if let Some(offsets) = projector::project(&replica.surface).filter(|s| !s.is_collapsed()) {
            debug!("selection: {} {}..{}", side, offsets.start, offsets.end);
            replica.last_selection = Some(offsets);
        }
    }

    /// A document-wide selection change: either surface may be affected.
    pub fn selection_changed(&mut self) {
        for side in Side::BOTH {
            self.remember_selection(side);
        }
    }

    /// Range a mark action on `side` applies to: the live non-empty
    /// selection, or else the remembered one.
    pub fn resolve_selection(&mut self, side: Side) -> Option<Offsets> {
        self.remember_selection(side);
        self.replicas[side.index()].last_selection
    }

    /// Adds `kind` over the selection on `side`.
    ///
    /// Returns false without touching anything if there is no usable
    /// selection. Otherwise re-renders `side` and syncs to the peer; the
    /// return value says whether the engine accepted the mark.
    pub fn apply_mark(&mut self, side: Side, kind: MarkKind) -> bool {
        let Some(range) = self.mark_range(side) else {
            debug!("mark: {} {} skipped, no selection", side, kind);
            return false;
        };
        let doc = self.replicas[side.index()].doc;
        debug!("mark: {} {} {}..{}", side, kind, range.start, range.end);

        let applied = match self.engine.add_mark(doc, range.start, range.len(), kind.as_str()) {
            Ok(()) => true,
            Err(err) => {
                warn!("mark: {} rejected {}: {}", doc, kind, err);
                false
            }
        };
        self.render_replica(side, true);
        self.sync_from(side, side.peer());
        applied
    }

    /// Removes every mark kind over the selection on `side`.
    pub fn clear_marks(&mut self, side: Side) -> bool {
        let Some(range) = self.mark_range(side) else {
            debug!("clear_marks: {} skipped, no selection", side);
            return false;
        };
        let doc = self.replicas[side.index()].doc;
        debug!("clear_marks: {} {}..{}", side, range.start, range.end);

        let mut applied = true;
        for kind in MarkKind::ALL {
            if let Err(err) = self.engine.remove_mark(doc, range.start, range.len(), kind.as_str()) {
                warn!("clear_marks: {} rejected {}: {}", doc, kind, err);
                applied = false;
            }
        }
        self.render_replica(side, true);
        self.sync_from(side, side.peer());
        applied
    }

    /// The resolved selection clamped to the replica's text, if non-empty.
    fn mark_range(&mut self, side: Side) -> Option<Offsets> {
        let range = self.resolve_selection(side)?;
        let len = utf16::len(&self.replicas[side.index()].last_text);
        range.clamp_to(len)
    }
}
