// Chunk: docs/chunks/replica_session - Replica render/sync session
//!
//! The editing session.
//!
//! A [`Session`] owns everything two side-by-side replicas share: the
//! document engine hosting both documents, the replicas themselves, the link
//! state, which surface holds input focus, and the deferred-work queue.
//!
//! Behaviour is split across modules that each add an `impl` block:
//! - `render`: `render_replica`, `run_deferred`
//! - `input`: `handle_input`, mark actions, selection tracking
//! - `link`: `sync_from`, `flush_outbox`, `toggle_online`
//!
//! This module holds construction, accessors, and [`Session::dispatch`].

use log::{debug, warn};

use twin_edit_engine::DocumentEngine;
use twin_edit_surface::Surface;

use crate::config::SessionConfig;
use crate::deferred::DeferredQueue;
use crate::link::LinkState;
use crate::replica::{Replica, Side};
use crate::session_event::{SessionEvent, ToolbarAction};

pub struct Session<E: DocumentEngine> {
    pub(crate) engine: E,
    pub(crate) replicas: [Replica; 2],
    pub(crate) link: LinkState,
    pub(crate) focus: Option<Side>,
    pub(crate) deferred: DeferredQueue,
}

impl<E: DocumentEngine> Session<E> {
    /// Creates both documents, seeds replica A with the configured text,
    /// syncs it to B, and renders both surfaces.
    ///
    /// The startup sync always goes through; `config.start_online` only
    /// decides the link state afterwards.
    pub fn new(mut engine: E, config: &SessionConfig) -> Self {
        let doc_a = engine.create(Side::A.replica_tag());
        let doc_b = engine.create(Side::B.replica_tag());
        let mut session = Self {
            engine,
            replicas: [Replica::new(Side::A, doc_a), Replica::new(Side::B, doc_b)],
            link: LinkState::Online,
            focus: None,
            deferred: DeferredQueue::new(),
        };

        session.seed(&config.seed_text);
        session.sync_from(Side::A, Side::B);
        session.render_replica(Side::A, false);
        session.render_replica(Side::B, false);
        session.link = LinkState::from_online(config.start_online);
        debug!("session: started, link {}", session.link);
        session
    }

    fn seed(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let replica = &mut self.replicas[Side::A.index()];
        match self.engine.apply_edit(replica.doc, 0, 0, text) {
            Ok(()) => replica.last_text = text.to_string(),
            Err(err) => warn!("session: seeding {} failed: {}", replica.doc, err),
        }
    }

    /// Processes one event to completion.
    pub fn dispatch(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Input { side, origin } => self.handle_input(side, origin),
            SessionEvent::PointerUp(side) | SessionEvent::KeyUp(side) => {
                self.remember_selection(side)
            }
            SessionEvent::SelectionChange => self.selection_changed(),
            SessionEvent::Toolbar { side, action } => {
                match action {
                    ToolbarAction::Mark(kind) => self.apply_mark(side, kind),
                    ToolbarAction::Clear => self.clear_marks(side),
                };
            }
            SessionEvent::LinkToggle(online) => self.toggle_online(online),
            SessionEvent::Focus(side) => self.focus(side),
            SessionEvent::Blur => self.blur(),
        }
    }

    pub fn replica(&self, side: Side) -> &Replica {
        &self.replicas[side.index()]
    }

    /// The surface a user edits directly.
    pub fn surface_mut(&mut self, side: Side) -> &mut Surface {
        &mut self.replicas[side.index()].surface
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// The engine's authoritative text for `side`'s document.
    pub fn plain_text(&self, side: Side) -> String {
        self.engine.plain_text(self.replicas[side.index()].doc)
    }

    /// The engine's markup for `side`'s document.
    pub fn render_markup(&self, side: Side) -> String {
        self.engine.render_markup(self.replicas[side.index()].doc)
    }

    pub fn is_online(&self) -> bool {
        self.link.is_online()
    }

    pub fn link_state(&self) -> LinkState {
        self.link
    }

    /// "Online" or "Offline".
    pub fn link_label(&self) -> String {
        self.link.to_string()
    }

    /// Outbox lengths as (A→B, B→A).
    pub fn queue_depths(&self) -> (usize, usize) {
        (
            self.replicas[Side::A.index()].outbox.len(),
            self.replicas[Side::B.index()].outbox.len(),
        )
    }

    /// Gives `side` input focus.
    pub fn focus(&mut self, side: Side) {
        self.focus = Some(side);
    }

    pub fn blur(&mut self) {
        self.focus = None;
    }

    pub fn focused(&self) -> Option<Side> {
        self.focus
    }

    /// Number of deferred tasks waiting for the next turn.
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }
}
