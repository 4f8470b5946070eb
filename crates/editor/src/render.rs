// Chunk: docs/chunks/render_suppression - Token-validated input suppression
//!
//! Render coordination.
//!
//! Rendering a replica rewrites its surface wholesale. The surface must not
//! mistake that rewrite for a user edit, so every render goes through a
//! [`RenderGate`]:
//!
//! 1. `begin()` bumps the render token and raises both `is_rendering` and
//!    `suppress_input`, before any markup is requested.
//! 2. `finish()` drops `is_rendering` synchronously when the render returns.
//! 3. `release(token)` drops `suppress_input` one scheduling turn later, and
//!    only if no newer render has started in between.
//!
//! The deferred release swallows an input notification that was already
//! queued for the content the render just replaced. The token keeps an older
//! render's release from lifting a newer render's suppression.

use log::debug;

use twin_edit_engine::DocumentEngine;
use twin_edit_text::utf16;

use crate::deferred::DeferredTask;
use crate::projector;
use crate::replica::Side;
use crate::session::Session;

/// Where a replica is in its render lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Rendering,
}

/// Per-replica render flags and token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderGate {
    is_rendering: bool,
    suppress_input: bool,
    render_token: u64,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a render and returns its token.
    pub fn begin(&mut self) -> u64 {
        self.render_token += 1;
        self.is_rendering = true;
        self.suppress_input = true;
        self.render_token
    }

    /// Ends the synchronous part of a render.
    pub fn finish(&mut self) {
        self.is_rendering = false;
    }

    /// Lifts input suppression if `token` is still the latest render.
    ///
    /// Returns true if suppression was lifted.
    pub fn release(&mut self, token: u64) -> bool {
        if self.render_token != token {
            return false;
        }
        self.suppress_input = false;
        true
    }

    /// True when neither flag is raised.
    pub fn accepts_input(&self) -> bool {
        !self.is_rendering && !self.suppress_input
    }

    pub fn is_rendering(&self) -> bool {
        self.is_rendering
    }

    pub fn suppresses_input(&self) -> bool {
        self.suppress_input
    }

    pub fn render_token(&self) -> u64 {
        self.render_token
    }

    pub fn state(&self) -> RenderState {
        if self.is_rendering {
            RenderState::Rendering
        } else {
            RenderState::Idle
        }
    }
}

impl<E: DocumentEngine> Session<E> {
    /// Re-renders `side` from the engine's authoritative state.
    ///
    /// With `keep_selection` the current selection is projected before the
    /// surface is replaced and restored afterwards; a restored range (not a
    /// bare caret) also becomes the replica's remembered selection.
    pub fn render_replica(&mut self, side: Side, keep_selection: bool) {
        let replica = &mut self.replicas[side.index()];
        let selection = if keep_selection {
            projector::project(&replica.surface)
        } else {
            None
        };

        let token = replica.gate.begin();
        let markup = self.engine.render_markup(replica.doc);
        replica.surface.set_markup(&markup);
        replica.last_text = self.engine.plain_text(replica.doc);
        debug!(
            "render: doc={} keep_selection={} markup_len={} text_len={}",
            replica.doc,
            keep_selection,
            markup.len(),
            utf16::len(&replica.last_text)
        );

        projector::restore(&mut replica.surface, selection);
        if let Some(offsets) = selection.filter(|s| !s.is_collapsed()) {
            replica.last_selection = Some(offsets);
        }

        replica.gate.finish();
        self.deferred.push(DeferredTask::ReleaseSuppression { side, token });
    }

    /// Runs one scheduling turn of deferred work.
    ///
    /// Only tasks queued before the call run; anything they queue waits for
    /// the next turn.
    pub fn run_deferred(&mut self) {
        for task in self.deferred.take_turn() {
            match task {
                DeferredTask::ReleaseSuppression { side, token } => {
                    let released = self.replicas[side.index()].gate.release(token);
                    if !released {
                        debug!("render: {:?} release for superseded token {}", side, token);
                    }
                }
            }
        }
    }
}
