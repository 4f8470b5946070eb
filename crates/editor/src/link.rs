// Chunk: docs/chunks/replica_link - Store-and-forward replica link
//!
//! The simulated link between the two replicas.
//!
//! Online, records drained from one replica's document are applied to the
//! other's right away. Offline, they are appended to the source replica's
//! outbox and nothing reaches the peer. Switching back online flushes both
//! outboxes, A→B first and then B→A; the two flushes are independent, so
//! concurrent offline edits merge in that fixed order rather than in the
//! order they were typed.
//!
//! Records are never dropped, reordered or coalesced: each one reaches the
//! peer exactly once, in the order it was drained. A batch the engine rejects
//! goes back to the front of the source's outbox and is retried on the next
//! flush.

use std::fmt;

use log::{debug, warn};

use twin_edit_engine::{DocumentEngine, UpdateRecord};

use crate::replica::Side;
use crate::session::Session;

/// The link switch position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Online,
    Offline,
}

impl LinkState {
    pub fn from_online(online: bool) -> Self {
        if online {
            LinkState::Online
        } else {
            LinkState::Offline
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, LinkState::Online)
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkState::Online => f.write_str("Online"),
            LinkState::Offline => f.write_str("Offline"),
        }
    }
}

impl<E: DocumentEngine> Session<E> {
    /// Moves pending records from `source`'s document towards `dest`.
    pub fn sync_from(&mut self, source: Side, dest: Side) {
        let doc = self.replicas[source.index()].doc;
        let updates = self.engine.drain_updates(doc);
        debug!(
            "drain_updates: from={} count={} link={}",
            doc,
            updates.len(),
            self.link
        );
        if updates.is_empty() {
            return;
        }
        // Records held back by a rejected delivery stay ahead of these.
        self.replicas[source.index()].outbox.extend(updates);
        if self.link.is_online() {
            self.flush_outbox(source, dest);
        }
    }

    /// Delivers everything in `source`'s outbox to `dest`, oldest first.
    pub fn flush_outbox(&mut self, source: Side, dest: Side) {
        let outbox = &mut self.replicas[source.index()].outbox;
        if outbox.is_empty() {
            return;
        }
        let updates = std::mem::take(outbox);
        debug!(
            "flush_outbox: from={} to={} count={}",
            source,
            dest,
            updates.len()
        );
        self.deliver(source, dest, updates);
    }

    /// Flips the link. Going online flushes A→B, then B→A.
    pub fn toggle_online(&mut self, online: bool) {
        self.link = LinkState::from_online(online);
        debug!("link: {}", self.link);
        if online {
            self.flush_outbox(Side::A, Side::B);
            self.flush_outbox(Side::B, Side::A);
        }
    }

    /// Applies records to `dest`'s document and re-renders it, keeping its
    /// selection only if it holds input focus.
    ///
    /// A rejected batch is put back at the front of `source`'s outbox. The
    /// engine contract applies a batch whole or not at all, so nothing in it
    /// has reached `dest` yet.
    fn deliver(&mut self, source: Side, dest: Side, updates: Vec<UpdateRecord>) {
        let doc = self.replicas[dest.index()].doc;
        debug!("apply_updates: target={} count={}", doc, updates.len());
        if let Err(err) = self.engine.apply_updates(doc, &updates) {
            warn!(
                "apply_updates: {} rejected {} record(s), keeping them queued: {}",
                doc,
                updates.len(),
                err
            );
            let outbox = &mut self.replicas[source.index()].outbox;
            outbox.splice(0..0, updates);
        }
        let keep_selection = self.focus == Some(dest);
        self.render_replica(dest, keep_selection);
    }
}
