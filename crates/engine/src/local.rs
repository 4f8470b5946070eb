// Chunk: docs/chunks/document_engine - Document engine capability + local reference engine
//!
//! An in-process reference engine.
//!
//! `LocalEngine` keeps each document as UTF-16 units with a mark set per
//! unit. Every local change is recorded as one [`UpdateRecord`] holding a
//! JSON-encoded operation, tagged with the document's replica tag, a sequence
//! number, and how many records from each other replica it had applied.
//!
//! Receiving a record transforms it past the local changes its sender had
//! not seen yet, and those local changes past it in turn, so two documents
//! that edit concurrently converge once each has the other's records.
//! Records must arrive in the order they were drained; each one is applied
//! at most once. Documents that exchange records need distinct replica tags.

use std::collections::BTreeMap;
use std::iter;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::delta::{transform, Delta, Piece};
use crate::engine::{DocHandle, DocumentEngine, EngineError, UpdateRecord};
use crate::mark::{MarkKind, MarkSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Operation {
    Edit {
        start: usize,
        delete: usize,
        insert: String,
    },
    Mark {
        start: usize,
        len: usize,
        mark: MarkKind,
        on: bool,
    },
}

impl Operation {
    fn to_pieces(&self) -> Vec<Piece> {
        let mut delta = Delta::new();
        match self {
            Operation::Edit {
                start,
                delete,
                insert,
            } => {
                delta
                    .retain(*start, None)
                    .insert(insert.encode_utf16().collect())
                    .delete(*delete);
            }
            Operation::Mark {
                start,
                len,
                mark,
                on,
            } => {
                delta.retain(*start, None).retain(*len, Some((*mark, *on)));
            }
        }
        delta.into_pieces()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Envelope {
    origin: u32,
    seq: u64,
    /// Highest sequence number the sender had applied, per origin.
    #[serde(default)]
    seen: BTreeMap<u32, u64>,
    op: Operation,
}

#[derive(Debug, Default)]
struct LocalDoc {
    replica_tag: u32,
    units: Vec<u16>,
    marks: Vec<MarkSet>,
    pending: Vec<UpdateRecord>,
    seq: u64,
    /// Highest sequence number applied from each other origin.
    applied: BTreeMap<u32, u64>,
    /// Local changes not yet acknowledged by a peer, rebased onto every
    /// record received since.
    unacked: Vec<(u64, Vec<Piece>)>,
}

impl LocalDoc {
    fn check_range(&self, start: usize, len: usize) -> Result<(), EngineError> {
        match start.checked_add(len) {
            Some(end) if end <= self.units.len() => Ok(()),
            end => Err(EngineError::OutOfRange {
                start,
                end: end.unwrap_or(usize::MAX),
                len: self.units.len(),
            }),
        }
    }

    fn splice(&mut self, start: usize, delete: usize, inserted: &[u16]) {
        let start = start.min(self.units.len());
        let end = start.saturating_add(delete).min(self.units.len());
        self.units.splice(start..end, inserted.iter().copied());
        self.marks
            .splice(start..end, iter::repeat(MarkSet::default()).take(inserted.len()));
    }

    fn set_mark(&mut self, start: usize, len: usize, mark: MarkKind, on: bool) {
        let start = start.min(self.marks.len());
        let end = start.saturating_add(len).min(self.marks.len());
        for set in &mut self.marks[start..end] {
            if on {
                set.insert(mark);
            } else {
                set.remove(mark);
            }
        }
    }

    /// Applies a delta, clamped to the current length.
    fn apply_pieces(&mut self, pieces: &[Piece]) {
        let mut pos: usize = 0;
        for piece in pieces {
            match piece {
                Piece::Retain { len, mark } => {
                    let end = pos.saturating_add(*len).min(self.units.len());
                    if let Some((kind, on)) = mark {
                        self.set_mark(pos, end - pos, *kind, *on);
                    }
                    pos = end;
                }
                Piece::Insert(units) => {
                    let at = pos.min(self.units.len());
                    self.splice(at, 0, units);
                    pos = at + units.len();
                }
                Piece::Delete(len) => self.splice(pos, *len, &[]),
            }
        }
    }

    /// Integrates a record from another document. Returns false for records
    /// already applied and for this document's own records.
    fn receive(&mut self, envelope: &Envelope) -> bool {
        if envelope.origin == self.replica_tag {
            return false;
        }
        let last = self.applied.get(&envelope.origin).copied().unwrap_or(0);
        if envelope.seq <= last {
            return false;
        }

        let acked = envelope.seen.get(&self.replica_tag).copied().unwrap_or(0);
        self.unacked.retain(|(seq, _)| *seq > acked);

        // Lower replica tags win ties.
        let local_first = self.replica_tag < envelope.origin;
        let mut incoming = envelope.op.to_pieces();
        for (_, local) in &mut self.unacked {
            let rebased = transform(local, &incoming, local_first);
            *local = transform(&incoming, local, !local_first);
            incoming = rebased;
        }
        self.apply_pieces(&incoming);
        self.applied.insert(envelope.origin, envelope.seq);
        true
    }

    fn record(&mut self, op: Operation) {
        self.seq += 1;
        self.unacked.push((self.seq, op.to_pieces()));
        let envelope = Envelope {
            origin: self.replica_tag,
            seq: self.seq,
            seen: self.applied.clone(),
            op,
        };
        // Serializing a plain struct of numbers and strings cannot fail.
        if let Ok(bytes) = serde_json::to_vec(&envelope) {
            self.pending.push(UpdateRecord::from_bytes(bytes));
        }
    }

    fn render(&self) -> String {
        let mut out = String::from("<p>");
        let mut run_start = 0;
        while run_start < self.units.len() {
            let set = self.marks[run_start];
            let mut run_end = run_start + 1;
            while run_end < self.units.len() && self.marks[run_end] == set {
                run_end += 1;
            }
            let kinds: Vec<MarkKind> = set.kinds().collect();
            for kind in &kinds {
                out.push('<');
                out.push_str(kind.tag());
                out.push('>');
            }
            escape_into(&String::from_utf16_lossy(&self.units[run_start..run_end]), &mut out);
            for kind in kinds.iter().rev() {
                out.push_str("</");
                out.push_str(kind.tag());
                out.push('>');
            }
            run_start = run_end;
        }
        out.push_str("</p>");
        out
    }
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// In-process document engine hosting any number of documents.
#[derive(Debug, Default)]
pub struct LocalEngine {
    docs: BTreeMap<DocHandle, LocalDoc>,
    next_handle: u32,
}

impl LocalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks present anywhere in `[start, end)`, in rendering order.
    pub fn marks_in(&self, doc: DocHandle, start: usize, end: usize) -> Vec<MarkKind> {
        let Some(doc) = self.docs.get(&doc) else {
            return Vec::new();
        };
        let end = end.min(doc.marks.len());
        let start = start.min(end);
        MarkKind::ALL
            .into_iter()
            .filter(|kind| doc.marks[start..end].iter().any(|set| set.contains(*kind)))
            .collect()
    }

    /// Number of records generated locally and not yet drained.
    pub fn pending_count(&self, doc: DocHandle) -> usize {
        self.docs.get(&doc).map(|d| d.pending.len()).unwrap_or(0)
    }

    fn doc_mut(&mut self, doc: DocHandle) -> Result<&mut LocalDoc, EngineError> {
        self.docs.get_mut(&doc).ok_or(EngineError::UnknownDocument(doc))
    }

    fn change_mark(
        &mut self,
        doc: DocHandle,
        start: usize,
        len: usize,
        mark: &str,
        on: bool,
    ) -> Result<(), EngineError> {
        let mark: MarkKind = mark.parse()?;
        let local = self.doc_mut(doc)?;
        local.check_range(start, len)?;
        if len == 0 {
            return Ok(());
        }
        local.set_mark(start, len, mark, on);
        local.record(Operation::Mark { start, len, mark, on });
        Ok(())
    }
}

impl DocumentEngine for LocalEngine {
    fn create(&mut self, replica_tag: u32) -> DocHandle {
        self.next_handle += 1;
        let handle = DocHandle(self.next_handle);
        self.docs.insert(
            handle,
            LocalDoc {
                replica_tag,
                ..LocalDoc::default()
            },
        );
        debug!("engine: created {} for replica {}", handle, replica_tag);
        handle
    }

    fn apply_edit(
        &mut self,
        doc: DocHandle,
        start: usize,
        delete_count: usize,
        insert: &str,
    ) -> Result<(), EngineError> {
        let local = self.doc_mut(doc)?;
        local.check_range(start, delete_count)?;
        if delete_count == 0 && insert.is_empty() {
            return Ok(());
        }
        let inserted: Vec<u16> = insert.encode_utf16().collect();
        local.splice(start, delete_count, &inserted);
        local.record(Operation::Edit {
            start,
            delete: delete_count,
            insert: insert.to_string(),
        });
        Ok(())
    }

    fn add_mark(&mut self, doc: DocHandle, start: usize, len: usize, mark: &str) -> Result<(), EngineError> {
        self.change_mark(doc, start, len, mark, true)
    }

    fn remove_mark(&mut self, doc: DocHandle, start: usize, len: usize, mark: &str) -> Result<(), EngineError> {
        self.change_mark(doc, start, len, mark, false)
    }

    fn render_markup(&self, doc: DocHandle) -> String {
        self.docs.get(&doc).map(LocalDoc::render).unwrap_or_default()
    }

    fn plain_text(&self, doc: DocHandle) -> String {
        self.docs
            .get(&doc)
            .map(|d| String::from_utf16_lossy(&d.units))
            .unwrap_or_default()
    }

    fn drain_updates(&mut self, doc: DocHandle) -> Vec<UpdateRecord> {
        self.docs
            .get_mut(&doc)
            .map(|d| std::mem::take(&mut d.pending))
            .unwrap_or_default()
    }

    fn apply_updates(&mut self, doc: DocHandle, records: &[UpdateRecord]) -> Result<(), EngineError> {
        let envelopes = records
            .iter()
            .map(|record| {
                serde_json::from_slice::<Envelope>(record.as_bytes())
                    .map_err(|err| EngineError::MalformedUpdate(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let local = self.doc_mut(doc)?;
        let mut applied = 0;
        for envelope in &envelopes {
            if local.receive(envelope) {
                applied += 1;
            }
        }
        debug!(
            "engine: {} applied {} of {} record(s), now {} units",
            doc,
            applied,
            envelopes.len(),
            local.units.len()
        );
        Ok(())
    }
}
