// Chunk: docs/chunks/document_engine - Document engine capability + local reference engine
//!
//! The document engine capability.
//!
//! The engine owns the authoritative text and marks of each document. The
//! sync layer only ever talks to it through [`DocumentEngine`]; how the engine
//! merges concurrent changes is its own business.

use std::fmt;

use thiserror::Error;

/// Opaque handle to a document created by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocHandle(pub u32);

impl fmt::Display for DocHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// An opaque change record emitted by one document and applied to another.
///
/// The sync layer counts and orders records but never looks inside them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpdateRecord(Vec<u8>);

impl UpdateRecord {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Errors reported by a document engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown document {0}")]
    UnknownDocument(DocHandle),
    #[error("range {start}..{end} is outside a document of length {len}")]
    OutOfRange { start: usize, end: usize, len: usize },
    #[error("unknown mark {0:?}")]
    UnknownMark(String),
    #[error("malformed update record: {0}")]
    MalformedUpdate(String),
}

/// The operations the sync layer needs from a rich-text document engine.
///
/// All offsets and lengths are UTF-16 code units.
pub trait DocumentEngine {
    /// Allocates a new, empty document for the replica tagged `replica_tag`.
    fn create(&mut self, replica_tag: u32) -> DocHandle;

    /// Replaces `delete_count` units at `start` with `insert`.
    ///
    /// An error means the caller's view of the text has drifted from the
    /// engine's; it must re-render from authoritative state.
    fn apply_edit(
        &mut self,
        doc: DocHandle,
        start: usize,
        delete_count: usize,
        insert: &str,
    ) -> Result<(), EngineError>;

    /// Adds the mark named `mark` over `len` units starting at `start`.
    fn add_mark(&mut self, doc: DocHandle, start: usize, len: usize, mark: &str) -> Result<(), EngineError>;

    /// Removes the mark named `mark` over `len` units starting at `start`.
    fn remove_mark(&mut self, doc: DocHandle, start: usize, len: usize, mark: &str) -> Result<(), EngineError>;

    /// Markup for the current content and marks.
    fn render_markup(&self, doc: DocHandle) -> String;

    /// The authoritative flattened text.
    fn plain_text(&self, doc: DocHandle) -> String;

    /// Returns and clears every record generated locally since the last drain.
    fn drain_updates(&mut self, doc: DocHandle) -> Vec<UpdateRecord>;

    /// Merges records produced by another document into this one.
    ///
    /// A batch is applied whole or not at all: on error none of `records`
    /// has taken effect.
    fn apply_updates(&mut self, doc: DocHandle, records: &[UpdateRecord]) -> Result<(), EngineError>;
}
