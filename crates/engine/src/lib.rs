// Chunk: docs/chunks/document_engine - Document engine capability + local reference engine

//! twin-edit-engine: the document engine a replica is bridged to.
//!
//! [`DocumentEngine`] is the capability the sync layer consumes: create a
//! document, edit it by UTF-16 offsets, add and remove named marks, render it,
//! read its text, and exchange opaque [`UpdateRecord`]s with other documents.
//!
//! [`LocalEngine`] is an in-process implementation used by the demo runner
//! and the tests.
//!
//! # Example
//!
//! ```
//! use twin_edit_engine::{DocumentEngine, LocalEngine};
//!
//! let mut engine = LocalEngine::new();
//! let left = engine.create(1);
//! let right = engine.create(2);
//!
//! engine.apply_edit(left, 0, 0, "hello").unwrap();
//! engine.add_mark(left, 0, 5, "bold").unwrap();
//!
//! let records = engine.drain_updates(left);
//! engine.apply_updates(right, &records).unwrap();
//! assert_eq!(engine.render_markup(right), "<p><strong>hello</strong></p>");
//! ```

mod delta;
mod engine;
mod local;
mod mark;

pub use engine::{DocHandle, DocumentEngine, EngineError, UpdateRecord};
pub use local::LocalEngine;
pub use mark::MarkKind;
