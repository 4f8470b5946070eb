// Chunk: docs/chunks/edit_diff - Flat-text delta extraction over UTF-16 units

//! twin-edit-text: flat-text primitives shared by the twin-edit crates.
//!
//! # Overview
//!
//! - [`Offsets`]: a selection as UTF-16 offsets into a replica's flattened text
//! - [`EditDelta`]: one contiguous replace (`start`, `delete_count`, `insert_text`)
//! - [`diff_text`]: infers the minimal single-span delta between two snapshots
//! - [`utf16`]: conversions between UTF-8 strings and UTF-16 offsets
//!
//! # Example
//!
//! ```
//! use twin_edit_text::{diff_text, EditDelta};
//!
//! let prev = "Offline mode lets you keep editing.";
//! let next = "XOffline mode lets you keep editing.";
//!
//! let delta = diff_text(prev, next).unwrap();
//! assert_eq!(delta, EditDelta::new(0, 0, "X"));
//! assert_eq!(delta.apply_to(prev), next);
//! ```

mod diff;
mod types;
pub mod utf16;

pub use diff::diff_text;
pub use types::{EditDelta, Offsets};
