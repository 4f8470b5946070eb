// Chunk: docs/chunks/surface_tree - Editable surface node tree

//! twin-edit-surface: the editable surface a replica renders into.
//!
//! The sync layer never sees keystrokes. It sees a [`Surface`] whose text
//! leaves read differently than they did before, and a [`Selection`] made of
//! boundary points ([`Position`]) into the node tree. This crate provides
//! that model:
//!
//! - [`Surface::set_markup`] replaces the content wholesale from rendered markup
//! - [`Surface::replace_range`], [`Surface::type_text`] and
//!   [`Surface::delete_backward`] edit text leaves in place, as a user would
//! - [`Surface::text_len_before`] measures the text before a boundary point
//!
//! # Example
//!
//! ```
//! use twin_edit_surface::Surface;
//!
//! let mut surface = Surface::from_markup("<p>Hello <strong>world</strong></p>");
//! assert_eq!(surface.text_content(), "Hello world");
//!
//! surface.replace_range(5, 5, ",");
//! assert_eq!(surface.markup(), "<p>Hello, <strong>world</strong></p>");
//! ```

pub mod markup;
mod node;
mod surface;

pub use markup::{MarkupError, MarkupNode};
pub use node::{NodeId, Position, Selection};
pub use surface::Surface;
