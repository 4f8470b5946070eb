// Chunk: docs/chunks/replica_session - Replica render/sync session
//!
//! twin-edit: keeps two rendered replicas of a rich-text document in sync.
//!
//! Each replica pairs a document in a [`DocumentEngine`] with a [`Surface`]
//! the user edits freely. The session turns surface changes into engine
//! edits, re-renders surfaces without losing the selection or echoing the
//! render back as input, and carries update records between the replicas
//! over a link that can be switched offline.
//!
//! # Example
//!
//! ```
//! use twin_edit::{Session, SessionConfig, SessionEvent, Side};
//! use twin_edit_engine::LocalEngine;
//!
//! let config = SessionConfig { seed_text: "hello".into(), ..SessionConfig::default() };
//! let mut session = Session::new(LocalEngine::new(), &config);
//! session.run_deferred();
//!
//! session.surface_mut(Side::A).replace_range(5, 5, " world");
//! session.dispatch(SessionEvent::user_input(Side::A));
//! assert_eq!(session.plain_text(Side::B), "hello world");
//! ```
//!
//! [`DocumentEngine`]: twin_edit_engine::DocumentEngine
//! [`Surface`]: twin_edit_surface::Surface

pub mod config;
mod deferred;
mod input;
mod link;
pub mod projector;
mod render;
mod replica;
mod session;
mod session_event;

pub use config::{ConfigError, SessionConfig};
pub use deferred::{DeferredQueue, DeferredTask};
pub use link::LinkState;
pub use render::{RenderGate, RenderState};
pub use replica::{Replica, Side};
pub use session::Session;
pub use session_event::{InputOrigin, SessionEvent, ToolbarAction};
