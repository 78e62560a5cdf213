//! Memkeep - session-memory backend with an MCP stdio transport
//!
//! This library persists conversation transcripts keyed by
//! `(user, session)` as one JSON document per session, retrieves them, and
//! performs naive substring search over stored summaries and messages. The
//! transport exposes the store through a single `session_memory` tool over
//! newline-delimited JSON-RPC on stdio.
//!
//! # Architecture
//!
//! - `storage`: key derivation, session records, and the file-backed store
//! - `summary`: auto-generated summaries for saves without one
//! - `server`: JSON-RPC wire types, the tool handler, and the serve loop
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use memkeep::storage::{Message, SavePayload, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SessionStore::new("/tmp/memkeep-sessions")?;
//!     store
//!         .save_session(
//!             "s1",
//!             "alice",
//!             SavePayload {
//!                 messages: vec![Message::user("hello")],
//!                 summary: None,
//!             },
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod storage;
pub mod summary;

// Re-export commonly used types
pub use config::Config;
pub use error::{MemkeepError, Result};
pub use storage::SessionStore;
