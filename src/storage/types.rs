use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Role of a conversation message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Wire/display form of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// A single conversation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Content of the message
    pub content: String,
    /// Optional caller-supplied timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    /// Creates a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: None,
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: None,
        }
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            timestamp: None,
        }
    }
}

/// The full persisted document for one session
///
/// Field names are camelCase on disk. This layout is the durable contract
/// between writes and reads and must not drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Caller-supplied session identifier (not unique across users)
    pub session_id: String,
    /// Caller-supplied user identifier
    pub user_id: String,
    /// Set on first save, carried forward on later saves
    pub saved_at: DateTime<Utc>,
    /// Set on every save
    pub last_updated: DateTime<Utc>,
    /// Stored messages, capped at the first 100 of each save
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Caller-supplied or auto-generated summary
    #[serde(default)]
    pub summary: String,
    /// Length of the submitted message array before truncation
    #[serde(default)]
    pub message_count: usize,
}

/// Input to a save: the messages to persist and an optional summary
#[derive(Debug, Clone, Default)]
pub struct SavePayload {
    /// Messages to persist (truncated to the storage cap on write)
    pub messages: Vec<Message>,
    /// Explicit summary; `None` or empty triggers auto-generation
    pub summary: Option<String>,
}

/// Result of a successful save
#[derive(Debug, Clone)]
pub struct SavedSession {
    /// Path of the written session file
    pub path: PathBuf,
    /// Pre-truncation message count
    pub message_count: usize,
    /// The summary that was stored (caller-supplied or generated)
    pub summary: String,
}

/// One row of a search result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Session identifier of the matching record
    pub session_id: String,
    /// Stored summary, or a placeholder when the record has none
    pub summary: String,
    /// When the matching record was first saved
    pub saved_at: DateTime<Utc>,
    /// Number of messages stored in the matching record
    pub message_count: usize,
}
