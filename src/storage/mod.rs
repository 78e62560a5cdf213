//! Session storage and search
//!
//! One pretty-printed JSON document per session, stored at
//! `<data_dir>/<sanitizedUserId>_<sanitizedSessionId>.json`. The file is
//! the sole source of truth for its key: a save overwrites the previous
//! record wholesale (no merge, no append), and no delete operation exists.
//!
//! The store serves one cooperative caller at a time. There is no locking
//! and no partial-write mitigation; a crash mid-write can corrupt a file,
//! and corrupt files are skipped during search.

use crate::error::{MemkeepError, Result};
use crate::summary::generate_summary;
use anyhow::Context;
use chrono::Utc;
use std::path::{Path, PathBuf};

pub mod key;
pub mod types;

pub use key::{sanitize_component, session_key};
pub use types::{Message, Role, SavePayload, SavedSession, SearchHit, SessionRecord};

/// Maximum number of messages persisted per save; entries past this index
/// of the submitted array are dropped.
pub const MAX_STORED_MESSAGES: usize = 100;

/// Maximum number of candidate files scanned per search call. Bounds the
/// result count as well, since every hit comes from a scanned candidate.
pub const SEARCH_CANDIDATE_CAP: usize = 20;

/// File-backed store for conversation sessions
///
/// Constructed with an explicit data directory; there is no ambient
/// process-wide storage configuration.
pub struct SessionStore {
    data_dir: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at `data_dir`, creating the directory if it
    /// does not exist.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use memkeep::storage::SessionStore;
    ///
    /// let store = SessionStore::new("/tmp/memkeep-sessions").unwrap();
    /// ```
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create data directory {}", data_dir.display())
        })?;
        Ok(Self { data_dir })
    }

    /// Directory this store reads and writes
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file addressed by a `(sessionId, userId)` pair
    pub fn session_path(&self, session_id: &str, user_id: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", session_key(session_id, user_id)))
    }

    /// Save a session, overwriting any prior record for the same key
    ///
    /// Identifiers and messages must be non-empty; nothing is written when
    /// they are not. The payload's messages are truncated to
    /// [`MAX_STORED_MESSAGES`] for storage; the pre-truncation length is
    /// recorded as `messageCount`. When the payload carries no summary (or
    /// an empty one), a summary is generated from the messages. `savedAt`
    /// is carried forward from an existing loadable record; `lastUpdated`
    /// is always set to now.
    pub async fn save_session(
        &self,
        session_id: &str,
        user_id: &str,
        payload: SavePayload,
    ) -> Result<SavedSession> {
        if session_id.is_empty() || user_id.is_empty() {
            return Err(
                MemkeepError::Validation("session_id and user_id must be non-empty".into()).into(),
            );
        }
        if payload.messages.is_empty() {
            return Err(MemkeepError::Validation("messages must be non-empty".into()).into());
        }

        let path = self.session_path(session_id, user_id);
        let message_count = payload.messages.len();

        let summary = match payload.summary.filter(|s| !s.is_empty()) {
            Some(summary) => summary,
            None => generate_summary(&payload.messages),
        };

        let mut messages = payload.messages;
        messages.truncate(MAX_STORED_MESSAGES);

        let now = Utc::now();
        // First save wins for savedAt; everything else is overwritten.
        let saved_at = match self.load_session(session_id, user_id).await {
            Ok(prior) => prior.saved_at,
            Err(_) => now,
        };

        let record = SessionRecord {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            saved_at,
            last_updated: now,
            messages,
            summary: summary.clone(),
            message_count,
        };

        let body = serde_json::to_string_pretty(&record)?;
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("Failed to write session file {}", path.display()))?;

        tracing::debug!(
            "Saved session {} for user {} ({} messages)",
            session_id,
            user_id,
            message_count
        );

        Ok(SavedSession {
            path,
            message_count,
            summary,
        })
    }

    /// Load the full record for a `(sessionId, userId)` pair
    ///
    /// # Errors
    ///
    /// Returns [`MemkeepError::SessionNotFound`] when no file exists for
    /// the derived key; any other read or parse failure is returned with
    /// the underlying message.
    pub async fn load_session(&self, session_id: &str, user_id: &str) -> Result<SessionRecord> {
        let path = self.session_path(session_id, user_id);

        let data = match tokio::fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MemkeepError::SessionNotFound.into());
            }
            Err(e) => return Err(MemkeepError::Storage(e.to_string()).into()),
        };

        let record: SessionRecord =
            serde_json::from_str(&data).map_err(|e| MemkeepError::Storage(e.to_string()))?;
        Ok(record)
    }

    /// Search a user's sessions for a case-insensitive substring
    ///
    /// Scans at most [`SEARCH_CANDIDATE_CAP`] files carrying the user's
    /// sanitized prefix, in directory-enumeration order. A record matches
    /// when the query occurs in its summary or in any message content.
    /// Unreadable or corrupt candidates are skipped; only a failure to
    /// list the data directory surfaces as an error. Results are not
    /// ranked.
    pub async fn search_sessions(&self, user_id: &str, query: &str) -> Result<Vec<SearchHit>> {
        let prefix = format!("{}_", sanitize_component(user_id));
        let needle = query.to_lowercase();

        let mut dir = tokio::fs::read_dir(&self.data_dir).await.with_context(|| {
            format!("Failed to list data directory {}", self.data_dir.display())
        })?;

        let mut candidates = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .with_context(|| format!("Failed to list data directory {}", self.data_dir.display()))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.starts_with(&prefix) {
                continue;
            }
            candidates.push(entry.path());
            if candidates.len() == SEARCH_CANDIDATE_CAP {
                break;
            }
        }

        let mut results = Vec::new();
        for path in candidates {
            let record = match self.read_record(&path).await {
                Ok(record) => record,
                Err(e) => {
                    tracing::debug!("Skipping unreadable session file {}: {}", path.display(), e);
                    continue;
                }
            };

            // any() stops at the first matching message.
            let matches = record.summary.to_lowercase().contains(&needle)
                || record
                    .messages
                    .iter()
                    .any(|m| m.content.to_lowercase().contains(&needle));
            if !matches {
                continue;
            }

            let message_count = record.messages.len();
            let summary = if record.summary.is_empty() {
                "No summary available".to_string()
            } else {
                record.summary
            };
            results.push(SearchHit {
                session_id: record.session_id,
                summary,
                saved_at: record.saved_at,
                message_count,
            });
        }

        Ok(results)
    }

    async fn read_record(&self, path: &Path) -> Result<SessionRecord> {
        let data = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&data)?)
    }
}
