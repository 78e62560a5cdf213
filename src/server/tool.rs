//! The `session_memory` tool
//!
//! One externally-callable operation with a discriminated `action` field:
//! `save` persists a transcript, `load` retrieves one, `search` scans a
//! user's stored sessions for a substring. All failures are reported as
//! error text in the tool result, never as transport faults.

use crate::storage::types::{Message, SavePayload, SearchHit, SessionRecord};
use crate::storage::SessionStore;
use serde_json::{json, Value};

/// Name the tool is registered under
pub const TOOL_NAME: &str = "session_memory";

/// `user_id` applied when the caller omits one
pub const DEFAULT_USER_ID: &str = "default_user";

/// Number of trailing messages rendered by `load`
const RECENT_MESSAGE_WINDOW: usize = 10;

/// Rendered message contents are clipped to this many characters
const CONTENT_PREVIEW_CHARS: usize = 200;

/// Outcome of one tool invocation: text for the caller plus an error flag
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    /// Text rendered back to the caller
    pub text: String,
    /// Whether the invocation failed
    pub is_error: bool,
}

impl ToolOutcome {
    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Tool definition advertised by `tools/list`
pub fn definition() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": "Save, load, and search conversation sessions. Supports three actions: save (store conversation), load (retrieve conversation), and search (find similar conversations).",
        "inputSchema": {
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["save", "load", "search"],
                    "description": "Action to perform: save, load, or search"
                },
                "session_id": {
                    "type": "string",
                    "description": "Unique session identifier (required for save and load)"
                },
                "user_id": {
                    "type": "string",
                    "description": "User identifier (required for all actions)",
                    "default": DEFAULT_USER_ID
                },
                "messages": {
                    "type": "array",
                    "description": "Array of conversation messages (required for save action)",
                    "items": {
                        "type": "object",
                        "properties": {
                            "role": {"type": "string", "enum": ["user", "assistant", "system"]},
                            "content": {"type": "string"},
                            "timestamp": {"type": "string"}
                        },
                        "required": ["role", "content"]
                    }
                },
                "summary": {
                    "type": "string",
                    "description": "Optional conversation summary (for save action)"
                },
                "query": {
                    "type": "string",
                    "description": "Search query (required for search action)"
                }
            },
            "required": ["action", "user_id"]
        }
    })
}

/// Execute one call against the store
///
/// Required fields are checked before any I/O; an unknown or missing
/// `action` is reported as an error outcome.
pub async fn handle_call(store: &SessionStore, args: &Value) -> ToolOutcome {
    let action = args.get("action").and_then(Value::as_str).unwrap_or("");
    let user_id = args
        .get("user_id")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_USER_ID);

    tracing::debug!("session_memory action={} user={}", action, user_id);

    match action {
        "save" => handle_save(store, args, user_id).await,
        "load" => handle_load(store, args, user_id).await,
        "search" => handle_search(store, args, user_id).await,
        _ => ToolOutcome::error("Invalid action. Use: save, load, or search"),
    }
}

async fn handle_save(store: &SessionStore, args: &Value, user_id: &str) -> ToolOutcome {
    let session_id = args.get("session_id").and_then(Value::as_str).unwrap_or("");
    let Some(raw_messages) = args.get("messages").and_then(Value::as_array) else {
        return ToolOutcome::error("Save action requires session_id and messages");
    };
    if session_id.is_empty() || raw_messages.is_empty() {
        return ToolOutcome::error("Save action requires session_id and messages");
    }

    let messages: Vec<Message> = match serde_json::from_value(Value::Array(raw_messages.clone())) {
        Ok(messages) => messages,
        Err(e) => return ToolOutcome::error(format!("Save failed: {}", e)),
    };

    let summary = args
        .get("summary")
        .and_then(Value::as_str)
        .map(str::to_string);

    let payload = SavePayload { messages, summary };
    match store.save_session(session_id, user_id, payload).await {
        Ok(saved) => ToolOutcome::success(format!(
            "Session saved successfully!\n\nSession ID: {}\nUser ID: {}\nMessages: {}\nSummary: {}\n\nSaved to: {}",
            session_id,
            user_id,
            saved.message_count,
            saved.summary,
            saved.path.display()
        )),
        Err(e) => ToolOutcome::error(format!("Save failed: {}", e)),
    }
}

async fn handle_load(store: &SessionStore, args: &Value, user_id: &str) -> ToolOutcome {
    let session_id = args.get("session_id").and_then(Value::as_str).unwrap_or("");
    if session_id.is_empty() {
        return ToolOutcome::error("Load action requires session_id");
    }

    match store.load_session(session_id, user_id).await {
        Ok(record) => ToolOutcome::success(render_record(&record)),
        Err(e) => ToolOutcome::error(format!("Load failed: {}", e)),
    }
}

async fn handle_search(store: &SessionStore, args: &Value, user_id: &str) -> ToolOutcome {
    let query = args.get("query").and_then(Value::as_str).unwrap_or("");
    if query.is_empty() {
        return ToolOutcome::error("Search action requires query");
    }

    match store.search_sessions(user_id, query).await {
        Ok(hits) if hits.is_empty() => ToolOutcome::success(format!(
            "No sessions found matching: \"{}\"\n\nTry different keywords or check if you have saved sessions.",
            query
        )),
        Ok(hits) => {
            let rows: Vec<String> = hits.iter().map(render_hit).collect();
            ToolOutcome::success(format!(
                "Found {} sessions matching: \"{}\"\n\n{}",
                hits.len(),
                query,
                rows.join("\n\n---\n\n")
            ))
        }
        Err(e) => ToolOutcome::error(format!("Search failed: {}", e)),
    }
}

/// Render a loaded record: header fields plus the last
/// [`RECENT_MESSAGE_WINDOW`] messages with clipped contents. The full
/// record stays on disk untouched; clipping is presentation only.
fn render_record(record: &SessionRecord) -> String {
    let start = record.messages.len().saturating_sub(RECENT_MESSAGE_WINDOW);
    let recent: Vec<String> = record.messages[start..]
        .iter()
        .map(|m| format!("**{}**: {}", m.role.as_str(), clip(&m.content)))
        .collect();

    let messages_text = if recent.is_empty() {
        "No messages found".to_string()
    } else {
        recent.join("\n\n")
    };

    let summary = if record.summary.is_empty() {
        "No summary available"
    } else {
        &record.summary
    };

    format!(
        "Session loaded successfully!\n\n**Session ID**: {}\n**User ID**: {}\n**Saved**: {}\n**Messages**: {}\n\n**Summary**: {}\n\n**Recent Messages**:\n{}",
        record.session_id,
        record.user_id,
        record.saved_at.to_rfc3339(),
        record.message_count,
        summary,
        messages_text
    )
}

fn render_hit(hit: &SearchHit) -> String {
    format!(
        "**{}**\nSaved: {}\nMessages: {}\nSummary: {}",
        hit.session_id,
        hit.saved_at.to_rfc3339(),
        hit.message_count,
        hit.summary
    )
}

/// First [`CONTENT_PREVIEW_CHARS`] characters of `content`, with an
/// ellipsis marker when anything was dropped.
fn clip(content: &str) -> String {
    let clipped: String = content.chars().take(CONTENT_PREVIEW_CHARS).collect();
    if content.chars().count() > CONTENT_PREVIEW_CHARS {
        format!("{}...", clipped)
    } else {
        clipped
    }
}
