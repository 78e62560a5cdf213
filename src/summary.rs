//! Auto-generated session summaries
//!
//! When a save carries no caller-supplied summary, one is derived from the
//! messages: the opening of the first user message plus up to three topic
//! keywords detected anywhere in the conversation text.

use crate::storage::types::{Message, Role};

/// Keywords scanned for topic detection. Matches are reported in this
/// order, not in order of appearance.
const TOPIC_KEYWORDS: &[&str] = &[
    "javascript",
    "python",
    "react",
    "code",
    "programming",
    "api",
    "database",
    "web",
    "development",
    "bug",
    "error",
    "help",
    "question",
    "project",
    "task",
];

/// Maximum number of topics reported in a generated summary
const MAX_TOPICS: usize = 3;

/// Characters of the first user message quoted in the summary
const FIRST_MESSAGE_CHARS: usize = 100;

/// Generate a summary for a message array
///
/// # Examples
///
/// ```
/// use memkeep::storage::Message;
/// use memkeep::summary::generate_summary;
///
/// let summary = generate_summary(&[Message::user("I have a python bug")]);
/// assert!(summary.contains("python, bug"));
/// ```
pub fn generate_summary(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "Empty conversation".to_string();
    }

    let user_count = messages.iter().filter(|m| m.role == Role::User).count();
    let assistant_count = messages
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .count();

    let first_user = messages
        .iter()
        .find(|m| m.role == Role::User)
        .map(|m| excerpt(&m.content))
        .unwrap_or_else(|| "No user message".to_string());

    format!(
        "Conversation about {}. Started with: \"{}\" ({} messages, {} from user, {} responses)",
        topics(messages),
        first_user,
        messages.len(),
        user_count,
        assistant_count
    )
}

/// First [`FIRST_MESSAGE_CHARS`] characters of `content`, with an ellipsis
/// marker when the content ran to the cap or beyond.
fn excerpt(content: &str) -> String {
    let clipped: String = content.chars().take(FIRST_MESSAGE_CHARS).collect();
    if content.chars().count() >= FIRST_MESSAGE_CHARS {
        format!("{}...", clipped)
    } else {
        clipped
    }
}

/// Up to [`MAX_TOPICS`] keywords found in the concatenated message text
/// (case-insensitive), in keyword-list order, or "general discussion" when
/// none match.
fn topics(messages: &[Message]) -> String {
    let all_text = messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let found: Vec<&str> = TOPIC_KEYWORDS
        .iter()
        .copied()
        .filter(|k| all_text.contains(*k))
        .take(MAX_TOPICS)
        .collect();

    if found.is_empty() {
        "general discussion".to_string()
    } else {
        found.join(", ")
    }
}
