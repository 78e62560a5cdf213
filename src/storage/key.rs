//! Storage key derivation for session files.
//!
//! Session and user identifiers are caller-supplied and may contain
//! characters that are unsafe in filenames. Keys are derived by replacing
//! every character outside `[A-Za-z0-9-_]` with `_` in each component
//! independently, then joining them as `<userId>_<sessionId>`.
//!
//! Derivation provides no uniqueness beyond what the sanitized strings
//! carry: distinct raw identifiers that sanitize to the same string address
//! the same file and overwrite each other.

/// Replace every character outside `[A-Za-z0-9-_]` with `_`.
///
/// Total and deterministic for any input, including the empty string.
/// Idempotent: sanitizing an already-sanitized string is a no-op.
pub fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Derive the storage key for a `(sessionId, userId)` pair.
///
/// An empty component (or one made entirely of disallowed characters)
/// degrades to an empty sanitized string, so the key can collapse to a
/// bare `_` separator.
pub fn session_key(session_id: &str, user_id: &str) -> String {
    format!(
        "{}_{}",
        sanitize_component(user_id),
        sanitize_component(session_id)
    )
}
