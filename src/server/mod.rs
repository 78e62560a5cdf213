//! Stdio MCP server
//!
//! Reads newline-delimited JSON-RPC 2.0 messages from stdin, dispatches
//! them, and writes one response per line to stdout. Requests are handled
//! one at a time in arrival order; there is no request queue or worker
//! pool. Tracing goes to stderr so stdout stays a clean protocol channel.
//!
//! # Handled methods
//!
//! - `initialize` -- protocol version, `tools` capability, server info.
//! - `notifications/initialized` -- acknowledged silently (no response).
//! - `ping` -- empty result.
//! - `tools/list` -- the single `session_memory` tool.
//! - `tools/call` -- dispatched to the tool handler; tool failures come
//!   back as `isError` results, not protocol faults.
//! - Anything else -- JSON-RPC `-32601 Method not found`.

pub mod protocol;
pub mod tool;

use crate::config::Config;
use crate::error::Result;
use crate::storage::SessionStore;
use protocol::{
    JsonRpcRequest, JsonRpcResponse, METHOD_INITIALIZE, METHOD_INITIALIZED, METHOD_NOT_FOUND,
    METHOD_PING, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST, PARSE_ERROR, PROTOCOL_VERSION,
};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Run the serve loop until stdin closes
pub async fn run(config: &Config, store: SessionStore) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(stdin).lines();

    tracing::info!(
        "Serving tool {} over stdio (data dir: {})",
        tool::TOOL_NAME,
        store.data_dir().display()
    );

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(response) = dispatch(config, &store, trimmed).await else {
            continue;
        };

        let serialized = serde_json::to_string(&response)?;
        stdout.write_all(serialized.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

/// Dispatch one raw message. Returns `None` for notifications.
async fn dispatch(config: &Config, store: &SessionStore, raw: &str) -> Option<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_str(raw) {
        Ok(request) => request,
        Err(_) => return Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error")),
    };

    if request.method == METHOD_INITIALIZED {
        return None;
    }

    let id = request.id.clone();
    let response = match request.method.as_str() {
        METHOD_INITIALIZE => JsonRpcResponse::result(id, initialize_result(config)),
        METHOD_PING => JsonRpcResponse::result(id, json!({})),
        METHOD_TOOLS_LIST => {
            JsonRpcResponse::result(id, json!({ "tools": [tool::definition()] }))
        }
        METHOD_TOOLS_CALL => handle_tools_call(store, id, request.params.as_ref()).await,
        other => {
            JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", other))
        }
    };
    Some(response)
}

fn initialize_result(config: &Config) -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": config.server.name,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

async fn handle_tools_call(
    store: &SessionStore,
    id: Option<Value>,
    params: Option<&Value>,
) -> JsonRpcResponse {
    let tool_name = params
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("");
    let args = params
        .and_then(|p| p.get("arguments"))
        .cloned()
        .unwrap_or_else(|| json!({}));

    let outcome = if tool_name == tool::TOOL_NAME {
        tool::handle_call(store, &args).await
    } else {
        tool::ToolOutcome {
            text: "Unknown tool".to_string(),
            is_error: true,
        }
    };

    JsonRpcResponse::result(
        id,
        json!({
            "content": [{ "type": "text", "text": outcome.text }],
            "isError": outcome.is_error
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_fixtures() -> (Config, SessionStore, tempfile::TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let store =
            SessionStore::new(dir.path().join("sessions")).expect("failed to create store");
        (Config::default(), store, dir)
    }

    #[tokio::test]
    async fn test_initialize_reports_tools_capability() {
        let (config, store, _dir) = create_test_fixtures();
        let response = dispatch(
            &config,
            &store,
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#,
        )
        .await
        .expect("expected a response");
        let result = response.result.expect("expected a result");
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(result["capabilities"]["tools"].is_object());
        assert_eq!(result["serverInfo"]["name"], "memkeep");
    }

    #[tokio::test]
    async fn test_initialized_notification_is_swallowed() {
        let (config, store, _dir) = create_test_fixtures();
        let response = dispatch(
            &config,
            &store,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        )
        .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_malformed_line_yields_parse_error() {
        let (config, store, _dir) = create_test_fixtures();
        let response = dispatch(&config, &store, "{not json")
            .await
            .expect("expected a response");
        assert_eq!(response.error.expect("expected an error").code, PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_unknown_method_yields_method_not_found() {
        let (config, store, _dir) = create_test_fixtures();
        let response = dispatch(
            &config,
            &store,
            r#"{"jsonrpc":"2.0","id":7,"method":"resources/list"}"#,
        )
        .await
        .expect("expected a response");
        let error = response.error.expect("expected an error");
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert!(error.message.contains("resources/list"));
    }

    #[tokio::test]
    async fn test_tools_list_returns_the_session_memory_tool() {
        let (config, store, _dir) = create_test_fixtures();
        let response = dispatch(
            &config,
            &store,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        )
        .await
        .expect("expected a response");
        let result = response.result.expect("expected a result");
        let tools = result["tools"].as_array().expect("tools missing");
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], tool::TOOL_NAME);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error_result_not_a_fault() {
        let (config, store, _dir) = create_test_fixtures();
        let response = dispatch(
            &config,
            &store,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"mystery","arguments":{}}}"#,
        )
        .await
        .expect("expected a response");
        assert!(response.error.is_none());
        let result = response.result.expect("expected a result");
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "Unknown tool");
    }

    #[tokio::test]
    async fn test_tools_call_save_then_search_roundtrip() {
        let (config, store, _dir) = create_test_fixtures();
        let save = r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"session_memory","arguments":{"action":"save","session_id":"s1","user_id":"alice","messages":[{"role":"user","content":"I have a python bug"}]}}}"#;
        let response = dispatch(&config, &store, save).await.expect("no response");
        let result = response.result.expect("expected a result");
        assert_eq!(result["isError"], false);

        let search = r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"session_memory","arguments":{"action":"search","user_id":"alice","query":"python"}}}"#;
        let response = dispatch(&config, &store, search).await.expect("no response");
        let result = response.result.expect("expected a result");
        let text = result["content"][0]["text"].as_str().expect("text missing");
        assert!(text.contains("**s1**"));
    }
}
