//! MCP request handling and the two transports (HTTP and stdio)

use crate::mcp::{McpError, McpRequest, McpResponse, Tool, PROTOCOL_VERSION};
use crate::state::AppState;
use crate::tools;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "mcp-mail-server";

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Dispatches JSON-RPC requests to the email tools
pub struct McpServer {
    state: Arc<AppState>,
    tools: Vec<Tool>,
}

impl McpServer {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            tools: tools::definitions(),
        }
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Handle one raw JSON-RPC message; `None` means nothing is sent back
    pub async fn handle_message(&self, raw: &str) -> Option<McpResponse> {
        match serde_json::from_str::<McpRequest>(raw) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!("❌ Unparseable MCP message: {}", e);
                Some(McpResponse::error(
                    McpError::parse_error(format!("Parse error: {}", e)),
                    Value::Null,
                ))
            }
        }
    }

    pub async fn handle(&self, request: McpRequest) -> Option<McpResponse> {
        debug!("📥 MCP request: method={}", request.method);

        if request.is_notification() {
            debug!("Notification received: {}", request.method);
            return None;
        }
        let id = request.id.unwrap_or_default();

        if request.jsonrpc != "2.0" {
            return Some(McpResponse::error(
                McpError::invalid_request(format!(
                    "Unsupported jsonrpc version: {}",
                    request.jsonrpc
                )),
                id,
            ));
        }

        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({
                "tools": self.tools.iter().map(Tool::to_schema).collect::<Vec<_>>()
            })),
            "tools/call" => self.handle_tools_call(request.params).await,
            method => Err(McpError::method_not_found(format!(
                "Method not found: {}",
                method
            ))),
        };

        Some(match result {
            Ok(result) => McpResponse::success(result, id),
            Err(error) => McpResponse::error(error, id),
        })
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            }
        })
    }

    async fn handle_tools_call(&self, params: Value) -> Result<Value, McpError> {
        let params: CallParams = serde_json::from_value(params)
            .map_err(|e| McpError::invalid_params(format!("Invalid tools/call params: {}", e)))?;

        let outcome = tools::call(&self.state, &params.name, params.arguments).await?;
        if outcome.is_error() {
            warn!("⚠️  Tool {} returned an error", params.name);
        } else {
            info!("✅ Tool {} completed", params.name);
        }

        Ok(outcome.into_call_result())
    }
}

/// Build the HTTP router: `POST /mcp` plus health endpoints
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/mcp", post(mcp_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(server)
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// MCP endpoint handler
///
/// The body is taken as a string so malformed JSON yields a JSON-RPC parse
/// error instead of an HTTP rejection.
async fn mcp_handler(State(server): State<Arc<McpServer>>, body: String) -> Response {
    match server.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

pub async fn serve_http(server: Arc<McpServer>, listen_addr: &str) -> anyhow::Result<()> {
    let app = router(server);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("🌐 MCP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 MCP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Serve newline-delimited JSON-RPC over stdin/stdout until stdin closes
pub async fn serve_stdio(server: Arc<McpServer>) -> anyhow::Result<()> {
    info!("🔌 MCP server reading requests from stdin");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve_lines(&server, stdin, tokio::io::stdout()).await?;
    info!("👋 stdin closed, shutting down");
    Ok(())
}

/// Requests are processed one at a time, in arrival order
///
/// A line that is not valid UTF-8 gets a parse error reply; only I/O
/// failures on the streams end the loop.
pub async fn serve_lines<R, W>(
    server: &McpServer,
    mut reader: R,
    mut writer: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => server.handle_message(line.trim()).await,
            Err(e) => {
                warn!("❌ Non UTF-8 input on stdin: {}", e);
                Some(McpResponse::error(
                    McpError::parse_error(format!("Parse error: invalid UTF-8: {}", e)),
                    Value::Null,
                ))
            }
        };

        if let Some(response) = response {
            let mut out = serde_json::to_vec(&response)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mail_core::{Config, Credentials};

    fn server() -> McpServer {
        let state = AppState::with_services(Config::default(), Credentials::default(), None, None);
        McpServer::new(Arc::new(state))
    }

    fn request(method: &str, params: Value, id: u64) -> McpRequest {
        serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = server()
            .handle(request("initialize", json!({}), 1))
            .await
            .unwrap();
        let result = response.result.unwrap();

        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_null_id_gets_a_response() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"2.0","method":"ping","id":null}"#)
            .await
            .unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server()
            .handle(request("resources/list", Value::Null, 4))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, McpError::METHOD_NOT_FOUND);
        assert_eq!(response.id, json!(4));
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let response = server()
            .handle_message(r#"{"jsonrpc":"1.0","method":"ping","id":1}"#)
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, McpError::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_tools_call_without_name() {
        let response = server()
            .handle(request("tools/call", json!({"arguments": {}}), 2))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, McpError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_stdio_survives_invalid_utf8() {
        let mut input = br#"{"jsonrpc":"2.0","method":"ping","id":1}"#.to_vec();
        input.push(b'\n');
        input.extend_from_slice(&[0xff, 0xfe, b'\n']);
        input.extend_from_slice(br#"{"jsonrpc":"2.0","method":"ping","id":2}"#);
        input.extend_from_slice(b"\r\n");

        let mut output = Vec::new();
        serve_lines(&server(), input.as_slice(), &mut output)
            .await
            .unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["error"]["code"], McpError::PARSE_ERROR);
        assert_eq!(responses[1]["id"], Value::Null);
        assert_eq!(responses[2]["id"], 2);
        assert_eq!(responses[2]["result"], json!({}));
    }

    #[tokio::test]
    async fn test_stdio_lines_in_order() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","method":"ping","id":1}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            "not json\n",
            r#"{"jsonrpc":"2.0","method":"tools/list","id":"two"}"#,
            "\n",
        );

        let mut output = Vec::new();
        serve_lines(&server(), input.as_bytes(), &mut output)
            .await
            .unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"], json!({}));
        assert_eq!(responses[1]["error"]["code"], McpError::PARSE_ERROR);
        assert_eq!(responses[1]["id"], Value::Null);
        assert_eq!(responses[2]["id"], "two");
        assert_eq!(responses[2]["result"]["tools"].as_array().unwrap().len(), 10);
    }
}
