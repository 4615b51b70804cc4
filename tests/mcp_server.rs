mod common;
use common::{gateway_env, mount_token, DEPLOYMENTS_PATH};

use oicm_mcp::app::App;
use oicm_mcp::mcp::server::McpServer;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server_with(env: HashMap<String, String>) -> McpServer {
    McpServer::from_app(App::with_env(Arc::new(env)).expect("app"))
}

async fn roundtrip(server: &McpServer, frame: Value) -> Value {
    let reply = server
        .handle_line(&frame.to_string())
        .await
        .expect("reply expected");
    serde_json::from_str(&reply).expect("reply is json")
}

fn call_text(reply: &Value) -> &str {
    reply["result"]["content"][0]["text"]
        .as_str()
        .expect("text content")
}

#[tokio::test]
async fn initialize_reports_server_info() {
    let server = server_with(HashMap::new());
    let reply = roundtrip(
        &server,
        serde_json::json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
    )
    .await;
    assert_eq!(reply["id"], 1);
    assert_eq!(reply["result"]["serverInfo"]["name"], "OICM MCP");
    assert_eq!(reply["result"]["protocolVersion"], "2025-06-18");
}

#[tokio::test]
async fn tools_list_contains_only_get_deployments() {
    let server = server_with(HashMap::new());
    let reply = roundtrip(
        &server,
        serde_json::json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"}),
    )
    .await;
    let tools = reply["result"]["tools"].as_array().expect("tools");
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "get_deployments");
    assert!(tools[0]["inputSchema"].is_object());
}

#[tokio::test]
async fn notifications_get_no_reply() {
    let server = server_with(HashMap::new());
    let frame = serde_json::json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
    assert!(server.handle_line(&frame.to_string()).await.is_none());
    assert!(server.handle_line("   ").await.is_none());
}

#[tokio::test]
async fn malformed_frames_get_protocol_errors() {
    let server = server_with(HashMap::new());
    let reply: Value =
        serde_json::from_str(&server.handle_line("{not json").await.expect("reply")).expect("json");
    assert_eq!(reply["error"]["code"], -32700);

    let reply = roundtrip(&server, serde_json::json!({"jsonrpc": "2.0", "id": 3})).await;
    assert_eq!(reply["error"]["code"], -32600);

    let reply = roundtrip(
        &server,
        serde_json::json!({"jsonrpc": "2.0", "id": 4, "method": "resources/list"}),
    )
    .await;
    assert_eq!(reply["error"]["code"], -32601);
}

#[tokio::test]
async fn unknown_tool_and_bad_arguments_are_invalid_params() {
    let server = server_with(HashMap::new());
    let reply = roundtrip(
        &server,
        serde_json::json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call",
            "params": {"name": "delete_everything"}}),
    )
    .await;
    assert_eq!(reply["error"]["code"], -32602);

    let reply = roundtrip(
        &server,
        serde_json::json!({"jsonrpc": "2.0", "id": 6, "method": "tools/call",
            "params": {"name": "get_deployments", "arguments": {"workspace": "x"}}}),
    )
    .await;
    assert_eq!(reply["error"]["code"], -32602);

    let reply = roundtrip(
        &server,
        serde_json::json!({"jsonrpc": "2.0", "id": 7, "method": "tools/call", "params": {}}),
    )
    .await;
    assert_eq!(reply["error"]["code"], -32602);
}

#[tokio::test]
async fn tools_call_returns_deployments_text() {
    let mock = MockServer::start().await;
    mount_token(&mock, "tok-mcp").await;
    Mock::given(method("GET"))
        .and(path(DEPLOYMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&mock)
        .await;

    let server = server_with(gateway_env(&mock));
    let reply = roundtrip(
        &server,
        serde_json::json!({"jsonrpc": "2.0", "id": 8, "method": "tools/call",
            "params": {"name": "get_deployments", "arguments": {}}}),
    )
    .await;
    assert!(reply.get("error").is_none());
    assert_eq!(call_text(&reply), "[]");
}

#[tokio::test]
async fn tools_call_failures_are_text_not_protocol_errors() {
    let server = server_with(HashMap::new());
    let reply = roundtrip(
        &server,
        serde_json::json!({"jsonrpc": "2.0", "id": 9, "method": "tools/call",
            "params": {"name": "get_deployments"}}),
    )
    .await;
    assert!(reply.get("error").is_none());
    assert!(call_text(&reply).starts_with("Error: Missing required environment variables: API_URL"));
}
