use axum::body::Body;
use axum::http::StatusCode;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use smuggler_mcp::api::{build_router, AppState};
use smuggler_mcp::config::ScannerConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// App state whose "interpreter" is `sh`, so the scanner script is a shell
/// script written into a temp dir.
fn create_test_state(script_body: Option<&str>) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("smuggler.py");
    if let Some(body) = script_body {
        std::fs::write(&script, body).unwrap();
    }

    let config = ScannerConfig {
        python_bin: PathBuf::from("sh"),
        smuggler_path: script,
        max_duration: None,
    };
    (dir, AppState::new(Arc::new(config)))
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn make_request(method: &str, uri: &str, body: Option<Value>) -> axum::http::Request<Body> {
    let builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    match body {
        Some(b) => builder.body(Body::from(serde_json::to_string(&b).unwrap())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn rpc(method: &str, params: Value) -> axum::http::Request<Body> {
    make_request("POST", "/mcp", Some(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    })))
}

fn call_smuggler(arguments: Value) -> axum::http::Request<Body> {
    rpc("tools/call", json!({ "name": "do-smuggler", "arguments": arguments }))
}

async fn response_json(response: axum::http::Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

fn command_for(script: &Path, url: &str) -> String {
    format!("sh {} -u {}", script.display(), url)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, state) = create_test_state(None);
    let req = make_request("GET", "/health", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "smuggler-mcp");
}

#[tokio::test]
async fn test_initialize() {
    let (_dir, state) = create_test_state(None);
    let req = rpc("initialize", json!({ "protocolVersion": "2025-03-26", "capabilities": {} }));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(body["result"]["serverInfo"]["name"], "smuggler-mcp");
    assert!(body["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_notification_accepted_without_body() {
    let (_dir, state) = create_test_state(None);
    let req = make_request("POST", "/mcp", Some(json!({
        "jsonrpc": "2.0",
        "method": "notifications/initialized",
    })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_tools_list() {
    let (_dir, state) = create_test_state(None);
    let response = app(&state).oneshot(rpc("tools/list", json!({}))).await.unwrap();
    let body = response_json(response).await;

    let tools = body["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "do-smuggler");
    assert_eq!(tools[0]["inputSchema"]["properties"]["url"]["type"], "string");
    assert!(tools[0]["inputSchema"]["properties"]["smuggler_args"]["description"]
        .as_str()
        .unwrap()
        .contains("-verify VERIFY"));
}

#[tokio::test]
async fn test_unknown_method() {
    let (_dir, state) = create_test_state(None);
    let response = app(&state).oneshot(rpc("resources/list", json!({}))).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], -32601);
}

#[tokio::test]
async fn test_malformed_json() {
    let (_dir, state) = create_test_state(None);
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["id"], Value::Null);
}

#[tokio::test]
async fn test_call_with_findings() {
    let (dir, state) = create_test_state(Some(
        "printf '\\033[1;31m[+] Potential CL.TE Vulnerability Found (abc)\\033[0m\\n[!] Potential TE.CL Vulnerability Found (xyz)'\n",
    ));
    let response = app(&state)
        .oneshot(call_smuggler(json!({ "url": "https://example.com" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let result = &body["result"];
    assert_eq!(
        result["content"],
        json!([{
            "type": "text",
            "text": "[+] Potential CL.TE Vulnerability Found (abc)\n[!] Potential TE.CL Vulnerability Found (xyz)",
        }])
    );
    assert_eq!(
        result["metadata"]["findings"],
        json!({
            "cl_te": [{ "mutation": "abc", "severity": "high" }],
            "te_cl": [{ "mutation": "xyz", "severity": "medium" }],
        })
    );
    assert_eq!(
        result["metadata"]["command"],
        command_for(&dir.path().join("smuggler.py"), "https://example.com")
    );
}

#[tokio::test]
async fn test_call_without_findings_still_succeeds() {
    let (_dir, state) = create_test_state(Some("echo '[+] URL        : https://example.com'\n"));
    let response = app(&state)
        .oneshot(call_smuggler(json!({ "url": "https://example.com" })))
        .await
        .unwrap();

    let body = response_json(response).await;
    assert_eq!(body["result"]["content"][0]["text"], "[+] URL        : https://example.com\n");
    assert_eq!(body["result"]["metadata"]["findings"], json!({ "cl_te": [], "te_cl": [] }));
}

#[tokio::test]
async fn test_call_passes_extra_args() {
    // The fake scanner echoes its arguments.
    let (dir, state) = create_test_state(Some("printf '%s\\n' \"$*\"\n"));
    let response = app(&state)
        .oneshot(call_smuggler(json!({
            "url": "https://example.com",
            "smuggler_args": ["-m", "GET", "-verify", "never"],
        })))
        .await
        .unwrap();

    let body = response_json(response).await;
    assert_eq!(
        body["result"]["content"][0]["text"],
        "-u https://example.com -m GET -verify never\n"
    );
    assert_eq!(
        body["result"]["metadata"]["command"],
        format!("{} -m GET -verify never", command_for(&dir.path().join("smuggler.py"), "https://example.com"))
    );
}

#[tokio::test]
async fn test_call_nonzero_exit() {
    let (_dir, state) = create_test_state(Some("printf 'error: connection refused' >&2\nexit 2\n"));
    let response = app(&state)
        .oneshot(call_smuggler(json!({ "url": "https://example.com" })))
        .await
        .unwrap();

    let body = response_json(response).await;
    let result = &body["result"];
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("2"));
    assert!(text.contains("error: connection refused"));
    assert!(result.get("metadata").is_none());
}

#[tokio::test]
async fn test_call_script_missing() {
    let (dir, state) = create_test_state(None);
    let response = app(&state)
        .oneshot(call_smuggler(json!({ "url": "https://example.com" })))
        .await
        .unwrap();

    let body = response_json(response).await;
    let result = &body["result"];
    assert_eq!(
        result["content"][0]["text"],
        format!(
            "Smuggler script not found at {}. Ensure it is cloned during build.",
            dir.path().join("smuggler.py").display()
        )
    );
    assert!(result.get("metadata").is_none());
}

#[tokio::test]
async fn test_call_invalid_url() {
    let (_dir, state) = create_test_state(Some("exit 0\n"));
    let response = app(&state)
        .oneshot(call_smuggler(json!({ "url": "not a url" })))
        .await
        .unwrap();

    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], -32602);
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_call_unknown_tool() {
    let (_dir, state) = create_test_state(None);
    let req = rpc("tools/call", json!({ "name": "do-nmap", "arguments": {} }));
    let response = app(&state).oneshot(req).await.unwrap();

    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], -32602);
    assert!(body["error"]["message"].as_str().unwrap().contains("do-nmap"));
}
