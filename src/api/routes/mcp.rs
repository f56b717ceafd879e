use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::api::models::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolCallParams, INVALID_PARAMS,
    INVALID_REQUEST, JSONRPC_VERSION, PARSE_ERROR,
};
use crate::api::tools::{smuggler_descriptor, validate_arguments};
use crate::api::AppState;
use crate::errors::SmugglerError;
use crate::scanner::{SmugglerRequest, TOOL_NAME};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Single JSON-RPC endpoint. Notifications are acknowledged with 202 and no
/// body; every request gets a JSON-RPC response with HTTP 200.
pub async fn handle_mcp(State(state): State<AppState>, body: Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Malformed JSON-RPC request");
            let error = JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e));
            return Json(JsonRpcResponse::failure(Value::Null, error)).into_response();
        }
    };

    if request.jsonrpc != JSONRPC_VERSION {
        let error = JsonRpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\"");
        let id = request.id.unwrap_or(Value::Null);
        return Json(JsonRpcResponse::failure(id, error)).into_response();
    }

    let Some(id) = request.id else {
        debug!(method = %request.method, "Notification received");
        return StatusCode::ACCEPTED.into_response();
    };

    debug!(method = %request.method, id = %id, "JSON-RPC request");
    let response = match dispatch(&state, &request.method, request.params).await {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(error) => JsonRpcResponse::failure(id, error),
    };
    Json(response).into_response()
}

async fn dispatch(state: &AppState, method: &str, params: Value) -> Result<Value, JsonRpcError> {
    match method {
        "initialize" => Ok(initialize_result(&params)),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({ "tools": [smuggler_descriptor()] })),
        "tools/call" => call_tool(state, params).await,
        other => Err(JsonRpcError::method_not_found(other)),
    }
}

fn initialize_result(params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": "smuggler-mcp",
            "version": env!("CARGO_PKG_VERSION"),
            "gitHash": option_env!("GIT_HASH"),
            "builtAt": option_env!("BUILD_TIMESTAMP"),
        }
    })
}

async fn call_tool(state: &AppState, params: Value) -> Result<Value, JsonRpcError> {
    let params: ToolCallParams = serde_json::from_value(params)
        .map_err(|e| JsonRpcError::new(INVALID_PARAMS, format!("Invalid tools/call params: {}", e)))?;

    if params.name != TOOL_NAME {
        return Err(JsonRpcError::new(INVALID_PARAMS, format!("Unknown tool: {}", params.name)));
    }

    validate_arguments(&params.arguments)?;
    let request: SmugglerRequest = serde_json::from_value(params.arguments)
        .map_err(|e| SmugglerError::InvalidArguments(e.to_string()))?;

    info!(tool = TOOL_NAME, target_url = %request.url, "Tool call");
    let response = state.tool.call(request).await?;
    Ok(response.to_tool_result())
}
