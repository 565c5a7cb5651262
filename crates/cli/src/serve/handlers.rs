//! HTTP route handlers: health, initLedger, addContract, contract lookup, invoke.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use digicon_chaincode::{ChaincodeError, ErrorKind, Operation};
use serde::Deserialize;
use serde_json::Value;

use super::json_error;
use super::state::AppState;
use crate::envelope::payload_value;

#[derive(Debug, Deserialize)]
pub(crate) struct AddContractRequest {
    #[serde(default)]
    key: Value,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvokeRequest {
    operation: String,
    #[serde(default)]
    args: Vec<Value>,
}

/// HTTP status for a chaincode failure.
pub(crate) fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::BadArguments | ErrorKind::UnknownOperation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists | ErrorKind::AlreadyInitialized => StatusCode::CONFLICT,
        ErrorKind::InvalidContract => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::StoreError | ErrorKind::SerializationError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Text form of a JSON argument: strings as-is, anything else as compact JSON.
fn arg_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn run(state: &AppState, operation: &str, args: &[String]) -> Response {
    match state.invoke(operation, args).await {
        Ok(payload) => {
            tracing::debug!(operation, bytes = payload.len(), "invocation succeeded");
            let body = serde_json::json!({
                "success": format!("{} committed", operation),
                "payload": payload_value(&payload),
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &ChaincodeError) -> Response {
    let status = status_for(err.kind());
    if status.is_server_error() {
        tracing::error!(error = %err, "invocation failed");
    } else {
        tracing::debug!(error = %err, "invocation rejected");
    }
    (status, Json(err.to_json_value())).into_response()
}

/// Malformed request bodies answer the same envelope as bad chaincode arguments.
fn rejection_response(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection.body_text(), "request body rejected");
    let body = serde_json::json!({
        "error": rejection.body_text(),
        "kind": ErrorKind::BadArguments,
    });
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// POST /initLedger
pub(crate) async fn handle_init_ledger(State(state): State<Arc<AppState>>) -> Response {
    run(&state, Operation::InitLedger.name(), &[]).await
}

/// POST /addContract
///
/// Body: `{"key": <string|number>, "value": <any JSON>}`. The key is
/// stringified and the value stored as compact JSON.
pub(crate) async fn handle_add_contract(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AddContractRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(b) => b,
        Err(rejection) => return rejection_response(rejection),
    };

    let key = match &request.key {
        Value::Null => {
            return error_response(&bad_request("request body is missing \"key\""));
        }
        other => arg_text(other),
    };
    if request.value.is_null() {
        return error_response(&bad_request("request body is missing \"value\""));
    }
    let value = request.value.to_string();

    run(&state, Operation::AddContract.name(), &[key, value]).await
}

/// GET /contracts/{key}
pub(crate) async fn handle_get_contract(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Response {
    run(&state, Operation::GetContract.name(), &[key]).await
}

/// POST /invoke
///
/// Body: `{"operation": <name>, "args": [...]}`.
pub(crate) async fn handle_invoke(
    State(state): State<Arc<AppState>>,
    body: Result<Json<InvokeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(b) => b,
        Err(rejection) => return rejection_response(rejection),
    };
    let args: Vec<String> = request.args.iter().map(arg_text).collect();
    run(&state, &request.operation, &args).await
}

fn bad_request(message: &str) -> ChaincodeError {
    ChaincodeError::BadArguments {
        message: message.to_string(),
    }
}
