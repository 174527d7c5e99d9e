/// Axum HTTP handlers for the mock node RPC surface

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::{LedgerState, RpcFailure, INVALID_PARAMS, METHOD_NOT_FOUND};
use crate::types::*;

/// Shared application state
pub type AppState = Arc<LedgerState>;

/// Custom error type for handlers
pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, message).into_response()
    }
}

/// POST /rpc
/// JSON-RPC 2.0 endpoint the wallet provider talks to
///
/// Protocol failures travel inside the reply envelope with HTTP 200;
/// only a malformed body earns an HTTP error (from the Json extractor).
pub async fn rpc_endpoint(
    State(state): State<AppState>,
    Json(envelope): Json<RpcEnvelope>,
) -> Json<RpcReply> {
    log::debug!("📞 RPC {} (id {})", envelope.method, envelope.id);
    Json(dispatch(&state, envelope))
}

fn dispatch(state: &LedgerState, envelope: RpcEnvelope) -> RpcReply {
    let RpcEnvelope {
        id, method, params, ..
    } = envelope;

    match method.as_str() {
        "fe_requestAccounts" => RpcReply::result(id, json!(state.accounts())),
        "fe_call" => match decode_single::<CallParams>(&params) {
            Ok(call) => reply(id, state.call(&call)),
            Err(message) => RpcReply::error(id, INVALID_PARAMS, message),
        },
        "fe_sendTransaction" => match decode_single::<TransactionParams>(&params) {
            Ok(tx) => reply(id, state.send_transaction(&tx).map(|hash| json!(hash))),
            Err(message) => RpcReply::error(id, INVALID_PARAMS, message),
        },
        "fe_getTransactionReceipt" => match decode_single::<String>(&params) {
            // A missing receipt means the transaction is still pending
            Ok(hash) => RpcReply::result(
                id,
                state.receipt(&hash).map_or(Value::Null, |r| json!(r)),
            ),
            Err(message) => RpcReply::error(id, INVALID_PARAMS, message),
        },
        "fe_getEvents" => match decode_single::<u64>(&params) {
            Ok(cursor) => RpcReply::result(id, json!(state.events_from(cursor))),
            Err(message) => RpcReply::error(id, INVALID_PARAMS, message),
        },
        other => RpcReply::error(
            id,
            METHOD_NOT_FOUND,
            format!("unknown RPC method '{}'", other),
        ),
    }
}

fn reply(id: Value, outcome: Result<Value, RpcFailure>) -> RpcReply {
    match outcome {
        Ok(result) => RpcReply::result(id, result),
        Err(failure) => RpcReply::error(id, failure.code, failure.message),
    }
}

/// Decodes `params` shaped as a one-element positional array
fn decode_single<T: DeserializeOwned>(params: &Value) -> Result<T, String> {
    let first = params
        .as_array()
        .and_then(|list| list.first())
        .ok_or_else(|| "params must be a one-element array".to_string())?;
    serde_json::from_value(first.clone()).map_err(|e| format!("malformed params: {}", e))
}

// ============================================================================
// DEV HELPER ENDPOINTS (not part of the wallet RPC surface)
// ============================================================================

/// POST /dev/seed
/// Pre-populates lost items, bypassing transaction execution
///
/// The only way to create reward-bearing items, since `reportLostItem`
/// takes no reward argument.
pub async fn seed_items(
    State(state): State<AppState>,
    Json(request): Json<SeedRequest>,
) -> Result<Json<SeedResponse>, ApiError> {
    validate_seed(&request)?;

    log::info!("🌱 Seeding {} items", request.items.len());
    let ids = state.seed_items(request);

    Ok(Json(SeedResponse { ids }))
}

fn validate_seed(request: &SeedRequest) -> Result<(), ApiError> {
    for (index, item) in request.items.iter().enumerate() {
        if !is_address(&item.reporter) {
            return Err(ApiError::BadRequest(format!(
                "item {}: reporter '{}' is not a hex address",
                index, item.reporter
            )));
        }
        if let Some(reward) = &item.reward {
            if reward.parse::<u128>().is_err() {
                return Err(ApiError::BadRequest(format!(
                    "item {}: reward '{}' is not a decimal wei amount",
                    index, reward
                )));
            }
        }
    }
    Ok(())
}

fn is_address(value: &str) -> bool {
    value.len() == 42
        && value.starts_with("0x")
        && value[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
