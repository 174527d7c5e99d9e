//! JSON-RPC wallet provider
//!
//! `HttpProvider` implements the wallet boundary over JSON-RPC 2.0,
//! speaking the `fe_*` method namespace of a Find&Earn chain node.
//! Contract events are polled from a spawned task with a server-side
//! cursor, so restarts of the poll loop never re-deliver old events,
//! and fanned out through a broadcast channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::ChainConfig;
use crate::error::FindEarnError;
use crate::model::{Address, TxHash};
use crate::provider::{CallRequest, ChainEvent, TransactionRequest, TxReceipt, WalletProvider};

/// EIP-1193 code for a request the user declined in their wallet
const USER_REJECTED_CODE: i64 = 4001;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    /// `null` both when absent and when the method legitimately
    /// returns null (a pending receipt)
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Wallet provider backed by an HTTP JSON-RPC node
///
/// The event poll task starts at construction and stops when the
/// provider is dropped.
pub struct HttpProvider {
    client: reqwest::Client,
    rpc_url: String,
    confirm_poll_interval: std::time::Duration,
    next_id: Arc<AtomicU64>,
    events_tx: broadcast::Sender<ChainEvent>,
    poll_task: JoinHandle<()>,
}

impl HttpProvider {
    /// Create a provider and start its event poll loop
    pub fn new(config: &ChainConfig) -> Self {
        let client = reqwest::Client::new();
        let next_id = Arc::new(AtomicU64::new(0));
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let poll_task = tokio::spawn(poll_events(
            client.clone(),
            config.rpc_url.clone(),
            config.event_poll_interval,
            Arc::clone(&next_id),
            events_tx.clone(),
        ));
        log::debug!(
            "📡 Event poll loop started ({}ms cadence)",
            config.event_poll_interval.as_millis()
        );

        Self {
            client,
            rpc_url: config.rpc_url.clone(),
            confirm_poll_interval: config.confirm_poll_interval,
            next_id,
            events_tx,
            poll_task,
        }
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value, FindEarnError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        rpc_call(&self.client, &self.rpc_url, id, method, params).await
    }
}

impl Drop for HttpProvider {
    fn drop(&mut self) {
        self.poll_task.abort();
    }
}

#[async_trait]
impl WalletProvider for HttpProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, FindEarnError> {
        log::info!("🔑 Requesting wallet accounts");

        let result = self.rpc("fe_requestAccounts", json!([])).await?;
        let raw = result.as_array().ok_or_else(|| {
            FindEarnError::InvalidResponse("fe_requestAccounts reply is not an array".to_string())
        })?;

        let mut accounts = Vec::with_capacity(raw.len());
        for value in raw {
            let s = value.as_str().ok_or_else(|| {
                FindEarnError::InvalidResponse("account entry is not a string".to_string())
            })?;
            accounts.push(s.parse::<Address>()?);
        }

        log::info!("   ✅ {} account(s) granted", accounts.len());
        Ok(accounts)
    }

    async fn call(&self, request: &CallRequest) -> Result<Value, FindEarnError> {
        log::debug!("📞 Read call '{}' on {}", request.method, request.to);
        let params = json!([serde_json::to_value(request)?]);
        self.rpc("fe_call", params).await
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxHash, FindEarnError> {
        log::info!(
            "🚀 Submitting '{}' transaction from {}",
            request.method,
            request.from
        );

        let params = json!([serde_json::to_value(request)?]);
        let result = self.rpc("fe_sendTransaction", params).await?;
        let raw = result.as_str().ok_or_else(|| {
            FindEarnError::InvalidResponse("fe_sendTransaction reply is not a string".to_string())
        })?;
        let tx_hash = raw.parse::<TxHash>()?;

        log::info!("   ✅ Submitted: {}", tx_hash);
        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: &TxHash) -> Result<TxReceipt, FindEarnError> {
        log::info!("⏳ Waiting for confirmation: {}", tx_hash);

        // No timeout here: the wait is bounded only by the chain
        // connection, and callers own any cancellation.
        loop {
            let result = self
                .rpc("fe_getTransactionReceipt", json!([tx_hash.as_str()]))
                .await?;

            if result.is_null() {
                tokio::time::sleep(self.confirm_poll_interval).await;
                continue;
            }

            let receipt: TxReceipt = serde_json::from_value(result).map_err(|e| {
                FindEarnError::InvalidResponse(format!("malformed receipt: {}", e))
            })?;

            if receipt.succeeded() {
                log::info!("   ✅ Confirmed: {}", tx_hash);
            } else {
                log::warn!(
                    "   ❌ Reverted: {} ({})",
                    tx_hash,
                    receipt.revert_reason.as_deref().unwrap_or("no reason given")
                );
            }
            return Ok(receipt);
        }
    }

    fn events(&self) -> broadcast::Receiver<ChainEvent> {
        self.events_tx.subscribe()
    }
}

async fn rpc_call(
    client: &reqwest::Client,
    url: &str,
    id: u64,
    method: &str,
    params: Value,
) -> Result<Value, FindEarnError> {
    let request = RpcRequest {
        jsonrpc: "2.0",
        id,
        method,
        params,
    };

    let response = client.post(url).json(&request).send().await.map_err(|e| {
        log::error!("   ❌ RPC transport failed for '{}': {}", method, e);
        FindEarnError::wallet_unavailable(format!("transport error calling {}: {}", method, e))
    })?;

    if !response.status().is_success() {
        let status = response.status();
        log::error!("   ❌ RPC HTTP error for '{}': {}", method, status);
        return Err(FindEarnError::wallet_unavailable(format!(
            "HTTP {} from node",
            status
        )));
    }

    let envelope: RpcResponse = response.json().await.map_err(|e| {
        log::error!("   ❌ RPC JSON parse failed for '{}': {}", method, e);
        FindEarnError::InvalidResponse(format!("malformed envelope: {}", e))
    })?;

    if let Some(error) = envelope.error {
        log::error!("   ❌ RPC error {} for '{}': {}", error.code, method, error.message);
        if error.code == USER_REJECTED_CODE {
            return Err(FindEarnError::UserRejected(method.to_string()));
        }
        return Err(FindEarnError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    Ok(envelope.result)
}

/// Poll `fe_getEvents` forever, fanning decoded events into `tx`
///
/// The cursor advances only on successful polls, so a failed poll
/// re-reads nothing and loses nothing. Aborted by the provider's Drop.
async fn poll_events(
    client: reqwest::Client,
    url: String,
    interval: std::time::Duration,
    next_id: Arc<AtomicU64>,
    tx: broadcast::Sender<ChainEvent>,
) {
    let mut cursor: u64 = 0;
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        let id = next_id.fetch_add(1, Ordering::Relaxed) + 1;
        match fetch_events(&client, &url, id, cursor).await {
            Ok((events, next_cursor)) => {
                cursor = next_cursor;
                for event in events {
                    log::debug!("   📨 Event observed: {} for {}", event.name(), event.target());
                    // Send fails only when nobody is subscribed; events
                    // before the first subscriber are intentionally dropped.
                    let _ = tx.send(event);
                }
            }
            Err(e) => {
                log::warn!("📡 Event poll failed (cursor {}): {}", cursor, e);
            }
        }
    }
}

async fn fetch_events(
    client: &reqwest::Client,
    url: &str,
    id: u64,
    cursor: u64,
) -> Result<(Vec<ChainEvent>, u64), FindEarnError> {
    let result = rpc_call(client, url, id, "fe_getEvents", json!([cursor])).await?;

    let next_cursor = result.get("nextCursor").and_then(Value::as_u64).ok_or_else(|| {
        FindEarnError::InvalidResponse("fe_getEvents reply missing 'nextCursor'".to_string())
    })?;
    let raw_events = result.get("events").and_then(Value::as_array).ok_or_else(|| {
        FindEarnError::InvalidResponse("fe_getEvents reply missing 'events'".to_string())
    })?;

    let mut events = Vec::with_capacity(raw_events.len());
    for raw in raw_events {
        // An unknown event kind from a newer contract must not kill
        // the poll loop; skip it and keep the cursor moving.
        match serde_json::from_value::<ChainEvent>(raw.clone()) {
            Ok(event) => events.push(event),
            Err(e) => log::warn!("   ⚠️  Skipping undecodable event: {}", e),
        }
    }

    Ok((events, next_cursor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_envelope_shape() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "fe_getEvents",
            params: json!([0]),
        };

        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(
            wire,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "fe_getEvents",
                "params": [0]
            })
        );
    }

    #[test]
    fn test_response_envelope_decodes_error() {
        let envelope: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 7,
            "error": { "code": 4001, "message": "user rejected" }
        }))
        .unwrap();

        let error = envelope.error.unwrap();
        assert_eq!(error.code, USER_REJECTED_CODE);
        assert_eq!(error.message, "user rejected");
    }

    #[test]
    fn test_null_result_decodes_as_pending() {
        let envelope: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 8,
            "result": null
        }))
        .unwrap();

        assert!(envelope.result.is_null());
        assert!(envelope.error.is_none());
    }
}
