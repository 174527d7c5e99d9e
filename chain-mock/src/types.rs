/// Wire types for the mock chain node
///
/// These match the JSON-RPC surface the Find&Earn client consumes, so
/// the client can run against this node transparently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Incoming JSON-RPC 2.0 envelope
#[derive(Debug, Deserialize)]
pub struct RpcEnvelope {
    #[serde(default)]
    pub jsonrpc: String,
    /// Echoed back verbatim; may be a number, string, or null
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Outgoing JSON-RPC 2.0 envelope
#[derive(Debug, Serialize)]
pub struct RpcReply {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

impl RpcReply {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcErrorBody {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Parameters of a read-only call (`fe_call`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallParams {
    pub to: String,
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Parameters of a signed transaction (`fe_sendTransaction`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionParams {
    pub from: String,
    pub to: String,
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// One stored lost item, in the shape `getLostItem` returns
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: u64,
    pub reporter: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub contact: String,
    pub is_found: bool,
    /// Finder account, present once the item is found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finder: Option<String>,
    /// Reward in wei, as a decimal string
    pub reward: String,
    pub reward_claimed: bool,
    /// Unix seconds
    pub reported_at: u64,
}

/// One notification, in the shape `getUserNotifications` returns
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: u64,
    pub item_id: u64,
    pub receiver: String,
    pub finder: String,
    pub message: String,
    pub finder_contact: String,
    pub is_read: bool,
    /// Unix seconds
    pub created_at: u64,
}

/// Execution outcome recorded in a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxOutcome {
    Success,
    Failure,
}

/// Receipt returned by `fe_getTransactionReceipt`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRecord {
    pub tx_hash: String,
    pub status: TxOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
}

/// One emitted contract event, wire-tagged by kind
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum EventRecord {
    #[serde(rename_all = "camelCase")]
    ItemFound {
        item_id: u64,
        finder: String,
        location: String,
    },
    #[serde(rename_all = "camelCase")]
    NotificationCreated {
        notification_id: u64,
        receiver: String,
        item_id: u64,
    },
}

/// Page of the event log returned by `fe_getEvents`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    pub events: Vec<EventRecord>,
    /// Cursor to pass on the next poll; equals the log length
    pub next_cursor: u64,
}

/// POST /dev/seed request body
#[derive(Debug, Deserialize)]
pub struct SeedRequest {
    pub items: Vec<SeedItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedItem {
    pub reporter: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub contact: String,
    /// Reward in wei, as a decimal string; defaults to "0"
    #[serde(default)]
    pub reward: Option<String>,
}

/// POST /dev/seed response body
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub ids: Vec<u64>,
}
