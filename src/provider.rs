//! Wallet provider boundary
//!
//! The injected-wallet abstraction every chain interaction goes
//! through: account access, read calls, signed transaction submission,
//! confirmation waits, and the contract event stream. Implementations
//! map their transport failures onto the crate error taxonomy: a
//! declined prompt is `UserRejected`, an unreachable wallet or node is
//! `WalletUnavailable`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::FindEarnError;
use crate::model::{Address, TxHash};

/// A read-only contract call
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    pub to: Address,
    pub method: String,
    pub args: Vec<Value>,
}

/// A state-changing contract call, signed by `from`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub method: String,
    pub args: Vec<Value>,
}

/// Execution outcome recorded in a transaction receipt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failure,
}

/// Receipt of a transaction that has landed on chain
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub status: TxStatus,
    /// Populated when `status` is `Failure`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
}

impl TxReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == TxStatus::Success
    }
}

/// A contract event observed on chain
///
/// The wire form is a tagged object: `{"event": "ItemFound", ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ChainEvent {
    #[serde(rename_all = "camelCase")]
    ItemFound {
        item_id: u64,
        finder: Address,
        location: String,
    },
    #[serde(rename_all = "camelCase")]
    NotificationCreated {
        notification_id: u64,
        receiver: Address,
        item_id: u64,
    },
}

impl ChainEvent {
    /// The account this event concerns
    ///
    /// `ItemFound` concerns the finder; `NotificationCreated` concerns
    /// the receiver. Subscribers filter on this address.
    pub fn target(&self) -> &Address {
        match self {
            Self::ItemFound { finder, .. } => finder,
            Self::NotificationCreated { receiver, .. } => receiver,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ItemFound { .. } => "ItemFound",
            Self::NotificationCreated { .. } => "NotificationCreated",
        }
    }
}

/// Injected wallet boundary
///
/// All chain access goes through one of these.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Request account access
    ///
    /// Returns the wallet's accounts with the active account first.
    /// Fails with `UserRejected` when the user declines the prompt and
    /// `WalletUnavailable` when no wallet answers.
    async fn request_accounts(&self) -> Result<Vec<Address>, FindEarnError>;

    /// Execute a read-only contract call
    async fn call(&self, request: &CallRequest) -> Result<Value, FindEarnError>;

    /// Submit a signed state-changing call
    ///
    /// Resolves with the transaction hash as soon as the node accepts
    /// the submission. Acceptance is not durability; await `confirm`
    /// before treating the effect as applied.
    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxHash, FindEarnError>;

    /// Wait until the transaction lands and return its receipt
    ///
    /// There is no internal timeout; the wait is bounded only by the
    /// chain connection. Failed transactions still resolve, with
    /// `status` marking the failure and `revert_reason` carrying the
    /// cause when the node reports one.
    async fn confirm(&self, tx_hash: &TxHash) -> Result<TxReceipt, FindEarnError>;

    /// Subscribe to the contract event stream
    ///
    /// Each call returns a fresh receiver on the same broadcast
    /// channel. Receivers that fall behind observe a lag error and
    /// continue from the oldest retained event.
    fn events(&self) -> broadcast::Receiver<ChainEvent>;
}
