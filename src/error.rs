//! Error types for Find&Earn client operations
//!
//! Covers wallet availability, session state, contract reads and writes,
//! and the decoding of on-chain records.

use thiserror::Error;

/// Core error type for Find&Earn client operations
///
/// Every failure is surfaced to the caller of the operation that caused
/// it; nothing here is retried automatically.
#[derive(Error, Debug)]
pub enum FindEarnError {
    /// No wallet provider is injected or reachable
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// The user declined the request in their wallet
    #[error("Request rejected in wallet: {0}")]
    UserRejected(String),

    /// A write was attempted without an active signed session
    #[error("Session required: {0}")]
    SessionRequired(String),

    /// Required input was missing or malformed
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A repository fetch failed
    #[error("Failed to read {what}: {reason}")]
    ReadFailure { what: String, reason: String },

    /// A submitted transaction failed or was reverted on chain
    #[error("Transaction failed: tx_hash={tx_hash}, reason={reason}")]
    WriteFailure { tx_hash: String, reason: String },

    /// Contract handle could not be constructed
    #[error("Binding failed: {0}")]
    Binding(String),

    /// Method name not declared on the contract surface
    #[error("Unknown contract method: {0}")]
    UnknownMethod(String),

    /// The node returned an error envelope
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Malformed or incomplete reply from the node
    #[error("Invalid response from node: {0}")]
    InvalidResponse(String),

    /// An on-chain record was missing a field or had the wrong shape
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Address failed to parse
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Wei amount failed to parse
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper functions for common error scenarios
impl FindEarnError {
    /// Create a wallet unavailable error
    pub fn wallet_unavailable(msg: impl Into<String>) -> Self {
        Self::WalletUnavailable(msg.into())
    }

    /// Create a read failure error
    pub fn read_failure(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ReadFailure {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Create a write failure error
    pub fn write_failure(tx_hash: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WriteFailure {
            tx_hash: tx_hash.into(),
            reason: reason.into(),
        }
    }
}
