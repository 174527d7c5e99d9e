//! Contract binding
//!
//! A callable handle to the deployed LostAndFound contract, constructed
//! in read or write mode. Every method name is validated against the
//! declared surface before any request leaves the process. Writes
//! return a `PendingTx`; nothing is durable until it confirms.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast;

use crate::abi::ContractInterface;
use crate::config::ChainConfig;
use crate::error::FindEarnError;
use crate::model::{Address, TxHash};
use crate::provider::{CallRequest, ChainEvent, TransactionRequest, TxReceipt, WalletProvider};
use crate::session::ChainSession;

/// Callable handle to a deployed contract
///
/// Read bindings can only query; write bindings carry the session
/// account as the transaction sender.
pub struct ContractBinding {
    provider: Arc<dyn WalletProvider>,
    address: Address,
    interface: ContractInterface,
    signer: Option<Address>,
}

impl ContractBinding {
    /// Bind the contract in read-only mode
    ///
    /// Needs no session: reads are unsigned and work before any wallet
    /// is connected.
    pub fn read(
        config: &ChainConfig,
        interface: ContractInterface,
        provider: Arc<dyn WalletProvider>,
    ) -> Self {
        Self {
            provider,
            address: config.contract_address.clone(),
            interface,
            signer: None,
        }
    }

    /// Bind the contract in write mode using the session's account
    ///
    /// Fails with a binding error when the session has no provider or
    /// no active account; a handle that could not sign is never
    /// constructed.
    pub fn write(
        config: &ChainConfig,
        interface: ContractInterface,
        session: &ChainSession,
    ) -> Result<Self, FindEarnError> {
        let provider = session.provider().ok_or_else(|| {
            FindEarnError::Binding("session has no wallet provider".to_string())
        })?;
        let signer = session.account().ok_or_else(|| {
            FindEarnError::Binding("session has no active account".to_string())
        })?;

        log::debug!("🔏 Write binding for {} as {}", config.contract_address, signer);
        Ok(Self {
            provider: Arc::clone(provider),
            address: config.contract_address.clone(),
            interface,
            signer: Some(signer.clone()),
        })
    }

    /// Execute a declared read method
    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, FindEarnError> {
        if !self.interface.declares_read(method) {
            log::error!("❌ '{}' is not a declared read method", method);
            return Err(FindEarnError::UnknownMethod(format!(
                "'{}' is not a declared read",
                method
            )));
        }

        let request = CallRequest {
            to: self.address.clone(),
            method: method.to_string(),
            args,
        };
        self.provider.call(&request).await
    }

    /// Submit a declared write method as a signed transaction
    ///
    /// Resolves once the node accepts the submission. Callers must
    /// await `PendingTx::confirmed` before treating the effect as
    /// applied.
    pub async fn send(&self, method: &str, args: Vec<Value>) -> Result<PendingTx, FindEarnError> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            log::error!("❌ Write '{}' attempted through a read-only binding", method);
            FindEarnError::SessionRequired(format!(
                "write '{}' attempted through a read-only binding",
                method
            ))
        })?;

        if !self.interface.declares_write(method) {
            log::error!("❌ '{}' is not a declared write method", method);
            return Err(FindEarnError::UnknownMethod(format!(
                "'{}' is not a declared write",
                method
            )));
        }

        log::info!("📝 Sending '{}' as {}", method, signer);
        let request = TransactionRequest {
            from: signer.clone(),
            to: self.address.clone(),
            method: method.to_string(),
            args,
        };
        let tx_hash = self.provider.send_transaction(&request).await?;

        Ok(PendingTx {
            provider: Arc::clone(&self.provider),
            tx_hash,
        })
    }

    /// Subscribe to the contract's event stream
    pub fn events(&self) -> broadcast::Receiver<ChainEvent> {
        self.provider.events()
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn interface(&self) -> &ContractInterface {
        &self.interface
    }

    /// The signing account, present only on write bindings
    pub fn signer(&self) -> Option<&Address> {
        self.signer.as_ref()
    }
}

/// Handle to a submitted, not yet confirmed transaction
pub struct PendingTx {
    provider: Arc<dyn WalletProvider>,
    tx_hash: TxHash,
}

impl PendingTx {
    pub fn tx_hash(&self) -> &TxHash {
        &self.tx_hash
    }

    /// Wait until the transaction lands and check its outcome
    ///
    /// A reverted transaction resolves to a `WriteFailure` carrying the
    /// node's revert reason. Consumes the handle; a transaction is
    /// awaited once.
    pub async fn confirmed(self) -> Result<TxReceipt, FindEarnError> {
        let receipt = self.provider.confirm(&self.tx_hash).await?;
        if !receipt.succeeded() {
            let reason = receipt
                .revert_reason
                .clone()
                .unwrap_or_else(|| "transaction reverted".to_string());
            return Err(FindEarnError::write_failure(self.tx_hash.as_str(), reason));
        }
        Ok(receipt)
    }
}
