//! Wallet session management
//!
//! Tracks whether a wallet provider is present and which account is
//! active. Every signed operation in the crate starts from a connected
//! session.

use std::sync::Arc;

use crate::error::FindEarnError;
use crate::model::Address;
use crate::provider::WalletProvider;

/// Wallet-backed session with at most one active account
///
/// A session without a provider models the no-wallet-injected case:
/// `connect` fails immediately and no chain call is ever attempted.
/// Disconnecting clears the account but keeps the provider, so the
/// user can reconnect without re-injecting anything.
pub struct ChainSession {
    provider: Option<Arc<dyn WalletProvider>>,
    account: Option<Address>,
}

impl ChainSession {
    /// Create a session over an optional provider
    pub fn new(provider: Option<Arc<dyn WalletProvider>>) -> Self {
        Self {
            provider,
            account: None,
        }
    }

    /// Create a session over an injected provider
    pub fn with_provider(provider: Arc<dyn WalletProvider>) -> Self {
        Self::new(Some(provider))
    }

    /// Request account access and activate the first granted account
    ///
    /// Fails with `WalletUnavailable` when no provider is injected or
    /// the wallet grants no accounts, and with `UserRejected` when the
    /// user declines the prompt. After either failure the session stays
    /// disconnected and nothing further is sent to the chain.
    ///
    /// Connecting an already-connected session re-prompts the wallet
    /// and replaces the active account with the fresh answer.
    pub async fn connect(&mut self) -> Result<Address, FindEarnError> {
        log::info!("🔌 Connecting wallet session");

        let provider = self.provider.as_ref().ok_or_else(|| {
            log::warn!("   ❌ No wallet provider injected");
            FindEarnError::wallet_unavailable("no wallet provider is injected")
        })?;

        let accounts = provider.request_accounts().await?;
        let account = accounts.into_iter().next().ok_or_else(|| {
            log::warn!("   ❌ Wallet granted no accounts");
            FindEarnError::wallet_unavailable("wallet granted no accounts")
        })?;

        log::info!("   ✅ Active account: {}", account);
        self.account = Some(account.clone());
        Ok(account)
    }

    /// The active account, if connected
    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// The underlying provider, if one is injected
    pub fn provider(&self) -> Option<&Arc<dyn WalletProvider>> {
        self.provider.as_ref()
    }

    /// Drop the active account, keeping the provider
    pub fn disconnect(&mut self) {
        if self.account.take().is_some() {
            log::info!("🔌 Session disconnected");
        }
    }
}
