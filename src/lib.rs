//! Find&Earn client: contract interaction for the lost-and-found ledger
//!
//! This crate provides the client-side core of the Find&Earn
//! application: establishing a wallet-backed contract session, reading
//! item and notification state from chain, and issuing signed writes
//! with correct sequencing. All durable state lives on the external
//! ledger; after every confirmed write the affected lists are
//! re-fetched rather than patched locally.
//!
//! # Architecture
//!
//! - **ChainSession**: wallet connection and the single active account
//! - **ContractBinding**: callable contract handle, validated against the
//!   declared method surface, in read or write mode
//! - **ItemRepository / NotificationCenter**: immutable snapshots of
//!   on-chain state, replaced wholesale on each fetch
//! - **ActionDispatcher**: the user actions, each run as validate, submit,
//!   await confirmation, then refetch
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use findearn_client::{
//!     ActionDispatcher, ChainConfig, ChainSession, ContractBinding,
//!     ContractInterface, HttpProvider, ItemRepository, NotificationCenter,
//!     ReportForm,
//! };
//!
//! // Connect the wallet session
//! let config = ChainConfig::from_env();
//! let provider = Arc::new(HttpProvider::new(&config));
//! let mut session = ChainSession::with_provider(provider);
//! let account = session.connect().await?;
//!
//! // Bind the contract and read the current listing
//! let binding = Arc::new(ContractBinding::write(
//!     &config,
//!     ContractInterface::lost_and_found(),
//!     &session,
//! )?);
//! let items = Arc::new(ItemRepository::new(binding.clone()));
//! let listing = items.list_items().await?;
//!
//! // Report a lost item and wait until it is durable
//! let notifications = Arc::new(NotificationCenter::new(binding.clone(), account));
//! let dispatcher = ActionDispatcher::new(binding, items.clone(), notifications);
//! dispatcher
//!     .report_lost(ReportForm {
//!         name: "Black wallet".into(),
//!         description: "Leather, holds ID cards".into(),
//!         location: "Central station".into(),
//!         contact: "owner@example.com".into(),
//!     })
//!     .await?;
//! ```

// Public modules
pub mod abi;
pub mod binding;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod items;
pub mod model;
pub mod notifications;
pub mod provider;
pub mod rpc;
pub mod session;

// Re-exports for convenience
pub use abi::ContractInterface;
pub use binding::{ContractBinding, PendingTx};
pub use config::ChainConfig;
pub use dispatch::{is_claimable, ActionDispatcher, FoundReport, Refetch, ReportForm};
pub use error::FindEarnError;
pub use items::{filter_items, ItemRepository};
pub use model::{Address, Amount, LostItem, Notification, TxHash};
pub use notifications::{NotificationCenter, Subscription};
pub use provider::{
    CallRequest, ChainEvent, TransactionRequest, TxReceipt, TxStatus, WalletProvider,
};
pub use rpc::HttpProvider;
pub use session::ChainSession;

// Common result type
pub type Result<T> = std::result::Result<T, FindEarnError>;
