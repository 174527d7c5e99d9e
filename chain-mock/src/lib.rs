/// Find&Earn Chain Mock Library
///
/// This crate provides both a standalone binary and library components
/// for mocking the wallet JSON-RPC surface of the LostAndFound contract
/// with an in-memory ledger backend.

pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use server::{create_router, run_server, serve};
pub use state::LedgerState;
pub use types::*;
