//! Client configuration from environment variables
//!
//! Controls the node RPC endpoint, the LostAndFound contract address,
//! and the polling cadence. Defaults target a local development node.

use std::env;
use std::time::Duration;

use crate::model::Address;

/// Canonical LostAndFound deployment used when no address is configured
const DEFAULT_CONTRACT_ADDRESS: &str = "0x21300Fb85259788990BA1ECCB5E601263EFfafa8";

const DEFAULT_RPC_URL: &str = "http://localhost:8545/rpc";

const DEFAULT_EVENT_POLL_MS: u64 = 4000;

const DEFAULT_CONFIRM_POLL_MS: u64 = 1000;

/// Connection settings for the Find&Earn client
///
/// Passed explicitly into provider and binding construction; nothing
/// reads these values from globals.
#[derive(Clone, Debug)]
pub struct ChainConfig {
    /// JSON-RPC endpoint of the chain node
    pub rpc_url: String,
    /// Address of the deployed LostAndFound contract
    pub contract_address: Address,
    /// How often the provider polls the node for new contract events
    pub event_poll_interval: Duration,
    /// How often a pending transaction polls for its receipt
    pub confirm_poll_interval: Duration,
}

impl ChainConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `FINDEARN_RPC_URL`: JSON-RPC endpoint (default `http://localhost:8545/rpc`)
    /// - `FINDEARN_CONTRACT_ADDRESS`: deployed contract address
    /// - `FINDEARN_EVENT_POLL_MS`: event poll cadence in milliseconds
    /// - `FINDEARN_CONFIRM_POLL_MS`: receipt poll cadence in milliseconds
    ///
    /// Invalid values are logged and replaced with the defaults rather
    /// than failing startup.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Local chain-mock node (default)
    /// cargo run
    ///
    /// # Point at a shared devnet
    /// FINDEARN_RPC_URL=http://devnet:8545/rpc FINDEARN_EVENT_POLL_MS=2000 cargo run
    /// ```
    pub fn from_env() -> Self {
        let rpc_url = env::var("FINDEARN_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
        log::info!("📡 Node RPC URL: {}", rpc_url);

        let contract_address = match env::var("FINDEARN_CONTRACT_ADDRESS") {
            Ok(raw) => match raw.parse::<Address>() {
                Ok(addr) => addr,
                Err(e) => {
                    log::warn!("⚠️  Invalid FINDEARN_CONTRACT_ADDRESS ({}), using default", e);
                    default_contract_address()
                }
            },
            Err(_) => default_contract_address(),
        };
        log::info!("🔗 Contract address: {}", contract_address);

        let event_poll_interval =
            env_poll_interval("FINDEARN_EVENT_POLL_MS", DEFAULT_EVENT_POLL_MS);
        let confirm_poll_interval =
            env_poll_interval("FINDEARN_CONFIRM_POLL_MS", DEFAULT_CONFIRM_POLL_MS);

        Self {
            rpc_url,
            contract_address,
            event_poll_interval,
            confirm_poll_interval,
        }
    }
}

impl Default for ChainConfig {
    /// Default configuration (local development node)
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            contract_address: default_contract_address(),
            event_poll_interval: Duration::from_millis(DEFAULT_EVENT_POLL_MS),
            confirm_poll_interval: Duration::from_millis(DEFAULT_CONFIRM_POLL_MS),
        }
    }
}

fn default_contract_address() -> Address {
    DEFAULT_CONTRACT_ADDRESS
        .parse()
        .expect("default contract address is a valid address literal")
}

fn env_poll_interval(var: &str, default_ms: u64) -> Duration {
    let ms = match env::var(var) {
        Ok(raw) => match parse_ms(&raw) {
            Some(ms) => ms,
            None => {
                log::warn!("⚠️  Invalid {} '{}', using {}ms", var, raw, default_ms);
                default_ms
            }
        },
        Err(_) => default_ms,
    };
    Duration::from_millis(ms)
}

/// Parse a millisecond interval; rejects zero so pollers never spin
fn parse_ms(raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) => None,
        Ok(ms) => Some(ms),
        Err(_) => None,
    }
}
