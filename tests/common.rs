/// Common test utilities for Find&Earn client integration tests
///
/// This module provides shared test infrastructure including:
/// - A scriptable in-memory wallet provider with a tiny ledger
/// - Record builders in the contract's wire shape
/// - Well-known test accounts and log setup

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::broadcast;

use findearn_client::{
    Address, CallRequest, ChainConfig, ChainEvent, FindEarnError, TransactionRequest, TxHash,
    TxReceipt, TxStatus, WalletProvider,
};

pub const ALICE: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const BOB: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn addr(value: &str) -> Address {
    value.parse().expect("test address should parse")
}

pub fn test_config() -> ChainConfig {
    ChainConfig::default()
}

/// Item record in the shape `getLostItem` returns
pub fn item_record(id: u64, reporter: &str, name: &str) -> Value {
    json!({
        "id": id,
        "reporter": reporter,
        "name": name,
        "description": format!("{} (test item)", name),
        "location": "Central station",
        "contact": "owner@example.com",
        "isFound": false,
        "reward": "0",
        "rewardClaimed": false,
        "reportedAt": 1_771_200_000u64,
    })
}

/// Notification record in the shape `getUserNotifications` returns
pub fn notification_record(id: u64, item_id: u64, receiver: &str, finder: &str) -> Value {
    json!({
        "id": id,
        "itemId": item_id,
        "receiver": receiver,
        "finder": finder,
        "message": "Your item was found",
        "finderContact": "finder@example.com",
        "isRead": false,
        "createdAt": 1_771_203_600u64,
    })
}

/// Scriptable wallet provider backed by an in-memory ledger
///
/// Reads and writes execute against stored records, so a confirmed
/// write is visible to the next read the way it would be on a real
/// chain. Failure scripting covers the cases a live node cannot
/// produce on demand: rejected prompts, broken reads, reverted
/// writes. Events reach subscribers only through `emit`, so tests
/// control delivery timing. Every chain touch is recorded in order.
pub struct MockProvider {
    accounts: Vec<Address>,
    reject_accounts: bool,
    broken_item_ids: Vec<u64>,
    revert: Option<(String, String)>,
    ledger: Mutex<MockLedger>,
    calls: Mutex<Vec<String>>,
    events_tx: broadcast::Sender<ChainEvent>,
}

#[derive(Default)]
struct MockLedger {
    items: Vec<Value>,
    notifications: Vec<Value>,
    receipts: HashMap<String, TxReceipt>,
    tx_counter: u64,
}

impl MockProvider {
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(16);
        Self {
            accounts: vec![addr(ALICE)],
            reject_accounts: false,
            broken_item_ids: Vec::new(),
            revert: None,
            ledger: Mutex::new(MockLedger::default()),
            calls: Mutex::new(Vec::new()),
            events_tx,
        }
    }

    /// Replace the granted accounts (empty models a zero-account wallet)
    pub fn with_accounts(mut self, accounts: &[&str]) -> Self {
        self.accounts = accounts.iter().map(|a| addr(a)).collect();
        self
    }

    /// Script the account prompt to be declined
    pub fn rejecting_accounts(mut self) -> Self {
        self.reject_accounts = true;
        self
    }

    /// Script reads of one item id to fail at the RPC layer
    pub fn breaking_item(mut self, id: u64) -> Self {
        self.broken_item_ids.push(id);
        self
    }

    /// Script one write method to revert with the given reason
    pub fn reverting(mut self, method: &str, reason: &str) -> Self {
        self.revert = Some((method.to_string(), reason.to_string()));
        self
    }

    pub fn seed_item(&self, record: Value) {
        self.ledger().items.push(record);
    }

    pub fn seed_notification(&self, record: Value) {
        self.ledger().notifications.push(record);
    }

    /// Every recorded chain touch, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Submitted write methods only, in call order
    pub fn sends(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|c| c.strip_prefix("send ").map(str::to_owned))
            .collect()
    }

    /// Push an event to all current subscribers
    pub fn emit(&self, event: ChainEvent) {
        let _ = self.events_tx.send(event);
    }

    fn ledger(&self) -> MutexGuard<'_, MockLedger> {
        self.ledger.lock().unwrap()
    }

    fn record(&self, entry: impl Into<String>) {
        self.calls.lock().unwrap().push(entry.into());
    }
}

impl MockLedger {
    fn next_tx_hash(&mut self) -> TxHash {
        self.tx_counter += 1;
        format!("0x{:064x}", self.tx_counter)
            .parse()
            .expect("counter formats to a valid hash")
    }

    /// Apply a write, mirroring the contract's state transitions
    fn apply(&mut self, request: &TransactionRequest) {
        match request.method.as_str() {
            "reportLostItem" => {
                let id = self.items.len() as u64 + 1;
                self.items.push(json!({
                    "id": id,
                    "reporter": request.from.as_str(),
                    "name": request.args[0],
                    "description": request.args[1],
                    "location": request.args[2],
                    "contact": request.args[3],
                    "isFound": false,
                    "reward": "0",
                    "rewardClaimed": false,
                    "reportedAt": 1_771_200_000u64,
                }));
            }
            "markItemAsFound" => {
                let item_id = request.args[0].as_u64().unwrap();
                let item = &mut self.items[(item_id - 1) as usize];
                item["isFound"] = json!(true);
                let receiver = item["reporter"].clone();
                let name = item["name"].as_str().unwrap_or("item").to_owned();

                let id = self.notifications.len() as u64 + 1;
                self.notifications.push(json!({
                    "id": id,
                    "itemId": item_id,
                    "receiver": receiver,
                    "finder": request.from.as_str(),
                    "message": format!("Your item '{}' was found at {}", name, request.args[2]),
                    "finderContact": request.args[3],
                    "isRead": false,
                    "createdAt": 1_771_203_600u64,
                }));
            }
            "markNotificationAsRead" => {
                let id = request.args[0].as_u64().unwrap();
                let notification = self
                    .notifications
                    .iter_mut()
                    .find(|n| n["id"].as_u64() == Some(id))
                    .expect("scripted notification exists");
                notification["isRead"] = json!(true);
            }
            "claimReward" => {
                let item_id = request.args[0].as_u64().unwrap();
                self.items[(item_id - 1) as usize]["rewardClaimed"] = json!(true);
            }
            other => panic!("mock ledger has no transition for '{}'", other),
        }
    }
}

#[async_trait]
impl WalletProvider for MockProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, FindEarnError> {
        self.record("requestAccounts");
        if self.reject_accounts {
            return Err(FindEarnError::UserRejected("fe_requestAccounts".to_string()));
        }
        Ok(self.accounts.clone())
    }

    async fn call(&self, request: &CallRequest) -> Result<Value, FindEarnError> {
        match request.method.as_str() {
            "getItemCount" => {
                self.record("call getItemCount");
                Ok(json!(self.ledger().items.len() as u64))
            }
            "getLostItem" => {
                let id = request.args[0].as_u64().unwrap();
                self.record(format!("call getLostItem({})", id));
                if self.broken_item_ids.contains(&id) {
                    return Err(FindEarnError::Rpc {
                        code: -32000,
                        message: format!("scripted failure reading item {}", id),
                    });
                }
                self.ledger()
                    .items
                    .get((id - 1) as usize)
                    .cloned()
                    .ok_or_else(|| FindEarnError::Rpc {
                        code: -32000,
                        message: format!("item {} does not exist", id),
                    })
            }
            "getUserNotifications" => {
                self.record("call getUserNotifications");
                let account = request.args[0].as_str().unwrap().to_owned();
                let list: Vec<Value> = self
                    .ledger()
                    .notifications
                    .iter()
                    .filter(|n| {
                        n["receiver"]
                            .as_str()
                            .is_some_and(|r| r.eq_ignore_ascii_case(&account))
                    })
                    .cloned()
                    .collect();
                Ok(json!(list))
            }
            other => Err(FindEarnError::UnknownMethod(other.to_string())),
        }
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxHash, FindEarnError> {
        self.record(format!("send {}", request.method));

        let mut ledger = self.ledger();
        let tx_hash = ledger.next_tx_hash();

        let reverted = self
            .revert
            .as_ref()
            .filter(|(method, _)| method == &request.method);
        let receipt = match reverted {
            Some((_, reason)) => TxReceipt {
                tx_hash: tx_hash.clone(),
                status: TxStatus::Failure,
                revert_reason: Some(reason.clone()),
            },
            None => {
                ledger.apply(request);
                TxReceipt {
                    tx_hash: tx_hash.clone(),
                    status: TxStatus::Success,
                    revert_reason: None,
                }
            }
        };
        ledger.receipts.insert(tx_hash.as_str().to_owned(), receipt);

        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: &TxHash) -> Result<TxReceipt, FindEarnError> {
        self.record("confirm");
        Ok(self
            .ledger()
            .receipts
            .get(tx_hash.as_str())
            .cloned()
            .expect("confirm called for a submitted transaction"))
    }

    fn events(&self) -> broadcast::Receiver<ChainEvent> {
        self.events_tx.subscribe()
    }
}
