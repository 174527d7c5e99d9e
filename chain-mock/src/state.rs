/// In-memory LostAndFound ledger
///
/// Executes the same contract semantics a real deployment would:
/// `reportLostItem` appends a 1-indexed item, `markItemAsFound` flips
/// the item and fans a notification out to its reporter, `claimReward`
/// validates ownership and claim state. Transactions execute
/// immediately; the receipt records success or the revert reason, and
/// successful state changes append to a cursor-addressed event log.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::types::{
    CallParams, EventRecord, EventsPage, ItemRecord, NotificationRecord, ReceiptRecord,
    SeedRequest, TransactionParams, TxOutcome,
};

/// JSON-RPC error codes used by the node
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const EXECUTION_ERROR: i64 = -32000;

/// Well-known development accounts served by `fe_requestAccounts`
const DEFAULT_ACCOUNTS: [&str; 2] = [
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
    "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
];

/// A request-level RPC failure
///
/// Distinct from an on-chain revert: a revert produces a successful
/// submission with a failure receipt, while this rejects the request
/// itself (unknown method, malformed arguments).
#[derive(Debug)]
pub struct RpcFailure {
    pub code: i64,
    pub message: String,
}

impl RpcFailure {
    fn method_not_found(method: &str) -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: format!("unknown contract method '{}'", method),
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.into(),
        }
    }

    fn execution(message: impl Into<String>) -> Self {
        Self {
            code: EXECUTION_ERROR,
            message: message.into(),
        }
    }
}

/// Shared, thread-safe ledger behind the HTTP handlers
pub struct LedgerState {
    accounts: Vec<String>,
    inner: Mutex<Ledger>,
}

#[derive(Default)]
struct Ledger {
    items: Vec<ItemRecord>,
    notifications: Vec<NotificationRecord>,
    receipts: HashMap<String, ReceiptRecord>,
    events: Vec<EventRecord>,
    tx_counter: u64,
}

impl LedgerState {
    /// Empty ledger with the default development accounts
    pub fn new() -> Self {
        Self::with_accounts(DEFAULT_ACCOUNTS.iter().map(|s| s.to_string()).collect())
    }

    /// Empty ledger granting the given wallet accounts
    pub fn with_accounts(accounts: Vec<String>) -> Self {
        Self {
            accounts,
            inner: Mutex::new(Ledger::default()),
        }
    }

    /// Accounts granted by `fe_requestAccounts`, active account first
    pub fn accounts(&self) -> Vec<String> {
        self.accounts.clone()
    }

    /// Execute a read-only contract call
    pub fn call(&self, params: &CallParams) -> Result<Value, RpcFailure> {
        let ledger = self.lock();
        match params.method.as_str() {
            "getItemCount" => Ok(json!(ledger.items.len() as u64)),
            "getLostItem" => {
                let id = u64_arg(&params.args, 0, "itemId")?;
                let item = ledger
                    .item(id)
                    .ok_or_else(|| RpcFailure::execution(format!("item {} does not exist", id)))?;
                to_json(item)
            }
            "getUserNotifications" => {
                let account = str_arg(&params.args, 0, "account")?;
                let list: Vec<&NotificationRecord> = ledger
                    .notifications
                    .iter()
                    .filter(|n| n.receiver.eq_ignore_ascii_case(&account))
                    .collect();
                to_json(&list)
            }
            other => Err(RpcFailure::method_not_found(other)),
        }
    }

    /// Execute a signed transaction immediately
    ///
    /// Returns the transaction hash. On-chain failures (reverts) still
    /// return a hash; the revert reason lands in the receipt.
    pub fn send_transaction(&self, params: &TransactionParams) -> Result<String, RpcFailure> {
        let mut ledger = self.lock();
        let tx_hash = ledger.next_tx_hash(&params.from, &params.method);

        let outcome = match params.method.as_str() {
            "reportLostItem" => {
                let name = str_arg(&params.args, 0, "name")?;
                let description = str_arg(&params.args, 1, "description")?;
                let location = str_arg(&params.args, 2, "location")?;
                let contact = str_arg(&params.args, 3, "contact")?;
                let id = ledger.append_item(
                    &params.from,
                    name,
                    description,
                    location,
                    contact,
                    "0".to_string(),
                );
                log::info!("📦 Item {} reported by {}", id, params.from);
                Ok(())
            }
            "markItemAsFound" => {
                let item_id = u64_arg(&params.args, 0, "itemId")?;
                // The found-details argument is accepted for signature
                // compatibility; the contract stores only the
                // notification it derives.
                let _details = str_arg(&params.args, 1, "details")?;
                let location = str_arg(&params.args, 2, "location")?;
                let contact = str_arg(&params.args, 3, "contact")?;
                ledger.mark_item_as_found(&params.from, item_id, &location, &contact)
            }
            "markNotificationAsRead" => {
                let id = u64_arg(&params.args, 0, "notificationId")?;
                ledger.mark_notification_as_read(&params.from, id)
            }
            "claimReward" => {
                let item_id = u64_arg(&params.args, 0, "itemId")?;
                ledger.claim_reward(&params.from, item_id)
            }
            other => return Err(RpcFailure::method_not_found(other)),
        };

        let receipt = match outcome {
            Ok(()) => ReceiptRecord {
                tx_hash: tx_hash.clone(),
                status: TxOutcome::Success,
                revert_reason: None,
            },
            Err(reason) => {
                log::warn!("⛔ {} reverted: {}", params.method, reason);
                ReceiptRecord {
                    tx_hash: tx_hash.clone(),
                    status: TxOutcome::Failure,
                    revert_reason: Some(reason),
                }
            }
        };
        ledger.receipts.insert(tx_hash.clone(), receipt);

        Ok(tx_hash)
    }

    /// Receipt of an executed transaction, if the hash is known
    pub fn receipt(&self, tx_hash: &str) -> Option<ReceiptRecord> {
        self.lock().receipts.get(tx_hash).cloned()
    }

    /// Events from `cursor` onward, plus the cursor for the next poll
    pub fn events_from(&self, cursor: u64) -> EventsPage {
        let ledger = self.lock();
        let start = (cursor as usize).min(ledger.events.len());
        EventsPage {
            events: ledger.events[start..].to_vec(),
            next_cursor: ledger.events.len() as u64,
        }
    }

    /// Append pre-populated items, bypassing transaction execution
    ///
    /// Lets tests seed reward-bearing items, which the transaction
    /// surface cannot create (`reportLostItem` has no reward field).
    pub fn seed_items(&self, request: SeedRequest) -> Vec<u64> {
        let mut ledger = self.lock();
        request
            .items
            .into_iter()
            .map(|seed| {
                ledger.append_item(
                    &seed.reporter,
                    seed.name,
                    seed.description,
                    seed.location,
                    seed.contact,
                    seed.reward.unwrap_or_else(|| "0".to_string()),
                )
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Ledger> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Items are 1-indexed on chain
    fn item(&self, id: u64) -> Option<&ItemRecord> {
        if id == 0 {
            return None;
        }
        self.items.get((id - 1) as usize)
    }

    fn next_tx_hash(&mut self, from: &str, method: &str) -> String {
        self.tx_counter += 1;
        let mut hasher = Sha256::new();
        hasher.update(self.tx_counter.to_be_bytes());
        hasher.update(from.as_bytes());
        hasher.update(method.as_bytes());
        format!("0x{}", hex::encode(hasher.finalize()))
    }

    fn append_item(
        &mut self,
        reporter: &str,
        name: String,
        description: String,
        location: String,
        contact: String,
        reward: String,
    ) -> u64 {
        let id = self.items.len() as u64 + 1;
        self.items.push(ItemRecord {
            id,
            reporter: reporter.to_string(),
            name,
            description,
            location,
            contact,
            is_found: false,
            finder: None,
            reward,
            reward_claimed: false,
            reported_at: now_secs(),
        });
        id
    }

    fn mark_item_as_found(
        &mut self,
        from: &str,
        item_id: u64,
        location: &str,
        contact: &str,
    ) -> Result<(), String> {
        if item_id == 0 || item_id as usize > self.items.len() {
            return Err(format!("item {} does not exist", item_id));
        }
        let index = (item_id - 1) as usize;
        if self.items[index].is_found {
            return Err("item already marked as found".to_string());
        }

        self.items[index].is_found = true;
        self.items[index].finder = Some(from.to_string());
        let reporter = self.items[index].reporter.clone();
        let name = self.items[index].name.clone();

        let notification_id = self.notifications.len() as u64 + 1;
        self.notifications.push(NotificationRecord {
            id: notification_id,
            item_id,
            receiver: reporter.clone(),
            finder: from.to_string(),
            message: format!("Your item '{}' was found at {}", name, location),
            finder_contact: contact.to_string(),
            is_read: false,
            created_at: now_secs(),
        });

        self.events.push(EventRecord::ItemFound {
            item_id,
            finder: from.to_string(),
            location: location.to_string(),
        });
        self.events.push(EventRecord::NotificationCreated {
            notification_id,
            receiver: reporter,
            item_id,
        });

        log::info!("🔎 Item {} marked found by {}", item_id, from);
        Ok(())
    }

    fn mark_notification_as_read(&mut self, from: &str, id: u64) -> Result<(), String> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| format!("notification {} does not exist", id))?;
        if !notification.receiver.eq_ignore_ascii_case(from) {
            return Err("not the notification owner".to_string());
        }
        notification.is_read = true;
        Ok(())
    }

    fn claim_reward(&mut self, from: &str, item_id: u64) -> Result<(), String> {
        if item_id == 0 || item_id as usize > self.items.len() {
            return Err(format!("item {} does not exist", item_id));
        }
        let item = &mut self.items[(item_id - 1) as usize];
        if !item.reporter.eq_ignore_ascii_case(from) {
            return Err("only the reporter can claim".to_string());
        }
        if !item.is_found {
            return Err("item not found yet".to_string());
        }
        if item.reward_claimed {
            return Err("reward already claimed".to_string());
        }
        item.reward_claimed = true;
        log::info!("💰 Reward for item {} claimed by {}", item_id, from);
        Ok(())
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn str_arg(args: &[Value], index: usize, name: &str) -> Result<String, RpcFailure> {
    args.get(index)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            RpcFailure::invalid_params(format!("argument {} ('{}') must be a string", index, name))
        })
}

fn u64_arg(args: &[Value], index: usize, name: &str) -> Result<u64, RpcFailure> {
    args.get(index).and_then(Value::as_u64).ok_or_else(|| {
        RpcFailure::invalid_params(format!("argument {} ('{}') must be an integer", index, name))
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, RpcFailure> {
    serde_json::to_value(value).map_err(|e| RpcFailure::execution(e.to_string()))
}
