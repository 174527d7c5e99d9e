//! Action dispatch
//!
//! The three user actions that change chain state: report a lost item,
//! mark an item found, claim a reward. Every action runs the same
//! sequence: validate, submit through the write binding, await
//! confirmation, then refetch the affected repositories. Local caches
//! are never touched before confirmation, so a failed action leaves
//! exactly the state the user saw.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::binding::ContractBinding;
use crate::error::FindEarnError;
use crate::model::{Address, LostItem};

/// Explicit invalidate-and-refetch contract
///
/// After a confirmed write the dispatcher refreshes the affected
/// repositories through this trait instead of mutating their caches.
#[async_trait]
pub trait Refetch: Send + Sync {
    async fn refetch(&self) -> Result<(), FindEarnError>;
}

/// Form fields for reporting a lost item
#[derive(Clone, Debug)]
pub struct ReportForm {
    pub name: String,
    pub description: String,
    pub location: String,
    pub contact: String,
}

/// Form fields for reporting an item as found
#[derive(Clone, Debug)]
pub struct FoundReport {
    pub details: String,
    pub location: String,
    pub contact: String,
}

/// Dispatches signed user actions and keeps repositories fresh
pub struct ActionDispatcher {
    binding: Arc<ContractBinding>,
    items: Arc<dyn Refetch>,
    notifications: Arc<dyn Refetch>,
}

impl ActionDispatcher {
    /// Create a dispatcher over a write binding
    ///
    /// `items` and `notifications` are the repositories to refresh
    /// after confirmed writes.
    pub fn new(
        binding: Arc<ContractBinding>,
        items: Arc<dyn Refetch>,
        notifications: Arc<dyn Refetch>,
    ) -> Self {
        Self {
            binding,
            items,
            notifications,
        }
    }

    /// Report a lost item
    ///
    /// All four form fields are required. Resolves after the
    /// transaction confirms and the item list has been re-fetched.
    pub async fn report_lost(&self, form: ReportForm) -> Result<(), FindEarnError> {
        require("name", &form.name)?;
        require("description", &form.description)?;
        require("location", &form.location)?;
        require("contact", &form.contact)?;

        log::info!("📣 Reporting lost item '{}'", form.name);
        let pending = self
            .binding
            .send(
                "reportLostItem",
                vec![
                    json!(form.name),
                    json!(form.description),
                    json!(form.location),
                    json!(form.contact),
                ],
            )
            .await?;
        pending.confirmed().await?;

        self.items.refetch().await?;
        log::info!("   ✅ Lost item reported");
        Ok(())
    }

    /// Report the selected item as found
    ///
    /// `selected` is the item id carried over from the listing view;
    /// `None` fails validation before anything is submitted.
    pub async fn mark_found(
        &self,
        selected: Option<u64>,
        report: FoundReport,
    ) -> Result<(), FindEarnError> {
        let item_id = selected.ok_or_else(|| {
            log::warn!("❌ Found report submitted with no item selected");
            FindEarnError::Validation("no item selected".to_string())
        })?;
        require("details", &report.details)?;
        require("location", &report.location)?;
        require("contact", &report.contact)?;

        log::info!("🔎 Marking item {} as found", item_id);
        let pending = self
            .binding
            .send(
                "markItemAsFound",
                vec![
                    json!(item_id),
                    json!(report.details),
                    json!(report.location),
                    json!(report.contact),
                ],
            )
            .await?;
        pending.confirmed().await?;

        self.items.refetch().await?;
        log::info!("   ✅ Item {} marked as found", item_id);
        Ok(())
    }

    /// Claim the reward on a found item
    ///
    /// Gated by `is_claimable` before any submission; the contract
    /// re-checks the same conditions on chain and remains the
    /// authority. Refreshes both repositories, since reward state
    /// shows in the item list and in notification context.
    pub async fn claim_reward(&self, item: &LostItem) -> Result<(), FindEarnError> {
        if !is_claimable(item, self.binding.signer()) {
            log::warn!("❌ Reward for item {} is not claimable by this account", item.id);
            return Err(FindEarnError::Validation(format!(
                "reward for item {} is not claimable by this account",
                item.id
            )));
        }

        log::info!("💰 Claiming reward for item {}", item.id);
        let pending = self.binding.send("claimReward", vec![json!(item.id)]).await?;
        pending.confirmed().await?;

        self.items.refetch().await?;
        self.notifications.refetch().await?;
        log::info!("   ✅ Reward claimed for item {}", item.id);
        Ok(())
    }
}

/// Whether `account` may claim the reward on `item`
///
/// True only for the item's reporter, once the item is found and while
/// the reward is unclaimed; a disconnected account (`None`) can never
/// claim. Address comparison is case-insensitive. The contract
/// enforces the same conditions on chain; this predicate only gates
/// the client side.
pub fn is_claimable(item: &LostItem, account: Option<&Address>) -> bool {
    match account {
        Some(account) => item.is_found && !item.reward_claimed && &item.reporter == account,
        None => false,
    }
}

fn require(field: &str, value: &str) -> Result<(), FindEarnError> {
    if value.trim().is_empty() {
        log::warn!("❌ Required field '{}' is empty", field);
        return Err(FindEarnError::Validation(format!("'{}' is required", field)));
    }
    Ok(())
}
