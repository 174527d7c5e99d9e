//! Lost item repository
//!
//! Reads the on-chain item list newest-first and caches an immutable
//! snapshot. Listing is all-or-nothing: with a small bounded item
//! count, a partial list is worse than a visible failure the user can
//! retry.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::json;

use crate::binding::ContractBinding;
use crate::dispatch::Refetch;
use crate::error::FindEarnError;
use crate::model::LostItem;

/// Repository over the contract's item storage
///
/// Each successful `list_items` produces a fresh snapshot that
/// replaces the previous one; snapshots themselves are never mutated.
pub struct ItemRepository {
    binding: Arc<ContractBinding>,
    snapshot: RwLock<Arc<Vec<LostItem>>>,
}

impl ItemRepository {
    /// Create a repository over a read (or write) binding
    pub fn new(binding: Arc<ContractBinding>) -> Self {
        Self {
            binding,
            snapshot: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Fetch every reported item, newest first
    ///
    /// Reads the item count, then fetches ids from count down to 1, so
    /// the returned order is strictly descending by id. Any single
    /// fetch or decode failure fails the whole listing and leaves the
    /// previous snapshot in place.
    pub async fn list_items(&self) -> Result<Arc<Vec<LostItem>>, FindEarnError> {
        log::info!("🔍 Listing lost items");

        let result = self
            .binding
            .call("getItemCount", vec![])
            .await
            .map_err(|e| FindEarnError::read_failure("item count", e.to_string()))?;
        let count = result.as_u64().ok_or_else(|| {
            FindEarnError::InvalidResponse("getItemCount result is not an integer".to_string())
        })?;
        log::debug!("   {} item(s) on chain", count);

        let mut items = Vec::with_capacity(count as usize);
        for id in (1..=count).rev() {
            let record = self
                .binding
                .call("getLostItem", vec![json!(id)])
                .await
                .map_err(|e| FindEarnError::read_failure(format!("item {}", id), e.to_string()))?;
            items.push(LostItem::from_record(&record)?);
        }

        let snapshot = Arc::new(items);
        *self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&snapshot);

        log::info!("   ✅ Listed {} item(s)", snapshot.len());
        Ok(snapshot)
    }

    /// The most recently fetched snapshot (empty before the first fetch)
    pub fn current(&self) -> Arc<Vec<LostItem>> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(|e| e.into_inner()))
    }
}

#[async_trait]
impl Refetch for ItemRepository {
    async fn refetch(&self) -> Result<(), FindEarnError> {
        self.list_items().await.map(|_| ())
    }
}

/// Filter items by a search query
///
/// Case-insensitive substring match across name, description, and
/// location. The result preserves the input order; an empty query
/// returns the input unchanged.
pub fn filter_items(items: &[LostItem], query: &str) -> Vec<LostItem> {
    if query.is_empty() {
        return items.to_vec();
    }

    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle)
                || item.location.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, Amount};
    use chrono::DateTime;

    fn item(id: u64, name: &str, description: &str, location: &str) -> LostItem {
        let reporter: Address = "0x21300Fb85259788990BA1ECCB5E601263EFfafa8".parse().unwrap();
        LostItem {
            id,
            reporter,
            name: name.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            contact: "owner@example.com".to_string(),
            is_found: false,
            reward: Amount::from_wei(0),
            reward_claimed: false,
            reported_at: DateTime::from_timestamp(1_771_200_000, 0).unwrap(),
        }
    }

    fn sample_items() -> Vec<LostItem> {
        vec![
            item(3, "Black wallet", "Leather, holds ID cards", "Central station"),
            item(2, "Umbrella", "Red with white dots", "Bus stop 14"),
            item(1, "Keys", "Three keys on a WALLET chain", "Library"),
        ]
    }

    #[test]
    fn test_filter_empty_query_is_identity() {
        let items = sample_items();
        assert_eq!(filter_items(&items, ""), items);
    }

    #[test]
    fn test_filter_matches_each_searchable_field() {
        let items = sample_items();

        // name
        assert_eq!(filter_items(&items, "umbrella").len(), 1);
        // description
        assert_eq!(filter_items(&items, "leather")[0].id, 3);
        // location
        assert_eq!(filter_items(&items, "library")[0].id, 1);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let items = sample_items();
        let matched = filter_items(&items, "wAlLeT");
        // "Black wallet" by name and "Keys" by its description
        assert_eq!(matched.iter().map(|i| i.id).collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn test_filter_preserves_order_and_is_subset() {
        let items = sample_items();
        let matched = filter_items(&items, "a");

        let mut last_position = 0;
        for found in &matched {
            let position = items.iter().position(|i| i.id == found.id).unwrap();
            assert!(position >= last_position, "order not preserved");
            last_position = position;
            assert!(items.contains(found), "result is not a subset");
        }
    }

    #[test]
    fn test_filter_no_match_returns_empty() {
        let items = sample_items();
        assert!(filter_items(&items, "saxophone").is_empty());
    }
}
