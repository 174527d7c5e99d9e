//! Notification center
//!
//! Account-bound view over the contract's notification storage: list,
//! unread count, mark-as-read, and a chain-event subscription that
//! tells the caller when a refetch is due. The cached snapshot is
//! never mutated locally; after any write the list is re-queried, so
//! the chain stays the single source of truth.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::binding::ContractBinding;
use crate::dispatch::Refetch;
use crate::error::FindEarnError;
use crate::model::{Address, Notification};
use crate::provider::ChainEvent;

/// Notification view for one account
///
/// The account is fixed at construction (the session account at the
/// time); reconnecting as someone else means constructing a new center.
pub struct NotificationCenter {
    binding: Arc<ContractBinding>,
    account: Address,
    snapshot: RwLock<Arc<Vec<Notification>>>,
}

impl NotificationCenter {
    /// Create a center for `account` over the given binding
    ///
    /// Listing works through a read binding; `mark_as_read` needs the
    /// binding to be in write mode.
    pub fn new(binding: Arc<ContractBinding>, account: Address) -> Self {
        Self {
            binding,
            account,
            snapshot: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Fetch all notifications for the bound account
    pub async fn list_notifications(&self) -> Result<Arc<Vec<Notification>>, FindEarnError> {
        log::info!("🔔 Listing notifications for {}", self.account);

        let result = self
            .binding
            .call("getUserNotifications", vec![json!(self.account.as_str())])
            .await
            .map_err(|e| FindEarnError::read_failure("notifications", e.to_string()))?;
        let raw = result.as_array().ok_or_else(|| {
            FindEarnError::InvalidResponse(
                "getUserNotifications result is not an array".to_string(),
            )
        })?;

        let mut notifications = Vec::with_capacity(raw.len());
        for record in raw {
            notifications.push(Notification::from_record(record)?);
        }

        let snapshot = Arc::new(notifications);
        *self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&snapshot);

        log::info!(
            "   ✅ {} notification(s), {} unread",
            snapshot.len(),
            snapshot.iter().filter(|n| !n.is_read).count()
        );
        Ok(snapshot)
    }

    /// The most recently fetched snapshot (empty before the first fetch)
    pub fn current(&self) -> Arc<Vec<Notification>> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Unread entries in the latest snapshot
    pub fn unread_count(&self) -> usize {
        self.current().iter().filter(|n| !n.is_read).count()
    }

    /// Mark one notification read and re-query the list
    ///
    /// The snapshot is not touched until the write confirms and the
    /// refetch returns; a failure leaves the cached list as it was.
    pub async fn mark_as_read(&self, notification_id: u64) -> Result<(), FindEarnError> {
        log::info!("📖 Marking notification {} as read", notification_id);

        let pending = self
            .binding
            .send("markNotificationAsRead", vec![json!(notification_id)])
            .await?;
        pending.confirmed().await?;

        self.list_notifications().await?;
        Ok(())
    }

    /// Invoke `on_change` for every chain event targeting this account
    ///
    /// Covers both event kinds: an item-found event targeting the
    /// account's finder address and a notification-created event
    /// targeting it as receiver. Address comparison is
    /// case-insensitive. The listener runs until the returned
    /// `Subscription` is unsubscribed or dropped.
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(ChainEvent) + Send + 'static,
    {
        let mut events = self.binding.events();
        let account = self.account.clone();
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        log::debug!("🔔 Subscribing to chain events for {}", account);
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        log::debug!("🔕 Notification listener stopped");
                        break;
                    }
                    received = events.recv() => match received {
                        Ok(event) => {
                            if event.target() == &account {
                                log::debug!("🔔 {} targets {}", event.name(), account);
                                on_change(event);
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(missed)) => {
                            log::warn!("🔔 Listener lagged, {} event(s) skipped", missed);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            log::debug!("🔕 Event channel closed");
                            break;
                        }
                    },
                }
            }
        });

        Subscription {
            shutdown_tx,
            handle,
        }
    }
}

#[async_trait]
impl Refetch for NotificationCenter {
    async fn refetch(&self) -> Result<(), FindEarnError> {
        self.list_notifications().await.map(|_| ())
    }
}

/// Handle to an active event listener
///
/// Dropping it stops the listener; `unsubscribe` additionally waits
/// for the listener task to finish, after which no callback will run.
pub struct Subscription {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Stop the listener and wait for it to exit
    pub async fn unsubscribe(mut self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = (&mut self.handle).await;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
