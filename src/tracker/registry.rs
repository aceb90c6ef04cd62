//! Tracking registry: the authoritative map of wallet name -> tracked wallet
//!
//! This is the whole control surface a chat front-end may call. The map is
//! guarded by one lock that is held only while the map is read or updated;
//! monitor teardown happens outside of it.

use super::monitor::{spawn_monitor, MonitorHandle, ShutdownReport};
use super::types::{ConnectionState, MonitorContext, TrackedWallet, WalletId, WalletStatus};
use crate::classifier::CategoryFilter;
use crate::errors::TrackerError;
use crate::feed::ChannelKind;
use crate::logger::{self, LogTag};
use crate::notifications::{render_wallet_list, Destination};
use futures_util::future::join_all;
use parking_lot::Mutex;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

struct WalletEntry {
    wallet: TrackedWallet,
    filter_tx: watch::Sender<CategoryFilter>,
    /// Taken by `remove` when teardown starts
    monitor: Option<MonitorHandle>,
}

/// Outcome of `TrackingRegistry::remove`
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedWallet {
    /// Final snapshot, status `Stopped`
    pub wallet: TrackedWallet,
    pub teardown: ShutdownReport,
}

pub struct TrackingRegistry {
    wallets: Mutex<HashMap<String, WalletEntry>>,
    next_id: AtomicU64,
    ctx: Arc<MonitorContext>,
}

impl TrackingRegistry {
    pub fn new(ctx: Arc<MonitorContext>) -> Self {
        Self {
            wallets: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            ctx,
        }
    }

    /// Start tracking a wallet.
    ///
    /// Rejects an empty filter, an address that is not a valid public key and
    /// a name that is already tracked (including a wallet still stopping).
    pub fn add(
        &self,
        name: &str,
        address: &str,
        category_filter: CategoryFilter,
        destination: Destination,
    ) -> Result<WalletId, TrackerError> {
        if category_filter.is_empty() {
            return Err(TrackerError::EmptyFilter);
        }
        Pubkey::from_str(address).map_err(|_| TrackerError::InvalidAddress {
            address: address.to_string(),
        })?;

        let mut wallets = self.wallets.lock();
        if wallets.contains_key(name) {
            return Err(TrackerError::NameConflict {
                name: name.to_string(),
            });
        }

        let id = WalletId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (filter_tx, filter_rx) = watch::channel(category_filter.clone());
        let monitor = spawn_monitor(name, address, destination, filter_rx, Arc::clone(&self.ctx));

        wallets.insert(
            name.to_string(),
            WalletEntry {
                wallet: TrackedWallet {
                    id,
                    name: name.to_string(),
                    address: address.to_string(),
                    category_filter,
                    destination,
                    status: WalletStatus::Active,
                },
                filter_tx,
                monitor: Some(monitor),
            },
        );
        drop(wallets);

        logger::info(
            LogTag::Registry,
            &format!("Wallet {} added ({}), id {}", name, address, id.0),
        );
        Ok(id)
    }

    /// Stop tracking a wallet and wait for its channels to close
    pub async fn remove(&self, name: &str) -> Result<RemovedWallet, TrackerError> {
        let monitor = {
            let mut wallets = self.wallets.lock();
            let entry = wallets
                .get_mut(name)
                .filter(|entry| entry.wallet.status == WalletStatus::Active)
                .ok_or_else(|| TrackerError::WalletNotFound {
                    name: name.to_string(),
                })?;
            entry.wallet.status = WalletStatus::Stopping;
            entry.monitor.take()
        };

        logger::info(LogTag::Registry, &format!("Stopping wallet {}", name));

        let teardown = match monitor {
            Some(monitor) => monitor.shutdown(self.ctx.settings.teardown_timeout).await,
            None => ShutdownReport {
                closed_channels: 0,
                abandoned_channels: Vec::new(),
            },
        };

        let mut wallet = {
            let mut wallets = self.wallets.lock();
            wallets
                .remove(name)
                .map(|entry| entry.wallet)
                .ok_or_else(|| TrackerError::WalletNotFound {
                    name: name.to_string(),
                })?
        };
        wallet.status = WalletStatus::Stopped;

        logger::info(
            LogTag::Registry,
            &format!(
                "Wallet {} removed ({} channels closed, {} abandoned)",
                name,
                teardown.closed_channels,
                teardown.abandoned_channels.len()
            ),
        );
        Ok(RemovedWallet { wallet, teardown })
    }

    /// Point-in-time snapshot, ordered by registration
    pub fn list(&self) -> Vec<TrackedWallet> {
        let mut snapshot: Vec<TrackedWallet> = self
            .wallets
            .lock()
            .values()
            .map(|entry| entry.wallet.clone())
            .collect();
        snapshot.sort_by_key(|wallet| wallet.id);
        snapshot
    }

    /// Replace a wallet's filter; the next event the monitor handles sees it
    pub fn update_filter(&self, name: &str, category_filter: CategoryFilter) -> Result<(), TrackerError> {
        if category_filter.is_empty() {
            return Err(TrackerError::EmptyFilter);
        }

        let mut wallets = self.wallets.lock();
        let entry = wallets
            .get_mut(name)
            .filter(|entry| entry.wallet.status == WalletStatus::Active)
            .ok_or_else(|| TrackerError::WalletNotFound {
                name: name.to_string(),
            })?;

        entry.wallet.category_filter = category_filter.clone();
        entry.filter_tx.send_replace(category_filter);
        drop(wallets);

        logger::info(LogTag::Registry, &format!("Filter of {} updated", name));
        Ok(())
    }

    /// Wallet list text for the chat front-end
    pub fn render_list(&self) -> String {
        render_wallet_list(&self.list())
    }

    pub fn channel_states(&self, name: &str) -> Result<Vec<(ChannelKind, ConnectionState)>, TrackerError> {
        let wallets = self.wallets.lock();
        wallets
            .get(name)
            .and_then(|entry| entry.monitor.as_ref())
            .map(|monitor| monitor.channel_states())
            .ok_or_else(|| TrackerError::WalletNotFound {
                name: name.to_string(),
            })
    }

    /// Whether the wallet's dedup store already holds `signature`
    pub fn has_seen(&self, name: &str, signature: &str) -> Result<bool, TrackerError> {
        let wallets = self.wallets.lock();
        wallets
            .get(name)
            .and_then(|entry| entry.monitor.as_ref())
            .map(|monitor| monitor.has_seen(signature))
            .ok_or_else(|| TrackerError::WalletNotFound {
                name: name.to_string(),
            })
    }

    /// Remove every active wallet concurrently
    pub async fn shutdown_all(&self) -> Vec<RemovedWallet> {
        let names: Vec<String> = self
            .list()
            .into_iter()
            .filter(|wallet| wallet.status == WalletStatus::Active)
            .map(|wallet| wallet.name)
            .collect();

        join_all(names.iter().map(|name| self.remove(name)))
            .await
            .into_iter()
            .filter_map(Result::ok)
            .collect()
    }
}
