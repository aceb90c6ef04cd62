use crate::classifier::{Category, CategoryFilter, ProgramTable};
use crate::config::MonitorConfig;
use crate::feed::{ChannelKind, EventFeed};
use crate::notifications::{Destination, Notifier, PriceOracle};
use crate::transactions::{TransactionDetail, TransactionResolver};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Id assigned to a wallet when it is added to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WalletId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletStatus {
    Active,
    Stopping,
    Stopped,
}

/// Snapshot of one tracked wallet as returned by `TrackingRegistry::list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedWallet {
    pub id: WalletId,
    pub name: String,
    pub address: String,
    pub category_filter: CategoryFilter,
    pub destination: Destination,
    pub status: WalletStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Active,
    Degraded,
    Closed,
}

/// Resolved and classified event handed from a channel to its wallet monitor
#[derive(Debug, Clone)]
pub struct ClassifiedEvent {
    pub signature: String,
    pub channel: ChannelKind,
    pub category: Category,
    pub detail: TransactionDetail,
}

/// Timing and sizing of the monitoring pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    pub reconnect_initial: Duration,
    pub reconnect_max: Duration,
    pub teardown_timeout: Duration,
    pub unsubscribe_grace: Duration,
    pub not_found_retries: u32,
    pub not_found_delay: Duration,
    pub transient_retries: u32,
    pub event_buffer: usize,
    pub dedup_capacity: usize,
    pub watched_programs: Vec<String>,
}

impl MonitorSettings {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            reconnect_initial: Duration::from_millis(config.reconnect_initial_ms),
            reconnect_max: Duration::from_secs(config.reconnect_max_secs),
            teardown_timeout: Duration::from_secs(config.teardown_timeout_secs),
            unsubscribe_grace: Duration::from_millis(config.unsubscribe_grace_ms),
            not_found_retries: config.resolve_not_found_retries,
            not_found_delay: Duration::from_millis(config.resolve_not_found_delay_ms),
            transient_retries: config.resolve_transient_retries,
            event_buffer: config.event_buffer.max(1),
            dedup_capacity: config.dedup_capacity.max(1),
            watched_programs: config.watched_programs.clone(),
        }
    }

    /// One account channel followed by one channel per watched program
    pub fn channel_kinds(&self) -> Vec<ChannelKind> {
        std::iter::once(ChannelKind::AccountChange)
            .chain(
                self.watched_programs
                    .iter()
                    .map(|program| ChannelKind::ProgramActivity(program.clone())),
            )
            .collect()
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}

/// Collaborators shared by every monitor and channel task
pub struct MonitorContext {
    pub feed: Arc<dyn EventFeed>,
    pub resolver: Arc<dyn TransactionResolver>,
    pub notifier: Arc<dyn Notifier>,
    pub oracle: Arc<dyn PriceOracle>,
    pub programs: Arc<ProgramTable>,
    pub settings: MonitorSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_give_five_channels() {
        let settings = MonitorSettings::default();
        let kinds = settings.channel_kinds();
        assert_eq!(kinds.len(), 5);
        assert_eq!(kinds[0], ChannelKind::AccountChange);
        assert_eq!(settings.reconnect_max, Duration::from_secs(30));
        assert_eq!(settings.teardown_timeout, Duration::from_secs(5));
    }
}
