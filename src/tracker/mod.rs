//! Wallet tracking engine
//!
//! ```text
//! TrackingRegistry ──add──▶ WalletMonitor ──▶ ChannelSubscription × (1 + watched programs)
//!                                 ▲                    │ subscribe / resolve / classify
//!                                 └──── pipeline ◀─────┘
//!                      dedup ─▶ filter ─▶ render ─▶ Notifier
//! ```
//!
//! Every channel runs in its own task, so a slow resolver or a broken feed
//! connection only stalls the channel that hit it.

pub mod backoff;
mod channel;
pub mod dedup;
pub mod monitor;
pub mod registry;
pub mod types;


pub use backoff::Backoff;
pub use dedup::DedupStore;
pub use monitor::{spawn_monitor, MonitorHandle, ShutdownReport};
pub use registry::{RemovedWallet, TrackingRegistry};
pub use types::{
    ClassifiedEvent, ConnectionState, MonitorContext, MonitorSettings, TrackedWallet, WalletId,
    WalletStatus,
};
