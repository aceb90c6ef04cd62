//! Wallet monitor: the channel set of one wallet plus its notification pipeline
//!
//! Every channel forwards classified events into one queue. The monitor task
//! drains it in arrival order and applies, per event:
//! duplicate check -> record signature -> filter -> render -> notify.
//! A signature is recorded even when the filter rejects it, so the first
//! channel to report a signature decides its category.

use super::channel::{ChannelHandle, ChannelSubscription, PipelineMessage};
use super::dedup::DedupStore;
use super::types::{ClassifiedEvent, ConnectionState, MonitorContext};
use crate::classifier::{Category, CategoryFilter};
use crate::feed::ChannelKind;
use crate::logger::{self, LogTag};
use crate::notifications::{dispatch, render_activity, render_channel_error, Destination};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    Duplicate,
    Filtered,
    Notify,
}

/// Result of tearing a monitor down
#[derive(Debug, Clone, PartialEq)]
pub struct ShutdownReport {
    pub closed_channels: usize,
    /// Channels that did not close within the teardown timeout
    pub abandoned_channels: Vec<ChannelKind>,
}

struct WalletMonitor {
    wallet_name: String,
    destination: Destination,
    filter: watch::Receiver<CategoryFilter>,
    dedup: Arc<Mutex<DedupStore>>,
    ctx: Arc<MonitorContext>,
}

impl WalletMonitor {
    /// Dedup and filter step; records the signature unless it is a duplicate
    fn admit(&self, signature: &str, category: Category) -> Admission {
        if !self.dedup.lock().insert(signature) {
            return Admission::Duplicate;
        }
        // One filter snapshot per event
        if self.filter.borrow().contains(&category) {
            Admission::Notify
        } else {
            Admission::Filtered
        }
    }

    async fn run(self, mut pipeline: mpsc::Receiver<PipelineMessage>) {
        while let Some(message) = pipeline.recv().await {
            match message {
                PipelineMessage::Event(event) => self.handle_event(event).await,
                PipelineMessage::ChannelError { channel, message } => {
                    let text = render_channel_error(&self.wallet_name, &channel.label(), &message);
                    dispatch(self.ctx.notifier.as_ref(), self.destination, &text).await;
                }
            }
        }
        logger::debug(
            LogTag::Monitor,
            &format!("{} pipeline finished", self.wallet_name),
        );
    }

    async fn handle_event(&self, event: ClassifiedEvent) {
        match self.admit(&event.signature, event.category) {
            Admission::Duplicate => {
                logger::verbose(
                    LogTag::Monitor,
                    &format!("{} duplicate {} from [{}]", self.wallet_name, event.signature, event.channel),
                );
            }
            Admission::Filtered => {
                logger::debug(
                    LogTag::Monitor,
                    &format!(
                        "{} {} is {}, not in filter",
                        self.wallet_name, event.signature, event.category
                    ),
                );
            }
            Admission::Notify => {
                // Price is display-only; a failed lookup just drops the USD amount
                let usd_price = self.ctx.oracle.native_usd_price().await.ok();
                let text = render_activity(&self.wallet_name, event.category, &event.detail, usd_price);
                if dispatch(self.ctx.notifier.as_ref(), self.destination, &text).await {
                    logger::info(
                        LogTag::Monitor,
                        &format!("{} notified {} ({})", self.wallet_name, event.signature, event.category),
                    );
                }
            }
        }
    }
}

/// Owner-side handle of a running wallet monitor
pub struct MonitorHandle {
    wallet_name: String,
    cancel: CancellationToken,
    channels: Vec<ChannelHandle>,
    pipeline_task: JoinHandle<()>,
    dedup: Arc<Mutex<DedupStore>>,
}

/// Start the channel tasks and the pipeline task of one wallet
pub fn spawn_monitor(
    wallet_name: &str,
    wallet_address: &str,
    destination: Destination,
    filter: watch::Receiver<CategoryFilter>,
    ctx: Arc<MonitorContext>,
) -> MonitorHandle {
    let cancel = CancellationToken::new();
    let dedup = Arc::new(Mutex::new(DedupStore::new(ctx.settings.dedup_capacity)));
    let (pipeline_tx, pipeline_rx) = mpsc::channel(ctx.settings.event_buffer);

    let channels = ctx
        .settings
        .channel_kinds()
        .into_iter()
        .map(|kind| {
            ChannelSubscription::spawn(
                wallet_name,
                wallet_address,
                kind,
                Arc::clone(&ctx),
                pipeline_tx.clone(),
                cancel.child_token(),
            )
        })
        .collect::<Vec<_>>();

    logger::info(
        LogTag::Monitor,
        &format!("{} monitoring {} on {} channels", wallet_name, wallet_address, channels.len()),
    );

    let monitor = WalletMonitor {
        wallet_name: wallet_name.to_string(),
        destination,
        filter,
        dedup: Arc::clone(&dedup),
        ctx,
    };
    // The pipeline ends once every channel dropped its sender
    drop(pipeline_tx);
    let pipeline_task = tokio::spawn(monitor.run(pipeline_rx));

    MonitorHandle {
        wallet_name: wallet_name.to_string(),
        cancel,
        channels,
        pipeline_task,
        dedup,
    }
}

impl MonitorHandle {
    pub fn channel_states(&self) -> Vec<(ChannelKind, ConnectionState)> {
        self.channels
            .iter()
            .map(|channel| (channel.kind.clone(), *channel.state.borrow()))
            .collect()
    }

    pub fn has_seen(&self, signature: &str) -> bool {
        self.dedup.lock().contains(signature)
    }

    /// Cancel every channel and wait up to `limit` for them to close.
    /// Channels still running at the deadline are aborted and reported.
    pub async fn shutdown(self, limit: Duration) -> ShutdownReport {
        self.cancel.cancel();
        let started = Instant::now();
        // An unrepresentable deadline means no deadline
        let remaining = move || match started.checked_add(limit) {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => limit,
        };

        let mut closed_channels = 0;
        let mut abandoned_channels = Vec::new();

        for mut channel in self.channels {
            match timeout(remaining(), &mut channel.task).await {
                Ok(_) => closed_channels += 1,
                Err(_) => {
                    channel.task.abort();
                    logger::warning(
                        LogTag::Monitor,
                        &format!(
                            "{} [{}] did not close within {:?}, abandoned",
                            self.wallet_name, channel.kind, limit
                        ),
                    );
                    abandoned_channels.push(channel.kind);
                }
            }
        }

        let mut pipeline_task = self.pipeline_task;
        if timeout(remaining(), &mut pipeline_task).await.is_err() {
            pipeline_task.abort();
            logger::warning(
                LogTag::Monitor,
                &format!("{} pipeline did not drain within {:?}", self.wallet_name, limit),
            );
        }

        ShutdownReport {
            closed_channels,
            abandoned_channels,
        }
    }
}
