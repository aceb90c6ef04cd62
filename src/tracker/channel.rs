//! One subscription of one wallet to one feed channel
//!
//! States: `Connecting -> Active -> {Degraded -> Active | Closed}`.
//! The task owns the subscription handle, resolves and classifies every event
//! it receives and forwards the result to the wallet monitor. Failures of the
//! feed or the resolver put the channel in `Degraded`; only the first failure
//! of an episode produces a user-visible error.

use super::backoff::Backoff;
use super::types::{ClassifiedEvent, ConnectionState, MonitorContext};
use crate::classifier::classify;
use crate::errors::TrackerError;
use crate::feed::{ChannelKind, FeedEvent, SubscriptionHandle};
use crate::logger::{self, LogTag};
use crate::transactions::TransactionDetail;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

/// Messages from channel tasks to their wallet monitor
#[derive(Debug)]
pub(crate) enum PipelineMessage {
    Event(ClassifiedEvent),
    /// First failure of an episode
    ChannelError { channel: ChannelKind, message: String },
}

/// Monitor-side view of a running channel task
pub(crate) struct ChannelHandle {
    pub kind: ChannelKind,
    pub state: watch::Receiver<ConnectionState>,
    pub task: JoinHandle<()>,
}

enum StreamEnd {
    Cancelled,
    Broken(String),
}

pub(crate) struct ChannelSubscription {
    wallet_name: String,
    wallet_address: String,
    kind: ChannelKind,
    handle: Option<SubscriptionHandle>,
    state: watch::Sender<ConnectionState>,
    last_error_episode_notified: bool,
    ctx: Arc<MonitorContext>,
    pipeline: mpsc::Sender<PipelineMessage>,
    cancel: CancellationToken,
}

impl ChannelSubscription {
    pub fn spawn(
        wallet_name: &str,
        wallet_address: &str,
        kind: ChannelKind,
        ctx: Arc<MonitorContext>,
        pipeline: mpsc::Sender<PipelineMessage>,
        cancel: CancellationToken,
    ) -> ChannelHandle {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);

        let channel = ChannelSubscription {
            wallet_name: wallet_name.to_string(),
            wallet_address: wallet_address.to_string(),
            kind: kind.clone(),
            handle: None,
            state: state_tx,
            last_error_episode_notified: false,
            ctx,
            pipeline,
            cancel,
        };

        ChannelHandle {
            kind,
            state: state_rx,
            task: tokio::spawn(channel.run()),
        }
    }

    fn current_state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            logger::debug(
                LogTag::Channel,
                &format!(
                    "{} [{}] {:?} -> {:?}",
                    self.wallet_name, self.kind, previous, state
                ),
            );
        }
    }

    async fn run(mut self) {
        let cancel = self.cancel.clone();
        let mut backoff = Backoff::new(
            self.ctx.settings.reconnect_initial,
            self.ctx.settings.reconnect_max,
        );

        loop {
            if self.current_state() != ConnectionState::Degraded {
                self.set_state(ConnectionState::Connecting);
            }

            let subscribed = tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.ctx.feed.subscribe(&self.kind, &self.wallet_address) => result,
            };

            match subscribed {
                Ok(subscription) => {
                    self.handle = Some(subscription.handle);
                    self.last_error_episode_notified = false;
                    self.set_state(ConnectionState::Active);
                    backoff.reset();

                    match self.consume(subscription.events).await {
                        StreamEnd::Cancelled => break,
                        StreamEnd::Broken(reason) => {
                            // Feed already dropped the subscription with the stream
                            self.handle = None;
                            self.enter_degraded(reason).await;
                        }
                    }
                }
                Err(e) => self.enter_degraded(e.to_string()).await,
            }

            let delay = backoff.next_delay();
            logger::debug(
                LogTag::Channel,
                &format!("{} [{}] reconnecting in {:?}", self.wallet_name, self.kind, delay),
            );
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(delay) => {}
            }
        }

        self.close().await;
    }

    async fn consume(&mut self, mut events: mpsc::Receiver<FeedEvent>) -> StreamEnd {
        let cancel = self.cancel.clone();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return StreamEnd::Cancelled,
                event = events.recv() => event,
            };

            let Some(event) = next else {
                return StreamEnd::Broken("event stream closed".to_string());
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return StreamEnd::Cancelled,
                _ = self.process(event) => {}
            }
        }
    }

    async fn process(&mut self, event: FeedEvent) {
        if let Some(program_id) = self.kind.program_id() {
            if !event.concerns_program(&self.wallet_address, program_id) {
                logger::verbose(
                    LogTag::Channel,
                    &format!("{} [{}] skipping unrelated {}", self.wallet_name, self.kind, event.signature),
                );
                return;
            }
        }

        match self.resolve_with_retries(&event.signature).await {
            Ok(mut detail) => {
                if self.current_state() == ConnectionState::Degraded {
                    self.last_error_episode_notified = false;
                    self.set_state(ConnectionState::Active);
                }

                if !detail.involves(&self.wallet_address) {
                    logger::verbose(
                        LogTag::Channel,
                        &format!(
                            "{} [{}] {} does not involve the wallet",
                            self.wallet_name, self.kind, event.signature
                        ),
                    );
                    return;
                }

                detail.set_primary_account(&self.wallet_address);
                let category = classify(&detail, &self.ctx.programs);
                logger::debug(
                    LogTag::Classifier,
                    &format!("{} [{}] {} -> {}", self.wallet_name, self.kind, event.signature, category),
                );

                let message = PipelineMessage::Event(ClassifiedEvent {
                    signature: event.signature,
                    channel: self.kind.clone(),
                    category,
                    detail,
                });
                if self.pipeline.send(message).await.is_err() {
                    logger::debug(
                        LogTag::Channel,
                        &format!("{} [{}] monitor pipeline closed", self.wallet_name, self.kind),
                    );
                }
            }
            Err(TrackerError::EventNotFound { signature }) => {
                logger::info(
                    LogTag::Resolver,
                    &format!("{} [{}] {} not found, skipping", self.wallet_name, self.kind, signature),
                );
            }
            Err(e) if e.is_recoverable() => {
                self.enter_degraded(e.to_string()).await;
            }
            Err(e) => {
                logger::warning(
                    LogTag::Channel,
                    &format!(
                        "{} [{}] dropping event {}: {}",
                        self.wallet_name, self.kind, event.signature, e
                    ),
                );
            }
        }
    }

    /// `EventNotFound` retries on a fixed delay, `TransientFault` with backoff
    async fn resolve_with_retries(&self, signature: &str) -> Result<TransactionDetail, TrackerError> {
        let settings = &self.ctx.settings;
        let mut backoff = Backoff::new(settings.reconnect_initial, settings.reconnect_max);
        let mut not_found_attempts = 0;
        let mut transient_attempts = 0;

        loop {
            match self.ctx.resolver.resolve(signature).await {
                Err(TrackerError::EventNotFound { .. }) if not_found_attempts < settings.not_found_retries => {
                    not_found_attempts += 1;
                    sleep(settings.not_found_delay).await;
                }
                Err(e @ TrackerError::TransientFault { .. }) if transient_attempts < settings.transient_retries => {
                    transient_attempts += 1;
                    let delay = backoff.next_delay();
                    logger::debug(
                        LogTag::Resolver,
                        &format!("{} failed ({}), retry {} in {:?}", signature, e, transient_attempts, delay),
                    );
                    sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn enter_degraded(&mut self, reason: String) {
        self.set_state(ConnectionState::Degraded);
        logger::warning(
            LogTag::Channel,
            &format!("{} [{}] degraded: {}", self.wallet_name, self.kind, reason),
        );

        if self.last_error_episode_notified {
            return;
        }
        self.last_error_episode_notified = true;

        let message = PipelineMessage::ChannelError {
            channel: self.kind.clone(),
            message: reason,
        };
        let cancel = self.cancel.clone();
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = self.pipeline.send(message) => {}
        }
    }

    async fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            match timeout(self.ctx.settings.unsubscribe_grace, self.ctx.feed.unsubscribe(handle)).await {
                Ok(Ok(())) => logger::debug(
                    LogTag::Channel,
                    &format!("{} [{}] unsubscribed {}", self.wallet_name, self.kind, handle),
                ),
                Ok(Err(e)) => logger::warning(
                    LogTag::Channel,
                    &format!("{} [{}] unsubscribe {} failed: {}", self.wallet_name, self.kind, handle, e),
                ),
                Err(_) => logger::warning(
                    LogTag::Channel,
                    &format!("{} [{}] unsubscribe {} timed out", self.wallet_name, self.kind, handle),
                ),
            }
        }
        self.set_state(ConnectionState::Closed);
    }
}
