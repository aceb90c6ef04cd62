//! Solana websocket feed (`logsSubscribe` / `logsUnsubscribe`)
//!
//! Every subscription mentions the wallet address, whatever its channel kind;
//! program channels narrow the stream down using the notification logs.
//! Every subscription owns its own websocket connection, so a stalled or
//! dropped connection only affects the channel that opened it. A reader task
//! per connection forwards `logsNotification` signatures, answers pings and
//! performs the unsubscribe handshake when asked.
use super::types::{ChannelKind, EventFeed, FeedEvent, FeedSubscription, SubscriptionHandle};
use crate::config::{MonitorConfig, RpcConfig};
use crate::errors::TrackerError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};

const SUBSCRIBE_REQUEST_ID: u64 = 1;
const UNSUBSCRIBE_REQUEST_ID: u64 = 2;

/// Decoded websocket text frame
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// `logsSubscribe` accepted; carries the server subscription id
    Subscribed { id: u64, subscription: u64 },
    /// `logsUnsubscribe` answered
    Unsubscribed { id: u64, ok: bool },
    Notification(FeedEvent),
    RequestError { id: Option<u64>, message: String },
    Other,
}

/// Parse one text frame from the Solana pubsub endpoint
pub fn parse_feed_message(text: &str) -> Result<FeedMessage, TrackerError> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    if value.get("method").and_then(|m| m.as_str()) == Some("logsNotification") {
        let result = value
            .pointer("/params/result/value")
            .ok_or_else(|| TrackerError::malformed("logsNotification without params.result.value"))?;

        let signature = result
            .get("signature")
            .and_then(|s| s.as_str())
            .ok_or_else(|| TrackerError::malformed("logsNotification without signature"))?;

        // Plain logsNotification carries no account list; enhanced providers add one
        let accounts = result
            .get("accounts")
            .or_else(|| result.get("accountKeys"))
            .and_then(|a| a.as_array())
            .map(|keys| {
                keys.iter()
                    .filter_map(|k| k.as_str().or_else(|| k.get("pubkey").and_then(|p| p.as_str())))
                    .map(str::to_string)
                    .collect()
            });

        let logs = result.get("logs").and_then(|l| l.as_array()).map(|lines| {
            lines
                .iter()
                .filter_map(|line| line.as_str())
                .map(str::to_string)
                .collect()
        });

        let failed = result.get("err").map(|e| !e.is_null()).unwrap_or(false);

        return Ok(FeedMessage::Notification(FeedEvent {
            signature: signature.to_string(),
            accounts,
            logs,
            failed,
        }));
    }

    let id = value.get("id").and_then(|i| i.as_u64());

    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Ok(FeedMessage::RequestError { id, message });
    }

    match (id, value.get("result")) {
        (Some(id), Some(result)) if result.is_u64() => Ok(FeedMessage::Subscribed {
            id,
            subscription: result.as_u64().unwrap_or_default(),
        }),
        (Some(id), Some(result)) if result.is_boolean() => Ok(FeedMessage::Unsubscribed {
            id,
            ok: result.as_bool().unwrap_or(false),
        }),
        _ => Ok(FeedMessage::Other),
    }
}

fn subscribe_request(target: &str, commitment: &str) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": SUBSCRIBE_REQUEST_ID,
        "method": "logsSubscribe",
        "params": [
            { "mentions": [target] },
            { "commitment": commitment }
        ]
    })
}

fn unsubscribe_request(server_subscription: u64) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": UNSUBSCRIBE_REQUEST_ID,
        "method": "logsUnsubscribe",
        "params": [server_subscription]
    })
}

async fn wait_for_subscribe_ack<S>(frames: &mut S) -> Result<u64, TrackerError>
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(frame) = frames.next().await {
        match frame? {
            Message::Text(text) => match parse_feed_message(&text)? {
                FeedMessage::Subscribed { id, subscription } if id == SUBSCRIBE_REQUEST_ID => {
                    return Ok(subscription);
                }
                FeedMessage::RequestError { message, .. } => {
                    return Err(TrackerError::transient("websocket", message));
                }
                _ => {}
            },
            Message::Close(_) => break,
            _ => {}
        }
    }
    Err(TrackerError::transient("websocket", "closed before subscribe ack"))
}

type AckSender = oneshot::Sender<Result<(), TrackerError>>;

pub struct SolanaWsFeed {
    ws_url: String,
    commitment: String,
    subscribe_timeout: Duration,
    event_buffer: usize,
    next_handle: AtomicU64,
    /// Unsubscribe request senders of live connections
    connections: Arc<Mutex<HashMap<SubscriptionHandle, mpsc::Sender<AckSender>>>>,
}

impl SolanaWsFeed {
    pub fn new(rpc: &RpcConfig, monitor: &MonitorConfig) -> Self {
        Self {
            ws_url: rpc.ws_url.clone(),
            commitment: rpc.commitment.clone(),
            subscribe_timeout: Duration::from_secs(rpc.subscribe_timeout_secs),
            event_buffer: monitor.event_buffer.max(1),
            next_handle: AtomicU64::new(1),
            connections: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn live_connections(&self) -> usize {
        self.connections.lock().len()
    }
}

#[async_trait]
impl EventFeed for SolanaWsFeed {
    async fn subscribe(
        &self,
        kind: &ChannelKind,
        wallet_address: &str,
    ) -> Result<FeedSubscription, TrackerError> {
        let (ws_stream, _) = timeout(self.subscribe_timeout, connect_async(self.ws_url.as_str()))
            .await
            .map_err(|_| TrackerError::transient("websocket", "connect timed out"))??;

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        ws_sender
            .send(Message::Text(subscribe_request(wallet_address, &self.commitment).to_string()))
            .await?;

        // Wait for the subscription id before handing the stream out
        let server_subscription = timeout(self.subscribe_timeout, wait_for_subscribe_ack(&mut ws_receiver))
            .await
            .map_err(|_| TrackerError::transient("websocket", "subscribe ack timed out"))??;

        let handle = SubscriptionHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let (events_tx, events_rx) = mpsc::channel(self.event_buffer);
        let (unsubscribe_tx, mut unsubscribe_rx) = mpsc::channel::<AckSender>(1);
        self.connections.lock().insert(handle, unsubscribe_tx);

        logger::debug(
            LogTag::Feed,
            &format!(
                "logsSubscribe {} for {} -> server id {} (handle {})",
                kind, wallet_address, server_subscription, handle
            ),
        );

        let connections = Arc::clone(&self.connections);
        tokio::spawn(async move {
            let mut pending_ack: Option<AckSender> = None;

            loop {
                tokio::select! {
                    request = unsubscribe_rx.recv(), if pending_ack.is_none() => {
                        let Some(ack) = request else { break };
                        let text = unsubscribe_request(server_subscription).to_string();
                        if let Err(e) = ws_sender.send(Message::Text(text)).await {
                            let _ = ack.send(Err(e.into()));
                            break;
                        }
                        pending_ack = Some(ack);
                    }
                    frame = ws_receiver.next() => {
                        match frame {
                            Some(Ok(Message::Text(text))) => match parse_feed_message(&text) {
                                Ok(FeedMessage::Notification(event)) => {
                                    if pending_ack.is_some() {
                                        continue;
                                    }
                                    if events_tx.send(event).await.is_err() {
                                        // Subscriber went away without unsubscribing
                                        break;
                                    }
                                }
                                Ok(FeedMessage::Unsubscribed { id, ok }) if id == UNSUBSCRIBE_REQUEST_ID => {
                                    if let Some(ack) = pending_ack.take() {
                                        let result = if ok {
                                            Ok(())
                                        } else {
                                            Err(TrackerError::transient("websocket", "logsUnsubscribe rejected"))
                                        };
                                        let _ = ack.send(result);
                                    }
                                    break;
                                }
                                Ok(FeedMessage::RequestError { message, .. }) => {
                                    logger::warning(LogTag::Feed, &format!("Feed error on {}: {}", handle, message));
                                }
                                Ok(_) => {}
                                Err(e) => {
                                    logger::warning(LogTag::Feed, &format!("Dropping frame on {}: {}", handle, e));
                                }
                            },
                            Some(Ok(Message::Ping(data))) => {
                                if ws_sender.send(Message::Pong(data)).await.is_err() {
                                    break;
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                logger::debug(LogTag::Feed, &format!("Connection {} closed by server", handle));
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                logger::debug(LogTag::Feed, &format!("Connection {} failed: {}", handle, e));
                                break;
                            }
                        }
                    }
                }
            }

            if let Some(ack) = pending_ack.take() {
                // Connection is gone either way; the server drops its subscriptions with it
                let _ = ack.send(Ok(()));
            }
            let _ = ws_sender.close().await;
            connections.lock().remove(&handle);
        });

        Ok(FeedSubscription {
            handle,
            events: events_rx,
        })
    }

    async fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), TrackerError> {
        let request_tx = self.connections.lock().remove(&handle);
        let Some(request_tx) = request_tx else {
            return Ok(());
        };

        let (ack_tx, ack_rx) = oneshot::channel();
        if request_tx.send(ack_tx).await.is_err() {
            // Reader already finished
            return Ok(());
        }
        ack_rx.await.unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_logs_notification() {
        let text = r#"{
            "jsonrpc": "2.0",
            "method": "logsNotification",
            "params": {
                "result": {
                    "context": { "slot": 5208469 },
                    "value": {
                        "signature": "5h6xBEauJ3PK6SWCZ1PGjBvj8vDdWG3KpwATGy1ARAXFSDwt8GFXM7W5Ncn16wmqokgpiKRLuS83KUxyZyv2sUYv",
                        "err": null,
                        "logs": ["Program 11111111111111111111111111111111 invoke [1]"]
                    }
                },
                "subscription": 24040
            }
        }"#;

        match parse_feed_message(text).unwrap() {
            FeedMessage::Notification(event) => {
                assert!(event.signature.starts_with("5h6xBEau"));
                assert_eq!(event.accounts, None);
                assert!(event.invokes_program("11111111111111111111111111111111"));
                assert!(!event.failed);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_parse_notification_with_accounts_and_error() {
        let text = r#"{
            "jsonrpc": "2.0",
            "method": "logsNotification",
            "params": {
                "result": {
                    "value": {
                        "signature": "abc",
                        "err": { "InstructionError": [0, { "Custom": 1 }] },
                        "accounts": ["A", { "pubkey": "B" }]
                    }
                },
                "subscription": 1
            }
        }"#;

        let FeedMessage::Notification(event) = parse_feed_message(text).unwrap() else {
            panic!("expected notification");
        };
        assert!(event.failed);
        assert_eq!(event.accounts, Some(vec!["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn test_parse_acks_and_errors() {
        assert_eq!(
            parse_feed_message(r#"{"jsonrpc":"2.0","result":23784,"id":1}"#).unwrap(),
            FeedMessage::Subscribed {
                id: 1,
                subscription: 23784
            }
        );
        assert_eq!(
            parse_feed_message(r#"{"jsonrpc":"2.0","result":true,"id":2}"#).unwrap(),
            FeedMessage::Unsubscribed { id: 2, ok: true }
        );
        assert_eq!(
            parse_feed_message(
                r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid params"},"id":1}"#
            )
            .unwrap(),
            FeedMessage::RequestError {
                id: Some(1),
                message: "Invalid params".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_feed_message("not json"),
            Err(TrackerError::MalformedEvent { .. })
        ));
        assert!(matches!(
            parse_feed_message(r#"{"method":"logsNotification","params":{"result":{"value":{}}}}"#),
            Err(TrackerError::MalformedEvent { .. })
        ));
        assert_eq!(parse_feed_message(r#"{"jsonrpc":"2.0"}"#).unwrap(), FeedMessage::Other);
    }

    #[test]
    fn test_subscribe_request_mentions_wallet() {
        let request = subscribe_request("Wallet111", "confirmed");
        assert_eq!(request["method"], "logsSubscribe");
        assert_eq!(request["params"][0]["mentions"][0], "Wallet111");
        assert_eq!(request["params"][0]["mentions"].as_array().map(Vec::len), Some(1));
        assert_eq!(request["params"][1]["commitment"], "confirmed");
        assert_eq!(unsubscribe_request(42)["params"][0], 42);
    }

    #[tokio::test]
    async fn test_unsubscribe_unknown_handle_is_ok() {
        let feed = SolanaWsFeed::new(&RpcConfig::default(), &MonitorConfig::default());
        assert!(feed.unsubscribe(SubscriptionHandle(99)).await.is_ok());
        assert_eq!(feed.live_connections(), 0);
    }
}
