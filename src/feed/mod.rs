//! Event feeds
//!
//! A feed pushes bare event references (signatures) for one channel. The
//! tracker only sees the [`EventFeed`] trait; [`SolanaWsFeed`] implements it
//! over the Solana websocket `logsSubscribe` API.

pub mod types;
pub mod websocket;

pub use types::{ChannelKind, EventFeed, FeedEvent, FeedSubscription, SubscriptionHandle};
pub use websocket::{parse_feed_message, FeedMessage, SolanaWsFeed};
