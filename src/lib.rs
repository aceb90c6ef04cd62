//! walletwatch - Solana wallet activity notifier
//!
//! Watches registered wallets over websocket feeds, resolves and classifies
//! every new transaction and sends at most one chat notification per
//! transaction and wallet when its category matches the wallet's filter.

pub mod arguments;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod errors;
pub mod feed;
pub mod logger;
pub mod notifications;
pub mod tracker;
pub mod transactions;
