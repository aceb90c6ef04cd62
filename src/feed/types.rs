use crate::errors::TrackerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Which feed a channel listens to.
///
/// Both kinds subscribe on the wallet address; a program channel only keeps
/// the wallet's transactions that invoke its program, so it never sees the
/// program's network-wide traffic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Every transaction that mentions the wallet itself
    AccountChange,
    /// The wallet's transactions that invoke one on-chain program
    ProgramActivity(String),
}

impl ChannelKind {
    pub fn program_id(&self) -> Option<&str> {
        match self {
            ChannelKind::AccountChange => None,
            ChannelKind::ProgramActivity(program_id) => Some(program_id),
        }
    }

    /// Short name used in logs and error notifications
    pub fn label(&self) -> String {
        match self {
            ChannelKind::AccountChange => "account".to_string(),
            ChannelKind::ProgramActivity(program_id) => {
                format!("program {}", program_id.chars().take(8).collect::<String>())
            }
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Bare event reference pushed by a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    pub signature: String,
    /// Involved accounts, when the feed provides them
    pub accounts: Option<Vec<String>>,
    /// Program log lines (`logsNotification` always carries them)
    pub logs: Option<Vec<String>>,
    pub failed: bool,
}

impl FeedEvent {
    pub fn new(signature: &str) -> Self {
        Self {
            signature: signature.to_string(),
            accounts: None,
            logs: None,
            failed: false,
        }
    }

    pub fn with_accounts(signature: &str, accounts: &[&str]) -> Self {
        Self {
            signature: signature.to_string(),
            accounts: Some(accounts.iter().map(|a| a.to_string()).collect()),
            logs: None,
            failed: false,
        }
    }

    pub fn with_logs(signature: &str, logs: &[&str]) -> Self {
        Self {
            signature: signature.to_string(),
            accounts: None,
            logs: Some(logs.iter().map(|l| l.to_string()).collect()),
            failed: false,
        }
    }

    /// Whether the logs show `program_id` being invoked (at any depth)
    pub fn invokes_program(&self, program_id: &str) -> bool {
        let prefix = format!("Program {} invoke", program_id);
        self.logs
            .iter()
            .flatten()
            .any(|line| line.starts_with(&prefix))
    }

    /// Whether a program channel should resolve this event.
    ///
    /// An account list, when present, must contain the wallet. The program
    /// must show up in the logs, or in the account list when the feed sends
    /// no logs.
    pub fn concerns_program(&self, wallet_address: &str, program_id: &str) -> bool {
        let lists = |address: &str| {
            self.accounts
                .as_ref()
                .map(|accounts| accounts.iter().any(|account| account == address))
        };

        if lists(wallet_address) == Some(false) {
            return false;
        }
        match self.logs {
            Some(_) => self.invokes_program(program_id),
            None => lists(program_id).unwrap_or(false),
        }
    }
}

/// Feed-assigned subscription id (opaque to callers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub u64);

impl std::fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live subscription. The stream ending (`recv()` returning `None`) means
/// the feed dropped the connection.
#[derive(Debug)]
pub struct FeedSubscription {
    pub handle: SubscriptionHandle,
    pub events: mpsc::Receiver<FeedEvent>,
}

/// Push feed of bare event references
#[async_trait]
pub trait EventFeed: Send + Sync {
    async fn subscribe(
        &self,
        kind: &ChannelKind,
        wallet_address: &str,
    ) -> Result<FeedSubscription, TrackerError>;

    /// Release a subscription; resolves once the feed acknowledged it.
    /// Unknown or already-closed handles are not an error.
    async fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), TrackerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "Wallet1111";
    const PROGRAM: &str = "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4";

    #[test]
    fn test_program_invocation_from_logs() {
        let invoke = format!("Program {} invoke [2]", PROGRAM);
        let success = format!("Program {} success", PROGRAM);
        let event = FeedEvent::with_logs(
            "sig",
            &[
                "Program ComputeBudget111111111111111111111111111111 invoke [1]",
                invoke.as_str(),
                success.as_str(),
            ],
        );
        assert!(event.invokes_program(PROGRAM));
        assert!(event.concerns_program(WALLET, PROGRAM));
        assert!(!event.concerns_program(WALLET, "whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc"));
    }

    #[test]
    fn test_program_mentioned_only_in_log_text_does_not_count() {
        let line = format!("Program log: routed via {}", PROGRAM);
        let event = FeedEvent::with_logs("sig", &[line.as_str()]);
        assert!(!event.concerns_program(WALLET, PROGRAM));
    }

    #[test]
    fn test_account_list_decides_without_logs() {
        assert!(FeedEvent::with_accounts("sig", &[WALLET, PROGRAM]).concerns_program(WALLET, PROGRAM));
        assert!(!FeedEvent::with_accounts("sig", &["Other111", PROGRAM]).concerns_program(WALLET, PROGRAM));
        assert!(!FeedEvent::with_accounts("sig", &[WALLET]).concerns_program(WALLET, PROGRAM));
        assert!(!FeedEvent::new("sig").concerns_program(WALLET, PROGRAM));
    }

    #[test]
    fn test_channel_labels() {
        assert_eq!(ChannelKind::AccountChange.label(), "account");
        let kind = ChannelKind::ProgramActivity(PROGRAM.to_string());
        assert_eq!(kind.label(), "program JUP6LkbZ");
        assert_eq!(kind.program_id(), Some(PROGRAM));
        assert_eq!(ChannelKind::AccountChange.program_id(), None);
    }
}
