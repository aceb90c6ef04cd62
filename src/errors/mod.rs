/// Error taxonomy for the wallet tracking engine
///
/// Control-surface failures (`NameConflict`, `WalletNotFound`, `EmptyFilter`,
/// `InvalidAddress`, `UnknownCategory`) are returned to the caller as rejected
/// operations. Pipeline failures (`EventNotFound`, `TransientFault`,
/// `MalformedEvent`) are handled inside the channel task that hit them.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("Wallet name already tracked: {name}")]
    NameConflict { name: String },

    #[error("Wallet not tracked: {name}")]
    WalletNotFound { name: String },

    #[error("Transaction not found yet: {signature}")]
    EventNotFound { signature: String },

    #[error("Category filter must contain at least one category")]
    EmptyFilter,

    #[error("Unknown category: {tag}")]
    UnknownCategory { tag: String },

    #[error("Invalid wallet address: {address}")]
    InvalidAddress { address: String },

    #[error("{source_name} unavailable: {message}")]
    TransientFault { source_name: String, message: String },

    #[error("Malformed event: {message}")]
    MalformedEvent { message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TrackerError {
    pub fn transient(source_name: &str, message: impl Into<String>) -> Self {
        TrackerError::TransientFault {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        TrackerError::MalformedEvent {
            message: message.into(),
        }
    }

    /// Errors the pipeline may retry instead of dropping the event
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TrackerError::TransientFault { .. } | TrackerError::EventNotFound { .. }
        )
    }
}

impl From<reqwest::Error> for TrackerError {
    fn from(e: reqwest::Error) -> Self {
        TrackerError::transient("rpc", e.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(e: serde_json::Error) -> Self {
        TrackerError::malformed(e.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for TrackerError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        TrackerError::transient("websocket", e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classes() {
        assert!(TrackerError::transient("rpc", "timeout").is_recoverable());
        assert!(TrackerError::EventNotFound {
            signature: "abc".to_string()
        }
        .is_recoverable());
        assert!(!TrackerError::malformed("bad json").is_recoverable());
        assert!(!TrackerError::EmptyFilter.is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = TrackerError::NameConflict {
            name: "w1".to_string(),
        };
        assert_eq!(err.to_string(), "Wallet name already tracked: w1");

        let err = TrackerError::transient("websocket", "connection reset");
        assert_eq!(err.to_string(), "websocket unavailable: connection reset");
    }
}
