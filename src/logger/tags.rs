/// Subsystem tags attached to every log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Registry,
    Monitor,
    Channel,
    Feed,
    Resolver,
    Classifier,
    Notifier,
    /// Records forwarded from third-party crates through the `log` facade
    External,
}

impl LogTag {
    pub const ALL: [LogTag; 10] = [
        LogTag::System,
        LogTag::Config,
        LogTag::Registry,
        LogTag::Monitor,
        LogTag::Channel,
        LogTag::Feed,
        LogTag::Resolver,
        LogTag::Classifier,
        LogTag::Notifier,
        LogTag::External,
    ];

    /// Name used in `--debug-<name>` flags
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Config => "config",
            LogTag::Registry => "registry",
            LogTag::Monitor => "monitor",
            LogTag::Channel => "channel",
            LogTag::Feed => "feed",
            LogTag::Resolver => "resolver",
            LogTag::Classifier => "classifier",
            LogTag::Notifier => "notifier",
            LogTag::External => "external",
        }
    }

    pub fn from_debug_key(key: &str) -> Option<LogTag> {
        LogTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.to_debug_key() == key)
    }

    /// Uppercase label printed in the tag column
    pub fn to_plain_string(&self) -> String {
        self.to_debug_key().to_uppercase()
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
