/// Configuration schemas - every section defined once with its defaults
use crate::config_struct;
use crate::constants::{
    DEFAULT_RPC_HTTP_URL, DEFAULT_RPC_WS_URL, JUPITER_V6_PROGRAM_ID, ORCA_WHIRLPOOL_PROGRAM_ID,
    PUMP_FUN_PROGRAM_ID, RAYDIUM_AMM_V4_PROGRAM_ID,
};
use std::collections::BTreeMap;

// ============================================================================
// RPC
// ============================================================================

config_struct! {
    /// Solana endpoints used by the feed and the resolver
    pub struct RpcConfig {
        /// JSON-RPC endpoint for getTransaction
        http_url: String = DEFAULT_RPC_HTTP_URL.to_string(),
        /// Websocket endpoint for logsSubscribe
        ws_url: String = DEFAULT_RPC_WS_URL.to_string(),
        commitment: String = "confirmed".to_string(),
        request_timeout_secs: u64 = 10,
        /// Seconds to wait for a subscribe acknowledgement
        subscribe_timeout_secs: u64 = 10,
    }
}

// ============================================================================
// MONITOR
// ============================================================================

config_struct! {
    /// Per-wallet monitoring behaviour
    pub struct MonitorConfig {
        // Reconnect backoff (doubles from initial up to max)
        reconnect_initial_ms: u64 = 500,
        reconnect_max_secs: u64 = 30,

        // Teardown
        teardown_timeout_secs: u64 = 5,
        unsubscribe_grace_ms: u64 = 1500,

        // Resolution retries
        resolve_not_found_retries: u32 = 3,
        resolve_not_found_delay_ms: u64 = 1500,
        resolve_transient_retries: u32 = 3,

        /// Queue depth between a feed connection and its channel task
        event_buffer: usize = 256,
        /// Signatures remembered per wallet before the oldest are evicted
        dedup_capacity: usize = 50_000,

        /// One program-activity channel per entry
        watched_programs: Vec<String> = vec![
            JUPITER_V6_PROGRAM_ID.to_string(),
            RAYDIUM_AMM_V4_PROGRAM_ID.to_string(),
            PUMP_FUN_PROGRAM_ID.to_string(),
            ORCA_WHIRLPOOL_PROGRAM_ID.to_string(),
        ],
    }
}

// ============================================================================
// CLASSIFIER PROGRAM TABLE
// ============================================================================

config_struct! {
    /// One program-table entry. Either `category` (every instruction of the
    /// program) or `instructions` (parsed instruction type -> category) is set.
    pub struct ProgramConfig {
        program_id: String = String::new(),
        label: String = String::new(),
        category: String = String::new(),
        instructions: BTreeMap<String, String> = BTreeMap::new(),
    }
}

// ============================================================================
// TELEGRAM
// ============================================================================

config_struct! {
    /// Telegram delivery
    pub struct TelegramConfig {
        enabled: bool = false,
        /// Token from @BotFather
        bot_token: String = String::new(),
        /// Chat used for wallets registered without an explicit chat
        default_chat_id: i64 = 0,
    }
}

// ============================================================================
// PRICE
// ============================================================================

config_struct! {
    /// Fixed-price oracle settings
    pub struct PriceConfig {
        /// USD per SOL; 0 disables USD amounts in notifications
        native_usd: f64 = 0.0,
    }
}

// ============================================================================
// LOGGING
// ============================================================================

config_struct! {
    pub struct LoggingConfig {
        /// Append-only plain log file; empty = console only
        file_path: String = String::new(),
    }
}

// ============================================================================
// STARTUP WALLETS
// ============================================================================

config_struct! {
    /// Wallet registered when the process starts
    pub struct WalletConfig {
        name: String = String::new(),
        address: String = String::new(),
        categories: Vec<String> = Vec::new(),
        /// 0 = telegram.default_chat_id
        chat_id: i64 = 0,
    }
}

// ============================================================================
// MAIN CONFIG
// ============================================================================

config_struct! {
    pub struct Config {
        rpc: RpcConfig = RpcConfig::default(),
        monitor: MonitorConfig = MonitorConfig::default(),
        /// Empty = built-in program table
        programs: Vec<ProgramConfig> = Vec::new(),
        telegram: TelegramConfig = TelegramConfig::default(),
        price: PriceConfig = PriceConfig::default(),
        logging: LoggingConfig = LoggingConfig::default(),
        wallets: Vec<WalletConfig> = Vec::new(),
    }
}
