/// Configuration loading, validation and access helpers
use super::schemas::Config;
use crate::classifier::Category;
use once_cell::sync::OnceCell;
use std::str::FromStr;
use std::sync::RwLock;

/// Global configuration, set once by `load_config_from_path`
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

pub const CONFIG_FILE_PATH: &str = "data/config.toml";

/// Upper bound for `monitor.teardown_timeout_secs` (one hour)
pub const MAX_TEARDOWN_TIMEOUT_SECS: u64 = 3600;

/// Load, validate and install the global config. A missing file yields defaults.
pub fn load_config_from_path(path: &str) -> Result<(), String> {
    let config = if std::path::Path::new(path).exists() {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;
        parse_config_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path, e))?
    } else {
        eprintln!("Config file '{}' not found, using default values", path);
        Config::default()
    };

    validate_config(&config)?;

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(())
}

pub fn parse_config_str(contents: &str) -> Result<Config, String> {
    toml::from_str::<Config>(contents).map_err(|e| e.to_string())
}

/// Reject configurations the engine cannot run with
pub fn validate_config(config: &Config) -> Result<(), String> {
    let http = url::Url::parse(&config.rpc.http_url)
        .map_err(|e| format!("rpc.http_url '{}' is invalid: {}", config.rpc.http_url, e))?;
    if !matches!(http.scheme(), "http" | "https") {
        return Err(format!("rpc.http_url must be http(s), got '{}'", http.scheme()));
    }

    let ws = url::Url::parse(&config.rpc.ws_url)
        .map_err(|e| format!("rpc.ws_url '{}' is invalid: {}", config.rpc.ws_url, e))?;
    if !matches!(ws.scheme(), "ws" | "wss") {
        return Err(format!("rpc.ws_url must be ws(s), got '{}'", ws.scheme()));
    }

    let monitor = &config.monitor;
    if monitor.reconnect_initial_ms == 0 {
        return Err("monitor.reconnect_initial_ms must be greater than 0".to_string());
    }
    if monitor.reconnect_initial_ms > monitor.reconnect_max_secs.saturating_mul(1000) {
        return Err("monitor.reconnect_initial_ms exceeds monitor.reconnect_max_secs".to_string());
    }
    if monitor.teardown_timeout_secs == 0 || monitor.teardown_timeout_secs > MAX_TEARDOWN_TIMEOUT_SECS {
        return Err(format!(
            "monitor.teardown_timeout_secs must be between 1 and {}",
            MAX_TEARDOWN_TIMEOUT_SECS
        ));
    }
    if monitor.event_buffer == 0 || monitor.dedup_capacity == 0 {
        return Err("monitor.event_buffer and monitor.dedup_capacity must be positive".to_string());
    }

    for wallet in &config.wallets {
        if wallet.name.trim().is_empty() {
            return Err("wallets[].name must not be empty".to_string());
        }
        if wallet.categories.is_empty() {
            return Err(format!("wallet '{}' has no categories", wallet.name));
        }
        for tag in &wallet.categories {
            Category::from_str(tag)
                .map_err(|_| format!("wallet '{}' has unknown category '{}'", wallet.name, tag))?;
        }
        if wallet.chat_id == 0 && config.telegram.default_chat_id == 0 {
            return Err(format!(
                "wallet '{}' has no chat_id and telegram.default_chat_id is not set",
                wallet.name
            ));
        }
    }

    if config.telegram.enabled && config.telegram.bot_token.is_empty() {
        return Err("telegram.enabled requires telegram.bot_token".to_string());
    }

    Ok(())
}

/// Run `f` with read access to the config (defaults when not loaded yet)
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    match CONFIG.get() {
        Some(lock) => match lock.read() {
            Ok(config) => f(&config),
            Err(poisoned) => f(&poisoned.into_inner()),
        },
        None => f(&Config::default()),
    }
}

/// Owned copy, for holding across await points
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

pub fn save_config(path: Option<&str>) -> Result<(), String> {
    let path = path.unwrap_or(CONFIG_FILE_PATH);

    let config_str = with_config(|cfg| {
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))
    })?;

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }
    }

    std::fs::write(path, config_str)
        .map_err(|e| format!("Failed to write config file '{}': {}", path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.monitor.watched_programs.len(), 4);
        assert_eq!(config.monitor.reconnect_max_secs, 30);
        assert_eq!(config.monitor.teardown_timeout_secs, 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse_config_str(
            r#"
            [rpc]
            ws_url = "wss://example.invalid/ws"

            [monitor]
            teardown_timeout_secs = 3

            [[wallets]]
            name = "whale"
            address = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM"
            categories = ["swap", "transfer"]
            chat_id = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc.ws_url, "wss://example.invalid/ws");
        assert_eq!(config.rpc.http_url, crate::constants::DEFAULT_RPC_HTTP_URL);
        assert_eq!(config.monitor.teardown_timeout_secs, 3);
        assert_eq!(config.monitor.reconnect_initial_ms, 500);
        assert_eq!(config.wallets.len(), 1);
        assert_eq!(config.wallets[0].categories, vec!["swap", "transfer"]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_program_table_entries_parse() {
        let config = parse_config_str(
            r#"
            [[programs]]
            program_id = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
            label = "spl-token"
            instructions = { transfer = "transfer", approve = "approvals" }
            "#,
        )
        .unwrap();

        assert_eq!(config.programs.len(), 1);
        assert_eq!(config.programs[0].category, "");
        assert_eq!(
            config.programs[0].instructions.get("approve").map(String::as_str),
            Some("approvals")
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(parse_config_str("[monitor]\nreconect_max_secs = 5\n").is_err());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.rpc.ws_url = "https://not-a-websocket".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.wallets.push(crate::config::WalletConfig {
            name: "w1".to_string(),
            address: "addr".to_string(),
            categories: vec!["teleport".to_string()],
            chat_id: 1,
        });
        let err = validate_config(&config).unwrap_err();
        assert!(err.contains("unknown category"));

        let mut config = Config::default();
        config.wallets.push(crate::config::WalletConfig {
            name: "w1".to_string(),
            address: "addr".to_string(),
            categories: vec!["swap".to_string()],
            chat_id: 0,
        });
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.telegram.enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_teardown_timeout_is_bounded() {
        let mut config = Config::default();
        config.monitor.teardown_timeout_secs = MAX_TEARDOWN_TIMEOUT_SECS;
        assert!(validate_config(&config).is_ok());

        config.monitor.teardown_timeout_secs = u64::MAX;
        let err = validate_config(&config).unwrap_err();
        assert!(err.contains("teardown_timeout_secs"));
    }

    #[test]
    fn test_saved_config_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let path_str = path.to_str().unwrap();

        save_config(Some(path_str)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let reloaded = parse_config_str(&contents).unwrap();
        assert!(validate_config(&reloaded).is_ok());
        assert_eq!(reloaded.monitor.dedup_capacity, get_config_clone().monitor.dedup_capacity);
    }
}
