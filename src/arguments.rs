/// Command-line argument access for walletwatch
///
/// Arguments are captured once into `CMD_ARGS` so every module (logger,
/// config loader, binary) reads the same view. Tests override them with
/// `set_cmd_args`.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Replace the captured arguments
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Copy of the captured arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Value following `flag`, e.g. `--config data/config.toml`
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .filter(|value| !value.starts_with("--"))
        .cloned()
}

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// `--write-config`: write the effective config back to the config path and exit
pub fn is_write_config_requested() -> bool {
    has_arg("--write-config")
}

/// Config path from `--config`, if given
pub fn config_path_override() -> Option<String> {
    get_arg_value("--config")
}

pub fn print_help() {
    println!("walletwatch - Solana wallet activity notifier");
    println!();
    println!("USAGE:");
    println!("    walletwatch [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --config <path>       Configuration file (default: data/config.toml)");
    println!("    --debug-<tag>         Debug logs for one subsystem (registry, monitor, channel,");
    println!("                          feed, resolver, classifier, notifier, config) or 'all'");
    println!("    --verbose             Very detailed logs for every subsystem");
    println!("    --quiet               Only warnings and errors");
    println!("    --write-config        Write the effective configuration (defaults filled in)");
    println!("                          to the config path and exit");
    println!("    -h, --help            Print this help");
}

#[cfg(test)]
mod tests {
    use super::*;

    // Arguments are process-global; keep every assertion in one test
    #[test]
    fn test_argument_helpers() {
        set_cmd_args(vec![
            "walletwatch".to_string(),
            "--config".to_string(),
            "custom.toml".to_string(),
            "--debug-Channel".to_string(),
            "--write-config".to_string(),
        ]);

        assert_eq!(config_path_override().as_deref(), Some("custom.toml"));
        assert!(has_arg("--debug-Channel"));
        assert!(is_write_config_requested());
        assert!(!is_help_requested());

        set_cmd_args(vec!["walletwatch".to_string(), "--config".to_string()]);
        assert_eq!(config_path_override(), None);

        set_cmd_args(vec![
            "walletwatch".to_string(),
            "--config".to_string(),
            "--verbose".to_string(),
        ]);
        assert_eq!(config_path_override(), None);
    }
}
