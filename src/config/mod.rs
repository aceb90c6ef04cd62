//! Configuration for walletwatch
//!
//! TOML file (default `data/config.toml`) deserialized into [`Config`].
//! Every section carries its defaults, so a missing file or a partial file
//! is valid. Core components receive typed settings derived from this
//! config instead of reading the global.

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::*;
pub use utils::{
    get_config_clone, load_config_from_path, parse_config_str, save_config,
    validate_config, with_config, CONFIG, CONFIG_FILE_PATH,
};
