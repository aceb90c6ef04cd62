use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use walletwatch::{
    arguments::{config_path_override, is_help_requested, is_write_config_requested, print_help},
    classifier::{parse_filter, ProgramTable},
    config::{self, Config, CONFIG_FILE_PATH},
    feed::SolanaWsFeed,
    logger::{self, LogTag},
    notifications::{Destination, FixedPriceOracle, LogNotifier, Notifier},
    tracker::{MonitorContext, MonitorSettings, TrackingRegistry},
    transactions::RpcResolver,
};

/// Main entry point for walletwatch
///
/// Loads the config, registers the configured wallets and runs until Ctrl-C,
/// then tears every wallet down within the teardown bound.
#[tokio::main]
async fn main() {
    logger::init();

    if is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    if let Err(e) = run().await {
        logger::error(LogTag::System, &format!("❌ {:#}", e));
        logger::flush();
        std::process::exit(1);
    }
    logger::flush();
}

async fn run() -> Result<()> {
    logger::info(LogTag::System, "🚀 walletwatch starting up...");

    let config_path = config_path_override().unwrap_or_else(|| CONFIG_FILE_PATH.to_string());
    config::load_config_from_path(&config_path).map_err(|e| anyhow!(e))?;
    let cfg = config::get_config_clone();

    if is_write_config_requested() {
        config::save_config(Some(&config_path)).map_err(|e| anyhow!(e))?;
        logger::info(LogTag::Config, &format!("Configuration written to {}", config_path));
        return Ok(());
    }

    if !cfg.logging.file_path.is_empty() {
        logger::init_file_logging(&cfg.logging.file_path).map_err(|e| anyhow!(e))?;
    }
    logger::info(
        LogTag::Config,
        &format!(
            "Config loaded from {} ({} startup wallets, {} watched programs)",
            config_path,
            cfg.wallets.len(),
            cfg.monitor.watched_programs.len()
        ),
    );

    let registry = TrackingRegistry::new(Arc::new(build_context(&cfg)?));

    for wallet in &cfg.wallets {
        let chat_id = if wallet.chat_id != 0 {
            wallet.chat_id
        } else {
            cfg.telegram.default_chat_id
        };
        let added = parse_filter(wallet.categories.as_slice())
            .and_then(|filter| registry.add(&wallet.name, &wallet.address, filter, Destination(chat_id)));
        if let Err(e) = added {
            logger::error(
                LogTag::Registry,
                &format!("Startup wallet {} not added: {}", wallet.name, e),
            );
        }
    }

    logger::info(
        LogTag::System,
        &format!("✅ Tracking {} wallets, press Ctrl-C to stop", registry.list().len()),
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    logger::info(LogTag::System, "🛑 Shutting down...");
    let removed = registry.shutdown_all().await;
    let abandoned: usize = removed
        .iter()
        .map(|r| r.teardown.abandoned_channels.len())
        .sum();
    logger::info(
        LogTag::System,
        &format!("Stopped {} wallets ({} channels abandoned)", removed.len(), abandoned),
    );
    Ok(())
}

fn build_context(cfg: &Config) -> Result<MonitorContext> {
    let programs = ProgramTable::from_config(&cfg.programs)?;
    let resolver = RpcResolver::new(&cfg.rpc)?;

    Ok(MonitorContext {
        feed: Arc::new(SolanaWsFeed::new(&cfg.rpc, &cfg.monitor)),
        resolver: Arc::new(resolver),
        notifier: build_notifier(cfg)?,
        oracle: Arc::new(FixedPriceOracle::new(cfg.price.native_usd)),
        programs: Arc::new(programs),
        settings: MonitorSettings::from_config(&cfg.monitor),
    })
}

#[cfg(feature = "telegram")]
fn build_notifier(cfg: &Config) -> Result<Arc<dyn Notifier>> {
    if cfg.telegram.enabled {
        let notifier = walletwatch::notifications::TelegramNotifier::new(&cfg.telegram.bot_token)
            .map_err(|e| anyhow!(e))?;
        logger::info(LogTag::Notifier, "Telegram notifications enabled");
        return Ok(Arc::new(notifier));
    }
    logger::info(LogTag::Notifier, "Telegram disabled, notifications go to the log");
    Ok(Arc::new(LogNotifier))
}

#[cfg(not(feature = "telegram"))]
fn build_notifier(cfg: &Config) -> Result<Arc<dyn Notifier>> {
    if cfg.telegram.enabled {
        logger::warning(
            LogTag::Notifier,
            "telegram.enabled is set but the binary was built without the telegram feature",
        );
    }
    Ok(Arc::new(LogNotifier))
}
