mod app_config;

use anyhow::Result;
use app_config::AppConfig;
use colored::Colorize;
use options_dashboard::chain::chain_commands::ChainCommands;
use options_dashboard::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    let config = AppConfig::from_env();
    config.log_config();

    if let Err(e) = config.validate() {
        eprintln!("{} {}", "✗".red(), e);
        eprintln!("Set DASH_MODE environment variable to control execution mode");
        eprintln!("Examples:");
        eprintln!("  DASH_MODE=single DASH_TICKER=AAPL DASH_EXPIRY=2025-01-17 DASH_PLOT=volume cargo run");
        eprintln!("  DASH_MODE=expirations DASH_TICKER=MSFT cargo run");
        eprintln!("  DASH_MODE=server DASH_PORT=3001 cargo run   # Start API server on port 3001");
        std::process::exit(1);
    }

    match config.mode.as_str() {
        "server" => ChainCommands::run_server(config.port).await?,
        "expirations" => ChainCommands::run_expirations(&config.ticker).await?,
        _ => {
            ChainCommands::run_single(
                &config.ticker,
                config.expiry.as_deref(),
                &config.plot,
                &config.export_dir,
            )
            .await?
        }
    }

    Ok(())
}
