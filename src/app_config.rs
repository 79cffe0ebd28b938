use options_dashboard::chain::config;
use options_dashboard::chain::PlotKind;
use anyhow::{Result, bail};
use colored::Colorize;

pub const MODES: [&str; 3] = ["single", "expirations", "server"];

/// Application configuration handler
pub struct AppConfig {
    pub mode: String,
    pub port: u16,
    pub ticker: String,
    pub expiry: Option<String>,
    pub plot: String,
    pub export_dir: String,
}

impl AppConfig {
    /// Create new configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            mode: config::get_execution_mode(),
            port: config::get_port(),
            ticker: config::get_ticker(),
            expiry: config::get_expiry(),
            plot: config::get_plot(),
            export_dir: config::get_export_dir(),
        }
    }

    pub fn log_config(&self) {
        println!("{} Mode: {}", "→".cyan(), self.mode.yellow());
        match self.mode.as_str() {
            "server" => println!("{} Port: {}", "→".cyan(), self.port),
            _ => println!("{} Ticker: {}", "→".cyan(), self.ticker.yellow()),
        }
        println!();
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !MODES.contains(&self.mode.as_str()) {
            bail!("Invalid mode '{}'. Use 'single', 'expirations' or 'server'", self.mode);
        }
        if self.mode == "single" {
            self.plot.parse::<PlotKind>()?;
        }
        Ok(())
    }
}
