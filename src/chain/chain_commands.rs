use super::chain_api_server;
use super::export;
use super::gateway::OptionsProvider;
use super::models::Expiration;
use super::plots::{PlotData, PlotKind};
use super::session::DashboardSession;
use super::yahoo_client::YahooClient;
use crate::error::DashboardError;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

// Widest bar in the terminal rendering
const BAR_WIDTH: usize = 40;

/// Command handler for the dashboard's CLI modes
pub struct ChainCommands;

impl ChainCommands {
    /// Enter a ticker, fetch one expiration, print a plot and export CSV
    pub async fn run_single(
        ticker: &str,
        expiry: Option<&str>,
        plot: &str,
        export_dir: &str,
    ) -> Result<()> {
        Self::banner("Options Chain Dashboard");

        let plot: PlotKind = plot.parse()?;
        let mut session = DashboardSession::new(YahooClient::new()?);

        if !Self::enter_ticker(&mut session, ticker).await? {
            return Ok(());
        }

        if let Some(raw) = expiry {
            let expiration = Expiration::parse(raw)?;
            session.select_expiration(expiration)?;
        }

        let selected = session
            .selected_expiration()
            .copied()
            .context("No expiration selected")?;
        println!("{} Expiry: {}", "→".cyan(), selected.to_string().yellow());
        println!();

        match session.fetch().await {
            Ok(table) => {
                println!("{} Data fetched successfully!", "✓".green());
                println!("{} Rows: {}", "✓".green(), table.len());
                println!(
                    "{} Calls: {}  Puts: {}",
                    "✓".green(),
                    table.calls().count(),
                    table.puts().count()
                );
                println!("{} Total open interest: {}", "✓".green(), table.total_open_interest());
                println!();
            }
            Err(e @ DashboardError::EmptyFetchResult { .. }) => {
                println!("{} {}", "✗".red(), e.to_string().red());
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        let data = session.plot(plot)?;
        Self::print_plot(&data);

        let table = session.table()?;
        if let Some(ticker) = session.ticker() {
            let path = export::export_chain(table, ticker, Path::new(export_dir))?;
            println!("{} Saved CSV to {}", "✓".green(), path.display());
        }

        Self::banner("Done!");
        Ok(())
    }

    /// Print the validated expirations of a ticker
    pub async fn run_expirations(ticker: &str) -> Result<()> {
        Self::banner("Valid Expirations");

        let mut session = DashboardSession::new(YahooClient::new()?);
        if Self::enter_ticker(&mut session, ticker).await? {
            for expiration in session.valid_expirations() {
                println!("  {} {}", "•".blue(), expiration);
            }
        }
        println!();
        Ok(())
    }

    pub async fn run_server(port: u16) -> Result<()> {
        Self::banner("Options Dashboard API Server");
        chain_api_server::start_server(port).await
    }

    /// Returns false when the ticker has nothing to show (already reported)
    async fn enter_ticker<P: OptionsProvider>(
        session: &mut DashboardSession<P>,
        ticker: &str,
    ) -> Result<bool> {
        println!(
            "{} Validating expirations for {}...",
            "→".cyan(),
            ticker.to_uppercase().yellow()
        );

        match session.enter_ticker(ticker).await {
            Ok(valid) => {
                println!("{} {} valid expiration dates", "✓".green(), valid.len());
                Ok(true)
            }
            Err(e) if e.is_warning() => {
                println!("{} {}", "⚠".yellow(), e.to_string().yellow());
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Horizontal bars, calls green and puts red
    fn print_plot(data: &PlotData) {
        println!("{}", data.title.cyan().bold());
        println!("{} ({}) vs {}", data.y_label, data.kind, data.x_label);
        println!();

        if data.points.is_empty() {
            println!("  {}", "(no bars to draw)".dimmed());
            println!();
            return;
        }

        let max = data.points.iter().map(|p| p.value.unsigned_abs()).max().unwrap_or(1).max(1);

        for (idx, point) in data.points.iter().enumerate() {
            let share = point.value.unsigned_abs() as f64 / max as f64;
            let len = (share * BAR_WIDTH as f64).ceil() as usize;
            let bar = if point.value < 0 { "-".repeat(len) } else { "█".repeat(len) };
            let bar = bar.color(data.palette.color_for(point.option_type));
            let label = if idx % data.tick_stride == 0 {
                format!("{:>10.2}", point.strike)
            } else {
                " ".repeat(10)
            };
            println!("{} {:<4} {} {}", label, point.option_type.as_str(), bar, point.value);
        }
        println!();
    }

    fn banner(title: &str) {
        println!("{}", "=".repeat(60).blue());
        println!("{}", title.green().bold());
        println!("{}", "=".repeat(60).blue());
        println!();
    }
}
