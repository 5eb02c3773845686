// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

mod cli;

use anyhow::{Context, Result};
use std::env;

use price_reveal::{logging, RevealConfig};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = RevealConfig::load().context("Failed to load configuration")?;

    if args.len() > 1 && args[1] == "reveal" {
        // Headless mode
        logging::init_stderr()?;
        cli::run_reveal(&args[2..], &config)?;
    } else {
        // UI mode (default)
        run_ui_mode(&config)?;
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &RevealConfig) -> Result<()> {
    logging::init_file(&config.log_path())?;
    tracing::info!(timing = ?config.timing, "starting price reveal UI");

    let mut app = ui::App::new(config)?;
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &RevealConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or run headless: price-reveal reveal <price> [JPY|USD]");
    std::process::exit(1);
}
