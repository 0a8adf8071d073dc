//! Folio - line-oriented portfolio command interpreter
//!
//! Main entry point for the CLI application.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use folio::cli::{ConsoleReporter, LineSource, Session};
use folio::portfolio::{InvestmentModel, PriceBook, Store};
use folio::{Config, SessionEnd};
use tracing_subscriber::EnvFilter;

/// Folio - portfolio and dollar-cost strategy sessions
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding saved portfolios and strategies
    #[arg(long, short = 'd')]
    data_dir: Option<PathBuf>,

    /// JSON price book to value portfolios with
    #[arg(long, short = 'p')]
    prices: Option<PathBuf>,

    /// Read commands from a file instead of standard input
    #[arg(long, short = 's')]
    script: Option<PathBuf>,

    /// Enable debug diagnostics on stderr
    #[arg(long)]
    debug: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    save_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing with env filter (e.g., RUST_LOG=debug)
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(dir) = args.data_dir {
        config.storage.data_dir = dir;
    }

    if let Some(prices) = args.prices {
        config.prices.file = Some(prices);
    }

    if args.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    if args.save_config {
        let path = config.save_and_get_path()?;
        println!("Configuration saved to {}", path.display());
        return Ok(());
    }

    let prices = PriceBook::load(&config.price_file())?;
    let mut model = InvestmentModel::new(prices, Store::from_config(&config));

    let lines = match args.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            LineSource::new(BufReader::new(file))
        }
        None => LineSource::new(BufReader::new(io::stdin())),
    };

    let reporter = ConsoleReporter::new();
    let mut session = Session::builder()
        .lines(lines)
        .reporter(&reporter)
        .build()?;

    match session.run(&mut model)? {
        SessionEnd::Quit => {}
        SessionEnd::HandlerFailed(command) => {
            tracing::info!(command = %command, "session stopped after a failed command");
        }
    }

    Ok(())
}
