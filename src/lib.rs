//! Folio - line-oriented portfolio command interpreter
//!
//! Drives an investment model through a fixed vocabulary of commands, one
//! command per input line, each followed by the argument lines its handler
//! reads.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **CLI**: Line source, reporter, command registry and the session loop
//! - **Handlers**: One handler per command, reading its own arguments
//! - **Portfolio**: Portfolios, strategies, prices and persistence
//!
//! # Usage
//!
//! ```rust,no_run
//! use folio::cli::{ConsoleReporter, LineSource, Session};
//! use folio::portfolio::{InvestmentModel, PriceBook, Store};
//! use folio::Config;
//!
//! fn main() -> folio::Result<()> {
//!     let config = Config::load();
//!     let prices = PriceBook::load(&config.price_file())?;
//!     let mut model = InvestmentModel::new(prices, Store::from_config(&config));
//!
//!     let reporter = ConsoleReporter::new();
//!     let lines = LineSource::new(std::io::BufReader::new(std::io::stdin()));
//!     let mut session = Session::new(lines, &reporter);
//!     session.run(&mut model)?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod handlers;
pub mod portfolio;

// Re-export commonly used items
pub use cli::Session;
pub use core::{Config, FolioError, Result, RunStatus, SessionEnd};
