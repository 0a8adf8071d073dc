//! Command handlers - one per command in the vocabulary
//!
//! Every handler owns a [`HandlerContext`] over the session's shared line
//! source and reporter. A handler reads all of its argument lines up front,
//! then validates and executes, so a bad argument never leaves unread
//! arguments behind for the session loop to misinterpret.

/// Declare a handler struct holding a [`HandlerContext`] and wire its
/// `execute` method into [`CommandHandler`]
macro_rules! command_handler {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        pub struct $name<'a> {
            ctx: $crate::handlers::HandlerContext<'a>,
        }

        impl<'a> $name<'a> {
            pub fn new(ctx: $crate::handlers::HandlerContext<'a>) -> Self {
                Self { ctx }
            }
        }

        impl $crate::handlers::CommandHandler for $name<'_> {
            fn run_command(
                &mut self,
                model: &mut dyn $crate::portfolio::PortfolioModel,
            ) -> $crate::core::RunStatus {
                let outcome = self.execute(model);
                self.ctx
                    .finish($crate::cli::CommandKind::$kind.token(), outcome)
            }
        }
    };
}

pub(crate) use command_handler;

pub mod args;
pub mod investing;
pub mod persistence;
pub mod portfolio;
pub mod valuation;

use tracing::warn;

use crate::cli::{LineSource, Reporter};
use crate::core::{Result, RunStatus};
use crate::portfolio::PortfolioModel;

pub use investing::{ApplyDollarCostStrategy, ApplyStrategy, CreateStrategy, Invest};
pub use persistence::{SavePortfolio, SaveSession, SaveStrategy};
pub use portfolio::{
    AddStock, BuyStock, CreatePortfolio, DisplayAllPortfolios, DisplayPortfolio, DisplayStocks,
};
pub use valuation::{TotalCostBasis, TotalValue};

/// A single executable command
pub trait CommandHandler {
    /// Execute against the model, reading any arguments from the shared input
    fn run_command(&mut self, model: &mut dyn PortfolioModel) -> RunStatus;
}

/// Shared input cursor and reporter lent to a handler
pub struct HandlerContext<'a> {
    lines: &'a mut LineSource,
    reporter: &'a dyn Reporter,
}

impl<'a> HandlerContext<'a> {
    pub fn new(lines: &'a mut LineSource, reporter: &'a dyn Reporter) -> Self {
        Self { lines, reporter }
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter
    }

    /// Prompt for and read exactly one line per label.
    ///
    /// Nothing is validated here; all lines are consumed before the caller
    /// parses any of them.
    pub fn read_args<const N: usize>(&mut self, labels: [&str; N]) -> Result<[String; N]> {
        let mut args: [String; N] = std::array::from_fn(|_| String::new());
        for (slot, label) in args.iter_mut().zip(labels) {
            self.reporter.prompt(label);
            *slot = self.lines.next_line()?;
        }
        Ok(args)
    }

    /// Report the outcome of a command and classify it.
    ///
    /// Bad user input is reported and the session continues; anything else
    /// is reported and ends the session.
    pub fn finish(&self, command: &str, outcome: Result<String>) -> RunStatus {
        match outcome {
            Ok(message) => {
                self.reporter.write(&message);
                RunStatus::Success
            }
            Err(e) if e.is_recoverable() => {
                warn!(command, error = %e, "command rejected");
                self.reporter.error_or_quit(&format!("Error: {}", e));
                RunStatus::Success
            }
            Err(e) => {
                warn!(command, error = %e, "command failed, ending session");
                self.reporter.error_or_quit(&format!("Error: {}", e));
                RunStatus::Failure
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::cli::{LineSource, MemoryReporter};
    use crate::cli::commands::CommandKind;
    use crate::core::RunStatus;
    use crate::portfolio::{InvestmentModel, PriceBook, Store};

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn model(dir: &std::path::Path) -> InvestmentModel {
        let prices = PriceBook::new()
            .with_price("AAPL", date("2024-01-02"), 100.0)
            .with_price("AAPL", date("2024-01-09"), 110.0)
            .with_price("MSFT", date("2024-01-02"), 200.0)
            .with_price("MSFT", date("2024-01-09"), 250.0);
        InvestmentModel::new(
            prices,
            Store::new(dir.join("portfolios"), dir.join("strategies")),
        )
    }

    /// Run one handler over `input`, returning its status and unread line count
    pub fn run(
        kind: CommandKind,
        input: &str,
        model: &mut InvestmentModel,
        reporter: &MemoryReporter,
    ) -> (RunStatus, usize) {
        let mut lines = LineSource::from_text(input);
        let status = {
            let ctx = super::HandlerContext::new(&mut lines, reporter);
            kind.instantiate(ctx).run_command(model)
        };
        let mut unread = 0;
        while lines.next_line().is_ok() {
            unread += 1;
        }
        (status, unread)
    }
}
