//! Session controller - the read/dispatch/evaluate loop
//!
//! Bootstraps the model once, then reads one command token per line,
//! resolves it through the [`CommandRegistry`] and runs its handler until a
//! terminal token, a handler failure, or the end of input.

use tracing::{debug, info, warn};

use crate::cli::commands::{is_quit_token, CommandRegistry};
use crate::cli::{LineSource, Reporter};
use crate::core::{FolioError, Result, SessionEnd};
use crate::handlers::HandlerContext;
use crate::portfolio::PortfolioModel;

/// Builder for creating a [`Session`]
pub struct SessionBuilder<'r> {
    lines: Option<LineSource>,
    reporter: Option<&'r dyn Reporter>,
}

impl<'r> SessionBuilder<'r> {
    pub fn new() -> Self {
        Self {
            lines: None,
            reporter: None,
        }
    }

    /// Set the input the session and its handlers read from
    pub fn lines(mut self, lines: LineSource) -> Self {
        self.lines = Some(lines);
        self
    }

    /// Set where feedback is rendered
    pub fn reporter(mut self, reporter: &'r dyn Reporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Build the session; both a line source and a reporter are required
    pub fn build(self) -> Result<Session<'r>> {
        let lines = self
            .lines
            .ok_or_else(|| FolioError::invalid_argument("session requires a line source"))?;
        let reporter = self
            .reporter
            .ok_or_else(|| FolioError::invalid_argument("session requires a reporter"))?;
        Ok(Session { lines, reporter })
    }
}

impl Default for SessionBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// One interactive session over a line source
pub struct Session<'r> {
    lines: LineSource,
    reporter: &'r dyn Reporter,
}

impl<'r> Session<'r> {
    pub fn new(lines: LineSource, reporter: &'r dyn Reporter) -> Self {
        Self { lines, reporter }
    }

    pub fn builder() -> SessionBuilder<'r> {
        SessionBuilder::new()
    }

    /// Lines consumed so far by the loop and its handlers
    pub fn lines_consumed(&self) -> usize {
        self.lines.consumed()
    }

    /// Run the session against `model`.
    ///
    /// Returns normally on a terminal token or when a handler reports
    /// failure. Fails if bootstrapping the model fails (after reporting it)
    /// or if input runs out before a terminal token.
    pub fn run(&mut self, model: &mut dyn PortfolioModel) -> Result<SessionEnd> {
        self.bootstrap(model)?;

        let registry = CommandRegistry::new();
        debug!(commands = registry.len(), "command registry ready");

        loop {
            self.reporter.list_commands(&registry.names());

            let token = self.lines.next_line()?;

            if is_quit_token(&token) {
                info!("session ended by quit token");
                self.reporter.error_or_quit("Goodbye!");
                return Ok(SessionEnd::Quit);
            }

            let Some(kind) = registry.resolve(&token) else {
                debug!(token = %token, "unknown command");
                self.reporter
                    .error_or_quit(&format!("Invalid command: '{}'", token));
                continue;
            };

            debug!(command = %kind, "dispatching");
            let status = {
                let ctx = HandlerContext::new(&mut self.lines, self.reporter);
                kind.instantiate(ctx).run_command(model)
            };

            if !status.is_success() {
                warn!(command = %kind, "handler failed, ending session");
                return Ok(SessionEnd::HandlerFailed(kind.token().to_string()));
            }
        }
    }

    /// Reload persisted strategies, then portfolios, exactly once
    fn bootstrap(&self, model: &mut dyn PortfolioModel) -> Result<()> {
        self.reporter.waiting("Loading saved strategies and portfolios...");

        match reload(model) {
            Ok((strategies, portfolios)) => {
                info!(strategies, portfolios, "bootstrap complete");
                self.reporter.write(&format!(
                    "Loaded {} strategy(ies) and {} portfolio(s)",
                    strategies, portfolios
                ));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "bootstrap failed");
                self.reporter.error_or_quit(&format!("Error: {}", e));
                Err(e)
            }
        }
    }
}

/// Strategies first: portfolios are only loaded once strategies succeed
fn reload(model: &mut dyn PortfolioModel) -> Result<(usize, usize)> {
    let strategies = model.retrieve_strategies()?;
    let portfolios = model.retrieve_portfolios()?;
    Ok((strategies, portfolios))
}
