//! Save commands

use tracing::info;

use crate::core::Result;
use crate::handlers::command_handler;
use crate::portfolio::PortfolioModel;

command_handler!(
    /// `SAVE_PORTFOLIO` - reads: portfolio
    SavePortfolio => SavePortfolio
);

impl SavePortfolio<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [name] = self.ctx.read_args(["Portfolio name"])?;
        let path = model.save_portfolio(&name)?;
        Ok(format!("Saved portfolio '{}' to {}", name, path.display()))
    }
}

command_handler!(
    /// `SAVE_STRATEGY` - reads: strategy
    SaveStrategy => SaveStrategy
);

impl SaveStrategy<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [name] = self.ctx.read_args(["Strategy name"])?;
        let path = model.save_strategy(&name)?;
        Ok(format!("Saved strategy '{}' to {}", name, path.display()))
    }
}

command_handler!(
    /// `SAVE_SESSION` - reads nothing; saves every portfolio and strategy
    SaveSession => SaveSession
);

impl SaveSession<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        self.ctx.reporter().waiting("Saving session...");
        let written = model.save_session()?;
        info!(files = written, "session saved");
        Ok(format!("Session saved ({} file(s))", written))
    }
}
