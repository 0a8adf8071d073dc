//! Portfolio management commands

use crate::core::Result;
use crate::handlers::args::{money, parse_date, parse_number};
use crate::handlers::command_handler;
use crate::portfolio::PortfolioModel;

command_handler!(
    /// `CREATE_PORTFOLIO` - reads: name
    CreatePortfolio => CreatePortfolio
);

impl CreatePortfolio<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [name] = self.ctx.read_args(["Portfolio name"])?;
        model.create_portfolio(&name)?;
        Ok(format!("Created portfolio '{}'", name))
    }
}

command_handler!(
    /// `DISPLAY_PORTFOLIO` - reads: portfolio
    DisplayPortfolio => DisplayPortfolio
);

impl DisplayPortfolio<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [name] = self.ctx.read_args(["Portfolio name"])?;
        let portfolio = model.portfolio(&name)?;

        let mut output = format!("Portfolio '{}'", portfolio.name());
        let holdings = portfolio.current_holdings();
        if holdings.is_empty() {
            output.push_str("\n  (no holdings)");
        }
        for (ticker, shares) in &holdings {
            output.push_str(&format!("\n  {:<8} {:>12.4} shares", ticker, shares));
        }
        output.push_str(&format!(
            "\n  {} transaction(s), {} tracked stock(s)",
            portfolio.transactions().len(),
            portfolio.stocks().len()
        ));
        Ok(output)
    }
}

command_handler!(
    /// `DISPLAY_ALL_PORTFOLIOS` - reads nothing
    DisplayAllPortfolios => DisplayAllPortfolios
);

impl DisplayAllPortfolios<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let names = model.portfolio_names();
        if names.is_empty() {
            return Ok("No portfolios yet".to_string());
        }
        Ok(format!("Portfolios:\n  {}", names.join("\n  ")))
    }
}

command_handler!(
    /// `DISPLAY_STOCKS_IN_PORTFOLIO` - reads: portfolio
    DisplayStocks => DisplayStocksInPortfolio
);

impl DisplayStocks<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [name] = self.ctx.read_args(["Portfolio name"])?;
        let portfolio = model.portfolio(&name)?;
        if portfolio.stocks().is_empty() {
            return Ok(format!("Portfolio '{}' has no stocks", portfolio.name()));
        }

        let tickers: Vec<&str> = portfolio.stocks().iter().map(String::as_str).collect();
        Ok(format!(
            "Stocks in '{}': {}",
            portfolio.name(),
            tickers.join(", ")
        ))
    }
}

command_handler!(
    /// `ADD_STOCK` - reads: portfolio, ticker
    AddStock => AddStock
);

impl AddStock<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [name, ticker] = self.ctx.read_args(["Portfolio name", "Ticker symbol"])?;
        model.add_stock(&name, &ticker)?;
        Ok(format!(
            "Added {} to portfolio '{}'",
            ticker.to_uppercase(),
            name
        ))
    }
}

command_handler!(
    /// `BUY_STOCK` - reads: portfolio, ticker, shares, date, commission
    BuyStock => BuyStock
);

impl BuyStock<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [name, ticker, shares, date, commission] = self.ctx.read_args([
            "Portfolio name",
            "Ticker symbol",
            "Number of shares",
            "Purchase date (YYYY-MM-DD)",
            "Commission fee",
        ])?;

        let shares = parse_number("Shares", &shares)?;
        let date = parse_date(&date)?;
        let commission = parse_number("Commission", &commission)?;

        let tx = model.buy_stock(&name, &ticker, shares, date, commission)?;
        Ok(format!(
            "Bought {} {} at {} on {} (cost {})",
            tx.shares,
            tx.ticker,
            money(tx.price),
            tx.date,
            money(tx.cost())
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::{CommandKind, MemoryReporter};
    use crate::core::RunStatus;
    use crate::handlers::test_support::{date, model, run};
    use crate::portfolio::PortfolioModel;

    #[test]
    fn test_create_then_display_all() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = model(dir.path());
        let reporter = MemoryReporter::new();

        let (status, unread) = run(CommandKind::CreatePortfolio, "tech\nq\n", &mut model, &reporter);
        assert_eq!(status, RunStatus::Success);
        assert_eq!(unread, 1);

        run(CommandKind::DisplayAllPortfolios, "", &mut model, &reporter);
        assert!(reporter.contains("Portfolios:\n  tech"));
    }

    #[test]
    fn test_duplicate_portfolio_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = model(dir.path());
        model.create_portfolio("tech").unwrap();
        let reporter = MemoryReporter::new();

        let (status, _) = run(CommandKind::CreatePortfolio, "tech\n", &mut model, &reporter);
        assert_eq!(status, RunStatus::Success);
        assert!(reporter.contains("already exists"));
    }

    #[test]
    fn test_buy_stock_consumes_all_args_even_when_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = model(dir.path());
        model.create_portfolio("tech").unwrap();
        let reporter = MemoryReporter::new();

        let input = "tech\nAAPL\nlots\n2024-01-02\n0\nquit\n";
        let (status, unread) = run(CommandKind::BuyStock, input, &mut model, &reporter);
        assert_eq!(status, RunStatus::Success);
        assert_eq!(unread, 1);
        assert!(reporter.contains("not a number"));
        assert!(model.portfolio("tech").unwrap().transactions().is_empty());
    }

    #[test]
    fn test_buy_stock_records_purchase() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = model(dir.path());
        model.create_portfolio("tech").unwrap();
        let reporter = MemoryReporter::new();

        let input = "tech\naapl\n3\n2024-01-05\n2.50\n";
        let (status, _) = run(CommandKind::BuyStock, input, &mut model, &reporter);
        assert_eq!(status, RunStatus::Success);
        assert!(reporter.contains("Bought 3 AAPL at $100.00"));
        assert_eq!(
            model.total_cost_basis("tech", date("2024-01-05")).unwrap(),
            302.5
        );
    }

    #[test]
    fn test_missing_argument_line_fails_the_command() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = model(dir.path());
        let reporter = MemoryReporter::new();

        let (status, _) = run(CommandKind::AddStock, "tech\n", &mut model, &reporter);
        assert_eq!(status, RunStatus::Failure);
        assert!(reporter.contains("quit token"));
    }

    #[test]
    fn test_add_and_display_stocks() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = model(dir.path());
        model.create_portfolio("tech").unwrap();
        let reporter = MemoryReporter::new();

        run(CommandKind::AddStock, "tech\nmsft\n", &mut model, &reporter);
        run(CommandKind::AddStock, "tech\naapl\n", &mut model, &reporter);
        run(CommandKind::DisplayStocksInPortfolio, "tech\n", &mut model, &reporter);
        assert!(reporter.contains("Stocks in 'tech': AAPL, MSFT"));

        run(CommandKind::DisplayPortfolio, "tech\n", &mut model, &reporter);
        assert!(reporter.contains("(no holdings)"));
    }
}
