//! Weighted investment and dollar-cost strategy commands

use crate::core::Result;
use crate::handlers::args::{
    money, parse_date, parse_days, parse_number, parse_optional_date, parse_weights,
};
use crate::handlers::{command_handler, HandlerContext};
use crate::portfolio::{Investment, PortfolioModel, Strategy, Transaction};

/// Name given to strategies applied without being stored
const AD_HOC_STRATEGY: &str = "dollar-cost";

/// Read the six strategy lines after the name and build the strategy
fn read_strategy(ctx: &mut HandlerContext<'_>, name: &str) -> Result<Strategy> {
    let [amount, start, end, interval, commission, weights] = ctx.read_args([
        "Amount per investment",
        "Start date (YYYY-MM-DD)",
        "End date (YYYY-MM-DD, or - for none)",
        "Interval in days",
        "Commission fee per stock",
        "Weights (TICKER=PERCENT, ...)",
    ])?;

    Strategy::new(
        name,
        parse_number("Amount", &amount)?,
        parse_date(&start)?,
        parse_optional_date(&end)?,
        parse_days(&interval)?,
        parse_number("Commission", &commission)?,
        parse_weights(&weights)?,
    )
}

fn summarize(trades: &[Transaction]) -> String {
    let spent: f64 = trades.iter().map(Transaction::cost).sum();
    match (trades.first(), trades.last()) {
        (Some(first), Some(last)) => format!(
            "{} purchase(s) from {} to {}, {} spent",
            trades.len(),
            first.date,
            last.date,
            money(spent)
        ),
        _ => "no purchases".to_string(),
    }
}

command_handler!(
    /// `INVEST` - reads: portfolio, amount, date, commission, weights
    Invest => Invest
);

impl Invest<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [name, amount, date, commission, weights] = self.ctx.read_args([
            "Portfolio name",
            "Amount to invest",
            "Investment date (YYYY-MM-DD)",
            "Commission fee per stock",
            "Weights (TICKER=PERCENT, ...)",
        ])?;

        let investment = Investment {
            amount: parse_number("Amount", &amount)?,
            date: parse_date(&date)?,
            commission: parse_number("Commission", &commission)?,
            weights: parse_weights(&weights)?,
        };
        let trades = model.invest(&name, &investment)?;
        Ok(format!(
            "Invested {} in '{}': {}",
            money(investment.amount),
            name,
            summarize(&trades)
        ))
    }
}

command_handler!(
    /// `CREATE_STRATEGY` - reads: name, amount, start, end, interval,
    /// commission, weights
    CreateStrategy => CreateStrategy
);

impl CreateStrategy<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [name] = self.ctx.read_args(["Strategy name"])?;
        let strategy = read_strategy(&mut self.ctx, &name)?;
        let every = strategy.interval_days;
        model.create_strategy(strategy)?;
        Ok(format!("Created strategy '{}' investing every {} day(s)", name, every))
    }
}

command_handler!(
    /// `APPLY_STRATEGY` - reads: strategy, portfolio
    ApplyStrategy => ApplyStrategy
);

impl ApplyStrategy<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [strategy, portfolio] = self
            .ctx
            .read_args(["Strategy name", "Portfolio name"])?;
        let trades = model.apply_strategy(&strategy, &portfolio)?;
        Ok(format!(
            "Applied '{}' to '{}': {}",
            strategy,
            portfolio,
            summarize(&trades)
        ))
    }
}

command_handler!(
    /// `APPLY_DOLLAR_COST_STRATEGY` - reads: portfolio, amount, start, end,
    /// interval, commission, weights
    ApplyDollarCostStrategy => ApplyDollarCostStrategy
);

impl ApplyDollarCostStrategy<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [portfolio] = self.ctx.read_args(["Portfolio name"])?;
        let strategy = read_strategy(&mut self.ctx, AD_HOC_STRATEGY)?;
        let trades = model.apply_dollar_cost(&portfolio, &strategy)?;
        Ok(format!(
            "Applied dollar-cost averaging to '{}': {}",
            portfolio,
            summarize(&trades)
        ))
    }
}
