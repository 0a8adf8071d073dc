//! Valuation commands

use crate::core::Result;
use crate::handlers::args::{money, parse_date};
use crate::handlers::command_handler;
use crate::portfolio::PortfolioModel;

command_handler!(
    /// `GET_TOTAL_COST_BASIS` - reads: portfolio, date
    TotalCostBasis => GetTotalCostBasis
);

impl TotalCostBasis<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [name, date] = self
            .ctx
            .read_args(["Portfolio name", "Date (YYYY-MM-DD)"])?;
        let date = parse_date(&date)?;
        let basis = model.total_cost_basis(&name, date)?;
        Ok(format!(
            "Total cost basis of '{}' on {}: {}",
            name,
            date,
            money(basis)
        ))
    }
}

command_handler!(
    /// `GET_TOTAL_VALUE` - reads: portfolio, date
    TotalValue => GetTotalValue
);

impl TotalValue<'_> {
    fn execute(&mut self, model: &mut dyn PortfolioModel) -> Result<String> {
        let [name, date] = self
            .ctx
            .read_args(["Portfolio name", "Date (YYYY-MM-DD)"])?;
        let date = parse_date(&date)?;
        let value = model.total_value(&name, date)?;
        Ok(format!("Total value of '{}' on {}: {}", name, date, money(value)))
    }
}
