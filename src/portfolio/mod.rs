//! Portfolio module - the investment domain model
//!
//! Holds portfolios, dollar-cost strategies, closing prices, and their
//! on-disk persistence. The session loop only ever sees the
//! [`PortfolioModel`] trait.

pub mod holdings;
pub mod model;
pub mod prices;
pub mod store;
pub mod strategy;

pub use holdings::{Portfolio, Transaction};
pub use model::{Investment, InvestmentModel, PortfolioModel};
pub use prices::{PriceBook, PriceSource};
pub use store::Store;
pub use strategy::Strategy;

use crate::core::{FolioError, Result};

/// Validate a portfolio or strategy name.
///
/// Names end up as file names, so only letters, digits, `_` and `-` pass.
pub fn validate_name(kind: &str, name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FolioError::invalid_argument(format!(
            "{} name cannot be empty",
            kind
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(FolioError::invalid_argument(format!(
            "{} name '{}' may only contain letters, digits, '_' and '-'",
            kind, name
        )));
    }
    Ok(name.to_string())
}

/// Canonicalize a ticker symbol to upper case
pub fn normalize_ticker(raw: &str) -> Result<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty()
        || !ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.')
    {
        return Err(FolioError::invalid_argument(format!(
            "'{}' is not a valid ticker symbol",
            raw.trim()
        )));
    }
    Ok(ticker)
}
