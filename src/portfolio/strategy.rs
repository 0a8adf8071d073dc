//! Dollar-cost averaging strategies
//!
//! A strategy invests a fixed amount at a fixed interval, split across
//! tickers by percentage weight.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::{FolioError, Result};
use crate::portfolio::{normalize_ticker, validate_name};

/// Tolerance when checking that weights add up to 100%
const WEIGHT_TOLERANCE: f64 = 0.001;

/// A recurring, weighted investment plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    /// Money invested on each scheduled date
    pub amount: f64,
    pub start: NaiveDate,
    /// Last possible investment date; `None` runs until prices run out
    pub end: Option<NaiveDate>,
    pub interval_days: u32,
    /// Commission charged per ticker bought
    pub commission: f64,
    /// Ticker -> percentage of `amount`
    pub weights: BTreeMap<String, f64>,
}

impl Strategy {
    /// Build a strategy, validating every field
    pub fn new(
        name: &str,
        amount: f64,
        start: NaiveDate,
        end: Option<NaiveDate>,
        interval_days: u32,
        commission: f64,
        weights: BTreeMap<String, f64>,
    ) -> Result<Self> {
        let strategy = Self {
            name: validate_name("Strategy", name)?,
            amount,
            start,
            end,
            interval_days,
            commission,
            weights,
        };
        strategy.validate()?;
        Ok(strategy)
    }

    /// Check every field; also run on strategies read back from disk
    pub fn validate(&self) -> Result<()> {
        validate_name("Strategy", &self.name)?;
        validate_amount(self.amount)?;
        validate_commission(self.commission)?;
        validate_weights(&self.weights)?;
        for ticker in self.weights.keys() {
            if normalize_ticker(ticker)? != *ticker {
                return Err(FolioError::invalid_argument(format!(
                    "Ticker '{}' must be upper case",
                    ticker
                )));
            }
        }

        if self.interval_days == 0 {
            return Err(FolioError::invalid_argument(
                "Interval must be at least one day",
            ));
        }
        if let Some(end) = self.end {
            if end < self.start {
                return Err(FolioError::invalid_argument(format!(
                    "End date {} is before start date {}",
                    end, self.start
                )));
            }
        }
        Ok(())
    }

    /// Investment dates from `start`, every `interval_days`, through the
    /// earlier of `end` and `last_available`
    pub fn schedule(&self, last_available: NaiveDate) -> Result<Vec<NaiveDate>> {
        if self.interval_days == 0 {
            return Err(FolioError::invalid_state(format!(
                "Strategy '{}' has a zero-day interval",
                self.name
            )));
        }
        let stop = match self.end {
            Some(end) => end.min(last_available),
            None => last_available,
        };

        let step = Duration::days(i64::from(self.interval_days));
        let mut dates = Vec::new();
        let mut next = self.start;
        while next <= stop {
            dates.push(next);
            next = match next.checked_add_signed(step) {
                Some(d) => d,
                None => break,
            };
        }
        Ok(dates)
    }
}

/// Amounts invested must be positive
pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(FolioError::invalid_argument(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}

/// Commission fees cannot be negative
pub fn validate_commission(commission: f64) -> Result<()> {
    if !commission.is_finite() || commission < 0.0 {
        return Err(FolioError::invalid_argument(format!(
            "Commission cannot be negative, got {}",
            commission
        )));
    }
    Ok(())
}

/// Weights must be non-negative and add up to 100
pub fn validate_weights(weights: &BTreeMap<String, f64>) -> Result<()> {
    if weights.is_empty() {
        return Err(FolioError::invalid_argument("At least one weight is required"));
    }
    if let Some((ticker, pct)) = weights.iter().find(|(_, pct)| !pct.is_finite() || **pct < 0.0) {
        return Err(FolioError::invalid_argument(format!(
            "Weight for {} must be non-negative, got {}",
            ticker, pct
        )));
    }

    let total: f64 = weights.values().sum();
    if (total - 100.0).abs() > WEIGHT_TOLERANCE {
        return Err(FolioError::invalid_argument(format!(
            "Weights must add up to 100, got {}",
            total
        )));
    }
    Ok(())
}
