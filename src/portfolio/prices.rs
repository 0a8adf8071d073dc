//! Closing price lookup
//!
//! Prices come from a JSON price book shaped like
//! `{ "AAPL": { "2024-01-02": 185.64, ... }, ... }`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::{FolioError, Result};
use crate::portfolio::normalize_ticker;

/// Anything that can quote a closing price
pub trait PriceSource {
    /// Closing price of `ticker` on `date`, or the latest close before it
    fn closing_price(&self, ticker: &str, date: NaiveDate) -> Result<f64>;

    /// Most recent date with a price for `ticker`
    fn latest_date(&self, ticker: &str) -> Option<NaiveDate>;
}

type Series = BTreeMap<String, BTreeMap<NaiveDate, f64>>;

/// In-memory price history keyed by upper-case ticker then date
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Series")]
pub struct PriceBook {
    series: Series,
}

impl TryFrom<Series> for PriceBook {
    type Error = FolioError;

    /// Tickers are upper-cased and every close must be a positive number
    fn try_from(raw: Series) -> Result<Self> {
        let mut series = Series::new();
        for (raw_ticker, closes) in raw {
            let ticker = normalize_ticker(&raw_ticker)?;
            if let Some((date, close)) = closes
                .iter()
                .find(|(_, close)| !close.is_finite() || **close <= 0.0)
            {
                return Err(FolioError::invalid_argument(format!(
                    "Close of {} on {} must be positive, got {}",
                    ticker, date, close
                )));
            }
            if series.insert(ticker.clone(), closes).is_some() {
                return Err(FolioError::invalid_argument(format!(
                    "{} appears more than once",
                    ticker
                )));
            }
        }
        Ok(Self { series })
    }
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a price book; a missing file yields an empty book
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "price book not found, starting empty");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            FolioError::with_context(format!("Failed to read {}", path.display()), e)
        })?;
        let book: PriceBook = serde_json::from_str(&content).map_err(|e| {
            FolioError::with_context(format!("Failed to parse {}", path.display()), e)
        })?;

        debug!(tickers = book.series.len(), "loaded price book");
        Ok(book)
    }

    /// Record a closing price
    pub fn insert(&mut self, ticker: &str, date: NaiveDate, close: f64) {
        self.series
            .entry(ticker.to_uppercase())
            .or_default()
            .insert(date, close);
    }

    /// Builder-style variant of [`PriceBook::insert`]
    pub fn with_price(mut self, ticker: &str, date: NaiveDate, close: f64) -> Self {
        self.insert(ticker, date, close);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl PriceSource for PriceBook {
    fn closing_price(&self, ticker: &str, date: NaiveDate) -> Result<f64> {
        let series = self.series.get(ticker).ok_or_else(|| {
            FolioError::invalid_argument(format!("No price data for {}", ticker))
        })?;

        series
            .range(..=date)
            .next_back()
            .map(|(_, close)| *close)
            .ok_or_else(|| {
                FolioError::invalid_argument(format!(
                    "No price for {} on or before {}",
                    ticker, date
                ))
            })
    }

    fn latest_date(&self, ticker: &str) -> Option<NaiveDate> {
        self.series
            .get(ticker)
            .and_then(|series| series.keys().next_back().copied())
    }
}
