//! Portfolios and the transactions recorded against them

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{FolioError, Result};
use crate::portfolio::{normalize_ticker, validate_name};

/// A single purchase of shares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Upper-case ticker symbol
    pub ticker: String,
    /// Number of shares bought (fractional for weighted investments)
    pub shares: f64,
    /// Closing price paid per share
    pub price: f64,
    /// Trade date
    pub date: NaiveDate,
    /// Commission fee charged for the trade
    pub commission: f64,
}

impl Transaction {
    /// Money spent on this trade, commission included
    pub fn cost(&self) -> f64 {
        self.shares * self.price + self.commission
    }
}

/// A named collection of stocks and the purchases made for them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    name: String,
    #[serde(default)]
    stocks: BTreeSet<String>,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

impl Portfolio {
    /// Create an empty portfolio
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: validate_name("Portfolio", name)?,
            stocks: BTreeSet::new(),
            transactions: Vec::new(),
        })
    }

    /// Check a portfolio read back from disk
    pub fn validate(&self) -> Result<()> {
        validate_name("Portfolio", &self.name)?;
        let tickers = self
            .stocks
            .iter()
            .chain(self.transactions.iter().map(|tx| &tx.ticker));
        for ticker in tickers {
            if normalize_ticker(ticker)? != *ticker {
                return Err(FolioError::invalid_argument(format!(
                    "Ticker '{}' must be upper case",
                    ticker
                )));
            }
        }
        for tx in &self.transactions {
            let sane = tx.shares.is_finite()
                && tx.shares > 0.0
                && tx.price.is_finite()
                && tx.price > 0.0
                && tx.commission.is_finite()
                && tx.commission >= 0.0;
            if !sane {
                return Err(FolioError::invalid_argument(format!(
                    "Transaction for {} on {} has invalid amounts",
                    tx.ticker, tx.date
                )));
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tickers tracked by this portfolio, held or not
    pub fn stocks(&self) -> &BTreeSet<String> {
        &self.stocks
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Track a ticker; returns false if it was already tracked
    pub fn add_stock(&mut self, ticker: impl Into<String>) -> bool {
        self.stocks.insert(ticker.into())
    }

    /// Record a purchase, tracking its ticker as well
    pub fn record(&mut self, transaction: Transaction) {
        self.stocks.insert(transaction.ticker.clone());
        self.transactions.push(transaction);
    }

    /// Shares of every ticker held at the close of `date`
    pub fn holdings_on(&self, date: NaiveDate) -> BTreeMap<String, f64> {
        let mut holdings = BTreeMap::new();
        for tx in self.transactions.iter().filter(|tx| tx.date <= date) {
            *holdings.entry(tx.ticker.clone()).or_insert(0.0) += tx.shares;
        }
        holdings
    }

    /// Total money invested up to and including `date`
    pub fn cost_basis_on(&self, date: NaiveDate) -> f64 {
        self.transactions
            .iter()
            .filter(|tx| tx.date <= date)
            .map(Transaction::cost)
            .sum()
    }

    /// Shares of each ticker across all recorded purchases
    pub fn current_holdings(&self) -> BTreeMap<String, f64> {
        self.holdings_on(NaiveDate::MAX)
    }
}
