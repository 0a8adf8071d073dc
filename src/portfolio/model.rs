//! The investment model driven by the command session
//!
//! [`PortfolioModel`] is the surface handlers and the session loop work
//! against; [`InvestmentModel`] is the in-memory implementation backed by a
//! [`PriceSource`] and a [`Store`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::core::{FolioError, Result};
use crate::portfolio::strategy::{validate_amount, validate_commission, validate_weights};
use crate::portfolio::{normalize_ticker, Portfolio, PriceSource, Store, Strategy, Transaction};

/// A one-off weighted investment
#[derive(Debug, Clone, PartialEq)]
pub struct Investment {
    pub amount: f64,
    pub date: NaiveDate,
    /// Commission charged per ticker bought
    pub commission: f64,
    /// Ticker -> percentage of `amount`
    pub weights: BTreeMap<String, f64>,
}

/// Operations available to the session and its command handlers
pub trait PortfolioModel {
    /// Reload persisted strategies; returns how many were loaded
    fn retrieve_strategies(&mut self) -> Result<usize>;

    /// Reload persisted portfolios; returns how many were loaded
    fn retrieve_portfolios(&mut self) -> Result<usize>;

    fn create_portfolio(&mut self, name: &str) -> Result<()>;

    /// Names of all portfolios, sorted
    fn portfolio_names(&self) -> Vec<String>;

    fn portfolio(&self, name: &str) -> Result<&Portfolio>;

    /// Track a ticker in a portfolio without buying it
    fn add_stock(&mut self, portfolio: &str, ticker: &str) -> Result<()>;

    /// Buy whole shares at the closing price of `date`
    fn buy_stock(
        &mut self,
        portfolio: &str,
        ticker: &str,
        shares: f64,
        date: NaiveDate,
        commission: f64,
    ) -> Result<Transaction>;

    fn total_cost_basis(&self, portfolio: &str, date: NaiveDate) -> Result<f64>;

    fn total_value(&self, portfolio: &str, date: NaiveDate) -> Result<f64>;

    /// Split an amount across tickers by weight on a single date
    fn invest(&mut self, portfolio: &str, investment: &Investment) -> Result<Vec<Transaction>>;

    fn create_strategy(&mut self, strategy: Strategy) -> Result<()>;

    fn strategy(&self, name: &str) -> Result<&Strategy>;

    /// Apply a stored strategy to a portfolio
    fn apply_strategy(&mut self, strategy: &str, portfolio: &str) -> Result<Vec<Transaction>>;

    /// Apply an ad-hoc dollar-cost strategy to a portfolio
    fn apply_dollar_cost(
        &mut self,
        portfolio: &str,
        strategy: &Strategy,
    ) -> Result<Vec<Transaction>>;

    fn save_portfolio(&self, name: &str) -> Result<PathBuf>;

    fn save_strategy(&self, name: &str) -> Result<PathBuf>;

    /// Persist every portfolio and strategy; returns the number of files written
    fn save_session(&self) -> Result<usize>;
}

/// In-memory portfolios and strategies with file persistence
pub struct InvestmentModel {
    portfolios: BTreeMap<String, Portfolio>,
    strategies: BTreeMap<String, Strategy>,
    prices: Box<dyn PriceSource>,
    store: Store,
}

impl InvestmentModel {
    pub fn new(prices: impl PriceSource + 'static, store: Store) -> Self {
        Self {
            portfolios: BTreeMap::new(),
            strategies: BTreeMap::new(),
            prices: Box::new(prices),
            store,
        }
    }

    pub fn strategy_names(&self) -> Vec<String> {
        self.strategies.keys().cloned().collect()
    }

    fn portfolio_mut(&mut self, name: &str) -> Result<&mut Portfolio> {
        self.portfolios
            .get_mut(name.trim())
            .ok_or_else(|| unknown("portfolio", name))
    }

    /// Closing price usable for a trade or a valuation
    fn quote(&self, ticker: &str, date: NaiveDate) -> Result<f64> {
        let price = self.prices.closing_price(ticker, date)?;
        if !price.is_finite() || price <= 0.0 {
            return Err(FolioError::invalid_argument(format!(
                "Closing price of {} on {} is not usable: {}",
                ticker, date, price
            )));
        }
        Ok(price)
    }

    /// Price every leg first so a missing quote leaves the portfolio untouched
    fn plan_purchases(&self, investment: &Investment) -> Result<Vec<Transaction>> {
        validate_amount(investment.amount)?;
        validate_commission(investment.commission)?;
        validate_weights(&investment.weights)?;

        let mut purchases = Vec::new();
        for (ticker, pct) in &investment.weights {
            if *pct <= 0.0 {
                continue;
            }
            let ticker = normalize_ticker(ticker)?;
            let price = self.quote(&ticker, investment.date)?;
            let spend = investment.amount * pct / 100.0;
            purchases.push(Transaction {
                ticker,
                shares: spend / price,
                price,
                date: investment.date,
                commission: investment.commission,
            });
        }
        Ok(purchases)
    }

    /// Last date on which every ticker in the strategy has a price
    fn last_common_price_date(&self, strategy: &Strategy) -> Result<NaiveDate> {
        let mut last: Option<NaiveDate> = None;
        for ticker in strategy.weights.keys() {
            let latest = self.prices.latest_date(ticker).ok_or_else(|| {
                FolioError::invalid_argument(format!("No price data for {}", ticker))
            })?;
            last = Some(last.map_or(latest, |current| current.min(latest)));
        }
        last.ok_or_else(|| FolioError::invalid_argument("Strategy has no tickers"))
    }

    fn run_strategy(&mut self, portfolio: &str, strategy: &Strategy) -> Result<Vec<Transaction>> {
        // Fail on unknown portfolios before doing any pricing work
        self.portfolio(portfolio)?;

        let last = self.last_common_price_date(strategy)?;
        let dates = strategy.schedule(last)?;
        if dates.is_empty() {
            return Err(FolioError::invalid_argument(format!(
                "Strategy '{}' starts on {} but prices end on {}",
                strategy.name, strategy.start, last
            )));
        }

        let mut planned = Vec::new();
        for date in dates {
            let investment = Investment {
                amount: strategy.amount,
                date,
                commission: strategy.commission,
                weights: strategy.weights.clone(),
            };
            planned.extend(self.plan_purchases(&investment)?);
        }

        self.record_weighted(portfolio, &strategy.weights, &planned)?;
        info!(
            strategy = %strategy.name,
            portfolio = %portfolio,
            trades = planned.len(),
            "applied strategy"
        );
        Ok(planned)
    }

    /// Track every weighted ticker, zero weights included, then record trades
    fn record_weighted(
        &mut self,
        portfolio: &str,
        weights: &BTreeMap<String, f64>,
        planned: &[Transaction],
    ) -> Result<()> {
        let tickers = weights
            .keys()
            .map(|ticker| normalize_ticker(ticker))
            .collect::<Result<Vec<_>>>()?;

        let target = self.portfolio_mut(portfolio)?;
        for ticker in tickers {
            target.add_stock(ticker);
        }
        for tx in planned {
            target.record(tx.clone());
        }
        Ok(())
    }
}

fn unknown(kind: &str, name: &str) -> FolioError {
    FolioError::invalid_argument(format!("No {} named '{}'", kind, name.trim()))
}

impl PortfolioModel for InvestmentModel {
    fn retrieve_strategies(&mut self) -> Result<usize> {
        let loaded = self.store.load_strategies()?;
        let count = loaded.len();
        for strategy in loaded {
            self.strategies.insert(strategy.name.clone(), strategy);
        }
        Ok(count)
    }

    fn retrieve_portfolios(&mut self) -> Result<usize> {
        let loaded = self.store.load_portfolios()?;
        let count = loaded.len();
        for portfolio in loaded {
            self.portfolios
                .insert(portfolio.name().to_string(), portfolio);
        }
        Ok(count)
    }

    fn create_portfolio(&mut self, name: &str) -> Result<()> {
        let portfolio = Portfolio::new(name)?;
        if self.portfolios.contains_key(portfolio.name()) {
            return Err(FolioError::invalid_argument(format!(
                "Portfolio '{}' already exists",
                portfolio.name()
            )));
        }
        debug!(name = portfolio.name(), "created portfolio");
        self.portfolios
            .insert(portfolio.name().to_string(), portfolio);
        Ok(())
    }

    fn portfolio_names(&self) -> Vec<String> {
        self.portfolios.keys().cloned().collect()
    }

    fn portfolio(&self, name: &str) -> Result<&Portfolio> {
        self.portfolios
            .get(name.trim())
            .ok_or_else(|| unknown("portfolio", name))
    }

    fn add_stock(&mut self, portfolio: &str, ticker: &str) -> Result<()> {
        let ticker = normalize_ticker(ticker)?;
        if self.prices.latest_date(&ticker).is_none() {
            return Err(FolioError::invalid_argument(format!(
                "No price data for {}",
                ticker
            )));
        }
        let target = self.portfolio_mut(portfolio)?;
        if !target.add_stock(ticker.clone()) {
            return Err(FolioError::invalid_argument(format!(
                "{} is already in portfolio '{}'",
                ticker,
                target.name()
            )));
        }
        Ok(())
    }

    fn buy_stock(
        &mut self,
        portfolio: &str,
        ticker: &str,
        shares: f64,
        date: NaiveDate,
        commission: f64,
    ) -> Result<Transaction> {
        if !shares.is_finite() || shares <= 0.0 || shares.fract() != 0.0 {
            return Err(FolioError::invalid_argument(format!(
                "Shares must be a positive whole number, got {}",
                shares
            )));
        }
        validate_commission(commission)?;
        let ticker = normalize_ticker(ticker)?;
        self.portfolio(portfolio)?;

        let price = self.quote(&ticker, date)?;
        let tx = Transaction {
            ticker,
            shares,
            price,
            date,
            commission,
        };
        self.portfolio_mut(portfolio)?.record(tx.clone());
        Ok(tx)
    }

    fn total_cost_basis(&self, portfolio: &str, date: NaiveDate) -> Result<f64> {
        Ok(self.portfolio(portfolio)?.cost_basis_on(date))
    }

    fn total_value(&self, portfolio: &str, date: NaiveDate) -> Result<f64> {
        let holdings = self.portfolio(portfolio)?.holdings_on(date);
        let mut total = 0.0;
        for (ticker, shares) in holdings {
            total += shares * self.quote(&ticker, date)?;
        }
        Ok(total)
    }

    fn invest(&mut self, portfolio: &str, investment: &Investment) -> Result<Vec<Transaction>> {
        self.portfolio(portfolio)?;
        let planned = self.plan_purchases(investment)?;
        self.record_weighted(portfolio, &investment.weights, &planned)?;
        Ok(planned)
    }

    fn create_strategy(&mut self, strategy: Strategy) -> Result<()> {
        if self.strategies.contains_key(&strategy.name) {
            return Err(FolioError::invalid_argument(format!(
                "Strategy '{}' already exists",
                strategy.name
            )));
        }
        debug!(name = %strategy.name, "created strategy");
        self.strategies.insert(strategy.name.clone(), strategy);
        Ok(())
    }

    fn strategy(&self, name: &str) -> Result<&Strategy> {
        self.strategies
            .get(name.trim())
            .ok_or_else(|| unknown("strategy", name))
    }

    fn apply_strategy(&mut self, strategy: &str, portfolio: &str) -> Result<Vec<Transaction>> {
        let strategy = self.strategy(strategy)?.clone();
        self.run_strategy(portfolio, &strategy)
    }

    fn apply_dollar_cost(
        &mut self,
        portfolio: &str,
        strategy: &Strategy,
    ) -> Result<Vec<Transaction>> {
        self.run_strategy(portfolio, strategy)
    }

    fn save_portfolio(&self, name: &str) -> Result<PathBuf> {
        self.store.save_portfolio(self.portfolio(name)?)
    }

    fn save_strategy(&self, name: &str) -> Result<PathBuf> {
        self.store.save_strategy(self.strategy(name)?)
    }

    fn save_session(&self) -> Result<usize> {
        for portfolio in self.portfolios.values() {
            self.store.save_portfolio(portfolio)?;
        }
        for strategy in self.strategies.values() {
            self.store.save_strategy(strategy)?;
        }
        Ok(self.portfolios.len() + self.strategies.len())
    }
}
