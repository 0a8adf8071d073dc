//! JSON persistence for portfolios and strategies
//!
//! One file per item: `<dir>/<name>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::{Config, FolioError, Result};
use crate::portfolio::{Portfolio, Strategy};

/// Items saved one file per name
trait Persisted: Serialize + DeserializeOwned {
    fn file_name(&self) -> &str;

    fn check(&self) -> Result<()>;
}

impl Persisted for Portfolio {
    fn file_name(&self) -> &str {
        self.name()
    }

    fn check(&self) -> Result<()> {
        self.validate()
    }
}

impl Persisted for Strategy {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn check(&self) -> Result<()> {
        self.validate()
    }
}

/// File-backed storage for the domain model
#[derive(Debug, Clone)]
pub struct Store {
    portfolio_dir: PathBuf,
    strategy_dir: PathBuf,
}

impl Store {
    pub fn new(portfolio_dir: impl Into<PathBuf>, strategy_dir: impl Into<PathBuf>) -> Self {
        Self {
            portfolio_dir: portfolio_dir.into(),
            strategy_dir: strategy_dir.into(),
        }
    }

    /// Store rooted at the configured data directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.portfolio_dir(), config.strategy_dir())
    }

    /// Read every saved portfolio
    pub fn load_portfolios(&self) -> Result<Vec<Portfolio>> {
        load_dir(&self.portfolio_dir, "portfolio")
    }

    /// Read every saved strategy
    pub fn load_strategies(&self) -> Result<Vec<Strategy>> {
        load_dir(&self.strategy_dir, "strategy")
    }

    pub fn save_portfolio(&self, portfolio: &Portfolio) -> Result<PathBuf> {
        save_item(&self.portfolio_dir, portfolio.name(), portfolio)
    }

    pub fn save_strategy(&self, strategy: &Strategy) -> Result<PathBuf> {
        save_item(&self.strategy_dir, &strategy.name, strategy)
    }
}

fn load_dir<T: Persisted>(dir: &Path, kind: &str) -> Result<Vec<T>> {
    if !dir.exists() {
        debug!(dir = %dir.display(), "no saved {} directory", kind);
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| {
        FolioError::invalid_state(format!("Failed to list {}: {}", dir.display(), e))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| {
                FolioError::invalid_state(format!("Failed to list {}: {}", dir.display(), e))
            })?
            .path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path).map_err(|e| {
            FolioError::invalid_state(format!("Failed to read {} {}: {}", kind, path.display(), e))
        })?;
        let item: T = serde_json::from_str(&content).map_err(|e| {
            FolioError::invalid_state(format!("Corrupt {} file {}: {}", kind, path.display(), e))
        })?;
        item.check().map_err(|e| {
            FolioError::invalid_state(format!("Invalid {} file {}: {}", kind, path.display(), e))
        })?;
        // File stems are unique within a directory, so names are too
        if path.file_stem().and_then(|stem| stem.to_str()) != Some(item.file_name()) {
            return Err(FolioError::invalid_state(format!(
                "{} file {} holds '{}'; the name must match the file name",
                kind,
                path.display(),
                item.file_name()
            )));
        }
        items.push(item);
    }

    info!(count = items.len(), "loaded saved {} files", kind);
    Ok(items)
}

fn save_item<T: Serialize>(dir: &Path, name: &str, item: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|e| FolioError::with_context(format!("Failed to create {}", dir.display()), e))?;

    let path = dir.join(format!("{}.json", name));
    let content = serde_json::to_string_pretty(item)?;
    fs::write(&path, content)
        .map_err(|e| FolioError::with_context(format!("Failed to write {}", path.display()), e))?;

    debug!(path = %path.display(), "saved");
    Ok(path)
}
