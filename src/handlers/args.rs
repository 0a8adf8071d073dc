//! Parsing of handler argument lines
//!
//! Every parse failure is an `InvalidArgument`, so a typo is reported and
//! the session carries on.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::core::{FolioError, Result};
use crate::portfolio::normalize_ticker;

/// Date format accepted on input and used on output
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        FolioError::invalid_argument(format!(
            "'{}' is not a date in YYYY-MM-DD form",
            raw.trim()
        ))
    })
}

/// `-` or an empty line means "no end date"
pub fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>> {
    match raw.trim() {
        "" | "-" => Ok(None),
        other => parse_date(other).map(Some),
    }
}

/// A finite decimal number, with an optional leading `$`
pub fn parse_number(label: &str, raw: &str) -> Result<f64> {
    let text = raw.trim();
    let text = text.strip_prefix('$').unwrap_or(text);
    text.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| {
            FolioError::invalid_argument(format!("{} '{}' is not a number", label, raw.trim()))
        })
}

pub fn parse_days(raw: &str) -> Result<u32> {
    raw.trim().parse::<u32>().map_err(|_| {
        FolioError::invalid_argument(format!(
            "Interval '{}' is not a whole number of days",
            raw.trim()
        ))
    })
}

/// Parse `TICKER=PCT` pairs separated by commas
pub fn parse_weights(raw: &str) -> Result<BTreeMap<String, f64>> {
    let mut weights = BTreeMap::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (ticker, pct) = pair.split_once('=').ok_or_else(|| {
            FolioError::invalid_argument(format!("Weight '{}' must look like TICKER=PERCENT", pair))
        })?;
        let ticker = normalize_ticker(ticker)?;
        let pct = parse_number("Weight", pct.trim_end_matches('%'))?;
        if weights.insert(ticker.clone(), pct).is_some() {
            return Err(FolioError::invalid_argument(format!(
                "{} is weighted more than once",
                ticker
            )));
        }
    }
    if weights.is_empty() {
        return Err(FolioError::invalid_argument("At least one weight is required"));
    }
    Ok(weights)
}

/// Render money for display
pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}
