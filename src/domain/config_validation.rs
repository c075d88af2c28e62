//! Configuration validation.
//!
//! Validates all config fields before a matching run.

use crate::domain::account::AccountType;
use crate::domain::error::TradeTaggerError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_FROM_DATE: &str = "1970-01-01";
pub const DEFAULT_INTERVAL_SECS: i64 = 60;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TradeTaggerError> {
    validate_input(config)?;
    validate_poller(config)?;
    validate_account(config)?;
    validate_sqlite(config)?;
    Ok(())
}

fn validate_input(config: &dyn ConfigPort) -> Result<(), TradeTaggerError> {
    match config.get_string("input", "orders") {
        Some(path) if !path.trim().is_empty() => {}
        _ => {
            return Err(TradeTaggerError::ConfigMissing {
                section: "input".to_string(),
                key: "orders".to_string(),
            });
        }
    }

    if let Some(format) = config.get_string("input", "format") {
        let format = format.trim().to_lowercase();
        if format != "json" && format != "csv" {
            return Err(TradeTaggerError::ConfigInvalid {
                section: "input".to_string(),
                key: "format".to_string(),
                reason: "format must be json or csv".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_poller(config: &dyn ConfigPort) -> Result<(), TradeTaggerError> {
    let from_date = config.get_string("poller", "from_date");
    parse_from_date(from_date.as_deref())?;

    let interval = config.get_int("poller", "interval_secs", DEFAULT_INTERVAL_SECS);
    if interval <= 0 {
        return Err(TradeTaggerError::ConfigInvalid {
            section: "poller".to_string(),
            key: "interval_secs".to_string(),
            reason: "interval_secs must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_account(config: &dyn ConfigPort) -> Result<(), TradeTaggerError> {
    match config.get_string("account", "number") {
        Some(number) if !number.trim().is_empty() => {}
        _ => {
            return Err(TradeTaggerError::ConfigMissing {
                section: "account".to_string(),
                key: "number".to_string(),
            });
        }
    }

    if let Some(kind) = config.get_string("account", "type") {
        if AccountType::parse(&kind).is_none() {
            return Err(TradeTaggerError::ConfigInvalid {
                section: "account".to_string(),
                key: "type".to_string(),
                reason: "type must be paper or live".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_sqlite(config: &dyn ConfigPort) -> Result<(), TradeTaggerError> {
    let pool_size = config.get_int("sqlite", "pool_size", 4);
    if pool_size <= 0 {
        return Err(TradeTaggerError::ConfigInvalid {
            section: "sqlite".to_string(),
            key: "pool_size".to_string(),
            reason: "pool_size must be positive".to_string(),
        });
    }
    Ok(())
}

/// Parse `[poller] from_date`, falling back to [`DEFAULT_FROM_DATE`].
pub fn parse_from_date(value: Option<&str>) -> Result<NaiveDate, TradeTaggerError> {
    let raw = value.unwrap_or(DEFAULT_FROM_DATE).trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| TradeTaggerError::ConfigInvalid {
        section: "poller".to_string(),
        key: "from_date".to_string(),
        reason: "invalid date format (expected YYYY-MM-DD)".to_string(),
    })
}
