//! Loose date and number inputs from forms, CSV rows and manifests

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A JSON/TOML value that may arrive as a number or as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("Invalid date: {0}")]
    Date(String),

    #[error("Invalid number: {0}")]
    Number(String),
}

impl NumberOrText {
    pub fn is_blank(&self) -> bool {
        matches!(self, NumberOrText::Text(text) if text.trim().is_empty())
    }

    /// Unix seconds; text goes through [`parse_date`]
    pub fn to_timestamp(&self) -> Result<u64, ValueError> {
        match self {
            NumberOrText::Number(secs) => Ok(*secs),
            NumberOrText::Text(text) => parse_date(text),
        }
    }

    pub fn to_number(&self) -> Result<u64, ValueError> {
        match self {
            NumberOrText::Number(value) => Ok(*value),
            NumberOrText::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| ValueError::Number(text.trim().to_string())),
        }
    }
}

impl From<u64> for NumberOrText {
    fn from(value: u64) -> Self {
        NumberOrText::Number(value)
    }
}

impl From<&str> for NumberOrText {
    fn from(value: &str) -> Self {
        NumberOrText::Text(value.to_string())
    }
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse unix seconds, RFC 3339, `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS]` (UTC).
pub fn parse_date(text: &str) -> Result<u64, ValueError> {
    let text = text.trim();
    let invalid = || ValueError::Date(text.to_string());

    if text.is_empty() {
        return Err(invalid());
    }
    if text.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse().map_err(|_| invalid());
    }

    let seconds = if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        dt.timestamp()
    } else if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?.and_utc().timestamp()
    } else {
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .ok_or_else(invalid)?
            .and_utc()
            .timestamp()
    };

    u64::try_from(seconds).map_err(|_| invalid())
}
