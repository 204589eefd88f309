use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

// This was deprecated as a method on Decimal, so re-implement it.
// That implementation doesn't actually do zero checks, and can result
// in weird behaviour.
pub fn is_positive(d: &Decimal) -> bool {
    d.is_sign_positive() && !d.is_zero()
}

pub fn dollar_precision_str(d: &Decimal) -> String {
    format!("{:.2}", d)
}

/// The single-character D/C marker printed next to amounts on a note.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize)]
pub enum DebitCredit {
    Debit,
    Credit,
}

impl DebitCredit {
    /// Accepts the raw captured marker, which may still carry its line break.
    /// An empty marker is None (treated as a credit by the parser).
    pub fn from_marker(marker: &str) -> Result<Option<DebitCredit>, NumberError> {
        match marker.trim() {
            "" => Ok(None),
            "D" => Ok(Some(DebitCredit::Debit)),
            "C" => Ok(Some(DebitCredit::Credit)),
            other => Err(NumberError::Marker(other.to_string())),
        }
    }

    pub fn apply(dc: Option<DebitCredit>, magnitude: Decimal) -> Decimal {
        match dc {
            Some(DebitCredit::Debit) => -magnitude,
            Some(DebitCredit::Credit) | None => magnitude,
        }
    }
}

impl Display for DebitCredit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebitCredit::Debit => write!(f, "D"),
            DebitCredit::Credit => write!(f, "C"),
        }
    }
}

#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
pub enum NumberError {
    #[error("\"{0}\" is not a number of the form 1.234,56")]
    Decimal(String),
    #[error("\"{0}\" is not an integer")]
    Integer(String),
    #[error("\"{0}\" is not a D/C marker")]
    Marker(String),
}

lazy_static! {
    // Thousands grouped by '.', always two decimal places after the ','
    static ref BR_DECIMAL_RE: Regex =
        Regex::new(r"^[0-9]+(?:\.[0-9]+)*,[0-9]{2}$").unwrap();
    static ref BR_INTEGER_RE: Regex = Regex::new(r"^[0-9]+(?:\.[0-9]+)*$").unwrap();
}

/// Parses a pt-BR formatted amount ("1.234,56") into an exact Decimal,
/// negated when dc is Debit.
pub fn parse_br_decimal(
    s: &str,
    dc: Option<DebitCredit>,
) -> Result<Decimal, NumberError> {
    let trimmed = s.trim();
    if !BR_DECIMAL_RE.is_match(trimmed) {
        return Err(NumberError::Decimal(trimmed.to_string()));
    }
    let plain = trimmed.replace('.', "").replace(',', ".");
    let magnitude = Decimal::from_str_exact(&plain)
        .map_err(|_| NumberError::Decimal(trimmed.to_string()))?;
    Ok(DebitCredit::apply(dc, magnitude))
}

/// Same as parse_br_decimal, but takes the marker as captured text.
pub fn parse_br_decimal_marked(s: &str, marker: &str) -> Result<Decimal, NumberError> {
    parse_br_decimal(s, DebitCredit::from_marker(marker)?)
}

/// Parses share counts, which are printed without decimal places.
pub fn parse_br_integer(s: &str) -> Result<u64, NumberError> {
    let trimmed = s.trim();
    if !BR_INTEGER_RE.is_match(trimmed) {
        return Err(NumberError::Integer(trimmed.to_string()));
    }
    trimmed
        .replace('.', "")
        .parse::<u64>()
        .map_err(|_| NumberError::Integer(trimmed.to_string()))
}
