use std::fmt::Display;

use thiserror::Error;

use crate::util::decimal::NumberError;

/// Header fields which must appear exactly once on a note page.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum HeaderField {
    NoteNumber,
    TradeDate,
}

impl Display for HeaderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderField::NoteNumber => write!(f, "note number"),
            HeaderField::TradeDate => write!(f, "trade date"),
        }
    }
}

/// Everything that can go wrong while turning one page of text into a Note.
/// None of these are retryable; the text would not change.
#[derive(Error, PartialEq, Clone, Debug)]
pub enum NoteError {
    #[error("malformed number in {record}.{field}: {source}")]
    MalformedNumber {
        record: &'static str,
        field: &'static str,
        #[source]
        source: NumberError,
    },

    #[error("malformed date in {record}.{field}: \"{value}\"")]
    MalformedDate {
        record: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("unknown code in {record}.{field}: \"{value}\"")]
    UnknownCode {
        record: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("expected exactly one {field}, found {found}")]
    MissingHeaderField { field: HeaderField, found: usize },

    #[error("{record}: expected at least {expected} matches, found {found}")]
    MissingSummaryData {
        record: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("note {note_number}: total operations value is zero")]
    DivisionByZero { note_number: String },
}

impl NoteError {
    /// Adapter for map_err, annotating a parse failure with where it happened.
    pub fn number(
        record: &'static str,
        field: &'static str,
    ) -> impl Fn(NumberError) -> NoteError {
        move |source| NoteError::MalformedNumber { record, field, source }
    }
}
