//! Maps raw template captures into typed note records.

use itertools::Itertools;
use rust_decimal::Decimal;

use crate::util::date::parse_br_date;
use crate::util::decimal::{
    parse_br_decimal, parse_br_decimal_marked, parse_br_integer, DebitCredit,
};

use super::error::{HeaderField, NoteError};
use super::layout::Layout;
use super::model::note::{NoteHeader, ParsedNote};
use super::model::summary::{
    BusinessSummary, ClearingFees, ExchangeFees, FeeSummary, OperationalCosts,
};
use super::model::trade::{MarketType, Trade, TradeSide};
use super::template::{CaptureTuple, Extraction};

/// Where each fee summary entry lands once the matches are reversed.
///
/// The fee template reads value/label pairs top to bottom, and anything above
/// the fee block which happens to look like a pair (trade rows, for one) is
/// matched too. Counting from the bottom of the page is what stays stable.
pub mod fee_index {
    pub const NET_TOTAL: usize = 0;
    pub const OTHER: usize = 1;
    pub const WITHHELD_INCOME_TAX: usize = 2;
    pub const TAXES: usize = 3;
    pub const CUSTODY_FEE: usize = 4;
    pub const EXECUTION: usize = 5;
    pub const OPERATIONAL_FEE: usize = 6;
    pub const OPERATIONAL_TOTAL: usize = 7;
    pub const EMOLUMENTS: usize = 8;
    pub const ANA_FEE: usize = 9;
    pub const TERM_OPTIONS_FEE: usize = 10;
    pub const EXCHANGE_TOTAL: usize = 11;
    pub const REGISTRATION_FEE: usize = 12;
    pub const SETTLEMENT_FEE: usize = 13;
    pub const NET_OPERATIONS_VALUE: usize = 14;
    pub const CLEARING_TOTAL: usize = 15;

    /// Minimum number of matches for a complete fee summary.
    pub const COUNT: usize = 16;
}

const BUSINESS_SUMMARY_VALUE_COUNT: usize = 8;

/// Trims, and collapses internal runs of whitespace (newlines included) to a
/// single space.
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace().join(" ")
}

pub fn map_trade(m: &CaptureTuple) -> Result<Trade, NoteError> {
    const REC: &str = "trade";
    let dc = DebitCredit::from_marker(m.group("dc")).map_err(NoteError::number(REC, "dc"))?;

    let side = TradeSide::from_code(m.group("side")).ok_or_else(|| {
        NoteError::UnknownCode {
            record: REC,
            field: "side",
            value: m.group("side").to_string(),
        }
    })?;
    let market = MarketType::from_code(m.group("market")).ok_or_else(|| {
        NoteError::UnknownCode {
            record: REC,
            field: "market",
            value: m.group("market").to_string(),
        }
    })?;

    Ok(Trade {
        side,
        market,
        title: normalize_text(m.group("title")),
        quantity: parse_br_integer(m.group("quantity"))
            .map_err(NoteError::number(REC, "quantity"))?,
        price: parse_br_decimal(m.group("price"), dc)
            .map_err(NoteError::number(REC, "price"))?,
        operation_value: parse_br_decimal(m.group("value"), dc)
            .map_err(NoteError::number(REC, "operation_value"))?,
        annotation: normalize_text(m.group("annotation")),
        adjusted_price: None,
        adjusted_operation_value: None,
    })
}

pub fn map_trades(matches: &[CaptureTuple]) -> Result<Vec<Trade>, NoteError> {
    matches.iter().map(map_trade).collect()
}

/// Uses the first business summary block on the page.
pub fn map_business_summary(
    matches: &[CaptureTuple],
) -> Result<BusinessSummary, NoteError> {
    const REC: &str = "business summary";
    let m = matches.first().ok_or(NoteError::MissingSummaryData {
        record: REC,
        expected: 1,
        found: 0,
    })?;

    let values: Vec<&str> = m.group("values").split_whitespace().collect();
    if values.len() != BUSINESS_SUMMARY_VALUE_COUNT {
        return Err(NoteError::MissingSummaryData {
            record: REC,
            expected: BUSINESS_SUMMARY_VALUE_COUNT,
            found: values.len(),
        });
    }

    let val = |i: usize, field: &'static str, dc: DebitCredit| {
        parse_br_decimal(values[i], Some(dc)).map_err(NoteError::number(REC, field))
    };
    use crate::util::decimal::DebitCredit::{Credit, Debit};

    Ok(BusinessSummary {
        debentures: val(0, "debentures", Debit)?,
        cash_sales: val(1, "cash_sales", Credit)?,
        cash_purchases: val(2, "cash_purchases", Debit)?,
        option_purchases: val(3, "option_purchases", Debit)?,
        option_sales: val(4, "option_sales", Credit)?,
        forward_operations: val(5, "forward_operations", Debit)?,
        public_title_operations: val(6, "public_title_operations", Debit)?,
        total_operations_value: val(7, "total_operations_value", Debit)?,
    })
}

/// Returns the fee summary, and the note's net total ("Líquido para").
pub fn map_fee_summary(
    matches: &[CaptureTuple],
) -> Result<(FeeSummary, Decimal), NoteError> {
    const REC: &str = "fee summary";
    if matches.len() < fee_index::COUNT {
        return Err(NoteError::MissingSummaryData {
            record: REC,
            expected: fee_index::COUNT,
            found: matches.len(),
        });
    }

    let reversed: Vec<&CaptureTuple> = matches.iter().rev().collect();
    tracing::trace!(
        "map_fee_summary: {} matches, bottom label {:?}",
        reversed.len(),
        reversed[fee_index::NET_TOTAL].group("label")
    );
    let val = |i: usize, field: &'static str| {
        let m = reversed[i];
        parse_br_decimal_marked(m.group("value"), m.group("dc"))
            .map_err(NoteError::number(REC, field))
    };
    use self::fee_index as fi;

    let fees = FeeSummary {
        clearing: ClearingFees {
            net_operations_value: val(fi::NET_OPERATIONS_VALUE, "net_operations_value")?,
            settlement_fee: val(fi::SETTLEMENT_FEE, "settlement_fee")?,
            registration_fee: val(fi::REGISTRATION_FEE, "registration_fee")?,
            total: val(fi::CLEARING_TOTAL, "clearing_total")?,
        },
        exchange: ExchangeFees {
            term_options_fee: val(fi::TERM_OPTIONS_FEE, "term_options_fee")?,
            ana_fee: val(fi::ANA_FEE, "ana_fee")?,
            emoluments: val(fi::EMOLUMENTS, "emoluments")?,
            total: val(fi::EXCHANGE_TOTAL, "exchange_total")?,
        },
        operational: OperationalCosts {
            operational_fee: val(fi::OPERATIONAL_FEE, "operational_fee")?,
            execution: val(fi::EXECUTION, "execution")?,
            custody_fee: val(fi::CUSTODY_FEE, "custody_fee")?,
            taxes: val(fi::TAXES, "taxes")?,
            withheld_income_tax: val(fi::WITHHELD_INCOME_TAX, "withheld_income_tax")?,
            other: val(fi::OTHER, "other")?,
            total: val(fi::OPERATIONAL_TOTAL, "operational_total")?,
        },
        note_cost: None,
    };
    let net_total = val(fi::NET_TOTAL, "net_total")?;
    Ok((fees, net_total))
}

fn exactly_one(
    matches: &[CaptureTuple],
    field: HeaderField,
) -> Result<&CaptureTuple, NoteError> {
    match matches {
        [m] => Ok(m),
        _ => Err(NoteError::MissingHeaderField {
            field,
            found: matches.len(),
        }),
    }
}

pub fn map_header(ex: &Extraction) -> Result<NoteHeader, NoteError> {
    let number = exactly_one(&ex.note_number, HeaderField::NoteNumber)?
        .group("number")
        .trim()
        .to_string();
    let date_str = exactly_one(&ex.trade_date, HeaderField::TradeDate)?.group("date");
    let trade_date = parse_br_date(date_str).map_err(|_| NoteError::MalformedDate {
        record: "header",
        field: "trade_date",
        value: date_str.to_string(),
    })?;
    Ok(NoteHeader { number, trade_date })
}

/// Maps a whole page. The header goes first, so a page which is not a note
/// at all reports the missing header rather than missing summaries.
pub fn map_note(layout: Layout, ex: &Extraction) -> Result<ParsedNote, NoteError> {
    let header = map_header(ex)?;
    let trades = map_trades(&ex.trades)?;
    let business_summary = map_business_summary(&ex.business_summary)?;
    let (fee_summary, net_total) = map_fee_summary(&ex.fee_summary)?;
    Ok(ParsedNote {
        layout,
        header,
        trades,
        business_summary,
        fee_summary,
        net_total,
    })
}
