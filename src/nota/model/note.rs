use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::nota::layout::Layout;
use crate::util::date::serialize_date;

use super::summary::{BusinessSummary, FeeSummary};
use super::trade::Trade;

#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct NoteHeader {
    // Kept as text; some brokers zero-pad it.
    pub number: String,
    #[serde(serialize_with = "serialize_date")]
    pub trade_date: Date,
}

/// A note as mapped from its page text, before costs are apportioned.
/// It can only become a Note through apportion_costs, which consumes it.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ParsedNote {
    pub layout: Layout,
    pub header: NoteHeader,
    pub trades: Vec<Trade>,
    pub business_summary: BusinessSummary,
    pub fee_summary: FeeSummary,
    /// "Líquido para" amount at the bottom of the fee summary.
    pub net_total: Decimal,
}

/// A finalized note: trades carry their adjusted values, and the note cost
/// has been computed.
#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct Note {
    pub layout: Layout,
    pub header: NoteHeader,
    /// In apportionment order (largest absolute operation value first).
    pub trades: Vec<Trade>,
    pub business_summary: BusinessSummary,
    pub fee_summary: FeeSummary,
    pub net_total: Decimal,
    pub note_cost: Decimal,
}

/// Notes of one document (or several), in page order.
#[derive(PartialEq, Eq, Clone, Debug, Default, Serialize)]
pub struct NoteBatch {
    pub notes: Vec<Note>,
}
