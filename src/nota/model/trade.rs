use std::fmt::Display;

use rust_decimal::Decimal;
use serde::Serialize;

/// C (compra) or V (venda) column of the negotiated securities table.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn from_code(code: &str) -> Option<TradeSide> {
        match code.trim() {
            "C" => Some(TradeSide::Buy),
            "V" => Some(TradeSide::Sell),
            _ => None,
        }
    }
}

impl Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "Buy"),
            TradeSide::Sell => write!(f, "Sell"),
        }
    }
}

/// Spot lots (VISTA) or odd lots (FRACIONARIO)
#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize)]
pub enum MarketType {
    Spot,
    OddLot,
}

impl MarketType {
    pub fn from_code(code: &str) -> Option<MarketType> {
        match code.trim() {
            "VISTA" => Some(MarketType::Spot),
            "FRACIONARIO" => Some(MarketType::OddLot),
            _ => None,
        }
    }
}

impl Display for MarketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketType::Spot => write!(f, "VISTA"),
            MarketType::OddLot => write!(f, "FRACIONARIO"),
        }
    }
}

/// One row of the negotiated securities table.
///
/// price and operation_value carry the sign of the row's D/C marker
/// (debit is negative). The adjusted fields stay None until cost
/// apportionment has run over the owning note.
#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct Trade {
    pub side: TradeSide,
    pub market: MarketType,
    pub title: String,
    pub quantity: u64,
    pub price: Decimal,
    pub operation_value: Decimal,
    // Market/fraction indicator column, eg. "#"
    pub annotation: String,

    pub adjusted_price: Option<Decimal>,
    pub adjusted_operation_value: Option<Decimal>,
}

impl Trade {
    pub fn set_adjustment(&mut self, amount: Decimal) {
        self.adjusted_price = Some(self.price - amount);
        self.adjusted_operation_value = Some(self.operation_value - amount);
    }
}
