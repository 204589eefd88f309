use rust_decimal::Decimal;
use serde::Serialize;

/// "Resumo dos Negócios" block. Each total has a fixed sign, regardless of
/// any marker on the page: sales are credits, everything else debits.
#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct BusinessSummary {
    pub debentures: Decimal,
    pub cash_sales: Decimal,
    pub cash_purchases: Decimal,
    pub option_purchases: Decimal,
    pub option_sales: Decimal,
    pub forward_operations: Decimal,
    pub public_title_operations: Decimal,
    pub total_operations_value: Decimal,
}

#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct ClearingFees {
    pub net_operations_value: Decimal,
    pub settlement_fee: Decimal,
    pub registration_fee: Decimal,
    pub total: Decimal,
}

#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct ExchangeFees {
    pub term_options_fee: Decimal,
    pub ana_fee: Decimal,
    pub emoluments: Decimal,
    pub total: Decimal,
}

impl ExchangeFees {
    /// Sum over every field of the bucket, the bucket total included.
    pub fn sum(&self) -> Decimal {
        self.term_options_fee + self.ana_fee + self.emoluments + self.total
    }
}

#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct OperationalCosts {
    pub operational_fee: Decimal,
    pub execution: Decimal,
    pub custody_fee: Decimal,
    pub taxes: Decimal,
    pub withheld_income_tax: Decimal,
    pub other: Decimal,
    pub total: Decimal,
}

/// "Resumo Financeiro" block.
#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct FeeSummary {
    pub clearing: ClearingFees,
    pub exchange: ExchangeFees,
    pub operational: OperationalCosts,
    /// Set by cost apportionment.
    pub note_cost: Option<Decimal>,
}
