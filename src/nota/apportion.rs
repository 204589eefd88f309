//! Distributes a note's costs across its trades.

use rust_decimal::Decimal;

use crate::util::decimal::is_positive;

use super::error::NoteError;
use super::model::note::{Note, ParsedNote};
use super::model::summary::FeeSummary;

/// The apportionable cost of a note: clearing settlement and registration,
/// every exchange field (its total included), and the operational total,
/// less the withheld income tax.
pub fn note_cost(fees: &FeeSummary) -> Decimal {
    (fees.clearing.registration_fee + fees.clearing.settlement_fee)
        + fees.exchange.sum()
        + fees.operational.total
        - fees.operational.withheld_income_tax
}

/// Computes the note cost and each trade's adjusted price and operation value.
///
/// Trades are visited largest absolute operation value first, and each is
/// adjusted by its share of the cost (operation value times the ideal
/// fraction), rounded to whole units with banker's rounding. The residual
/// starts at the note cost and has every adjustment added to it. If it ends
/// up positive, the last (smallest) trade's adjusted values are replaced by
/// its original values less the residual.
///
/// The parsed note is consumed, so a note is never apportioned twice.
pub fn apportion_costs(note: ParsedNote) -> Result<Note, NoteError> {
    let ParsedNote {
        layout,
        header,
        mut trades,
        business_summary,
        mut fee_summary,
        net_total,
    } = note;

    let cost = note_cost(&fee_summary);
    let total_value = business_summary.total_operations_value;
    if total_value.is_zero() {
        return Err(NoteError::DivisionByZero {
            note_number: header.number,
        });
    }
    let ideal_fraction = cost / total_value;
    tracing::info!("Apportionable cost of note {} -> {}", header.number, cost);

    // sort_by is stable, so ties keep page order.
    trades.sort_by(|a, b| b.operation_value.abs().cmp(&a.operation_value.abs()));

    let mut residual = cost;
    for trade in trades.iter_mut() {
        let adjustment = (trade.operation_value * ideal_fraction).abs().round();
        trade.set_adjustment(adjustment);
        residual += adjustment;
        tracing::debug!(
            "apportion_costs: {} {} adjusted by {}",
            header.number,
            trade.title,
            adjustment
        );
    }

    if is_positive(&residual) {
        match trades.last_mut() {
            Some(last) => {
                tracing::debug!(
                    "apportion_costs: {} residual {} goes to {}",
                    header.number,
                    residual,
                    last.title
                );
                last.set_adjustment(residual.abs());
            }
            None => tracing::warn!(
                "Note {} has residual cost {} but no trades",
                header.number,
                residual
            ),
        }
    }

    fee_summary.note_cost = Some(cost);
    Ok(Note {
        layout,
        header,
        trades,
        business_summary,
        fee_summary,
        net_total,
        note_cost: cost,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, Month};

    use crate::nota::error::NoteError;
    use crate::nota::layout::Layout;
    use crate::nota::model::note::{NoteHeader, ParsedNote};
    use crate::nota::model::summary::{
        BusinessSummary, ClearingFees, ExchangeFees, FeeSummary, OperationalCosts,
    };
    use crate::nota::model::trade::{MarketType, Trade, TradeSide};

    use super::{apportion_costs, note_cost};

    fn trade(title: &str, price: Decimal, value: Decimal) -> Trade {
        Trade {
            side: TradeSide::Buy,
            market: MarketType::Spot,
            title: title.to_string(),
            quantity: 100,
            price,
            operation_value: value,
            annotation: String::new(),
            adjusted_price: None,
            adjusted_operation_value: None,
        }
    }

    fn fees(settlement: Decimal) -> FeeSummary {
        FeeSummary {
            clearing: ClearingFees {
                net_operations_value: Decimal::ZERO,
                settlement_fee: settlement,
                registration_fee: Decimal::ZERO,
                total: settlement,
            },
            exchange: ExchangeFees {
                term_options_fee: Decimal::ZERO,
                ana_fee: Decimal::ZERO,
                emoluments: Decimal::ZERO,
                total: Decimal::ZERO,
            },
            operational: OperationalCosts {
                operational_fee: Decimal::ZERO,
                execution: Decimal::ZERO,
                custody_fee: Decimal::ZERO,
                taxes: Decimal::ZERO,
                withheld_income_tax: Decimal::ZERO,
                other: Decimal::ZERO,
                total: Decimal::ZERO,
            },
            note_cost: None,
        }
    }

    fn parsed_note(trades: Vec<Trade>, fee_summary: FeeSummary, total: Decimal) -> ParsedNote {
        ParsedNote {
            layout: Layout::Clear,
            header: NoteHeader {
                number: "1".to_string(),
                trade_date: Date::from_calendar_date(2023, Month::March, 15).unwrap(),
            },
            trades,
            business_summary: BusinessSummary {
                debentures: Decimal::ZERO,
                cash_sales: Decimal::ZERO,
                cash_purchases: total,
                option_purchases: Decimal::ZERO,
                option_sales: Decimal::ZERO,
                forward_operations: Decimal::ZERO,
                public_title_operations: Decimal::ZERO,
                total_operations_value: total,
            },
            fee_summary,
            net_total: Decimal::ZERO,
        }
    }

    fn adjusted_values(trades: &[Trade]) -> Vec<(String, Option<Decimal>)> {
        trades
            .iter()
            .map(|t| (t.title.clone(), t.adjusted_operation_value))
            .collect()
    }

    #[test]
    fn test_note_cost() {
        let mut f = fees(dec!(1.00));
        f.clearing.registration_fee = dec!(2.00);
        // Not part of the cost
        f.clearing.total = dec!(100.00);
        f.clearing.net_operations_value = dec!(100.00);
        f.operational.custody_fee = dec!(100.00);

        f.exchange = ExchangeFees {
            term_options_fee: dec!(0.10),
            ana_fee: dec!(0.20),
            emoluments: dec!(0.30),
            total: dec!(0.60),
        };
        f.operational.total = dec!(5.00);
        f.operational.withheld_income_tax = dec!(0.05);
        assert_eq!(note_cost(&f), dec!(3.00) + dec!(1.20) + dec!(5.00) - dec!(0.05));
    }

    #[test]
    fn test_scenario_two_trades_positive_residual() {
        let note = parsed_note(
            vec![
                trade("SMALL", dec!(4.00), dec!(400.00)),
                trade("BIG", dec!(6.00), dec!(600.00)),
            ],
            fees(dec!(10.00)),
            dec!(1000.00),
        );
        let note = apportion_costs(note).unwrap();

        assert_eq!(note.note_cost, dec!(10.00));
        assert_eq!(note.fee_summary.note_cost, Some(dec!(10.00)));
        // Sorted, largest first. BIG got 6. SMALL got 4, but the residual
        // (10 + 6 + 4 = 20) then replaced it.
        assert_eq!(
            adjusted_values(&note.trades),
            vec![
                ("BIG".to_string(), Some(dec!(594.00))),
                ("SMALL".to_string(), Some(dec!(380.00))),
            ]
        );
        assert_eq!(note.trades[0].adjusted_price, Some(dec!(0.00)));
        assert_eq!(note.trades[1].adjusted_price, Some(dec!(-16.00)));
        // Originals untouched
        assert_eq!(note.trades[1].operation_value, dec!(400.00));
    }

    #[test]
    fn test_no_overwrite_when_residual_not_positive() {
        // Debit fees and purchases, as printed on a buy-only note.
        let note = parsed_note(
            vec![
                trade("A", dec!(-200.00), dec!(-40000.00)),
                trade("B", dec!(-600.00), dec!(-60000.00)),
            ],
            {
                let mut f = fees(dec!(-25.00));
                f.exchange.emoluments = dec!(-5.00);
                f.exchange.total = dec!(-5.00);
                f
            },
            dec!(-100000.00),
        );
        let note = apportion_costs(note).unwrap();
        assert_eq!(note.note_cost, dec!(-35.00));
        // -35 + 21 + 14 == 0, so both keep their proportional adjustment.
        assert_eq!(
            adjusted_values(&note.trades),
            vec![
                ("B".to_string(), Some(dec!(-60021.00))),
                ("A".to_string(), Some(dec!(-40014.00))),
            ]
        );
        assert_eq!(note.trades[0].adjusted_price, Some(dec!(-621.00)));
        assert_eq!(note.trades[1].adjusted_price, Some(dec!(-214.00)));
    }

    #[test]
    fn test_bankers_rounding() {
        // Fraction 0.01: 2.5 rounds to 2, 3.5 rounds to 4.
        let note = parsed_note(
            vec![
                trade("A", dec!(-1.00), dec!(-250.00)),
                trade("B", dec!(-1.00), dec!(-350.00)),
                trade("C", dec!(-1.00), dec!(-400.00)),
            ],
            fees(dec!(-10.00)),
            dec!(-1000.00),
        );
        let note = apportion_costs(note).unwrap();
        // residual -10 + 4 + 4 + 2 = 0
        assert_eq!(
            adjusted_values(&note.trades),
            vec![
                ("C".to_string(), Some(dec!(-404.00))),
                ("B".to_string(), Some(dec!(-354.00))),
                ("A".to_string(), Some(dec!(-252.00))),
            ]
        );
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let note = parsed_note(
            vec![
                trade("FIRST", dec!(1.00), dec!(100.00)),
                trade("SECOND", dec!(-1.00), dec!(-100.00)),
                trade("BIGGEST", dec!(1.00), dec!(300.00)),
                trade("THIRD", dec!(1.00), dec!(100.00)),
            ],
            fees(dec!(0.00)),
            dec!(600.00),
        );
        let note = apportion_costs(note).unwrap();
        let titles: Vec<&str> = note.trades.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["BIGGEST", "FIRST", "SECOND", "THIRD"]);
        // Zero cost: nothing moves
        for t in &note.trades {
            assert_eq!(t.adjusted_operation_value, Some(t.operation_value));
        }
    }

    #[test]
    fn test_division_by_zero() {
        let note = parsed_note(
            vec![trade("A", dec!(1.00), dec!(100.00))],
            fees(dec!(1.00)),
            dec!(0.00),
        );
        assert_eq!(
            apportion_costs(note).unwrap_err(),
            NoteError::DivisionByZero {
                note_number: "1".to_string()
            }
        );
    }

    #[test]
    fn test_no_trades() {
        let note = parsed_note(vec![], fees(dec!(3.00)), dec!(100.00));
        let note = apportion_costs(note).unwrap();
        assert!(note.trades.is_empty());
        assert_eq!(note.note_cost, dec!(3.00));
    }
}
