use rust_decimal::Decimal;
use serde::Serialize;

use crate::util::date::to_standard_string;
use crate::util::decimal::dollar_precision_str;

use super::model::note::Note;

#[derive(Serialize)]
pub struct RenderTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub footer: Vec<String>,
    pub notes: Vec<String>,
    pub errors: Vec<String>,
}

fn opt_dollar_str(d: &Option<Decimal>) -> String {
    d.as_ref().map(dollar_precision_str).unwrap_or_default()
}

fn strs(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// One row per note, with the batch totals in the footer.
pub fn render_notes_table(notes: &[Note], errors: &[String]) -> RenderTable {
    let header = strs(&[
        "Note",
        "Trade Date",
        "Layout",
        "Trades",
        "Total Operations",
        "Note Cost",
        "Net Total",
    ]);

    let mut total_cost = Decimal::ZERO;
    let mut total_net = Decimal::ZERO;
    let rows = notes
        .iter()
        .map(|n| {
            total_cost += n.note_cost;
            total_net += n.net_total;
            vec![
                n.header.number.clone(),
                to_standard_string(&n.header.trade_date),
                n.layout.to_string(),
                n.trades.len().to_string(),
                dollar_precision_str(&n.business_summary.total_operations_value),
                dollar_precision_str(&n.note_cost),
                dollar_precision_str(&n.net_total),
            ]
        })
        .collect();

    let footer = if notes.is_empty() {
        vec![]
    } else {
        vec![
            "Total".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            dollar_precision_str(&total_cost),
            dollar_precision_str(&total_net),
        ]
    };

    RenderTable {
        header,
        rows,
        footer,
        notes: vec![],
        errors: errors.to_vec(),
    }
}

/// One row per trade, in each note's apportionment order.
pub fn render_trades_table(notes: &[Note], errors: &[String]) -> RenderTable {
    let header = strs(&[
        "Note",
        "Trade Date",
        "Side",
        "Market",
        "Title",
        "Annotation",
        "Quantity",
        "Price",
        "Operation Value",
        "Adjusted Price",
        "Adjusted Operation Value",
    ]);

    let mut rows = Vec::new();
    for n in notes {
        let date = to_standard_string(&n.header.trade_date);
        for t in &n.trades {
            rows.push(vec![
                n.header.number.clone(),
                date.clone(),
                t.side.to_string(),
                t.market.to_string(),
                t.title.clone(),
                t.annotation.clone(),
                t.quantity.to_string(),
                dollar_precision_str(&t.price),
                dollar_precision_str(&t.operation_value),
                opt_dollar_str(&t.adjusted_price),
                opt_dollar_str(&t.adjusted_operation_value),
            ]);
        }
    }

    let notes_without_trades = notes.iter().filter(|n| n.trades.is_empty()).count();
    let table_notes = if notes_without_trades > 0 {
        vec![format!("{notes_without_trades} note(s) had no trades")]
    } else {
        vec![]
    };

    RenderTable {
        header,
        rows,
        footer: vec![],
        notes: table_notes,
        errors: errors.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use crate::nota::reader::tests::CLEAR_PAGE;
    use crate::nota::reader::{read_page, ReadOptions};
    use crate::testlib::assert_vec_eq;

    use super::{render_notes_table, render_trades_table};

    #[test]
    fn test_render_notes_table() {
        let note = read_page(CLEAR_PAGE, &ReadOptions::default()).unwrap();
        let errors = vec!["page 3: bad".to_string()];
        let table = render_notes_table(&[note.clone(), note], &errors);
        assert_eq!(table.header.len(), 7);
        assert_vec_eq(
            table.rows[0].clone(),
            vec![
                "12345".to_string(),
                "2023-03-15".to_string(),
                "clear".to_string(),
                "2".to_string(),
                "-100000.00".to_string(),
                "-35.00".to_string(),
                "-100035.00".to_string(),
            ],
        );
        assert_eq!(table.footer[5], "-70.00");
        assert_eq!(table.footer[6], "-200070.00");
        assert_eq!(
            table.errors,
            vec!["page 3: bad".to_string()]
        );
    }

    #[test]
    fn test_render_trades_table() {
        let note = read_page(CLEAR_PAGE, &ReadOptions::default()).unwrap();
        let table = render_trades_table(&[note], &[]);
        assert_eq!(table.rows.len(), 2);
        assert_vec_eq(
            table.rows[1].clone(),
            vec![
                "12345".to_string(),
                "2023-03-15".to_string(),
                "Buy".to_string(),
                "FRACIONARIO".to_string(),
                "ITSA4 PN".to_string(),
                "#".to_string(),
                "200".to_string(),
                "-200.00".to_string(),
                "-40000.00".to_string(),
                "-214.00".to_string(),
                "-40014.00".to_string(),
            ],
        );
        assert!(table.notes.is_empty());
        assert!(table.footer.is_empty());
    }
}
