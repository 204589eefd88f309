use std::io::Write;

use tabled::settings::{
    object::{Cell, Columns, Rows},
    style::On,
    Alignment, Border,
};
use tabled::Table;

use crate::nota::render::RenderTable;
use crate::util::rw::WriteHandle;

use super::model::{Error, NoteWriter, OutputType};

/// Renders tables as aligned ascii text, for reading in a terminal.
pub struct TextWriter {
    w: WriteHandle,
}

impl TextWriter {
    pub fn new(w: WriteHandle) -> TextWriter {
        TextWriter { w }
    }
}

struct CellBorder {
    top: char,
    bottom: char,
    left: char,
    right: char,
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
}

impl CellBorder {
    fn to_border(&self) -> Border<On, On, On, On> {
        Border::full(
            self.top,
            self.bottom,
            self.left,
            self.right,
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        )
    }

    fn blank() -> CellBorder {
        Self::filled(' ', ' ', ' ')
    }

    fn filled(horizontal: char, vertical: char, corner: char) -> CellBorder {
        Self {
            top: horizontal,
            bottom: horizontal,
            left: vertical,
            right: vertical,
            top_left: corner,
            top_right: corner,
            bottom_left: corner,
            bottom_right: corner,
        }
    }
}

impl Default for CellBorder {
    fn default() -> Self {
        Self::filled('-', '|', '+')
    }
}

/// The header row has no outer frame above it, and the outer columns have no
/// frame at their sides.
fn open_frame(table: &mut Table, n_cols: usize) {
    table.modify(
        Rows::first(),
        CellBorder {
            top: ' ',
            top_left: ' ',
            top_right: ' ',
            ..Default::default()
        }
        .to_border(),
    );
    table.modify(
        Columns::first(),
        CellBorder {
            left: ' ',
            top_left: '-',
            bottom_left: '-',
            ..Default::default()
        }
        .to_border(),
    );
    table.modify(
        Columns::last(),
        CellBorder {
            right: ' ',
            top_right: '-',
            bottom_right: '-',
            ..Default::default()
        }
        .to_border(),
    );
    for (col, left, right, bottom_left, bottom_right) in
        [(0, ' ', '|', '-', '+'), (n_cols - 1, '|', ' ', '+', '-')]
    {
        table.modify(
            Cell::new(0, col),
            CellBorder {
                top: ' ',
                top_left: ' ',
                top_right: ' ',
                left,
                right,
                bottom_left,
                bottom_right,
                ..Default::default()
            }
            .to_border(),
        );
    }
}

/// Totals sit in their own boxes below the table, one blank row down. Only
/// non-empty footer cells get a box.
fn detach_footer(table: &mut Table, footer: &[String], sep_row: usize) {
    let footer_row = sep_row + 1;
    table.modify(
        Rows::single(sep_row),
        Border::new().set_left(' ').set_right(' '),
    );
    table.modify(Rows::single(footer_row), CellBorder::blank().to_border());

    for (col, _) in footer.iter().enumerate().filter(|(_, c)| !c.is_empty()) {
        for row in [sep_row, footer_row] {
            table.modify(Cell::new(row, col), CellBorder::default().to_border());
        }
    }
}

fn build_table(table_model: &RenderTable) -> Table {
    let mut bldr = tabled::builder::Builder::default();
    bldr.push_record(table_model.header.iter().map(|h| h.to_uppercase()));
    for row in &table_model.rows {
        bldr.push_record(row);
    }

    let has_footer = !table_model.footer.is_empty();
    if has_footer {
        bldr.push_record(vec![String::new(); table_model.footer.len()]);
        bldr.push_record(table_model.footer.clone());
    }

    let mut table = bldr.build();
    table.with(tabled::settings::Style::ascii());
    table.modify(Rows::first(), Alignment::center());

    let n_cols = table_model.header.len();
    if n_cols > 0 {
        open_frame(&mut table, n_cols);
    }
    if has_footer {
        detach_footer(&mut table, &table_model.footer, 1 + table_model.rows.len());
    }
    table
}

impl NoteWriter for TextWriter {
    fn print_render_table(
        &mut self,
        out_type: OutputType,
        table_model: &RenderTable,
    ) -> Result<(), Error> {
        let map_write_err = |e| format!("{e}");

        for err in &table_model.errors {
            writeln!(self.w, "[!] {}", err).map_err(map_write_err)?;
        }

        writeln!(self.w, "{}", out_type.title()).map_err(map_write_err)?;
        if table_model.rows.is_empty() {
            writeln!(self.w, "(none)\n").map_err(map_write_err)?;
            return Ok(());
        }

        let table = build_table(table_model);
        writeln!(self.w, "{table}").map_err(map_write_err)?;

        for note in &table_model.notes {
            writeln!(self.w, "{note}").map_err(map_write_err)?;
        }
        writeln!(self.w).map_err(map_write_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::app::outfmt::model::{NoteWriter, OutputType};
    use crate::nota::render::RenderTable;
    use crate::util::rw::WriteHandle;

    use super::TextWriter;

    fn table(rows: Vec<Vec<&str>>) -> RenderTable {
        let s = |v: Vec<&str>| -> Vec<String> { v.into_iter().map(String::from).collect() };
        RenderTable {
            header: s(vec!["Note", "Cost"]),
            rows: rows.into_iter().map(s).collect(),
            footer: s(vec!["Total", "3.00"]),
            notes: s(vec!["a note"]),
            errors: s(vec!["page 2: broken"]),
        }
    }

    #[test]
    fn test_print_render_table() {
        let (w, buff) = WriteHandle::string_buff_write_handle();
        let mut tw = TextWriter::new(w);
        tw.print_render_table(OutputType::Notes, &table(vec![vec!["1", "3.00"]]))
            .unwrap();
        let out = buff.borrow_mut().export_string();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "[!] page 2: broken");
        assert_eq!(lines[1], "Notes");
        assert!(out.contains("NOTE"));
        assert!(out.contains("COST"));
        assert!(out.contains("Total"));
        assert!(out.contains("a note\n"));
    }

    #[test]
    fn test_print_empty_table() {
        let (w, buff) = WriteHandle::string_buff_write_handle();
        let mut tw = TextWriter::new(w);
        tw.print_render_table(OutputType::Trades, &table(vec![])).unwrap();
        let out = buff.borrow_mut().export_string();
        assert_eq!(out, "[!] page 2: broken\nTrades\n(none)\n\n");
    }
}
