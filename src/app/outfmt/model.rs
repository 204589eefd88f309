use crate::nota::model::note::NoteBatch;
use crate::nota::render::{render_notes_table, render_trades_table, RenderTable};

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum OutputType {
    Notes,
    Trades,
}

impl OutputType {
    pub fn title(&self) -> &'static str {
        match self {
            OutputType::Notes => "Notes",
            OutputType::Trades => "Trades",
        }
    }

    /// Base name for files written per table.
    pub fn file_stem(&self) -> &'static str {
        match self {
            OutputType::Notes => "notes",
            OutputType::Trades => "trades",
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Csv,
    Text,
    Json,
}

pub type Error = String;

pub trait NoteWriter {
    fn print_render_table(
        &mut self,
        out_type: OutputType,
        table_model: &RenderTable,
    ) -> Result<(), Error>;

    /// Prints the notes table, then the trades table.
    /// errors are the pages which could not be read.
    fn print_batch(&mut self, batch: &NoteBatch, errors: &[String]) -> Result<(), Error> {
        self.print_render_table(
            OutputType::Notes,
            &render_notes_table(&batch.notes, errors),
        )?;
        // Errors were already reported with the notes.
        self.print_render_table(OutputType::Trades, &render_trades_table(&batch.notes, &[]))
    }

    fn finish(self: Box<Self>) -> Result<(), Error> {
        Ok(())
    }
}
