use std::io::Write;

use serde::Serialize;

use crate::nota::model::note::{Note, NoteBatch};
use crate::nota::render::RenderTable;
use crate::util::rw::WriteHandle;

use super::model::{Error, NoteWriter, OutputType};

/// Dumps the notes themselves rather than their tables, so no information is
/// lost to formatting.
pub struct JsonWriter {
    w: WriteHandle,
}

#[derive(Serialize)]
struct BatchDocument<'a> {
    notes: &'a [Note],
    errors: &'a [String],
}

#[derive(Serialize)]
struct TableDocument<'a> {
    table: &'static str,
    #[serde(flatten)]
    model: &'a RenderTable,
}

impl JsonWriter {
    pub fn new(w: WriteHandle) -> JsonWriter {
        JsonWriter { w }
    }

    fn dump<T: Serialize>(&mut self, value: &T) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut self.w, value).map_err(|e| e.to_string())?;
        writeln!(self.w).map_err(|e| e.to_string())
    }
}

impl NoteWriter for JsonWriter {
    fn print_render_table(
        &mut self,
        out_type: OutputType,
        table_model: &RenderTable,
    ) -> Result<(), Error> {
        self.dump(&TableDocument {
            table: out_type.file_stem(),
            model: table_model,
        })
    }

    fn print_batch(&mut self, batch: &NoteBatch, errors: &[String]) -> Result<(), Error> {
        self.dump(&BatchDocument {
            notes: &batch.notes,
            errors,
        })
    }
}
