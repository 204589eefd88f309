use std::io::Write;
use std::{fs::File, io, path::PathBuf};

use crate::nota::render::RenderTable;
use crate::util::os::mk_writable_dir;
use crate::util::rw::WriteHandle;

use super::model::{Error, NoteWriter, OutputType};

enum Destination {
    /// One <table>.csv file per table
    Dir(PathBuf),
    /// Tables one after another, separated by a blank line
    Writer(WriteHandle),
}

pub struct CsvWriter {
    dest: Destination,
    tables_written: usize,
}

impl CsvWriter {
    pub fn new(out_dir: &String) -> Result<CsvWriter, io::Error> {
        let dir_path = PathBuf::from(out_dir);
        mk_writable_dir(&dir_path)?;
        Ok(CsvWriter {
            dest: Destination::Dir(dir_path),
            tables_written: 0,
        })
    }

    pub fn new_to_writer(w: WriteHandle) -> CsvWriter {
        CsvWriter {
            dest: Destination::Writer(w),
            tables_written: 0,
        }
    }

    fn write_table<W: io::Write>(w: W, table_model: &RenderTable) -> Result<(), Error> {
        let mut csv_w = csv::WriterBuilder::new().has_headers(true).from_writer(w);

        csv_w
            .write_record(&table_model.header)
            .map_err(|e| e.to_string())?;
        for row in &table_model.rows {
            csv_w.write_record(row).map_err(|e| e.to_string())?;
        }
        if !table_model.footer.is_empty() {
            csv_w
                .write_record(&table_model.footer)
                .map_err(|e| e.to_string())?;
        }

        let n_cols = table_model.header.len();
        for note in &table_model.notes {
            let mut note_record = vec![String::new(); n_cols];
            note_record[0] = note.clone();
            csv_w.write_record(note_record).map_err(|e| e.to_string())?;
        }

        csv_w.flush().map_err(|e| e.to_string())
    }
}

impl NoteWriter for CsvWriter {
    /// Table errors are not written. They are reported on the error stream.
    fn print_render_table(
        &mut self,
        out_type: OutputType,
        table_model: &RenderTable,
    ) -> Result<(), Error> {
        match &mut self.dest {
            Destination::Dir(out_dir) => {
                let file_path = out_dir.join(format!("{}.csv", out_type.file_stem()));
                let fp = File::create(&file_path).map_err(|e| {
                    format!("Failed to create {}: {}", file_path.display(), e)
                })?;
                Self::write_table(fp, table_model)?;
            }
            Destination::Writer(w) => {
                if self.tables_written > 0 {
                    writeln!(w).map_err(|e| e.to_string())?;
                }
                Self::write_table(w.clone(), table_model)?;
            }
        }
        self.tables_written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::app::outfmt::model::{NoteWriter, OutputType};
    use crate::nota::render::RenderTable;
    use crate::util::rw::WriteHandle;

    use super::CsvWriter;

    fn table(name: &str) -> RenderTable {
        RenderTable {
            header: vec!["Note".to_string(), "Title".to_string()],
            rows: vec![vec!["1".to_string(), name.to_string()]],
            footer: vec![],
            notes: vec!["note, with comma".to_string()],
            errors: vec!["not written".to_string()],
        }
    }

    #[test]
    fn test_tables_to_writer() {
        let (w, buff) = WriteHandle::string_buff_write_handle();
        let mut cw = CsvWriter::new_to_writer(w);
        cw.print_render_table(OutputType::Notes, &table("PETR4 PN")).unwrap();
        cw.print_render_table(OutputType::Trades, &table("ITSA4")).unwrap();
        assert_eq!(
            buff.borrow_mut().export_string(),
            "Note,Title\n1,PETR4 PN\n\"note, with comma\",\n\
             \n\
             Note,Title\n1,ITSA4\n\"note, with comma\",\n"
        );
    }
}
