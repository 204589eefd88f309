use std::path::PathBuf;

use crate::nota::model::note::NoteBatch;
use crate::nota::reader::{BatchResult, ErrorPolicy};
use crate::util::basic::SError;

use super::outfmt::model::NoteWriter;

pub type Error = String;

/// Notes of every input file, in input order, plus everything which went
/// wrong along the way, already described for the user.
#[derive(Default)]
pub struct AppBatch {
    pub batch: NoteBatch,
    pub errors: Vec<SError>,
}

/// Joins per-file read results (in the same order as files) into one batch.
///
/// A file which could not be read at all counts like a failed page would: it
/// is dropped under Skip, reported under Collect, and fatal under Halt. Read
/// results are expected to have applied the same policy to their pages.
pub fn assemble_file_results(
    files: &[PathBuf],
    results: Vec<Result<BatchResult, SError>>,
    policy: ErrorPolicy,
) -> Result<AppBatch, Error> {
    let mut app_batch = AppBatch::default();
    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(mut res) => {
                app_batch.batch.notes.append(&mut res.batch.notes);
                app_batch.errors.extend(
                    res.errors
                        .into_iter()
                        .map(|e| format!("{}: {}", file.display(), e)),
                );
            }
            Err(e) => match policy {
                ErrorPolicy::Skip => tracing::warn!("Skipping {}: {}", file.display(), e),
                ErrorPolicy::Collect => app_batch.errors.push(e),
                ErrorPolicy::Halt => return Err(e),
            },
        }
    }
    tracing::info!(
        "Read {} notes from {} files",
        app_batch.batch.notes.len(),
        files.len()
    );
    Ok(app_batch)
}

pub fn write_app_batch(app_batch: &AppBatch, writer: &mut dyn NoteWriter) -> Result<(), Error> {
    writer.print_batch(&app_batch.batch, &app_batch.errors)
}
