use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::app::approot::{assemble_file_results, write_app_batch};
use crate::app::outfmt::csv::CsvWriter;
use crate::app::outfmt::json::JsonWriter;
use crate::app::outfmt::model::{NoteWriter, OutputFormat};
use crate::app::outfmt::text::TextWriter;
use crate::nota::layout::Layout;
use crate::nota::reader::{read_pages, split_text_pages, BatchResult, ErrorPolicy, ReadOptions};
use crate::util::basic::SError;
use crate::util::rw::WriteHandle;
use crate::write_errln;

fn read_text_file(path: &Path) -> Result<String, SError> {
    let mut buf = String::new();
    std::fs::File::open(path)
        .map_err(|e| format!("Failed to open text file {}: {e}", path.display()))?
        .read_to_string(&mut buf)
        .map_err(|e| format!("Failed to read text file {}: {e}", path.display()))?;
    Ok(buf)
}

#[cfg(feature = "pdf_parse")]
fn read_pdf_pages(path: &Path) -> Result<Vec<String>, SError> {
    super::pdf::get_all_pages_text_from_path(path)
}

#[cfg(not(feature = "pdf_parse"))]
fn read_pdf_pages(path: &Path) -> Result<Vec<String>, SError> {
    Err(format!(
        "Cannot read {}: built without the pdf_parse feature",
        path.display()
    ))
}

/// The text of each page of the file.
///
/// .txt files are taken to be already-extracted text (as from pdf-text),
/// split at its page markers. Anything else is read as a PDF.
fn read_input_pages(path: &Path) -> Result<Vec<String>, SError> {
    if path.extension().unwrap_or_default().to_string_lossy() == "txt" {
        tracing::trace!("Getting raw text from {:?}", path);
        let text = read_text_file(path)?;
        Ok(split_text_pages(&text).into_iter().map(String::from).collect())
    } else {
        read_pdf_pages(path)
    }
}

fn read_file(path: &Path, options: &ReadOptions) -> Result<BatchResult, SError> {
    tracing::info!("Reading {}...", path.display());
    let pages = read_input_pages(path)?;
    read_pages(&pages, options).map_err(|e| format!("{}: {}", path.display(), e))
}

fn read_files_sequential(
    files: &[PathBuf],
    options: &ReadOptions,
) -> Vec<Result<BatchResult, SError>> {
    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let res = read_file(file, options);
        let halt = res.is_err() && options.error_policy == ErrorPolicy::Halt;
        results.push(res);
        if halt {
            break;
        }
    }
    results
}

/// One task per file. Results are in the same order as files.
async fn read_files_parallel(
    files: &[PathBuf],
    options: &ReadOptions,
) -> Vec<Result<BatchResult, SError>> {
    let start = std::time::Instant::now();

    let mut handles = Vec::with_capacity(files.len());
    for file in files {
        let file = file.clone();
        let options = options.clone();
        handles.push(async_std::task::spawn(
            async move { read_file(&file, &options) },
        ));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await);
    }

    tracing::debug!("read_files_parallel took {:?}", start.elapsed());
    results
}

/// Reads brokerage notes of negotiation (notas de corretagem), and outputs
/// every trade with its share of the note's fees and taxes folded into an
/// adjusted price and operation value.
///
/// Every page of the input is expected to be one note. Clear, Easynvest and
/// Inter (SINACOR) layouts are recognized.
///
/// Set PARALLEL_FILES to read several files concurrently.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
pub struct Args {
    /// Note PDFs
    ///
    /// These can also be plain .txt files, and will not be interpreted as actual
    /// PDFs, but just the text emitted by a tool like pdf-text. Pages are split
    /// at PAGE_BREAK<n> markers.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Read every page with this layout, instead of detecting it per page.
    #[arg(short = 'l', long, value_enum)]
    pub layout: Option<Layout>,

    /// What to do with pages which cannot be read as a note.
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Collect)]
    pub on_error: ErrorPolicy,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Write a csv file per table into this directory, rather than to stdout.
    /// Only applies to the csv format.
    #[arg(short = 'd', long)]
    pub csv_output_dir: Option<String>,

    /// Enable debug tracing for this crate
    ///
    /// Same as adding corretagem=debug to the TRACE variable.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            layout: self.layout,
            error_policy: self.on_error,
        }
    }
}

fn make_writer(args: &Args, out_w: WriteHandle) -> Result<Box<dyn NoteWriter>, SError> {
    let writer: Box<dyn NoteWriter> = match args.format {
        OutputFormat::Csv => match &args.csv_output_dir {
            Some(dir) => Box::new(
                CsvWriter::new(dir).map_err(|e| format!("Unable to create {dir}: {e}"))?,
            ),
            None => Box::new(CsvWriter::new_to_writer(out_w)),
        },
        OutputFormat::Text => Box::new(TextWriter::new(out_w)),
        OutputFormat::Json => Box::new(JsonWriter::new(out_w)),
    };
    Ok(writer)
}

pub fn run() -> Result<(), ()> {
    let args = Args::parse();
    run_with_args(
        args,
        WriteHandle::stdout_write_handle(),
        WriteHandle::stderr_write_handle(),
    )
}

/// Errs if anything could not be read, even when the rest was output.
pub fn run_with_args(
    args: Args,
    out_w: WriteHandle,
    mut err_w: WriteHandle,
) -> Result<(), ()> {
    if args.debug {
        crate::tracing::enable_trace_env("corretagem=debug");
    }
    crate::tracing::setup_tracing();

    let options = args.read_options();
    let results = if crate::util::sys::env_var_non_empty("PARALLEL_FILES")
        && args.files.len() > 1
    {
        async_std::task::block_on(read_files_parallel(&args.files, &options))
    } else {
        read_files_sequential(&args.files, &options)
    };

    let app_batch = assemble_file_results(&args.files, results, options.error_policy)
        .map_err(|e| write_errln!(err_w, "Error: {e}"))?;

    for e in &app_batch.errors {
        write_errln!(err_w, "Error: {e}");
    }

    let mut writer = make_writer(&args, out_w).map_err(|e| write_errln!(err_w, "{e}"))?;
    write_app_batch(&app_batch, writer.as_mut())
        .map_err(|e| write_errln!(err_w, "Error writing output: {e}"))?;
    writer
        .finish()
        .map_err(|e| write_errln!(err_w, "Error writing output: {e}"))?;

    if app_batch.errors.is_empty() {
        Ok(())
    } else {
        Err(())
    }
}
