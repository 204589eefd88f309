use std::{io::Write, path::PathBuf};

use clap::Parser;

use corretagem::nota::reader::{normalize_page_text, parseable_page_marker};
use corretagem::peripheral::pdf;

/// Dumps the text of a note PDF, the way nota-extract sees it.
/// This is mostly for generating test files for the note templates.
///
/// Contributors should manually sanitize sensitive information (names,
/// account numbers, CPF) before committing the output as a test file.
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// Input file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Show pretty page deliniators
    #[arg(short = 'n', long)]
    pub show_page_numbers: bool,

    /// Inserts page deliniators that can be parsed back out by nota-extract,
    /// when given a .txt file.
    #[arg(short = 'm', long)]
    pub parsable_page_markers: bool,

    /// Can be provided multiple times
    #[arg(short = 'p', long = "page", value_name = "PAGE")]
    pub pages: Option<Vec<u32>>,
}

/// page_num should be one-based
fn page_marker_line(page_num: u32) -> String {
    format!("---------- Page {page_num} ----------")
}

fn main() -> Result<(), ()> {
    let args = Args::parse();

    let page_texts = pdf::get_all_pages_text_from_path(&args.input)
        .map_err(|e| eprintln!("{e}"))?;

    let mut out = std::io::stdout();
    for (i, text) in page_texts.iter().enumerate() {
        let page_num = (i + 1) as u32;
        if let Some(pages_to_show) = &args.pages {
            if !pages_to_show.contains(&page_num) {
                continue;
            }
        }

        let res = if args.parsable_page_markers {
            write!(out, "{}", parseable_page_marker(page_num))
        } else if args.show_page_numbers {
            writeln!(out, "{}{}", if i == 0 { "" } else { "\n" }, page_marker_line(page_num))
        } else {
            Ok(())
        };
        res.and_then(|_| write!(out, "{}", normalize_page_text(text)))
            .and_then(|_| out.flush())
            .map_err(|e| eprintln!("{e}"))?;
    }

    Ok(())
}
