//! Reads notes out of page text, one note per page.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::apportion::apportion_costs;
use super::error::NoteError;
use super::layout::Layout;
use super::mapper::map_note;
use super::model::note::{Note, NoteBatch};

lazy_static! {
    static ref SPACE_RUN_RE: Regex = Regex::new(r"[ \u{00A0}]+").unwrap();
    static ref PAGE_MARKER_RE: Regex = Regex::new(r"PAGE_BREAK<(\d+)>").unwrap();
}

/// What to do with the batch when a page fails to read.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ErrorPolicy {
    /// Drop the page (with a warning), keep the rest.
    Skip,
    /// Keep the rest, and report every failed page alongside the notes.
    #[default]
    Collect,
    /// Fail the whole batch on the first failed page.
    Halt,
}

#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct ReadOptions {
    /// Use this layout for every page instead of selecting one per page.
    pub layout: Option<Layout>,
    pub error_policy: ErrorPolicy,
}

/// page is 1-based.
#[derive(Error, PartialEq, Clone, Debug)]
#[error("page {page}: {error}")]
pub struct PageError {
    pub page: usize,
    #[source]
    pub error: NoteError,
}

#[derive(PartialEq, Clone, Debug, Default)]
pub struct BatchResult {
    pub batch: NoteBatch,
    /// Only populated under ErrorPolicy::Collect
    pub errors: Vec<PageError>,
}

/// page_num should be one-based
pub fn parseable_page_marker(page_num: u32) -> String {
    format!("PAGE_BREAK<{page_num}>")
}

/// Collapses runs of spaces and non-breaking spaces to a single space.
/// Line breaks are significant to the templates, and are kept.
pub fn normalize_page_text(text: &str) -> Cow<str> {
    SPACE_RUN_RE.replace_all(text, " ")
}

/// Splits pre-extracted document text into pages at PAGE_BREAK<n> markers.
/// Text without any marker is a single page. Blank text ahead of the first
/// marker is dropped.
pub fn split_text_pages(text: &str) -> Vec<&str> {
    let mut pages: Vec<&str> = PAGE_MARKER_RE.split(text).collect();
    if pages.len() > 1 && pages[0].trim().is_empty() {
        pages.remove(0);
    }
    pages
}

pub fn read_page(text: &str, options: &ReadOptions) -> Result<Note, NoteError> {
    let text = normalize_page_text(text);
    let layout = options.layout.unwrap_or_else(|| Layout::select(&text));
    let extraction = layout.extract(&text);
    let parsed = map_note(layout, &extraction)?;
    apportion_costs(parsed)
}

/// Reads every page into a note, in page order, handling failed pages
/// according to the options' error policy.
pub fn read_pages<S: AsRef<str>>(
    pages: &[S],
    options: &ReadOptions,
) -> Result<BatchResult, PageError> {
    let mut res = BatchResult::default();
    for (i, page_text) in pages.iter().enumerate() {
        let page = i + 1;
        match read_page(page_text.as_ref(), options) {
            Ok(note) => res.batch.notes.push(note),
            Err(error) => {
                let err = PageError { page, error };
                match options.error_policy {
                    ErrorPolicy::Skip => {
                        tracing::warn!("Skipping {err}");
                    }
                    ErrorPolicy::Collect => {
                        tracing::debug!("read_pages: collected {err}");
                        res.errors.push(err);
                    }
                    ErrorPolicy::Halt => return Err(err),
                }
            }
        }
    }
    Ok(res)
}
