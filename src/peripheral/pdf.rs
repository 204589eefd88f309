use std::path::Path;

use lopdf::Document;

use crate::util::basic::SError;
use crate::util::rw::StringBuffer;

/// Remove pages not in page_numbers_to_keep.
/// These page numbers should be 1-based.
pub fn filter_pdf_pages(doc: &mut Document, page_numbers_to_keep: &[u32]) -> (u32, u32) {
    let total_pages = doc.get_pages().len() as u32;
    let undesired_page_numbers: Vec<u32> = (1..=total_pages)
        .filter(|n| !page_numbers_to_keep.contains(n))
        .collect();

    doc.delete_pages(&undesired_page_numbers);
    (total_pages, total_pages - undesired_page_numbers.len() as u32)
}

pub fn write_doc_text(
    doc: &Document,
    w: &mut dyn std::io::Write,
) -> Result<(), pdf_extract::OutputError> {
    let mut output = pdf_extract::PlainTextOutput::new(w);
    pdf_extract::output_doc(doc, &mut output)
}

/// page is 1-based
pub fn write_page_text(
    doc: &Document,
    page: u32,
    w: &mut dyn std::io::Write,
) -> Result<(), pdf_extract::OutputError> {
    let mut copy = doc.clone();
    filter_pdf_pages(&mut copy, &[page]);
    write_doc_text(&copy, w)
}

pub fn get_page_text(doc: &Document, page: u32) -> Result<String, pdf_extract::OutputError> {
    let mut buf = StringBuffer::new();
    write_page_text(doc, page, &mut buf)?;
    Ok(buf.export_string())
}

/// The text of every page of the document at path, in page order.
/// Each note is one page, so pages are never joined.
pub fn get_all_pages_text_from_path(path: &Path) -> Result<Vec<String>, SError> {
    let doc = Document::load(path)
        .map_err(|e| format!("Error loading {}: {}", path.display(), e))?;
    let n_pages = doc.get_pages().len() as u32;
    tracing::debug!("{}: {} pages", path.display(), n_pages);

    (1..=n_pages)
        .map(|page| {
            get_page_text(&doc, page).map_err(|e| {
                format!("Error reading page {} of {}: {}", page, path.display(), e)
            })
        })
        .collect()
}
