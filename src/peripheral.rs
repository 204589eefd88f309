pub mod nota_extract_impl;

#[cfg(feature = "pdf_parse")]
pub mod pdf;
