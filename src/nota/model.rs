pub mod note;
pub mod summary;
pub mod trade;
