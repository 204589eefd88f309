pub mod apportion;
pub mod error;
pub mod layout;
pub mod mapper;
pub mod model;
pub mod reader;
pub mod render;
pub mod template;

// Re-exports
pub use self::error::NoteError;
pub use self::layout::Layout;
pub use self::model::note::{Note, NoteBatch};
pub use self::reader::{read_page, read_pages, BatchResult, ErrorPolicy, ReadOptions};
