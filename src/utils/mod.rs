pub mod format;
pub mod logging;

pub use format::{add_indent, element_separator, page_separator};
pub use logging::truncate_text;
