//! Output formatting

pub mod formatter;
pub mod markup;

pub use formatter::{
    JsonFormatter, MarkdownFormatter, NO_RESULTS, OutputFormatter, format_response,
};
pub use markup::{markup_to_line, markup_to_text};
