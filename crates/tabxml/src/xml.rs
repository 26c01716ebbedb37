//! XML model, parser, and writer

pub mod cursor;
pub mod model;
pub mod parser;
pub mod writer;

pub use cursor::Cursor;
pub use model::Element;
pub use parser::Parser;
pub use writer::{indent, serialize};

use crate::error::Result;

/// Parse a string into its root element
pub fn parse_str(input: &str) -> Result<Element> {
    let mut parser = Parser::new(input.as_bytes());
    parser.parse()
}
