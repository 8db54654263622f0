//! Morph HTML Parser
//!
//! Loads server-rendered markup into a `morph_dom::Document`
//! using html5ever.

mod parser;

pub use morph_dom::Document;
pub use parser::HtmlParser;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read markup: {0}")]
    Io(#[from] std::io::Error),
}
