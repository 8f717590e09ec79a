//! streammark: incremental Markdown to HTML conversion
//!
//! Input arrives in chunks of any size; each chunk is converted as far as
//! it can be and the HTML handed back immediately. Constructs whose meaning
//! depends on what follows (a `*` that may be emphasis or a bullet, a `[`
//! that may start a link) are held back until the deciding byte arrives,
//! even when it arrives in a later chunk.
//!
//! # Design Principles
//! - No AST: HTML is written as bytes are classified
//! - One byte of lookahead, carried across chunk boundaries
//! - Malformed input falls back to literal text and is never an error
//! - Fallible buffer growth: allocation failure is reported, not aborted on
//!
//! # Example
//! ```
//! let html = streammark::to_html("# Hello\n\n*World*").unwrap();
//! assert_eq!(html, "<h1 id=\"1\">Hello</h1><p><i>World</i></p>");
//! ```

pub mod block;
pub mod error;
pub mod escape;
pub mod inline;
pub mod limits;
pub mod parser;
pub mod render;
pub mod run;
pub mod sequence;

// Re-export primary types
pub use block::BlockKind;
pub use error::Error;
pub use inline::{Decoration, DecorationSet, LinkPhase};
pub use parser::StreamParser;
pub use render::HtmlWriter;

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Number headings in document order: `<h1 id="1">`.
    pub heading_ids: bool,
    /// Decode and attribute-escape link destinations and image alt text.
    pub escape_link_attributes: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            heading_ids: true,
            escape_link_attributes: false,
        }
    }
}

/// Convert a complete Markdown document to HTML.
///
/// # Example
/// ```
/// let html = streammark::to_html("[docs](https://docs.rs)").unwrap();
/// assert_eq!(html, "<p><a href=\"https://docs.rs\">docs</a></p>");
/// ```
pub fn to_html(input: &str) -> Result<String, Error> {
    to_html_with_options(input, Options::default())
}

/// Convert a complete Markdown document to HTML with options.
pub fn to_html_with_options(input: &str, options: Options) -> Result<String, Error> {
    let mut parser = StreamParser::with_options(options);
    let mut html = Vec::new();
    html.try_reserve(input.len() + input.len() / 4)?;
    html.extend_from_slice(parser.feed(input.as_bytes())?);
    html.extend_from_slice(parser.flush()?);
    Ok(match String::from_utf8(html) {
        Ok(html) => html,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}
