//! Block-level state for the streaming converter.
//!
//! Exactly one block is open at a time:
//! - Paragraphs
//! - ATX headings (single line)
//! - Unordered lists
//! - Fenced code blocks
//! - Blockquotes
//!
//! Ordered lists have a variant but nothing opens them yet.

mod kind;

pub use kind::{BlockKind, NewlineAction};
