//! Inline-level state: decorations and links.
//!
//! Both are driven byte by byte from the dispatch loop:
//! - Decorations are flags flipped by matched special runs
//! - Links are collected speculatively and committed at `)`

pub mod decoration;
pub mod links;

pub use decoration::{Decoration, DecorationSet};
pub use links::{LinkParts, LinkPhase, LinkRecognizer};
