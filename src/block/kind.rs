//! Block kinds and their markup.

use std::collections::TryReserveError;

use crate::render::HtmlWriter;

/// The block element currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockKind {
    /// Between blocks; the next content opens a paragraph.
    #[default]
    None,
    /// `<p>`
    Paragraph,
    /// `<h1>`..`<h6>`
    Heading(u8),
    /// `<ul>`, keyed by the bullet that opened it.
    UnorderedList {
        /// `*`, `-` or `+`.
        bullet: u8,
        /// Indentation of the line that opened the list.
        indent: u32,
    },
    /// `<ol>`. Reserved.
    OrderedList,
    /// `<pre><code>`
    CodeBlock {
        /// Backticks in the opening fence; the closing fence must match.
        fence_len: u32,
    },
    /// `<blockquote>`
    Blockquote,
}

/// What a newline does inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewlineAction {
    /// Nothing is open.
    Ignore,
    /// Soft wrap rendered as a single space.
    SoftWrap,
    /// The block ends with its line.
    Close,
    /// Written through unchanged.
    Verbatim,
}

impl BlockKind {
    /// Whether a block is open.
    #[inline]
    pub fn is_open(self) -> bool {
        self != Self::None
    }

    /// Whether this is a fenced code block.
    #[inline]
    pub fn is_code(self) -> bool {
        matches!(self, Self::CodeBlock { .. })
    }

    /// Fence length of an open code block.
    #[inline]
    pub fn fence_len(self) -> Option<u32> {
        match self {
            Self::CodeBlock { fence_len } => Some(fence_len),
            _ => None,
        }
    }

    /// Whether a list item with `bullet` continues this block.
    #[inline]
    pub fn continues_list(self, bullet: u8) -> bool {
        matches!(self, Self::UnorderedList { bullet: b, .. } if b == bullet)
    }

    /// Newline behavior for this block.
    pub fn newline(self) -> NewlineAction {
        match self {
            Self::None => NewlineAction::Ignore,
            Self::Paragraph | Self::UnorderedList { .. } | Self::OrderedList | Self::Blockquote => {
                NewlineAction::SoftWrap
            }
            Self::Heading(_) => NewlineAction::Close,
            Self::CodeBlock { .. } => NewlineAction::Verbatim,
        }
    }

    /// Write the opening markup.
    pub fn write_open(self, out: &mut HtmlWriter, heading_id: Option<u32>) -> Result<(), TryReserveError> {
        match self {
            Self::None => Ok(()),
            Self::Paragraph => out.paragraph_start(),
            Self::Heading(level) => out.heading_start(level, heading_id),
            Self::UnorderedList { .. } => out.ul_start(),
            Self::OrderedList => out.open_tag("ol"),
            Self::CodeBlock { .. } => out.code_block_start(),
            Self::Blockquote => out.blockquote_start(),
        }
    }

    /// Write the closing markup.
    pub fn write_close(self, out: &mut HtmlWriter) -> Result<(), TryReserveError> {
        match self {
            Self::None => Ok(()),
            Self::Paragraph => out.paragraph_end(),
            Self::Heading(level) => out.heading_end(level),
            Self::UnorderedList { .. } => out.ul_end(),
            Self::OrderedList => out.ol_end(),
            Self::CodeBlock { .. } => out.code_block_end(),
            Self::Blockquote => out.blockquote_end(),
        }
    }
}
