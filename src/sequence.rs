//! Special-sequence matching.
//!
//! Decides what a finished run means from its character, its length,
//! whether it started a line, and the byte that ended it. Matching is pure;
//! the parser applies the resulting action.

use crate::inline::Decoration;
use crate::limits;
use crate::run::Run;

/// Parser state a run is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequenceContext {
    /// The run began at the start of a line.
    pub line_start: bool,
    /// Fence length of the open code block, if inside one.
    pub fence_len: Option<u32>,
}

/// Meaning of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceAction {
    /// Start or continue an unordered list with this bullet.
    ListItem(u8),
    /// Flip one decoration.
    Toggle(Decoration),
    /// `***`: flip italic, then bold.
    ToggleItalicBold,
    /// `---` on a line of its own.
    ThematicBreak,
    /// `#` to `######` followed by a space.
    Heading(u8),
    /// Backtick fence opening a code block of this length.
    OpenFence(u32),
    /// Backtick fence matching the open code block.
    CloseFence,
    /// `>` followed by a space.
    Blockquote,
    /// Not a sequence; the run is plain text.
    Literal,
}

impl SequenceAction {
    /// Whether the action swallows the space that ended the run.
    #[inline]
    pub fn claims_lookahead(self) -> bool {
        matches!(
            self,
            Self::ListItem(_) | Self::Heading(_) | Self::Blockquote
        )
    }
}

/// Match a finished run. `next` is `None` at end of stream.
///
/// # Example
/// ```
/// use streammark::inline::Decoration;
/// use streammark::run::Run;
/// use streammark::sequence::{match_sequence, SequenceAction, SequenceContext};
///
/// let ctx = SequenceContext { line_start: false, fence_len: None };
/// let action = match_sequence(Run { ch: b'*', len: 2 }, ctx, Some(b'x'));
/// assert_eq!(action, SequenceAction::Toggle(Decoration::Bold));
/// ```
pub fn match_sequence(run: Run, ctx: SequenceContext, next: Option<u8>) -> SequenceAction {
    let line_start = ctx.line_start;
    let space_next = next == Some(b' ');

    match (run.ch, run.len) {
        (b'*', 1) if line_start && space_next => SequenceAction::ListItem(b'*'),
        (b'*', 1) => SequenceAction::Toggle(Decoration::Italic),
        (b'*', 2) => SequenceAction::Toggle(Decoration::Bold),
        (b'*', 3) => SequenceAction::ToggleItalicBold,

        (b'-', 1) if line_start && space_next => SequenceAction::ListItem(b'-'),
        (b'-', 3) if line_start && matches!(next, Some(b'\n') | None) => {
            SequenceAction::ThematicBreak
        }

        (b'#', len) if len <= limits::MAX_HEADING_LEVEL && line_start && space_next => {
            SequenceAction::Heading(len as u8)
        }

        (b'`', 1) if ctx.fence_len.is_none() => SequenceAction::Toggle(Decoration::InlineCode),
        (b'`', len) if len >= limits::MIN_FENCE_LEN && line_start => {
            if ctx.fence_len == Some(len) {
                SequenceAction::CloseFence
            } else {
                SequenceAction::OpenFence(len)
            }
        }

        (b'^', 1) => SequenceAction::Toggle(Decoration::Superscript),

        (b'~', 1) => SequenceAction::Toggle(Decoration::Subscript),
        (b'~', 2) => SequenceAction::Toggle(Decoration::Strike),

        (b'>', 1) if line_start && space_next => SequenceAction::Blockquote,

        (b'+', 1) if line_start && space_next => SequenceAction::ListItem(b'+'),

        _ => SequenceAction::Literal,
    }
}
