//! Streaming parser: the per-byte dispatch loop.
//!
//! Every input byte passes through [`StreamParser::feed`] exactly once and is
//! classified against the current state:
//!
//! 1. Leading spaces and tabs are counted as indentation.
//! 2. Special characters accumulate into a run. When a run ends with a
//!    consumed action and the ending byte is itself special, the byte is
//!    classified once more under the new state (a replay).
//! 3. Otherwise the open run is ended with the byte as lookahead, and the
//!    byte is offered to the link recognizer, escape handling, newline
//!    handling and finally written as text.
//!
//! No construct is resolved by looking further than one byte ahead, so the
//! output does not depend on how the input is split into chunks.

use tracing::{debug, trace};

use crate::Options;
use crate::block::{BlockKind, NewlineAction};
use crate::error::Error;
use crate::escape;
use crate::inline::{Decoration, DecorationSet, LinkPhase, LinkRecognizer};
use crate::limits;
use crate::render::HtmlWriter;
use crate::run::{self, SpecialRun};
use crate::sequence::{SequenceAction, SequenceContext, match_sequence};

/// UTF-8 encoding of U+FFFD, substituted for NUL input bytes.
const REPLACEMENT: &[u8] = "\u{FFFD}".as_bytes();

/// Buffer that text is currently written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    /// Committed output.
    Main,
    /// The pending link's scratch buffer.
    LinkScratch,
}

/// How ending a run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunEnd {
    /// No run was open.
    Idle,
    /// The run was written back as text.
    Literal,
    /// The run was a sequence and its action has been applied.
    Consumed(SequenceAction),
}

/// Outcome of one classification pass over a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Done,
    Replay,
}

/// Incremental Markdown-to-HTML converter for one document stream.
///
/// # Example
/// ```
/// use streammark::StreamParser;
///
/// let mut parser = StreamParser::new();
/// let mut html = Vec::new();
/// html.extend_from_slice(parser.feed(b"# Hel").unwrap());
/// html.extend_from_slice(parser.feed(b"lo\n**wor").unwrap());
/// html.extend_from_slice(parser.feed(b"ld**").unwrap());
/// html.extend_from_slice(parser.flush().unwrap());
///
/// assert_eq!(html, b"<h1 id=\"1\">Hello</h1><p><b>world</b></p>");
/// ```
#[derive(Debug)]
pub struct StreamParser {
    options: Options,
    /// HTML produced by the current feed or flush call.
    output: HtmlWriter,
    link: LinkRecognizer,
    dest: Destination,
    block: BlockKind,
    decorations: DecorationSet,
    run: SpecialRun,
    /// No content has been written on the current line yet.
    line_start: bool,
    indent: u32,
    escaped: bool,
    /// Last heading id handed out.
    heading_ids: u32,
    feeds: u64,
    replays: u64,
    poisoned: bool,
}

impl StreamParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create a parser with custom options.
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            output: HtmlWriter::new(),
            link: LinkRecognizer::new(),
            dest: Destination::Main,
            block: BlockKind::None,
            decorations: DecorationSet::new(),
            run: SpecialRun::new(),
            line_start: true,
            indent: 0,
            escaped: false,
            heading_ids: 0,
            feeds: 0,
            replays: 0,
            poisoned: false,
        }
    }

    /// Options this parser renders with.
    pub fn options(&self) -> Options {
        self.options
    }

    /// The block currently open.
    pub fn block(&self) -> BlockKind {
        self.block
    }

    /// The decorations currently open.
    pub fn decorations(&self) -> DecorationSet {
        self.decorations
    }

    /// Phase of the link being recognized.
    pub fn link_phase(&self) -> LinkPhase {
        self.link.phase()
    }

    /// Number of completed `feed` calls since creation or the last reset.
    pub fn feed_count(&self) -> u64 {
        self.feeds
    }

    /// Number of bytes that were classified a second time.
    pub fn replays(&self) -> u64 {
        self.replays
    }

    /// Whether an earlier error left the parser unusable until [`reset`](Self::reset).
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Convert the next chunk of input.
    ///
    /// The returned HTML covers everything that became certain while
    /// processing `input`; it replaces the output of the previous call.
    /// Constructs still undecided at the end of the chunk are carried over.
    pub fn feed(&mut self, input: &[u8]) -> Result<&[u8], Error> {
        self.check_poisoned()?;
        self.output.clear();
        trace!(len = input.len(), feed = self.feeds, "feed");
        let result = self.feed_bytes(input);
        self.settle(result)?;
        self.feeds += 1;
        Ok(self.output.as_bytes())
    }

    /// Force every pending construct to a conclusion and close what is open.
    ///
    /// Calling it again only emits closings forced since the last call.
    pub fn flush(&mut self) -> Result<&[u8], Error> {
        self.check_poisoned()?;
        self.output.clear();
        let result = self.finish();
        self.settle(result)?;
        Ok(self.output.as_bytes())
    }

    /// Return to the initial state, keeping buffer capacity.
    pub fn reset(&mut self) {
        self.output.clear();
        self.link.reset();
        self.link.take_image_marker();
        self.dest = Destination::Main;
        self.block = BlockKind::None;
        self.decorations = DecorationSet::new();
        self.run.take();
        self.line_start = true;
        self.indent = 0;
        self.escaped = false;
        self.heading_ids = 0;
        self.feeds = 0;
        self.replays = 0;
        self.poisoned = false;
    }

    fn check_poisoned(&self) -> Result<(), Error> {
        if self.poisoned {
            return Err(Error::structural("parser used after an error without reset"));
        }
        Ok(())
    }

    fn settle(&mut self, result: Result<(), Error>) -> Result<(), Error> {
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    fn feed_bytes(&mut self, input: &[u8]) -> Result<(), Error> {
        for &b in input {
            if b == 0 {
                for &r in REPLACEMENT {
                    self.handle_byte(r)?;
                }
            } else {
                self.handle_byte(b)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        if self.link.take_image_marker() {
            self.regular_char(b'!')?;
        }
        if std::mem::take(&mut self.escaped) {
            self.regular_char(b'\\')?;
        }
        self.end_run(None)?;
        self.abandon_link()?;
        for decoration in self.decorations.iter() {
            self.output.close_tag(decoration.tag())?;
        }
        self.decorations = DecorationSet::new();
        self.close_block()
    }

    #[inline]
    fn in_code(&self) -> bool {
        self.block.is_code() || self.decorations.contains(Decoration::InlineCode)
    }

    // --- Dispatch ---

    fn handle_byte(&mut self, ch: u8) -> Result<(), Error> {
        if ch != b'[' && self.link.take_image_marker() {
            self.regular_char(b'!')?;
        }

        for _ in 0..limits::MAX_DISPATCH_PASSES {
            match self.classify(ch)? {
                Pass::Done => return Ok(()),
                Pass::Replay => self.replays += 1,
            }
        }
        Err(Error::structural("byte replayed more than once"))
    }

    fn classify(&mut self, ch: u8) -> Result<Pass, Error> {
        let in_code = self.in_code();
        if self.line_start
            && !self.escaped
            && !in_code
            && self.run.is_idle()
            && matches!(ch, b' ' | b'\t')
        {
            let width = if ch == b'\t' { limits::TAB_WIDTH } else { 1 };
            self.indent = self.indent.saturating_add(width);
            return Ok(Pass::Done);
        }

        if (in_code && ch == b'`') || (!in_code && !self.escaped && run::is_special(ch)) {
            return self.count_special(ch);
        }

        if let RunEnd::Consumed(action) = self.end_run(Some(ch))? {
            if action.claims_lookahead() {
                return Ok(Pass::Done);
            }
        }

        self.handle_plain(ch)?;
        Ok(Pass::Done)
    }

    fn count_special(&mut self, ch: u8) -> Result<Pass, Error> {
        if self.run.extend(ch) {
            return Ok(Pass::Done);
        }
        if let RunEnd::Consumed(_) = self.end_run(Some(ch))? {
            self.escaped = false;
            return Ok(Pass::Replay);
        }
        self.run.start(ch);
        Ok(Pass::Done)
    }

    /// Resolve the open run with `next` as lookahead (`None` at end of stream).
    fn end_run(&mut self, next: Option<u8>) -> Result<RunEnd, Error> {
        let Some(run) = self.run.take() else {
            return Ok(RunEnd::Idle);
        };
        let ctx = SequenceContext {
            line_start: self.line_start,
            fence_len: self.block.fence_len(),
        };
        let action = match_sequence(run, ctx, next);
        if action == SequenceAction::Literal {
            for _ in 0..run.len {
                self.regular_char(run.ch)?;
            }
            return Ok(RunEnd::Literal);
        }

        self.apply(action)?;
        if action.claims_lookahead() {
            self.line_start = false;
        }
        Ok(RunEnd::Consumed(action))
    }

    fn apply(&mut self, action: SequenceAction) -> Result<(), Error> {
        match action {
            SequenceAction::ListItem(bullet) => self.list_item(bullet),
            SequenceAction::Toggle(decoration) => self.toggle(decoration),
            SequenceAction::ToggleItalicBold => {
                self.toggle(Decoration::Italic)?;
                self.toggle(Decoration::Bold)
            }
            SequenceAction::ThematicBreak => {
                self.close_block()?;
                self.output.thematic_break()?;
                Ok(())
            }
            SequenceAction::Heading(level) => self.open_block(BlockKind::Heading(level)),
            SequenceAction::OpenFence(fence_len) => {
                self.open_block(BlockKind::CodeBlock { fence_len })
            }
            SequenceAction::CloseFence => self.close_block(),
            SequenceAction::Blockquote => self.open_block(BlockKind::Blockquote),
            SequenceAction::Literal => Ok(()),
        }
    }

    fn handle_plain(&mut self, ch: u8) -> Result<(), Error> {
        let in_code = self.in_code();
        if !in_code && !self.escaped && self.handle_link_char(ch)? {
            return Ok(());
        }

        let escaped = std::mem::take(&mut self.escaped);
        if escaped || in_code {
            if let Some(entity) = escape::entity_for(ch) {
                return self.regular_bytes(ch, entity);
            }
        }

        match ch {
            b'\\' => {
                self.escaped = true;
                Ok(())
            }
            b'\n' => self.handle_newline(),
            _ => self.regular_char(ch),
        }
    }

    // --- Text ---

    #[inline]
    fn regular_char(&mut self, ch: u8) -> Result<(), Error> {
        self.regular_bytes(ch, &[ch])
    }

    /// Write content for `ch`, opening a paragraph if nothing is open.
    fn regular_bytes(&mut self, ch: u8, bytes: &[u8]) -> Result<(), Error> {
        self.escaped = false;
        self.line_start = false;
        if ch == b' ' && self.link.phase() == LinkPhase::Url {
            self.abandon_link()?;
        }
        self.ensure_block()?;
        self.sink()?.write_bytes(bytes)?;
        Ok(())
    }

    /// The buffer output currently goes to.
    ///
    /// A link whose label is closed only accepts `(`; anything else written
    /// first turns it back into text.
    fn sink(&mut self) -> Result<&mut HtmlWriter, Error> {
        if self.link.awaiting_url() {
            self.abandon_link()?;
        }
        match (self.dest, self.link.is_pending()) {
            (Destination::Main, false) => Ok(&mut self.output),
            (Destination::LinkScratch, true) => Ok(self.link.scratch_mut()),
            _ => Err(Error::structural("output destination does not match link phase")),
        }
    }

    fn handle_newline(&mut self) -> Result<(), Error> {
        if self.link.phase() == LinkPhase::Url {
            self.abandon_link()?;
        }
        self.indent = 0;

        if self.line_start && self.block.is_open() && !self.block.is_code() {
            return self.close_block();
        }

        self.line_start = true;
        match self.block.newline() {
            NewlineAction::Ignore => {}
            NewlineAction::SoftWrap => self.sink()?.write_byte(b' ')?,
            NewlineAction::Close => self.close_block()?,
            NewlineAction::Verbatim => self.sink()?.write_byte(b'\n')?,
        }
        Ok(())
    }

    fn toggle(&mut self, decoration: Decoration) -> Result<(), Error> {
        let opening = !self.decorations.contains(decoration);
        if opening {
            self.ensure_block()?;
        }
        self.decorations.toggle(decoration);
        let out = self.sink()?;
        if opening {
            out.open_tag(decoration.tag())?;
        } else {
            out.close_tag(decoration.tag())?;
        }
        Ok(())
    }

    // --- Blocks ---

    fn ensure_block(&mut self) -> Result<(), Error> {
        if !self.block.is_open() {
            self.open_block(BlockKind::Paragraph)?;
        }
        Ok(())
    }

    fn open_block(&mut self, kind: BlockKind) -> Result<(), Error> {
        self.close_block()?;

        let heading_id = match kind {
            BlockKind::Heading(level) => {
                if level == 0 || u32::from(level) > limits::MAX_HEADING_LEVEL {
                    return Err(Error::structural("heading level out of range"));
                }
                if self.options.heading_ids {
                    self.heading_ids = self
                        .heading_ids
                        .checked_add(1)
                        .ok_or_else(|| Error::structural("heading ids exhausted"))?;
                    Some(self.heading_ids)
                } else {
                    None
                }
            }
            _ => None,
        };

        trace!(?kind, "open block");
        kind.write_open(&mut self.output, heading_id)?;
        self.block = kind;
        Ok(())
    }

    fn close_block(&mut self) -> Result<(), Error> {
        self.abandon_link()?;
        if self.block.is_open() {
            trace!(kind = ?self.block, "close block");
        }
        self.block.write_close(&mut self.output)?;
        self.block = BlockKind::None;
        Ok(())
    }

    fn list_item(&mut self, bullet: u8) -> Result<(), Error> {
        if self.block.continues_list(bullet) {
            self.abandon_link()?;
            self.output.li_end()?;
        } else {
            self.open_block(BlockKind::UnorderedList {
                bullet,
                indent: self.indent,
            })?;
        }
        self.output.li_start()?;
        Ok(())
    }

    // --- Links ---

    /// Returns `true` if the byte was link syntax and has been consumed.
    fn handle_link_char(&mut self, ch: u8) -> Result<bool, Error> {
        let phase = self.link.phase();
        match ch {
            b'!' if phase == LinkPhase::None => {
                self.link.set_image_marker();
                Ok(true)
            }
            b'[' if phase == LinkPhase::None => {
                let image = self.link.take_image_marker();
                self.ensure_block()?;
                self.line_start = false;
                self.link.begin(image);
                self.dest = Destination::LinkScratch;
                Ok(true)
            }
            b']' if phase == LinkPhase::Text => {
                if self.link.awaiting_url() {
                    self.abandon_link()?;
                    return Ok(false);
                }
                self.link.push_separator()?;
                Ok(true)
            }
            b'(' if self.link.awaiting_url() => {
                self.link.enter_url();
                Ok(true)
            }
            b')' if phase == LinkPhase::Url => {
                self.commit_link()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn commit_link(&mut self) -> Result<(), Error> {
        self.link
            .write_resolved(&mut self.output, self.options.escape_link_attributes)?;
        debug!(image = self.link.is_image(), "link committed");
        self.link.reset();
        self.dest = Destination::Main;
        Ok(())
    }

    /// Write a pending link back as literal text.
    fn abandon_link(&mut self) -> Result<(), Error> {
        if !self.link.is_pending() {
            return Ok(());
        }
        debug!(phase = ?self.link.phase(), "link abandoned");
        self.link.write_literal(&mut self.output)?;
        self.link.reset();
        self.dest = Destination::Main;
        Ok(())
    }
}

impl Default for StreamParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_with(input: &[u8], options: Options) -> String {
        let mut parser = StreamParser::with_options(options);
        let mut html = Vec::new();
        html.extend_from_slice(parser.feed(input).unwrap());
        html.extend_from_slice(parser.flush().unwrap());
        String::from_utf8(html).unwrap()
    }

    fn render(input: &str) -> String {
        render_with(input.as_bytes(), Options::default())
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(render("hello world"), "<p>hello world</p>");
    }

    #[test]
    fn test_output_replaced_per_call() {
        let mut parser = StreamParser::new();
        assert_eq!(parser.feed(b"a").unwrap(), b"<p>a");
        assert_eq!(parser.feed(b"b").unwrap(), b"b");
        assert_eq!(parser.flush().unwrap(), b"</p>");
        assert_eq!(parser.flush().unwrap(), b"");
        assert_eq!(parser.feed_count(), 2);
    }

    #[test]
    fn test_replay_after_consumed_run() {
        let mut parser = StreamParser::new();
        let mut html = Vec::new();
        html.extend_from_slice(parser.feed(b"**~~a~~**").unwrap());
        html.extend_from_slice(parser.flush().unwrap());
        assert_eq!(html, b"<p><b><s>a</s></b></p>");
        assert_eq!(parser.replays(), 2);
    }

    #[test]
    fn test_no_replay_for_plain_terminator() {
        let mut parser = StreamParser::new();
        parser.feed(b"*a* **b**").unwrap();
        parser.flush().unwrap();
        assert_eq!(parser.replays(), 0);
    }

    #[test]
    fn test_indentation_recorded_on_list() {
        let mut parser = StreamParser::new();
        assert_eq!(parser.feed(b"  * a\n").unwrap(), b"<ul><li>a ");
        assert_eq!(
            parser.block(),
            BlockKind::UnorderedList {
                bullet: b'*',
                indent: 2
            }
        );
        assert_eq!(parser.flush().unwrap(), b"</li></ul>");
    }

    #[test]
    fn test_tab_indentation() {
        let mut parser = StreamParser::new();
        parser.feed(b"\t- a").unwrap();
        assert_eq!(
            parser.block(),
            BlockKind::UnorderedList {
                bullet: b'-',
                indent: limits::TAB_WIDTH
            }
        );
    }

    #[test]
    fn test_fence_line_tail_is_code() {
        assert_eq!(
            render("```rust ignore\nlet x = 1;\n```\n"),
            "<pre><code>rust ignore\nlet x = 1;\n</code></pre>"
        );
    }

    #[test]
    fn test_fence_without_newline() {
        assert_eq!(render("```content\n```"), "<pre><code>content\n</code></pre>");
        assert_eq!(render("```rust"), "<pre><code>rust</code></pre>");
    }

    #[test]
    fn test_fence_line_spaces_kept() {
        assert_eq!(render("```  a b\n```"), "<pre><code>  a b\n</code></pre>");
    }

    #[test]
    fn test_inline_code_escapes() {
        assert_eq!(render("`a<b`"), "<p><code>a&lt;b</code></p>");
    }

    #[test]
    fn test_backslash_escapes() {
        assert_eq!(render("\\<b\\> \\\\"), "<p>&lt;b&gt; &#92;</p>");
        assert_eq!(render("\\*x\\*"), "<p>*x*</p>");
    }

    #[test]
    fn test_dangling_backslash() {
        assert_eq!(render("a\\"), "<p>a\\</p>");
    }

    #[test]
    fn test_nul_replaced() {
        assert_eq!(
            render_with(b"a\0b", Options::default()),
            "<p>a\u{FFFD}b</p>"
        );
    }

    #[test]
    fn test_image() {
        assert_eq!(
            render("![cat](c.png)"),
            "<p><img src=\"c.png\" alt=\"cat\"></p>"
        );
    }

    #[test]
    fn test_bang_without_bracket() {
        assert_eq!(render("hi!"), "<p>hi!</p>");
        assert_eq!(render("a! b"), "<p>a! b</p>");
        assert_eq!(render("!!"), "<p>!!</p>");
    }

    #[test]
    fn test_thematic_break_at_end_of_stream() {
        assert_eq!(render("---"), "<hr>");
    }

    #[test]
    fn test_heading_ids_disabled() {
        let options = Options {
            heading_ids: false,
            ..Options::default()
        };
        assert_eq!(render_with(b"## x\n", options), "<h2>x</h2>");
    }

    #[test]
    fn test_escaped_link_attributes() {
        let options = Options {
            escape_link_attributes: true,
            ..Options::default()
        };
        assert_eq!(
            render_with(b"[q](/a\"b)", options),
            "<p><a href=\"/a&quot;b\">q</a></p>"
        );
    }

    #[test]
    fn test_link_abandoned_by_heading_close() {
        assert_eq!(render("# a [b\nc"), "<h1 id=\"1\">a [b</h1><p>c</p>");
    }

    #[test]
    fn test_link_state_visible() {
        let mut parser = StreamParser::new();
        assert_eq!(parser.feed(b"[a](").unwrap(), b"<p>");
        assert_eq!(parser.link_phase(), LinkPhase::Url);
        assert_eq!(parser.flush().unwrap(), b"[a](</p>");
        assert_eq!(parser.link_phase(), LinkPhase::None);
    }

    #[test]
    fn test_poisoned_until_reset() {
        let mut parser = StreamParser::new();
        parser.poisoned = true;
        assert!(matches!(parser.feed(b"a"), Err(Error::Structural(_))));
        assert!(matches!(parser.flush(), Err(Error::Structural(_))));
        parser.reset();
        assert!(!parser.is_poisoned());
        assert_eq!(parser.feed(b"a").unwrap(), b"<p>a");
    }

    #[test]
    fn test_heading_ids_never_wrap() {
        let mut parser = StreamParser::new();
        parser.heading_ids = u32::MAX - 1;
        assert_eq!(
            parser.feed(b"# a\n").unwrap(),
            format!("<h1 id=\"{}\">a</h1>", u32::MAX).as_bytes()
        );
        assert!(matches!(parser.feed(b"# b\n"), Err(Error::Structural(_))));
        assert!(parser.is_poisoned());
    }

    #[test]
    fn test_reset_restarts_heading_ids() {
        let mut parser = StreamParser::new();
        parser.feed(b"# a\n# b\n").unwrap();
        parser.reset();
        assert_eq!(parser.feed(b"# c\n").unwrap(), b"<h1 id=\"1\">c</h1>");
        assert_eq!(parser.block(), BlockKind::None);
    }

    #[test]
    fn test_parser_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<StreamParser>();
    }
}
