//! Link and image recognition.
//!
//! Handles `[text](url)` and `![alt](url)`. Nothing is known to be a link
//! until its closing `)`, so the label and destination are collected in a
//! scratch buffer and only then rendered as an anchor. A candidate that
//! breaks off is written back as the literal text it was made of.

use memchr::memchr;

use crate::Error;
use crate::render::HtmlWriter;

/// Byte separating the label from the destination in the scratch buffer.
///
/// Input NUL bytes are replaced before dispatch, so it never occurs in
/// content.
pub const SEPARATOR: u8 = 0;

/// How far a pending link has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkPhase {
    /// No link pending.
    #[default]
    None,
    /// Collecting the label, between `[` and `(`.
    Text,
    /// Collecting the destination, between `(` and `)`.
    Url,
}

/// Label and destination of the pending candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkParts<'a> {
    /// Everything after `[` up to `]` (or up to now, if `]` hasn't come).
    pub text: &'a [u8],
    /// Everything after `](`; `None` until `]` has been seen.
    pub url: Option<&'a [u8]>,
}

/// State of the link currently being recognized.
#[derive(Debug)]
pub struct LinkRecognizer {
    phase: LinkPhase,
    image: bool,
    image_marker: bool,
    scratch: HtmlWriter,
}

impl LinkRecognizer {
    /// Create an idle recognizer.
    pub fn new() -> Self {
        Self {
            phase: LinkPhase::None,
            image: false,
            image_marker: false,
            scratch: HtmlWriter::new(),
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> LinkPhase {
        self.phase
    }

    /// Whether a candidate is being collected.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.phase != LinkPhase::None
    }

    /// Whether the pending candidate started with `!`.
    #[inline]
    pub fn is_image(&self) -> bool {
        self.image
    }

    /// Whether a `!` was seen and the next byte decides if it opens an image.
    #[inline]
    pub fn has_image_marker(&self) -> bool {
        self.image_marker
    }

    /// Remember a `!` that may open an image.
    #[inline]
    pub fn set_image_marker(&mut self) {
        self.image_marker = true;
    }

    /// Forget the `!` marker, returning whether one was set.
    #[inline]
    pub fn take_image_marker(&mut self) -> bool {
        std::mem::take(&mut self.image_marker)
    }

    /// Start collecting a label after `[`.
    pub fn begin(&mut self, image: bool) {
        debug_assert!(!self.is_pending());
        self.phase = LinkPhase::Text;
        self.image = image;
        self.scratch.clear();
    }

    /// Record the `]` ending the label.
    pub fn push_separator(&mut self) -> Result<(), Error> {
        debug_assert_eq!(self.phase, LinkPhase::Text);
        self.scratch.write_byte(SEPARATOR)?;
        Ok(())
    }

    /// Whether the label is closed and only `(` may follow.
    #[inline]
    pub fn awaiting_url(&self) -> bool {
        self.phase == LinkPhase::Text && self.scratch.last() == Some(SEPARATOR)
    }

    /// Switch to the destination after `](`.
    pub fn enter_url(&mut self) {
        debug_assert!(self.awaiting_url());
        self.phase = LinkPhase::Url;
    }

    /// Buffer receiving output while a link is pending.
    #[inline]
    pub fn scratch_mut(&mut self) -> &mut HtmlWriter {
        &mut self.scratch
    }

    /// Split the scratch buffer at the separator.
    pub fn parts(&self) -> LinkParts<'_> {
        let bytes = self.scratch.as_bytes();
        match memchr(SEPARATOR, bytes) {
            Some(split) => LinkParts {
                text: &bytes[..split],
                url: Some(&bytes[split + 1..]),
            },
            None => LinkParts {
                text: bytes,
                url: None,
            },
        }
    }

    /// Render the completed candidate as an anchor or image.
    ///
    /// An empty destination reuses the label.
    pub fn write_resolved(&self, out: &mut HtmlWriter, escape_attr: bool) -> Result<(), Error> {
        let parts = self.parts();
        let Some(url) = parts.url else {
            return Err(Error::structural("link committed without a label separator"));
        };
        let url = if url.is_empty() { parts.text } else { url };
        if self.image {
            out.image(url, parts.text, escape_attr)?;
        } else {
            out.link(url, parts.text, escape_attr)?;
        }
        Ok(())
    }

    /// Write the candidate back as the literal characters it came from.
    pub fn write_literal(&self, out: &mut HtmlWriter) -> Result<(), Error> {
        if self.image {
            out.write_byte(b'!')?;
        }
        out.write_byte(b'[')?;
        let parts = self.parts();
        out.write_bytes(parts.text)?;
        if let Some(url) = parts.url {
            out.write_byte(b']')?;
            if self.phase == LinkPhase::Url {
                out.write_byte(b'(')?;
                out.write_bytes(url)?;
            }
        }
        Ok(())
    }

    /// Drop the candidate and return to idle.
    pub fn reset(&mut self) {
        self.phase = LinkPhase::None;
        self.image = false;
        self.scratch.clear();
    }
}

impl Default for LinkRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(recognizer: &mut LinkRecognizer, bytes: &[u8]) {
        recognizer.scratch_mut().write_bytes(bytes).unwrap();
    }

    fn literal(recognizer: &LinkRecognizer) -> Vec<u8> {
        let mut out = HtmlWriter::new();
        recognizer.write_literal(&mut out).unwrap();
        out.as_bytes().to_vec()
    }

    #[test]
    fn test_begin_clears_scratch() {
        let mut link = LinkRecognizer::new();
        link.begin(false);
        collect(&mut link, b"stale");
        link.reset();
        link.begin(false);
        assert_eq!(link.parts().text, b"");
        assert_eq!(link.phase(), LinkPhase::Text);
    }

    #[test]
    fn test_parts_split_at_separator() {
        let mut link = LinkRecognizer::new();
        link.begin(false);
        collect(&mut link, b"label");
        link.push_separator().unwrap();
        assert!(link.awaiting_url());
        link.enter_url();
        collect(&mut link, b"http://x");
        let parts = link.parts();
        assert_eq!(parts.text, b"label");
        assert_eq!(parts.url, Some(&b"http://x"[..]));
    }

    #[test]
    fn test_resolved_anchor() {
        let mut link = LinkRecognizer::new();
        link.begin(false);
        collect(&mut link, b"label");
        link.push_separator().unwrap();
        link.enter_url();
        collect(&mut link, b"http://x");
        let mut out = HtmlWriter::new();
        link.write_resolved(&mut out, false).unwrap();
        assert_eq!(out.as_bytes(), b"<a href=\"http://x\">label</a>");
    }

    #[test]
    fn test_resolved_empty_url_reuses_text() {
        let mut link = LinkRecognizer::new();
        link.begin(false);
        collect(&mut link, b"https://a.b");
        link.push_separator().unwrap();
        link.enter_url();
        let mut out = HtmlWriter::new();
        link.write_resolved(&mut out, false).unwrap();
        assert_eq!(out.as_bytes(), b"<a href=\"https://a.b\">https://a.b</a>");
    }

    #[test]
    fn test_resolved_image() {
        let mut link = LinkRecognizer::new();
        link.begin(true);
        collect(&mut link, b"cat");
        link.push_separator().unwrap();
        link.enter_url();
        collect(&mut link, b"cat.png");
        let mut out = HtmlWriter::new();
        link.write_resolved(&mut out, false).unwrap();
        assert_eq!(out.as_bytes(), b"<img src=\"cat.png\" alt=\"cat\">");
    }

    #[test]
    fn test_resolved_without_separator_is_structural() {
        let mut link = LinkRecognizer::new();
        link.begin(false);
        collect(&mut link, b"label");
        let mut out = HtmlWriter::new();
        let err = link.write_resolved(&mut out, false).unwrap_err();
        assert!(matches!(err, Error::Structural(_)));
    }

    #[test]
    fn test_literal_mid_text() {
        let mut link = LinkRecognizer::new();
        link.begin(false);
        collect(&mut link, b"label");
        assert_eq!(literal(&link), b"[label");
    }

    #[test]
    fn test_literal_after_label() {
        let mut link = LinkRecognizer::new();
        link.begin(false);
        collect(&mut link, b"label");
        link.push_separator().unwrap();
        assert_eq!(literal(&link), b"[label]");
    }

    #[test]
    fn test_literal_mid_url() {
        let mut link = LinkRecognizer::new();
        link.begin(true);
        collect(&mut link, b"alt");
        link.push_separator().unwrap();
        link.enter_url();
        collect(&mut link, b"http://pa");
        assert_eq!(literal(&link), b"![alt](http://pa");
    }

    #[test]
    fn test_image_marker() {
        let mut link = LinkRecognizer::new();
        assert!(!link.has_image_marker());
        link.set_image_marker();
        assert!(link.has_image_marker());
        assert!(link.take_image_marker());
        assert!(!link.take_image_marker());
    }
}
