//! HTML output buffer with fallible, doubling growth.
//!
//! Every write reserves before copying so that allocation failure surfaces
//! as a `TryReserveError` instead of aborting the process.

use std::collections::TryReserveError;

use crate::escape;
use crate::limits;

type WriteResult = Result<(), TryReserveError>;

/// Append-only HTML byte buffer, reused across feed calls.
///
/// # Example
/// ```
/// use streammark::HtmlWriter;
///
/// let mut writer = HtmlWriter::new();
/// writer.paragraph_start().unwrap();
/// writer.write_bytes(b"Hello").unwrap();
/// writer.paragraph_end().unwrap();
///
/// assert_eq!(writer.as_bytes(), b"<p>Hello</p>");
/// ```
#[derive(Debug)]
pub struct HtmlWriter {
    out: Vec<u8>,
}

impl HtmlWriter {
    /// Create a new writer with the default capacity.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(limits::DEFAULT_BUFFER_CAPACITY)
    }

    /// Create with explicit capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    /// Grow to at least double the current capacity.
    #[cold]
    #[inline(never)]
    fn grow(&mut self, needed: usize) -> WriteResult {
        let required = self.out.len() + needed;
        let new_cap = (self.out.capacity() * 2)
            .max(required)
            .max(limits::DEFAULT_BUFFER_CAPACITY);
        self.out.try_reserve_exact(new_cap - self.out.len())
    }

    /// Ensure capacity for additional bytes.
    #[inline]
    fn ensure_capacity(&mut self, additional: usize) -> WriteResult {
        if self.out.len() + additional > self.out.capacity() {
            self.grow(additional)?;
        }
        Ok(())
    }

    /// Write raw bytes without escaping.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) -> WriteResult {
        self.ensure_capacity(bytes.len())?;
        self.out.extend_from_slice(bytes);
        Ok(())
    }

    /// Write a static string.
    #[inline]
    pub fn write_str(&mut self, s: &'static str) -> WriteResult {
        self.write_bytes(s.as_bytes())
    }

    /// Write a single byte.
    #[inline]
    pub fn write_byte(&mut self, b: u8) -> WriteResult {
        self.ensure_capacity(1)?;
        self.out.push(b);
        Ok(())
    }

    /// Write an attribute value, optionally decoding and escaping it.
    pub fn write_attr(&mut self, value: &[u8], escape_attr: bool) -> WriteResult {
        if escape_attr && escape::needs_attr_escape(value) {
            self.ensure_capacity(value.len() * escape::MAX_ENTITY_LEN)?;
            escape::decode_then_escape_attr_into(&mut self.out, value);
            Ok(())
        } else {
            self.write_bytes(value)
        }
    }

    /// Current output length.
    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Check if output is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Last byte written, if any.
    #[inline]
    pub fn last(&self) -> Option<u8> {
        self.out.last().copied()
    }

    /// Clear output for reuse (keeps capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.out.clear();
    }

    /// Get output as byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    /// Current capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.out.capacity()
    }

    // --- HTML Tag Helpers ---

    /// Write opening tag: `<tagname>`
    #[inline]
    pub fn open_tag(&mut self, tag: &'static str) -> WriteResult {
        self.write_byte(b'<')?;
        self.write_str(tag)?;
        self.write_byte(b'>')
    }

    /// Write closing tag: `</tagname>`
    #[inline]
    pub fn close_tag(&mut self, tag: &'static str) -> WriteResult {
        self.write_str("</")?;
        self.write_str(tag)?;
        self.write_byte(b'>')
    }

    // --- Block Elements ---

    /// Write paragraph start: `<p>`
    #[inline]
    pub fn paragraph_start(&mut self) -> WriteResult {
        self.write_str("<p>")
    }

    /// Write paragraph end: `</p>`
    #[inline]
    pub fn paragraph_end(&mut self) -> WriteResult {
        self.write_str("</p>")
    }

    /// Write heading start: `<hN>` or `<hN id="K">`
    pub fn heading_start(&mut self, level: u8, id: Option<u32>) -> WriteResult {
        debug_assert!((1..=6).contains(&level));
        self.write_str("<h")?;
        self.write_byte(b'0' + level)?;
        if let Some(id) = id {
            self.write_str(" id=\"")?;
            self.write_u32(id)?;
            self.write_byte(b'"')?;
        }
        self.write_byte(b'>')
    }

    /// Write heading end: `</hN>`
    #[inline]
    pub fn heading_end(&mut self, level: u8) -> WriteResult {
        debug_assert!((1..=6).contains(&level));
        self.write_str("</h")?;
        self.write_byte(b'0' + level)?;
        self.write_byte(b'>')
    }

    /// Write code block start: `<pre><code>`
    #[inline]
    pub fn code_block_start(&mut self) -> WriteResult {
        self.write_str("<pre><code>")
    }

    /// Write code block end: `</code></pre>`
    #[inline]
    pub fn code_block_end(&mut self) -> WriteResult {
        self.write_str("</code></pre>")
    }

    /// Write thematic break: `<hr>`
    #[inline]
    pub fn thematic_break(&mut self) -> WriteResult {
        self.write_str("<hr>")
    }

    /// Write blockquote start: `<blockquote>`
    #[inline]
    pub fn blockquote_start(&mut self) -> WriteResult {
        self.write_str("<blockquote>")
    }

    /// Write blockquote end: `</blockquote>`
    #[inline]
    pub fn blockquote_end(&mut self) -> WriteResult {
        self.write_str("</blockquote>")
    }

    /// Write list start (unordered): `<ul>`
    #[inline]
    pub fn ul_start(&mut self) -> WriteResult {
        self.write_str("<ul>")
    }

    /// Write list end (unordered), closing the trailing item: `</li></ul>`
    #[inline]
    pub fn ul_end(&mut self) -> WriteResult {
        self.write_str("</li></ul>")
    }

    /// Write list end (ordered): `</ol>`
    #[inline]
    pub fn ol_end(&mut self) -> WriteResult {
        self.write_str("</ol>")
    }

    /// Write list item start: `<li>`
    #[inline]
    pub fn li_start(&mut self) -> WriteResult {
        self.write_str("<li>")
    }

    /// Write list item end: `</li>`
    #[inline]
    pub fn li_end(&mut self) -> WriteResult {
        self.write_str("</li>")
    }

    // --- Links ---

    /// Write a complete anchor: `<a href="url">text</a>`
    pub fn link(&mut self, url: &[u8], text: &[u8], escape_attr: bool) -> WriteResult {
        self.write_str("<a href=\"")?;
        self.write_attr(url, escape_attr)?;
        self.write_str("\">")?;
        self.write_bytes(text)?;
        self.write_str("</a>")
    }

    /// Write an image: `<img src="url" alt="text">`
    pub fn image(&mut self, url: &[u8], alt: &[u8], escape_attr: bool) -> WriteResult {
        self.write_str("<img src=\"")?;
        self.write_attr(url, escape_attr)?;
        self.write_str("\" alt=\"")?;
        self.write_attr(alt, escape_attr)?;
        self.write_str("\">")
    }

    /// Write a u32 as decimal.
    fn write_u32(&mut self, mut n: u32) -> WriteResult {
        if n == 0 {
            return self.write_byte(b'0');
        }

        let mut buf = [0u8; 10]; // Max digits for u32
        let mut i = buf.len();

        while n > 0 {
            i -= 1;
            buf[i] = b'0' + (n % 10) as u8;
            n /= 10;
        }

        self.write_bytes(&buf[i..])
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}
