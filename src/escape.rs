//! HTML escaping utilities.
//!
//! Text content is copied through untouched except for the three bytes the
//! converter rewrites in escaped or code context. Attribute values written
//! with escaping enabled go through the full five-character table.

use memchr::{memchr2, memchr3};

/// Longest entity any escape in this module can produce (`&quot;`).
pub const MAX_ENTITY_LEN: usize = 6;

/// Entity replacing a byte that was backslash-escaped or sits in code.
///
/// Returns `None` for bytes that pass through as written.
///
/// # Example
/// ```
/// use streammark::escape::entity_for;
///
/// assert_eq!(entity_for(b'<'), Some(&b"&lt;"[..]));
/// assert_eq!(entity_for(b'\\'), Some(&b"&#92;"[..]));
/// assert_eq!(entity_for(b'a'), None);
/// ```
#[inline]
pub fn entity_for(ch: u8) -> Option<&'static [u8]> {
    match ch {
        b'<' => Some(b"&lt;"),
        b'>' => Some(b"&gt;"),
        b'\\' => Some(b"&#92;"),
        _ => None,
    }
}

/// Escape an attribute value into the output buffer.
///
/// Escapes `<`, `>`, `&`, `"`, and `'` to their HTML entity equivalents.
///
/// # Example
/// ```
/// use streammark::escape::escape_full_into;
///
/// let mut out = Vec::new();
/// escape_full_into(&mut out, b"value=\"test\"");
/// assert_eq!(out, b"value=&quot;test&quot;");
/// ```
pub fn escape_full_into(out: &mut Vec<u8>, input: &[u8]) {
    let mut rest = input;
    while let Some(pos) = first_attr_escape(rest) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(attr_entity(rest[pos]));
        rest = &rest[pos + 1..];
    }
    out.extend_from_slice(rest);
}

#[inline]
fn attr_entity(b: u8) -> &'static [u8] {
    match b {
        b'<' => b"&lt;",
        b'>' => b"&gt;",
        b'&' => b"&amp;",
        b'"' => b"&quot;",
        _ => b"&#39;",
    }
}

/// Decode entities already present in `input`, then attribute-escape it.
///
/// Decoding first keeps `&amp;` written by the author from turning into
/// `&amp;amp;`. Input that is not valid UTF-8 is escaped without decoding.
pub fn decode_then_escape_attr_into(out: &mut Vec<u8>, input: &[u8]) {
    match core::str::from_utf8(input) {
        Ok(text) => {
            let decoded = html_escape::decode_html_entities(text);
            escape_full_into(out, decoded.as_bytes());
        }
        Err(_) => escape_full_into(out, input),
    }
}

/// Check if a byte slice needs any escaping for attribute values.
#[inline]
pub fn needs_attr_escape(input: &[u8]) -> bool {
    first_attr_escape(input).is_some()
}

#[inline]
fn first_attr_escape(input: &[u8]) -> Option<usize> {
    let a = memchr3(b'<', b'>', b'&', input);
    let b = memchr2(b'"', b'\'', input);
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
