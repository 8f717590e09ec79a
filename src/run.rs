//! Special-character run counting.
//!
//! A run is a maximal sequence of one repeated special character. Its
//! meaning (emphasis, bullet, fence, literal text) is only decided once the
//! run ends, by the byte that follows it.

/// Lookup table for the special characters.
const SPECIAL_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'*' as usize] = true;
    table[b'-' as usize] = true;
    table[b'#' as usize] = true;
    table[b'`' as usize] = true;
    table[b'^' as usize] = true;
    table[b'~' as usize] = true;
    table[b'>' as usize] = true;
    table[b'+' as usize] = true;
    table
};

/// Whether `b` can start or extend a special run.
#[inline]
pub fn is_special(b: u8) -> bool {
    SPECIAL_TABLE[b as usize]
}

/// A counted run of one special character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// The repeated character.
    pub ch: u8,
    /// Number of repetitions, at least 1.
    pub len: u32,
}

/// The run currently being accumulated, if any.
#[derive(Debug, Default)]
pub struct SpecialRun {
    current: Option<Run>,
}

impl SpecialRun {
    /// Create an idle counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `ch` if it continues the open run.
    ///
    /// Returns `false` when no run is open or `ch` is a different
    /// character; the caller must then end the run and start a new one.
    #[inline]
    pub fn extend(&mut self, ch: u8) -> bool {
        match &mut self.current {
            Some(run) if run.ch == ch => {
                run.len = run.len.saturating_add(1);
                true
            }
            _ => false,
        }
    }

    /// Start a new run of length 1. Any open run is discarded.
    #[inline]
    pub fn start(&mut self, ch: u8) {
        debug_assert!(is_special(ch));
        self.current = Some(Run { ch, len: 1 });
    }

    /// Close the open run and hand it to the caller.
    #[inline]
    pub fn take(&mut self) -> Option<Run> {
        self.current.take()
    }

    /// Whether no run is open.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    /// The open run, if any.
    #[inline]
    pub fn current(&self) -> Option<Run> {
        self.current
    }
}
