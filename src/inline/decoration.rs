//! Inline decoration flags.
//!
//! Each decoration is an independent on/off flag. There is no nesting
//! stack, so interleaved toggles close tags out of order; browsers accept
//! the result.

/// One of the six inline formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoration {
    /// `*text*`
    Italic,
    /// `**text**`
    Bold,
    /// `~~text~~`
    Strike,
    /// `~text~`
    Subscript,
    /// `` `text` ``
    InlineCode,
    /// `^text^`
    Superscript,
}

impl Decoration {
    /// All decorations, in the order they are closed at end of stream.
    pub const ALL: [Decoration; 6] = [
        Decoration::Italic,
        Decoration::Bold,
        Decoration::Strike,
        Decoration::Subscript,
        Decoration::InlineCode,
        Decoration::Superscript,
    ];

    /// HTML element name.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Italic => "i",
            Self::Bold => "b",
            Self::Strike => "s",
            Self::Subscript => "sub",
            Self::InlineCode => "code",
            Self::Superscript => "sup",
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of currently open decorations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecorationSet {
    bits: u8,
}

impl DecorationSet {
    /// Empty set.
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Whether `decoration` is open.
    #[inline]
    pub fn contains(self, decoration: Decoration) -> bool {
        self.bits & decoration.bit() != 0
    }

    /// Flip `decoration`, returning `true` if it is now open.
    #[inline]
    pub fn toggle(&mut self, decoration: Decoration) -> bool {
        self.bits ^= decoration.bit();
        self.contains(decoration)
    }

    /// Whether nothing is open.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Open decorations in closing order.
    pub fn iter(self) -> impl Iterator<Item = Decoration> {
        Decoration::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}
