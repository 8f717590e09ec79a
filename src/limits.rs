//! Fixed limits and sizing constants.
//!
//! The converter keeps no unbounded speculative state apart from the link
//! scratch buffer, so most of these bound per-byte work rather than memory.

/// Initial capacity of the output and link scratch buffers.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Number of classification passes a single input byte may take.
///
/// The first pass is the normal one; the second is the replay that follows
/// a special run being consumed by the byte that terminated it.
pub const MAX_DISPATCH_PASSES: usize = 2;

/// Deepest heading level (`######`).
pub const MAX_HEADING_LEVEL: u32 = 6;

/// Shortest backtick run that opens or closes a code block.
pub const MIN_FENCE_LEN: u32 = 3;

/// Indentation units contributed by a tab at line start.
pub const TAB_WIDTH: u32 = 4;

/// Chunk size used by the command-line front end.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_reasonable() {
        const { assert!(MAX_DISPATCH_PASSES == 2) };
        const { assert!(MIN_FENCE_LEN >= 3) };
        const { assert!(MAX_HEADING_LEVEL == 6) };
        const { assert!(DEFAULT_BUFFER_CAPACITY >= 64) };
        const { assert!(DEFAULT_CHUNK_SIZE >= 1) };
    }
}
