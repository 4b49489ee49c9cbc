//! `StatementAttributes`: the combinable flags that drive block resolution
//! and pretty-printing, independent of which statement variant they're
//! attached to.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatementAttributes: u16 {
        /// Statement stands alone on its own output line; never merges with
        /// a neighbor.
        const SINGLE_LINE = 1 << 0;
        /// Statement opens a block; its matching terminator is given by
        /// `block_ends_with`.
        const BLOCK_START = 1 << 1;
        /// Statement might open a block, pending pass 1 of the resolver.
        /// Never set after resolution completes.
        const MAYBE_BLOCK_START = 1 << 2;
        /// Statement closes the innermost open block.
        const BLOCK_END = 1 << 3;
        /// Left-hand side of a line containing a top-level `=`.
        const ASSIGNMENT_LHS = 1 << 4;
        /// Right-hand side of a line containing a top-level `=`.
        const ASSIGNMENT_RHS = 1 << 5;
        /// Glue this statement onto the previous output line.
        const NO_BREAK = 1 << 6;
        /// Emit with zero indentation regardless of block depth.
        const NO_INDENT = 1 << 7;
    }
}
