//! Parsing: token stream to a navigable tree.
//!
//! Parsing here is purely structural: bracket pairs and template-string
//! regions become nesting, everything else stays a flat run of siblings. The
//! [`Cursor`] is the only way to walk the result, and it is read-only: the
//! tree is never mutated after construction, so any number of cursors (and
//! queries) can traverse it concurrently.

pub mod cursor;
pub mod tree;

pub use cursor::Cursor;
pub use tree::{Node, NodeId, ParseError, Tree};
