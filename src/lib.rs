//! # treeq
//!
//! A structural query engine for source code.
//!
//! Source text is lexed and parsed under a declarative per-language grammar
//! configuration into a token tree; a caller then describes a pattern (a
//! sequence of expected token kinds, with repetitions of sub-patterns) and
//! runs it against a traversal position in the tree. Insignificant whitespace and
//! comments are skipped automatically, repetitions backtrack when a later
//! step needs the input, and the caller accumulates whatever it wants through
//! handler callbacks.
//!
//! ```text
//! let lang = language::python();
//! let tree = lang.parse("foo.bar")?;
//! let query = query::sym(push).op(push).sym(push).build();
//! let start = Checkpoint::new(tree.cursor().down().unwrap(), Vec::new());
//! let result = query.try_match(start);   // context: ["foo", ".", "bar"]
//! ```

pub mod grammar;
pub mod language;
pub mod lexing;
pub mod parsing;
pub mod query;

pub use grammar::{GrammarConfig, GrammarError};
pub use language::Language;
pub use lexing::{LexError, Token, TokenKind};
pub use parsing::{Cursor, ParseError, Tree};
pub use query::{Checkpoint, Matcher, Query};
