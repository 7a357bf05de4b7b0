//! The query engine: pattern matching over a parsed token tree.
//!
//! A pattern is built once with the fluent [`builder`] API, then run against
//! a [`Checkpoint`] obtained from a tree. Matching threads the checkpoint
//! through trivia-skipping and token-consuming steps and either returns the
//! final checkpoint or `None`. There is no other failure channel, and a
//! failed match has no observable effects.

pub mod builder;
pub mod checkpoint;
pub mod matchers;

pub use builder::{many, num, op, op_eq, string, sym, sym_eq, Query, QueryBuilder};
pub use checkpoint::Checkpoint;
pub use matchers::{skip_trivia, Continuation, Handler, Matcher, Repeat, Sequence, TokenMatcher};
