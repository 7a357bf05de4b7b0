//! Fluent construction of queries.
//!
//! The builder is declarative sugar over [`Sequence`] and [`Repeat`]: it
//! assembles an expression tree up front and executes nothing. `build()`
//! yields an immutable [`Query`] that can be run any number of times, from
//! any thread.
//!
//! Entry points mirror the chain methods, so a pattern reads as one
//! expression:
//!
//! ```text
//! let dotted = sym(push).op(push).sym(push).build();
//! let dashes = many(op_eq("-", push)).expect_op("-").expect_sym("x").build();
//! ```

use crate::lexing::{Token, TokenKind};
use crate::query::checkpoint::Checkpoint;
use crate::query::matchers::{Continuation, Matcher, Repeat, Sequence, TokenMatcher};

/// Start a pattern with a symbol matcher.
pub fn sym<C, F>(handler: F) -> QueryBuilder<C>
where
    C: Clone + 'static,
    F: Fn(C, &Token) -> C + Send + Sync + 'static,
{
    QueryBuilder::new().sym(handler)
}

/// Start a pattern with an operator matcher.
pub fn op<C, F>(handler: F) -> QueryBuilder<C>
where
    C: Clone + 'static,
    F: Fn(C, &Token) -> C + Send + Sync + 'static,
{
    QueryBuilder::new().op(handler)
}

/// Start a pattern with a number matcher.
pub fn num<C, F>(handler: F) -> QueryBuilder<C>
where
    C: Clone + 'static,
    F: Fn(C, &Token) -> C + Send + Sync + 'static,
{
    QueryBuilder::new().num(handler)
}

/// Start a pattern with a string matcher.
pub fn string<C, F>(handler: F) -> QueryBuilder<C>
where
    C: Clone + 'static,
    F: Fn(C, &Token) -> C + Send + Sync + 'static,
{
    QueryBuilder::new().string(handler)
}

/// Start a pattern with an exact-lexeme symbol matcher.
pub fn sym_eq<C, F>(lexeme: impl Into<String>, handler: F) -> QueryBuilder<C>
where
    C: Clone + 'static,
    F: Fn(C, &Token) -> C + Send + Sync + 'static,
{
    QueryBuilder::new().sym_eq(lexeme, handler)
}

/// Start a pattern with an exact-lexeme operator matcher.
pub fn op_eq<C, F>(lexeme: impl Into<String>, handler: F) -> QueryBuilder<C>
where
    C: Clone + 'static,
    F: Fn(C, &Token) -> C + Send + Sync + 'static,
{
    QueryBuilder::new().op_eq(lexeme, handler)
}

/// Start a pattern with a repetition of `inner`.
pub fn many<C: Clone + 'static>(inner: QueryBuilder<C>) -> QueryBuilder<C> {
    QueryBuilder::new().many(inner)
}

/// Accumulates matcher steps; consumed by [`build`](QueryBuilder::build).
pub struct QueryBuilder<C> {
    steps: Vec<Box<dyn Matcher<C>>>,
}

impl<C: Clone + 'static> QueryBuilder<C> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    fn push(mut self, matcher: impl Matcher<C> + 'static) -> Self {
        self.steps.push(Box::new(matcher));
        self
    }

    /// Expect a symbol token; accumulate it through `handler`.
    pub fn sym(self, handler: impl Fn(C, &Token) -> C + Send + Sync + 'static) -> Self {
        self.push(TokenMatcher::new(TokenKind::Symbol).handler(handler))
    }

    /// Expect an operator token; accumulate it through `handler`.
    pub fn op(self, handler: impl Fn(C, &Token) -> C + Send + Sync + 'static) -> Self {
        self.push(TokenMatcher::new(TokenKind::Operator).handler(handler))
    }

    /// Expect a number token; accumulate it through `handler`.
    pub fn num(self, handler: impl Fn(C, &Token) -> C + Send + Sync + 'static) -> Self {
        self.push(TokenMatcher::new(TokenKind::Number).handler(handler))
    }

    /// Expect a string token; accumulate it through `handler`.
    pub fn string(self, handler: impl Fn(C, &Token) -> C + Send + Sync + 'static) -> Self {
        self.push(TokenMatcher::new(TokenKind::Str).handler(handler))
    }

    /// Expect a symbol with an exact lexeme; accumulate it through `handler`.
    pub fn sym_eq(
        self,
        lexeme: impl Into<String>,
        handler: impl Fn(C, &Token) -> C + Send + Sync + 'static,
    ) -> Self {
        self.push(
            TokenMatcher::new(TokenKind::Symbol)
                .lexeme(lexeme)
                .handler(handler),
        )
    }

    /// Expect an operator with an exact lexeme; accumulate it through `handler`.
    pub fn op_eq(
        self,
        lexeme: impl Into<String>,
        handler: impl Fn(C, &Token) -> C + Send + Sync + 'static,
    ) -> Self {
        self.push(
            TokenMatcher::new(TokenKind::Operator)
                .lexeme(lexeme)
                .handler(handler),
        )
    }

    /// Expect a symbol with an exact lexeme, leaving the context untouched.
    pub fn expect_sym(self, lexeme: impl Into<String>) -> Self {
        self.push(TokenMatcher::new(TokenKind::Symbol).lexeme(lexeme))
    }

    /// Expect an operator with an exact lexeme, leaving the context untouched.
    pub fn expect_op(self, lexeme: impl Into<String>) -> Self {
        self.push(TokenMatcher::new(TokenKind::Operator).lexeme(lexeme))
    }

    /// Apply `inner` zero or more times, greedily, giving iterations back
    /// when later steps of this pattern need the input.
    pub fn many(self, inner: QueryBuilder<C>) -> Self {
        self.push(Repeat::new(Box::new(inner.into_sequence())))
    }

    fn into_sequence(self) -> Sequence<C> {
        Sequence::new(self.steps)
    }

    /// Finish construction, yielding an immutable, reusable query.
    pub fn build(self) -> Query<C> {
        Query {
            root: self.into_sequence(),
        }
    }
}

impl<C: Clone + 'static> Default for QueryBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// A built pattern. Matching consumes nothing on failure and never mutates
/// the tree; the query itself is immutable and shareable.
pub struct Query<C> {
    root: Sequence<C>,
}

impl<C> Query<C> {
    /// Attempt to consume this pattern from `checkpoint`. Returns the final
    /// checkpoint on success, `None` when the pattern does not match here.
    pub fn try_match<'t>(&self, checkpoint: Checkpoint<'t, C>) -> Option<Checkpoint<'t, C>> {
        self.root.try_match(checkpoint)
    }
}

impl<C> Matcher<C> for Query<C> {
    fn try_match_then<'t>(
        &self,
        checkpoint: Checkpoint<'t, C>,
        next: &Continuation<'_, 't, C>,
    ) -> Option<Checkpoint<'t, C>> {
        self.root.try_match_then(checkpoint, next)
    }
}
