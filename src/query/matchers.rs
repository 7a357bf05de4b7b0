//! The matching engine: trivia skipping, atomic token matchers, and the
//! sequence/repetition combinators.
//!
//! Failure is a value, not an error: every matcher either returns the next
//! [`Checkpoint`] or `None`, and every combinator that can meaningfully retry
//! or stop recovers locally. Backtracking works over whole repetition
//! iterations: a repetition first matches greedily, then gives iterations
//! back one at a time while the rest of the enclosing sequence (passed in as
//! a continuation) keeps failing.

use crate::lexing::{Token, TokenKind};
use crate::query::checkpoint::Checkpoint;
use std::sync::Arc;

/// Caller-supplied context accumulator, invoked once per successfully
/// consumed token. The returned context is the only channel back into
/// matching state.
pub type Handler<C> = Arc<dyn Fn(C, &Token) -> C + Send + Sync>;

/// The rest of an enclosing sequence, from a matcher's point of view.
pub type Continuation<'a, 't, C> = dyn Fn(Checkpoint<'t, C>) -> Option<Checkpoint<'t, C>> + 'a;

/// A composable unit that attempts to consume exactly the pattern it
/// represents from a checkpoint.
pub trait Matcher<C>: Send + Sync {
    /// Match this pattern, then hand the resulting checkpoint to `next`.
    /// Matchers with local choice points (repetition) retry shorter matches
    /// while `next` fails; everything else is all-or-nothing.
    fn try_match_then<'t>(
        &self,
        checkpoint: Checkpoint<'t, C>,
        next: &Continuation<'_, 't, C>,
    ) -> Option<Checkpoint<'t, C>>;

    /// Match this pattern standalone (greedy for repetitions).
    fn try_match<'t>(&self, checkpoint: Checkpoint<'t, C>) -> Option<Checkpoint<'t, C>> {
        self.try_match_then(checkpoint, &|after| Some(after))
    }
}

/// Advance past newline/whitespace/comment nodes so pattern matchers can be
/// written as if insignificant formatting never existed. Fails when the level
/// runs out of siblings while still on trivia, or when the checkpoint has
/// already consumed its last sibling. Idempotent on its own output.
pub fn skip_trivia<C>(checkpoint: Checkpoint<'_, C>) -> Option<Checkpoint<'_, C>> {
    if checkpoint.end_of_level {
        return None;
    }
    let mut cursor = checkpoint.cursor;
    while cursor.node().token().is_trivia() {
        cursor = cursor.right()?;
    }
    Some(Checkpoint { cursor, ..checkpoint })
}

/// Matches one token of a given kind, optionally constrained to an exact
/// lexeme, invoking the handler on success.
pub struct TokenMatcher<C> {
    kind: TokenKind,
    lexeme: Option<String>,
    handler: Option<Handler<C>>,
}

impl<C> TokenMatcher<C> {
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            lexeme: None,
            handler: None,
        }
    }

    pub fn lexeme(mut self, lexeme: impl Into<String>) -> Self {
        self.lexeme = Some(lexeme.into());
        self
    }

    pub fn handler(mut self, handler: impl Fn(C, &Token) -> C + Send + Sync + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }
}

impl<C> Matcher<C> for TokenMatcher<C> {
    fn try_match_then<'t>(
        &self,
        checkpoint: Checkpoint<'t, C>,
        next: &Continuation<'_, 't, C>,
    ) -> Option<Checkpoint<'t, C>> {
        let skipped = skip_trivia(checkpoint)?;
        let token = skipped.cursor.node().token();
        if token.kind() != self.kind {
            return None;
        }
        if let Some(expected) = &self.lexeme {
            if token.value() != expected {
                return None;
            }
        }
        let cursor = skipped.cursor;
        let consumed = skipped.map_context(|context| match &self.handler {
            Some(handler) => handler(context, token),
            None => context,
        });
        let advanced = match cursor.right() {
            Some(right) => Checkpoint {
                cursor: right,
                end_of_level: false,
                ..consumed
            },
            None => Checkpoint {
                end_of_level: true,
                ..consumed
            },
        };
        next(advanced)
    }
}

/// Threads a checkpoint through sub-matchers in order. A failed step fails
/// the sequence at that point; an earlier repetition step may then give back
/// iterations, because each step receives the remainder of the sequence as
/// its continuation.
pub struct Sequence<C> {
    steps: Vec<Box<dyn Matcher<C>>>,
}

impl<C> Sequence<C> {
    pub fn new(steps: Vec<Box<dyn Matcher<C>>>) -> Self {
        Self { steps }
    }

    fn match_steps<'t>(
        steps: &[Box<dyn Matcher<C>>],
        checkpoint: Checkpoint<'t, C>,
        next: &Continuation<'_, 't, C>,
    ) -> Option<Checkpoint<'t, C>> {
        match steps.split_first() {
            None => next(checkpoint),
            Some((head, rest)) => head.try_match_then(checkpoint, &|after| {
                Self::match_steps(rest, after, next)
            }),
        }
    }
}

impl<C> Matcher<C> for Sequence<C> {
    fn try_match_then<'t>(
        &self,
        checkpoint: Checkpoint<'t, C>,
        next: &Continuation<'_, 't, C>,
    ) -> Option<Checkpoint<'t, C>> {
        Self::match_steps(&self.steps, checkpoint, next)
    }
}

/// Applies a sub-matcher zero or more times, greedily, keeping the last
/// known-good checkpoint. Zero successful iterations is itself a success.
pub struct Repeat<C> {
    inner: Box<dyn Matcher<C>>,
}

impl<C> Repeat<C> {
    pub fn new(inner: Box<dyn Matcher<C>>) -> Self {
        Self { inner }
    }
}

impl<C: Clone> Matcher<C> for Repeat<C> {
    fn try_match_then<'t>(
        &self,
        checkpoint: Checkpoint<'t, C>,
        next: &Continuation<'_, 't, C>,
    ) -> Option<Checkpoint<'t, C>> {
        let mut attempts = vec![checkpoint];
        loop {
            let last_good = attempts.last().expect("seeded with the input checkpoint");
            let attempt = self
                .inner
                .try_match(last_good.clone())
                // An iteration that consumed nothing would repeat forever;
                // treat it as the loop's termination condition.
                .filter(|after| !after.same_position(last_good));
            match attempt {
                Some(after) => attempts.push(after),
                None => break,
            }
        }
        // Longest match first; give one iteration back at a time while the
        // rest of the sequence keeps failing. A refused attempt's context is
        // dropped with its checkpoint and never observable.
        while let Some(candidate) = attempts.pop() {
            if let Some(result) = next(candidate) {
                return Some(result);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::python;
    use crate::parsing::Tree;

    type Ctx = Vec<String>;

    fn start(tree: &Tree) -> Checkpoint<'_, Ctx> {
        Checkpoint::new(tree.cursor().down().unwrap(), Vec::new())
    }

    fn collect(mut ctx: Ctx, token: &Token) -> Ctx {
        ctx.push(token.value().to_string());
        ctx
    }

    fn sym() -> TokenMatcher<Ctx> {
        TokenMatcher::new(TokenKind::Symbol).handler(collect)
    }

    fn op() -> TokenMatcher<Ctx> {
        TokenMatcher::new(TokenKind::Operator).handler(collect)
    }

    #[test]
    fn test_skip_trivia_lands_on_first_significant_node() {
        let tree = python().parse("  \t\n# note\n foo").unwrap();
        let skipped = skip_trivia(start(&tree)).unwrap();
        assert_eq!(skipped.cursor.node().value(), "foo");
    }

    #[test]
    fn test_skip_trivia_is_idempotent() {
        let tree = python().parse("  foo").unwrap();
        let once = skip_trivia(start(&tree)).unwrap();
        let twice = skip_trivia(once.clone()).unwrap();
        assert!(once.same_position(&twice));
    }

    #[test]
    fn test_skip_trivia_fails_on_all_trivia_level() {
        let tree = python().parse(" \t\n").unwrap();
        assert!(skip_trivia(start(&tree)).is_none());
    }

    #[test]
    fn test_skip_trivia_fails_past_end_of_level() {
        let tree = python().parse("foo").unwrap();
        let consumed = sym().try_match(start(&tree)).unwrap();
        assert!(consumed.end_of_level);
        assert!(skip_trivia(consumed).is_none());
    }

    #[test]
    fn test_token_matcher_consumes_and_accumulates() {
        let tree = python().parse("foo bar").unwrap();
        let after = sym().try_match(start(&tree)).unwrap();
        assert_eq!(after.context, vec!["foo"]);
        assert!(!after.end_of_level);
        assert_eq!(after.cursor.node().value(), " ");
    }

    #[test]
    fn test_token_matcher_mismatch_has_no_side_effects() {
        let tree = python().parse("+").unwrap();
        assert!(sym().try_match(start(&tree)).is_none());
    }

    #[test]
    fn test_lexeme_constraint() {
        let tree = python().parse("+").unwrap();
        let minus = TokenMatcher::<Ctx>::new(TokenKind::Operator).lexeme("-");
        assert!(minus.try_match(start(&tree)).is_none());
        let plus = TokenMatcher::<Ctx>::new(TokenKind::Operator).lexeme("+");
        assert!(plus.try_match(start(&tree)).is_some());
    }

    #[test]
    fn test_sequence_threads_checkpoints() {
        let tree = python().parse("foo.bar").unwrap();
        let seq = Sequence::new(vec![
            Box::new(sym()),
            Box::new(op()),
            Box::new(sym()),
        ]);
        let after = seq.try_match(start(&tree)).unwrap();
        assert_eq!(after.context, vec!["foo", ".", "bar"]);
        assert!(after.end_of_level);
    }

    #[test]
    fn test_sequence_fails_fast() {
        let tree = python().parse("foo bar").unwrap();
        let seq = Sequence::new(vec![Box::new(sym()), Box::new(op())]);
        assert!(seq.try_match(start(&tree)).is_none());
    }

    #[test]
    fn test_repeat_is_greedy() {
        let tree = python().parse("+-+x").unwrap();
        let many = Repeat::new(Box::new(op()));
        let after = many.try_match(start(&tree)).unwrap();
        assert_eq!(after.context, vec!["+", "-", "+"]);
        assert_eq!(after.cursor.node().value(), "x");
    }

    #[test]
    fn test_repeat_zero_matches_is_success() {
        let tree = python().parse("foo").unwrap();
        let many = Repeat::new(Box::new(op()));
        let input = start(&tree);
        let input_cursor = input.cursor;
        let after = many.try_match(input).unwrap();
        assert!(after.context.is_empty());
        assert_eq!(after.cursor, input_cursor);
    }

    #[test]
    fn test_repeat_gives_back_iterations_to_the_continuation() {
        let tree = python().parse("---x").unwrap();
        let many = Repeat::new(Box::new(
            TokenMatcher::new(TokenKind::Operator)
                .lexeme("-")
                .handler(collect),
        ));
        let tail = Sequence::new(vec![
            Box::new(TokenMatcher::<Ctx>::new(TokenKind::Operator).lexeme("-")),
            Box::new(TokenMatcher::<Ctx>::new(TokenKind::Symbol).lexeme("x")),
        ]);
        let after = many
            .try_match_then(start(&tree), &|cp| tail.try_match(cp))
            .unwrap();
        assert_eq!(after.context, vec!["-", "-"]);
        assert!(after.end_of_level);
    }

    #[test]
    fn test_nested_repeat_terminates_without_progress() {
        let tree = python().parse("+").unwrap();
        let inner = Repeat::new(Box::new(sym()));
        let outer = Repeat::new(Box::new(inner) as Box<dyn Matcher<Ctx>>);
        let after = outer.try_match(start(&tree)).unwrap();
        assert!(after.context.is_empty());
    }
}
