//! End-to-end tests for the query engine against the builtin Python grammar.
//!
//! These exercise the public surface the way a caller uses it: parse a
//! snippet, build a pattern with the fluent API, run it once, inspect the
//! accumulated context and the end-of-level flag.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use treeq::language::python;
use treeq::query::{self, Checkpoint};
use treeq::{Token, Tree};

type Ctx = Vec<String>;

fn checkpoint(tree: &Tree) -> Checkpoint<'_, Ctx> {
    Checkpoint::new(tree.cursor().down().expect("source has tokens"), Vec::new())
}

fn push(mut ctx: Ctx, token: &Token) -> Ctx {
    ctx.push(token.value().to_string());
    ctx
}

mod sequential_matching {
    use super::*;

    #[test]
    fn handles_sequences() {
        let tree = python().parse("foo.bar").unwrap();
        let matcher = query::sym(push).op(push).sym(push).build();

        let result = matcher.try_match(checkpoint(&tree)).unwrap();

        assert_eq!(result.context, vec!["foo", ".", "bar"]);
        assert!(result.end_of_level);
    }

    #[test]
    fn skips_spaces() {
        let tree = python().parse("foo .\tbar\n.   baz").unwrap();
        let matcher = query::sym(push)
            .op(push)
            .sym(push)
            .op(push)
            .sym(push)
            .build();

        let result = matcher.try_match(checkpoint(&tree)).unwrap();

        assert_eq!(result.context, vec!["foo", ".", "bar", ".", "baz"]);
        assert!(result.end_of_level);
    }

    #[test]
    fn skips_comments() {
        let tree = python().parse("foo # dotted\n. bar").unwrap();
        let matcher = query::sym(push).op(push).sym(push).build();

        let result = matcher.try_match(checkpoint(&tree)).unwrap();

        assert_eq!(result.context, vec!["foo", ".", "bar"]);
    }

    #[test]
    fn fails_without_consuming() {
        let tree = python().parse("foo bar").unwrap();
        let matcher = query::sym(push).op(push).build();

        assert!(matcher.try_match(checkpoint(&tree)).is_none());
    }

    #[test]
    fn short_circuits_later_handlers() {
        let tree = python().parse("foo bar").unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        let count = |calls: &Arc<AtomicUsize>| {
            let calls = Arc::clone(calls);
            move |ctx: Ctx, _token: &Token| {
                calls.fetch_add(1, Ordering::SeqCst);
                ctx
            }
        };

        let first = count(&calls);
        let second = count(&calls);
        let third = count(&calls);
        // Second step expects an operator and fails on `bar`; the third
        // handler must never run.
        let matcher = query::sym(first).op(second).sym(third).build();

        assert!(matcher.try_match(checkpoint(&tree)).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn leaves_end_of_level_unset_with_input_remaining() {
        let tree = python().parse("foo.bar.baz").unwrap();
        let matcher = query::sym(push).op(push).sym(push).build();

        let result = matcher.try_match(checkpoint(&tree)).unwrap();

        assert_eq!(result.context, vec!["foo", ".", "bar"]);
        assert!(!result.end_of_level);
        assert_eq!(result.cursor.node().value(), ".");
    }
}

mod repetition_matching {
    use super::*;

    #[test]
    fn handles_many_occurrences() {
        let tree = python().parse("+-+").unwrap();
        let matcher = query::many(query::op(push)).build();

        let result = matcher.try_match(checkpoint(&tree)).unwrap();

        assert_eq!(result.context, vec!["+", "-", "+"]);
        assert!(result.end_of_level);
    }

    #[test]
    fn handles_spaces() {
        let tree = python().parse("\t \n+    -\t\t+\n\n- \t\n+").unwrap();
        let matcher = query::many(query::op(push)).build();

        let result = matcher.try_match(checkpoint(&tree)).unwrap();

        assert_eq!(result.context, vec!["+", "-", "+", "-", "+"]);
        assert!(result.end_of_level);
    }

    #[test]
    fn matches_exactly_the_successful_iterations() {
        let tree = python().parse("+ - + foo").unwrap();
        let matcher = query::many(query::op(push)).build();

        let result = matcher.try_match(checkpoint(&tree)).unwrap();

        assert_eq!(result.context, vec!["+", "-", "+"]);
        assert!(!result.end_of_level);
    }

    #[test]
    fn zero_matches_is_success() {
        let tree = python().parse("foo").unwrap();
        let matcher = query::many(query::op(push)).build();

        let input = checkpoint(&tree);
        let input_cursor = input.cursor;
        let result = matcher.try_match(input).unwrap();

        assert!(result.context.is_empty());
        assert_eq!(result.cursor, input_cursor);
        assert!(!result.end_of_level);
    }

    #[test]
    fn supports_backtracking() {
        let tree = python().parse("---x").unwrap();
        let matcher = query::many(query::op_eq("-", push))
            .expect_op("-")
            .expect_sym("x")
            .build();

        let result = matcher.try_match(checkpoint(&tree)).unwrap();

        assert_eq!(result.context, vec!["-", "-"]);
        assert!(result.end_of_level);
    }

    #[test]
    fn backtracks_through_trivia() {
        let tree = python().parse("- \t- # dashes\n - x").unwrap();
        let matcher = query::many(query::op_eq("-", push))
            .expect_op("-")
            .expect_sym("x")
            .build();

        let result = matcher.try_match(checkpoint(&tree)).unwrap();

        assert_eq!(result.context, vec!["-", "-"]);
        assert!(result.end_of_level);
    }

    #[test]
    fn many_of_sequences() {
        let tree = python().parse("a=1 b=2 c=3").unwrap();
        let pair = query::sym(push).expect_op("=").num(push);
        let matcher = query::many(pair).build();

        let result = matcher.try_match(checkpoint(&tree)).unwrap();

        assert_eq!(result.context, vec!["a", "1", "b", "2", "c", "3"]);
        assert!(result.end_of_level);
    }

    #[test]
    fn discarded_attempt_never_reaches_the_context() {
        // The trailing `=` begins a fourth pair attempt that fails at the
        // missing number; its handler effects must not leak into the result.
        let tree = python().parse("a=1 b=2 c=3 d=").unwrap();
        let pair = query::sym(push).expect_op("=").num(push);
        let matcher = query::many(pair).build();

        let result = matcher.try_match(checkpoint(&tree)).unwrap();

        assert_eq!(result.context, vec!["a", "1", "b", "2", "c", "3"]);
        assert!(!result.end_of_level);
        assert_eq!(result.cursor.node().value(), " ");
    }
}

mod concurrency {
    use super::*;
    use std::thread;

    #[test]
    fn queries_are_shareable_across_threads() {
        let matcher = Arc::new(query::sym(push).op(push).sym(push).build());
        let tree = Arc::new(python().parse("foo.bar").unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let matcher = Arc::clone(&matcher);
                let tree = Arc::clone(&tree);
                thread::spawn(move || {
                    let result = matcher.try_match(checkpoint(&tree)).unwrap();
                    result.context
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec!["foo", ".", "bar"]);
        }
    }
}
