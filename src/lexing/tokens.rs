//! Token definitions shared by the lexer, the parser, and the query engine.
//!
//! Tokens are flat and value-carrying: the lexer classifies each lexeme into a
//! [`TokenKind`] and keeps the literal text in `value`. Interpolating strings
//! additionally record where their embedded expression regions live in the
//! original source, so the parser can re-enter them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Classification of a lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Symbol,
    Operator,
    Number,
    #[serde(rename = "string")]
    Str,
    Newline,
    Whitespace,
    Comment,
    BracketOpen,
    BracketClose,
    /// Synthesized by the parser for the tree root; never produced by the lexer.
    Root,
}

impl TokenKind {
    /// Whitespace, newlines, and comments carry no pattern-level meaning and
    /// are stepped over by the query engine before every match attempt.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Whitespace | TokenKind::Comment
        )
    }

    pub fn is_bracket(self) -> bool {
        matches!(self, TokenKind::BracketOpen | TokenKind::BracketClose)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Symbol => "symbol",
            TokenKind::Operator => "operator",
            TokenKind::Number => "number",
            TokenKind::Str => "string",
            TokenKind::Newline => "newline",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::BracketOpen => "bracket-open",
            TokenKind::BracketClose => "bracket-close",
            TokenKind::Root => "root",
        };
        write!(f, "{}", name)
    }
}

/// A single lexeme with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// Byte ranges (into the original source) of template expression regions.
    /// Empty for everything but interpolating strings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedded: Vec<Range<usize>>,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            embedded: Vec::new(),
        }
    }

    /// The synthetic token carried by a tree's root node.
    pub fn root() -> Self {
        Self::new(TokenKind::Root, "")
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.value)
    }
}
