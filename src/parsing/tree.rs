//! The parsed token tree.
//!
//! The tree is an arena of [`Node`]s. The root is a synthetic node whose
//! children are the top-level tokens in source order; bracket pairs nest their
//! inner tokens under the open-bracket node, and interpolating strings nest
//! the re-lexed contents of their embedded expression regions under the string
//! node. Trivia tokens (whitespace, newlines, comments) are ordinary leaf
//! nodes; they stay in the tree so every consumer sees the same structure.

use crate::grammar::CompiledGrammar;
use crate::lexing::{LexError, Lexer, Token, TokenKind};
use crate::parsing::cursor::Cursor;
use std::fmt;

pub type NodeId = usize;

/// One slot in the tree arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    token: Token,
    children: Vec<NodeId>,
}

impl Node {
    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn kind(&self) -> TokenKind {
        self.token.kind
    }

    pub fn value(&self) -> &str {
        &self.token.value
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// An immutable parsed tree. Obtain one from
/// [`Language::parse`](crate::language::Language::parse).
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// A cursor positioned at the root node. `down()` enters the first
    /// top-level token.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::root(self)
    }
}

/// Errors produced while building a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Lex(LexError),
    /// An open bracket with no matching close.
    UnbalancedBracket { bracket: String },
    /// A close bracket with no matching open.
    UnexpectedClose { bracket: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(err) => write!(f, "{}", err),
            ParseError::UnbalancedBracket { bracket } => {
                write!(f, "Unbalanced bracket {:?}", bracket)
            }
            ParseError::UnexpectedClose { bracket } => {
                write!(f, "Unexpected closing bracket {:?}", bracket)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Lex(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::Lex(err)
    }
}

/// Builds a [`Tree`] from source text, one grammar at a time.
pub(crate) struct TreeBuilder<'g> {
    grammar: &'g CompiledGrammar,
    nodes: Vec<Node>,
}

impl<'g> TreeBuilder<'g> {
    pub(crate) fn new(grammar: &'g CompiledGrammar) -> Self {
        Self {
            grammar,
            nodes: Vec::new(),
        }
    }

    pub(crate) fn build(mut self, source: &str) -> Result<Tree, ParseError> {
        let tokens = Lexer::new(self.grammar).tokenize(source)?;
        let mut iter = tokens.into_iter();
        let children = self.build_level(&mut iter, source, None)?;
        let root = self.push(Node {
            token: Token::root(),
            children,
        });
        Ok(Tree {
            nodes: self.nodes,
            root,
        })
    }

    /// Consume tokens until `closing` (or the end of input for the top
    /// level), producing the node ids of one sibling level.
    fn build_level(
        &mut self,
        iter: &mut std::vec::IntoIter<Token>,
        source: &str,
        closing: Option<&str>,
    ) -> Result<Vec<NodeId>, ParseError> {
        let mut children = Vec::new();
        while let Some(token) = iter.next() {
            match token.kind {
                TokenKind::BracketClose => {
                    return if closing == Some(token.value.as_str()) {
                        Ok(children)
                    } else {
                        Err(ParseError::UnexpectedClose {
                            bracket: token.value,
                        })
                    };
                }
                TokenKind::BracketOpen => {
                    let pair = self
                        .grammar
                        .pair_of_open(&token.value)
                        .expect("lexer only emits configured brackets");
                    let close = pair.ends_with.clone();
                    let inner = self.build_level(iter, source, Some(&close))?;
                    children.push(self.push(Node {
                        token,
                        children: inner,
                    }));
                }
                TokenKind::Str if !token.embedded.is_empty() => {
                    let inner = self.build_template_children(&token, source)?;
                    children.push(self.push(Node {
                        token,
                        children: inner,
                    }));
                }
                _ => {
                    children.push(self.push(Node {
                        token,
                        children: Vec::new(),
                    }));
                }
            }
        }
        match closing {
            // The lexer pairs brackets per level, so running out of tokens
            // inside a group means the close marker never appeared.
            Some(close) => Err(ParseError::UnbalancedBracket {
                bracket: close.to_string(),
            }),
            None => Ok(children),
        }
    }

    /// Re-enter an interpolating string: each embedded region is lexed and
    /// built like any other source, and its nodes become children of the
    /// string node in region order.
    fn build_template_children(
        &mut self,
        token: &Token,
        source: &str,
    ) -> Result<Vec<NodeId>, ParseError> {
        let mut children = Vec::new();
        for region in &token.embedded {
            // Ranges inside the region's own tokens are relative to the
            // region slice, so it becomes the source for the recursion.
            let region_source = &source[region.clone()];
            let tokens = Lexer::new(self.grammar).tokenize(region_source)?;
            let mut iter = tokens.into_iter();
            let mut nodes = self.build_level(&mut iter, region_source, None)?;
            children.append(&mut nodes);
        }
        Ok(children)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }
}
