//! A language ties a compiled grammar to the lexer and parser.

use crate::grammar::{python, CompiledGrammar, GrammarConfig, GrammarError};
use crate::lexing::{LexError, Lexer, Token};
use crate::parsing::tree::TreeBuilder;
use crate::parsing::{ParseError, Tree};
use once_cell::sync::Lazy;

/// A ready-to-use source language: grammar configuration, compiled once.
pub struct Language {
    grammar: CompiledGrammar,
}

impl Language {
    pub fn new(config: &GrammarConfig) -> Result<Self, GrammarError> {
        Ok(Self {
            grammar: config.compile()?,
        })
    }

    /// Tokenize without building a tree. Trivia included.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        Lexer::new(&self.grammar).tokenize(source)
    }

    /// Lex and structure the source into a navigable tree.
    pub fn parse(&self, source: &str) -> Result<Tree, ParseError> {
        TreeBuilder::new(&self.grammar).build(source)
    }
}

/// The shipped Python language, compiled once per process.
pub fn python() -> &'static Language {
    static PYTHON: Lazy<Language> =
        Lazy::new(|| Language::new(&python::grammar()).expect("the builtin Python grammar is valid"));
    &PYTHON
}
