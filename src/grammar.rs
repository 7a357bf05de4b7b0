//! Grammar configuration: the declarative, per-language description the lexer
//! and parser are driven by.
//!
//! A [`GrammarConfig`] is pure data: comment markers, an identifier pattern,
//! a numeric-literal pattern, a priority-ordered operator list, bracket pairs,
//! and string forms. It can be declared in code (see [`python`]) or loaded
//! from JSON/YAML files using the same camelCase field names either way.
//! Before use it is compiled once into a [`CompiledGrammar`], which anchors
//! the regular expressions and orders lexeme tables longest-first.

pub mod python;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line comment form. The comment runs from its start marker to the end of
/// the line; the terminating newline is not part of the comment token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRule {
    pub starts_with: String,
}

/// A matched pair of bracket delimiters, e.g. `(` / `)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketPair {
    pub starts_with: String,
    pub ends_with: String,
}

/// An embedded expression region inside an interpolating string,
/// e.g. `{` / `}` inside a Python f-string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRule {
    pub starts_with: String,
    pub ends_with: String,
}

/// A string form. `ends_with` defaults to the start marker; `templates`
/// is non-empty for interpolating forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringRule {
    pub starts_with: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<TemplateRule>,
}

impl StringRule {
    /// A string form closed by its own start marker, e.g. `'…'`.
    pub fn quoted(marker: impl Into<String>) -> Self {
        Self {
            starts_with: marker.into(),
            ends_with: None,
            templates: Vec::new(),
        }
    }

    /// A string form with distinct start and end markers, e.g. `r'…'`.
    pub fn delimited(starts_with: impl Into<String>, ends_with: impl Into<String>) -> Self {
        Self {
            starts_with: starts_with.into(),
            ends_with: Some(ends_with.into()),
            templates: Vec::new(),
        }
    }

    pub fn with_template(
        mut self,
        starts_with: impl Into<String>,
        ends_with: impl Into<String>,
    ) -> Self {
        self.templates.push(TemplateRule {
            starts_with: starts_with.into(),
            ends_with: ends_with.into(),
        });
        self
    }

    pub fn end_marker(&self) -> &str {
        self.ends_with.as_deref().unwrap_or(&self.starts_with)
    }
}

/// Declarative lexical description of one source language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<CommentRule>,
    /// Identifier pattern (a regular expression, unanchored).
    pub symbols: String,
    /// Numeric-literal pattern (a regular expression, unanchored).
    pub numbers: String,
    /// Operator and delimiter lexemes. Declaration order only breaks ties
    /// between equal-length lexemes; compilation orders longest-first so
    /// compound operators like `**=` always win over their prefixes.
    pub operators: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub brackets: Vec<BracketPair>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strings: Vec<StringRule>,
}

impl GrammarConfig {
    pub fn from_json_str(input: &str) -> Result<Self, GrammarError> {
        serde_json::from_str(input).map_err(|e| GrammarError::Format(e.to_string()))
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, GrammarError> {
        serde_yaml::from_str(input).map_err(|e| GrammarError::Format(e.to_string()))
    }

    /// Validate the configuration and build the runtime form the lexer uses.
    pub fn compile(&self) -> Result<CompiledGrammar, GrammarError> {
        let symbols = anchored(&self.symbols, "symbols")?;
        let numbers = anchored(&self.numbers, "numbers")?;

        let mut operators = self.operators.clone();
        operators.sort_by_key(|op| std::cmp::Reverse(op.len()));

        let mut strings = self.strings.clone();
        strings.sort_by_key(|rule| std::cmp::Reverse(rule.starts_with.len()));

        Ok(CompiledGrammar {
            comments: self.comments.clone(),
            symbols,
            numbers,
            operators,
            brackets: self.brackets.clone(),
            strings,
        })
    }
}

fn anchored(pattern: &str, field: &'static str) -> Result<Regex, GrammarError> {
    Regex::new(&format!("^(?:{})", pattern)).map_err(|e| GrammarError::Pattern {
        field,
        message: e.to_string(),
    })
}

/// Runtime form of a [`GrammarConfig`]: anchored regexes, longest-first
/// lexeme tables. Construct via [`GrammarConfig::compile`].
#[derive(Debug, Clone)]
pub struct CompiledGrammar {
    pub(crate) comments: Vec<CommentRule>,
    pub(crate) symbols: Regex,
    pub(crate) numbers: Regex,
    pub(crate) operators: Vec<String>,
    pub(crate) brackets: Vec<BracketPair>,
    pub(crate) strings: Vec<StringRule>,
}

impl CompiledGrammar {
    pub(crate) fn bracket_for_open(&self, rest: &str) -> Option<&BracketPair> {
        self.brackets
            .iter()
            .find(|pair| rest.starts_with(&pair.starts_with))
    }

    pub(crate) fn bracket_for_close(&self, rest: &str) -> Option<&BracketPair> {
        self.brackets
            .iter()
            .find(|pair| rest.starts_with(&pair.ends_with))
    }

    /// Look up the bracket pair a previously-lexed open token came from.
    pub(crate) fn pair_of_open(&self, lexeme: &str) -> Option<&BracketPair> {
        self.brackets.iter().find(|pair| pair.starts_with == lexeme)
    }
}

/// Problems detected while reading or compiling a grammar configuration.
#[derive(Debug, Clone)]
pub enum GrammarError {
    /// The JSON/YAML document did not deserialize into a configuration.
    Format(String),
    /// A regular-expression field failed to compile.
    Pattern {
        field: &'static str,
        message: String,
    },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Format(message) => {
                write!(f, "Invalid grammar configuration: {}", message)
            }
            GrammarError::Pattern { field, message } => {
                write!(f, "Invalid {} pattern: {}", field, message)
            }
        }
    }
}

impl std::error::Error for GrammarError {}
