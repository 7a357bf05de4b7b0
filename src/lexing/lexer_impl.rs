//! Implementation of the config-driven lexer.
//!
//! The scanner walks the source byte-by-byte, classifying the lexeme at the
//! current position against the compiled grammar. Recognition order matters:
//! comments and string start markers are tried before symbols (so `f'` is a
//! string prefix, not an identifier), numbers before operators (so `1.5` is
//! one literal, not `1` `.` `5`), and the operator table is longest-first.

use crate::grammar::CompiledGrammar;
use crate::lexing::tokens::{Token, TokenKind};
use std::fmt;
use std::ops::Range;

/// Errors produced while scanning source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// No grammar rule matches the character at `offset`.
    UnexpectedChar { ch: char, offset: usize },
    /// A string opened at `offset` has no closing marker.
    UnterminatedString { offset: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedChar { ch, offset } => {
                write!(f, "Unexpected character {:?} at byte {}", ch, offset)
            }
            LexError::UnterminatedString { offset } => {
                write!(f, "Unterminated string starting at byte {}", offset)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// A scanner over one source string, driven by a compiled grammar.
pub struct Lexer<'g> {
    grammar: &'g CompiledGrammar,
}

impl<'g> Lexer<'g> {
    pub fn new(grammar: &'g CompiledGrammar) -> Self {
        Self { grammar }
    }

    /// Tokenize the whole source, trivia included.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < source.len() {
            let (token, next) = self.next_token(source, pos)?;
            debug_assert!(next > pos, "scanner must make progress");
            tokens.push(token);
            pos = next;
        }
        Ok(tokens)
    }

    fn next_token(&self, source: &str, pos: usize) -> Result<(Token, usize), LexError> {
        let rest = &source[pos..];

        if let Some(len) = scan_newline(rest) {
            return Ok((Token::new(TokenKind::Newline, &rest[..len]), pos + len));
        }
        if let Some(len) = scan_whitespace(rest) {
            return Ok((Token::new(TokenKind::Whitespace, &rest[..len]), pos + len));
        }
        if let Some(len) = self.scan_comment(rest) {
            return Ok((Token::new(TokenKind::Comment, &rest[..len]), pos + len));
        }
        if let Some((len, embedded)) = self.scan_string(source, pos)? {
            let mut token = Token::new(TokenKind::Str, &rest[..len]);
            token.embedded = embedded;
            return Ok((token, pos + len));
        }
        if let Some(m) = self.grammar.numbers.find(rest) {
            return Ok((Token::new(TokenKind::Number, m.as_str()), pos + m.end()));
        }
        if let Some(op) = self
            .grammar
            .operators
            .iter()
            .find(|op| rest.starts_with(op.as_str()))
        {
            return Ok((Token::new(TokenKind::Operator, op.as_str()), pos + op.len()));
        }
        if let Some(pair) = self.grammar.bracket_for_open(rest) {
            let lexeme = pair.starts_with.as_str();
            return Ok((Token::new(TokenKind::BracketOpen, lexeme), pos + lexeme.len()));
        }
        if let Some(pair) = self.grammar.bracket_for_close(rest) {
            let lexeme = pair.ends_with.as_str();
            return Ok((
                Token::new(TokenKind::BracketClose, lexeme),
                pos + lexeme.len(),
            ));
        }
        if let Some(m) = self.grammar.symbols.find(rest) {
            return Ok((Token::new(TokenKind::Symbol, m.as_str()), pos + m.end()));
        }

        let ch = rest.chars().next().expect("pos < source.len()");
        Err(LexError::UnexpectedChar { ch, offset: pos })
    }

    fn scan_comment(&self, rest: &str) -> Option<usize> {
        self.grammar
            .comments
            .iter()
            .find(|rule| rest.starts_with(&rule.starts_with))
            .map(|_| rest.find('\n').unwrap_or(rest.len()))
    }

    /// Scan a string literal starting at `pos`, if any rule matches there.
    /// Returns the lexeme length and the absolute byte ranges of embedded
    /// template expression regions.
    fn scan_string(
        &self,
        source: &str,
        pos: usize,
    ) -> Result<Option<(usize, Vec<Range<usize>>)>, LexError> {
        let rest = &source[pos..];
        // Rules are ordered longest start marker first, so `'''` wins over `'`.
        let rule = match self
            .grammar
            .strings
            .iter()
            .find(|rule| rest.starts_with(&rule.starts_with))
        {
            Some(rule) => rule,
            None => return Ok(None),
        };

        let end_marker = rule.end_marker();
        let mut embedded = Vec::new();
        let mut i = pos + rule.starts_with.len();

        while i < source.len() {
            let body = &source[i..];
            if body.starts_with('\\') {
                let escaped = body[1..].chars().next();
                i += 1 + escaped.map_or(0, char::len_utf8);
                continue;
            }
            if body.starts_with(end_marker) {
                return Ok(Some((i + end_marker.len() - pos, embedded)));
            }
            if let Some(template) = rule
                .templates
                .iter()
                .find(|t| body.starts_with(&t.starts_with))
            {
                // A doubled start marker is a literal, not a region.
                let doubled = format!("{0}{0}", template.starts_with);
                if body.starts_with(&doubled) {
                    i += doubled.len();
                    continue;
                }
                let region_start = i + template.starts_with.len();
                let region_end = scan_template_region(source, region_start, template)
                    .ok_or(LexError::UnterminatedString { offset: pos })?;
                embedded.push(region_start..region_end);
                i = region_end + template.ends_with.len();
                continue;
            }
            i += body.chars().next().expect("i < source.len()").len_utf8();
        }

        Err(LexError::UnterminatedString { offset: pos })
    }
}

/// Find the end of a template expression region, honoring nested
/// start/end marker pairs (`f'{ {1: 2} }'`). Returns the byte offset of the
/// region's closing marker.
fn scan_template_region(
    source: &str,
    start: usize,
    template: &crate::grammar::TemplateRule,
) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = start;
    while i < source.len() {
        let body = &source[i..];
        if body.starts_with(&template.starts_with) {
            depth += 1;
            i += template.starts_with.len();
        } else if body.starts_with(&template.ends_with) {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
            i += template.ends_with.len();
        } else {
            i += body.chars().next()?.len_utf8();
        }
    }
    None
}

fn scan_newline(rest: &str) -> Option<usize> {
    if rest.starts_with("\r\n") {
        Some(2)
    } else if rest.starts_with('\n') {
        Some(1)
    } else {
        None
    }
}

fn scan_whitespace(rest: &str) -> Option<usize> {
    let len = rest
        .find(|ch| ch != ' ' && ch != '\t')
        .unwrap_or(rest.len());
    (len > 0).then_some(len)
}
