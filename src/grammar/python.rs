//! The Python reference grammar.
//!
//! See https://docs.python.org/3/reference/lexical_analysis.html for the
//! operator table and numeric-literal forms this mirrors.

use super::{BracketPair, CommentRule, GrammarConfig, StringRule};

const SYMBOLS: &str = "[_a-zA-Z][_a-zA-Z0-9]*";

/// Numeric-literal pattern, assembled from the grammar fragments in the
/// Python lexical reference. Floats come before integers in the alternation:
/// the regex engine picks the leftmost alternative that matches, and an
/// integer-first ordering would truncate `1.5` to `1`.
fn number_pattern() -> String {
    let bindigit = "[01]";
    let octdigit = "[0-7]";
    let digit = "[0-9]";
    let nonzerodigit = "[1-9]";
    let hexdigit = format!("(?:{}|[a-fA-F])", digit);

    let bininteger = format!("(?:0[bB](?:_?{})+)", bindigit);
    let octinteger = format!("(?:0[oO](?:_?{})+)", octdigit);
    let hexinteger = format!("(?:0[xX](?:_?{})+)", hexdigit);
    let decinteger = format!("(?:{}(?:_?{})*|0+(?:_?0)*)", nonzerodigit, digit);
    let integer = format!(
        "(?:{}|{}|{}|{})",
        decinteger, bininteger, octinteger, hexinteger
    );

    let digitpart = format!("(?:{}(?:_?{})*)", digit, digit);
    let fraction = format!("(?:\\.{})", digitpart);
    let exponent = format!("(?:[eE][-+]?{})", digitpart);
    let pointfloat = format!("(?:{}?{}|{}\\.)", digitpart, fraction, digitpart);
    let exponentfloat = format!("(?:(?:{}|{}){})", digitpart, pointfloat, exponent);
    // Exponent floats before point floats for the same reason: `6.02e+23`
    // must not stop at `6.02`.
    let floatnumber = format!("(?:{}|{})", exponentfloat, pointfloat);

    format!("(?:{}|{})", floatnumber, integer)
}

/// The declarative grammar for Python source.
pub fn grammar() -> GrammarConfig {
    let operators = [
        // Operators
        "+", "-", "*", "**", "/", "//", "%", "@",
        "<<", ">>", "&", "|", "^", "~", ":=",
        "<", ">", "<=", ">=", "==", "!=",
        // Delimiters
        ",", ":", ".", ";", "=", "->",
        "+=", "-=", "*=", "/=", "//=", "%=", "@=",
        "&=", "|=", "^=", ">>=", "<<=", "**=",
    ];

    GrammarConfig {
        comments: vec![CommentRule {
            starts_with: "#".to_string(),
        }],
        symbols: SYMBOLS.to_string(),
        numbers: number_pattern(),
        operators: operators.iter().map(|op| op.to_string()).collect(),
        brackets: vec![
            BracketPair {
                starts_with: "{".to_string(),
                ends_with: "}".to_string(),
            },
            BracketPair {
                starts_with: "[".to_string(),
                ends_with: "]".to_string(),
            },
            BracketPair {
                starts_with: "(".to_string(),
                ends_with: ")".to_string(),
            },
        ],
        strings: vec![
            StringRule::quoted("'"),
            StringRule::quoted("\""),
            StringRule::quoted("'''"),
            StringRule::quoted("\"\"\""),
            StringRule::delimited("f'", "'").with_template("{", "}"),
            StringRule::delimited("f\"", "\"").with_template("{", "}"),
            StringRule::delimited("r'", "'"),
            StringRule::delimited("r\"", "\""),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn number_regex() -> Regex {
        Regex::new(&format!("^(?:{})$", number_pattern())).unwrap()
    }

    #[test]
    fn test_grammar_compiles() {
        grammar().compile().unwrap();
    }

    #[test]
    fn test_integer_forms() {
        let re = number_regex();
        for literal in ["0", "7", "1_000", "0b10_10", "0o17", "0xFF", "0x_de_ad"] {
            assert!(re.is_match(literal), "{} should be a number", literal);
        }
    }

    #[test]
    fn test_float_forms() {
        let re = number_regex();
        for literal in ["3.14", ".5", "10.", "1e10", "1_0.5e-3", "1E+4"] {
            assert!(re.is_match(literal), "{} should be a number", literal);
        }
    }

    #[test]
    fn test_non_numbers_rejected() {
        let re = number_regex();
        for literal in ["abc", "_1", "0b2", "0o8", "e10", "."] {
            assert!(!re.is_match(literal), "{} should not be a number", literal);
        }
    }

    #[test]
    fn test_float_wins_over_integer_prefix() {
        // Leftmost-first alternation: the float alternatives must match the
        // whole literal rather than a shorter prefix.
        let re = Regex::new(&format!("^(?:{})", number_pattern())).unwrap();
        for (input, expected) in [("1.5", "1.5"), ("6.02e+23", "6.02e+23"), ("1e10", "1e10")] {
            let m = re.find(input).unwrap();
            assert_eq!(m.as_str(), expected);
        }
    }
}
