//! Keyword and operator tables for Python 3.10
//!
//! Both tables are immutable, process-wide state built once on first use.
//! Operator matching is longest-prefix-first against the full set, so a
//! compound operator like `<<=` is never read as `<` followed by `<=`.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// The 37 keywords of Python 3.10.
///
/// `match` and `case` are treated as hard keywords here; CPython parses them
/// as soft keywords, so identifiers named `match`/`case` are rejected by this
/// front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    And,
    As,
    Assert,
    Async,
    Await,
    Break,
    Case,
    Class,
    Continue,
    Def,
    Del,
    Elif,
    Else,
    Except,
    False,
    Finally,
    For,
    From,
    Global,
    If,
    Import,
    In,
    Is,
    Lambda,
    Match,
    None,
    Nonlocal,
    Not,
    Or,
    Pass,
    Raise,
    Return,
    True,
    Try,
    While,
    With,
    Yield,
}

impl Keyword {
    /// Canonical source text of the keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::And => "and",
            Keyword::As => "as",
            Keyword::Assert => "assert",
            Keyword::Async => "async",
            Keyword::Await => "await",
            Keyword::Break => "break",
            Keyword::Case => "case",
            Keyword::Class => "class",
            Keyword::Continue => "continue",
            Keyword::Def => "def",
            Keyword::Del => "del",
            Keyword::Elif => "elif",
            Keyword::Else => "else",
            Keyword::Except => "except",
            Keyword::False => "False",
            Keyword::Finally => "finally",
            Keyword::For => "for",
            Keyword::From => "from",
            Keyword::Global => "global",
            Keyword::If => "if",
            Keyword::Import => "import",
            Keyword::In => "in",
            Keyword::Is => "is",
            Keyword::Lambda => "lambda",
            Keyword::Match => "match",
            Keyword::None => "None",
            Keyword::Nonlocal => "nonlocal",
            Keyword::Not => "not",
            Keyword::Or => "or",
            Keyword::Pass => "pass",
            Keyword::Raise => "raise",
            Keyword::Return => "return",
            Keyword::True => "True",
            Keyword::Try => "try",
            Keyword::While => "while",
            Keyword::With => "with",
            Keyword::Yield => "yield",
        }
    }

    /// Whether this keyword opens an indented block (`def`, `if`, `try`, ...).
    pub fn is_block_definition(&self) -> bool {
        matches!(
            self,
            Keyword::Case
                | Keyword::Class
                | Keyword::Def
                | Keyword::Elif
                | Keyword::Else
                | Keyword::Except
                | Keyword::Finally
                | Keyword::For
                | Keyword::If
                | Keyword::Lambda
                | Keyword::Match
                | Keyword::Try
                | Keyword::While
        )
    }

    /// Whether this keyword opens a block guarded by a condition.
    pub fn is_conditional_block(&self) -> bool {
        matches!(
            self,
            Keyword::Case
                | Keyword::Elif
                | Keyword::Else
                | Keyword::If
                | Keyword::Match
                | Keyword::While
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every multi-purpose operator the lexer can produce.
///
/// The arrow `->` and the decorator `@` are separate token kinds, not
/// operators; `@=` is an operator because augmented assignment needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    // Arithmetic
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    SlashSlash, // //
    Percent,    // %
    StarStar,   // **

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Gt,    // >
    Le,    // <=
    Ge,    // >=

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
    LtLt,  // <<
    GtGt,  // >>

    // Assignment
    Eq,     // =
    Walrus, // :=

    // Augmented assignment
    PlusEq,       // +=
    MinusEq,      // -=
    StarEq,       // *=
    SlashEq,      // /=
    SlashSlashEq, // //=
    PercentEq,    // %=
    StarStarEq,   // **=
    AtEq,         // @=
    AmpEq,        // &=
    PipeEq,       // |=
    CaretEq,      // ^=
    LtLtEq,       // <<=
    GtGtEq,       // >>=
}

impl Operator {
    /// Canonical source text of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::SlashSlash => "//",
            Operator::Percent => "%",
            Operator::StarStar => "**",
            Operator::EqEq => "==",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Amp => "&",
            Operator::Pipe => "|",
            Operator::Caret => "^",
            Operator::Tilde => "~",
            Operator::LtLt => "<<",
            Operator::GtGt => ">>",
            Operator::Eq => "=",
            Operator::Walrus => ":=",
            Operator::PlusEq => "+=",
            Operator::MinusEq => "-=",
            Operator::StarEq => "*=",
            Operator::SlashEq => "/=",
            Operator::SlashSlashEq => "//=",
            Operator::PercentEq => "%=",
            Operator::StarStarEq => "**=",
            Operator::AtEq => "@=",
            Operator::AmpEq => "&=",
            Operator::PipeEq => "|=",
            Operator::CaretEq => "^=",
            Operator::LtLtEq => "<<=",
            Operator::GtGtEq => ">>=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operator spellings ordered longest first, so a prefix scan can take the
/// first hit as the longest match.
const OPERATORS: &[(&str, Operator)] = &[
    ("<<=", Operator::LtLtEq),
    (">>=", Operator::GtGtEq),
    ("**=", Operator::StarStarEq),
    ("//=", Operator::SlashSlashEq),
    ("==", Operator::EqEq),
    ("!=", Operator::NotEq),
    ("<=", Operator::Le),
    (">=", Operator::Ge),
    ("+=", Operator::PlusEq),
    ("-=", Operator::MinusEq),
    ("*=", Operator::StarEq),
    ("/=", Operator::SlashEq),
    ("%=", Operator::PercentEq),
    ("@=", Operator::AtEq),
    ("&=", Operator::AmpEq),
    ("|=", Operator::PipeEq),
    ("^=", Operator::CaretEq),
    ("<<", Operator::LtLt),
    (">>", Operator::GtGt),
    ("**", Operator::StarStar),
    ("//", Operator::SlashSlash),
    (":=", Operator::Walrus),
    ("+", Operator::Plus),
    ("-", Operator::Minus),
    ("*", Operator::Star),
    ("/", Operator::Slash),
    ("%", Operator::Percent),
    ("=", Operator::Eq),
    ("<", Operator::Lt),
    (">", Operator::Gt),
    ("&", Operator::Amp),
    ("|", Operator::Pipe),
    ("^", Operator::Caret),
    ("~", Operator::Tilde),
];

static KEYWORDS: OnceLock<FxHashMap<&'static str, Keyword>> = OnceLock::new();

fn keyword_table() -> &'static FxHashMap<&'static str, Keyword> {
    KEYWORDS.get_or_init(|| {
        let all = [
            Keyword::And,
            Keyword::As,
            Keyword::Assert,
            Keyword::Async,
            Keyword::Await,
            Keyword::Break,
            Keyword::Case,
            Keyword::Class,
            Keyword::Continue,
            Keyword::Def,
            Keyword::Del,
            Keyword::Elif,
            Keyword::Else,
            Keyword::Except,
            Keyword::False,
            Keyword::Finally,
            Keyword::For,
            Keyword::From,
            Keyword::Global,
            Keyword::If,
            Keyword::Import,
            Keyword::In,
            Keyword::Is,
            Keyword::Lambda,
            Keyword::Match,
            Keyword::None,
            Keyword::Nonlocal,
            Keyword::Not,
            Keyword::Or,
            Keyword::Pass,
            Keyword::Raise,
            Keyword::Return,
            Keyword::True,
            Keyword::Try,
            Keyword::While,
            Keyword::With,
            Keyword::Yield,
        ];
        all.iter().map(|kw| (kw.as_str(), *kw)).collect()
    })
}

/// Look up a complete identifier in the keyword table.
pub fn keyword_lookup(ident: &str) -> Option<Keyword> {
    keyword_table().get(ident).copied()
}

/// Longest operator match starting at `start`, with its length in characters.
pub fn match_operator(input: &[char], start: usize) -> Option<(Operator, usize)> {
    for (text, op) in OPERATORS {
        let len = text.len();
        if start + len > input.len() {
            continue;
        }
        if text.chars().zip(&input[start..start + len]).all(|(a, b)| a == *b) {
            return Some((*op, len));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(match_operator(&chars("<<= x"), 0), Some((Operator::LtLtEq, 3)));
        assert_eq!(match_operator(&chars("<< x"), 0), Some((Operator::LtLt, 2)));
        assert_eq!(match_operator(&chars("< x"), 0), Some((Operator::Lt, 1)));
        assert_eq!(match_operator(&chars("==-1"), 0), Some((Operator::EqEq, 2)));
        assert_eq!(match_operator(&chars("//=2"), 0), Some((Operator::SlashSlashEq, 3)));
    }

    #[test]
    fn test_walrus_but_not_bare_colon() {
        assert_eq!(match_operator(&chars(":= y"), 0), Some((Operator::Walrus, 2)));
        assert_eq!(match_operator(&chars(": y"), 0), None);
    }

    #[test]
    fn test_match_at_offset() {
        let input = chars("a **= b");
        assert_eq!(match_operator(&input, 2), Some((Operator::StarStarEq, 3)));
    }

    #[test]
    fn test_keyword_lookup_is_exact() {
        assert_eq!(keyword_lookup("if"), Some(Keyword::If));
        assert_eq!(keyword_lookup("ifx"), None);
        assert_eq!(keyword_lookup("None"), Some(Keyword::None));
        assert_eq!(keyword_lookup("none"), None);
    }

    #[test]
    fn test_keyword_roles() {
        assert!(Keyword::Def.is_block_definition());
        assert!(!Keyword::Def.is_conditional_block());
        assert!(Keyword::While.is_block_definition());
        assert!(Keyword::While.is_conditional_block());
        assert!(!Keyword::Await.is_block_definition());
        assert!(Keyword::Lambda.is_block_definition());
        assert!(!Keyword::Lambda.is_conditional_block());
    }
}
