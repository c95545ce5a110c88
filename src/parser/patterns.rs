//! Pattern parsing for `match` statements.
//!
//! Patterns form their own little grammar beside ordinary expressions:
//!
//! ```text
//! patterns        ::= open_sequence_pattern | pattern
//! pattern         ::= or_pattern ['as' NAME]
//! or_pattern      ::= closed_pattern ('|' closed_pattern)*
//! closed_pattern  ::= wildcard | capture | literal | value | group
//!                   | sequence | mapping | class
//! ```
//!
//! The dispatch inside `closed_pattern` is driven by one token of
//! lookahead: a bare name is a capture unless a `.`, `(` or `=` follows,
//! in which case it opens a value, class, or keyword sub-pattern.
//! Number literals may carry a sign and a complex tail (`-1`, `3+4j`);
//! the raw lexemes are kept unparsed, sign included.

use crate::parser::ast::{CollectionKind, ConstantKind, Pattern};
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::tokens::{Keyword, Operator};

fn is_imaginary(lexeme: &str) -> bool {
    lexeme.ends_with('j') || lexeme.ends_with('J')
}

impl Parser {
    /// The full pattern position of a `case` arm: a bare comma-separated
    /// sequence, or a single pattern.
    pub(crate) fn parse_patterns(&mut self) -> Result<Pattern, ParseError> {
        if let Some(sequence) = self.attempt(|p| p.parse_open_sequence_pattern())? {
            return Ok(sequence);
        }
        self.parse_pattern()
    }

    /// pattern ',' [pattern (',' pattern)*] — at least one comma. A single
    /// element with a trailing comma marks the sequence as open.
    fn parse_open_sequence_pattern(&mut self) -> Result<Pattern, ParseError> {
        let mut elements = vec![self.parse_maybe_star_pattern()?];
        if !self.match_comma() {
            return Err(self.expected("','", "in sequence pattern"));
        }
        while self.starts_pattern() {
            elements.push(self.parse_maybe_star_pattern()?);
            if !self.match_comma() {
                break;
            }
        }
        let open = elements.len() == 1;
        Ok(Pattern::Sequence {
            kind: CollectionKind::Tuple,
            open,
            elements,
        })
    }

    fn starts_pattern(&self) -> bool {
        matches!(
            self.tokens.get(self.position),
            Some(
                Token::Identifier(_, _)
                    | Token::Number(_, _)
                    | Token::Str(_, _)
                    | Token::Keyword(Keyword::True | Keyword::False | Keyword::None, _)
                    | Token::Operator(Operator::Minus | Operator::Star, _)
                    | Token::LParen(_)
                    | Token::LBracket(_)
                    | Token::LBrace(_)
            )
        )
    }

    /// or_pattern ['as' NAME]. A single alternative without a capture
    /// collapses to the inner pattern.
    pub(crate) fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        let mut alternatives = vec![self.parse_closed_pattern()?];
        while self.match_op(Operator::Pipe) {
            alternatives.push(self.parse_closed_pattern()?);
        }
        let capture = if self.match_keyword(Keyword::As) {
            Some(self.expect_identifier("after 'as'")?)
        } else {
            None
        };
        if alternatives.len() == 1 && capture.is_none() {
            if let Some(single) = alternatives.pop() {
                return Ok(single);
            }
        }
        Ok(Pattern::Or {
            alternatives,
            capture,
        })
    }

    fn parse_closed_pattern(&mut self) -> Result<Pattern, ParseError> {
        if self.peek_identifier() == Some("_") {
            self.advance();
            return Ok(Pattern::Wildcard);
        }
        if self.check_identifier() && !self.name_opens_value_or_class() {
            let name = self.expect_identifier("as capture pattern")?;
            return Ok(Pattern::Capture { name });
        }
        if self.at_literal_pattern() {
            return self.parse_literal_pattern();
        }
        if self.check_identifier() {
            if let Some(value) = self.attempt(|p| p.parse_value_pattern())? {
                return Ok(value);
            }
            return self.parse_class_pattern();
        }
        if self.check_lparen() {
            return self.parse_paren_pattern();
        }
        if self.check_lbracket() {
            return self.parse_list_pattern();
        }
        if self.check_lbrace() {
            return self.parse_mapping_pattern();
        }
        Err(self.expected("a pattern", "here"))
    }

    /// A name stops being a plain capture when `.`, `(` or `=` follows.
    fn name_opens_value_or_class(&self) -> bool {
        matches!(
            self.peek_ahead(1),
            Some(Token::Dot(_) | Token::LParen(_) | Token::Operator(Operator::Eq, _))
        )
    }

    fn at_literal_pattern(&self) -> bool {
        matches!(
            self.tokens.get(self.position),
            Some(
                Token::Keyword(Keyword::True | Keyword::False | Keyword::None, _)
                    | Token::Str(_, _)
                    | Token::Number(_, _)
                    | Token::Operator(Operator::Minus, _)
            )
        )
    }

    fn parse_literal_pattern(&mut self) -> Result<Pattern, ParseError> {
        match self.peek_token()? {
            Token::Keyword(Keyword::True, _) => {
                self.advance();
                Ok(Pattern::Literal {
                    kind: ConstantKind::Bool,
                    value: "True".to_string(),
                })
            }
            Token::Keyword(Keyword::False, _) => {
                self.advance();
                Ok(Pattern::Literal {
                    kind: ConstantKind::Bool,
                    value: "False".to_string(),
                })
            }
            Token::Keyword(Keyword::None, _) => {
                self.advance();
                Ok(Pattern::Literal {
                    kind: ConstantKind::None,
                    value: "None".to_string(),
                })
            }
            Token::Str(value, _) => {
                self.advance();
                Ok(Pattern::Literal {
                    kind: ConstantKind::Str,
                    value,
                })
            }
            _ => self.parse_number_pattern(),
        }
    }

    /// signed_number, imaginary_number, or the complex form
    /// `signed_real ('+'|'-') imaginary`. Lexemes stay raw, sign included.
    fn parse_number_pattern(&mut self) -> Result<Pattern, ParseError> {
        let first = self.signed_number_lexeme()?;
        if is_imaginary(&first) {
            return Ok(Pattern::Number {
                real: None,
                imaginary: Some(first),
            });
        }
        let negative = if self.check_op(Operator::Plus) {
            false
        } else if self.check_op(Operator::Minus) {
            true
        } else {
            return Ok(Pattern::Number {
                real: Some(first),
                imaginary: None,
            });
        };
        self.advance();
        let second = self.number_lexeme("after complex-number sign")?;
        if !is_imaginary(&second) {
            return Err(self.expected("an imaginary literal", "in complex pattern"));
        }
        let imaginary = if negative {
            format!("-{}", second)
        } else {
            second
        };
        Ok(Pattern::Number {
            real: Some(first),
            imaginary: Some(imaginary),
        })
    }

    fn signed_number_lexeme(&mut self) -> Result<String, ParseError> {
        let negative = self.match_op(Operator::Minus);
        let value = self.number_lexeme("in literal pattern")?;
        if negative {
            Ok(format!("-{}", value))
        } else {
            Ok(value)
        }
    }

    fn number_lexeme(&mut self, ctx: &str) -> Result<String, ParseError> {
        match self.peek_token()? {
            Token::Number(value, _) => {
                self.advance();
                Ok(value)
            }
            _ => Err(self.expected("a number", ctx)),
        }
    }

    /// attr !('(' | '=') — a dotted constant reference such as `Color.RED`.
    fn parse_value_pattern(&mut self) -> Result<Pattern, ParseError> {
        let path = self.parse_dotted_path()?;
        if path.len() < 2 {
            return Err(self.expected("a dotted name", "in value pattern"));
        }
        if self.check_lparen() || self.check_op(Operator::Eq) {
            return Err(self.expected("a value pattern", "here"));
        }
        Ok(Pattern::Value { path })
    }

    fn parse_dotted_path(&mut self) -> Result<Vec<String>, ParseError> {
        let mut path = vec![self.expect_identifier("in pattern")?];
        while self.match_dot() {
            path.push(self.expect_identifier("after '.'")?);
        }
        Ok(path)
    }

    /// name_or_attr '(' [patterns] ')' with positional and `NAME=pattern`
    /// keyword sub-patterns; a trailing comma leaves the pattern open.
    fn parse_class_pattern(&mut self) -> Result<Pattern, ParseError> {
        let path = self.parse_dotted_path()?;
        if !self.match_lparen() {
            return Err(self.expected("'('", "in class pattern"));
        }
        let mut positional = Vec::new();
        let mut keyword = Vec::new();
        let mut open = false;
        if self.check_rparen() {
            self.advance();
            return Ok(Pattern::Class {
                path,
                positional,
                keyword,
                open,
            });
        }
        loop {
            if self.check_identifier()
                && matches!(self.peek_ahead(1), Some(Token::Operator(Operator::Eq, _)))
            {
                let name = self.expect_identifier("for keyword pattern")?;
                self.advance(); // =
                keyword.push((name, self.parse_pattern()?));
            } else {
                positional.push(self.parse_pattern()?);
            }
            if !self.match_comma() {
                break;
            }
            if self.check_rparen() {
                open = true;
                break;
            }
        }
        self.expect_rparen("after class pattern")?;
        Ok(Pattern::Class {
            path,
            positional,
            keyword,
            open,
        })
    }

    /// '(' ')' | '(' open_sequence ')' | '(' pattern ')'. Parenthesized
    /// groups pass the inner pattern through unchanged.
    fn parse_paren_pattern(&mut self) -> Result<Pattern, ParseError> {
        self.advance(); // (
        if self.check_rparen() {
            self.advance();
            return Ok(Pattern::Sequence {
                kind: CollectionKind::Tuple,
                open: false,
                elements: Vec::new(),
            });
        }
        if let Some(sequence) = self.attempt(|p| {
            let sequence = p.parse_open_sequence_pattern()?;
            p.expect_rparen("after sequence pattern")?;
            Ok(sequence)
        })? {
            return Ok(sequence);
        }
        let inner = self.parse_pattern()?;
        self.expect_rparen("after pattern")?;
        Ok(inner)
    }

    /// '[' [pattern (',' pattern)* [',']] ']'
    fn parse_list_pattern(&mut self) -> Result<Pattern, ParseError> {
        self.advance(); // [
        if self.check_rbracket() {
            self.advance();
            return Ok(Pattern::Sequence {
                kind: CollectionKind::List,
                open: false,
                elements: Vec::new(),
            });
        }
        let mut elements = vec![self.parse_maybe_star_pattern()?];
        while self.match_comma() {
            if self.check_rbracket() {
                break;
            }
            elements.push(self.parse_maybe_star_pattern()?);
        }
        self.expect_rbracket("after sequence pattern")?;
        Ok(Pattern::Sequence {
            kind: CollectionKind::List,
            open: false,
            elements,
        })
    }

    /// '{' [key ':' pattern ...] ['**' NAME] '}' — keys are literal or
    /// dotted-value patterns only.
    fn parse_mapping_pattern(&mut self) -> Result<Pattern, ParseError> {
        self.advance(); // {
        let mut entries = Vec::new();
        let mut rest = None;
        let mut open = false;
        if self.check_rbrace() {
            self.advance();
            return Ok(Pattern::Mapping {
                entries,
                rest,
                open,
            });
        }
        loop {
            if self.match_op(Operator::StarStar) {
                rest = Some(self.expect_identifier("after '**'")?);
                if self.match_comma() {
                    open = true;
                }
                break;
            }
            let key = self.parse_key_pattern()?;
            self.expect_colon("between mapping key and pattern")?;
            let value = self.parse_pattern()?;
            entries.push((key, value));
            if !self.match_comma() {
                break;
            }
            if self.check_rbrace() {
                open = true;
                break;
            }
        }
        self.expect_rbrace("after mapping pattern")?;
        Ok(Pattern::Mapping {
            entries,
            rest,
            open,
        })
    }

    fn parse_key_pattern(&mut self) -> Result<Pattern, ParseError> {
        if self.at_literal_pattern() {
            return self.parse_literal_pattern();
        }
        let path = self.parse_dotted_path()?;
        Ok(Pattern::Value { path })
    }

    fn parse_maybe_star_pattern(&mut self) -> Result<Pattern, ParseError> {
        if self.check_op(Operator::Star) {
            return self.parse_star_pattern();
        }
        self.parse_pattern()
    }

    /// '*' NAME | '*' '_'
    fn parse_star_pattern(&mut self) -> Result<Pattern, ParseError> {
        self.advance(); // *
        if self.peek_identifier() == Some("_") {
            self.advance();
            return Ok(Pattern::Star {
                pattern: Box::new(Pattern::Wildcard),
            });
        }
        let name = self.expect_identifier("after '*'")?;
        Ok(Pattern::Star {
            pattern: Box::new(Pattern::Capture { name }),
        })
    }
}
