//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the public parse entry points.
//!
//! # Parser Architecture
//!
//! The Parser uses backtracking recursive descent with the following
//! organization:
//! - This module: Parser struct, cursor and expectation helpers, entry points
//! - `statements`: simple statements and the statement dispatch ladder
//! - `declarations`: compound statements (def, class, if, try, match, ...)
//! - `expressions`: the operator precedence ladder
//! - `atoms`: atoms, trailers, displays, comprehensions and call arguments
//! - `patterns`: the `case` pattern grammar
//!
//! # Backtracking
//!
//! Grammar alternatives are ordered. Each alternative is tried through
//! [`Parser::attempt`], which saves the cursor, runs the sub-parse, and on a
//! recoverable error restores the cursor and reports "no match" so the next
//! alternative can run. Errors flagged fatal (lexical errors, cursor overrun)
//! abort the whole parse instead of being absorbed by backtracking.
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use crate::parser::tokens::{Keyword, Operator};
use std::fmt;

/// Parser error type.
///
/// `fatal` distinguishes errors that abort the whole parse from ordinary
/// expectation failures that ordered choice is allowed to back out of.
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
    pub fatal: bool,
}

impl ParseError {
    pub(crate) fn new(message: String, location: SourceLocation) -> Self {
        ParseError {
            message,
            location,
            fatal: false,
        }
    }

    pub(crate) fn fatal(message: String, location: SourceLocation) -> Self {
        ParseError {
            message,
            location,
            fatal: true,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::fatal(err.message, err.location)
    }
}

/// Backtracking recursive descent parser for Python 3.10.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    /// Lex `source` and set up the cursor. Comment and same-indent tokens
    /// are dropped here; they exist for token-stream consumers only.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer
            .tokenize()?
            .into_iter()
            .filter(|t| !matches!(t, Token::Comment(_, _) | Token::SameIndent(_, _)))
            .collect();
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    // ===== Entry points =====

    /// Parse a whole module: a sequence of statements up to end of input.
    pub fn parse_module(&mut self) -> Result<Module, ParseError> {
        let mut module = Module::new();
        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }
            module.body.extend(self.parse_statement_line()?);
        }
        Ok(module)
    }

    /// Parse exactly one interactive line, which may hold several
    /// semicolon-separated statements. Anything left over besides blank
    /// lines is an error.
    pub fn parse_interactive(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.skip_newlines();
        if self.is_at_end() {
            return Err(ParseError::new(
                "Expected a statement, found end of input".to_string(),
                self.current_location(),
            ));
        }
        let statements = self.parse_statement_line()?;
        self.skip_newlines();
        if !self.is_at_end() {
            return Err(ParseError::new(
                format!("Unexpected input after statement: {}", self.tokens[self.position]),
                self.current_location(),
            ));
        }
        Ok(statements)
    }

    /// Parse an evaluable expression sequence: one or more comma-separated
    /// expressions forming a tuple when there is more than one.
    pub fn parse_eval(&mut self) -> Result<Expr, ParseError> {
        self.skip_newlines();
        let expr = self.parse_star_expressions()?;
        self.skip_newlines();
        if !self.is_at_end() {
            return Err(ParseError::new(
                format!("Unexpected input after expression: {}", self.tokens[self.position]),
                self.current_location(),
            ));
        }
        Ok(expr)
    }

    /// Parse a single (possibly decorated, possibly async) function definition.
    pub fn parse_function_def(&mut self) -> Result<Stmt, ParseError> {
        self.skip_newlines();
        let location = self.current_location();
        let mut statements = self.parse_statement_line()?;
        match statements.pop() {
            Some(stmt @ Stmt::FunctionDef { .. }) if statements.is_empty() => Ok(stmt),
            _ => Err(ParseError::new(
                "Expected a function definition".to_string(),
                location,
            )),
        }
    }

    // ===== Backtracking =====

    /// Run `parse` as one alternative of an ordered choice. On success the
    /// consumed input stays consumed; on a recoverable error the cursor is
    /// restored and `None` is returned. Fatal errors propagate.
    pub(crate) fn attempt<T, F>(&mut self, parse: F) -> Result<Option<T>, ParseError>
    where
        F: FnOnce(&mut Self) -> Result<T, ParseError>,
    {
        let checkpoint = self.position;
        match parse(self) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.fatal => Err(err),
            Err(_) => {
                self.position = checkpoint;
                Ok(None)
            }
        }
    }

    // ===== Cursor =====

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Current token, or a fatal error when the cursor has run off the end.
    pub(crate) fn peek(&self) -> Result<&Token, ParseError> {
        self.tokens.get(self.position).ok_or_else(|| {
            ParseError::fatal(
                "Unexpected end of input".to_string(),
                self.previous_location(),
            )
        })
    }

    /// Clone of the current token, for match-and-advance call sites.
    pub(crate) fn peek_token(&self) -> Result<Token, ParseError> {
        self.peek().cloned()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn advance(&mut self) -> Option<&Token> {
        if self.is_at_end() {
            None
        } else {
            self.position += 1;
            Some(self.previous())
        }
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position - 1]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        if self.position == 0 {
            SourceLocation::new(1, 1)
        } else {
            self.tokens[self.position - 1].location()
        }
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        match self.tokens.get(self.position) {
            Some(token) => token.location(),
            None => self.previous_location(),
        }
    }

    // ===== Token class checks =====

    pub(crate) fn check_keyword(&self, kw: Keyword) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::Keyword(k, _)) if *k == kw)
    }

    pub(crate) fn match_keyword(&mut self, kw: Keyword) -> bool {
        if self.check_keyword(kw) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_keyword(&mut self, kw: Keyword, ctx: &str) -> Result<(), ParseError> {
        if self.match_keyword(kw) {
            Ok(())
        } else {
            Err(self.expected(&format!("'{}'", kw.as_str()), ctx))
        }
    }

    pub(crate) fn check_op(&self, op: Operator) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::Operator(o, _)) if *o == op)
    }

    pub(crate) fn match_op(&mut self, op: Operator) -> bool {
        if self.check_op(op) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_op(&mut self, op: Operator, ctx: &str) -> Result<(), ParseError> {
        if self.match_op(op) {
            Ok(())
        } else {
            Err(self.expected(&format!("'{}'", op.as_str()), ctx))
        }
    }

    pub(crate) fn check_identifier(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::Identifier(_, _)))
    }

    /// Current token's name when it is an identifier; does not advance.
    pub(crate) fn peek_identifier(&self) -> Option<&str> {
        match self.tokens.get(self.position) {
            Some(Token::Identifier(name, _)) => Some(name),
            _ => None,
        }
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<String, ParseError> {
        if let Some(Token::Identifier(name, _)) = self.tokens.get(self.position) {
            let name = name.clone();
            self.position += 1;
            Ok(name)
        } else {
            Err(self.expected("an identifier", ctx))
        }
    }

    // ===== Structural token checks =====

    pub(crate) fn check_colon(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::Colon(_)))
    }

    pub(crate) fn match_colon(&mut self) -> bool {
        if self.check_colon() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_colon(&mut self, ctx: &str) -> Result<(), ParseError> {
        if self.match_colon() {
            Ok(())
        } else {
            Err(self.expected("':'", ctx))
        }
    }

    pub(crate) fn check_comma(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::Comma(_)))
    }

    pub(crate) fn match_comma(&mut self) -> bool {
        if self.check_comma() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn check_lparen(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::LParen(_)))
    }

    pub(crate) fn match_lparen(&mut self) -> bool {
        if self.check_lparen() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn check_rparen(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::RParen(_)))
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        if self.check_rparen() {
            self.position += 1;
            Ok(())
        } else {
            Err(self.expected("')'", ctx))
        }
    }

    pub(crate) fn check_lbracket(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::LBracket(_)))
    }

    pub(crate) fn match_lbracket(&mut self) -> bool {
        if self.check_lbracket() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn check_rbracket(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::RBracket(_)))
    }

    pub(crate) fn expect_rbracket(&mut self, ctx: &str) -> Result<(), ParseError> {
        if self.check_rbracket() {
            self.position += 1;
            Ok(())
        } else {
            Err(self.expected("']'", ctx))
        }
    }

    pub(crate) fn check_lbrace(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::LBrace(_)))
    }

    pub(crate) fn match_lbrace(&mut self) -> bool {
        if self.check_lbrace() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn check_rbrace(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::RBrace(_)))
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        if self.check_rbrace() {
            self.position += 1;
            Ok(())
        } else {
            Err(self.expected("'}'", ctx))
        }
    }

    pub(crate) fn check_dot(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::Dot(_)))
    }

    pub(crate) fn match_dot(&mut self) -> bool {
        if self.check_dot() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn check_at(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::At(_)))
    }

    pub(crate) fn match_arrow(&mut self) -> bool {
        if matches!(self.tokens.get(self.position), Some(Token::Arrow(_))) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn check_newline(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::Newline(_)))
    }

    pub(crate) fn match_newline(&mut self) -> bool {
        if self.check_newline() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn check_semicolon(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::Semicolon(_)))
    }

    pub(crate) fn match_semicolon(&mut self) -> bool {
        if self.check_semicolon() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn check_indent(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::Indent(_, _)))
    }

    pub(crate) fn check_dedent(&self) -> bool {
        matches!(self.tokens.get(self.position), Some(Token::Dedent(_, _)))
    }

    /// Skip blank lines between statements.
    pub(crate) fn skip_newlines(&mut self) {
        while self.check_newline() {
            self.position += 1;
        }
    }

    // ===== Classification =====

    /// Whether the current token can begin an expression.
    pub(crate) fn starts_expression(&self) -> bool {
        match self.tokens.get(self.position) {
            Some(Token::Identifier(_, _))
            | Some(Token::Number(_, _))
            | Some(Token::Str(_, _))
            | Some(Token::BytesMarker(_))
            | Some(Token::FormatMarker(_))
            | Some(Token::LParen(_))
            | Some(Token::LBracket(_))
            | Some(Token::LBrace(_)) => true,
            Some(Token::Keyword(kw, _)) => matches!(
                kw,
                Keyword::True
                    | Keyword::False
                    | Keyword::None
                    | Keyword::Not
                    | Keyword::Lambda
                    | Keyword::Await
                    | Keyword::Yield
            ),
            Some(Token::Operator(op, _)) => matches!(
                op,
                Operator::Minus | Operator::Plus | Operator::Tilde | Operator::Star
            ),
            _ => false,
        }
    }

    /// Whether the cursor sits at the end of a simple statement.
    pub(crate) fn at_statement_end(&self) -> bool {
        matches!(
            self.tokens.get(self.position),
            None | Some(Token::Newline(_)) | Some(Token::Semicolon(_)) | Some(Token::Dedent(_, _))
        )
    }

    /// Recoverable expectation failure at the current position.
    pub(crate) fn expected(&self, what: &str, ctx: &str) -> ParseError {
        let found = match self.tokens.get(self.position) {
            Some(token) => format!("{}", token),
            None => "end of input".to_string(),
        };
        ParseError::new(
            format!("Expected {} {}, found {}", what, ctx, found),
            self.current_location(),
        )
    }
}
