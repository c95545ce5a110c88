//! Lexer (tokenizer) for Python 3.10 source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Indentation is resolved here: the lexer keeps a stack of open indentation
//! distances and emits one `Indent`, `SameIndent` or `Dedent` token per measured
//! line, so the parser never looks at whitespace. Comments survive as tokens
//! with an end-of-statement token injected in front of them, which keeps every
//! statement terminated even when a comment trails it.

use super::ast::SourceLocation;
use super::tokens::{keyword_lookup, match_operator, Keyword, Operator};
use serde::Serialize;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Token {
    // Literals and names; lexemes are kept raw, nothing is converted here
    Number(String, SourceLocation),
    Str(String, SourceLocation),
    Identifier(String, SourceLocation),
    Keyword(Keyword, SourceLocation),
    Operator(Operator, SourceLocation),

    // String prefixes; the marked literal follows as its own token
    BytesMarker(SourceLocation),  // b"..."
    FormatMarker(SourceLocation), // f"..."

    // Punctuation
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBracket(SourceLocation),  // [
    RBracket(SourceLocation),  // ]
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }
    Comma(SourceLocation),     // ,
    Colon(SourceLocation),     // :
    Dot(SourceLocation),       // .
    Semicolon(SourceLocation), // ;
    Arrow(SourceLocation),     // ->
    At(SourceLocation),        // @

    // Layout; an indentation token carries the distance that is current
    // once the token takes effect
    Newline(SourceLocation),
    Indent(usize, SourceLocation),
    Dedent(usize, SourceLocation),
    SameIndent(usize, SourceLocation),
    Comment(String, SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Number(_, loc)
            | Token::Str(_, loc)
            | Token::Identifier(_, loc)
            | Token::Keyword(_, loc)
            | Token::Operator(_, loc)
            | Token::BytesMarker(loc)
            | Token::FormatMarker(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::Comma(loc)
            | Token::Colon(loc)
            | Token::Dot(loc)
            | Token::Semicolon(loc)
            | Token::Arrow(loc)
            | Token::At(loc)
            | Token::Newline(loc)
            | Token::Indent(_, loc)
            | Token::Dedent(_, loc)
            | Token::SameIndent(_, loc)
            | Token::Comment(_, loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value, _) => write!(f, "number {}", value),
            Token::Str(value, _) => write!(f, "string '{}'", value),
            Token::Identifier(name, _) => write!(f, "'{}'", name),
            Token::Keyword(kw, _) => write!(f, "'{}'", kw),
            Token::Operator(op, _) => write!(f, "'{}'", op),
            Token::BytesMarker(_) => write!(f, "bytes prefix"),
            Token::FormatMarker(_) => write!(f, "format string prefix"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Colon(_) => write!(f, "':'"),
            Token::Dot(_) => write!(f, "'.'"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Arrow(_) => write!(f, "'->'"),
            Token::At(_) => write!(f, "'@'"),
            Token::Newline(_) => write!(f, "end of line"),
            Token::Indent(depth, _) => write!(f, "indent to depth {}", depth),
            Token::Dedent(depth, _) => write!(f, "dedent to depth {}", depth),
            Token::SameIndent(depth, _) => write!(f, "indent at depth {}", depth),
            Token::Comment(_, _) => write!(f, "comment"),
        }
    }
}

/// Error produced during lexical analysis.
#[derive(Debug, Clone)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexical error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// The lexer state.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    /// Open indentation distances, innermost last; empty means depth zero
    indents: Vec<usize>,
    at_line_start: bool,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            input: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            indents: Vec::new(),
            at_line_start: true,
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while !self.is_at_end() {
            self.scan_token(&mut tokens)?;
        }
        // Guarantee a trailing end-of-statement token, then close every
        // block the input left open.
        if !matches!(tokens.last(), Some(Token::Newline(_))) {
            tokens.push(Token::Newline(self.current_location()));
        }
        while !self.indents.is_empty() {
            self.pop_indent(&mut tokens);
        }
        Ok(tokens)
    }

    fn scan_token(&mut self, tokens: &mut Vec<Token>) -> Result<(), LexError> {
        let ch = match self.peek() {
            Some(c) => c,
            None => return Ok(()),
        };

        // Carriage returns and explicit line joins never reach the stream.
        if ch == '\r' {
            self.advance();
            return Ok(());
        }
        if ch == '\\' && matches!(self.peek_ahead(1), Some('\n') | Some('\r')) {
            self.advance();
            if self.peek() == Some('\r') {
                self.advance();
            }
            if self.peek() == Some('\n') {
                self.advance();
            }
            return Ok(());
        }

        // Leading whitespace is measured at the start of a line.
        if self.at_line_start && (ch == ' ' || ch == '\t') {
            let mut distance = 0usize;
            while matches!(self.peek(), Some(' ') | Some('\t')) {
                self.advance();
                distance += 1;
            }
            if matches!(self.peek(), None | Some('\n') | Some('\r') | Some('#')) {
                // Whitespace-only and comment-only lines leave the
                // indentation state untouched.
                return Ok(());
            }
            self.at_line_start = false;
            return self.emit_indentation(distance, tokens);
        }
        if self.at_line_start && ch != '\n' && ch != '#' {
            // Content at column one closes every open block.
            self.at_line_start = false;
            while !self.indents.is_empty() {
                self.pop_indent(tokens);
            }
        }

        match ch {
            '\n' => {
                let loc = self.current_location();
                self.advance();
                tokens.push(Token::Newline(loc));
                self.at_line_start = true;
            }
            ';' => {
                let loc = self.current_location();
                self.advance();
                tokens.push(Token::Semicolon(loc));
            }
            '#' => {
                let comment = self.line_comment();
                tokens.push(Token::Newline(comment.location()));
                tokens.push(comment);
            }
            '"' if self.peek_ahead(1) == Some('"') && self.peek_ahead(2) == Some('"') => {
                let comment = self.block_comment()?;
                tokens.push(Token::Newline(comment.location()));
                tokens.push(comment);
            }
            '"' | '\'' => {
                let token = self.string_literal(ch)?;
                tokens.push(token);
            }
            'b' | 'B' if matches!(self.peek_ahead(1), Some('"') | Some('\'')) => {
                let loc = self.current_location();
                self.advance();
                tokens.push(Token::BytesMarker(loc));
            }
            'f' | 'F' if matches!(self.peek_ahead(1), Some('"') | Some('\'')) => {
                let loc = self.current_location();
                self.advance();
                tokens.push(Token::FormatMarker(loc));
            }
            '-' if self.peek_ahead(1) == Some('>') => {
                let loc = self.current_location();
                self.advance();
                self.advance();
                tokens.push(Token::Arrow(loc));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                tokens.push(self.identifier_or_keyword());
            }
            c if c.is_ascii_digit() => {
                tokens.push(self.number_literal());
            }
            '.' if matches!(self.peek_ahead(1), Some(d) if d.is_ascii_digit()) => {
                tokens.push(self.number_literal());
            }
            '.' => {
                let loc = self.current_location();
                self.advance();
                tokens.push(Token::Dot(loc));
            }
            '(' | '[' | '{' => {
                let loc = self.current_location();
                self.advance();
                tokens.push(match ch {
                    '(' => Token::LParen(loc),
                    '[' => Token::LBracket(loc),
                    _ => Token::LBrace(loc),
                });
                // Implicit line joining directly after an opening bracket.
                self.skip_joining_whitespace();
            }
            ')' | ']' | '}' => {
                let loc = self.current_location();
                self.advance();
                tokens.push(match ch {
                    ')' => Token::RParen(loc),
                    ']' => Token::RBracket(loc),
                    _ => Token::RBrace(loc),
                });
            }
            ',' => {
                let loc = self.current_location();
                self.advance();
                tokens.push(Token::Comma(loc));
                // Element lists may continue on the next line after a comma.
                self.skip_joining_whitespace();
            }
            '@' if self.peek_ahead(1) != Some('=') => {
                let loc = self.current_location();
                self.advance();
                tokens.push(Token::At(loc));
            }
            ':' if self.peek_ahead(1) != Some('=') => {
                let loc = self.current_location();
                self.advance();
                tokens.push(Token::Colon(loc));
                // An inline suite may follow on the same line; the parser
                // decides, so the colon swallows its trailing whitespace.
                while matches!(self.peek(), Some(' ') | Some('\t')) {
                    self.advance();
                }
            }
            ' ' | '\t' => {
                self.advance();
            }
            _ => {
                if let Some((op, len)) = match_operator(&self.input, self.position) {
                    let loc = self.current_location();
                    for _ in 0..len {
                        self.advance();
                    }
                    tokens.push(Token::Operator(op, loc));
                } else {
                    return Err(LexError {
                        message: format!("unrecognized character '{}'", ch),
                        location: self.current_location(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Compare a measured leading-whitespace distance against the stack of
    /// open indentation levels and emit the matching layout token(s).
    fn emit_indentation(
        &mut self,
        distance: usize,
        tokens: &mut Vec<Token>,
    ) -> Result<(), LexError> {
        let loc = self.current_location();
        let current = self.indent_depth();
        if distance == current {
            tokens.push(Token::SameIndent(distance, loc));
        } else if distance > current {
            self.indents.push(distance);
            tokens.push(Token::Indent(distance, loc));
        } else {
            while self.indent_depth() > distance {
                self.pop_indent(tokens);
            }
            if self.indent_depth() != distance {
                return Err(LexError {
                    message: format!("unindent to depth {} matches no open block", distance),
                    location: loc,
                });
            }
        }
        Ok(())
    }

    fn indent_depth(&self) -> usize {
        self.indents.last().copied().unwrap_or(0)
    }

    /// Close the innermost block; the emitted token carries the depth that
    /// is current after the pop.
    fn pop_indent(&mut self, tokens: &mut Vec<Token>) {
        self.indents.pop();
        tokens.push(Token::Dedent(self.indent_depth(), self.current_location()));
    }

    fn identifier_or_keyword(&mut self) -> Token {
        let loc = self.current_location();
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match keyword_lookup(&ident) {
            Some(kw) => Token::Keyword(kw, loc),
            None => Token::Identifier(ident, loc),
        }
    }

    /// Scan a numeric literal: digits, at most one decimal point, an exponent
    /// with optional sign, and a trailing imaginary marker. An exponent
    /// marker is only consumed when digits actually follow it, so `1e` lexes
    /// as the number `1` and the identifier `e`.
    fn number_literal(&mut self) -> Token {
        let loc = self.current_location();
        let mut text = String::new();
        let mut seen_dot = false;
        let mut seen_exp = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else if c == '.' && !seen_dot && !seen_exp {
                seen_dot = true;
                text.push(c);
                self.advance();
            } else if (c == 'e' || c == 'E') && !seen_exp {
                let digit_offset = match self.peek_ahead(1) {
                    Some('+') | Some('-') => 2,
                    _ => 1,
                };
                if !matches!(self.peek_ahead(digit_offset), Some(d) if d.is_ascii_digit()) {
                    break;
                }
                seen_exp = true;
                for _ in 0..digit_offset {
                    if let Some(taken) = self.advance() {
                        text.push(taken);
                    }
                }
            } else if c == 'j' || c == 'J' {
                text.push(c);
                self.advance();
                break;
            } else {
                break;
            }
        }
        Token::Number(text, loc)
    }

    /// Scan a single- or double-quoted string. The stored value is the raw
    /// inner text; escapes are not processed, but a backslash keeps the
    /// closing quote from terminating. Newlines may appear inside.
    fn string_literal(&mut self, quote: char) -> Result<Token, LexError> {
        let loc = self.current_location();
        self.advance();
        let mut value = String::new();
        let mut prev = quote;
        loop {
            let c = match self.advance() {
                Some(c) => c,
                None => {
                    return Err(LexError {
                        message: "unterminated string literal".to_string(),
                        location: loc,
                    });
                }
            };
            if c == quote && prev != '\\' {
                break;
            }
            value.push(c);
            prev = c;
        }
        Ok(Token::Str(value, loc))
    }

    fn line_comment(&mut self) -> Token {
        let loc = self.current_location();
        self.advance();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        Token::Comment(text.trim().to_string(), loc)
    }

    /// Scan a `"""..."""` run; these carry no expression value and are kept
    /// as comments.
    fn block_comment(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        for _ in 0..3 {
            self.advance();
        }
        let mut text = String::new();
        loop {
            if self.is_at_end() {
                return Err(LexError {
                    message: "unterminated triple-quoted string".to_string(),
                    location: loc,
                });
            }
            if self.peek() == Some('"')
                && self.peek_ahead(1) == Some('"')
                && self.peek_ahead(2) == Some('"')
            {
                for _ in 0..3 {
                    self.advance();
                }
                break;
            }
            if let Some(c) = self.advance() {
                text.push(c);
            }
        }
        Ok(Token::Comment(text.trim().to_string(), loc))
    }

    /// Skip whitespace including newlines; used directly after tokens that
    /// let the logical line continue below.
    fn skip_joining_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t') | Some('\r') | Some('\n')) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied();
        if let Some(ch) = c {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        c
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
