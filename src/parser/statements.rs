//! Statement parsing implementation
//!
//! This module handles the simple (one-line) statement forms:
//!
//! - Assignments: plain, chained, augmented, and annotated
//! - Flow statements: `return`, `break`, `continue`, `pass`, `raise`
//! - Scope statements: `global`, `nonlocal`, `del`
//! - Imports: `import a.b as c`, `from ..pkg import x, y`
//! - Expression statements, including bare `yield`
//!
//! # Grammar
//!
//! ```text
//! statement_line ::= compound_stmt | simple_stmt (';' simple_stmt)* [';'] NEWLINE
//! assignment     ::= NAME ':' expression ['=' annotated_rhs]
//!                  | '(' single_target ')' ':' expression ['=' annotated_rhs]
//!                  | single_subscript_attribute_target ':' expression ['=' annotated_rhs]
//!                  | (star_targets '=')+ (yield_expr | star_expressions)
//!                  | single_target augassign (yield_expr | star_expressions)
//! ```
//!
//! Compound statements (`if`, `def`, and friends) are dispatched to the
//! declarations module. The assignment alternatives are tried in order
//! with full backtracking, so an expression statement like `f(x=1)` is
//! only reached after every assignment shape has failed cleanly.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::tokens::{Keyword, Operator};

/// Map an augmented-assignment operator to the binary operation it applies.
fn augmented_binop(op: Operator) -> Option<BinOp> {
    match op {
        Operator::PlusEq => Some(BinOp::Add),
        Operator::MinusEq => Some(BinOp::Sub),
        Operator::StarEq => Some(BinOp::Mul),
        Operator::SlashEq => Some(BinOp::Div),
        Operator::SlashSlashEq => Some(BinOp::FloorDiv),
        Operator::PercentEq => Some(BinOp::Mod),
        Operator::StarStarEq => Some(BinOp::Pow),
        Operator::AtEq => Some(BinOp::MatMul),
        Operator::AmpEq => Some(BinOp::BitAnd),
        Operator::PipeEq => Some(BinOp::BitOr),
        Operator::CaretEq => Some(BinOp::BitXor),
        Operator::LtLtEq => Some(BinOp::BitShl),
        Operator::GtGtEq => Some(BinOp::BitShr),
        _ => None,
    }
}

impl Parser {
    /// Parse one logical line of statements. A compound statement stands
    /// alone; simple statements may share a line separated by semicolons.
    pub(crate) fn parse_statement_line(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if self.at_compound_statement() {
            return Ok(vec![self.parse_compound_statement()?]);
        }
        let mut statements = vec![self.parse_simple_statement()?];
        while self.match_semicolon() {
            if self.check_newline() || self.check_dedent() || self.is_at_end() {
                break;
            }
            statements.push(self.parse_simple_statement()?);
        }
        self.end_statement_line()?;
        Ok(statements)
    }

    /// A statement line ends at a newline, a dedent, or end of input. Only
    /// the newline is consumed; dedents belong to the enclosing block.
    pub(crate) fn end_statement_line(&mut self) -> Result<(), ParseError> {
        if self.match_newline() || self.check_dedent() || self.is_at_end() {
            Ok(())
        } else {
            Err(self.expected("end of line", "after statement"))
        }
    }

    fn at_compound_statement(&self) -> bool {
        // '@' at statement position introduces a decorator
        if self.check_at() {
            return true;
        }
        matches!(
            self.tokens.get(self.position),
            Some(Token::Keyword(
                Keyword::If
                    | Keyword::While
                    | Keyword::For
                    | Keyword::Try
                    | Keyword::With
                    | Keyword::Def
                    | Keyword::Class
                    | Keyword::Async
                    | Keyword::Match,
                _
            ))
        )
    }

    /// Parse a simple statement
    pub(crate) fn parse_simple_statement(&mut self) -> Result<Stmt, ParseError> {
        let location = self.current_location();

        if self.match_keyword(Keyword::Pass) {
            return Ok(Stmt::Pass { location });
        }

        if self.match_keyword(Keyword::Break) {
            return Ok(Stmt::Break { location });
        }

        if self.match_keyword(Keyword::Continue) {
            return Ok(Stmt::Continue { location });
        }

        if self.match_keyword(Keyword::Return) {
            let value = if self.at_statement_end() {
                None
            } else {
                Some(self.parse_star_expressions()?)
            };
            return Ok(Stmt::Return { value, location });
        }

        if self.match_keyword(Keyword::Global) {
            let names = self.parse_name_list("in 'global' statement")?;
            return Ok(Stmt::Global { names, location });
        }

        if self.match_keyword(Keyword::Nonlocal) {
            let names = self.parse_name_list("in 'nonlocal' statement")?;
            return Ok(Stmt::Nonlocal { names, location });
        }

        if self.match_keyword(Keyword::Del) {
            let targets = self.parse_del_targets()?;
            return Ok(Stmt::Del { targets, location });
        }

        if self.match_keyword(Keyword::Assert) {
            return self.parse_assert_statement(location);
        }

        if self.match_keyword(Keyword::Raise) {
            return self.parse_raise_statement(location);
        }

        if self.match_keyword(Keyword::Import) {
            return self.parse_import_statement(location);
        }

        if self.match_keyword(Keyword::From) {
            return self.parse_from_import_statement(location);
        }

        if self.check_keyword(Keyword::Yield) {
            let value = self.parse_yield_expression()?;
            return Ok(Stmt::Expression { value, location });
        }

        self.parse_assignment_or_expression(location)
    }

    /// NAME (',' NAME)*
    fn parse_name_list(&mut self, ctx: &str) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.expect_identifier(ctx)?];
        while self.match_comma() {
            names.push(self.expect_identifier(ctx)?);
        }
        Ok(names)
    }

    /// assert test [',' message]
    fn parse_assert_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let test = self.parse_expression()?;
        let message = if self.match_comma() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Stmt::Assert {
            test,
            message,
            location,
        })
    }

    /// raise [exception ['from' cause]]
    fn parse_raise_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        if self.at_statement_end() {
            return Ok(Stmt::Raise {
                exception: None,
                cause: None,
                location,
            });
        }
        let exception = Some(self.parse_expression()?);
        let cause = if self.match_keyword(Keyword::From) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        Ok(Stmt::Raise {
            exception,
            cause,
            location,
        })
    }

    /// import dotted_name ['as' NAME] (',' dotted_name ['as' NAME])*
    fn parse_import_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let mut names = vec![self.parse_dotted_alias()?];
        while self.match_comma() {
            names.push(self.parse_dotted_alias()?);
        }
        Ok(Stmt::Import { names, location })
    }

    fn parse_dotted_alias(&mut self) -> Result<ImportAlias, ParseError> {
        let name = self.parse_dotted_name()?;
        let alias = if self.match_keyword(Keyword::As) {
            Some(self.expect_identifier("after 'as'")?)
        } else {
            None
        };
        Ok(ImportAlias { name, alias })
    }

    fn parse_dotted_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_identifier("in import")?;
        while self.match_dot() {
            name.push('.');
            name.push_str(&self.expect_identifier("after '.'")?);
        }
        Ok(name)
    }

    /// from ['.']* [dotted_name] import ('*' | '(' aliases ')' | aliases)
    ///
    /// Leading dots count the relative import level; a purely relative
    /// import like `from .. import x` has an empty module name.
    fn parse_from_import_statement(
        &mut self,
        location: SourceLocation,
    ) -> Result<Stmt, ParseError> {
        let mut level = 0;
        while self.match_dot() {
            level += 1;
        }
        let module = if self.check_keyword(Keyword::Import) {
            if level == 0 {
                return Err(self.expected("a module name", "after 'from'"));
            }
            String::new()
        } else {
            self.parse_dotted_name()?
        };
        self.expect_keyword(Keyword::Import, "in 'from' import")?;

        if self.match_op(Operator::Star) {
            let names = vec![ImportAlias {
                name: "*".to_string(),
                alias: None,
            }];
            return Ok(Stmt::ImportFrom {
                module,
                level,
                names,
                location,
            });
        }

        let parenthesized = self.match_lparen();
        let mut names = vec![self.parse_plain_alias()?];
        while self.match_comma() {
            if parenthesized && self.check_rparen() {
                break;
            }
            names.push(self.parse_plain_alias()?);
        }
        if parenthesized {
            self.expect_rparen("after import list")?;
        }
        Ok(Stmt::ImportFrom {
            module,
            level,
            names,
            location,
        })
    }

    fn parse_plain_alias(&mut self) -> Result<ImportAlias, ParseError> {
        let name = self.expect_identifier("in import list")?;
        let alias = if self.match_keyword(Keyword::As) {
            Some(self.expect_identifier("after 'as'")?)
        } else {
            None
        };
        Ok(ImportAlias { name, alias })
    }

    /// Try each assignment alternative in order; fall back to a plain
    /// expression statement when none of them fits.
    fn parse_assignment_or_expression(
        &mut self,
        location: SourceLocation,
    ) -> Result<Stmt, ParseError> {
        if let Some(stmt) = self.attempt(|p| p.parse_annotated_name_assignment(location))? {
            return Ok(stmt);
        }
        if let Some(stmt) = self.attempt(|p| p.parse_parenthesized_target_assignment(location))? {
            return Ok(stmt);
        }
        if let Some(stmt) = self.attempt(|p| p.parse_annotated_target_assignment(location))? {
            return Ok(stmt);
        }
        if let Some(stmt) = self.attempt(|p| p.parse_chained_assignment(location))? {
            return Ok(stmt);
        }
        if let Some(stmt) = self.attempt(|p| p.parse_augmented_assignment(location))? {
            return Ok(stmt);
        }
        let value = self.parse_star_expressions()?;
        Ok(Stmt::Expression { value, location })
    }

    /// NAME ':' expression ['=' annotated_rhs]
    fn parse_annotated_name_assignment(
        &mut self,
        location: SourceLocation,
    ) -> Result<Stmt, ParseError> {
        let target_location = self.current_location();
        let id = self.expect_identifier("as assignment target")?;
        self.expect_colon("before annotation")?;
        let annotation = self.parse_expression()?;
        let value = self.parse_optional_annotated_value()?;
        if !self.at_statement_end() {
            return Err(self.expected("end of line", "after annotated assignment"));
        }
        Ok(Stmt::AnnAssign {
            target: Expr::Name {
                id,
                location: target_location,
            },
            annotation,
            value,
            location,
        })
    }

    /// '(' single_target ')' ':' expression ['=' annotated_rhs]
    fn parse_parenthesized_target_assignment(
        &mut self,
        location: SourceLocation,
    ) -> Result<Stmt, ParseError> {
        if !self.match_lparen() {
            return Err(self.expected("'('", "before assignment target"));
        }
        let target = self.parse_single_target()?;
        self.expect_rparen("after assignment target")?;
        self.expect_colon("before annotation")?;
        let annotation = self.parse_expression()?;
        let value = self.parse_optional_annotated_value()?;
        if !self.at_statement_end() {
            return Err(self.expected("end of line", "after annotated assignment"));
        }
        Ok(Stmt::AnnAssign {
            target,
            annotation,
            value,
            location,
        })
    }

    /// single_subscript_attribute_target ':' expression ['=' annotated_rhs]
    fn parse_annotated_target_assignment(
        &mut self,
        location: SourceLocation,
    ) -> Result<Stmt, ParseError> {
        let target = self.parse_primary_target()?;
        self.expect_colon("before annotation")?;
        let annotation = self.parse_expression()?;
        let value = self.parse_optional_annotated_value()?;
        if !self.at_statement_end() {
            return Err(self.expected("end of line", "after annotated assignment"));
        }
        Ok(Stmt::AnnAssign {
            target,
            annotation,
            value,
            location,
        })
    }

    fn parse_optional_annotated_value(&mut self) -> Result<Option<Expr>, ParseError> {
        if self.match_op(Operator::Eq) {
            Ok(Some(self.parse_assignment_value()?))
        } else {
            Ok(None)
        }
    }

    /// (star_targets '=')+ (yield_expr | star_expressions)
    ///
    /// Each target group keeps its own shape: `a, b = c = 1, 2` has two
    /// groups, the first a tuple.
    fn parse_chained_assignment(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let mut targets = Vec::new();
        while let Some(group) = self.attempt(|p| p.parse_target_group())? {
            targets.push(group);
        }
        if targets.is_empty() {
            return Err(self.expected("an assignment target", "here"));
        }
        let value = self.parse_assignment_value()?;
        Ok(Stmt::Assign {
            targets,
            value,
            location,
        })
    }

    /// star_targets '=' as one target group, a tuple when comma-separated.
    fn parse_target_group(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        let mut targets = self.parse_star_targets()?;
        self.expect_op(Operator::Eq, "after assignment target")?;
        if targets.len() == 1 {
            match targets.pop() {
                Some(single) => Ok(single),
                None => Err(self.expected("an assignment target", "here")),
            }
        } else {
            Ok(Expr::Collection {
                kind: CollectionKind::Tuple,
                elements: targets,
                location,
            })
        }
    }

    /// single_target augassign (yield_expr | star_expressions)
    fn parse_augmented_assignment(
        &mut self,
        location: SourceLocation,
    ) -> Result<Stmt, ParseError> {
        let target = self.parse_single_target()?;
        let op = match self.peek_token()? {
            Token::Operator(op, _) => match augmented_binop(op) {
                Some(binop) => {
                    self.advance();
                    binop
                }
                None => {
                    return Err(self.expected("an augmented assignment operator", "after target"))
                }
            },
            _ => return Err(self.expected("an augmented assignment operator", "after target")),
        };
        let value = self.parse_assignment_value()?;
        Ok(Stmt::AugAssign {
            target,
            op,
            value,
            location,
        })
    }

    /// The right-hand side of an assignment: a yield expression or a
    /// star-expression sequence.
    fn parse_assignment_value(&mut self) -> Result<Expr, ParseError> {
        if self.check_keyword(Keyword::Yield) {
            return self.parse_yield_expression();
        }
        self.parse_star_expressions()
    }
}
