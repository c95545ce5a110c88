//! Expression parsing implementation
//!
//! This module implements the operator precedence ladder for Python
//! expressions: a fixed chain of mutually calling productions, one per
//! precedence level, from boolean disjunction down to power and the unary
//! forms. Atoms and trailer chains live in `atoms`.
//!
//! # Precedence
//!
//! disjunction → conjunction → inversion → comparison → bitwise or →
//! bitwise xor → bitwise and → shift → sum → term → factor → power →
//! await/primary.
//!
//! # Associativity
//!
//! Sum and term runs are parsed right-recursively, the way the grammar
//! reads, which yields a right-leaning chain for `a - b - c`. The enclosing
//! level then re-associates the run through [`flip_binary_chain`] so the
//! tree evaluates left-to-right. Power is right-associative and is left
//! unflipped. The remaining binary levels fold iteratively and are
//! left-leaning by construction.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::tokens::{Keyword, Operator};

/// Re-associate the right-leaning spine built by a right-recursive run of
/// same-precedence operators into left-to-right evaluation order.
///
/// `run` is the number of operators the run actually produced, so grouped
/// sub-expressions sitting on the right spine are never rebalanced; `in_run`
/// names the operators that belong to the run being flattened.
pub(crate) fn flip_binary_chain(expr: Expr, run: usize, in_run: fn(BinOp) -> bool) -> Expr {
    if run < 2 {
        return expr;
    }
    let (mut result, mut rest, mut pending) = match expr {
        Expr::BinaryOp {
            op,
            left,
            right,
            location,
        } if in_run(op) => (*left, *right, (op, location)),
        other => return other,
    };
    let mut remaining = run - 1;
    loop {
        if remaining == 0 {
            return Expr::BinaryOp {
                op: pending.0,
                left: Box::new(result),
                right: Box::new(rest),
                location: pending.1,
            };
        }
        match rest {
            Expr::BinaryOp {
                op,
                left,
                right,
                location,
            } if in_run(op) => {
                result = Expr::BinaryOp {
                    op: pending.0,
                    left: Box::new(result),
                    right: left,
                    location: pending.1,
                };
                pending = (op, location);
                rest = *right;
                remaining -= 1;
            }
            other => {
                return Expr::BinaryOp {
                    op: pending.0,
                    left: Box::new(result),
                    right: Box::new(other),
                    location: pending.1,
                };
            }
        }
    }
}

impl Parser {
    /// Parse expression: ternary conditional, lambda, or plain disjunction.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        if self.check_keyword(Keyword::Lambda) {
            return self.parse_lambda();
        }
        let expr = self.parse_disjunction()?;
        if self.match_keyword(Keyword::If) {
            let loc = self.previous_location();
            let condition = Box::new(self.parse_disjunction()?);
            self.expect_keyword(Keyword::Else, "in conditional expression")?;
            let false_expr = Box::new(self.parse_expression()?);
            return Ok(Expr::TernaryOp {
                condition,
                true_expr: Box::new(expr),
                false_expr,
                location: loc,
            });
        }
        Ok(expr)
    }

    /// Parse named expression: `NAME := expression` or a plain expression.
    pub(crate) fn parse_named_expression(&mut self) -> Result<Expr, ParseError> {
        if self.check_identifier()
            && matches!(
                self.peek_ahead(1),
                Some(Token::Operator(Operator::Walrus, _))
            )
        {
            let loc = self.current_location();
            let target = self.expect_identifier("before ':='")?;
            self.advance();
            let value = Box::new(self.parse_expression()?);
            return Ok(Expr::NamedExpr {
                target,
                value,
                location: loc,
            });
        }
        self.parse_expression()
    }

    /// Parse one or more comma-separated star expressions; two or more, or a
    /// trailing comma, form a tuple.
    pub(crate) fn parse_star_expressions(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();
        let first = self.parse_star_expression()?;
        if !self.check_comma() {
            return Ok(first);
        }
        let mut elements = vec![first];
        while self.match_comma() {
            if !self.starts_expression() {
                break;
            }
            elements.push(self.parse_star_expression()?);
        }
        Ok(Expr::Collection {
            kind: CollectionKind::Tuple,
            elements,
            location: loc,
        })
    }

    /// Parse star expression: `*bitwise_or` or a plain expression.
    pub(crate) fn parse_star_expression(&mut self) -> Result<Expr, ParseError> {
        if self.check_op(Operator::Star) {
            let loc = self.current_location();
            self.advance();
            let value = Box::new(self.parse_bitor()?);
            return Ok(Expr::Starred {
                value,
                location: loc,
            });
        }
        self.parse_expression()
    }

    /// Parse star named expression: `*bitwise_or` or a named expression.
    /// This is the element form of list and tuple displays.
    pub(crate) fn parse_star_named_expression(&mut self) -> Result<Expr, ParseError> {
        if self.check_op(Operator::Star) {
            let loc = self.current_location();
            self.advance();
            let value = Box::new(self.parse_bitor()?);
            return Ok(Expr::Starred {
                value,
                location: loc,
            });
        }
        self.parse_named_expression()
    }

    /// Parse logical `or`. Also the ceiling for comprehension iterables and
    /// conditions, which must not consume a following `if`/`else`/`for`.
    pub(crate) fn parse_disjunction(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_conjunction()?;
        while self.match_keyword(Keyword::Or) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_conjunction()?);
            left = Expr::BinaryOp {
                op: BinOp::Or,
                left: Box::new(left),
                right,
                location: loc,
            };
        }
        Ok(left)
    }

    /// Parse logical `and`.
    fn parse_conjunction(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_inversion()?;
        while self.match_keyword(Keyword::And) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_inversion()?);
            left = Expr::BinaryOp {
                op: BinOp::And,
                left: Box::new(left),
                right,
                location: loc,
            };
        }
        Ok(left)
    }

    /// Parse logical `not`.
    fn parse_inversion(&mut self) -> Result<Expr, ParseError> {
        if self.match_keyword(Keyword::Not) {
            let loc = self.previous_location();
            let operand = Box::new(self.parse_inversion()?);
            return Ok(Expr::UnaryOp {
                op: UnOp::Not,
                operand,
                location: loc,
            });
        }
        self.parse_comparison()
    }

    /// Parse comparison chain (== != < <= > >= is [not] [not] in), folding
    /// each newly parsed pair onto the growing left side.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bitor()?;
        loop {
            let loc = self.current_location();
            let op = if self.match_op(Operator::EqEq) {
                BinOp::Eq
            } else if self.match_op(Operator::NotEq) {
                BinOp::Ne
            } else if self.match_op(Operator::Le) {
                BinOp::Le
            } else if self.match_op(Operator::Ge) {
                BinOp::Ge
            } else if self.match_op(Operator::Lt) {
                BinOp::Lt
            } else if self.match_op(Operator::Gt) {
                BinOp::Gt
            } else if self.check_keyword(Keyword::Is) {
                self.advance();
                if self.match_keyword(Keyword::Not) {
                    BinOp::IsNot
                } else {
                    BinOp::Is
                }
            } else if self.check_keyword(Keyword::In) {
                self.advance();
                BinOp::In
            } else if self.check_keyword(Keyword::Not)
                && matches!(self.peek_ahead(1), Some(Token::Keyword(Keyword::In, _)))
            {
                self.advance();
                self.advance();
                BinOp::NotIn
            } else {
                break;
            };
            let right = Box::new(self.parse_bitor()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }
        Ok(left)
    }

    /// Parse bitwise OR (|).
    pub(crate) fn parse_bitor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bitxor()?;
        while self.match_op(Operator::Pipe) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_bitxor()?);
            left = Expr::BinaryOp {
                op: BinOp::BitOr,
                left: Box::new(left),
                right,
                location: loc,
            };
        }
        Ok(left)
    }

    /// Parse bitwise XOR (^).
    fn parse_bitxor(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bitand()?;
        while self.match_op(Operator::Caret) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_bitand()?);
            left = Expr::BinaryOp {
                op: BinOp::BitXor,
                left: Box::new(left),
                right,
                location: loc,
            };
        }
        Ok(left)
    }

    /// Parse bitwise AND (&).
    fn parse_bitand(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_shift()?;
        while self.match_op(Operator::Amp) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_shift()?);
            left = Expr::BinaryOp {
                op: BinOp::BitAnd,
                left: Box::new(left),
                right,
                location: loc,
            };
        }
        Ok(left)
    }

    /// Parse bitwise shift (<< >>); the sum runs nested beneath each operand
    /// are flipped here.
    fn parse_shift(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_sum()?;
        loop {
            let loc = self.current_location();
            let op = if self.match_op(Operator::LtLt) {
                BinOp::BitShl
            } else if self.match_op(Operator::GtGt) {
                BinOp::BitShr
            } else {
                break;
            };
            let right = Box::new(self.parse_sum()?);
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }
        Ok(left)
    }

    /// Parse additive run (+ -) and restore its left associativity.
    fn parse_sum(&mut self) -> Result<Expr, ParseError> {
        let (chain, run) = self.parse_sum_chain()?;
        Ok(flip_binary_chain(chain, run, |op| {
            matches!(op, BinOp::Add | BinOp::Sub)
        }))
    }

    fn parse_sum_chain(&mut self) -> Result<(Expr, usize), ParseError> {
        let left = self.parse_term()?;
        let loc = self.current_location();
        let op = if self.match_op(Operator::Plus) {
            BinOp::Add
        } else if self.match_op(Operator::Minus) {
            BinOp::Sub
        } else {
            return Ok((left, 0));
        };
        let (right, run) = self.parse_sum_chain()?;
        Ok((
            Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            },
            run + 1,
        ))
    }

    /// Parse multiplicative run (* / // % @) and restore its left
    /// associativity.
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let (chain, run) = self.parse_term_chain()?;
        Ok(flip_binary_chain(chain, run, |op| {
            matches!(
                op,
                BinOp::Mul | BinOp::Div | BinOp::FloorDiv | BinOp::Mod | BinOp::MatMul
            )
        }))
    }

    fn parse_term_chain(&mut self) -> Result<(Expr, usize), ParseError> {
        let left = self.parse_factor()?;
        let loc = self.current_location();
        let op = if self.match_op(Operator::Star) {
            BinOp::Mul
        } else if self.match_op(Operator::Slash) {
            BinOp::Div
        } else if self.match_op(Operator::SlashSlash) {
            BinOp::FloorDiv
        } else if self.match_op(Operator::Percent) {
            BinOp::Mod
        } else if self.check_at() {
            self.advance();
            BinOp::MatMul
        } else {
            return Ok((left, 0));
        };
        let (right, run) = self.parse_term_chain()?;
        Ok((
            Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            },
            run + 1,
        ))
    }

    /// Parse unary sign and invert (+ - ~).
    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();
        let op = if self.match_op(Operator::Plus) {
            UnOp::Pos
        } else if self.match_op(Operator::Minus) {
            UnOp::Neg
        } else if self.match_op(Operator::Tilde) {
            UnOp::BitNot
        } else {
            return self.parse_power();
        };
        let operand = Box::new(self.parse_factor()?);
        Ok(Expr::UnaryOp {
            op,
            operand,
            location: loc,
        })
    }

    /// Parse power (**), right-associative and left unflipped.
    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_await_primary()?;
        if self.match_op(Operator::StarStar) {
            let loc = self.previous_location();
            let right = Box::new(self.parse_factor()?);
            return Ok(Expr::BinaryOp {
                op: BinOp::Pow,
                left: Box::new(base),
                right,
                location: loc,
            });
        }
        Ok(base)
    }

    /// Parse `await` prefix ahead of a primary.
    fn parse_await_primary(&mut self) -> Result<Expr, ParseError> {
        if self.match_keyword(Keyword::Await) {
            let loc = self.previous_location();
            let value = Box::new(self.parse_primary()?);
            return Ok(Expr::Await {
                value,
                location: loc,
            });
        }
        self.parse_primary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr(source: &str) -> Expr {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_eval().unwrap()
    }

    fn constant_value(expr: &Expr) -> &str {
        match expr {
            Expr::Constant { value, .. } => value,
            other => panic!("Expected constant, got {:?}", other),
        }
    }

    #[test]
    fn test_sum_run_is_left_associative() {
        // ((1 - 2) - 3), not (1 - (2 - 3))
        match parse_expr("1 - 2 - 3") {
            Expr::BinaryOp {
                op: BinOp::Sub,
                left,
                right,
                ..
            } => {
                assert_eq!(constant_value(&right), "3");
                match *left {
                    Expr::BinaryOp {
                        op: BinOp::Sub,
                        left,
                        right,
                        ..
                    } => {
                        assert_eq!(constant_value(&left), "1");
                        assert_eq!(constant_value(&right), "2");
                    }
                    other => panic!("Expected nested subtraction, got {:?}", other),
                }
            }
            other => panic!("Expected subtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized_right_operand_is_not_rebalanced() {
        match parse_expr("1 - (2 - 3)") {
            Expr::BinaryOp {
                op: BinOp::Sub,
                left,
                right,
                ..
            } => {
                assert_eq!(constant_value(&left), "1");
                assert!(matches!(*right, Expr::BinaryOp { op: BinOp::Sub, .. }));
            }
            other => panic!("Expected subtraction, got {:?}", other),
        }
    }

    #[test]
    fn test_term_binds_tighter_than_sum() {
        // 1 + (2 * 3)
        match parse_expr("1 + 2 * 3") {
            Expr::BinaryOp {
                op: BinOp::Add,
                left,
                right,
                ..
            } => {
                assert_eq!(constant_value(&left), "1");
                assert!(matches!(*right, Expr::BinaryOp { op: BinOp::Mul, .. }));
            }
            other => panic!("Expected addition, got {:?}", other),
        }
    }

    #[test]
    fn test_mixed_term_run_stays_source_ordered() {
        // ((8 / 4) * 2)
        match parse_expr("8 / 4 * 2") {
            Expr::BinaryOp {
                op: BinOp::Mul,
                left,
                right,
                ..
            } => {
                assert_eq!(constant_value(&right), "2");
                assert!(matches!(*left, Expr::BinaryOp { op: BinOp::Div, .. }));
            }
            other => panic!("Expected multiplication, got {:?}", other),
        }
    }

    #[test]
    fn test_power_is_right_associative() {
        // 2 ** (3 ** 4)
        match parse_expr("2 ** 3 ** 4") {
            Expr::BinaryOp {
                op: BinOp::Pow,
                left,
                right,
                ..
            } => {
                assert_eq!(constant_value(&left), "2");
                assert!(matches!(*right, Expr::BinaryOp { op: BinOp::Pow, .. }));
            }
            other => panic!("Expected power, got {:?}", other),
        }
    }

    #[test]
    fn test_two_keyword_comparisons() {
        assert!(matches!(
            parse_expr("a is not b"),
            Expr::BinaryOp {
                op: BinOp::IsNot,
                ..
            }
        ));
        assert!(matches!(
            parse_expr("a not in b"),
            Expr::BinaryOp {
                op: BinOp::NotIn,
                ..
            }
        ));
        assert!(matches!(
            parse_expr("a in b"),
            Expr::BinaryOp { op: BinOp::In, .. }
        ));
    }

    #[test]
    fn test_chained_comparison_folds_left() {
        // ((a < b) < c)
        match parse_expr("a < b < c") {
            Expr::BinaryOp {
                op: BinOp::Lt,
                left,
                ..
            } => {
                assert!(matches!(*left, Expr::BinaryOp { op: BinOp::Lt, .. }));
            }
            other => panic!("Expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_ternary_conditional() {
        match parse_expr("1 if flag else 2") {
            Expr::TernaryOp {
                condition,
                true_expr,
                false_expr,
                ..
            } => {
                assert!(matches!(*condition, Expr::Name { ref id, .. } if id == "flag"));
                assert_eq!(constant_value(&true_expr), "1");
                assert_eq!(constant_value(&false_expr), "2");
            }
            other => panic!("Expected conditional expression, got {:?}", other),
        }
    }

    #[test]
    fn test_named_expression() {
        match parse_expr("(n := 10)") {
            Expr::NamedExpr { target, value, .. } => {
                assert_eq!(target, "n");
                assert_eq!(constant_value(&value), "10");
            }
            other => panic!("Expected named expression, got {:?}", other),
        }
    }

    #[test]
    fn test_not_and_or_precedence() {
        // (not a) or (b and c)
        match parse_expr("not a or b and c") {
            Expr::BinaryOp {
                op: BinOp::Or,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::UnaryOp { op: UnOp::Not, .. }));
                assert!(matches!(*right, Expr::BinaryOp { op: BinOp::And, .. }));
            }
            other => panic!("Expected disjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_before_power_operand() {
        // -(x ** 2) binds as -(x ** 2), 2 ** -3 keeps the sign on the exponent
        assert!(matches!(
            parse_expr("-x ** 2"),
            Expr::UnaryOp { op: UnOp::Neg, .. }
        ));
        match parse_expr("2 ** -3") {
            Expr::BinaryOp {
                op: BinOp::Pow,
                right,
                ..
            } => {
                assert!(matches!(*right, Expr::UnaryOp { op: UnOp::Neg, .. }));
            }
            other => panic!("Expected power, got {:?}", other),
        }
    }

    #[test]
    fn test_matmul_in_term_run() {
        match parse_expr("a @ b @ c") {
            Expr::BinaryOp {
                op: BinOp::MatMul,
                left,
                ..
            } => {
                assert!(matches!(*left, Expr::BinaryOp { op: BinOp::MatMul, .. }));
            }
            other => panic!("Expected matrix multiplication, got {:?}", other),
        }
    }

    #[test]
    fn test_await_prefix() {
        assert!(matches!(parse_expr("await f()"), Expr::Await { .. }));
    }

    #[test]
    fn test_flip_leaves_short_chains_alone() {
        let loc = SourceLocation::new(1, 1);
        let single = Expr::Name {
            id: "x".to_string(),
            location: loc,
        };
        assert!(matches!(
            flip_binary_chain(single, 0, |op| matches!(op, BinOp::Add)),
            Expr::Name { .. }
        ));
    }
}
