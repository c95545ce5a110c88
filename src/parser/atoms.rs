//! Atoms, trailers, and display literals.
//!
//! An atom is the smallest expression unit: a literal, a name, or a
//! bracketed display. A primary is an atom followed by any number of
//! trailers (`.name`, `[slices]`, `(arguments)`). Bracketed forms are
//! ambiguous until several tokens in, so this module leans on
//! [`Parser::attempt`] to try the alternatives in a fixed order:
//!
//! - `(` generator expression, then yield group, then tuple or group
//! - `[` list display, then list comprehension
//! - `{` dict display, then set display, then dict comprehension, then
//!   set comprehension
//!
//! The assignment-target sub-grammar also lives here: targets reuse the
//! primary parser and then check that the resulting shape is assignable,
//! so `a.b = 1` and `a[0] = 1` work while `f() = 1` is rejected.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::tokens::{Keyword, Operator};

/// Classify a numeric lexeme. Anything with a fraction, exponent, or
/// imaginary suffix is a float constant; the rest are integers.
fn number_kind(text: &str) -> ConstantKind {
    if text.contains('.')
        || text.contains('e')
        || text.contains('E')
        || text.ends_with('j')
        || text.ends_with('J')
    {
        ConstantKind::Float
    } else {
        ConstantKind::Int
    }
}

impl Parser {
    /// Parse an atom and any trailers attached to it.
    pub(crate) fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_atom()?;
        loop {
            if self.check_dot() {
                let location = self.current_location();
                self.advance();
                let attr = self.expect_identifier("after '.'")?;
                expr = Expr::Attribute {
                    value: Box::new(expr),
                    attr,
                    location,
                };
            } else if self.check_lbracket() {
                let location = self.current_location();
                self.advance();
                let index = Box::new(self.parse_slices()?);
                self.expect_rbracket("after subscript")?;
                expr = Expr::Subscript {
                    value: Box::new(expr),
                    index,
                    location,
                };
            } else if self.check_lparen() {
                let location = self.current_location();
                // A call whose sole argument is a generator expression uses
                // the call's own parentheses, so try that shape first.
                if let Some(genexp) = self.attempt(|p| p.parse_genexp())? {
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args: vec![Argument::positional(genexp)],
                        location,
                    };
                } else {
                    self.advance();
                    let args = self.parse_call_arguments()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        location,
                    };
                }
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        match self.peek_token()? {
            Token::Keyword(Keyword::True, location) => {
                self.advance();
                Ok(Expr::Constant {
                    kind: ConstantKind::Bool,
                    value: "True".to_string(),
                    location,
                })
            }
            Token::Keyword(Keyword::False, location) => {
                self.advance();
                Ok(Expr::Constant {
                    kind: ConstantKind::Bool,
                    value: "False".to_string(),
                    location,
                })
            }
            Token::Keyword(Keyword::None, location) => {
                self.advance();
                Ok(Expr::Constant {
                    kind: ConstantKind::None,
                    value: "None".to_string(),
                    location,
                })
            }
            Token::Number(value, location) => {
                self.advance();
                Ok(Expr::Constant {
                    kind: number_kind(&value),
                    value,
                    location,
                })
            }
            Token::Str(value, location) => {
                self.advance();
                Ok(Expr::Constant {
                    kind: ConstantKind::Str,
                    value,
                    location,
                })
            }
            Token::BytesMarker(location) => {
                self.advance();
                self.string_constant(ConstantKind::Bytes, location)
            }
            Token::FormatMarker(location) => {
                self.advance();
                self.string_constant(ConstantKind::FormatStr, location)
            }
            Token::Identifier(id, location) => {
                self.advance();
                Ok(Expr::Name { id, location })
            }
            Token::LParen(_) => self.parse_group_or_tuple(),
            Token::LBracket(_) => self.parse_list_or_comprehension(),
            Token::LBrace(_) => self.parse_braces(),
            _ => Err(self.expected("an expression", "here")),
        }
    }

    fn string_constant(
        &mut self,
        kind: ConstantKind,
        location: SourceLocation,
    ) -> Result<Expr, ParseError> {
        match self.peek_token()? {
            Token::Str(value, _) => {
                self.advance();
                Ok(Expr::Constant {
                    kind,
                    value,
                    location,
                })
            }
            _ => Err(self.expected("a string literal", "after string prefix")),
        }
    }

    /// `(` generator expression | yield group | `)` empty tuple |
    /// expression group | tuple display.
    fn parse_group_or_tuple(&mut self) -> Result<Expr, ParseError> {
        if let Some(genexp) = self.attempt(|p| p.parse_genexp())? {
            return Ok(genexp);
        }
        let location = self.current_location();
        self.advance(); // (
        if self.check_rparen() {
            self.advance();
            return Ok(Expr::Collection {
                kind: CollectionKind::Tuple,
                elements: Vec::new(),
                location,
            });
        }
        if self.check_keyword(Keyword::Yield) {
            let value = self.parse_yield_expression()?;
            self.expect_rparen("after yield expression")?;
            return Ok(value);
        }
        let first = self.parse_star_named_expression()?;
        if !self.check_comma() {
            self.expect_rparen("after parenthesized expression")?;
            // Parentheses group; only a comma makes a tuple.
            return Ok(first);
        }
        let mut elements = vec![first];
        while self.match_comma() {
            if self.check_rparen() {
                break;
            }
            elements.push(self.parse_star_named_expression()?);
        }
        self.expect_rparen("after tuple display")?;
        Ok(Expr::Collection {
            kind: CollectionKind::Tuple,
            elements,
            location,
        })
    }

    /// `(` expression `for` ... `)` including the surrounding parentheses.
    fn parse_genexp(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        if !self.match_lparen() {
            return Err(self.expected("'('", "to open a generator expression"));
        }
        let element = if self.starts_named_expression() {
            self.parse_named_expression()?
        } else {
            self.parse_expression()?
        };
        let clauses = self.parse_for_if_clauses()?;
        self.expect_rparen("after generator expression")?;
        Ok(Expr::Comprehension {
            kind: ComprehensionKind::Generator,
            element: Box::new(element),
            value: None,
            clauses,
            location,
        })
    }

    pub(crate) fn starts_named_expression(&self) -> bool {
        self.check_identifier()
            && matches!(
                self.peek_ahead(1),
                Some(Token::Operator(Operator::Walrus, _))
            )
    }

    /// `[` `]` | `[` elements `]` | `[` element `for` ... `]`.
    fn parse_list_or_comprehension(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        self.advance(); // [
        if self.check_rbracket() {
            self.advance();
            return Ok(Expr::Collection {
                kind: CollectionKind::List,
                elements: Vec::new(),
                location,
            });
        }
        let first = self.parse_star_named_expression()?;
        if self.at_comprehension_for() {
            let clauses = self.parse_for_if_clauses()?;
            self.expect_rbracket("after list comprehension")?;
            return Ok(Expr::Comprehension {
                kind: ComprehensionKind::List,
                element: Box::new(first),
                value: None,
                clauses,
                location,
            });
        }
        let mut elements = vec![first];
        while self.match_comma() {
            if self.check_rbracket() {
                break;
            }
            elements.push(self.parse_star_named_expression()?);
        }
        self.expect_rbracket("after list display")?;
        Ok(Expr::Collection {
            kind: CollectionKind::List,
            elements,
            location,
        })
    }

    fn at_comprehension_for(&self) -> bool {
        self.check_keyword(Keyword::For)
            || (self.check_keyword(Keyword::Async)
                && matches!(self.peek_ahead(1), Some(Token::Keyword(Keyword::For, _))))
    }

    /// `{` dict | set | dict comprehension | set comprehension `}`, tried
    /// in that order.
    fn parse_braces(&mut self) -> Result<Expr, ParseError> {
        if let Some(dict) = self.attempt(|p| p.parse_dict_display())? {
            return Ok(dict);
        }
        if let Some(set) = self.attempt(|p| p.parse_set_display())? {
            return Ok(set);
        }
        if let Some(comp) = self.attempt(|p| p.parse_dict_comprehension())? {
            return Ok(comp);
        }
        if let Some(comp) = self.attempt(|p| p.parse_set_comprehension())? {
            return Ok(comp);
        }
        Err(self.expected("a dictionary, set, or comprehension", "after '{'"))
    }

    fn parse_dict_display(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        if !self.match_lbrace() {
            return Err(self.expected("'{'", "to open a dictionary"));
        }
        if self.check_rbrace() {
            self.advance();
            // {} is the empty dictionary, never the empty set.
            return Ok(Expr::Dict {
                entries: Vec::new(),
                location,
            });
        }
        let mut entries = vec![self.parse_dict_entry()?];
        while self.match_comma() {
            if self.check_rbrace() {
                break;
            }
            entries.push(self.parse_dict_entry()?);
        }
        self.expect_rbrace("after dictionary display")?;
        Ok(Expr::Dict { entries, location })
    }

    fn parse_dict_entry(&mut self) -> Result<DictEntry, ParseError> {
        if self.match_op(Operator::StarStar) {
            let value = self.parse_bitor()?;
            return Ok(DictEntry { key: None, value });
        }
        let key = self.parse_expression()?;
        self.expect_colon("between dictionary key and value")?;
        let value = self.parse_expression()?;
        Ok(DictEntry {
            key: Some(key),
            value,
        })
    }

    fn parse_set_display(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        if !self.match_lbrace() {
            return Err(self.expected("'{'", "to open a set"));
        }
        let mut elements = vec![self.parse_star_named_expression()?];
        while self.match_comma() {
            if self.check_rbrace() {
                break;
            }
            elements.push(self.parse_star_named_expression()?);
        }
        self.expect_rbrace("after set display")?;
        Ok(Expr::Collection {
            kind: CollectionKind::Set,
            elements,
            location,
        })
    }

    fn parse_dict_comprehension(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        if !self.match_lbrace() {
            return Err(self.expected("'{'", "to open a dict comprehension"));
        }
        let key = self.parse_expression()?;
        self.expect_colon("between key and value")?;
        let value = self.parse_expression()?;
        let clauses = self.parse_for_if_clauses()?;
        self.expect_rbrace("after dict comprehension")?;
        Ok(Expr::Comprehension {
            kind: ComprehensionKind::Dict,
            element: Box::new(key),
            value: Some(Box::new(value)),
            clauses,
            location,
        })
    }

    fn parse_set_comprehension(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        if !self.match_lbrace() {
            return Err(self.expected("'{'", "to open a set comprehension"));
        }
        let element = self.parse_star_named_expression()?;
        let clauses = self.parse_for_if_clauses()?;
        self.expect_rbrace("after set comprehension")?;
        Ok(Expr::Comprehension {
            kind: ComprehensionKind::Set,
            element: Box::new(element),
            value: None,
            clauses,
            location,
        })
    }

    /// One or more `for`/`if` clauses; the first must be a `for`.
    fn parse_for_if_clauses(&mut self) -> Result<Vec<ComprehensionClause>, ParseError> {
        let mut clauses = vec![self.parse_comprehension_for()?];
        loop {
            if self.at_comprehension_for() {
                clauses.push(self.parse_comprehension_for()?);
            } else if self.match_keyword(Keyword::If) {
                let condition = self.parse_disjunction()?;
                clauses.push(ComprehensionClause::If { condition });
            } else {
                break;
            }
        }
        Ok(clauses)
    }

    fn parse_comprehension_for(&mut self) -> Result<ComprehensionClause, ParseError> {
        let is_async = if self.check_keyword(Keyword::Async) {
            self.advance();
            true
        } else {
            false
        };
        self.expect_keyword(Keyword::For, "to begin comprehension clause")?;
        let location = self.current_location();
        let mut targets = self.parse_star_targets()?;
        let target = if targets.len() == 1 {
            match targets.pop() {
                Some(single) => single,
                None => return Err(self.expected("a target", "in comprehension clause")),
            }
        } else {
            Expr::Collection {
                kind: CollectionKind::Tuple,
                elements: targets,
                location,
            }
        };
        self.expect_keyword(Keyword::In, "after comprehension target")?;
        let iter = self.parse_disjunction()?;
        Ok(ComprehensionClause::For {
            target,
            iter,
            is_async,
        })
    }

    /// Subscript contents: a lone index or slice, or a comma-separated
    /// slice list.
    fn parse_slices(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        let first = self.parse_slice()?;
        if !self.check_comma() {
            return Ok(first);
        }
        let mut elements = vec![first];
        while self.match_comma() {
            if self.check_rbracket() {
                break;
            }
            elements.push(self.parse_slice()?);
        }
        Ok(Expr::Collection {
            kind: CollectionKind::Slices,
            elements,
            location,
        })
    }

    /// `[lower] ':' [upper] [':' [step]]`, or a plain index expression.
    fn parse_slice(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        if self.starts_named_expression() {
            return self.parse_named_expression();
        }
        let lower = if self.check_colon() {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        if !self.match_colon() {
            return match lower {
                Some(index) => Ok(*index),
                None => Err(self.expected("a subscript", "inside '[]'")),
            };
        }
        let upper = if self.at_slice_boundary() {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        let step = if self.match_colon() {
            if self.at_slice_boundary() {
                None
            } else {
                Some(Box::new(self.parse_expression()?))
            }
        } else {
            None
        };
        Ok(Expr::Slice {
            lower,
            upper,
            step,
            location,
        })
    }

    fn at_slice_boundary(&self) -> bool {
        self.check_colon() || self.check_comma() || self.check_rbracket()
    }

    /// Call arguments after the opening parenthesis; consumes the `)`.
    /// Positional, keyword, `*iterable`, and `**mapping` arguments may
    /// appear in any order; keyword-before-positional checks belong to a
    /// later phase.
    pub(crate) fn parse_call_arguments(&mut self) -> Result<Vec<Argument>, ParseError> {
        let mut args = Vec::new();
        if self.check_rparen() {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_call_argument()?);
            if !self.match_comma() {
                break;
            }
            if self.check_rparen() {
                break;
            }
        }
        self.expect_rparen("after call arguments")?;
        Ok(args)
    }

    fn parse_call_argument(&mut self) -> Result<Argument, ParseError> {
        if self.match_op(Operator::Star) {
            let value = self.parse_expression()?;
            return Ok(Argument {
                name: None,
                value,
                unpack_iterable: true,
                unpack_mapping: false,
            });
        }
        if self.match_op(Operator::StarStar) {
            let value = self.parse_expression()?;
            return Ok(Argument {
                name: None,
                value,
                unpack_iterable: false,
                unpack_mapping: true,
            });
        }
        if self.check_identifier() {
            if let Some(Token::Operator(Operator::Eq, _)) = self.peek_ahead(1) {
                let name = self.expect_identifier("for keyword argument")?;
                self.advance(); // =
                let value = self.parse_expression()?;
                return Ok(Argument {
                    name: Some(name),
                    value,
                    unpack_iterable: false,
                    unpack_mapping: false,
                });
            }
            if self.starts_named_expression() {
                let value = self.parse_named_expression()?;
                return Ok(Argument::positional(value));
            }
        }
        Ok(Argument::positional(self.parse_expression()?))
    }

    /// `yield`, `yield expr, ...`, or `yield from expr`.
    pub(crate) fn parse_yield_expression(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        self.expect_keyword(Keyword::Yield, "to begin yield expression")?;
        if self.match_keyword(Keyword::From) {
            let value = Box::new(self.parse_expression()?);
            return Ok(Expr::YieldFrom { value, location });
        }
        if self.at_statement_end() || self.check_rparen() {
            return Ok(Expr::Yield {
                value: None,
                location,
            });
        }
        let value = Box::new(self.parse_star_expressions()?);
        Ok(Expr::Yield {
            value: Some(value),
            location,
        })
    }

    /// Comma-separated assignment targets, as on the left of `=` or
    /// between `for` and `in`.
    pub(crate) fn parse_star_targets(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut targets = vec![self.parse_star_target()?];
        while self.match_comma() {
            if !self.starts_expression() {
                break;
            }
            targets.push(self.parse_star_target()?);
        }
        Ok(targets)
    }

    pub(crate) fn parse_star_target(&mut self) -> Result<Expr, ParseError> {
        if self.check_op(Operator::Star) {
            let location = self.current_location();
            self.advance();
            if self.check_op(Operator::StarStar) {
                return Err(self.expected("a target", "after '*'"));
            }
            let value = Box::new(self.parse_star_target()?);
            return Ok(Expr::Starred { value, location });
        }
        self.parse_target_with_star_atom()
    }

    fn parse_target_with_star_atom(&mut self) -> Result<Expr, ParseError> {
        if let Some(target) = self.attempt(|p| p.parse_primary_target())? {
            return Ok(target);
        }
        self.parse_star_atom()
    }

    /// Parse a full primary and keep it only if the outermost node is an
    /// attribute or subscript, the two trailer shapes that can be assigned
    /// to. A trailing call makes the whole chain unassignable.
    pub(crate) fn parse_primary_target(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_primary()?;
        match expr {
            Expr::Attribute { .. } | Expr::Subscript { .. } => Ok(expr),
            _ => Err(self.expected("an attribute or subscript target", "here")),
        }
    }

    fn parse_star_atom(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        if self.check_identifier() {
            let id = self.expect_identifier("as assignment target")?;
            return Ok(Expr::Name { id, location });
        }
        if self.match_lparen() {
            if self.check_rparen() {
                self.advance();
                return Ok(Expr::Collection {
                    kind: CollectionKind::Tuple,
                    elements: Vec::new(),
                    location,
                });
            }
            let mut elements = vec![self.parse_star_target()?];
            let mut is_tuple = false;
            while self.match_comma() {
                is_tuple = true;
                if self.check_rparen() {
                    break;
                }
                elements.push(self.parse_star_target()?);
            }
            self.expect_rparen("after target list")?;
            if !is_tuple {
                if let Some(single) = elements.pop() {
                    return Ok(single);
                }
            }
            return Ok(Expr::Collection {
                kind: CollectionKind::Tuple,
                elements,
                location,
            });
        }
        if self.match_lbracket() {
            if self.check_rbracket() {
                self.advance();
                return Ok(Expr::Collection {
                    kind: CollectionKind::List,
                    elements: Vec::new(),
                    location,
                });
            }
            let mut elements = vec![self.parse_star_target()?];
            while self.match_comma() {
                if self.check_rbracket() {
                    break;
                }
                elements.push(self.parse_star_target()?);
            }
            self.expect_rbracket("after target list")?;
            return Ok(Expr::Collection {
                kind: CollectionKind::List,
                elements,
                location,
            });
        }
        Err(self.expected("an assignment target", "here"))
    }

    /// A single unparenthesized-or-parenthesized target, as used by
    /// augmented and annotated assignments.
    pub(crate) fn parse_single_target(&mut self) -> Result<Expr, ParseError> {
        if let Some(target) = self.attempt(|p| p.parse_primary_target())? {
            return Ok(target);
        }
        let location = self.current_location();
        if self.check_identifier() {
            let id = self.expect_identifier("as assignment target")?;
            return Ok(Expr::Name { id, location });
        }
        if self.match_lparen() {
            let target = self.parse_single_target()?;
            self.expect_rparen("after target")?;
            return Ok(target);
        }
        Err(self.expected("an assignment target", "here"))
    }

    /// Targets of a `del` statement.
    pub(crate) fn parse_del_targets(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut targets = vec![self.parse_target_with_star_atom()?];
        while self.match_comma() {
            if !self.starts_expression() {
                break;
            }
            targets.push(self.parse_target_with_star_atom()?);
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr(source: &str) -> Expr {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_eval().unwrap()
    }

    #[test]
    fn test_empty_displays() {
        assert!(matches!(
            parse_expr("()"),
            Expr::Collection {
                kind: CollectionKind::Tuple,
                ref elements,
                ..
            } if elements.is_empty()
        ));
        assert!(matches!(
            parse_expr("[]"),
            Expr::Collection {
                kind: CollectionKind::List,
                ref elements,
                ..
            } if elements.is_empty()
        ));
        assert!(matches!(
            parse_expr("{}"),
            Expr::Dict { ref entries, .. } if entries.is_empty()
        ));
    }

    #[test]
    fn test_parenthesized_group_is_not_a_tuple() {
        assert!(matches!(parse_expr("(1)"), Expr::Constant { .. }));
        assert!(matches!(
            parse_expr("(1,)"),
            Expr::Collection {
                kind: CollectionKind::Tuple,
                ref elements,
                ..
            } if elements.len() == 1
        ));
    }

    #[test]
    fn test_tuple_trailing_comma() {
        assert!(matches!(
            parse_expr("(1, 2, 3,)"),
            Expr::Collection {
                kind: CollectionKind::Tuple,
                ref elements,
                ..
            } if elements.len() == 3
        ));
    }

    #[test]
    fn test_attribute_and_subscript_chain() {
        let expr = parse_expr("a.b[0].c");
        let Expr::Attribute { value, attr, .. } = expr else {
            panic!("expected attribute");
        };
        assert_eq!(attr, "c");
        assert!(matches!(*value, Expr::Subscript { .. }));
    }

    #[test]
    fn test_call_with_keyword_and_mapping_unpack() {
        let expr = parse_expr("f(1, x=2, *rest, **extra)");
        let Expr::Call { args, .. } = expr else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 4);
        assert!(args[0].name.is_none());
        assert_eq!(args[1].name.as_deref(), Some("x"));
        assert!(args[2].unpack_iterable);
        assert!(args[3].unpack_mapping);
    }

    #[test]
    fn test_genexp_call_keeps_callee() {
        let expr = parse_expr("sum(x * x for x in values)");
        let Expr::Call { callee, args, .. } = expr else {
            panic!("expected call");
        };
        assert!(matches!(*callee, Expr::Name { ref id, .. } if id == "sum"));
        assert_eq!(args.len(), 1);
        assert!(matches!(
            args[0].value,
            Expr::Comprehension {
                kind: ComprehensionKind::Generator,
                ..
            }
        ));
    }

    #[test]
    fn test_brace_disambiguation() {
        assert!(matches!(parse_expr("{1: 2}"), Expr::Dict { .. }));
        assert!(matches!(
            parse_expr("{1, 2}"),
            Expr::Collection {
                kind: CollectionKind::Set,
                ..
            }
        ));
        assert!(matches!(
            parse_expr("{k: v for k, v in items}"),
            Expr::Comprehension {
                kind: ComprehensionKind::Dict,
                value: Some(_),
                ..
            }
        ));
        assert!(matches!(
            parse_expr("{x for x in items}"),
            Expr::Comprehension {
                kind: ComprehensionKind::Set,
                value: None,
                ..
            }
        ));
    }

    #[test]
    fn test_dict_mapping_unpack_entry() {
        let expr = parse_expr("{1: 2, **defaults}");
        let Expr::Dict { entries, .. } = expr else {
            panic!("expected dict");
        };
        assert_eq!(entries.len(), 2);
        assert!(entries[0].key.is_some());
        assert!(entries[1].key.is_none());
    }

    #[test]
    fn test_list_comprehension_with_condition() {
        let expr = parse_expr("[x for x in xs if x > 0 if x < 10]");
        let Expr::Comprehension { kind, clauses, .. } = expr else {
            panic!("expected comprehension");
        };
        assert!(matches!(kind, ComprehensionKind::List));
        assert_eq!(clauses.len(), 3);
        assert!(matches!(clauses[0], ComprehensionClause::For { .. }));
        assert!(matches!(clauses[1], ComprehensionClause::If { .. }));
        assert!(matches!(clauses[2], ComprehensionClause::If { .. }));
    }

    #[test]
    fn test_async_comprehension_clause() {
        let expr = parse_expr("[x async for x in aiter]");
        let Expr::Comprehension { clauses, .. } = expr else {
            panic!("expected comprehension");
        };
        assert!(matches!(
            clauses[0],
            ComprehensionClause::For { is_async: true, .. }
        ));
    }

    #[test]
    fn test_plain_index_stays_unwrapped() {
        let expr = parse_expr("a[0]");
        let Expr::Subscript { index, .. } = expr else {
            panic!("expected subscript");
        };
        assert!(matches!(*index, Expr::Constant { .. }));
    }

    #[test]
    fn test_slice_forms() {
        let expr = parse_expr("a[1:10:2]");
        let Expr::Subscript { index, .. } = expr else {
            panic!("expected subscript");
        };
        assert!(matches!(
            *index,
            Expr::Slice {
                lower: Some(_),
                upper: Some(_),
                step: Some(_),
                ..
            }
        ));

        let expr = parse_expr("a[::]");
        let Expr::Subscript { index, .. } = expr else {
            panic!("expected subscript");
        };
        assert!(matches!(
            *index,
            Expr::Slice {
                lower: None,
                upper: None,
                step: None,
                ..
            }
        ));
    }

    #[test]
    fn test_slice_list_wraps() {
        let expr = parse_expr("grid[1:2, 3]");
        let Expr::Subscript { index, .. } = expr else {
            panic!("expected subscript");
        };
        let Expr::Collection { kind, elements, .. } = *index else {
            panic!("expected slice list");
        };
        assert!(matches!(kind, CollectionKind::Slices));
        assert_eq!(elements.len(), 2);
        assert!(matches!(elements[0], Expr::Slice { .. }));
        assert!(matches!(elements[1], Expr::Constant { .. }));
    }

    #[test]
    fn test_literal_prefixes() {
        assert!(matches!(
            parse_expr("b'raw'"),
            Expr::Constant {
                kind: ConstantKind::Bytes,
                ..
            }
        ));
        assert!(matches!(
            parse_expr("f\"{x}\""),
            Expr::Constant {
                kind: ConstantKind::FormatStr,
                ..
            }
        ));
        assert!(matches!(
            parse_expr("2.5j"),
            Expr::Constant {
                kind: ConstantKind::Float,
                ..
            }
        ));
        assert!(matches!(
            parse_expr("42"),
            Expr::Constant {
                kind: ConstantKind::Int,
                ..
            }
        ));
    }

    #[test]
    fn test_yield_forms() {
        let mut parser = Parser::new("(yield)").unwrap();
        assert!(matches!(
            parser.parse_eval().unwrap(),
            Expr::Yield { value: None, .. }
        ));

        let mut parser = Parser::new("(yield from gen())").unwrap();
        assert!(matches!(
            parser.parse_eval().unwrap(),
            Expr::YieldFrom { .. }
        ));
    }
}
