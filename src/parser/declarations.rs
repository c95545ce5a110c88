//! Declaration and compound-statement parsing
//!
//! This module handles every statement that owns an indented block:
//!
//! - Function and class definitions, with decorators and `async`
//! - Conditional chains: `if`/`elif`/`else` and `while`/`else`
//! - Loops and resource blocks: `for`/`else`, `with`
//! - Exception handling: `try`/`except`/`else`/`finally`
//! - Structural pattern matching: `match`/`case`
//! - Parameter lists (shared with `lambda`)
//!
//! # Grammar
//!
//! ```text
//! block      ::= ':' NEWLINE INDENT statement+ DEDENT
//!              | ':' simple_stmt (';' simple_stmt)* NEWLINE
//! decorators ::= ('@' named_expression NEWLINE)+
//! parameters ::= [slash_section] param* [star_section] ['**' param]
//! ```
//!
//! `elif`/`else` arms are not nested trees; each conditional block links
//! forward to the next arm through its `chained` field.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::tokens::{Keyword, Operator};

impl Parser {
    /// Parse a compound statement, dispatching on its opening keyword.
    pub(crate) fn parse_compound_statement(&mut self) -> Result<Stmt, ParseError> {
        if self.check_at() {
            return self.parse_decorated();
        }
        let location = self.current_location();
        if self.check_keyword(Keyword::Async) {
            return self.parse_async_statement();
        }
        if self.match_keyword(Keyword::Def) {
            return self.parse_function_definition(Vec::new(), false, location);
        }
        if self.match_keyword(Keyword::Class) {
            return self.parse_class_definition(Vec::new(), location);
        }
        if self.check_keyword(Keyword::If) || self.check_keyword(Keyword::While) {
            let block = self.parse_conditional_chain()?;
            return Ok(Stmt::Conditional(block));
        }
        if self.match_keyword(Keyword::For) {
            return self.parse_for_statement(false, location);
        }
        if self.match_keyword(Keyword::With) {
            return self.parse_with_statement(false, location);
        }
        if self.match_keyword(Keyword::Try) {
            return self.parse_try_statement(location);
        }
        if self.match_keyword(Keyword::Match) {
            return self.parse_match_statement(location);
        }
        Err(self.expected("a statement", "here"))
    }

    /// async def / async for / async with
    fn parse_async_statement(&mut self) -> Result<Stmt, ParseError> {
        let location = self.current_location();
        self.advance(); // async
        if self.match_keyword(Keyword::Def) {
            return self.parse_function_definition(Vec::new(), true, location);
        }
        if self.match_keyword(Keyword::For) {
            return self.parse_for_statement(true, location);
        }
        if self.match_keyword(Keyword::With) {
            return self.parse_with_statement(true, location);
        }
        Err(self.expected("'def', 'for', or 'with'", "after 'async'"))
    }

    /// ('@' named_expression NEWLINE)+ followed by the decorated
    /// definition. The decorator list is collected once and handed to
    /// whichever definition follows.
    fn parse_decorated(&mut self) -> Result<Stmt, ParseError> {
        let mut decorators = Vec::new();
        while self.check_at() {
            self.advance();
            decorators.push(self.parse_named_expression()?);
            if !self.match_newline() {
                return Err(self.expected("end of line", "after decorator"));
            }
            self.skip_newlines();
        }
        let location = self.current_location();
        let is_async = if self.check_keyword(Keyword::Async)
            && matches!(self.peek_ahead(1), Some(Token::Keyword(Keyword::Def, _)))
        {
            self.advance();
            true
        } else {
            false
        };
        if self.match_keyword(Keyword::Def) {
            return self.parse_function_definition(decorators, is_async, location);
        }
        if self.match_keyword(Keyword::Class) {
            return self.parse_class_definition(decorators, location);
        }
        Err(self.expected("a function or class definition", "after decorators"))
    }

    /// def NAME '(' [parameters] ')' ['->' expression] block
    fn parse_function_definition(
        &mut self,
        decorators: Vec<Expr>,
        is_async: bool,
        location: SourceLocation,
    ) -> Result<Stmt, ParseError> {
        let name = self.expect_identifier("after 'def'")?;
        if !self.match_lparen() {
            return Err(self.expected("'('", "after function name"));
        }
        let params = if self.check_rparen() {
            Vec::new()
        } else {
            self.parse_parameters(false)?
        };
        self.expect_rparen("after parameters")?;
        let return_annotation = if self.match_arrow() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(Stmt::FunctionDef {
            name,
            params,
            return_annotation,
            body,
            decorators,
            is_async,
            location,
        })
    }

    /// class NAME ['(' [arguments] ')'] block
    fn parse_class_definition(
        &mut self,
        decorators: Vec<Expr>,
        location: SourceLocation,
    ) -> Result<Stmt, ParseError> {
        let name = self.expect_identifier("after 'class'")?;
        let arguments = if self.match_lparen() {
            self.parse_call_arguments()?
        } else {
            Vec::new()
        };
        let body = self.parse_block()?;
        Ok(Stmt::ClassDef {
            name,
            arguments,
            body,
            decorators,
            location,
        })
    }

    /// The head of an `if` or `while` chain. Later arms hang off the
    /// first block through `chained` links rather than nesting.
    fn parse_conditional_chain(&mut self) -> Result<ConditionalBlock, ParseError> {
        let location = self.current_location();
        let kind = if self.match_keyword(Keyword::If) {
            ConditionalKind::If
        } else if self.match_keyword(Keyword::While) {
            ConditionalKind::While
        } else {
            return Err(self.expected("'if' or 'while'", "here"));
        };
        let condition = self.parse_named_expression()?;
        let body = self.parse_block()?;
        let allow_elif = matches!(kind, ConditionalKind::If);
        let chained = self.parse_conditional_tail(allow_elif)?;
        Ok(ConditionalBlock {
            kind,
            condition: Some(condition),
            body,
            chained: chained.map(Box::new),
            location,
        })
    }

    fn parse_conditional_tail(
        &mut self,
        allow_elif: bool,
    ) -> Result<Option<ConditionalBlock>, ParseError> {
        if allow_elif && self.match_keyword(Keyword::Elif) {
            let location = self.previous_location();
            let condition = self.parse_named_expression()?;
            let body = self.parse_block()?;
            let chained = self.parse_conditional_tail(true)?;
            return Ok(Some(ConditionalBlock {
                kind: ConditionalKind::Elif,
                condition: Some(condition),
                body,
                chained: chained.map(Box::new),
                location,
            }));
        }
        if self.match_keyword(Keyword::Else) {
            let location = self.previous_location();
            let body = self.parse_block()?;
            return Ok(Some(ConditionalBlock {
                kind: ConditionalKind::Else,
                condition: None,
                body,
                chained: None,
                location,
            }));
        }
        Ok(None)
    }

    /// for star_targets 'in' star_expressions block ['else' block]
    fn parse_for_statement(
        &mut self,
        is_async: bool,
        location: SourceLocation,
    ) -> Result<Stmt, ParseError> {
        let targets = self.parse_star_targets()?;
        self.expect_keyword(Keyword::In, "after loop targets")?;
        let iter = self.parse_star_expressions()?;
        let body = self.parse_block()?;
        let else_body = if self.match_keyword(Keyword::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::For {
            targets,
            iter,
            body,
            else_body,
            is_async,
            location,
        })
    }

    /// with [(] item (',' item)* [)] block, item ::= expression ['as' target]
    fn parse_with_statement(
        &mut self,
        is_async: bool,
        location: SourceLocation,
    ) -> Result<Stmt, ParseError> {
        let mut items = Vec::new();
        if self.check_lparen() {
            if let Some(parsed) = self.attempt(|p| p.parse_parenthesized_with_items())? {
                items = parsed;
            }
        }
        if items.is_empty() {
            items.push(self.parse_with_item()?);
            while self.match_comma() {
                items.push(self.parse_with_item()?);
            }
        }
        let body = self.parse_block()?;
        Ok(Stmt::With {
            items,
            body,
            is_async,
            location,
        })
    }

    /// The 3.10 parenthesized context-manager list. Only kept when the
    /// closing parenthesis is directly followed by the block colon;
    /// otherwise the parenthesis belongs to an ordinary expression.
    fn parse_parenthesized_with_items(&mut self) -> Result<Vec<WithItem>, ParseError> {
        if !self.match_lparen() {
            return Err(self.expected("'('", "before context managers"));
        }
        let mut items = vec![self.parse_with_item()?];
        while self.match_comma() {
            if self.check_rparen() {
                break;
            }
            items.push(self.parse_with_item()?);
        }
        self.expect_rparen("after context managers")?;
        if !self.check_colon() {
            return Err(self.expected("':'", "after context managers"));
        }
        Ok(items)
    }

    fn parse_with_item(&mut self) -> Result<WithItem, ParseError> {
        let context = self.parse_expression()?;
        let alias = if self.match_keyword(Keyword::As) {
            Some(self.parse_star_target()?)
        } else {
            None
        };
        Ok(WithItem { context, alias })
    }

    /// try block except-clauses ['else' block] ['finally' block]
    fn parse_try_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let body = self.parse_block()?;
        let mut handlers = Vec::new();
        while self.check_keyword(Keyword::Except) {
            let handler_location = self.current_location();
            self.advance();
            let exception = if self.check_colon() {
                None
            } else {
                Some(self.parse_expression()?)
            };
            let alias = if self.match_keyword(Keyword::As) {
                Some(self.expect_identifier("after 'as'")?)
            } else {
                None
            };
            let handler_body = self.parse_block()?;
            handlers.push(ExceptHandler {
                exception,
                alias,
                body: handler_body,
                location: handler_location,
            });
        }
        let else_body = if self.match_keyword(Keyword::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        let final_body = if self.match_keyword(Keyword::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handlers.is_empty() && final_body.is_none() {
            return Err(self.expected("'except' or 'finally'", "after try block"));
        }
        Ok(Stmt::Try {
            body,
            handlers,
            else_body,
            final_body,
            location,
        })
    }

    /// match subject ':' NEWLINE INDENT case-arm+ DEDENT
    fn parse_match_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let subject = self.parse_star_expressions()?;
        self.expect_colon("after match subject")?;
        if !self.match_newline() {
            return Err(self.expected("end of line", "after match subject"));
        }
        self.skip_newlines();
        if !self.check_indent() {
            return Err(self.expected("an indented block", "in match statement"));
        }
        self.advance();
        let mut arms = vec![self.parse_case_arm()?];
        loop {
            self.skip_newlines();
            if self.check_dedent() {
                self.advance();
                break;
            }
            if self.is_at_end() {
                break;
            }
            arms.push(self.parse_case_arm()?);
        }
        Ok(Stmt::Match {
            subject,
            arms,
            location,
        })
    }

    /// case patterns ['if' named_expression] block
    fn parse_case_arm(&mut self) -> Result<CaseArm, ParseError> {
        let location = self.current_location();
        self.expect_keyword(Keyword::Case, "to begin match arm")?;
        let pattern = self.parse_patterns()?;
        let guard = if self.match_keyword(Keyword::If) {
            Some(self.parse_named_expression()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(CaseArm {
            pattern,
            guard,
            body,
            location,
        })
    }

    /// The suite that follows a block-opening colon: either an indented
    /// block on the following lines, or simple statements inline on the
    /// same line.
    pub(crate) fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect_colon("before block")?;
        if self.match_newline() {
            self.skip_newlines();
            if !self.check_indent() {
                return Err(self.expected("an indented block", "after ':'"));
            }
            self.advance();
            let mut statements = Vec::new();
            loop {
                self.skip_newlines();
                if self.check_dedent() {
                    self.advance();
                    break;
                }
                if self.is_at_end() {
                    break;
                }
                statements.extend(self.parse_statement_line()?);
            }
            if statements.is_empty() {
                return Err(self.expected("a statement", "in block"));
            }
            return Ok(statements);
        }
        // Inline suite: only simple statements may share the colon's line.
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

    /// Parse a parameter list up to, but not including, the closing
    /// delimiter. Positional-only sections (ending in `/`), the `*`
    /// collector or bare `*` boundary, keyword-only parameters, and the
    /// `**` collector all land in one flat list with flags set.
    pub(crate) fn parse_parameters(&mut self, in_lambda: bool) -> Result<Vec<Parameter>, ParseError> {
        let mut params = Vec::new();

        // positional-only head, without then with defaults
        if let Some(mut head) = self.attempt(|p| p.parse_slash_section(in_lambda, false))? {
            params.append(&mut head);
        } else if let Some(mut head) = self.attempt(|p| p.parse_slash_section(in_lambda, true))? {
            params.append(&mut head);
        }

        while self.check_identifier() {
            params.push(self.parse_parameter(in_lambda)?);
            if !self.match_comma() {
                return Ok(params);
            }
        }
        self.parse_star_parameters(in_lambda, &mut params)?;
        Ok(params)
    }

    /// param (',' param)* ',' '/' — the positional-only head. In the
    /// strict variant no parameter may carry a default.
    fn parse_slash_section(
        &mut self,
        in_lambda: bool,
        with_defaults: bool,
    ) -> Result<Vec<Parameter>, ParseError> {
        let mut params = Vec::new();
        loop {
            if self.check_op(Operator::Slash) {
                break;
            }
            if !self.check_identifier() {
                return Err(self.expected("a parameter name", "before '/'"));
            }
            let param = self.parse_parameter(in_lambda)?;
            if !with_defaults && param.default.is_some() {
                return Err(self.expected("a parameter without a default", "before '/'"));
            }
            params.push(param);
            if !self.match_comma() {
                break;
            }
        }
        if params.is_empty() || !self.match_op(Operator::Slash) {
            return Err(self.expected("'/'", "after positional-only parameters"));
        }
        if !self.match_comma() && !self.at_parameter_list_end(in_lambda) {
            return Err(self.expected("','", "after '/'"));
        }
        for param in &mut params {
            param.positional_only = true;
        }
        Ok(params)
    }

    fn at_parameter_list_end(&self, in_lambda: bool) -> bool {
        if in_lambda {
            self.check_colon()
        } else {
            self.check_rparen()
        }
    }

    /// NAME [':' annotation] ['=' default]; lambdas take no annotations.
    fn parse_parameter(&mut self, in_lambda: bool) -> Result<Parameter, ParseError> {
        let location = self.current_location();
        let name = self.expect_identifier("as parameter name")?;
        let mut param = Parameter::new(name, location);
        if !in_lambda && self.check_colon() {
            self.advance();
            param.annotation = Some(self.parse_expression()?);
        }
        if self.match_op(Operator::Eq) {
            param.default = Some(self.parse_expression()?);
        }
        Ok(param)
    }

    /// The tail of a parameter list: `*collector` or a bare `*` boundary,
    /// the keyword-only parameters after it, and the `**` collector.
    fn parse_star_parameters(
        &mut self,
        in_lambda: bool,
        params: &mut Vec<Parameter>,
    ) -> Result<(), ParseError> {
        if self.check_op(Operator::Star) {
            self.advance();
            if self.check_identifier() {
                let mut collector = self.parse_parameter(in_lambda)?;
                collector.star = true;
                params.push(collector);
            }
            // A bare star only marks where keyword-only parameters begin.
            while self.match_comma() {
                if self.check_op(Operator::StarStar) {
                    break;
                }
                if !self.check_identifier() {
                    break;
                }
                let mut param = self.parse_parameter(in_lambda)?;
                param.keyword_only = true;
                params.push(param);
            }
        }
        if self.check_op(Operator::StarStar) {
            self.advance();
            let mut collector = self.parse_parameter(in_lambda)?;
            collector.double_star = true;
            params.push(collector);
            self.match_comma();
        }
        Ok(())
    }

    /// lambda [parameters] ':' expression
    pub(crate) fn parse_lambda(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        self.expect_keyword(Keyword::Lambda, "to begin lambda")?;
        let params = if self.check_colon() {
            Vec::new()
        } else {
            self.parse_parameters(true)?
        };
        self.expect_colon("before lambda body")?;
        let body = Box::new(self.parse_expression()?);
        Ok(Expr::Lambda {
            params,
            body,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<Stmt> {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_module().unwrap().body
    }

    #[test]
    fn test_if_elif_else_chain() {
        let body = parse("if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3\n");
        assert_eq!(body.len(), 1);
        let Stmt::Conditional(block) = &body[0] else {
            panic!("expected conditional");
        };
        assert!(matches!(block.kind, ConditionalKind::If));
        assert!(block.condition.is_some());
        assert_eq!(block.body.len(), 1);
        let elif = block.chained.as_ref().unwrap();
        assert!(matches!(elif.kind, ConditionalKind::Elif));
        let else_arm = elif.chained.as_ref().unwrap();
        assert!(matches!(else_arm.kind, ConditionalKind::Else));
        assert!(else_arm.condition.is_none());
        assert!(else_arm.chained.is_none());
    }

    #[test]
    fn test_while_with_else() {
        let body = parse("while x > 0:\n    x -= 1\nelse:\n    done = True\n");
        let Stmt::Conditional(block) = &body[0] else {
            panic!("expected conditional");
        };
        assert!(matches!(block.kind, ConditionalKind::While));
        let tail = block.chained.as_ref().unwrap();
        assert!(matches!(tail.kind, ConditionalKind::Else));
    }

    #[test]
    fn test_function_with_parameter_sections() {
        let body = parse("def f(a, b=1, /, c: int = 2, *args, d, e=3, **kwargs):\n    pass\n");
        let Stmt::FunctionDef { params, .. } = &body[0] else {
            panic!("expected function");
        };
        assert_eq!(params.len(), 7);
        assert!(params[0].positional_only);
        assert!(params[1].positional_only);
        assert!(params[1].default.is_some());
        assert!(!params[2].positional_only);
        assert!(params[2].annotation.is_some());
        assert!(params[3].star);
        assert!(params[4].keyword_only);
        assert!(params[5].keyword_only);
        assert!(params[6].double_star);
    }

    #[test]
    fn test_bare_star_keyword_only_boundary() {
        let body = parse("def f(a, *, b):\n    pass\n");
        let Stmt::FunctionDef { params, .. } = &body[0] else {
            panic!("expected function");
        };
        assert_eq!(params.len(), 2);
        assert!(!params[0].keyword_only);
        assert!(params[1].keyword_only);
        assert!(!params[1].star);
    }

    #[test]
    fn test_annotated_default_after_strict_slash() {
        let body = parse("def g(a, /, b: int = 1):\n    pass\n");
        let Stmt::FunctionDef { params, .. } = &body[0] else {
            panic!("expected function");
        };
        assert_eq!(params.len(), 2);
        assert!(params[0].positional_only);
        assert!(params[0].default.is_none());
        assert!(params[1].annotation.is_some());
        assert!(params[1].default.is_some());
    }

    #[test]
    fn test_decorated_async_function() {
        let body = parse("@cached\n@log.track(level=2)\nasync def fetch(url) -> bytes:\n    return url\n");
        let Stmt::FunctionDef {
            decorators,
            is_async,
            return_annotation,
            ..
        } = &body[0]
        else {
            panic!("expected function");
        };
        assert_eq!(decorators.len(), 2);
        assert!(matches!(decorators[0], Expr::Name { .. }));
        assert!(matches!(decorators[1], Expr::Call { .. }));
        assert!(*is_async);
        assert!(return_annotation.is_some());
    }

    #[test]
    fn test_class_definition() {
        let body = parse("@register\nclass Point(Base, metaclass=Meta):\n    x = 0\n");
        let Stmt::ClassDef {
            name,
            arguments,
            decorators,
            body: class_body,
            ..
        } = &body[0]
        else {
            panic!("expected class");
        };
        assert_eq!(name, "Point");
        assert_eq!(arguments.len(), 2);
        assert_eq!(arguments[1].name.as_deref(), Some("metaclass"));
        assert_eq!(decorators.len(), 1);
        assert_eq!(class_body.len(), 1);
    }

    #[test]
    fn test_for_with_else_and_tuple_targets() {
        let body = parse("for k, v in items:\n    use(k, v)\nelse:\n    done()\n");
        let Stmt::For {
            targets, else_body, ..
        } = &body[0]
        else {
            panic!("expected for");
        };
        assert_eq!(targets.len(), 2);
        assert!(else_body.is_some());
    }

    #[test]
    fn test_async_for() {
        let body = parse("async def f():\n    async for row in cursor:\n        handle(row)\n");
        let Stmt::FunctionDef { body: f_body, .. } = &body[0] else {
            panic!("expected function");
        };
        assert!(matches!(f_body[0], Stmt::For { is_async: true, .. }));
    }

    #[test]
    fn test_with_items() {
        let body = parse("with open(a) as f, open(b) as g:\n    copy(f, g)\n");
        let Stmt::With { items, .. } = &body[0] else {
            panic!("expected with");
        };
        assert_eq!(items.len(), 2);
        assert!(items[0].alias.is_some());

        let body = parse("with (open(a) as f, open(b) as g):\n    copy(f, g)\n");
        let Stmt::With { items, .. } = &body[0] else {
            panic!("expected with");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_try_except_else_finally() {
        let body = parse(
            "try:\n    risky()\nexcept ValueError as e:\n    log(e)\nexcept Exception:\n    \
             bail()\nelse:\n    ok()\nfinally:\n    close()\n",
        );
        let Stmt::Try {
            handlers,
            else_body,
            final_body,
            ..
        } = &body[0]
        else {
            panic!("expected try");
        };
        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers[0].alias.as_deref(), Some("e"));
        assert!(handlers[1].alias.is_none());
        assert!(else_body.is_some());
        assert!(final_body.is_some());
    }

    #[test]
    fn test_bare_except() {
        let body = parse("try:\n    risky()\nexcept:\n    pass\n");
        let Stmt::Try { handlers, .. } = &body[0] else {
            panic!("expected try");
        };
        assert!(handlers[0].exception.is_none());
    }

    #[test]
    fn test_try_requires_handler_or_finally() {
        let mut parser = Parser::new("try:\n    x = 1\n").unwrap();
        assert!(parser.parse_module().is_err());
    }

    #[test]
    fn test_inline_suite() {
        let body = parse("if ready: go(); cleanup()\n");
        let Stmt::Conditional(block) = &body[0] else {
            panic!("expected conditional");
        };
        assert_eq!(block.body.len(), 2);
    }

    #[test]
    fn test_nested_blocks_close_in_order() {
        let body = parse("def outer():\n    def inner():\n        return 1\n    return inner\nx = 1\n");
        assert_eq!(body.len(), 2);
        let Stmt::FunctionDef { body: outer, .. } = &body[0] else {
            panic!("expected function");
        };
        assert_eq!(outer.len(), 2);
        assert!(matches!(outer[0], Stmt::FunctionDef { .. }));
    }

    #[test]
    fn test_lambda_forms() {
        let body = parse("f = lambda: 0\ng = lambda x, *rest, scale=2: x * scale\n");
        let Stmt::Assign { value, .. } = &body[0] else {
            panic!("expected assignment");
        };
        let Expr::Lambda { params, .. } = value else {
            panic!("expected lambda");
        };
        assert!(params.is_empty());
        let Stmt::Assign { value, .. } = &body[1] else {
            panic!("expected assignment");
        };
        let Expr::Lambda { params, .. } = value else {
            panic!("expected lambda");
        };
        assert_eq!(params.len(), 3);
        assert!(params[1].star);
        assert!(params[2].default.is_some());
    }

    #[test]
    fn test_match_statement_shape() {
        let body = parse(
            "match command:\n    case 'start':\n        run()\n    case 'stop' if force:\n        \
             halt()\n    case _:\n        ignore()\n",
        );
        let Stmt::Match { arms, .. } = &body[0] else {
            panic!("expected match");
        };
        assert_eq!(arms.len(), 3);
        assert!(arms[0].guard.is_none());
        assert!(arms[1].guard.is_some());
        assert!(matches!(arms[2].pattern, Pattern::Wildcard));
    }
}
