// Integration tests for the Python parser

use pyrite::parser::ast::{
    BinOp, CollectionKind, ComprehensionKind, ConditionalKind, ConstantKind, Expr, Pattern, Stmt,
};
use pyrite::parser::lexer::{Lexer, Token};
use pyrite::parser::parse::Parser;
use pyrite::parser::tokens::Operator;

#[test]
fn test_token_kinds_for_assignment() {
    let mut lexer = Lexer::new("x = 1 + 2\n");
    let tokens = lexer.tokenize().expect("Tokenizing failed");

    assert_eq!(tokens.len(), 6);
    assert!(matches!(tokens[0], Token::Identifier(ref s, _) if s == "x"));
    assert!(matches!(tokens[1], Token::Operator(Operator::Eq, _)));
    assert!(matches!(tokens[2], Token::Number(ref s, _) if s == "1"));
    assert!(matches!(tokens[3], Token::Operator(Operator::Plus, _)));
    assert!(matches!(tokens[4], Token::Number(ref s, _) if s == "2"));
    assert!(matches!(tokens[5], Token::Newline(_)));
}

#[test]
fn test_script_with_function_and_branches() {
    let source = r#"
def add(a, b=2):
    return a + b

total = add(3)
if total > 4:
    result = "big"
else:
    result = "small"
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    assert_eq!(module.body.len(), 3);
    let Stmt::FunctionDef {
        name, params, body, ..
    } = &module.body[0]
    else {
        panic!("Expected function definition, got {:?}", module.body[0]);
    };
    assert_eq!(name, "add");
    assert_eq!(params.len(), 2);
    assert!(params[0].default.is_none());
    assert!(params[1].default.is_some());
    assert!(matches!(body[0], Stmt::Return { value: Some(_), .. }));

    assert!(matches!(module.body[1], Stmt::Assign { .. }));
    let Stmt::Conditional(block) = &module.body[2] else {
        panic!("Expected conditional, got {:?}", module.body[2]);
    };
    assert!(matches!(block.kind, ConditionalKind::If));
    let tail = block.chained.as_ref().expect("Missing else branch");
    assert!(matches!(tail.kind, ConditionalKind::Else));
}

#[test]
fn test_if_block_is_bounded_by_dedent() {
    let source = r#"
if flag:
    a = 1
    b = 2
outside = 3
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    assert_eq!(module.body.len(), 2);
    let Stmt::Conditional(block) = &module.body[0] else {
        panic!("Expected conditional, got {:?}", module.body[0]);
    };
    assert_eq!(block.body.len(), 2);
    let Stmt::Assign { targets, .. } = &module.body[1] else {
        panic!("Expected assignment after block, got {:?}", module.body[1]);
    };
    assert!(matches!(targets[0], Expr::Name { ref id, .. } if id == "outside"));
}

#[test]
fn test_dedent_closes_every_level() {
    let source = r#"
def outer():
    def inner():
        return 1
    return inner

leftover = 0
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    assert_eq!(module.body.len(), 2);
    let Stmt::FunctionDef { body, .. } = &module.body[0] else {
        panic!("Expected function definition, got {:?}", module.body[0]);
    };
    assert_eq!(body.len(), 2);
    assert!(matches!(body[0], Stmt::FunctionDef { .. }));
    assert!(matches!(body[1], Stmt::Return { .. }));
    assert!(matches!(module.body[1], Stmt::Assign { .. }));
}

#[test]
fn test_class_with_decorator_and_methods() {
    let source = r#"
@register
class Greeter(Base, metaclass=Meta):
    count = 0

    def greet(self):
        return self.name
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    let Stmt::ClassDef {
        name,
        arguments,
        body,
        decorators,
        ..
    } = &module.body[0]
    else {
        panic!("Expected class definition, got {:?}", module.body[0]);
    };
    assert_eq!(name, "Greeter");
    assert_eq!(decorators.len(), 1);
    assert_eq!(arguments.len(), 2);
    assert!(arguments[0].name.is_none());
    assert_eq!(arguments[1].name.as_deref(), Some("metaclass"));
    assert_eq!(body.len(), 2);
    assert!(matches!(body[0], Stmt::Assign { .. }));
    assert!(matches!(body[1], Stmt::FunctionDef { .. }));
}

#[test]
fn test_loop_statements() {
    let source = r#"
for i in range(3):
    if i == 1:
        break
else:
    cleanup()

while pending:
    step()
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    assert_eq!(module.body.len(), 2);
    let Stmt::For {
        targets, else_body, ..
    } = &module.body[0]
    else {
        panic!("Expected for statement, got {:?}", module.body[0]);
    };
    assert_eq!(targets.len(), 1);
    assert_eq!(else_body.as_ref().map(Vec::len), Some(1));

    let Stmt::Conditional(block) = &module.body[1] else {
        panic!("Expected while statement, got {:?}", module.body[1]);
    };
    assert!(matches!(block.kind, ConditionalKind::While));
    assert!(block.chained.is_none());
}

#[test]
fn test_try_except_else_finally() {
    let source = r#"
try:
    risky()
except ValueError as err:
    handle(err)
except Exception:
    pass
else:
    celebrate()
finally:
    close()
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    let Stmt::Try {
        body,
        handlers,
        else_body,
        final_body,
        ..
    } = &module.body[0]
    else {
        panic!("Expected try statement, got {:?}", module.body[0]);
    };
    assert_eq!(body.len(), 1);
    assert_eq!(handlers.len(), 2);
    assert!(handlers[0].exception.is_some());
    assert_eq!(handlers[0].alias.as_deref(), Some("err"));
    assert!(handlers[1].alias.is_none());
    assert!(else_body.is_some());
    assert!(final_body.is_some());
}

#[test]
fn test_with_statement_items() {
    let source = r#"
with open(path) as f, lock:
    data = f.read()
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    let Stmt::With { items, body, .. } = &module.body[0] else {
        panic!("Expected with statement, got {:?}", module.body[0]);
    };
    assert_eq!(items.len(), 2);
    assert!(matches!(items[0].context, Expr::Call { .. }));
    assert!(items[0].alias.is_some());
    assert!(items[1].alias.is_none());
    assert_eq!(body.len(), 1);
}

#[test]
fn test_match_statement_arms() {
    let source = r#"
match command:
    case "go", direction:
        move(direction)
    case Point(x=0, y=0):
        origin()
    case {"action": act, **rest} if act:
        run(act)
    case _:
        pass
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    let Stmt::Match { subject, arms, .. } = &module.body[0] else {
        panic!("Expected match statement, got {:?}", module.body[0]);
    };
    assert!(matches!(subject, Expr::Name { id, .. } if id == "command"));
    assert_eq!(arms.len(), 4);

    let Pattern::Sequence {
        kind,
        open,
        elements,
    } = &arms[0].pattern
    else {
        panic!("Expected sequence pattern, got {:?}", arms[0].pattern);
    };
    assert!(matches!(kind, CollectionKind::Tuple));
    assert!(!open);
    assert_eq!(elements.len(), 2);
    assert!(matches!(elements[1], Pattern::Capture { .. }));

    let Pattern::Class {
        path,
        positional,
        keyword,
        ..
    } = &arms[1].pattern
    else {
        panic!("Expected class pattern, got {:?}", arms[1].pattern);
    };
    assert_eq!(path, &["Point"]);
    assert!(positional.is_empty());
    assert_eq!(keyword.len(), 2);
    assert_eq!(keyword[0].0, "x");
    assert_eq!(keyword[1].0, "y");

    let Pattern::Mapping { entries, rest, .. } = &arms[2].pattern else {
        panic!("Expected mapping pattern, got {:?}", arms[2].pattern);
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(rest.as_deref(), Some("rest"));
    assert!(arms[2].guard.is_some());

    assert!(matches!(arms[3].pattern, Pattern::Wildcard));
}

#[test]
fn test_import_forms() {
    let source = r#"
import os, sys as system
from . import sibling
from ..pkg.mod import (a, b as c)
from mod import *
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    assert_eq!(module.body.len(), 4);
    let Stmt::Import { names, .. } = &module.body[0] else {
        panic!("Expected import, got {:?}", module.body[0]);
    };
    assert_eq!(names.len(), 2);
    assert_eq!(names[1].alias.as_deref(), Some("system"));

    let Stmt::ImportFrom { module: m, level, .. } = &module.body[1] else {
        panic!("Expected from-import, got {:?}", module.body[1]);
    };
    assert_eq!(*level, 1);
    assert!(m.is_empty());

    let Stmt::ImportFrom {
        module: m,
        level,
        names,
        ..
    } = &module.body[2]
    else {
        panic!("Expected from-import, got {:?}", module.body[2]);
    };
    assert_eq!(*level, 2);
    assert_eq!(m, "pkg.mod");
    assert_eq!(names.len(), 2);
    assert_eq!(names[1].alias.as_deref(), Some("c"));

    let Stmt::ImportFrom { names, .. } = &module.body[3] else {
        panic!("Expected from-import, got {:?}", module.body[3]);
    };
    assert_eq!(names[0].name, "*");
}

#[test]
fn test_comprehensions_and_empty_displays() {
    let source = r#"
squares = [x * x for x in range(10) if x % 2 == 0]
unique = {c for c in word}
index = {key: val for key, val in pairs}
stripped = (line for line in lines)
no_list = []
no_tuple = ()
no_dict = {}
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    assert_eq!(module.body.len(), 7);
    let values: Vec<&Expr> = module
        .body
        .iter()
        .map(|stmt| match stmt {
            Stmt::Assign { value, .. } => value,
            other => panic!("Expected assignment, got {:?}", other),
        })
        .collect();

    let Expr::Comprehension { kind, clauses, .. } = values[0] else {
        panic!("Expected comprehension, got {:?}", values[0]);
    };
    assert!(matches!(kind, ComprehensionKind::List));
    assert_eq!(clauses.len(), 2);

    assert!(matches!(
        values[1],
        Expr::Comprehension {
            kind: ComprehensionKind::Set,
            ..
        }
    ));
    assert!(matches!(
        values[2],
        Expr::Comprehension {
            kind: ComprehensionKind::Dict,
            value: Some(_),
            ..
        }
    ));
    // A parenthesized for-clause is a generator, never a tuple
    assert!(matches!(
        values[3],
        Expr::Comprehension {
            kind: ComprehensionKind::Generator,
            ..
        }
    ));

    assert!(matches!(
        values[4],
        Expr::Collection { kind: CollectionKind::List, elements, .. } if elements.is_empty()
    ));
    assert!(matches!(
        values[5],
        Expr::Collection { kind: CollectionKind::Tuple, elements, .. } if elements.is_empty()
    ));
    assert!(matches!(
        values[6],
        Expr::Dict { entries, .. } if entries.is_empty()
    ));
}

#[test]
fn test_async_constructs() {
    let source = r#"
async def fetch(url):
    async with session.get(url) as resp:
        async for chunk in resp:
            await handle(chunk)
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    let Stmt::FunctionDef { is_async, body, .. } = &module.body[0] else {
        panic!("Expected function definition, got {:?}", module.body[0]);
    };
    assert!(*is_async);

    let Stmt::With { is_async, body, .. } = &body[0] else {
        panic!("Expected with statement, got {:?}", body[0]);
    };
    assert!(*is_async);

    let Stmt::For { is_async, body, .. } = &body[0] else {
        panic!("Expected for statement, got {:?}", body[0]);
    };
    assert!(*is_async);
    let Stmt::Expression { value, .. } = &body[0] else {
        panic!("Expected expression statement, got {:?}", body[0]);
    };
    assert!(matches!(value, Expr::Await { .. }));
}

#[test]
fn test_assignment_forms() {
    let source = r#"
a = b = c = 0
x, y = y, x
total += 1
count: int = 5
items[0] -= 2
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    assert_eq!(module.body.len(), 5);
    let Stmt::Assign { targets, .. } = &module.body[0] else {
        panic!("Expected assignment, got {:?}", module.body[0]);
    };
    assert_eq!(targets.len(), 3);

    let Stmt::Assign { targets, value, .. } = &module.body[1] else {
        panic!("Expected assignment, got {:?}", module.body[1]);
    };
    assert_eq!(targets.len(), 1);
    assert!(matches!(
        targets[0],
        Expr::Collection {
            kind: CollectionKind::Tuple,
            ..
        }
    ));
    assert!(matches!(
        value,
        Expr::Collection {
            kind: CollectionKind::Tuple,
            ..
        }
    ));

    assert!(matches!(
        module.body[2],
        Stmt::AugAssign { op: BinOp::Add, .. }
    ));
    let Stmt::AnnAssign {
        annotation, value, ..
    } = &module.body[3]
    else {
        panic!("Expected annotated assignment, got {:?}", module.body[3]);
    };
    assert!(matches!(annotation, Expr::Name { ref id, .. } if id == "int"));
    assert!(value.is_some());

    let Stmt::AugAssign {
        target,
        op: BinOp::Sub,
        ..
    } = &module.body[4]
    else {
        panic!("Expected augmented assignment, got {:?}", module.body[4]);
    };
    assert!(matches!(target, Expr::Subscript { .. }));
}

#[test]
fn test_simple_statement_varieties() {
    let source = r#"
def f():
    global counter
    counter = 0

del cache, buffer
assert ready, "not ready"
raise RuntimeError("bad") from cause
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    assert_eq!(module.body.len(), 4);
    let Stmt::FunctionDef { body, .. } = &module.body[0] else {
        panic!("Expected function definition, got {:?}", module.body[0]);
    };
    let Stmt::Global { names, .. } = &body[0] else {
        panic!("Expected global statement, got {:?}", body[0]);
    };
    assert_eq!(names, &["counter"]);

    let Stmt::Del { targets, .. } = &module.body[1] else {
        panic!("Expected del statement, got {:?}", module.body[1]);
    };
    assert_eq!(targets.len(), 2);

    let Stmt::Assert { message, .. } = &module.body[2] else {
        panic!("Expected assert statement, got {:?}", module.body[2]);
    };
    assert!(message.is_some());

    let Stmt::Raise {
        exception, cause, ..
    } = &module.body[3]
    else {
        panic!("Expected raise statement, got {:?}", module.body[3]);
    };
    assert!(exception.is_some());
    assert!(cause.is_some());
}

#[test]
fn test_semicolons_and_inline_suites() {
    let source = r#"
if ready: go(); stop()
x = 1; y = 2
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    assert_eq!(module.body.len(), 3);
    let Stmt::Conditional(block) = &module.body[0] else {
        panic!("Expected conditional, got {:?}", module.body[0]);
    };
    assert_eq!(block.body.len(), 2);
    assert!(matches!(module.body[1], Stmt::Assign { .. }));
    assert!(matches!(module.body[2], Stmt::Assign { .. }));
}

#[test]
fn test_string_literal_prefixes() {
    let source = r#"
greeting = f"hello {name}"
payload = b"ab"
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    let Stmt::Assign { value, .. } = &module.body[0] else {
        panic!("Expected assignment, got {:?}", module.body[0]);
    };
    assert!(matches!(
        value,
        Expr::Constant {
            kind: ConstantKind::FormatStr,
            ..
        }
    ));
    let Stmt::Assign { value, .. } = &module.body[1] else {
        panic!("Expected assignment, got {:?}", module.body[1]);
    };
    assert!(matches!(
        value,
        Expr::Constant {
            kind: ConstantKind::Bytes,
            ..
        }
    ));
}

#[test]
fn test_yield_statements() {
    let source = r#"
def gen():
    yield
    yield 1
    yield from source
    got = yield 2
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    let Stmt::FunctionDef { body, .. } = &module.body[0] else {
        panic!("Expected function definition, got {:?}", module.body[0]);
    };
    assert_eq!(body.len(), 4);
    assert!(matches!(
        body[0],
        Stmt::Expression {
            value: Expr::Yield { value: None, .. },
            ..
        }
    ));
    assert!(matches!(
        body[1],
        Stmt::Expression {
            value: Expr::Yield { value: Some(_), .. },
            ..
        }
    ));
    assert!(matches!(
        body[2],
        Stmt::Expression {
            value: Expr::YieldFrom { .. },
            ..
        }
    ));
    let Stmt::Assign { value, .. } = &body[3] else {
        panic!("Expected assignment, got {:?}", body[3]);
    };
    assert!(matches!(value, Expr::Yield { value: Some(_), .. }));
}

#[test]
fn test_lambda_and_ternary() {
    let source = r#"
key = lambda pair: pair[1]
sign = "neg" if n < 0 else "pos"
zero = lambda: 0
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    let Stmt::Assign { value, .. } = &module.body[0] else {
        panic!("Expected assignment, got {:?}", module.body[0]);
    };
    let Expr::Lambda { params, body, .. } = value else {
        panic!("Expected lambda, got {:?}", value);
    };
    assert_eq!(params.len(), 1);
    assert!(matches!(**body, Expr::Subscript { .. }));

    let Stmt::Assign { value, .. } = &module.body[1] else {
        panic!("Expected assignment, got {:?}", module.body[1]);
    };
    assert!(matches!(value, Expr::TernaryOp { .. }));

    let Stmt::Assign { value, .. } = &module.body[2] else {
        panic!("Expected assignment, got {:?}", module.body[2]);
    };
    assert!(matches!(
        value,
        Expr::Lambda { params, .. } if params.is_empty()
    ));
}

#[test]
fn test_decorator_stack() {
    let source = r#"
@app.route("/")
@cached
def index():
    return page
"#;

    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    let Stmt::FunctionDef { decorators, .. } = &module.body[0] else {
        panic!("Expected function definition, got {:?}", module.body[0]);
    };
    assert_eq!(decorators.len(), 2);
    assert!(matches!(decorators[0], Expr::Call { .. }));
    assert!(matches!(decorators[1], Expr::Name { .. }));
}

// === ENTRY POINTS ===

#[test]
fn test_interactive_line() {
    let mut parser = Parser::new("x = 1; y = 2\n").expect("Parser creation failed");
    let statements = parser.parse_interactive().expect("Parsing failed");
    assert_eq!(statements.len(), 2);

    let mut parser = Parser::new("if x:\n    pass\n").expect("Parser creation failed");
    let statements = parser.parse_interactive().expect("Parsing failed");
    assert_eq!(statements.len(), 1);
    assert!(matches!(statements[0], Stmt::Conditional(_)));

    let mut parser = Parser::new("x = 1\ny = 2\n").expect("Parser creation failed");
    assert!(parser.parse_interactive().is_err());
}

#[test]
fn test_eval_expression() {
    let mut parser = Parser::new("value + 1\n").expect("Parser creation failed");
    let expr = parser.parse_eval().expect("Parsing failed");
    assert!(matches!(expr, Expr::BinaryOp { op: BinOp::Add, .. }));

    let mut parser = Parser::new("1, 2, 3\n").expect("Parser creation failed");
    let expr = parser.parse_eval().expect("Parsing failed");
    assert!(matches!(
        expr,
        Expr::Collection { kind: CollectionKind::Tuple, ref elements, .. } if elements.len() == 3
    ));

    let mut parser = Parser::new("x = 1\n").expect("Parser creation failed");
    assert!(parser.parse_eval().is_err());
}

#[test]
fn test_function_def_entry_point() {
    let mut parser =
        Parser::new("@wraps(inner)\ndef wrapper(*args, **kwargs):\n    return inner(*args, **kwargs)\n")
            .expect("Parser creation failed");
    let stmt = parser.parse_function_def().expect("Parsing failed");
    let Stmt::FunctionDef {
        name, decorators, ..
    } = stmt
    else {
        panic!("Expected function definition, got {:?}", stmt);
    };
    assert_eq!(name, "wrapper");
    assert_eq!(decorators.len(), 1);

    let mut parser = Parser::new("x = 1\n").expect("Parser creation failed");
    assert!(parser.parse_function_def().is_err());
}

#[test]
fn test_nodes_carry_source_locations() {
    let source = "x = 1\nif flag:\n    total = a + b\n";
    let mut parser = Parser::new(source).expect("Parser creation failed");
    let module = parser.parse_module().expect("Parsing failed");

    assert_eq!(module.body[0].location().line, 1);
    assert_eq!(module.body[0].location().column, 1);
    let Stmt::Conditional(block) = &module.body[1] else {
        panic!("Expected conditional, got {:?}", module.body[1]);
    };
    assert_eq!(block.location.line, 2);
    assert_eq!(block.location.column, 1);

    let inner = &block.body[0];
    assert_eq!(inner.location().line, 3);
    assert_eq!(inner.location().column, 5);
    let Stmt::Assign { value, .. } = inner else {
        panic!("Expected assignment, got {:?}", inner);
    };
    // A binary node points at its operator; operands keep their own spots.
    assert_eq!(value.location().line, 3);
    assert_eq!(value.location().column, 15);
    let Expr::BinaryOp { left, .. } = value else {
        panic!("Expected binary op, got {:?}", value);
    };
    assert_eq!(left.location().column, 13);
}

// === ERROR REPORTING ===

#[test]
fn test_inconsistent_unindent_is_rejected() {
    let result = Parser::new("if a:\n        b = 1\n    c = 2\n");
    assert!(result.is_err(), "Expected unindent error");
    let message = result.err().unwrap().to_string();
    assert!(
        message.contains("matches no open block"),
        "Error message should mention the unmatched unindent, got: {}",
        message
    );
}

#[test]
fn test_parse_errors_carry_locations() {
    let mut parser = Parser::new("def f(:\n    pass\n").expect("Parser creation failed");
    let err = parser.parse_module().expect_err("Expected parse error");
    assert_eq!(err.location.line, 1);

    let mut parser = Parser::new("x = (1 +\n").expect("Parser creation failed");
    assert!(parser.parse_module().is_err());
}

#[test]
fn test_unterminated_string_is_rejected() {
    assert!(Parser::new("s = 'abc\n").is_err());
}
