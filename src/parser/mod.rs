//! Python source code parser
//!
//! This module transforms Python source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens, including indentation layout)
//! - [`parse`]: Parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//! - [`tokens`]: Keyword and operator tables shared by lexer and parser
//!
//! # Supported Python Subset
//!
//! The parser covers the Python 3.10 statement and expression grammar:
//! - Statements: assignments (plain, chained, augmented, annotated), control
//!   flow (`if`, `while`, `for`, `try`, `with`, `match`), definitions (`def`,
//!   `class`, decorators, `async` variants), imports, and the one-token
//!   statements (`pass`, `break`, `continue`, ...)
//! - Expressions: the full precedence ladder from ternaries and lambdas down
//!   to atoms, plus comprehensions, starred and keyword arguments, slices,
//!   and `:=` assignments
//! - `match` statements with the full pattern sub-grammar
//! - No execution or semantic analysis; literals are kept as written
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with backtracking: alternatives are tried
//! in order and the token cursor rewinds when one fails without committing.

pub mod ast;
pub mod lexer;
pub mod parse;
pub mod tokens;

mod atoms;
mod declarations;
mod expressions;
mod patterns;
mod statements;
