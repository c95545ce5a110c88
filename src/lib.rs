//! # Introduction
//!
//! Pyrite tokenises and parses Python 3.10 source into an Abstract Syntax
//! Tree.  Nothing is executed: the output is the tree itself, with literal
//! lexemes kept as written, ready for serialisation or further analysis.
//!
//! ## Parsing pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST
//! ```
//!
//! 1. [`parser::lexer`] — scans the source into tokens, turning leading
//!    whitespace into explicit indent and dedent tokens.
//! 2. [`parser::parse`] — a backtracking recursive-descent parser over the
//!    token stream; alternatives are tried in order and the cursor rewinds
//!    when one fails without committing.
//! 3. [`parser::ast`] — the tree itself.  Every node carries the source
//!    location it started at and derives [serde](https://docs.rs/serde)'s
//!    `Serialize`, so whole modules dump to JSON.
//!
//! ## Entry points
//!
//! [`parser::parse::Parser`] exposes one constructor and four grammar
//! entry points: `parse_module` for whole files, `parse_interactive` for a
//! single REPL line, `parse_eval` for a lone expression, and
//! `parse_function_def` for exactly one function definition.

pub mod parser;
