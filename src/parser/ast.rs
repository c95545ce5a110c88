// AST definitions for the Python front end

use serde::Serialize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Kinds of literal constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstantKind {
    Bool,
    None,
    Int,
    Float,
    Str,
    Bytes,
    FormatStr,
}

/// Kinds of collection displays; `Slices` wraps a subscript's slice list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollectionKind {
    List,
    Tuple,
    Set,
    Slices,
}

/// Kinds of comprehension displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComprehensionKind {
    List,
    Set,
    Dict,
    Generator,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    MatMul,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Is,
    IsNot,
    In,
    NotIn,
    // Logical
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    BitShl,
    BitShr,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnOp {
    Neg,    // -x
    Pos,    // +x
    Not,    // not x
    BitNot, // ~x
}

/// Function or lambda parameter
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub name: String,
    pub annotation: Option<Expr>,
    pub default: Option<Expr>,
    pub star: bool,        // *args collector
    pub double_star: bool, // **kwargs collector
    pub positional_only: bool,
    pub keyword_only: bool,
    pub location: SourceLocation,
}

impl Parameter {
    pub fn new(name: String, location: SourceLocation) -> Self {
        Parameter {
            name,
            annotation: None,
            default: None,
            star: false,
            double_star: false,
            positional_only: false,
            keyword_only: false,
            location,
        }
    }
}

/// Call argument; `name` is set for keyword arguments, the unpack flags for
/// `*iterable` and `**mapping`
#[derive(Debug, Clone, Serialize)]
pub struct Argument {
    pub name: Option<String>,
    pub value: Expr,
    pub unpack_iterable: bool,
    pub unpack_mapping: bool,
}

impl Argument {
    pub fn positional(value: Expr) -> Self {
        Argument {
            name: None,
            value,
            unpack_iterable: false,
            unpack_mapping: false,
        }
    }
}

/// Dictionary display entry; a `**mapping` entry carries no key
#[derive(Debug, Clone, Serialize)]
pub struct DictEntry {
    pub key: Option<Expr>,
    pub value: Expr,
}

/// One `for` or `if` clause inside a comprehension
#[derive(Debug, Clone, Serialize)]
pub enum ComprehensionClause {
    For {
        target: Expr,
        iter: Expr,
        is_async: bool,
    },
    If {
        condition: Expr,
    },
}

/// One name in an `import` or `from ... import` list
#[derive(Debug, Clone, Serialize)]
pub struct ImportAlias {
    pub name: String,
    pub alias: Option<String>,
}

/// One `expr [as target]` item of a `with` statement
#[derive(Debug, Clone, Serialize)]
pub struct WithItem {
    pub context: Expr,
    pub alias: Option<Expr>,
}

/// One `except [expr [as name]]:` clause
#[derive(Debug, Clone, Serialize)]
pub struct ExceptHandler {
    pub exception: Option<Expr>,
    pub alias: Option<String>,
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

/// One `case pattern [if guard]:` arm of a `match` statement
#[derive(Debug, Clone, Serialize)]
pub struct CaseArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Discriminates the links of an `if`/`elif`/`else` chain; `While` heads its
/// own chain so a loop `else` reuses the same shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConditionalKind {
    If,
    Elif,
    Else,
    While,
}

/// A conditional block and the block chained after it, if any
#[derive(Debug, Clone, Serialize)]
pub struct ConditionalBlock {
    pub kind: ConditionalKind,
    pub condition: Option<Expr>, // None only for Else
    pub body: Vec<Stmt>,
    pub chained: Option<Box<ConditionalBlock>>,
    pub location: SourceLocation,
}

/// Expression nodes
#[derive(Debug, Clone, Serialize)]
pub enum Expr {
    Constant {
        kind: ConstantKind,
        value: String,
        location: SourceLocation,
    },
    Name {
        id: String,
        location: SourceLocation,
    },
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    TernaryOp {
        condition: Box<Expr>,
        true_expr: Box<Expr>,
        false_expr: Box<Expr>,
        location: SourceLocation,
    },
    NamedExpr {
        target: String,
        value: Box<Expr>,
        location: SourceLocation,
    },
    Lambda {
        params: Vec<Parameter>,
        body: Box<Expr>,
        location: SourceLocation,
    },
    Await {
        value: Box<Expr>,
        location: SourceLocation,
    },
    Starred {
        value: Box<Expr>,
        location: SourceLocation,
    },
    Attribute {
        value: Box<Expr>,
        attr: String,
        location: SourceLocation,
    },
    Subscript {
        value: Box<Expr>,
        index: Box<Expr>,
        location: SourceLocation,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Argument>,
        location: SourceLocation,
    },
    Collection {
        kind: CollectionKind,
        elements: Vec<Expr>,
        location: SourceLocation,
    },
    Dict {
        entries: Vec<DictEntry>,
        location: SourceLocation,
    },
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
        location: SourceLocation,
    },
    Comprehension {
        kind: ComprehensionKind,
        element: Box<Expr>,
        value: Option<Box<Expr>>, // dict comprehensions only
        clauses: Vec<ComprehensionClause>,
        location: SourceLocation,
    },
    Yield {
        value: Option<Box<Expr>>,
        location: SourceLocation,
    },
    YieldFrom {
        value: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            Expr::Constant { location, .. } => location,
            Expr::Name { location, .. } => location,
            Expr::BinaryOp { location, .. } => location,
            Expr::UnaryOp { location, .. } => location,
            Expr::TernaryOp { location, .. } => location,
            Expr::NamedExpr { location, .. } => location,
            Expr::Lambda { location, .. } => location,
            Expr::Await { location, .. } => location,
            Expr::Starred { location, .. } => location,
            Expr::Attribute { location, .. } => location,
            Expr::Subscript { location, .. } => location,
            Expr::Call { location, .. } => location,
            Expr::Collection { location, .. } => location,
            Expr::Dict { location, .. } => location,
            Expr::Slice { location, .. } => location,
            Expr::Comprehension { location, .. } => location,
            Expr::Yield { location, .. } => location,
            Expr::YieldFrom { location, .. } => location,
        }
    }
}

/// Statement nodes
#[derive(Debug, Clone, Serialize)]
pub enum Stmt {
    Expression {
        value: Expr,
        location: SourceLocation,
    },
    Assign {
        targets: Vec<Expr>,
        value: Expr,
        location: SourceLocation,
    },
    AugAssign {
        target: Expr,
        op: BinOp,
        value: Expr,
        location: SourceLocation,
    },
    AnnAssign {
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
        location: SourceLocation,
    },
    Return {
        value: Option<Expr>,
        location: SourceLocation,
    },
    Pass {
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Global {
        names: Vec<String>,
        location: SourceLocation,
    },
    Nonlocal {
        names: Vec<String>,
        location: SourceLocation,
    },
    Del {
        targets: Vec<Expr>,
        location: SourceLocation,
    },
    Assert {
        test: Expr,
        message: Option<Expr>,
        location: SourceLocation,
    },
    Raise {
        exception: Option<Expr>,
        cause: Option<Expr>,
        location: SourceLocation,
    },
    Import {
        names: Vec<ImportAlias>,
        location: SourceLocation,
    },
    ImportFrom {
        module: String,
        level: usize, // leading relative dots
        names: Vec<ImportAlias>,
        location: SourceLocation,
    },
    FunctionDef {
        name: String,
        params: Vec<Parameter>,
        return_annotation: Option<Expr>,
        body: Vec<Stmt>,
        decorators: Vec<Expr>,
        is_async: bool,
        location: SourceLocation,
    },
    ClassDef {
        name: String,
        arguments: Vec<Argument>,
        body: Vec<Stmt>,
        decorators: Vec<Expr>,
        location: SourceLocation,
    },
    Conditional(ConditionalBlock),
    For {
        targets: Vec<Expr>,
        iter: Expr,
        body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
        is_async: bool,
        location: SourceLocation,
    },
    With {
        items: Vec<WithItem>,
        body: Vec<Stmt>,
        is_async: bool,
        location: SourceLocation,
    },
    Try {
        body: Vec<Stmt>,
        handlers: Vec<ExceptHandler>,
        else_body: Option<Vec<Stmt>>,
        final_body: Option<Vec<Stmt>>,
        location: SourceLocation,
    },
    Match {
        subject: Expr,
        arms: Vec<CaseArm>,
        location: SourceLocation,
    },
}

impl Stmt {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            Stmt::Expression { location, .. } => location,
            Stmt::Assign { location, .. } => location,
            Stmt::AugAssign { location, .. } => location,
            Stmt::AnnAssign { location, .. } => location,
            Stmt::Return { location, .. } => location,
            Stmt::Pass { location } => location,
            Stmt::Break { location } => location,
            Stmt::Continue { location } => location,
            Stmt::Global { location, .. } => location,
            Stmt::Nonlocal { location, .. } => location,
            Stmt::Del { location, .. } => location,
            Stmt::Assert { location, .. } => location,
            Stmt::Raise { location, .. } => location,
            Stmt::Import { location, .. } => location,
            Stmt::ImportFrom { location, .. } => location,
            Stmt::FunctionDef { location, .. } => location,
            Stmt::ClassDef { location, .. } => location,
            Stmt::Conditional(block) => &block.location,
            Stmt::For { location, .. } => location,
            Stmt::With { location, .. } => location,
            Stmt::Try { location, .. } => location,
            Stmt::Match { location, .. } => location,
        }
    }
}

/// Patterns of a `case` arm
#[derive(Debug, Clone, Serialize)]
pub enum Pattern {
    Wildcard,
    Capture {
        name: String,
    },
    /// `None`, `True`/`False` and string literals
    Literal {
        kind: ConstantKind,
        value: String,
    },
    /// Numeric literal, possibly signed, possibly complex; both lexemes kept raw
    Number {
        real: Option<String>,
        imaginary: Option<String>,
    },
    /// Dotted value lookup such as `Color.RED`
    Value {
        path: Vec<String>,
    },
    /// Alternatives joined with `|`, with an optional `as` capture
    Or {
        alternatives: Vec<Pattern>,
        capture: Option<String>,
    },
    /// `*rest` inside a sequence pattern; the inner pattern is a capture or wildcard
    Star {
        pattern: Box<Pattern>,
    },
    Sequence {
        kind: CollectionKind, // List or Tuple
        open: bool,           // trailing-comma open form
        elements: Vec<Pattern>,
    },
    Mapping {
        entries: Vec<(Pattern, Pattern)>,
        rest: Option<String>, // `**name`
        open: bool,
    },
    Class {
        path: Vec<String>,
        positional: Vec<Pattern>,
        keyword: Vec<(String, Pattern)>,
        open: bool,
    },
}

/// Top-level module structure
#[derive(Debug, Clone, Default, Serialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    pub fn new() -> Self {
        Module::default()
    }
}
