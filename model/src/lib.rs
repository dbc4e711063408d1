mod display;
pub mod target;

pub use target::Target;

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Val,
    Name,
    Number,
    Eq,
    Cond,
    If,
    LBrace,
    RBrace,
    LParens,
    RParens,
}

impl TokenKind {
    /// Upper-case name used in diagnostics, e.g. `LBRACE`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Val => "VAL",
            Self::Name => "NAME",
            Self::Number => "NUMBER",
            Self::Eq => "EQ",
            Self::Cond => "COND",
            Self::If => "IF",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::LParens => "LPARENS",
            Self::RParens => "RPARENS",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}

// ─── AST ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub identifier: String,
}

impl Name {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self { identifier: identifier.into() }
    }
}

/// A value position: either a variable reference or a literal
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Name(Name),
    Number(Number),
}

impl Operand {
    pub fn name(identifier: impl Into<String>) -> Self {
        Operand::Name(Name::new(identifier))
    }

    pub fn number(value: f64) -> Self {
        Operand::Number(Number { value })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: Name,
    pub value: Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<=",
        }
    }
}

impl FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            ">" => Ok(Self::Greater),
            ">=" => Ok(Self::GreaterEqual),
            "<" => Ok(Self::Less),
            "<=" => Ok(Self::LessEqual),
            other => Err(format!("unknown comparison operator '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub left: Operand,
    pub op: CompareOp,
    pub right: Operand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Condition,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub argument: Operand,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declaration(Declaration),
    If(If),
    FunctionCall(FunctionCall),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// Any AST node. Statement positions only accept the `Stmt` subset; the
/// code generator rejects the rest.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Number(Number),
    Name(Name),
    Declaration(Declaration),
    Condition(Condition),
    If(If),
    FunctionCall(FunctionCall),
    Program(Program),
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Number(_) => "Number",
            Node::Name(_) => "Name",
            Node::Declaration(_) => "Declaration",
            Node::Condition(_) => "Condition",
            Node::If(_) => "If",
            Node::FunctionCall(_) => "FunctionCall",
            Node::Program(_) => "Program",
        }
    }
}

impl From<Stmt> for Node {
    fn from(stmt: Stmt) -> Self {
        match stmt {
            Stmt::Declaration(d) => Node::Declaration(d),
            Stmt::If(i) => Node::If(i),
            Stmt::FunctionCall(c) => Node::FunctionCall(c),
        }
    }
}

impl From<Operand> for Node {
    fn from(operand: Operand) -> Self {
        match operand {
            Operand::Name(n) => Node::Name(n),
            Operand::Number(n) => Node::Number(n),
        }
    }
}

impl From<Program> for Node {
    fn from(program: Program) -> Self {
        Node::Program(program)
    }
}
