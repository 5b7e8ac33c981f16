// program   ::= stmt* EOF
// stmt      ::= let_stmt | return_stmt | expr_stmt
// let_stmt  ::= 'let' IDENT '=' expr [';']
// return    ::= 'return' expr [';']
// expr_stmt ::= expr [';']
// expr      ::= IDENT
//             | INT
//             | '-' expr
//             | '!' expr
//             | expr ('+' | '-' | '*' | '/' | '<' | '>' | '==' | '!=') expr

// Precedence
//
// - !        (prefix)
// * /
// + -
// < >
// == !=

use std::fmt;

use crate::token::{SourceName, Span, Token, TokenKind};

/// Capabilities shared by every AST node: access to the originating token and
/// the canonical source rendering (through [`fmt::Display`]).
pub trait Node: fmt::Display {
    fn token(&self) -> &Token;

    fn span(&self) -> Span {
        self.token().span
    }

    fn source(&self) -> &SourceName {
        &self.token().source
    }
}

#[derive(Debug, PartialEq, Default)]
pub struct Program {
    /// In source order.
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.statements.push(stmt);
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }
}

#[derive(Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    /// The first token of the statement.
    pub token: Token,
}

#[derive(Debug, PartialEq)]
pub enum StmtKind {
    Let { name: Ident, value: Expr },
    Return { value: Expr },
    Expr(Expr),
}

#[derive(Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// The literal token for leaves, the operator token otherwise.
    pub token: Token,
}

#[derive(Debug, PartialEq)]
pub enum ExprKind {
    Ident(Box<str>),
    Int(i64),
    Prefix {
        op: PrefixOperator,
        operand: Box<Expr>,
    },
    Infix {
        op: InfixOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrefixOperator {
    /// `-`
    Neg,
    /// `!`
    Not,
}

impl PrefixOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            PrefixOperator::Neg => "-",
            PrefixOperator::Not => "!",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InfixOperator {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Eq,
    NotEq,
}

impl InfixOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            InfixOperator::Add => "+",
            InfixOperator::Sub => "-",
            InfixOperator::Mul => "*",
            InfixOperator::Div => "/",
            InfixOperator::Lt => "<",
            InfixOperator::Gt => ">",
            InfixOperator::Eq => "==",
            InfixOperator::NotEq => "!=",
        }
    }
}

/// A binding name, as in `let <name> = ...`.
#[derive(Debug, PartialEq)]
pub struct Ident {
    pub name: Box<str>,
    pub token: Token,
}

impl Ident {
    pub fn new(token: Token) -> Ident {
        debug_assert_eq!(token.kind, TokenKind::Ident);
        Ident {
            name: token.lexeme.clone(),
            token,
        }
    }
}

impl Node for Stmt {
    fn token(&self) -> &Token {
        &self.token
    }
}

impl Node for Expr {
    fn token(&self) -> &Token {
        &self.token
    }
}

impl Node for Ident {
    fn token(&self) -> &Token {
        &self.token
    }
}
