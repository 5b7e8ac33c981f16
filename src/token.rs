use std::{fmt, path::Path, sync::Arc};

#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub source: SourceName,
    pub span: Span,
    /// The source text this token was scanned from. Empty for [`TokenKind::Eof`].
    pub lexeme: Box<str>,
    /// The literal value, only present on [`TokenKind::Int`] tokens.
    pub value: Option<i64>,
}

impl Token {
    pub fn new(kind: TokenKind, source: SourceName, span: Span, lexeme: &str) -> Token {
        Token {
            kind,
            source,
            span,
            lexeme: Box::from(lexeme),
            value: None,
        }
    }

    pub fn new_int(source: SourceName, span: Span, lexeme: &str, value: i64) -> Token {
        Token {
            value: Some(value),
            ..Token::new(TokenKind::Int, source, span, lexeme)
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn line(&self) -> u32 {
        self.span.line
    }

    pub fn column(&self) -> u32 {
        self.span.column
    }

    /// Attaches this token's position to the provided value.
    pub fn wrap<T>(&self, inner: T) -> Spanned<T> {
        Spanned {
            source: self.source.clone(),
            span: self.span,
            inner,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({}, {}, {:?})", self.kind, self.span, self.lexeme)
    }
}

/// Position of a lexeme, counted in runes.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    /// 1-based line.
    pub line: u32,
    /// 1-based column of the lexeme's first rune.
    pub column: u32,
    /// Number of runes in the lexeme.
    pub len: u32,
}

impl Span {
    pub fn new(line: u32, column: u32, len: u32) -> Span {
        debug_assert!(line > 0 && column > 0);
        Span { line, column, len }
    }

    /// Returns the column just past the end of the spanned lexeme.
    pub fn end_column(&self) -> u32 {
        self.column + self.len
    }

    pub fn wrap<T>(self, source: SourceName, inner: T) -> Spanned<T> {
        Spanned {
            source,
            span: self,
            inner,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({self}, len: {})", self.len)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The name of the source a token was read from, shared by every token of
/// that source.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SourceName(Arc<str>);

impl SourceName {
    /// Name used for sources which don't come from a file.
    pub const IN_MEMORY: &'static str = "<input>";

    pub fn new(name: &str) -> SourceName {
        SourceName(Arc::from(name))
    }

    pub fn in_memory() -> SourceName {
        SourceName::new(SourceName::IN_MEMORY)
    }

    pub fn from_path(path: &Path) -> SourceName {
        SourceName::new(&path.to_string_lossy())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_in_memory(&self) -> bool {
        self.as_str() == SourceName::IN_MEMORY
    }
}

impl From<&str> for SourceName {
    fn from(name: &str) -> Self {
        SourceName::new(name)
    }
}

impl From<&Path> for SourceName {
    fn from(path: &Path) -> Self {
        SourceName::from_path(path)
    }
}

impl fmt::Debug for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceName({:?})", self.as_str())
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value tagged with the source position it refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spanned<T> {
    pub source: SourceName,
    pub span: Span,
    pub inner: T,
}

impl<T> Spanned<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            source: self.source,
            span: self.span,
            inner: f(self.inner),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,

    Ident,
    Int,

    /// `=`
    Assign,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    Add,
    Sub,
    Mul,
    Div,
    /// `!`
    Not,
    Lt,
    Gt,

    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LSquare,
    RSquare,
    Comma,

    Else,
    False,
    Fn,
    If,
    Let,
    Return,
    True,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Illegal => "ILLEGAL",
            Eof => "EOF",
            Ident => "IDENT",
            Int => "INT",
            Assign => "ASSIGN",
            Eq => "EQ",
            NotEq => "NEQ",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            Div => "DIV",
            Not => "NOT",
            Lt => "LT",
            Gt => "GT",
            Semicolon => "SEMICOLON",
            LParen => "LPAREN",
            RParen => "RPAREN",
            LBrace => "LBRACE",
            RBrace => "RBRACE",
            LSquare => "LSQUARE",
            RSquare => "RSQUARE",
            Comma => "COMMA",
            Else => "ELSE",
            False => "FALSE",
            Fn => "FN",
            If => "IF",
            Let => "LET",
            Return => "RETURN",
            True => "TRUE",
        }
    }

    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(self, Else | False | Fn | If | Let | Return | True)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "else" => TokenKind::Else,
    "false" => TokenKind::False,
    "fn" => TokenKind::Fn,
    "if" => TokenKind::If,
    "let" => TokenKind::Let,
    "return" => TokenKind::Return,
    "true" => TokenKind::True,
};
