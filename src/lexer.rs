use std::{borrow::Cow, fs, io, path::Path};

use crate::token::{SourceName, Span, Spanned, Token, TokenKind, KEYWORDS};

pub type LexError = Spanned<Error>;

pub type LexResult = Result<Token, LexError>;

/// Lexes the whole in-memory input, up to and including the [`TokenKind::Eof`]
/// token. Stops at the first error.
pub fn lex(src: &str) -> Result<Vec<Token>, LexError> {
    Lexer::in_memory(src).tokens().collect()
}

/// The Monkey lexer.
///
/// Positions are counted in runes, not bytes. A single token of lookahead is
/// kept in an explicit buffer, see [`Lexer::peek_token`].
pub struct Lexer<'src> {
    source: SourceName,
    src: Cow<'src, str>,
    /// Byte offset of the next rune.
    cursor: usize,
    line: u32,
    column: u32,
    mark: Mark,
    peeked: Option<LexResult>,
}

#[derive(Copy, Clone)]
struct Mark {
    cursor: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: impl Into<SourceName>, src: impl Into<Cow<'src, str>>) -> Lexer<'src> {
        Lexer {
            source: source.into(),
            src: src.into(),
            cursor: 0,
            line: 1,
            column: 1,
            mark: Mark {
                cursor: 0,
                line: 1,
                column: 1,
            },
            peeked: None,
        }
    }

    /// Constructs a lexer over a string which doesn't come from a file.
    pub fn in_memory(src: &'src str) -> Lexer<'src> {
        Lexer::new(SourceName::in_memory(), src)
    }

    pub fn source(&self) -> &SourceName {
        &self.source
    }

    /// Returns and consumes the next token.
    ///
    /// Once the input is exhausted, every call returns an [`TokenKind::Eof`]
    /// token at the same position.
    pub fn next_token(&mut self) -> LexResult {
        match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.scan(),
        }
    }

    /// Returns the next token without consuming it.
    ///
    /// Repeated calls return the same token (or error), which is also what the
    /// following [`Lexer::next_token`] returns.
    pub fn peek_token(&mut self) -> Result<&Token, LexError> {
        let peeked = match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.scan(),
        };
        self.peeked.insert(peeked).as_ref().map_err(Clone::clone)
    }

    /// Returns an iterator over the remaining tokens. The iterator ends after
    /// yielding the [`TokenKind::Eof`] token or the first error.
    pub fn tokens(&mut self) -> Tokens<'_, 'src> {
        Tokens {
            lexer: self,
            finished: false,
        }
    }
}

impl Lexer<'static> {
    /// Reads the whole file at `path` and constructs a lexer over it, named
    /// after the path.
    ///
    /// The file is closed before this function returns.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Lexer<'static>> {
        let path = path.as_ref();
        let src = fs::read_to_string(path)?;
        Ok(Lexer::new(path, src))
    }
}

impl Lexer<'_> {
    /// Scans the next token, skipping any leading whitespace.
    fn scan(&mut self) -> LexResult {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
        let kind = self.scan_token_kind();
        self.produce(kind)
    }

    /// Tries to scan the current character.
    fn scan_token_kind(&mut self) -> TokenKind {
        use TokenKind::*;
        let Some(c) = self.mark_advance() else {
            return Eof;
        };
        match c {
            ';' => Semicolon,
            '+' => Add,
            '-' => Sub,
            '*' => Mul,
            '/' => Div,
            '<' => Lt,
            '>' => Gt,
            '(' => LParen,
            ')' => RParen,
            '{' => LBrace,
            '}' => RBrace,
            '[' => LSquare,
            ']' => RSquare,
            ',' => Comma,
            '=' => match self.peek() {
                Some('=') => self.advance_with(Eq),
                _ => Assign,
            },
            '!' => match self.peek() {
                Some('=') => self.advance_with(NotEq),
                _ => Not,
            },
            c if is_identifier_start(c) => self.identifier_or_keyword(),
            c if c.is_ascii_digit() => self.number(),
            _ => Illegal,
        }
    }

    fn identifier_or_keyword(&mut self) -> TokenKind {
        while self.peek().is_some_and(is_identifier_continue) {
            self.advance();
        }
        KEYWORDS
            .get(self.substr())
            .copied()
            .unwrap_or(TokenKind::Ident)
    }

    fn number(&mut self) -> TokenKind {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        TokenKind::Int
    }

    /// Starts a new token "mark" and advances.
    fn mark_advance(&mut self) -> Option<char> {
        self.mark = Mark {
            cursor: self.cursor,
            line: self.line,
            column: self.column,
        };
        self.advance()
    }

    /// Returns the next rune and advances, updating the line and column.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Advances and returns the provided value.
    fn advance_with<T>(&mut self, value: T) -> T {
        self.advance();
        value
    }

    /// Returns the next rune without advancing.
    fn peek(&self) -> Option<char> {
        self.src[self.cursor..].chars().next()
    }

    /// Returns the span of the current marked bounds. Tokens never contain a
    /// line break, so the length is the column distance.
    fn span(&self) -> Span {
        Span::new(self.mark.line, self.mark.column, self.column - self.mark.column)
    }

    /// Returns the substring of the current marked bounds.
    fn substr(&self) -> &str {
        &self.src[self.mark.cursor..self.cursor]
    }

    /// Produces a token (or an error) using the marked bounds.
    fn produce(&self, kind: TokenKind) -> LexResult {
        let span = self.span();
        let lexeme = self.substr();
        match kind {
            TokenKind::Illegal => {
                let c = lexeme.chars().next().unwrap_or_default();
                Err(span.wrap(self.source.clone(), Error::UnexpectedChar(c)))
            }
            TokenKind::Int => match lexeme.parse() {
                Ok(value) => Ok(Token::new_int(self.source.clone(), span, lexeme, value)),
                Err(_) => Err(span.wrap(self.source.clone(), Error::IntOverflow(lexeme.into()))),
            },
            kind => Ok(Token::new(kind, self.source.clone(), span, lexeme)),
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

/// Only ASCII digits continue an identifier; other numeric runes (`²`, `٣`)
/// are illegal.
fn is_identifier_continue(c: char) -> bool {
    c == '_' || c.is_alphabetic() || c.is_ascii_digit()
}

pub struct Tokens<'lex, 'src> {
    lexer: &'lex mut Lexer<'src>,
    finished: bool,
}

impl Iterator for Tokens<'_, '_> {
    type Item = LexResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let next = self.lexer.next_token();
        self.finished = next.as_ref().map_or(true, Token::is_eof);
        Some(next)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A rune which doesn't start any token.
    UnexpectedChar(char),
    /// An integer literal which doesn't fit in an `i64`.
    IntOverflow(Box<str>),
}
