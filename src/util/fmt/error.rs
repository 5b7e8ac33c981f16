use std::fmt::{self, Display, Formatter};

use crate::{lexer, parser, token::Spanned};

impl<T: Display> Display for Spanned<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Spanned {
            source,
            span,
            inner: error,
        } = self;
        write!(f, "{source}:{span}: {error}")
    }
}

impl<T> std::error::Error for Spanned<T> where T: fmt::Debug + Display {}

impl Display for lexer::Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use lexer::Error::*;
        match self {
            UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            IntOverflow(literal) => write!(f, "integer literal {literal} out of range"),
        }
    }
}

impl Display for parser::Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use parser::Error::*;
        match self {
            Unexpected { expected, actual } => write!(f, "expected {expected}, but got {actual}"),
            NoPrefixRule { kind } => write!(f, "no prefix rule for {kind}"),
            UnexpectedEof { expected } => {
                write!(f, "unexpected end of input, expected {expected}")
            }
            NestingTooDeep { limit } => {
                write!(f, "expression nested more than {limit} levels deep")
            }
            Lexer(error) => write!(f, "{error}"),
        }
    }
}

impl Display for parser::Expected {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            parser::Expected::Token(kind) => write!(f, "{kind}"),
            parser::Expected::Expression => f.write_str("expression"),
        }
    }
}

impl Display for crate::Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            crate::Error::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            crate::Error::Parse(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for crate::Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            crate::Error::Io { source, .. } => Some(source),
            crate::Error::Parse(error) => Some(error),
        }
    }
}
