use std::{io, path::PathBuf};

/// The lexer takes the source input, mapping it into a sequence of tokens.
pub mod lexer;

/// The parser takes a sequence of tokens, mapping it into an AST.
pub mod parser;

pub mod ast;
pub mod token;

pub mod util {
    pub mod fmt;
    #[cfg(test)]
    pub(crate) mod test_utils;
}

pub use lexer::{LexError, Lexer};
pub use parser::{parse, parse_file, ParseError, Parser};

/// Errors of the file based entry points.
#[derive(Debug)]
pub enum Error {
    Io { path: PathBuf, source: io::Error },
    Parse(ParseError),
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        Error::Parse(error)
    }
}
