use std::{
    env,
    error::Error,
    io::{self, Write},
};

use monkey::{LexError, Lexer, ParseError, Parser};

const USAGE: &str = "usage: monkey [--tokens] [--trace] [FILE]";

#[derive(Default)]
struct Options {
    tokens: bool,
    trace: bool,
    file: Option<String>,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("failed to run: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut options = Options::default();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--tokens" => options.tokens = true,
            "--trace" => options.trace = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            flag if flag.starts_with('-') => {
                return Err(format!("unknown flag {flag}\n{USAGE}").into());
            }
            _ if options.file.is_some() => return Err(USAGE.into()),
            _ => options.file = Some(arg),
        }
    }

    if let Some(ref file) = options.file {
        let lexer = Lexer::open(file).map_err(|source| monkey::Error::Io {
            path: file.into(),
            source,
        })?;
        if options.tokens {
            print_tokens(lexer)?;
        } else {
            print_program(lexer, options.trace)?;
        }
        return Ok(());
    }

    let mut input = String::new();
    loop {
        print!(">> ");
        io::stdout().flush()?;

        input.clear();
        let n = io::stdin().read_line(&mut input)?;

        if n == 0 {
            println!("^D");
            return Ok(());
        }

        let lexer = Lexer::in_memory(&input);
        let result: Result<(), Box<dyn Error>> = if options.tokens {
            print_tokens(lexer).map_err(Into::into)
        } else {
            print_program(lexer, options.trace).map_err(Into::into)
        };
        if let Err(error) = result {
            println!("{error}");
        }
    }
}

fn print_tokens(mut lexer: Lexer<'_>) -> Result<(), LexError> {
    for token in lexer.tokens() {
        println!("{:?}", token?);
    }
    Ok(())
}

fn print_program(lexer: Lexer<'_>, trace: bool) -> Result<(), ParseError> {
    let mut parser = Parser::new(lexer);
    if trace {
        parser = parser.with_trace(|t| eprintln!("{t}"));
    }
    println!("{}", parser.parse()?);
    Ok(())
}
