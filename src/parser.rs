use std::{collections::HashMap, fmt, path::Path, sync::LazyLock};

use crate::{
    ast::{Expr, ExprKind, Ident, InfixOperator, PrefixOperator, Program, Stmt, StmtKind},
    lexer::{self, LexError, Lexer},
    token::{SourceName, Spanned, Token, TokenKind},
};

pub type ParseError = Spanned<Error>;

type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Parses an in-memory program.
pub fn parse(src: &str) -> Result<Program> {
    Parser::new(Lexer::in_memory(src)).parse()
}

/// Parses an in-memory program, attributing errors and tokens to `source`.
pub fn parse_named(source: impl Into<SourceName>, src: &str) -> Result<Program> {
    Parser::new(Lexer::new(source, src)).parse()
}

/// Reads and parses the program at `path`.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Program, crate::Error> {
    let path = path.as_ref();
    let lexer = Lexer::open(path).map_err(|source| crate::Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Parser::new(lexer).parse()?)
}

/// Parses a single in-memory expression, which must span the whole input (an
/// optional trailing `;` is allowed).
pub fn parse_expr(src: &str) -> Result<Expr> {
    Parser::new(Lexer::in_memory(src)).parse_single_expr()
}

/// How many expressions may nest inside each other, counting both operands
/// of infix operators and the operands of prefix operators.
pub const MAX_NESTING: usize = 128;

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    trace: Option<Box<dyn FnMut(&Trace<'_>) + 'src>>,
    depth: usize,
    nesting: usize,
}

impl<'src> Parser<'src> {
    pub fn new(lexer: Lexer<'src>) -> Parser<'src> {
        Parser {
            lexer,
            trace: None,
            depth: 0,
            nesting: 0,
        }
    }

    /// Installs a hook called on entry of every grammar rule.
    pub fn with_trace(mut self, hook: impl FnMut(&Trace<'_>) + 'src) -> Parser<'src> {
        self.trace = Some(Box::new(hook));
        self
    }

    /// Parses the whole input. The first error aborts the parse.
    pub fn parse(mut self) -> Result<Program> {
        self.trace_next("program")?;
        self.nested(|p| {
            let mut program = Program::new();
            while p.peek_kind()? != TokenKind::Eof {
                program.push(p.parse_stmt()?);
            }
            Ok(program)
        })
    }

    fn parse_single_expr(mut self) -> Result<Expr> {
        let expr = self.parse_expr()?;
        self.take(TokenKind::Semicolon)?;
        self.consume(TokenKind::Eof)?;
        Ok(expr)
    }
}

impl Parser<'_> {
    fn parse_stmt(&mut self) -> Result<Stmt> {
        self.trace_next("statement")?;
        self.nested(|p| match p.peek_kind()? {
            TokenKind::Let => p.parse_let(),
            TokenKind::Return => p.parse_return(),
            _ => p.parse_expr_stmt(),
        })
    }

    fn parse_let(&mut self) -> Result<Stmt> {
        self.trace_next("let")?;
        let token = self.consume(TokenKind::Let)?;
        let name = Ident::new(self.consume(TokenKind::Ident)?);
        self.consume(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        self.take(TokenKind::Semicolon)?;
        Ok(Stmt {
            kind: StmtKind::Let { name, value },
            token,
        })
    }

    fn parse_return(&mut self) -> Result<Stmt> {
        self.trace_next("return")?;
        let token = self.consume(TokenKind::Return)?;
        let value = self.parse_expr()?;
        self.take(TokenKind::Semicolon)?;
        Ok(Stmt {
            kind: StmtKind::Return { value },
            token,
        })
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt> {
        let token = self.peek()?;
        let expr = self.parse_expr()?;
        self.take(TokenKind::Semicolon)?;
        Ok(Stmt {
            kind: StmtKind::Expr(expr),
            token,
        })
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_expr_prec(Precedence::Lowest)
    }

    /// Parses an expression whose infix operators all bind tighter than
    /// `min`.
    fn parse_expr_prec(&mut self, min: Precedence) -> Result<Expr> {
        if self.nesting >= MAX_NESTING {
            let token = self.peek()?;
            return Err(token.wrap(Error::NestingTooDeep { limit: MAX_NESTING }));
        }
        self.trace_next("expression")?;
        self.nesting += 1;
        let result = self.nested(|p| {
            let token = p.advance()?;
            let Some(&prefix) = RULES.prefix.get(&token.kind) else {
                return Err(no_prefix_rule(token));
            };
            p.trace("prefix", &token);
            let mut lhs = prefix(p, token)?;

            loop {
                let kind = p.peek_kind()?;
                let Some(&rule) = RULES.infix.get(&kind) else {
                    // Not an infix operator
                    break;
                };
                if rule.precedence <= min {
                    // Binds too loosely, the caller folds it
                    break;
                }
                let op_token = p.advance()?;
                p.trace("infix", &op_token);
                lhs = (rule.parse)(p, lhs, op_token, rule)?;
            }

            Ok(lhs)
        });
        self.nesting -= 1;
        result
    }
}

impl Parser<'_> {
    /// Returns a copy of the next token without consuming it.
    fn peek(&mut self) -> Result<Token> {
        Ok(self.lexer.peek_token()?.clone())
    }

    fn peek_kind(&mut self) -> Result<TokenKind> {
        Ok(self.lexer.peek_token()?.kind)
    }

    /// Returns the next token and advances.
    fn advance(&mut self) -> Result<Token> {
        Ok(self.lexer.next_token()?)
    }

    /// Advances if the next token matches the provided one, returning true.
    /// If not, returns false and doesn't advance.
    fn take(&mut self, expect: TokenKind) -> Result<bool> {
        if self.peek_kind()? == expect {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Advances, requiring the token to match the provided one.
    fn consume(&mut self, expect: TokenKind) -> Result<Token> {
        let token = self.advance()?;
        if token.kind == expect {
            return Ok(token);
        }
        let error = if token.is_eof() {
            Error::UnexpectedEof {
                expected: Expected::Token(expect),
            }
        } else {
            Error::Unexpected {
                expected: expect,
                actual: token.kind,
            }
        };
        Err(token.wrap(error))
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn trace(&mut self, rule: &'static str, token: &Token) {
        if let Some(hook) = self.trace.as_mut() {
            hook(&Trace {
                rule,
                depth: self.depth,
                token,
            });
        }
    }

    /// Traces the rule with the next token, if tracing is enabled.
    fn trace_next(&mut self, rule: &'static str) -> Result<()> {
        let Some(hook) = self.trace.as_mut() else {
            return Ok(());
        };
        let token = self.lexer.peek_token()?;
        hook(&Trace {
            rule,
            depth: self.depth,
            token,
        });
        Ok(())
    }
}

fn no_prefix_rule(token: Token) -> ParseError {
    let error = if token.is_eof() {
        Error::UnexpectedEof {
            expected: Expected::Expression,
        }
    } else {
        Error::NoPrefixRule { kind: token.kind }
    };
    token.wrap(error)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    /// `==`, `!=`
    Equals,
    /// `<`, `>`
    LessGreater,
    /// `+`, `-`
    Sum,
    /// `*`, `/`
    Product,
    /// Unary `-`, `!`
    Prefix,
}

type PrefixFn = for<'p, 'src> fn(&'p mut Parser<'src>, Token) -> Result<Expr>;

type InfixFn = for<'p, 'src> fn(&'p mut Parser<'src>, Expr, Token, InfixRule) -> Result<Expr>;

#[derive(Copy, Clone)]
struct InfixRule {
    op: InfixOperator,
    precedence: Precedence,
    parse: InfixFn,
}

struct Rules {
    prefix: HashMap<TokenKind, PrefixFn>,
    infix: HashMap<TokenKind, InfixRule>,
}

static RULES: LazyLock<Rules> = LazyLock::new(Rules::new);

impl Rules {
    fn new() -> Rules {
        use InfixOperator as Op;

        let mut rules = Rules {
            prefix: HashMap::new(),
            infix: HashMap::new(),
        };

        rules.prefix(TokenKind::Ident, parse_ident);
        rules.prefix(TokenKind::Int, parse_int);
        rules.prefix(TokenKind::Sub, parse_neg);
        rules.prefix(TokenKind::Not, parse_not);

        rules.infix(TokenKind::Eq, Op::Eq, Precedence::Equals);
        rules.infix(TokenKind::NotEq, Op::NotEq, Precedence::Equals);
        rules.infix(TokenKind::Lt, Op::Lt, Precedence::LessGreater);
        rules.infix(TokenKind::Gt, Op::Gt, Precedence::LessGreater);
        rules.infix(TokenKind::Add, Op::Add, Precedence::Sum);
        rules.infix(TokenKind::Sub, Op::Sub, Precedence::Sum);
        rules.infix(TokenKind::Mul, Op::Mul, Precedence::Product);
        rules.infix(TokenKind::Div, Op::Div, Precedence::Product);

        rules
    }

    fn prefix(&mut self, kind: TokenKind, parse: PrefixFn) {
        let previous = self.prefix.insert(kind, parse);
        debug_assert!(previous.is_none(), "duplicate prefix rule for {kind}");
    }

    fn infix(&mut self, kind: TokenKind, op: InfixOperator, precedence: Precedence) {
        let rule = InfixRule {
            op,
            precedence,
            parse: parse_infix,
        };
        let previous = self.infix.insert(kind, rule);
        debug_assert!(previous.is_none(), "duplicate infix rule for {kind}");
    }
}

fn parse_ident(_: &mut Parser<'_>, token: Token) -> Result<Expr> {
    Ok(Expr {
        kind: ExprKind::Ident(token.lexeme.clone()),
        token,
    })
}

fn parse_int(_: &mut Parser<'_>, token: Token) -> Result<Expr> {
    debug_assert!(token.value.is_some(), "int token without a value");
    Ok(Expr {
        kind: ExprKind::Int(token.value.unwrap_or_default()),
        token,
    })
}

fn parse_neg(p: &mut Parser<'_>, token: Token) -> Result<Expr> {
    parse_prefix(p, token, PrefixOperator::Neg)
}

fn parse_not(p: &mut Parser<'_>, token: Token) -> Result<Expr> {
    parse_prefix(p, token, PrefixOperator::Not)
}

fn parse_prefix(p: &mut Parser<'_>, token: Token, op: PrefixOperator) -> Result<Expr> {
    let operand = p.parse_expr_prec(Precedence::Prefix)?;
    Ok(Expr {
        kind: ExprKind::Prefix {
            op,
            operand: Box::new(operand),
        },
        token,
    })
}

fn parse_infix(
    p: &mut Parser<'_>,
    lhs: Expr,
    token: Token,
    InfixRule { op, precedence, .. }: InfixRule,
) -> Result<Expr> {
    // Parse the right operand at the operator's own precedence, so that
    // operators of the same level fold to the left.
    let rhs = p.parse_expr_prec(precedence)?;
    Ok(Expr {
        kind: ExprKind::Infix {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        token,
    })
}

/// A grammar rule entry, reported to the hook installed with
/// [`Parser::with_trace`].
pub struct Trace<'t> {
    pub rule: &'static str,
    pub depth: usize,
    /// The next token for statement and expression rules, the consumed token
    /// for `prefix` and `infix`.
    pub token: &'t Token,
}

impl fmt::Display for Trace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Trace { rule, depth, token } = self;
        write!(
            f,
            "{:width$}{rule} {} {}",
            "",
            token.kind,
            token.span,
            width = depth * 2
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Unexpected {
        expected: TokenKind,
        actual: TokenKind,
    },
    NoPrefixRule {
        kind: TokenKind,
    },
    UnexpectedEof {
        expected: Expected,
    },
    NestingTooDeep {
        limit: usize,
    },
    Lexer(lexer::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    Expression,
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        error.map(Error::Lexer)
    }
}


#[cfg(test)]
mod tests {
    use std::{cell::RefCell, fs, rc::Rc};

    use super::{test_utils::*, *};
    use crate::{
        token::Span,
        util::{
            fmt::tree::print_shape_string,
            test_utils::tree_tests,
        },
    };
    use pretty_assertions::assert_eq;

    tree_tests!(
        use parser;

        fn test_let_stmt() {
            let program = "let x = 5;";
            let tree_ok = "
                let x (1:1)
                  int 5 (1:9)
            ";
            let source_ok = "let x = 5;";
        }

        fn test_return_stmt() {
            let program = "return 5;";
            let tree_ok = "
                return (1:1)
                  int 5 (1:8)
            ";
            let source_ok = "return 5;";
        }

        fn test_expr_stmts() {
            let program = "foo;\n5;\n-bar;\n!baz;\n";
            let tree_ok = "
                expr (1:1)
                  ident foo (1:1)
                expr (2:1)
                  int 5 (2:1)
                expr (3:1)
                  prefix Neg (3:1)
                    ident bar (3:2)
                expr (4:1)
                  prefix Not (4:1)
                    ident baz (4:2)
            ";
            let source_ok = "foo;\n5;\n-bar;\n!baz;";
        }

        fn test_optional_semicolons() {
            let program = "let a = 1 return a b";
            let tree_ok = "
                let a (1:1)
                  int 1 (1:9)
                return (1:11)
                  ident a (1:18)
                expr (1:20)
                  ident b (1:20)
            ";
            let source_ok = "let a = 1;\nreturn a;\nb;";
        }

        fn test_empty_program() {
            let program = "  \n\t ";
            let tree_ok = "";
            let source_ok = "";
        }

        fn test_prefix_binds_tighter_than_sum() {
            let program = "-a + b";
            let tree_ok = "
                expr (1:1)
                  infix Add (1:4)
                    prefix Neg (1:1)
                      ident a (1:2)
                    ident b (1:6)
            ";
        }

        fn test_product_binds_tighter_than_sum() {
            let program = "a + b * c";
            let tree_ok = "
                expr (1:1)
                  infix Add (1:3)
                    ident a (1:1)
                    infix Mul (1:7)
                      ident b (1:5)
                      ident c (1:9)
            ";
        }

        fn test_left_associative_sum() {
            let program = "a - b - c";
            let tree_ok = "
                expr (1:1)
                  infix Sub (1:7)
                    infix Sub (1:3)
                      ident a (1:1)
                      ident b (1:5)
                    ident c (1:9)
            ";
        }

        fn test_left_associative_product() {
            let program = "a / b * c";
            let tree_ok = "
                expr (1:1)
                  infix Mul (1:7)
                    infix Div (1:3)
                      ident a (1:1)
                      ident b (1:5)
                    ident c (1:9)
            ";
        }

        fn test_comparison_levels() {
            let program = "a < b == c > d != e";
            let tree_ok = "
                expr (1:1)
                  infix NotEq (1:16)
                    infix Eq (1:7)
                      infix Lt (1:3)
                        ident a (1:1)
                        ident b (1:5)
                      infix Gt (1:12)
                        ident c (1:10)
                        ident d (1:14)
                    ident e (1:19)
            ";
        }

        fn test_nested_prefix() {
            let program = "!-x";
            let tree_ok = "
                expr (1:1)
                  prefix Not (1:1)
                    prefix Neg (1:2)
                      ident x (1:3)
            ";
        }

        fn test_let_with_expression() {
            let program = "let total = 1 + 2 * 3 > -4;";
            let tree_ok = "
                let total (1:1)
                  infix Gt (1:23)
                    infix Add (1:15)
                      int 1 (1:13)
                      infix Mul (1:19)
                        int 2 (1:17)
                        int 3 (1:21)
                    prefix Neg (1:25)
                      int 4 (1:26)
            ";
            let source_ok = "let total = 1 + 2 * 3 > -4;";
        }

        fn test_missing_assign() {
            let program = "let x 5;";
            let expected_errors = &["<input>:1:7: expected ASSIGN, but got INT"];
        }

        fn test_let_without_ident() {
            let program = "let 5 = 5;";
            let expected_errors = &["<input>:1:5: expected IDENT, but got INT"];
        }

        fn test_let_keyword_as_name() {
            let program = "let return = 1;";
            let expected_errors = &["<input>:1:5: expected IDENT, but got RETURN"];
        }

        fn test_no_prefix_rule() {
            let program = "let x = ;";
            let expected_errors = &["<input>:1:9: no prefix rule for SEMICOLON"];
        }

        fn test_no_prefix_rule_for_operator() {
            let program = "a + * b";
            let expected_errors = &["<input>:1:5: no prefix rule for MUL"];
        }

        fn test_no_prefix_rule_for_unsupported_keyword() {
            let program = "fn";
            let expected_errors = &["<input>:1:1: no prefix rule for FN"];
        }

        fn test_eof_in_let() {
            let program = "let x =";
            let expected_errors = &["<input>:1:8: unexpected end of input, expected expression"];
        }

        fn test_eof_before_assign() {
            let program = "let x";
            let expected_errors = &["<input>:1:6: unexpected end of input, expected ASSIGN"];
        }

        fn test_eof_after_operator() {
            let program = "1 +\n";
            let expected_errors = &["<input>:2:1: unexpected end of input, expected expression"];
        }

        fn test_eof_after_return() {
            let program = "return";
            let expected_errors = &["<input>:1:7: unexpected end of input, expected expression"];
        }

        fn test_lex_error_surfaces() {
            let program = "let a = 1;\nlet b = a ? 2;";
            let expected_errors = &["<input>:2:11: unexpected character '?'"];
        }

        fn test_int_overflow_surfaces() {
            let program = "return 99999999999999999999;";
            let expected_errors = &["<input>:1:8: integer literal 99999999999999999999 out of range"];
        }
    );

    tree_tests!(
        use parser_expr;

        fn test_single_expr() {
            let expr = "a * b == c;";
            let tree_ok = "
                infix Eq (1:7)
                  infix Mul (1:3)
                    ident a (1:1)
                    ident b (1:5)
                  ident c (1:9)
            ";
        }

        fn test_single_expr_trailing_tokens() {
            let expr = "a b";
            let expected_errors = &["<input>:1:3: expected EOF, but got IDENT"];
        }
    );

    #[test]
    fn test_let_node_contents() {
        let program = parse_program("let x = 5;");
        assert_eq!(program.len(), 1);
        let StmtKind::Let { name, value } = &program.statements[0].kind else {
            panic!("expected let statement");
        };
        assert_eq!(&*name.name, "x");
        assert_eq!(name.token.span, Span::new(1, 5, 1));
        assert_eq!(value.kind, ExprKind::Int(5));
        assert_eq!(value.token.value, Some(5));
    }

    #[test]
    fn test_return_node_contents() {
        let program = parse_program("return 5;");
        assert_eq!(program.len(), 1);
        let stmt = &program.statements[0];
        assert_eq!(stmt.token.kind, TokenKind::Return);
        let StmtKind::Return { value } = &stmt.kind else {
            panic!("expected return statement");
        };
        assert_eq!(value.kind, ExprKind::Int(5));
    }

    #[test]
    fn test_missing_assign_error() {
        let error = parse_error("let x 5;");
        assert!(error.source.is_in_memory());
        assert_eq!(error.span, Span::new(1, 7, 1));
        assert_eq!(
            error.inner,
            Error::Unexpected {
                expected: TokenKind::Assign,
                actual: TokenKind::Int,
            }
        );
    }

    #[test]
    fn test_eof_error_is_distinct() {
        let error = parse_error("let x = 1 +");
        assert_eq!(
            error.inner,
            Error::UnexpectedEof {
                expected: Expected::Expression,
            }
        );
        assert_eq!(error.span, Span::new(1, 12, 0));
    }

    #[test]
    fn test_named_source() {
        let error = parse_named("main.mk", "\n\nreturn ]").unwrap_err();
        assert_eq!(error.to_string(), "main.mk:3:8: no prefix rule for RSQUARE");

        let program = parse_named("main.mk", "x").unwrap();
        assert_eq!(program.statements[0].token.source.as_str(), "main.mk");
    }

    #[test]
    fn test_round_trip() {
        let corpus = [
            "let x = 5;",
            "return 5",
            "foo;\n5;\n-bar;\n!baz;\n",
            "a + b * c - d / e",
            "-a + b",
            "- - a",
            "!!-a",
            "1 - -2",
            "a * -b + !c",
            "a < b == c > d",
            "a != b == c",
            "x == !y",
            "let 丢 = 1 + 2 * 3 - 4 / 5 let y = x return y",
            "let big = 9223372036854775807; return big / 1 / 2 / 3;",
            "a - b - c; a * (b); ",
        ];

        for src in corpus {
            // Grouping is not part of the grammar.
            if src.contains('(') {
                assert!(parse(src).is_err());
                continue;
            }
            assert_round_trip(src);
        }
    }

    #[track_caller]
    fn assert_round_trip(src: &str) {
        let first = parse_program(src);
        let rendered = first.to_string();
        let second = parse(&rendered)
            .unwrap_or_else(|e| panic!("rendering of {src:?} doesn't parse: {e}"));
        assert_eq!(
            print_shape_string(&first),
            print_shape_string(&second),
            "round trip of {src:?}"
        );
        assert_eq!(second.to_string(), rendered, "rendering of {src:?}");
    }

    #[test]
    fn test_round_trip_operator_combinations() {
        const INFIX: [&str; 8] = ["+", "-", "*", "/", "<", ">", "==", "!="];
        const PREFIX: [&str; 3] = ["", "-", "!"];

        for a in INFIX {
            for b in INFIX {
                for pa in PREFIX {
                    for pb in PREFIX {
                        for pc in PREFIX {
                            assert_round_trip(&format!("{pa}a {a} {pb}b {b} {pc}c"));
                        }
                    }
                }
            }
        }

        for a in INFIX {
            for b in INFIX {
                for c in INFIX {
                    assert_round_trip(&format!("a {a} b {b} c {c} d"));
                    assert_round_trip(&format!("-a {a} !b {b} -!c {c} !-d"));
                }
            }
        }
    }

    #[test]
    fn test_deep_prefix_chain() {
        let src = format!("{}x", "-!".repeat(50));
        assert_round_trip(&src);

        let src = format!("{}x", "-".repeat(MAX_NESTING - 1));
        assert_round_trip(&src);
    }

    #[test]
    fn test_nesting_limit() {
        let error = parse_error(&format!("{}x", "-".repeat(MAX_NESTING)));
        assert_eq!(error.inner, Error::NestingTooDeep { limit: MAX_NESTING });
        assert_eq!(error.span, Span::new(1, 129, 1));

        let error = parse_error(&format!("let y = {}x;", "!".repeat(100_000)));
        assert_eq!(
            error.to_string(),
            "<input>:1:137: expression nested more than 128 levels deep"
        );
    }

    #[test]
    fn test_round_trip_bench_fixture() {
        let src = include_str!("../bench/fixtures/big.monkey");
        let first = parse_program(src);
        assert_eq!(first.len(), 600);
        let rendered = first.to_string();
        assert_eq!(rendered, src.trim_end());
        let second = parse_program(&rendered);
        assert_eq!(print_shape_string(&first), print_shape_string(&second));
    }

    #[test]
    fn test_trace_hook() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let program = Parser::new(Lexer::in_memory("let x = -1;"))
            .with_trace(move |t| sink.borrow_mut().push(t.to_string()))
            .parse()
            .unwrap();
        assert_eq!(program.len(), 1);
        assert_eq!(
            *events.borrow(),
            [
                "program LET 1:1",
                "  statement LET 1:1",
                "    let LET 1:1",
                "    expression SUB 1:9",
                "      prefix SUB 1:9",
                "      expression INT 1:10",
                "        prefix INT 1:10",
            ]
        );
    }

    #[test]
    fn test_parse_file() {
        let path = std::env::temp_dir().join(format!("monkey-parser-{}.mk", std::process::id()));
        fs::write(&path, "let a = 1;\nreturn a + 2;\n").unwrap();
        let program = parse_file(&path).unwrap();
        assert_eq!(program.to_string(), "let a = 1;\nreturn a + 2;");

        fs::write(&path, "let a = 1;\nlet = 2;\n").unwrap();
        let error = parse_file(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        let error = match error {
            crate::Error::Parse(error) => error,
            other => panic!("expected a parse error, got {other:?}"),
        };
        assert_eq!(error.source, SourceName::from_path(&path));
        assert_eq!(error.span, Span::new(2, 5, 1));
    }

    #[test]
    fn test_trace_file_parse() {
        let path = std::env::temp_dir().join(format!("monkey-trace-{}.mk", std::process::id()));
        fs::write(&path, "x\n").unwrap();
        let lexer = Lexer::open(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let mut events = Vec::new();
        let program = Parser::new(lexer)
            .with_trace(|t| events.push(t.to_string()))
            .parse()
            .unwrap();
        assert_eq!(program.to_string(), "x;");
        assert_eq!(
            events,
            [
                "program IDENT 1:1",
                "  statement IDENT 1:1",
                "    expression IDENT 1:1",
                "      prefix IDENT 1:1",
            ]
        );
    }

    #[test]
    fn test_parse_missing_file() {
        let path = std::env::temp_dir().join("monkey-parser-does-not-exist.mk");
        let error = parse_file(&path).unwrap_err();
        assert!(matches!(error, crate::Error::Io { .. }));
    }

    #[test]
    fn test_independent_parsers_on_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| std::thread::spawn(move || parse(&format!("let x{i} = {i} * 2;")).unwrap()))
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let program = handle.join().unwrap();
            assert_eq!(program.to_string(), format!("let x{i} = {i} * 2;"));
        }
    }
}
