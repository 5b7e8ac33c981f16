use crate::{
    parser,
    util::fmt::tree::{print_expr_string, print_program_string},
};

/// Each variant contains the input.
pub enum Test {
    ParserProgram(&'static str),
    ParserExpr(&'static str),
}

pub enum Assertion {
    TreeOk(&'static str),
    SourceOk(&'static str),
    ExpectedErrors(&'static [&'static str]),
}

/// The formatted outcome of a test input: the printed tree, the canonical
/// rendering (both empty on failure), and the error messages.
pub struct Outcome {
    pub tree: String,
    pub source: String,
    pub errors: Vec<String>,
}

#[track_caller]
pub fn run_pipeline(test: Test) -> Outcome {
    match test {
        Test::ParserProgram(input) => match parser::parse(input) {
            Ok(program) => Outcome {
                tree: print_program_string(&program),
                source: program.to_string(),
                errors: vec![],
            },
            Err(error) => Outcome::failed(error.to_string()),
        },
        Test::ParserExpr(input) => match parser::parse_expr(input) {
            Ok(expr) => Outcome {
                tree: print_expr_string(&expr),
                source: expr.to_string(),
                errors: vec![],
            },
            Err(error) => Outcome::failed(error.to_string()),
        },
    }
}

impl Outcome {
    fn failed(error: String) -> Outcome {
        Outcome {
            tree: String::new(),
            source: String::new(),
            errors: vec![error],
        }
    }
}

#[track_caller]
pub fn run_assertion(assertion: Assertion, actual: &Outcome) {
    match assertion {
        Assertion::TreeOk(expected_tree) => {
            let expected_errors: &[&str] = &[];
            ::pretty_assertions::assert_eq!(actual.errors, expected_errors);
            ::pretty_assertions::assert_eq!(actual.tree.trim(), expected_tree.trim());
        }
        Assertion::SourceOk(expected_source) => {
            ::pretty_assertions::assert_eq!(actual.source, expected_source);
        }
        Assertion::ExpectedErrors(expected_errors) => {
            ::pretty_assertions::assert_eq!(actual.errors, expected_errors);
        }
    }
}

macro_rules! tree_tests {
    (
        use $test_kind:ident;

        $(
            fn $test_name:ident() {
                let $source_kind:ident = $source:expr;
                $($assertions_tt:tt)*
            }
        )*
    ) => {
        $(
            #[test]
            fn $test_name() {
                let test: crate::util::test_utils::Test =
                    tree_tests!(@@get_test($test_kind, $source_kind), $source);
                let outcome = crate::util::test_utils::run_pipeline(test);
                tree_tests!(@@expand_assertions, &outcome, [$($assertions_tt)*]);
            }
        )*
    };

    (@@expand_assertions, $outcome:expr, []) => {};
    (@@expand_assertions, $outcome:expr, [
        let $assertion:ident = $assertion_expected:expr;
        $($rest_assertions_tt:tt)*
    ]) => {
        crate::util::test_utils::run_assertion(
            tree_tests!(@@assertion, $assertion, $assertion_expected),
            $outcome,
        );
        tree_tests!(@@expand_assertions, $outcome, [$($rest_assertions_tt)*]);
    };

    (@@assertion, tree_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::TreeOk(::indoc::indoc! { $expected })
    };
    (@@assertion, source_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::SourceOk($expected)
    };
    (@@assertion, expected_errors, $expected:expr) => {
        crate::util::test_utils::Assertion::ExpectedErrors($expected)
    };

    (@@get_test(parser, program), $source:expr) => {
        crate::util::test_utils::Test::ParserProgram($source)
    };
    (@@get_test(parser_expr, expr), $source:expr) => {
        crate::util::test_utils::Test::ParserExpr($source)
    };
}
pub(crate) use tree_tests;
