use std::io::Write;

use crate::ast::*;

const INDENT_WIDTH: usize = 2;

/// Prints the program tree, one node per line, with `line:column` positions.
pub fn print_program_string(program: &Program) -> String {
    print_to_string(|w| print_program(w, program, Positions::Show))
}

/// Prints the program tree without positions, so that programs with the same
/// structure print the same.
pub fn print_shape_string(program: &Program) -> String {
    print_to_string(|w| print_program(w, program, Positions::Hide))
}

pub fn print_expr_string(expr: &Expr) -> String {
    print_to_string(|w| print_expr(w, 0, expr, Positions::Show))
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Positions {
    Show,
    Hide,
}

fn print_to_string(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
    let mut buf = Vec::with_capacity(1024);
    f(&mut buf).expect("writing to a Vec can't fail");
    String::from_utf8(buf).expect("the tree is printed from valid UTF-8")
}

pub fn print_program(w: &mut impl Write, program: &Program, p: Positions) -> std::io::Result<()> {
    for stmt in &program.statements {
        print_stmt(w, 0, stmt, p)?;
    }
    Ok(())
}

fn print_stmt(w: &mut impl Write, i: usize, stmt: &Stmt, p: Positions) -> std::io::Result<()> {
    sp(w, i)?;
    match &stmt.kind {
        StmtKind::Let { name, value } => {
            write!(w, "let {name}")?;
            pos(w, stmt, p)?;
            print_expr(w, i + 1, value, p)?;
        }
        StmtKind::Return { value } => {
            write!(w, "return")?;
            pos(w, stmt, p)?;
            print_expr(w, i + 1, value, p)?;
        }
        StmtKind::Expr(expr) => {
            write!(w, "expr")?;
            pos(w, stmt, p)?;
            print_expr(w, i + 1, expr, p)?;
        }
    }
    Ok(())
}

pub fn print_expr(w: &mut impl Write, i: usize, expr: &Expr, p: Positions) -> std::io::Result<()> {
    sp(w, i)?;
    match &expr.kind {
        ExprKind::Ident(name) => {
            write!(w, "ident {name}")?;
            pos(w, expr, p)?;
        }
        ExprKind::Int(value) => {
            write!(w, "int {value}")?;
            pos(w, expr, p)?;
        }
        ExprKind::Prefix { op, operand } => {
            write!(w, "prefix {op:?}")?;
            pos(w, expr, p)?;
            print_expr(w, i + 1, operand, p)?;
        }
        ExprKind::Infix { op, lhs, rhs } => {
            write!(w, "infix {op:?}")?;
            pos(w, expr, p)?;
            print_expr(w, i + 1, lhs, p)?;
            print_expr(w, i + 1, rhs, p)?;
        }
    }
    Ok(())
}

/// Ends the node's line, with its position if requested.
fn pos(w: &mut impl Write, node: &impl Node, p: Positions) -> std::io::Result<()> {
    match p {
        Positions::Show => writeln!(w, " ({})", node.span()),
        Positions::Hide => writeln!(w),
    }
}

fn sp(w: &mut impl Write, i: usize) -> std::io::Result<()> {
    write!(w, "{:width$}", "", width = i * INDENT_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::test_utils::parse_program;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shape_ignores_positions() {
        let compact = parse_program("let a=-b*c");
        let spaced = parse_program("\n\n  let   a =\n - b  *  c ;");
        assert_ne!(print_program_string(&compact), print_program_string(&spaced));
        assert_eq!(print_shape_string(&compact), print_shape_string(&spaced));
        assert_eq!(
            print_shape_string(&compact),
            indoc! {"
                let a
                  infix Mul
                    prefix Neg
                      ident b
                    ident c
            "}
        );
    }

    #[test]
    fn test_shape_differs_on_structure() {
        let left = parse_program("a - b - c");
        let right = parse_program("a - b * c");
        assert_ne!(print_shape_string(&left), print_shape_string(&right));
    }
}
