// Source-level rendering of the AST. The output lexes and parses back to an
// equal tree when every number is a non-negative integer.

use crate::{CompareOp, Condition, Operand, Program, Stmt};
use std::fmt;

const INDENT: &str = "    ";

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Name(name) => f.write_str(&name.identifier),
            // f64's Display drops the fractional part of integral values
            Operand::Number(number) => write!(f, "{}", number.value),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    match stmt {
        Stmt::Declaration(decl) => writeln!(f, "{}val {} = {}", pad, decl.name.identifier, decl.value),
        Stmt::FunctionCall(call) => writeln!(f, "{}{}({})", pad, call.name, call.argument),
        Stmt::If(if_stmt) => {
            writeln!(f, "{}if {} {{", pad, if_stmt.condition)?;
            for inner in &if_stmt.body {
                write_stmt(f, inner, depth + 1)?;
            }
            writeln!(f, "{}}}", pad)
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write_stmt(f, stmt, 0)?;
        }
        Ok(())
    }
}
