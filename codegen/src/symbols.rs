// Symbol collection pre-pass: every global slot and external callee a program
// touches, in sorted order so both backends print them deterministically.

use crate::error::CodegenError;
use model::{Condition, Operand, Program, Stmt};
use std::collections::BTreeSet;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Symbols {
    pub variables: BTreeSet<String>,
    pub callees: BTreeSet<String>,
}

impl Symbols {
    pub fn collect(program: &Program) -> Result<Self, CodegenError> {
        let mut symbols = Self::default();
        symbols.visit_block(&program.statements);
        for name in symbols.variables.iter().chain(&symbols.callees) {
            if !is_identifier(name) {
                return Err(CodegenError::InvalidSymbol { name: name.clone() });
            }
        }
        Ok(symbols)
    }

    fn visit_block(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            match stmt {
                Stmt::Declaration(decl) => {
                    self.variables.insert(decl.name.identifier.clone());
                    self.visit_operand(&decl.value);
                }
                Stmt::If(if_stmt) => {
                    self.visit_condition(&if_stmt.condition);
                    self.visit_block(&if_stmt.body);
                }
                Stmt::FunctionCall(call) => {
                    self.callees.insert(call.name.clone());
                    self.visit_operand(&call.argument);
                }
            }
        }
    }

    fn visit_condition(&mut self, cond: &Condition) {
        self.visit_operand(&cond.left);
        self.visit_operand(&cond.right);
    }

    fn visit_operand(&mut self, operand: &Operand) {
        if let Operand::Name(name) = operand {
            self.variables.insert(name.identifier.clone());
        }
    }
}

/// Source names are `[a-z]+`. Generated labels (`var_x`, `end_if_0`,
/// `_start`) all contain an underscore, so a valid name never collides with one.
fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase())
}
