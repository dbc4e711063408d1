// LLVM IR backend: builds an `ir::Module` with a single `main` function and
// prints it.

use crate::Emitter;
use crate::symbols::Symbols;
use ir::{BlockId, FloatPredicate, FunctionBuilder, Instruction, Module, Terminator, VarId};
use model::{CompareOp, Condition, Declaration, FunctionCall, Operand};

/// Name of the generated function, called by the C runtime
pub(crate) const ENTRY: &str = "main";

fn global_slot(name: &str) -> String {
    format!("var.{}", name)
}

fn predicate(op: CompareOp) -> FloatPredicate {
    match op {
        CompareOp::Equal => FloatPredicate::Oeq,
        CompareOp::NotEqual => FloatPredicate::Une,
        CompareOp::Greater => FloatPredicate::Ogt,
        CompareOp::GreaterEqual => FloatPredicate::Oge,
        CompareOp::Less => FloatPredicate::Olt,
        CompareOp::LessEqual => FloatPredicate::Ole,
    }
}

pub(crate) struct IrEmitter {
    module_name: String,
    builder: FunctionBuilder,
    next_label: usize,
}

impl IrEmitter {
    pub(crate) fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            builder: FunctionBuilder::new(ENTRY),
            next_label: 0,
        }
    }

    fn load(&mut self, name: &str) -> ir::Operand {
        let dest = self.builder.new_var();
        self.builder.add_instruction(Instruction::Load { dest, global: global_slot(name) });
        ir::Operand::Var(dest)
    }

    fn value_of(&mut self, operand: &Operand) -> ir::Operand {
        match operand {
            Operand::Number(n) => ir::Operand::Constant(n.value),
            Operand::Name(name) => self.load(&name.identifier),
        }
    }
}

impl Emitter for IrEmitter {
    type Comparison = VarId;
    /// Join block the conditional converges on
    type Block = BlockId;

    fn declaration(&mut self, decl: &Declaration) {
        let src = match &decl.value {
            Operand::Number(n) => {
                // -0.0 is the additive identity for every double, +0.0 is not
                let dest = self.builder.new_var();
                self.builder.add_instruction(Instruction::FAdd {
                    dest,
                    left: ir::Operand::Constant(-0.0),
                    right: ir::Operand::Constant(n.value),
                });
                ir::Operand::Var(dest)
            }
            Operand::Name(name) => self.load(&name.identifier),
        };
        self.builder.add_instruction(Instruction::Store {
            src,
            global: global_slot(&decl.name.identifier),
        });
    }

    fn condition(&mut self, cond: &Condition) -> VarId {
        let left = self.value_of(&cond.left);
        let right = self.value_of(&cond.right);
        let dest = self.builder.new_var();
        self.builder.add_instruction(Instruction::FCmp {
            dest,
            predicate: predicate(cond.op),
            left,
            right,
        });
        dest
    }

    fn begin_if(&mut self, cond: VarId) -> BlockId {
        let n = self.next_label;
        self.next_label += 1;
        let then_block = self.builder.new_block(format!("if.then.{}", n));
        let end_block = self.builder.new_block(format!("if.end.{}", n));
        self.builder.terminate(Terminator::CondBr {
            cond,
            then_block,
            else_block: end_block,
        });
        self.builder.switch_to(then_block);
        end_block
    }

    fn end_if(&mut self, end_block: BlockId) {
        self.builder.terminate(Terminator::Br(end_block));
        self.builder.switch_to(end_block);
    }

    fn function_call(&mut self, call: &FunctionCall) {
        let arg = self.value_of(&call.argument);
        self.builder.add_instruction(Instruction::Call {
            callee: call.name.clone(),
            args: vec![arg],
        });
    }

    fn finish(mut self, symbols: &Symbols) -> String {
        self.builder.terminate(Terminator::Ret(0));
        let module = Module {
            name: self.module_name,
            globals: symbols.variables.iter().map(|v| global_slot(v)).collect(),
            declarations: symbols.callees.iter().cloned().collect(),
            functions: vec![self.builder.finish()],
        };
        module.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Name;

    fn instructions(emitter: IrEmitter) -> Vec<String> {
        let func = emitter.builder.finish();
        func.blocks[0].instructions.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn every_operator_has_its_own_predicate() {
        let ops = [
            CompareOp::Equal,
            CompareOp::NotEqual,
            CompareOp::Greater,
            CompareOp::GreaterEqual,
            CompareOp::Less,
            CompareOp::LessEqual,
        ];
        let preds: Vec<_> = ops.iter().map(|op| predicate(*op).as_str()).collect();
        assert_eq!(preds, ["oeq", "une", "ogt", "oge", "olt", "ole"]);
    }

    #[test]
    fn declaration_of_number_materializes_then_stores() {
        let mut e = IrEmitter::new("t");
        e.declaration(&Declaration { name: Name::new("x"), value: Operand::number(3.0) });
        assert_eq!(
            instructions(e),
            [
                "%t0 = fadd double 0x8000000000000000, 0x4008000000000000",
                "store double %t0, ptr @var.x",
            ]
        );
    }

    #[test]
    fn declaration_of_name_loads_then_stores() {
        let mut e = IrEmitter::new("t");
        e.declaration(&Declaration { name: Name::new("x"), value: Operand::name("y") });
        assert_eq!(instructions(e), ["%t0 = load double, ptr @var.y", "store double %t0, ptr @var.x"]);
    }

    #[test]
    fn condition_loads_names_and_inlines_numbers() {
        let mut e = IrEmitter::new("t");
        let cond = e.condition(&Condition {
            left: Operand::number(1.0),
            op: CompareOp::LessEqual,
            right: Operand::name("b"),
        });
        assert_eq!(cond, VarId(1));
        assert_eq!(
            instructions(e),
            ["%t0 = load double, ptr @var.b", "%t1 = fcmp ole double 0x3FF0000000000000, %t0"]
        );
    }

    #[test]
    fn conditional_branches_to_then_and_join() {
        let mut e = IrEmitter::new("t");
        let end = e.begin_if(VarId(0));
        e.end_if(end);
        let func = e.builder.finish();
        let labels: Vec<_> = func.blocks.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["entry", "if.then.0", "if.end.0"]);
        assert_eq!(
            func.blocks[0].terminator,
            Terminator::CondBr { cond: VarId(0), then_block: BlockId(1), else_block: BlockId(2) }
        );
        assert_eq!(func.blocks[1].terminator, Terminator::Br(BlockId(2)));
    }
}
