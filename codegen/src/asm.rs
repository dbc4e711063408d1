// NASM x86-64 backend: globals live in .bss, every value passes through rax
// and comparisons run on the SSE unit.

use crate::Emitter;
use crate::calling_convention::CallingConvention;
use crate::symbols::Symbols;
use crate::x86::{X86Instr, X86Operand, X86Reg, emit_asm, extern_symbol};
use model::{CompareOp, Condition, Declaration, FunctionCall, Operand};

/// Process entry point; no libc start-up code is linked
pub(crate) const ENTRY: &str = "_start";

const SYS_EXIT: i64 = 60;

fn var_slot(name: &str) -> String {
    format!("var_{}", name)
}

pub(crate) struct AsmEmitter<C: CallingConvention> {
    convention: C,
    body: Vec<X86Instr>,
    next_label: usize,
}

impl<C: CallingConvention> AsmEmitter<C> {
    pub(crate) fn new(convention: C) -> Self {
        Self {
            convention,
            body: Vec::new(),
            next_label: 0,
        }
    }

    fn load_rax(&mut self, operand: &Operand) {
        let src = match operand {
            Operand::Number(n) => X86Operand::F64(n.value),
            Operand::Name(name) => X86Operand::Mem(var_slot(&name.identifier)),
        };
        self.body.push(X86Instr::Mov(X86Operand::Reg(X86Reg::Rax), src));
    }

    fn load_xmm(&mut self, reg: X86Reg, operand: &Operand) {
        self.load_rax(operand);
        self.body.push(X86Instr::Movq(X86Operand::Reg(reg), X86Operand::Reg(X86Reg::Rax)));
    }

    fn jump(&mut self, cc: &str, label: &str) {
        self.body.push(X86Instr::Jcc(cc.to_string(), label.to_string()));
    }
}

impl<C: CallingConvention> Emitter for AsmEmitter<C> {
    /// The comparison lives in EFLAGS; the operator picks the branch
    type Comparison = CompareOp;
    /// Label closing the conditional
    type Block = String;

    fn declaration(&mut self, decl: &Declaration) {
        self.load_rax(&decl.value);
        self.body.push(X86Instr::Mov(
            X86Operand::Mem(var_slot(&decl.name.identifier)),
            X86Operand::Reg(X86Reg::Rax),
        ));
    }

    fn condition(&mut self, cond: &Condition) -> CompareOp {
        // a < b is tested as b > a so unordered operands take the false path
        let (first, second) = match cond.op {
            CompareOp::Less | CompareOp::LessEqual => (&cond.right, &cond.left),
            _ => (&cond.left, &cond.right),
        };
        self.load_xmm(X86Reg::Xmm0, first);
        self.load_xmm(X86Reg::Xmm1, second);
        self.body.push(X86Instr::Ucomisd(
            X86Operand::Reg(X86Reg::Xmm0),
            X86Operand::Reg(X86Reg::Xmm1),
        ));
        cond.op
    }

    fn begin_if(&mut self, op: CompareOp) -> String {
        let n = self.next_label;
        self.next_label += 1;
        let end = format!("end_if_{}", n);

        // Unordered sets ZF, PF and CF
        match op {
            CompareOp::Greater | CompareOp::Less => self.jump("be", &end),
            CompareOp::GreaterEqual | CompareOp::LessEqual => self.jump("b", &end),
            CompareOp::Equal => {
                self.jump("ne", &end);
                self.jump("p", &end);
            }
            CompareOp::NotEqual => {
                let body = format!("if_body_{}", n);
                self.jump("p", &body);
                self.jump("e", &end);
                self.body.push(X86Instr::Label(body));
            }
        }
        end
    }

    fn end_if(&mut self, end: String) {
        self.body.push(X86Instr::Label(end));
    }

    fn function_call(&mut self, call: &FunctionCall) {
        let arg_reg = self.convention.float_param_regs()[0];
        let frame = self.convention.frame_reg();
        let alignment = self.convention.stack_alignment();

        self.load_xmm(arg_reg, &call.argument);
        self.body.extend([
            X86Instr::Push(frame),
            X86Instr::Mov(X86Operand::Reg(frame), X86Operand::Reg(X86Reg::Rsp)),
            X86Instr::And(X86Operand::Reg(X86Reg::Rsp), X86Operand::Imm(-alignment)),
            X86Instr::Call(call.name.clone()),
            X86Instr::Mov(X86Operand::Reg(X86Reg::Rsp), X86Operand::Reg(frame)),
            X86Instr::Pop(frame),
        ]);
    }

    fn finish(self, symbols: &Symbols) -> String {
        let mut output = String::new();
        output.push_str("bits 64\ndefault rel\n\n");
        output.push_str(&format!("global {}\n", ENTRY));
        for callee in &symbols.callees {
            output.push_str(&format!("extern {}\n", extern_symbol(callee)));
        }

        if !symbols.variables.is_empty() {
            output.push_str("\nsection .bss\n");
            for var in &symbols.variables {
                output.push_str(&format!("{}: resq 1\n", var_slot(var)));
            }
        }

        output.push_str("\nsection .text\n");
        let mut text = Vec::with_capacity(self.body.len() + 4);
        text.push(X86Instr::Label(ENTRY.to_string()));
        text.extend(self.body);
        text.extend([
            X86Instr::Mov(X86Operand::Reg(X86Reg::Rax), X86Operand::Imm(SYS_EXIT)),
            X86Instr::Xor(X86Operand::Reg(X86Reg::Rdi), X86Operand::Reg(X86Reg::Rdi)),
            X86Instr::Syscall,
        ]);
        output.push_str(&emit_asm(&text));
        output
    }
}
