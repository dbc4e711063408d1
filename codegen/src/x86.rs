// X86-64 register and instruction definitions (NASM syntax)
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum X86Reg {
    Rax, Rdi, Rsp, Rbp,
    Xmm0, Xmm1, Xmm2, Xmm3, Xmm4, Xmm5, Xmm6, Xmm7, // SSE float registers
}

impl X86Reg {
    pub fn to_str(&self) -> &str {
        match self {
            Self::Rax => "rax", Self::Rdi => "rdi", Self::Rsp => "rsp", Self::Rbp => "rbp",
            Self::Xmm0 => "xmm0", Self::Xmm1 => "xmm1", Self::Xmm2 => "xmm2", Self::Xmm3 => "xmm3",
            Self::Xmm4 => "xmm4", Self::Xmm5 => "xmm5", Self::Xmm6 => "xmm6", Self::Xmm7 => "xmm7",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum X86Operand {
    Reg(X86Reg),
    Imm(i64),
    /// Bit pattern of a double, written as a 64-bit hex immediate
    F64(f64),
    /// RIP-relative 64-bit memory slot: qword [label]
    Mem(String),
}

impl fmt::Display for X86Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reg(r) => f.write_str(r.to_str()),
            Self::Imm(i) => write!(f, "{}", i),
            Self::F64(v) => write!(f, "0x{:016X}", v.to_bits()),
            Self::Mem(label) => write!(f, "qword [{}]", label),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum X86Instr {
    Mov(X86Operand, X86Operand),
    Movq(X86Operand, X86Operand), // GPR <-> XMM bit copy
    Ucomisd(X86Operand, X86Operand), // Unordered compare of scalar doubles
    And(X86Operand, X86Operand),
    Xor(X86Operand, X86Operand),
    Jcc(String, String),
    Push(X86Reg),
    Pop(X86Reg),
    Call(String),
    Label(String),
    Syscall,
}

/// NASM treats a leading `$` as "identifier, not keyword", so callees may
/// share a name with a register or mnemonic.
fn symbol(name: &str) -> String {
    format!("${}", name)
}

/// emit_asm converts X86 instructions to NASM assembly
pub fn emit_asm(instructions: &[X86Instr]) -> String {
    use fmt::Write;
    let mut s = String::new();
    for instr in instructions {
        match instr {
            X86Instr::Label(l) => { let _ = writeln!(s, "{}:", l); }
            X86Instr::Mov(d, src) => { let _ = writeln!(s, "  mov {}, {}", d, src); }
            X86Instr::Movq(d, src) => { let _ = writeln!(s, "  movq {}, {}", d, src); }
            X86Instr::Ucomisd(l, r) => { let _ = writeln!(s, "  ucomisd {}, {}", l, r); }
            X86Instr::And(d, src) => { let _ = writeln!(s, "  and {}, {}", d, src); }
            X86Instr::Xor(d, src) => { let _ = writeln!(s, "  xor {}, {}", d, src); }
            X86Instr::Jcc(c, l) => { let _ = writeln!(s, "  j{} {}", c, l); }
            X86Instr::Push(r) => { let _ = writeln!(s, "  push {}", r.to_str()); }
            X86Instr::Pop(r) => { let _ = writeln!(s, "  pop {}", r.to_str()); }
            X86Instr::Call(name) => { let _ = writeln!(s, "  call {}", symbol(name)); }
            X86Instr::Syscall => s.push_str("  syscall\n"),
        }
    }
    s
}

/// Symbol used in `extern` directives for a callee
pub fn extern_symbol(name: &str) -> String {
    symbol(name)
}
