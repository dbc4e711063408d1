// Calling convention used for external calls from generated assembly
use crate::x86::X86Reg;

/// Trait describing how a call passes its arguments
pub trait CallingConvention {
    /// Registers used for floating-point parameters (in order)
    fn float_param_regs(&self) -> &'static [X86Reg];

    /// Required stack alignment at the call instruction (in bytes)
    fn stack_alignment(&self) -> i64;

    /// Callee-saved register that holds the unaligned stack pointer across a call
    fn frame_reg(&self) -> X86Reg;
}

/// System V AMD64 ABI (Linux, BSD)
pub struct SystemVConvention;

impl CallingConvention for SystemVConvention {
    fn float_param_regs(&self) -> &'static [X86Reg] {
        &[X86Reg::Xmm0, X86Reg::Xmm1, X86Reg::Xmm2, X86Reg::Xmm3,
          X86Reg::Xmm4, X86Reg::Xmm5, X86Reg::Xmm6, X86Reg::Xmm7]
    }

    fn stack_alignment(&self) -> i64 {
        16
    }

    fn frame_reg(&self) -> X86Reg {
        X86Reg::Rbp
    }
}
