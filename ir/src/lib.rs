// LLVM IR text model: just enough of the IR to express straight-line stores,
// float comparisons, direct calls and two-way branches.

mod builder;

pub use builder::FunctionBuilder;

use std::fmt;

/// SSA temporary, printed as `%t<n>`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

/// Index of a basic block inside its function
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub usize);

/// A `double`-typed value
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Constant(f64),
    Var(VarId),
}

/// Ordered `fcmp` predicates (false when either side is NaN), except `une`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FloatPredicate {
    Oeq,
    Une,
    Ogt,
    Oge,
    Olt,
    Ole,
}

impl FloatPredicate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oeq => "oeq",
            Self::Une => "une",
            Self::Ogt => "ogt",
            Self::Oge => "oge",
            Self::Olt => "olt",
            Self::Ole => "ole",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `%dest = load double, ptr @global`
    Load { dest: VarId, global: String },
    /// `store double src, ptr @global`
    Store { src: Operand, global: String },
    /// `%dest = fadd double left, right`
    FAdd { dest: VarId, left: Operand, right: Operand },
    /// `%dest = fcmp pred double left, right`
    FCmp {
        dest: VarId,
        predicate: FloatPredicate,
        left: Operand,
        right: Operand,
    },
    /// `call void @callee(double args...)`
    Call { callee: String, args: Vec<Operand> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
    Br(BlockId),
    CondBr {
        cond: VarId,
        then_block: BlockId,
        else_block: BlockId,
    },
    Ret(i32),
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub id: BlockId,
    pub label: String,
    pub instructions: Vec<Instruction>,
    pub terminator: Terminator,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub blocks: Vec<BasicBlock>,
    pub entry_block: BlockId,
}

impl Function {
    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }
}

/// A whole translation unit: zero-initialised `double` globals, external
/// `void(double)` declarations and the defined functions.
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub name: String,
    pub globals: Vec<String>,
    pub declarations: Vec<String>,
    pub functions: Vec<Function>,
}

// ─── Printing ───────────────────────────────────────────────────

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%t{}", self.0)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Hex form is exact for every double
            Operand::Constant(value) => write!(f, "0x{:016X}", value.to_bits()),
            Operand::Var(var) => write!(f, "{}", var),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Load { dest, global } => write!(f, "{} = load double, ptr @{}", dest, global),
            Instruction::Store { src, global } => write!(f, "store double {}, ptr @{}", src, global),
            Instruction::FAdd { dest, left, right } => write!(f, "{} = fadd double {}, {}", dest, left, right),
            Instruction::FCmp { dest, predicate, left, right } => {
                write!(f, "{} = fcmp {} double {}, {}", dest, predicate.as_str(), left, right)
            }
            Instruction::Call { callee, args } => {
                write!(f, "call void @{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "double {}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl Function {
    fn label_of(&self, id: BlockId) -> &str {
        self.block(id).map(|b| b.label.as_str()).unwrap_or("unknown")
    }

    fn fmt_terminator(&self, term: &Terminator, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match term {
            Terminator::Br(target) => write!(f, "br label %{}", self.label_of(*target)),
            Terminator::CondBr { cond, then_block, else_block } => write!(
                f,
                "br i1 {}, label %{}, label %{}",
                cond,
                self.label_of(*then_block),
                self.label_of(*else_block)
            ),
            Terminator::Ret(code) => write!(f, "ret i32 {}", code),
            Terminator::Unreachable => f.write_str("unreachable"),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "define i32 @{}() {{", self.name)?;
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}:", block.label)?;
            for inst in &block.instructions {
                writeln!(f, "  {}", inst)?;
            }
            f.write_str("  ")?;
            self.fmt_terminator(&block.terminator, f)?;
            writeln!(f)?;
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        writeln!(f, "source_filename = \"{}\"", self.name)?;

        if !self.globals.is_empty() {
            writeln!(f)?;
            for global in &self.globals {
                writeln!(f, "@{} = global double 0.0", global)?;
            }
        }

        if !self.declarations.is_empty() {
            writeln!(f)?;
            for callee in &self.declarations {
                writeln!(f, "declare void @{}(double)", callee)?;
            }
        }

        for func in &self.functions {
            writeln!(f)?;
            write!(f, "{}", func)?;
        }
        Ok(())
    }
}
