// Code generation target selection

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// NASM x86-64 assembly for an ELF64 object
    #[default]
    Assembly,
    /// Textual LLVM IR
    Ir,
}

impl Target {
    /// Extension of the generated source file handed to the assembler
    pub fn source_extension(&self) -> &'static str {
        match self {
            Target::Assembly => "s",
            Target::Ir => "ll",
        }
    }

    /// Extension of the relocatable object produced by `assemble`
    pub fn object_extension(&self) -> &'static str {
        "o"
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Assembly => f.write_str("asm"),
            Target::Ir => f.write_str("ir"),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asm" | "assembly" => Ok(Target::Assembly),
            "ir" | "llvm" => Ok(Target::Ir),
            other => Err(format!("unknown target '{}'", other)),
        }
    }
}
