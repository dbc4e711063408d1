use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("cannot generate code for a {kind} node in statement position")]
    UnsupportedNode { kind: &'static str },

    #[error("'{name}' is not a valid symbol name")]
    InvalidSymbol { name: String },

    #[error("'{name}' is reserved by the generated program")]
    ReservedName { name: String },
}

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("tool '{tool}' was not found on PATH")]
    ToolNotFound {
        tool: String,
        #[source]
        source: which::Error,
    },

    #[error("{tool} exited with {status}")]
    Failed { tool: String, status: ExitStatus },

    #[error("{action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
