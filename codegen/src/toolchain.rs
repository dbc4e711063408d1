// External toolchain handoff: assembler and linker run as child processes,
// only their exit status is inspected.

use crate::error::ToolchainError;
use model::Target;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Programs used for each step. Arguments are fixed per target; only the
/// program names can be overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainConfig {
    pub target: Target,
    pub assembler: String,
    pub linker: String,
}

impl ToolchainConfig {
    pub fn for_target(target: Target) -> Self {
        let (assembler, linker) = match target {
            Target::Assembly => ("nasm", "ld"),
            Target::Ir => ("llc", "cc"),
        };
        Self {
            target,
            assembler: assembler.to_string(),
            linker: linker.to_string(),
        }
    }

    pub fn with_assembler(mut self, program: impl Into<String>) -> Self {
        self.assembler = program.into();
        self
    }

    pub fn with_linker(mut self, program: impl Into<String>) -> Self {
        self.linker = program.into();
        self
    }

    fn assembler_args(&self, source: &Path, object: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = match self.target {
            Target::Assembly => vec!["-f".into(), "elf64".into()],
            Target::Ir => vec!["-filetype=obj".into()],
        };
        args.push(source.into());
        args.push("-o".into());
        args.push(object.into());
        args
    }

    fn linker_args(&self, objects: &[ObjectArtifact], executable: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-o".into(), executable.into()];
        args.extend(objects.iter().map(|o| o.path().into()));
        args
    }
}

/// Relocatable object written by the assembler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectArtifact(PathBuf);

impl ObjectArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Linked program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executable(PathBuf);

impl Executable {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Write `text` to a temporary source file and assemble it into `object_path`
pub fn assemble(
    config: &ToolchainConfig,
    text: &str,
    object_path: &Path,
) -> Result<ObjectArtifact, ToolchainError> {
    let suffix = format!(".{}", config.target.source_extension());
    let mut source = tempfile::Builder::new()
        .prefix("kay-")
        .suffix(&suffix)
        .tempfile()
        .map_err(|source| ToolchainError::Io {
            action: "failed to create a temporary file in",
            path: std::env::temp_dir(),
            source,
        })?;
    source
        .write_all(text.as_bytes())
        .and_then(|()| source.flush())
        .map_err(|err| ToolchainError::Io {
            action: "failed to write",
            path: source.path().to_path_buf(),
            source: err,
        })?;

    run(&config.assembler, config.assembler_args(source.path(), object_path))?;
    info!(object = %object_path.display(), "assembled");
    Ok(ObjectArtifact::new(object_path))
}

/// Link objects into `executable_path`
pub fn link(
    config: &ToolchainConfig,
    objects: &[ObjectArtifact],
    executable_path: &Path,
) -> Result<Executable, ToolchainError> {
    run(&config.linker, config.linker_args(objects, executable_path))?;
    info!(executable = %executable_path.display(), "linked");
    Ok(Executable(executable_path.to_path_buf()))
}

fn run(program: &str, args: Vec<OsString>) -> Result<(), ToolchainError> {
    let resolved = which::which(program).map_err(|source| ToolchainError::ToolNotFound {
        tool: program.to_string(),
        source,
    })?;
    debug!(tool = %resolved.display(), ?args, "running");

    let status = Command::new(&resolved)
        .args(&args)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| ToolchainError::Io {
            action: "failed to run",
            path: resolved.clone(),
            source,
        })?;

    if !status.success() {
        return Err(ToolchainError::Failed {
            tool: program.to_string(),
            status,
        });
    }
    Ok(())
}
