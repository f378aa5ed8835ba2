use std::path::PathBuf;
use std::process::ExitStatus;

use crate::shader::ShaderStage;

/// result of running the compiler for a single shader
#[derive(Debug)]
pub enum CompileOutcome {
    Compiled,
    /// dry run, the command was only logged
    Planned,
    /// the compiler ran and exited unsuccessfully
    CompilerFailed(ExitStatus),
    /// the compiler could not be started
    SpawnFailed(std::io::Error),
}

impl CompileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CompileOutcome::CompilerFailed(_) | CompileOutcome::SpawnFailed(_))
    }
}

/// outputs for a single shader
#[derive(Debug)]
pub struct CompileArtifact {
    pub source: PathBuf,
    pub output: PathBuf,
    pub stage: ShaderStage,
    pub outcome: CompileOutcome,
}

/// compilation outcomes for all shaders, in compile order
#[derive(Debug, Default)]
pub struct BuildReport {
    pub artifacts: Vec<CompileArtifact>,
    /// whether an existing output tree was removed before compiling
    pub cleaned: bool,
}

impl BuildReport {
    pub fn total(&self) -> usize {
        self.artifacts.len()
    }

    pub fn failed(&self) -> usize {
        self.artifacts.iter().filter(|a| a.outcome.is_failure()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.artifacts
            .iter()
            .filter(|a| matches!(a.outcome, CompileOutcome::Compiled))
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.artifacts.iter().any(|a| a.outcome.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CompileArtifact> {
        self.artifacts.iter().filter(|a| a.outcome.is_failure())
    }
}
