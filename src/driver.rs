// Shader driver module

pub mod artifact;
pub mod cli;
pub mod compiler;

#[cfg(all(test, unix))]
mod tests_compiler;

pub use artifact::{BuildReport, CompileArtifact, CompileOutcome};
pub use cli::{BuildConfig, Cli, Verbosity};
pub use compiler::{DriverError, ShaderDriver, compile_all};
