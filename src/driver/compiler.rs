//! Shader build orchestration module
//!
//! This module contains the driver that discovers shader sources, clears
//! the output tree and runs the external compiler once per shader.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use itertools::Itertools;
use log::{debug, error, info, warn};

use crate::shader::{ShaderSource, discover_shaders};
use crate::toolchain::{Toolchain, ToolchainError};

use super::artifact::{BuildReport, CompileArtifact, CompileOutcome};
use super::cli::{BuildConfig, Cli};

/// Main shader driver
pub struct ShaderDriver {
    config: BuildConfig,
}

impl ShaderDriver {
    /// Create a new shader driver from CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self::from_config(cli.into_config())
    }

    /// Create a new shader driver from configuration
    pub fn from_config(config: BuildConfig) -> Self {
        ShaderDriver { config }
    }

    /// Locate the compiler named by the configuration
    pub fn resolve_toolchain(&self) -> Result<Toolchain, ToolchainError> {
        Toolchain::resolve(self.config.compiler.as_deref(), self.config.sdk.as_deref())
    }

    /// Run the whole build: resolve the compiler, recompile every shader
    /// and fail if any of them did not compile
    pub fn run(&self) -> Result<BuildReport, DriverError> {
        let toolchain = self.resolve_toolchain()?;
        info!("glsl compiler path: {}", toolchain.compiler.display());

        let report = self.compile_all(&toolchain.compiler)?;
        self.print_summary(&report);

        if report.has_failures() {
            return Err(DriverError::CompilationFailed {
                failed: report.failed(),
                total: report.total(),
            });
        }
        Ok(report)
    }

    /// Find every recognized shader, clear the output tree and recompile
    /// them with `compiler`.
    ///
    /// A compiler failure is recorded in the report and does not stop the
    /// remaining shaders.
    pub fn compile_all(&self, compiler: &Path) -> Result<BuildReport, DriverError> {
        let source_dir = &self.config.source_dir;
        let output_dir = &self.config.output_dir;

        if !source_dir.is_dir() {
            return Err(DriverError::MissingSourceRoot(source_dir.clone()));
        }
        if output_contains_sources(source_dir, output_dir) {
            return Err(DriverError::OutputContainsSources(output_dir.clone()));
        }

        // discover first so an unreadable source tree leaves the old output alone
        let shaders = discover_shaders(source_dir, Some(output_dir.as_path()))?;
        if shaders.is_empty() {
            warn!("no .vert or .frag shaders found under {}", source_dir.display());
        }

        let mut report = BuildReport {
            cleaned: self.clear_old_builds()?,
            ..Default::default()
        };

        for shader in shaders {
            let artifact = self.compile_shader(compiler, shader)?;
            report.artifacts.push(artifact);
        }

        Ok(report)
    }

    /// Remove a previous output tree. Returns whether anything was removed.
    fn clear_old_builds(&self) -> Result<bool, DriverError> {
        let output_dir = &self.config.output_dir;
        if !output_dir.exists() {
            debug!("no previous output at {}", output_dir.display());
            return Ok(false);
        }

        if self.config.dry_run {
            info!("would clear old spv files from {}", output_dir.display());
            return Ok(true);
        }

        info!("clearing old spv files from {}...", output_dir.display());
        fs::remove_dir_all(output_dir).map_err(|source| DriverError::Io {
            context: "failed to remove",
            path: output_dir.clone(),
            source,
        })?;
        Ok(true)
    }

    fn compile_shader(&self, compiler: &Path, shader: ShaderSource) -> Result<CompileArtifact, DriverError> {
        let output = shader.output_path(&self.config.output_dir);
        let mut command = self.compiler_command(compiler, &shader.path, &output);
        info!("{}", display_command(&command));

        let outcome = if self.config.dry_run {
            CompileOutcome::Planned
        } else {
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent).map_err(|source| DriverError::Io {
                    context: "failed to create",
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            match command.status() {
                Ok(status) if status.success() => CompileOutcome::Compiled,
                Ok(status) => {
                    error!("{} failed: {}", shader.relative_path.display(), status);
                    CompileOutcome::CompilerFailed(status)
                }
                Err(e) => {
                    error!("failed to execute {}: {}", compiler.display(), e);
                    CompileOutcome::SpawnFailed(e)
                }
            }
        };

        Ok(CompileArtifact {
            source: shader.path,
            output,
            stage: shader.stage,
            outcome,
        })
    }

    /// `<compiler> [extra args] <input> -o <output>`
    fn compiler_command(&self, compiler: &Path, input: &Path, output: &Path) -> Command {
        let mut command = Command::new(compiler);
        command
            .args(&self.config.compiler_args)
            .arg(input)
            .arg("-o")
            .arg(output);
        command
    }

    fn print_summary(&self, report: &BuildReport) {
        if self.config.dry_run {
            info!("{} shaders would be compiled", report.total());
            return;
        }

        for failed in report.failures() {
            warn!("not compiled: {}", failed.source.display());
        }
        info!(
            "compiled {} of {} shaders into {}",
            report.succeeded(),
            report.total(),
            self.config.output_dir.display()
        );
    }
}

/// Clear `output_root` and compile every `.vert`/`.frag` file under
/// `source_root` with `compiler`, mirroring the tree with a `.spv` suffix.
pub fn compile_all(source_root: &Path, output_root: &Path, compiler: &Path) -> Result<BuildReport, DriverError> {
    let config = BuildConfig {
        output_dir: output_root.to_path_buf(),
        ..BuildConfig::new(source_root)
    };
    ShaderDriver::from_config(config).compile_all(compiler)
}

fn output_contains_sources(source_dir: &Path, output_dir: &Path) -> bool {
    match (fs::canonicalize(source_dir), fs::canonicalize(output_dir)) {
        (Ok(source), Ok(output)) => source.starts_with(output),
        _ => source_dir.starts_with(output_dir),
    }
}

fn display_command(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|arg| arg.to_string_lossy())
        .join(" ")
}

/// Error types for the shader driver
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    #[error("shader directory {} does not exist", .0.display())]
    MissingSourceRoot(PathBuf),

    #[error("refusing to clear {} because it contains the shader sources", .0.display())]
    OutputContainsSources(PathBuf),

    #[error("failed to walk shader directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    #[error("{failed} of {total} shaders failed to compile")]
    CompilationFailed { failed: usize, total: usize },
}
