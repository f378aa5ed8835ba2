//! CLI parsing and configuration module
//!
//! This module handles command-line argument parsing using clap and
//! provides the configuration consumed by the shader driver.

use clap::Parser as CliParser;
use std::path::PathBuf;

use crate::toolchain::SDK_ENV_VAR;

/// Source directory used when none is given.
pub const DEFAULT_SOURCE_DIR: &str = "assets/shaders";

/// Name of the output directory created inside the source directory.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "compiled";

/// CLI interface using clap
#[derive(CliParser, Debug)]
#[clap(name = "shaderbake", version, about = "Compiles GLSL shaders to SPIR-V with glslc")]
pub struct Cli {
    /// Root of the shader source tree
    #[clap(value_parser, default_value = DEFAULT_SOURCE_DIR)]
    pub source_dir: PathBuf,

    /// Output directory, deleted and regenerated on every run [default: <SOURCE_DIR>/compiled]
    #[clap(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Shader compiler binary, bypassing SDK and PATH lookup
    #[clap(long, value_name = "PATH")]
    pub compiler: Option<PathBuf>,

    /// Vulkan SDK root
    #[clap(long, value_name = "DIR", env = SDK_ENV_VAR)]
    pub sdk: Option<PathBuf>,

    /// Print the commands without cleaning or compiling anything
    #[clap(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose diagnostic output
    #[clap(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report warnings and errors
    #[clap(short, long)]
    pub quiet: bool,

    /// Extra arguments passed to every compiler invocation
    #[clap(last = true, value_name = "COMPILER_ARGS")]
    pub compiler_args: Vec<String>,
}

/// Log verbosity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

/// Configuration for a build
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub compiler: Option<PathBuf>,
    pub sdk: Option<PathBuf>,
    pub compiler_args: Vec<String>,
    pub dry_run: bool,
    pub verbosity: Verbosity,
}

impl BuildConfig {
    /// Create a config for `source_dir` with the default output location
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        let output_dir = source_dir.join(DEFAULT_OUTPUT_DIR_NAME);
        Self {
            source_dir,
            output_dir,
            compiler: None,
            sdk: None,
            compiler_args: vec![],
            dry_run: false,
            verbosity: Verbosity::default(),
        }
    }
}

impl Cli {
    /// Convert CLI arguments into build configuration
    pub fn into_config(self) -> BuildConfig {
        let verbosity = if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        };

        let output_dir = self
            .output
            .unwrap_or_else(|| self.source_dir.join(DEFAULT_OUTPUT_DIR_NAME));

        BuildConfig {
            source_dir: self.source_dir,
            output_dir,
            compiler: self.compiler,
            sdk: self.sdk.filter(|sdk| !sdk.as_os_str().is_empty()),
            compiler_args: self.compiler_args,
            dry_run: self.dry_run,
            verbosity,
        }
    }
}
