//! Locating the external shader compiler.
//!
//! The compiler is taken from an explicit override, from the Vulkan SDK named
//! by `VULKAN_SDK`, or from `PATH`, in that order.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::debug;

/// Environment variable naming the Vulkan SDK root.
pub const SDK_ENV_VAR: &str = "VULKAN_SDK";

/// Name of the compiler binary inside the SDK and on `PATH`.
pub const COMPILER_NAME: &str = "glslc";

/// SDK subdirectories that may hold the compiler. Windows installs use
/// `Bin`, Linux and macOS tarballs use `bin`.
const SDK_BIN_DIRS: [&str; 2] = ["Bin", "bin"];

#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    #[error("glslc not found in SDK {}, tried: {}", .sdk.display(), display_paths(.candidates))]
    SdkCompilerMissing { sdk: PathBuf, candidates: Vec<PathBuf> },

    #[error("glslc not found on PATH; set VULKAN_SDK or pass --compiler")]
    NotFound,
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display()).join(", ")
}

/// Where the compiler path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainSource {
    Explicit,
    Sdk,
    SearchPath,
}

/// A resolved compiler binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub compiler: PathBuf,
    pub source: ToolchainSource,
}

impl Toolchain {
    /// Uses `compiler` as given, without checking that it exists.
    pub fn explicit(compiler: impl Into<PathBuf>) -> Self {
        Toolchain {
            compiler: compiler.into(),
            source: ToolchainSource::Explicit,
        }
    }

    /// Resolves the compiler against the process environment.
    pub fn resolve(explicit: Option<&Path>, sdk: Option<&Path>) -> Result<Self, ToolchainError> {
        Self::resolve_with_path(explicit, sdk, env::var_os("PATH"))
    }

    /// Resolves the compiler with an explicit `PATH` value.
    pub fn resolve_with_path(
        explicit: Option<&Path>,
        sdk: Option<&Path>,
        search_path: Option<OsString>,
    ) -> Result<Self, ToolchainError> {
        if let Some(compiler) = explicit {
            debug!("using explicit compiler {}", compiler.display());
            return Ok(Self::explicit(compiler));
        }

        if let Some(sdk) = sdk {
            let candidates = sdk_candidates(sdk);
            return match candidates.iter().find(|c| c.is_file()) {
                Some(found) => Ok(Toolchain {
                    compiler: found.clone(),
                    source: ToolchainSource::Sdk,
                }),
                None => Err(ToolchainError::SdkCompilerMissing {
                    sdk: sdk.to_path_buf(),
                    candidates,
                }),
            };
        }

        match search_path.as_deref().and_then(find_in_path) {
            Some(compiler) => Ok(Toolchain {
                compiler,
                source: ToolchainSource::SearchPath,
            }),
            None => Err(ToolchainError::NotFound),
        }
    }
}

fn compiler_file_name() -> String {
    format!("{}{}", COMPILER_NAME, env::consts::EXE_SUFFIX)
}

/// Candidate compiler locations inside an SDK root, in lookup order.
pub fn sdk_candidates(sdk: &Path) -> Vec<PathBuf> {
    let file_name = compiler_file_name();
    SDK_BIN_DIRS
        .iter()
        .map(|dir| sdk.join(dir).join(&file_name))
        .collect()
}

/// Searches a `PATH`-style list for the compiler binary.
fn find_in_path(search_path: &OsStr) -> Option<PathBuf> {
    let file_name = compiler_file_name();
    env::split_paths(search_path)
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}
