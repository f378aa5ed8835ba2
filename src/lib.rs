//! Compiles a tree of GLSL shaders to SPIR-V with an external compiler.

/// Contains the shader driver and its command line.
pub mod driver;
/// Contains the error reporter.
pub mod error;
/// Contains the logger setup.
pub mod logger;
pub mod shader;
/// Contains the compiler lookup.
pub mod toolchain;

pub mod test_utils;

pub use driver::{BuildConfig, BuildReport, Cli, DriverError, ShaderDriver, compile_all};
pub use shader::{ShaderSource, ShaderStage};
pub use toolchain::{Toolchain, ToolchainError};
