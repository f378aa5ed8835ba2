//! Helpers shared by the unit and CLI tests.
//!
//! The fake compiler is a POSIX shell script run through `/bin/sh`, so tests
//! never exec a file they have just written.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Test configuration constants
pub mod config {
    /// Shell used to run the fake compiler
    pub const SHELL: &str = "/bin/sh";
    /// Shaders whose file name contains this marker make the fake compiler fail
    pub const FAIL_MARKER: &str = "broken";
    /// File the fake compiler appends its argument lists to
    pub const INVOCATION_LOG: &str = "invocations.log";
}

const FAKE_COMPILER: &str = r#"#!/bin/sh
log="$(dirname "$0")/invocations.log"
echo "$*" >> "$log"
input=""
output=""
while [ $# -gt 0 ]; do
    case "$1" in
        -o) output="$2"; shift 2 ;;
        *) input="$1"; shift ;;
    esac
done
case "$(basename "$input")" in
    *broken*) echo "$input: error: fake compile failure" >&2; exit 1 ;;
esac
cp "$input" "$output"
"#;

/// A small GLSL program, written verbatim by [`write_shader`].
pub const SHADER_SOURCE: &str = "#version 450\nvoid main() {}\n";

/// Writes a shader (or any file) at `root/relative`, creating parents.
pub fn write_shader(root: &Path, relative: &str) -> io::Result<PathBuf> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, SHADER_SOURCE)?;
    Ok(path)
}

/// Writes the fake compiler script into `dir` and returns its path.
///
/// Run it as `/bin/sh <script> [args] <input> -o <output>`; it copies the
/// input to the output and logs every argument list next to itself.
pub fn write_fake_compiler(dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let script = dir.join("fake-glslc.sh");
    fs::write(&script, FAKE_COMPILER)?;
    Ok(script)
}

/// Argument lists the fake compiler in `dir` has been called with.
pub fn fake_compiler_invocations(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join(config::INVOCATION_LOG))
        .map(|log| log.lines().map(str::to_owned).collect())
        .unwrap_or_default()
}

/// Every file under `root`, relative to it, sorted.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(|relative| relative.to_string_lossy().replace('\\', "/"))
        })
        .collect();
    files.sort();
    files
}
