//! Shader source discovery.
//!
//! Walks a source tree and collects every GLSL file the driver knows how to
//! compile, together with the path it will be written to in the output tree.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};
use walkdir::WalkDir;

/// Extension appended to every compiled artifact.
pub const ARTIFACT_EXTENSION: &str = "spv";

/// Pipeline stage of a shader, derived from its file extension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Maps a file extension (without the dot) to a stage.
    ///
    /// Matching is exact: `VERT` or `vert.in` are not recognized.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "vert" => Some(ShaderStage::Vertex),
            "frag" => Some(ShaderStage::Fragment),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// A shader file found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Path as found by the walk (source root joined with `relative_path`).
    pub path: PathBuf,
    /// Path relative to the source root, e.g. `common/blur.frag`.
    pub relative_path: PathBuf,
    pub stage: ShaderStage,
}

impl ShaderSource {
    /// Where the compiled artifact for this shader lands under `output_root`.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        artifact_path(output_root, &self.relative_path)
    }
}

/// Mirrors `relative_path` under `output_root` and appends `.spv` to the
/// full file name, so `mesh.vert` becomes `mesh.vert.spv`.
pub fn artifact_path(output_root: &Path, relative_path: &Path) -> PathBuf {
    let mut file_name: OsString = relative_path.as_os_str().to_owned();
    file_name.push(".");
    file_name.push(ARTIFACT_EXTENSION);
    output_root.join(file_name)
}

/// Recursively collects every recognized shader under `source_root`.
///
/// Entries are visited in file-name order and symlinks are followed. When
/// `skip_dir` is given and lies inside the tree, that subtree is not
/// descended into; this keeps a nested output directory out of the walk.
///
/// Only a failure to read `source_root` itself is an error. Unreadable
/// entries below it, including symlink loops, are logged and skipped.
pub fn discover_shaders(
    source_root: &Path,
    skip_dir: Option<&Path>,
) -> Result<Vec<ShaderSource>, walkdir::Error> {
    let mut shaders = Vec::new();
    let skip = skip_dir.map(SkipDir::new);

    let walker = WalkDir::new(source_root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match &skip {
            Some(skip) if entry.depth() > 0 && entry.file_type().is_dir() => {
                let skipped = skip.matches(entry.path());
                if skipped {
                    debug!("skipping output directory {}", entry.path().display());
                }
                !skipped
            }
            _ => true,
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e),
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(stage) = ShaderStage::from_path(path) else {
            trace!("ignoring {}", path.display());
            continue;
        };

        // walkdir yields paths prefixed by the root it was given
        let relative_path = match path.strip_prefix(source_root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => continue,
        };

        debug!("found {:?} shader {}", stage, relative_path.display());
        shaders.push(ShaderSource {
            path: path.to_path_buf(),
            relative_path,
            stage,
        });
    }

    Ok(shaders)
}

/// Directory excluded from the walk, matched by path or by its canonical
/// form so `./shaders/compiled` and `shaders/compiled` are the same.
struct SkipDir<'a> {
    path: &'a Path,
    canonical: Option<PathBuf>,
}

impl<'a> SkipDir<'a> {
    fn new(path: &'a Path) -> Self {
        SkipDir {
            path,
            canonical: fs::canonicalize(path).ok(),
        }
    }

    fn matches(&self, dir: &Path) -> bool {
        if dir == self.path {
            return true;
        }
        match &self.canonical {
            Some(canonical) => fs::canonicalize(dir).is_ok_and(|dir| dir == *canonical),
            None => false,
        }
    }
}
