//! Directories where generated scripts and captured images are stored

use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Environment variable overriding the default jobs directory
pub const JOBS_DIR_ENV: &str = "PAGESHOT_JOBS_DIR";
/// Environment variable overriding the default output directory
pub const OUTPUT_DIR_ENV: &str = "PAGESHOT_OUTPUT_DIR";

/// A base directory that relative names are resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    root: PathBuf,
}

impl Location {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default location for generated render scripts
    pub fn default_jobs() -> Self {
        Self::from_env_or(JOBS_DIR_ENV, "jobs")
    }

    /// Default location for captured images
    pub fn default_output() -> Self {
        Self::from_env_or(OUTPUT_DIR_ENV, "output")
    }

    fn from_env_or(var: &str, leaf: &str) -> Self {
        match std::env::var_os(var) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(std::env::temp_dir().join("pageshot").join(leaf)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve `relative` inside this location.
    ///
    /// Leading separators are stripped so `"/shots/a.png"` lands under the
    /// root; parent-directory components are rejected.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        let relative = sanitize_relative(relative.as_ref())?;
        Ok(self.root.join(relative))
    }
}

/// Strip root/prefix components and refuse anything that walks upwards.
pub fn sanitize_relative(path: &Path) -> Result<PathBuf> {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir | Component::RootDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return Err(Error::InvalidArgument(format!(
                    "path '{}' escapes its base directory",
                    path.display()
                )))
            }
        }
    }
    if clean.as_os_str().is_empty() {
        return Err(Error::InvalidArgument("empty file name".into()));
    }
    Ok(clean)
}
