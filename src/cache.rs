//! Hash-keyed storage for generated render scripts

use crate::location::Location;
use crate::{Error, Result};
use log::{debug, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Extension of generated render scripts
pub const SCRIPT_EXTENSION: &str = "js";

/// Last line of every stored script; a file without it is incomplete
fn trailer(key: &str) -> String {
    format!("\n// pageshot:complete {}\n", key)
}

/// Storage that materializes a render script once per cache key
pub trait ScriptCache {
    /// Return the script path for `key`, calling `producer` for its content
    /// only when no script is stored under that key yet.
    fn get_or_create<F>(&self, key: &str, producer: F) -> Result<PathBuf>
    where
        F: FnOnce() -> Result<String>;
}

/// Scripts stored as `<jobs-dir>/<key>.js`
///
/// Scripts are written to a temporary file in the jobs directory and renamed
/// into place, so readers never see a partial script. Concurrent writers of
/// the same key race benignly: the content is identical by construction and
/// the last rename wins.
#[derive(Debug, Clone)]
pub struct FsScriptCache {
    jobs: Location,
}

impl FsScriptCache {
    pub fn new(jobs: Location) -> Self {
        Self { jobs }
    }

    pub fn script_path(&self, key: &str) -> PathBuf {
        self.jobs
            .path()
            .join(format!("{}.{}", key, SCRIPT_EXTENSION))
    }
}

impl ScriptCache for FsScriptCache {
    fn get_or_create<F>(&self, key: &str, producer: F) -> Result<PathBuf>
    where
        F: FnOnce() -> Result<String>,
    {
        let path = self.script_path(key);
        let trailer = trailer(key);
        if path.is_file() {
            match std::fs::read_to_string(&path) {
                Ok(stored) if stored.ends_with(&trailer) => {
                    debug!("render script cache hit: {}", path.display());
                    return Ok(path);
                }
                Ok(_) => warn!("incomplete render script, regenerating: {}", path.display()),
                Err(e) => warn!("unreadable render script {}: {}", path.display(), e),
            }
        }

        let mut content = producer()?;
        content.push_str(&trailer);
        let dir = self.jobs.path();
        std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        atomic_write(dir, &path, content.as_bytes())?;
        debug!("render script written: {}", path.display());
        Ok(path)
    }
}

fn atomic_write(dir: &Path, path: &Path, contents: &[u8]) -> Result<()> {
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    if let Err(e) = temp.write_all(contents).and_then(|_| temp.flush()) {
        return Err(Error::io(temp.path(), e));
    }
    temp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
