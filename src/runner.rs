//! Invocation of the external renderer binary

use crate::{Error, Result};
use log::{debug, warn};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// File name of the renderer executable
pub const BINARY_NAME: &str = "phantomjs";
/// Environment variable overriding the default binary directory
pub const BIN_PATH_ENV: &str = "PAGESHOT_BIN_PATH";
/// Flag always passed so self-signed or expired certificates still render
pub const IGNORE_SSL_FLAG: &str = "--ignore-ssl-errors=true";

const DEFAULT_BIN_DIR: &str = "/usr/local/bin";

/// The renderer binary plus any extra command-line options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    binary: PathBuf,
    options: Vec<String>,
}

impl Default for Renderer {
    /// Binary under `$PAGESHOT_BIN_PATH` or `/usr/local/bin`. Not checked.
    fn default() -> Self {
        let dir = match std::env::var_os(BIN_PATH_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => PathBuf::from(DEFAULT_BIN_DIR),
        };
        let exe = dir.join(format!("{}.exe", BINARY_NAME));
        let binary = if exe.is_file() { exe } else { dir.join(BINARY_NAME) };
        Self {
            binary,
            options: Vec::new(),
        }
    }
}

impl Renderer {
    /// Find the renderer inside `dir`, accepting either the bare or `.exe` name.
    pub fn locate(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        [
            dir.join(BINARY_NAME),
            dir.join(format!("{}.exe", BINARY_NAME)),
        ]
        .into_iter()
        .find(|candidate| candidate.is_file())
        .map(|binary| Self {
            binary,
            options: Vec::new(),
        })
        .ok_or_else(|| Error::MissingBinary(dir.to_path_buf()))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn add_option(&mut self, option: impl Into<String>) {
        self.options.push(option.into());
    }

    /// Keep the configured options but point at a different binary.
    pub fn with_binary_of(mut self, other: Renderer) -> Self {
        self.binary = other.binary;
        self
    }

    /// Arguments passed to the binary for `script`, in order
    pub fn args(&self, script: &Path) -> Vec<OsString> {
        let mut args = Vec::with_capacity(self.options.len() + 2);
        args.push(OsString::from(IGNORE_SSL_FLAG));
        args.extend(self.options.iter().map(OsString::from));
        args.push(script.as_os_str().to_os_string());
        args
    }

    /// Run the renderer on `script` and wait for it to exit.
    ///
    /// Output and exit status are only logged; callers decide success by
    /// looking for the file the script was told to write. A binary that
    /// cannot be started yields `None`.
    pub fn run(&self, script: &Path) -> Option<ExitStatus> {
        let args = self.args(script);
        debug!("running {} {:?}", self.binary.display(), args);

        let output = match Command::new(&self.binary).args(&args).output() {
            Ok(output) => output,
            Err(e) => {
                warn!("failed to start renderer {}: {}", self.binary.display(), e);
                return None;
            }
        };

        if !output.stdout.is_empty() {
            debug!("renderer stdout: {}", String::from_utf8_lossy(&output.stdout).trim_end());
        }
        if !output.stderr.is_empty() {
            debug!("renderer stderr: {}", String::from_utf8_lossy(&output.stderr).trim_end());
        }
        debug!("renderer exited with {}", output.status);
        Some(output.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_requires_binary() {
        let dir = tempfile::tempdir().unwrap();
        let err = Renderer::locate(dir.path()).unwrap_err();
        assert!(matches!(err, Error::MissingBinary(ref p) if p == dir.path()));
    }

    #[test]
    fn locate_accepts_exe_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("phantomjs.exe"), b"").unwrap();
        let renderer = Renderer::locate(dir.path()).unwrap();
        assert_eq!(renderer.binary(), dir.path().join("phantomjs.exe"));
    }

    #[test]
    fn relocating_keeps_options() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("phantomjs"), b"").unwrap();
        let mut renderer = Renderer::default();
        renderer.add_option("--load-images=false");
        let renderer = renderer.with_binary_of(Renderer::locate(dir.path()).unwrap());
        assert_eq!(renderer.binary(), dir.path().join("phantomjs"));
        assert_eq!(renderer.options(), ["--load-images=false".to_string()]);
    }

    #[test]
    fn args_put_flag_first_and_script_last() {
        let mut renderer = Renderer::default();
        renderer.add_option("--web-security=false");
        let args = renderer.args(Path::new("/jobs/abc.js"));
        assert_eq!(
            args,
            vec![
                OsString::from("--ignore-ssl-errors=true"),
                OsString::from("--web-security=false"),
                OsString::from("/jobs/abc.js"),
            ]
        );
    }

    #[test]
    fn run_reports_unstartable_binary() {
        let renderer = Renderer {
            binary: PathBuf::from("/nonexistent/pageshot/phantomjs"),
            options: Vec::new(),
        };
        assert!(renderer.run(Path::new("/nonexistent/job.js")).is_none());
    }
}
