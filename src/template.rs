//! Render script templates: built into the binary, optionally overridden by files

use crate::job::JobDescriptor;
use crate::{Error, Result};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Token replaced by the JSON job descriptor
pub const JOB_TOKEN: &str = "__PAGESHOT_JOB__";
/// Environment variable pointing at a directory of replacement templates
pub const TEMPLATES_DIR_ENV: &str = "PAGESHOT_TEMPLATES_DIR";

const SCREEN_CAPTURE_TEMPLATE: &str = include_str!("../templates/screen-capture.js");

/// What kind of render script to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureMode {
    #[default]
    ScreenCapture,
}

impl CaptureMode {
    pub fn name(self) -> &'static str {
        match self {
            CaptureMode::ScreenCapture => "screen-capture",
        }
    }

    /// Template compiled into the crate for this mode
    pub fn builtin_template(self) -> &'static str {
        match self {
            CaptureMode::ScreenCapture => SCREEN_CAPTURE_TEMPLATE,
        }
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of `<mode>.js` templates
///
/// With a directory configured, templates are read from it and a missing
/// file is an error. Without one, the built-in templates are used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    dir: Option<PathBuf>,
}

impl Default for Templates {
    fn default() -> Self {
        match std::env::var_os(TEMPLATES_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::builtin(),
        }
    }
}

impl Templates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    pub fn builtin() -> Self {
        Self { dir: None }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn path_for(&self, mode: CaptureMode) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.js", mode.name())))
    }

    fn source(&self, mode: CaptureMode) -> Result<Cow<'static, str>> {
        let Some(path) = self.path_for(mode) else {
            return Ok(Cow::Borrowed(mode.builtin_template()));
        };
        std::fs::read_to_string(&path)
            .map(Cow::Owned)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Error::TemplateNotFound(path.clone()),
                _ => Error::io(&path, e),
            })
    }

    /// Render the template for `mode` with `job` as its context.
    pub fn render(&self, mode: CaptureMode, job: &JobDescriptor) -> Result<String> {
        let source = self.source(mode)?;

        // JSON allows these separators inside strings, older JS engines don't.
        let context = job
            .to_json()?
            .replace('\u{2028}', "\\u2028")
            .replace('\u{2029}', "\\u2029");
        Ok(source.replace(JOB_TOKEN, &context))
    }
}
