//! Scripts injected into the page before the screenshot is taken

use serde::Serialize;
use url::Url;

/// Schemes that make a string a remote script reference rather than code,
/// and the only schemes accepted for the captured page
pub(crate) const REMOTE_SCHEMES: [&str; 3] = ["http", "https", "file"];

/// A single script to run in the page
///
/// Remote scripts are loaded by the renderer into the page; inline snippets
/// are evaluated in the page context. Both kinds share one ordered list so
/// they execute in inclusion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScriptRef {
    Remote { src: Url },
    Inline { code: String },
}

impl ScriptRef {
    pub fn remote(src: Url) -> Self {
        ScriptRef::Remote { src }
    }

    pub fn inline(code: impl Into<String>) -> Self {
        ScriptRef::Inline { code: code.into() }
    }

    /// Decide whether `value` refers to a script or is a snippet of code.
    ///
    /// Only absolute `http`, `https` and `file` URLs count as references;
    /// `javascript:` and other scheme-like strings stay inline.
    pub fn classify(value: &str) -> Self {
        match Url::parse(value.trim()) {
            Ok(url) if REMOTE_SCHEMES.contains(&url.scheme()) => ScriptRef::Remote { src: url },
            _ => ScriptRef::inline(value),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ScriptRef::Remote { .. })
    }
}

impl From<Url> for ScriptRef {
    fn from(src: Url) -> Self {
        ScriptRef::Remote { src }
    }
}

impl From<&str> for ScriptRef {
    fn from(value: &str) -> Self {
        ScriptRef::classify(value)
    }
}

impl From<String> for ScriptRef {
    fn from(value: String) -> Self {
        ScriptRef::classify(&value)
    }
}

/// Ordered collection of injected scripts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Scripts(Vec<ScriptRef>);

impl Scripts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, script: ScriptRef) {
        self.0.push(script);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScriptRef> {
        self.0.iter()
    }

    pub fn remote(&self) -> impl Iterator<Item = &Url> {
        self.0.iter().filter_map(|s| match s {
            ScriptRef::Remote { src } => Some(src),
            ScriptRef::Inline { .. } => None,
        })
    }

    pub fn inline(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|s| match s {
            ScriptRef::Inline { code } => Some(code.as_str()),
            ScriptRef::Remote { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
