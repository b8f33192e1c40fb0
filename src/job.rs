//! The job descriptor handed to the render template, and its cache key

use crate::injection::Scripts;
use crate::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Crop box applied to the rendered page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClipRect {
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

impl ClipRect {
    /// A clip anchored at the page origin; `None` unless both sides are set.
    pub fn from_origin(width: Option<u32>, height: Option<u32>) -> Option<Self> {
        match (width, height) {
            (Some(width), Some(height)) => Some(Self {
                top: 0,
                left: 0,
                width,
                height,
            }),
            _ => None,
        }
    }
}

/// Complete description of one capture
///
/// Built from a `Capture` at the moment `save` runs. Field order is fixed,
/// so the JSON serialization is canonical and doubles as the input to the
/// cache key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub output_path: PathBuf,
    pub format: String,
    pub quality: Option<u8>,
    pub clip: Option<ClipRect>,
    pub background_color: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_ms: Option<u64>,
    pub delay_ms: u64,
    pub scripts: Scripts,
}

impl JobDescriptor {
    /// Canonical serialization used both for hashing and template context
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Lowercase hex SHA-256 of the canonical serialization
    pub fn cache_key(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&json)))
    }
}
