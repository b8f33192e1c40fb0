use crate::{Capture, Error, Result};
use std::path::{Path, PathBuf};
use std::thread;
use tokio::sync::oneshot;

/// Async-friendly wrapper around [`Capture`].
///
/// `save` blocks until the renderer exits, so each call runs on a dedicated
/// thread and the async caller awaits the result instead of stalling its
/// executor.
#[derive(Debug, Clone)]
pub struct AsyncCapture {
    inner: Capture,
}

impl AsyncCapture {
    pub fn new(inner: Capture) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &Capture {
        &self.inner
    }

    /// Configure the wrapped builder between saves.
    pub fn get_mut(&mut self) -> &mut Capture {
        &mut self.inner
    }

    pub fn into_inner(self) -> Capture {
        self.inner
    }

    /// Run [`Capture::save`] on a worker thread.
    pub async fn save(&mut self, name: impl AsRef<Path>, delete_if_exists: bool) -> Result<bool> {
        let name: PathBuf = name.as_ref().to_path_buf();
        let mut capture = self.inner.clone();
        let (tx, rx) = oneshot::channel();

        thread::Builder::new()
            .name("pageshot-capture".into())
            .spawn(move || {
                let res = capture.save(&name, delete_if_exists);
                let _ = tx.send((capture, res));
            })
            .map_err(|e| Error::Worker(format!("failed to spawn capture thread: {}", e)))?;

        let (capture, res) = rx
            .await
            .map_err(|e| Error::Worker(format!("capture canceled: {}", e)))?;
        // Keep the recorded image location even when the save failed.
        self.inner = capture;
        res
    }
}

impl From<Capture> for AsyncCapture {
    fn from(inner: Capture) -> Self {
        Self::new(inner)
    }
}
