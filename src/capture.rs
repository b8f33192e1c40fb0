//! The capture builder: collects settings, then renders one screenshot per `save`

use crate::cache::{FsScriptCache, ScriptCache};
use crate::image::ImageType;
use crate::injection::{ScriptRef, Scripts, REMOTE_SCHEMES};
use crate::job::{ClipRect, JobDescriptor};
use crate::location::Location;
use crate::runner::Renderer;
use crate::template::{CaptureMode, Templates};
use crate::{Error, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use url::Url;

/// Default viewport width in pixels
pub const DEFAULT_WIDTH: u32 = 1024;
/// Default viewport height in pixels
pub const DEFAULT_HEIGHT: u32 = 768;
/// Background used for opaque formats when none is configured
pub const OPAQUE_BACKGROUND: &str = "#FFFFFF";

/// Screenshot builder
///
/// Setters validate their input immediately and return the builder so calls
/// chain; fallible setters return `Result<&mut Self>`:
///
/// ```no_run
/// use pageshot::{Capture, ImageType};
///
/// # fn main() -> pageshot::Result<()> {
/// let mut capture = Capture::with_url("https://example.com")?;
/// capture
///     .set_width(1280)?
///     .set_height(720)?
///     .set_image_type(ImageType::Jpeg)
///     .set_timeout_str("5000")?
///     .include_js("document.body.classList.add('screenshot');");
///
/// if capture.save("example", true)? {
///     println!("saved to {:?}", capture.image_location());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Capture {
    url: Option<Url>,
    width: u32,
    height: u32,
    clip_width: Option<u32>,
    clip_height: Option<u32>,
    background_color: Option<String>,
    image_type: ImageType,
    quality: Option<u8>,
    user_agent: Option<String>,
    timeout_ms: Option<u64>,
    delay_ms: u64,
    scripts: Scripts,
    mode: CaptureMode,
    renderer: Renderer,
    templates: Templates,
    jobs: Location,
    output: Location,
    image_location: Option<PathBuf>,
}

impl Default for Capture {
    fn default() -> Self {
        Self {
            url: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            clip_width: None,
            clip_height: None,
            background_color: None,
            image_type: ImageType::default(),
            quality: None,
            user_agent: None,
            timeout_ms: None,
            delay_ms: 0,
            scripts: Scripts::new(),
            mode: CaptureMode::default(),
            renderer: Renderer::default(),
            templates: Templates::default(),
            jobs: Location::default_jobs(),
            output: Location::default_output(),
            image_location: None,
        }
    }
}

fn positive(what: &str, value: u32) -> Result<u32> {
    if value == 0 {
        return Err(Error::InvalidArgument(format!("{} must be positive", what)));
    }
    Ok(value)
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(url: &str) -> Result<Self> {
        let mut capture = Self::default();
        capture.set_url(url)?;
        Ok(capture)
    }

    // --- setters ---

    pub fn set_url(&mut self, url: &str) -> Result<&mut Self> {
        let invalid = |reason: String| Error::InvalidUrl {
            url: url.to_string(),
            reason,
        };
        let parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
        // "localhost:8080" parses as scheme "localhost" with an opaque path.
        if parsed.cannot_be_a_base() || !REMOTE_SCHEMES.contains(&parsed.scheme()) {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }
        self.url = Some(parsed);
        Ok(self)
    }

    /// Point at the directory holding the renderer binary.
    pub fn set_bin_path(&mut self, dir: impl AsRef<Path>) -> Result<&mut Self> {
        let located = Renderer::locate(dir)?;
        self.renderer = std::mem::take(&mut self.renderer).with_binary_of(located);
        Ok(self)
    }

    pub fn set_width(&mut self, width: u32) -> Result<&mut Self> {
        self.width = positive("width", width)?;
        Ok(self)
    }

    pub fn set_height(&mut self, height: u32) -> Result<&mut Self> {
        self.height = positive("height", height)?;
        Ok(self)
    }

    pub fn set_clip_width(&mut self, width: u32) -> Result<&mut Self> {
        self.clip_width = Some(positive("clip width", width)?);
        Ok(self)
    }

    pub fn set_clip_height(&mut self, height: u32) -> Result<&mut Self> {
        self.clip_height = Some(positive("clip height", height)?);
        Ok(self)
    }

    pub fn set_background_color(&mut self, color: impl Into<String>) -> &mut Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn set_image_type(&mut self, image_type: ImageType) -> &mut Self {
        self.image_type = image_type;
        self
    }

    /// Select the image type by name (`png`, `jpg`, `jpeg`, `gif`).
    pub fn set_image_type_str(&mut self, name: &str) -> Result<&mut Self> {
        self.image_type = name.parse()?;
        Ok(self)
    }

    /// JPEG quality, 1 to 100. Ignored for lossless formats.
    pub fn set_quality(&mut self, quality: u8) -> Result<&mut Self> {
        if !(1..=100).contains(&quality) {
            return Err(Error::InvalidArgument(format!(
                "quality must be between 1 and 100, got {}",
                quality
            )));
        }
        self.quality = Some(quality);
        Ok(self)
    }

    pub fn set_user_agent_string(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Resource timeout in milliseconds, enforced by the render script.
    pub fn set_timeout(&mut self, timeout_ms: u64) -> &mut Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Parse a textual timeout in milliseconds; fractions are truncated.
    pub fn set_timeout_str(&mut self, raw: &str) -> Result<&mut Self> {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| Error::InvalidArgument(format!("timeout '{}' is not numeric", raw)))?;
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "timeout '{}' must be a non-negative number",
                raw
            )));
        }
        Ok(self.set_timeout(value as u64))
    }

    /// Wait this long after the page loads before rendering.
    pub fn set_delay(&mut self, delay_ms: u64) -> &mut Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Add a script to run in the page before capture.
    ///
    /// Strings are classified with [`ScriptRef::classify`]; pass a
    /// `ScriptRef` or `Url` to skip classification.
    pub fn include_js(&mut self, script: impl Into<ScriptRef>) -> &mut Self {
        self.scripts.push(script.into());
        self
    }

    /// Extra command-line option for the renderer, e.g. `--load-images=false`.
    pub fn add_renderer_option(&mut self, option: impl Into<String>) -> &mut Self {
        self.renderer.add_option(option);
        self
    }

    pub fn set_jobs_location(&mut self, jobs: Location) -> &mut Self {
        self.jobs = jobs;
        self
    }

    pub fn set_output_location(&mut self, output: Location) -> &mut Self {
        self.output = output;
        self
    }

    pub fn set_templates_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.templates = Templates::new(dir);
        self
    }

    pub fn set_capture_mode(&mut self, mode: CaptureMode) -> &mut Self {
        self.mode = mode;
        self
    }

    // --- accessors ---

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    pub fn scripts(&self) -> &Scripts {
        &self.scripts
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn jobs(&self) -> &Location {
        &self.jobs
    }

    pub fn output(&self) -> &Location {
        &self.output
    }

    /// Where the last `save` expected the image to land
    pub fn image_location(&self) -> Option<&Path> {
        self.image_location.as_deref()
    }

    // --- job assembly ---

    /// Absolute path for `name` inside the output location, with the image
    /// type's extension appended when `name` has none.
    pub fn output_path_for(&self, name: impl AsRef<Path>) -> Result<PathBuf> {
        let mut path = self.output.resolve(name)?;
        if path.extension().is_none() {
            path.set_extension(self.image_type.extension());
        }
        if path.is_relative() {
            let cwd = std::env::current_dir().map_err(|e| Error::io(".", e))?;
            path = cwd.join(path);
        }
        Ok(path)
    }

    /// Snapshot of the current settings as a job writing to `output_path`.
    pub fn descriptor(&self, output_path: PathBuf) -> Result<JobDescriptor> {
        let url = self.url.as_ref().ok_or_else(|| Error::InvalidUrl {
            url: String::new(),
            reason: "no URL configured".into(),
        })?;

        let background_color = match &self.background_color {
            Some(color) => Some(color.clone()),
            None if self.image_type.is_opaque() => Some(OPAQUE_BACKGROUND.to_string()),
            None => None,
        };

        Ok(JobDescriptor {
            url: url.to_string(),
            width: self.width,
            height: self.height,
            output_path,
            format: self.image_type.format().to_string(),
            quality: self.quality.filter(|_| self.image_type.is_lossy()),
            clip: ClipRect::from_origin(self.clip_width, self.clip_height),
            background_color,
            user_agent: self.user_agent.clone(),
            timeout_ms: self.timeout_ms,
            delay_ms: self.delay_ms,
            scripts: self.scripts.clone(),
        })
    }

    /// Write (or reuse) the render script for `job` and return its path.
    pub fn materialize(&self, job: &JobDescriptor) -> Result<PathBuf> {
        let key = job.cache_key()?;
        FsScriptCache::new(self.jobs.clone())
            .get_or_create(&key, || self.templates.render(self.mode, job))
    }

    // --- execution ---

    /// Render the page into `name` under the output location.
    ///
    /// Returns whether a file exists at the target path once the renderer
    /// has exited. The renderer's exit status is not consulted, so a crash
    /// and a silent no-op both surface as `false`. With `delete_if_exists`
    /// a writable file already at the target is removed first; without it a
    /// stale file counts as success.
    pub fn save(&mut self, name: impl AsRef<Path>, delete_if_exists: bool) -> Result<bool> {
        let output_path = self.output_path_for(name)?;
        let job = self.descriptor(output_path.clone())?;
        self.image_location = Some(output_path.clone());

        if delete_if_exists {
            remove_stale(&output_path)?;
        }

        let script = self.materialize(&job)?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let status = self.renderer.run(&script);
        let saved = output_path.exists();
        if saved {
            info!("captured {} -> {}", job.url, output_path.display());
        } else {
            warn!(
                "no image at {} after rendering {} (renderer status: {:?})",
                output_path.display(),
                job.url,
                status
            );
        }
        Ok(saved)
    }
}

fn remove_stale(path: &Path) -> Result<()> {
    let Ok(meta) = std::fs::metadata(path) else {
        return Ok(());
    };
    if !meta.is_file() || meta.permissions().readonly() {
        debug!("leaving existing {} in place", path.display());
        return Ok(());
    }
    std::fs::remove_file(path).map_err(|e| Error::io(path, e))?;
    debug!("removed stale output {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture_in(dir: &Path) -> Capture {
        let mut c = Capture::with_url("https://example.com").unwrap();
        c.set_jobs_location(Location::new(dir.join("jobs")))
            .set_output_location(Location::new(dir.join("out")));
        c
    }

    #[test]
    fn defaults() {
        let c = Capture::new();
        assert_eq!(c.width(), 1024);
        assert_eq!(c.height(), 768);
        assert_eq!(c.image_type(), ImageType::Png);
        assert!(c.url().is_none());
        assert!(c.image_location().is_none());
    }

    #[test]
    fn url_validation() {
        let mut c = Capture::new();
        assert!(matches!(c.set_url("not-a-url"), Err(Error::InvalidUrl { .. })));
        assert!(c.url().is_none());
        c.set_url("https://example.com").unwrap();
        assert_eq!(c.url().unwrap().as_str(), "https://example.com/");
    }

    #[test]
    fn host_port_strings_are_not_urls() {
        let mut c = Capture::new();
        for raw in ["localhost:8080", "example.com:80", "www.example.com:443/path", "mailto:a@b.c"] {
            assert!(
                matches!(c.set_url(raw), Err(Error::InvalidUrl { .. })),
                "{raw} was accepted"
            );
        }
        assert!(c.url().is_none());
        c.set_url("http://localhost:8080").unwrap();
        c.set_url("file:///srv/pages/index.html").unwrap();
        assert_eq!(c.url().unwrap().scheme(), "file");
    }

    #[test]
    fn timeout_must_be_numeric() {
        let mut c = Capture::new();
        assert!(matches!(c.set_timeout_str("abc"), Err(Error::InvalidArgument(_))));
        assert!(matches!(c.set_timeout_str("-5"), Err(Error::InvalidArgument(_))));
        assert!(matches!(c.set_timeout_str("NaN"), Err(Error::InvalidArgument(_))));
        c.set_timeout_str(" 1500.9 ").unwrap();
        assert_eq!(c.timeout_ms, Some(1500));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let mut c = Capture::new();
        assert!(c.set_width(0).is_err());
        assert!(c.set_clip_height(0).is_err());
        assert_eq!(c.width(), DEFAULT_WIDTH);
    }

    #[test]
    fn quality_range() {
        let mut c = Capture::new();
        assert!(c.set_quality(0).is_err());
        assert!(c.set_quality(101).is_err());
        c.set_quality(80).unwrap();
    }

    #[test]
    fn output_path_appends_extension_once() {
        let dir = tempfile::tempdir().unwrap();
        let c = capture_in(dir.path());
        let out = dir.path().join("out");
        assert_eq!(c.output_path_for("shot").unwrap(), out.join("shot.png"));
        assert_eq!(c.output_path_for("shot.png").unwrap(), out.join("shot.png"));
        assert_eq!(c.output_path_for("a/b/shot").unwrap(), out.join("a/b/shot.png"));
    }

    #[test]
    fn jpeg_defaults_to_white_background() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = capture_in(dir.path());
        c.set_image_type(ImageType::Jpeg);
        let job = c.descriptor(PathBuf::from("/x.jpg")).unwrap();
        assert_eq!(job.background_color.as_deref(), Some(OPAQUE_BACKGROUND));

        c.set_background_color("#123456");
        let job = c.descriptor(PathBuf::from("/x.jpg")).unwrap();
        assert_eq!(job.background_color.as_deref(), Some("#123456"));

        let png = capture_in(dir.path());
        assert!(png.descriptor(PathBuf::from("/x.png")).unwrap().background_color.is_none());
    }

    #[test]
    fn clip_needs_both_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = capture_in(dir.path());
        c.set_clip_width(300).unwrap();
        assert!(c.descriptor(PathBuf::from("/x.png")).unwrap().clip.is_none());
        c.set_clip_height(200).unwrap();
        let clip = c.descriptor(PathBuf::from("/x.png")).unwrap().clip.unwrap();
        assert_eq!((clip.width, clip.height), (300, 200));
    }

    #[test]
    fn quality_only_for_lossy_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = capture_in(dir.path());
        c.set_quality(70).unwrap();
        assert_eq!(c.descriptor(PathBuf::from("/x.png")).unwrap().quality, None);
        c.set_image_type(ImageType::Jpeg);
        assert_eq!(c.descriptor(PathBuf::from("/x.jpg")).unwrap().quality, Some(70));
    }

    #[test]
    fn descriptor_requires_url() {
        let c = Capture::new();
        assert!(matches!(
            c.descriptor(PathBuf::from("/x.png")),
            Err(Error::InvalidUrl { .. })
        ));
    }

    #[test]
    fn bin_path_must_contain_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = Capture::new();
        assert!(matches!(c.set_bin_path(dir.path()), Err(Error::MissingBinary(_))));
        std::fs::write(dir.path().join("phantomjs"), b"").unwrap();
        c.add_renderer_option("--load-images=false");
        c.set_bin_path(dir.path()).unwrap();
        assert_eq!(c.renderer().binary(), dir.path().join("phantomjs"));
        assert_eq!(c.renderer().options().len(), 1);
    }

    #[test]
    fn materialize_fails_without_template_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = capture_in(dir.path());
        c.set_templates_dir(dir.path().join("no-templates"));
        let job = c.descriptor(c.output_path_for("shot").unwrap()).unwrap();
        assert!(matches!(c.materialize(&job), Err(Error::TemplateNotFound(_))));
        assert!(!dir.path().join("jobs").exists());
    }

    #[test]
    fn remove_stale_skips_readonly_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keep.png");
        std::fs::write(&path, b"old").unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&path, perms).unwrap();

        remove_stale(&path).unwrap();
        assert!(path.exists());

        remove_stale(&dir.path().join("missing.png")).unwrap();
    }
}
