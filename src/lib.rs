//! pageshot
//!
//! Screenshot capture through an external headless renderer (PhantomJS).
//! This crate does not render anything itself: it turns capture settings
//! into a render script, runs the renderer on it and checks that the image
//! appeared.
//!
//! # Features
//!
//! - **Builder API**: chainable setters that validate input up front
//! - **Script cache**: render scripts are named by the SHA-256 of the job, so
//!   identical captures reuse the same file
//! - **Async facade**: `AsyncCapture` runs the blocking save on a worker thread
//!
//! # Example
//!
//! ```no_run
//! use pageshot::Capture;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut capture = Capture::with_url("https://example.com")?;
//! capture
//!     .set_bin_path("/opt/phantomjs/bin")?
//!     .set_width(1280)?
//!     .set_height(720)?
//!     .set_clip_width(1280)?
//!     .set_clip_height(400)?;
//!
//! let saved = capture.save("example/home", true)?;
//! println!("saved={} at {:?}", saved, capture.image_location());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod cache;
pub mod capture;
pub mod image;
pub mod injection;
pub mod job;
pub mod location;
pub mod runner;
pub mod template;

// Async-friendly wrapper (capture runs on a worker thread)
pub mod async_api;

pub use async_api::AsyncCapture;
pub use cache::{FsScriptCache, ScriptCache};
pub use capture::Capture;
pub use image::ImageType;
pub use injection::{ScriptRef, Scripts};
pub use job::{ClipRect, JobDescriptor};
pub use location::Location;
pub use runner::Renderer;
pub use template::{CaptureMode, Templates};
