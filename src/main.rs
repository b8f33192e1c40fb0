use anyhow::Context;
use clap::Parser;
use pageshot::{Capture, Location};
use std::path::PathBuf;
use std::process::ExitCode;

/// Capture a screenshot of a web page with an external headless renderer
#[derive(Parser, Debug)]
#[command(name = "pageshot", version, about)]
struct Cli {
    /// Page to capture
    url: String,

    /// Output name, relative to the output directory
    #[arg(short, long, default_value = "screenshot")]
    output: PathBuf,

    #[arg(long, default_value_t = pageshot::capture::DEFAULT_WIDTH)]
    width: u32,

    #[arg(long, default_value_t = pageshot::capture::DEFAULT_HEIGHT)]
    height: u32,

    #[arg(long)]
    clip_width: Option<u32>,

    #[arg(long)]
    clip_height: Option<u32>,

    /// CSS color painted behind the page
    #[arg(long)]
    background: Option<String>,

    /// png, jpg or gif
    #[arg(long, default_value = "png")]
    format: String,

    /// JPEG quality (1-100)
    #[arg(long)]
    quality: Option<u8>,

    #[arg(long)]
    user_agent: Option<String>,

    /// Resource timeout in milliseconds
    #[arg(long)]
    timeout: Option<String>,

    /// Milliseconds to wait after load before rendering
    #[arg(long, default_value_t = 0)]
    delay: u64,

    /// Script URL or inline snippet; repeatable, runs in order
    #[arg(long = "include-js")]
    include_js: Vec<String>,

    /// Extra option passed to the renderer; repeatable
    #[arg(long = "renderer-option")]
    renderer_options: Vec<String>,

    /// Directory containing the renderer binary
    #[arg(long)]
    bin_path: Option<PathBuf>,

    #[arg(long)]
    jobs_dir: Option<PathBuf>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(long)]
    templates_dir: Option<PathBuf>,

    /// Do not delete an existing file at the output path first
    #[arg(long)]
    keep_existing: bool,
}

fn configure(cli: &Cli) -> anyhow::Result<Capture> {
    let mut capture = Capture::with_url(&cli.url)?;
    capture
        .set_width(cli.width)?
        .set_height(cli.height)?
        .set_image_type_str(&cli.format)?
        .set_delay(cli.delay);

    if let Some(w) = cli.clip_width {
        capture.set_clip_width(w)?;
    }
    if let Some(h) = cli.clip_height {
        capture.set_clip_height(h)?;
    }
    if let Some(color) = &cli.background {
        capture.set_background_color(color.as_str());
    }
    if let Some(q) = cli.quality {
        capture.set_quality(q)?;
    }
    if let Some(ua) = &cli.user_agent {
        capture.set_user_agent_string(ua.as_str());
    }
    if let Some(t) = &cli.timeout {
        capture.set_timeout_str(t)?;
    }
    for script in &cli.include_js {
        capture.include_js(script.as_str());
    }
    for option in &cli.renderer_options {
        capture.add_renderer_option(option.as_str());
    }
    if let Some(dir) = &cli.bin_path {
        capture
            .set_bin_path(dir)
            .with_context(|| format!("bad --bin-path {}", dir.display()))?;
    }
    if let Some(dir) = &cli.jobs_dir {
        capture.set_jobs_location(Location::new(dir));
    }
    if let Some(dir) = &cli.output_dir {
        capture.set_output_location(Location::new(dir));
    }
    if let Some(dir) = &cli.templates_dir {
        capture.set_templates_dir(dir);
    }
    Ok(capture)
}

/// Configure and save one capture, returning the process exit code:
/// 0 when an image was written, 1 when the renderer produced none, 2 on
/// bad input or I/O failure.
fn run(cli: &Cli) -> u8 {
    let mut capture = match configure(cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("pageshot: {:#}", e);
            return 2;
        }
    };

    match capture.save(&cli.output, !cli.keep_existing) {
        Ok(true) => {
            if let Some(path) = capture.image_location() {
                println!("{}", path.display());
            }
            0
        }
        Ok(false) => {
            eprintln!("pageshot: renderer produced no image for {}", cli.url);
            1
        }
        Err(e) => {
            eprintln!("pageshot: {}", e);
            2
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    ExitCode::from(run(&cli))
}
