//! Basic example: capture a page to PNG and JPEG

use pageshot::{Capture, ImageType};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("pageshot - Basic Capture Example\n");

    // Set PAGESHOT_BIN_PATH to the directory holding phantomjs, or call
    // `set_bin_path` explicitly.
    let mut capture = Capture::with_url("https://example.com")?;
    capture
        .set_width(1280)?
        .set_height(720)?
        .set_user_agent_string("pageshot-example/1.0")
        .set_timeout(30_000);

    println!("Renderer: {}", capture.renderer().binary().display());
    println!("Jobs dir: {}", capture.jobs().path().display());
    println!("Output dir: {}\n", capture.output().path().display());

    for image_type in [ImageType::Png, ImageType::Jpeg] {
        capture.set_image_type(image_type);
        match capture.save("example", true) {
            Ok(true) => println!("{}: saved {:?}", image_type, capture.image_location()),
            Ok(false) => eprintln!("{}: renderer produced no image", image_type),
            Err(e) => eprintln!("{}: {}", image_type, e),
        }
    }

    Ok(())
}
