//! Async example: several captures awaited from a tokio runtime

use pageshot::{AsyncCapture, Capture};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("pageshot - Async Capture Example\n");

    let urls = ["https://example.com", "https://www.rust-lang.org"];

    for (i, url) in urls.iter().enumerate() {
        let mut capture = AsyncCapture::new(Capture::with_url(url)?);
        capture
            .get_mut()
            .include_js("document.body.style.zoom = '0.8';")
            .set_delay(500);

        let name = format!("async/page-{}", i);
        let saved = capture.save(&name, true).await?;
        println!(
            "{} -> {:?} (saved={})",
            url,
            capture.get_ref().image_location(),
            saved
        );
    }

    Ok(())
}
