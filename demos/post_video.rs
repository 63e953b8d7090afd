//! Post a video by URL, optionally upload a local file, and print account info.
//!
//! ```text
//! TIKTOK_API_KEY=... SOCIAL_MEDIA_TOKEN=... cargo run --example post_video -- [path/to/video.mp4]
//! ```

use anyhow::Context;
use std::path::PathBuf;
use tikpost::VideoService;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tikpost=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let service = VideoService::from_env().context("failed to create TikTok service")?;

    let response = service.post_video(
        "https://example.com/video.mp4",
        "Check out this awesome video! #trending",
        &["fyp", "viral", "trending"],
    );
    info!("Post video response: {}", serde_json::to_string(&response)?);

    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        let response = service.post_video_file(&path, "Another great video! #content", &["fyp", "viral", "content"]);
        info!("Post video file response: {}", serde_json::to_string(&response)?);
    }

    let account_info = service.get_account_info();
    info!("Account info: {}", serde_json::to_string(&account_info)?);

    Ok(())
}
