//! # tikpost - TikTok content posting for Rust
//!
//! A blocking client for publishing videos through the TikTok REST API with
//! API key authentication instead of an OAuth flow.
//!
//! ## Features
//!
//! - Post a video from a URL, or upload a local file and then post it
//! - Account information and publish status lookups
//! - Bounded retry with exponential backoff for transient failures
//! - A service layer that turns every outcome into a [`ServiceResult`]
//! - Logging through `tracing` spans handed to each component
//!
//! ## Basic Usage
//!
//! ```no_run
//! use tikpost::VideoService;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads TIKTOK_API_KEY and SOCIAL_MEDIA_TOKEN
//!     let service = VideoService::from_env()?;
//!
//!     let result = service.post_video(
//!         "https://example.com/video.mp4",
//!         "Check out this video!",
//!         &["fyp", "viral"],
//!     );
//!
//!     if result.success {
//!         println!("posted: {:?}", result.data);
//!     } else {
//!         println!("failed: {}", result.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-level access
//!
//! [`PlatformClient`] returns errors instead of envelopes, and
//! [`Transport`] executes arbitrary [`RequestSpec`]s with the same
//! authentication and retry policy.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tikpost::{Config, Credentials, PlatformClient, ReqwestBackend, Transport};
//!
//! let transport = Transport::new(
//!     Config::default().with_max_attempts(5),
//!     Credentials::new("key", "secret"),
//!     Arc::new(ReqwestBackend::new()?),
//! );
//! let client = PlatformClient::new(transport);
//! let status = client.get_video_status("v_123")?;
//! println!("{}", status.raw());
//! # Ok::<(), tikpost::PostError>(())
//! ```

pub mod backend;
pub mod client;
pub mod credentials;
pub mod error;
pub mod platform;
pub mod post;
pub mod request;
pub mod response;
pub mod service;
pub mod transport;
pub mod upload;

// Re-export main types for convenience
pub use backend::{FilePart, HttpBackend, HttpRequest, RawResponse, ReqwestBackend, Sleeper, ThreadSleeper};
pub use client::Config;
pub use credentials::Credentials;
pub use error::{PostError, Result, TransportErrorKind, TransportFailure};
pub use platform::PlatformClient;
pub use post::{format_caption, PostVideoRequest, VideoSource};
pub use request::RequestSpec;
pub use response::Response;
pub use service::{ServiceResult, VideoService};
pub use transport::Transport;
pub use upload::{UploadSession, UploadState};

// Re-export serde_json for convenience
pub use serde_json::json;
