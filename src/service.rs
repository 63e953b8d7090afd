use crate::error::{PostError, Result};
use crate::platform::PlatformClient;
use crate::response::Response;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{error, info, info_span, Span};

/// ServiceResult is the envelope every [`VideoService`] call returns.
/// `data` is set on success, `error` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceResult {
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        ServiceResult {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Failure envelope; `action` reads like "post video"
    pub fn failure(action: &str, err: &PostError) -> Self {
        let cause = err.to_string();
        ServiceResult {
            success: false,
            message: format!("Failed to {}: {}", action, cause),
            data: None,
            error: Some(cause),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Payload on success, error text on failure
    pub fn into_result(self) -> std::result::Result<Value, String> {
        if self.success {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            Err(self.error.unwrap_or(self.message))
        }
    }
}

/// VideoService wraps [`PlatformClient`] so that no error escapes: every
/// call yields a [`ServiceResult`].
#[derive(Debug, Clone)]
pub struct VideoService {
    client: PlatformClient,
    span: Span,
}

impl VideoService {
    pub fn new(client: PlatformClient) -> Self {
        VideoService {
            client,
            span: info_span!("video_service"),
        }
    }

    /// Create a service from environment configuration
    pub fn from_env() -> Result<Self> {
        Ok(VideoService::new(PlatformClient::from_env()?))
    }

    /// Attach the span all service events are recorded under
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn client(&self) -> &PlatformClient {
        &self.client
    }

    /// Post a video by URL
    pub fn post_video<S: AsRef<str>>(&self, video_url: &str, caption: &str, hashtags: &[S]) -> ServiceResult {
        let _entered = self.span.enter();
        info!(video_url, "Posting video to TikTok: {}", video_url);
        self.contain(
            "post video",
            "Video posted successfully",
            self.client.post_video_by_url(video_url, caption, hashtags),
        )
    }

    /// Upload a local video file, then post it
    pub fn post_video_file<S: AsRef<str>>(&self, path: &Path, caption: &str, hashtags: &[S]) -> ServiceResult {
        let _entered = self.span.enter();
        info!(file = %path.display(), "Uploading and posting video file to TikTok");
        self.contain(
            "post video",
            "Video posted successfully",
            self.client.post_video_file(path, caption, hashtags),
        )
    }

    /// Information about the authenticated account
    pub fn get_account_info(&self) -> ServiceResult {
        let _entered = self.span.enter();
        info!("Getting TikTok account information");
        self.contain(
            "get account information",
            "Account information retrieved successfully",
            self.client.get_account_info(),
        )
    }

    /// Publish status of a video
    pub fn get_video_status(&self, video_id: &str) -> ServiceResult {
        let _entered = self.span.enter();
        info!(video_id, "Getting TikTok video status");
        self.contain(
            "get video status",
            "Video status retrieved successfully",
            self.client.get_video_status(video_id),
        )
    }

    fn contain(&self, action: &str, success_message: &str, outcome: Result<Response>) -> ServiceResult {
        match outcome {
            Ok(response) => {
                info!(action, response = %response.raw(), "Successfully completed: {}", action);
                ServiceResult::ok(success_message, response.into_value())
            }
            Err(err) => {
                error!(action, error = %err, "Failed to {}: {}", action, err);
                ServiceResult::failure(action, &err)
            }
        }
    }
}
