use crate::error::{PostError, Result};
use crate::post::{PostVideoRequest, PublishBody, VideoSource};
use crate::request::RequestSpec;
use crate::response::Response;
use crate::transport::Transport;
use crate::upload::{read_file_part, InitUploadBody, UploadSession, UploadState};
use std::path::Path;
use tracing::{debug, info, info_span, Span};

/// Publish a video from a URL
pub const PUBLISH_URL_ENDPOINT: &str = "/post/publish/video/url";
/// Open an upload session for a local file
pub const INIT_UPLOAD_ENDPOINT: &str = "/post/publish/video/init";
/// Authenticated account information
pub const USER_INFO_ENDPOINT: &str = "/user/info";
/// Publish status of a video
pub const PUBLISH_STATUS_ENDPOINT: &str = "/post/publish/status";

/// PlatformClient exposes the platform's posting operations on top of a
/// [`Transport`]. Every method returns the decoded response or an error.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    transport: Transport,
    span: Span,
}

impl PlatformClient {
    pub fn new(transport: Transport) -> Self {
        PlatformClient {
            transport,
            span: info_span!("platform"),
        }
    }

    /// Create a client from environment configuration
    pub fn from_env() -> Result<Self> {
        Ok(PlatformClient::new(Transport::from_env()?))
    }

    /// Attach the span all client events are recorded under
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Publish a video the platform can fetch from `video_url`
    pub fn post_video_by_url<S: AsRef<str>>(
        &self,
        video_url: &str,
        caption: &str,
        hashtags: &[S],
    ) -> Result<Response> {
        let _entered = self.span.enter();

        let body = PublishBody::new(video_url, caption, hashtags);
        info!(video_url, "Posting video to TikTok: {}", video_url);

        let spec = RequestSpec::post(PUBLISH_URL_ENDPOINT).with_json(&body)?;
        self.transport.execute(&spec)
    }

    /// Publish whatever source the request names
    pub fn post_video(&self, request: &PostVideoRequest) -> Result<Response> {
        match request.source {
            VideoSource::Url(ref url) => {
                self.post_video_by_url(url, &request.caption, request.hashtags.as_slice())
            }
            VideoSource::File(ref path) => {
                self.post_video_file(path, &request.caption, request.hashtags.as_slice())
            }
        }
    }

    /// Open an upload session for a local file
    pub fn init_upload(&self, path: &Path) -> Result<UploadSession> {
        let _entered = self.span.enter();

        let body = InitUploadBody::for_path(path);
        info!(filename = %body.filename, "Initializing video upload");

        let spec = RequestSpec::post(INIT_UPLOAD_ENDPOINT).with_json(&body)?;
        let response = self.transport.execute(&spec)?;
        UploadSession::from_response(&response)
    }

    /// Send the file to the session's upload URL as one multipart field.
    /// This call is made once, without retry.
    pub fn upload_file(&self, session: &UploadSession, path: &Path) -> Result<()> {
        let _entered = self.span.enter();

        let part = read_file_part(path)?;
        info!(
            file = %path.display(),
            bytes = part.bytes.len(),
            "Uploading video file"
        );

        let response = self
            .transport
            .backend()
            .upload(&session.upload_url, part)
            .map_err(|e| {
                PostError::upload(
                    path.display().to_string(),
                    e.to_string(),
                    Some(Box::new(e)),
                )
            })?;

        if !response.is_success() {
            return Err(PostError::upload(
                path.display().to_string(),
                format!("upload failed with status {}: {}", response.status, response.text()),
                None,
            ));
        }

        Ok(())
    }

    /// Upload a local file, then publish it from the URL the platform
    /// assigned. Publishing is not attempted if either earlier step fails.
    pub fn post_video_file<S: AsRef<str>>(
        &self,
        path: &Path,
        caption: &str,
        hashtags: &[S],
    ) -> Result<Response> {
        let mut state = UploadState::Idle;
        let result = self.run_upload_sequence(&mut state, path, caption, hashtags);

        let _entered = self.span.enter();
        match result {
            Ok(_) => debug!(file = %path.display(), %state, "upload sequence finished"),
            Err(ref err) => {
                state = state.fail();
                debug!(file = %path.display(), %state, error = %err, "upload sequence aborted");
            }
        }
        result
    }

    fn run_upload_sequence<S: AsRef<str>>(
        &self,
        state: &mut UploadState,
        path: &Path,
        caption: &str,
        hashtags: &[S],
    ) -> Result<Response> {
        *state = state.advance();
        let session = self.init_upload(path)?;
        self.upload_file(&session, path)?;
        *state = state.advance();

        *state = state.advance();
        let response = self.post_video_by_url(&session.video_url, caption, hashtags)?;
        *state = state.advance();

        Ok(response)
    }

    /// Information about the authenticated account
    pub fn get_account_info(&self) -> Result<Response> {
        let _entered = self.span.enter();
        info!("Getting TikTok account information");
        self.transport.execute(&RequestSpec::get(USER_INFO_ENDPOINT))
    }

    /// Publish status of a previously posted video
    pub fn get_video_status(&self, video_id: &str) -> Result<Response> {
        let _entered = self.span.enter();
        info!(video_id, "Getting video status");
        self.transport
            .execute(&RequestSpec::get(PUBLISH_STATUS_ENDPOINT).with_query("video_id", video_id))
    }
}
