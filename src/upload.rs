use crate::backend::FilePart;
use crate::error::{PostError, Result};
use crate::response::Response;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// MIME type announced for uploaded videos
pub const VIDEO_MIME_TYPE: &str = "video/mp4";
/// Multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// Body of `POST /post/publish/video/init`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitUploadBody {
    pub source: String,
    pub content_type: String,
    pub filename: String,
}

impl InitUploadBody {
    pub fn for_path(path: &Path) -> Self {
        InitUploadBody {
            source: "FILE_UPLOAD".to_string(),
            content_type: VIDEO_MIME_TYPE.to_string(),
            filename: file_name(path),
        }
    }
}

/// UploadSession is the short-lived result of the init-upload call:
/// where to send the file, and the URL the video will be published from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub upload_url: String,
    pub video_url: String,
}

impl UploadSession {
    /// Extract the session from an init-upload response.
    /// Fields are read at the top level, or under `data` when the platform
    /// wraps its payload.
    pub fn from_response(response: &Response) -> Result<Self> {
        let upload_url = response
            .find_string(&["upload_url", "data/upload_url"])
            .ok_or_else(|| {
                PostError::UnexpectedResponse("init upload response has no upload_url".to_string())
            })?;
        let video_url = response
            .find_string(&["video_url", "data/video_url"])
            .ok_or_else(|| {
                PostError::UnexpectedResponse("init upload response has no video_url".to_string())
            })?;

        Ok(UploadSession {
            upload_url,
            video_url,
        })
    }
}

/// Progress of an upload-then-post sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Uploading,
    Uploaded,
    Publishing,
    Published,
    Failed,
}

impl UploadState {
    /// Next state on success. Terminal states stay where they are.
    pub fn advance(self) -> Self {
        match self {
            UploadState::Idle => UploadState::Uploading,
            UploadState::Uploading => UploadState::Uploaded,
            UploadState::Uploaded => UploadState::Publishing,
            UploadState::Publishing => UploadState::Published,
            UploadState::Published => UploadState::Published,
            UploadState::Failed => UploadState::Failed,
        }
    }

    /// Any failure is terminal
    pub fn fail(self) -> Self {
        match self {
            UploadState::Published => UploadState::Published,
            _ => UploadState::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, UploadState::Published | UploadState::Failed)
    }
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UploadState::Idle => "idle",
            UploadState::Uploading => "uploading",
            UploadState::Uploaded => "uploaded",
            UploadState::Publishing => "publishing",
            UploadState::Published => "published",
            UploadState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Base name of a path, or the whole path when it has none
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Read a local video into a multipart file part.
/// The whole file is held in memory.
pub fn read_file_part(path: &Path) -> Result<FilePart> {
    let name = file_name(path);
    let bytes = std::fs::read(path).map_err(|e| {
        PostError::upload(
            path.display().to_string(),
            format!("cannot read file: {}", e),
            Some(Box::new(e)),
        )
    })?;

    Ok(FilePart {
        field: FILE_FIELD.to_string(),
        file_name: name,
        mime_type: VIDEO_MIME_TYPE.to_string(),
        bytes,
    })
}
