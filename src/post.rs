use serde::Serialize;
use std::path::PathBuf;

/// Maximum length of the post title, in characters
pub const TITLE_MAX_CHARS: usize = 80;

/// Where the video to publish comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Publicly reachable video URL the platform pulls from
    Url(String),
    /// Local file uploaded before publishing
    File(PathBuf),
}

/// PostVideoRequest is a video to publish together with its caption and hashtags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostVideoRequest {
    pub source: VideoSource,
    pub caption: String,
    pub hashtags: Vec<String>,
}

impl PostVideoRequest {
    pub fn from_url(url: impl Into<String>) -> Self {
        PostVideoRequest {
            source: VideoSource::Url(url.into()),
            caption: String::new(),
            hashtags: Vec::new(),
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        PostVideoRequest {
            source: VideoSource::File(path.into()),
            caption: String::new(),
            hashtags: Vec::new(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_hashtags<I, S>(mut self, hashtags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hashtags = hashtags.into_iter().map(Into::into).collect();
        self
    }

    /// Caption with hashtags appended
    pub fn full_caption(&self) -> String {
        format_caption(&self.caption, self.hashtags.as_slice())
    }
}

/// Append hashtags to a caption as space-separated `#tag` tokens.
///
/// Leading and trailing whitespace of the result is trimmed, so an empty
/// hashtag list leaves the caption unchanged.
pub fn format_caption<S: AsRef<str>>(caption: &str, hashtags: &[S]) -> String {
    let tags = hashtags
        .iter()
        .map(|tag| format!("#{}", tag.as_ref()))
        .collect::<Vec<_>>()
        .join(" ");

    format!("{} {}", caption, tags).trim().to_string()
}

/// First [`TITLE_MAX_CHARS`] characters of a caption
pub fn title_from_caption(caption: &str) -> String {
    caption.chars().take(TITLE_MAX_CHARS).collect()
}

/// Post options sent with a publish request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostInfo {
    pub title: String,
    pub disable_comment: bool,
    pub disable_duet: bool,
    pub disable_stitch: bool,
}

impl PostInfo {
    /// Options with every interaction enabled
    pub fn new(title: impl Into<String>) -> Self {
        PostInfo {
            title: title.into(),
            disable_comment: false,
            disable_duet: false,
            disable_stitch: false,
        }
    }
}

/// Body of `POST /post/publish/video/url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishBody {
    pub video_url: String,
    pub caption: String,
    pub post_info: PostInfo,
}

impl PublishBody {
    /// Build the publish body; the title is the caption cut to 80 characters
    /// while `caption` itself is sent whole.
    pub fn new<S: AsRef<str>>(video_url: &str, caption: &str, hashtags: &[S]) -> Self {
        let caption = format_caption(caption, hashtags);
        PublishBody {
            video_url: video_url.to_string(),
            post_info: PostInfo::new(title_from_caption(&caption)),
            caption,
        }
    }
}
