use tracing::warn;

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "TIKTOK_API_KEY";
/// Environment variable holding the shared secret
pub const API_SECRET_VAR: &str = "SOCIAL_MEDIA_TOKEN";

/// Credentials is the (key, secret) pair attached to every API request.
/// The key goes into the auth headers, the secret into the request body.
#[derive(Clone, Default)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    /// Create credentials from explicit values
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Credentials {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Read credentials from `TIKTOK_API_KEY` and `SOCIAL_MEDIA_TOKEN`.
    ///
    /// Missing values are logged and replaced by empty strings; requests still
    /// go out and fail remotely if the platform needs them.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let creds = Credentials {
            key: lookup(API_KEY_VAR).unwrap_or_default(),
            secret: lookup(API_SECRET_VAR).unwrap_or_default(),
        };

        if !creds.is_complete() {
            warn!(
                key_present = !creds.key.is_empty(),
                secret_present = !creds.secret.is_empty(),
                "TikTok API credentials not found in environment variables"
            );
        }

        creds
    }

    /// API key sent in the `Authorization` and `X-API-Key` headers
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Shared secret injected into request bodies
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Check that both key and secret are set
    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty()
    }
}

// Implement Debug manually to avoid exposing the key and secret
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"<redacted>")
            .field("secret", &"<redacted>")
            .finish()
    }
}
