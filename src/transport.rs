use crate::backend::{HttpBackend, HttpRequest, ReqwestBackend, Sleeper, ThreadSleeper};
use crate::client::Config;
use crate::credentials::Credentials;
use crate::error::{PostError, Result, TransportFailure};
use crate::request::RequestSpec;
use crate::response::Response;
use std::sync::Arc;
use tracing::{debug, error, info_span, warn, Span};
use url::Url;

/// Transport executes one logical API call: it attaches authentication,
/// bounds each attempt with the configured timeout and retries transient
/// failures with exponential backoff.
#[derive(Clone)]
pub struct Transport {
    config: Config,
    credentials: Credentials,
    backend: Arc<dyn HttpBackend>,
    sleeper: Arc<dyn Sleeper>,
    span: Span,
}

impl Transport {
    /// Create a transport over the given backend
    pub fn new(config: Config, credentials: Credentials, backend: Arc<dyn HttpBackend>) -> Self {
        Transport {
            config,
            credentials,
            backend,
            sleeper: Arc::new(ThreadSleeper),
            span: info_span!("transport"),
        }
    }

    /// Create a transport from environment configuration over `reqwest`
    pub fn from_env() -> Result<Self> {
        Ok(Transport::new(
            Config::from_env(),
            Credentials::from_env(),
            Arc::new(ReqwestBackend::new()?),
        ))
    }

    /// Replace the sleeper used for backoff waits
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Attach the span all transport events are recorded under
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn backend(&self) -> &Arc<dyn HttpBackend> {
        &self.backend
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Headers sent with every API request. The key is carried both as a
    /// bearer token and as `X-API-Key`.
    pub fn headers(&self) -> Vec<(String, String)> {
        let key = self.credentials.key();
        vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {}", key)),
            ("X-API-Key".to_string(), key.to_string()),
        ]
    }

    /// Turn a request spec into the concrete HTTP request sent on each attempt
    pub fn build_request(&self, spec: &RequestSpec) -> Result<HttpRequest> {
        spec.validate()?;

        let mut url = Url::parse(&self.config.endpoint_url(&spec.endpoint))?;
        if let Some(ref query) = spec.query {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        let body = if spec.is_mutating() {
            Some(spec.body_with_secret(self.credentials.secret()))
        } else {
            None
        };

        Ok(HttpRequest {
            method: spec.method.clone(),
            url: url.to_string(),
            headers: self.headers(),
            body,
            timeout: self.config.timeout,
        })
    }

    /// Execute a request and decode its JSON body.
    ///
    /// Failed attempts are retried until the budget runs out; the wait
    /// before attempt `n + 1` is `backoff_unit * 2^n`. A body that is not
    /// valid JSON fails immediately without retry.
    pub fn execute(&self, spec: &RequestSpec) -> Result<Response> {
        let _entered = self.span.enter();

        let request = self.build_request(spec)?;
        let max_attempts = spec.max_attempts.unwrap_or(self.config.max_attempts).max(1);

        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(
                method = %request.method,
                endpoint = %spec.endpoint,
                attempt,
                max_attempts,
                "sending request"
            );

            let failure = match self.backend.send(&request) {
                Ok(raw) if raw.is_success() => {
                    return Response::from_slice(&raw.body).map_err(PostError::from);
                }
                Ok(raw) => TransportFailure::Status {
                    status: raw.status,
                    body: raw.text(),
                },
                Err(TransportFailure::Invalid(err)) => {
                    error!(endpoint = %spec.endpoint, error = %err, "Request could not be built");
                    return Err(PostError::RequestBuild(err.to_string()));
                }
                Err(failure) => failure,
            };

            if attempt >= max_attempts
                || !failure.is_retryable(self.config.retry_client_errors)
            {
                error!(
                    endpoint = %spec.endpoint,
                    attempts = attempt,
                    error = %failure,
                    "Failed to make request after {} attempts",
                    attempt
                );
                return Err(PostError::Transport {
                    attempts: attempt,
                    cause: failure,
                });
            }

            let wait = self.config.backoff_for(attempt);
            warn!(
                endpoint = %spec.endpoint,
                error = %failure,
                "Request failed, retrying in {:?}... ({}/{})",
                wait,
                attempt,
                max_attempts
            );
            self.sleeper.sleep(wait);
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
