//! HTTP backend abstraction.
//!
//! The transport and platform client talk to the network through
//! [`HttpBackend`], so retry and composition logic run unchanged against a
//! scripted backend in tests. [`ReqwestBackend`] is the production
//! implementation over a pooled blocking `reqwest` client.

use crate::client::{create_rest_client, create_upload_client};
use crate::error::{Result, TransportFailure};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;

/// One fully-formed HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL including any query string
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// JSON body, only present for mutating methods
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw HTTP response as received, whatever its status
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        RawResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

/// A file sent as one multipart form field
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Network seam used by the transport and the raw upload step.
///
/// Implementations report connection problems, timeouts and requests that
/// cannot be built as [`TransportFailure`]; any response that arrives, 2xx
/// or not, is returned as a [`RawResponse`].
pub trait HttpBackend: Send + Sync {
    fn send(&self, request: &HttpRequest) -> std::result::Result<RawResponse, TransportFailure>;

    fn upload(&self, url: &str, part: FilePart) -> std::result::Result<RawResponse, TransportFailure>;
}

/// Backend over `reqwest::blocking`
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: Client,
    upload_client: Client,
}

impl ReqwestBackend {
    pub fn new() -> Result<Self> {
        Ok(ReqwestBackend {
            client: create_rest_client()?,
            upload_client: create_upload_client()?,
        })
    }

    /// Use caller-provided clients
    pub fn with_clients(client: Client, upload_client: Client) -> Self {
        ReqwestBackend {
            client,
            upload_client,
        }
    }
}

fn map_send_error(err: reqwest::Error) -> TransportFailure {
    if err.is_builder() {
        TransportFailure::Invalid(Box::new(err))
    } else if err.is_timeout() {
        TransportFailure::Timeout(Box::new(err))
    } else {
        TransportFailure::Network(Box::new(err))
    }
}

fn read_response(
    response: reqwest::blocking::Response,
) -> std::result::Result<RawResponse, TransportFailure> {
    let status = response.status().as_u16();
    let body = response.bytes().map_err(map_send_error)?;
    Ok(RawResponse::new(status, body.to_vec()))
}

impl HttpBackend for ReqwestBackend {
    fn send(&self, request: &HttpRequest) -> std::result::Result<RawResponse, TransportFailure> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(map_send_error)?;
        read_response(response)
    }

    fn upload(&self, url: &str, part: FilePart) -> std::result::Result<RawResponse, TransportFailure> {
        let file_part = Part::bytes(part.bytes)
            .file_name(part.file_name)
            .mime_str(&part.mime_type)
            .map_err(|e| TransportFailure::Invalid(Box::new(e)))?;
        let form = Form::new().part(part.field, file_part);

        let response = self
            .upload_client
            .post(url)
            .multipart(form)
            .send()
            .map_err(map_send_error)?;
        read_response(response)
    }
}

/// Blocks the calling thread between retry attempts
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Sleeper backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
