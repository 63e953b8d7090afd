use crate::error::{PostError, Result};
use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

/// RequestSpec describes one logical API call before it reaches the transport.
/// Built fresh per call and never shared.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    /// Endpoint path appended to the base URL, e.g. `/user/info`
    pub endpoint: String,
    /// JSON object body, only valid for mutating methods
    pub body: Option<Value>,
    pub query: Option<Vec<(String, String)>>,
    /// Attempt budget; falls back to the transport's configured default
    pub max_attempts: Option<u32>,
}

impl RequestSpec {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        RequestSpec {
            method,
            endpoint: endpoint.into(),
            body: None,
            query: None,
            max_attempts: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    /// Set the JSON body. Non-object values are rejected by [`validate`](Self::validate).
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize a value into the JSON body
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            PostError::RequestBuild(format!("cannot serialize request body: {}", e))
        })?;
        Ok(self.with_body(value))
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Whether the method carries a body (POST, PUT, PATCH)
    pub fn is_mutating(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }

    /// Check the method/payload combination before anything is sent.
    ///
    /// Bodies travel only with POST/PUT/PATCH and query parameters only
    /// with GET; mixing them is rejected.
    pub fn validate(&self) -> Result<()> {
        if !self.is_mutating() && self.method != Method::GET {
            return Err(PostError::RequestBuild(format!(
                "Unsupported HTTP method: {}",
                self.method
            )));
        }
        if self.method == Method::GET && self.body.is_some() {
            return Err(PostError::RequestBuild(
                "GET requests cannot carry a body".to_string(),
            ));
        }
        if self.is_mutating() && self.query.is_some() {
            return Err(PostError::RequestBuild(format!(
                "{} requests cannot carry query parameters",
                self.method
            )));
        }
        if let Some(ref body) = self.body {
            if !body.is_object() {
                return Err(PostError::RequestBuild(
                    "request body must be a JSON object".to_string(),
                ));
            }
        }
        if !self.endpoint.starts_with('/') {
            return Err(PostError::RequestBuild(format!(
                "endpoint must start with '/': {}",
                self.endpoint
            )));
        }
        Ok(())
    }

    /// Body actually sent: a fresh copy of the caller's body (or an empty
    /// object) with the shared secret added. `self` is left untouched.
    pub fn body_with_secret(&self, secret: &str) -> Value {
        let mut body = match self.body {
            Some(Value::Object(ref map)) => map.clone(),
            _ => Map::new(),
        };
        body.insert("api_secret".to_string(), Value::String(secret.to_string()));
        Value::Object(body)
    }
}
