use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response is a decoded API response body.
/// The body is kept as-is; helpers give path-based access into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Response(Value);

impl Response {
    pub fn new(value: Value) -> Self {
        Response(value)
    }

    /// Decode a response body
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body).map(Response)
    }

    /// Get the raw decoded value
    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Unmarshal the response into the provided type
    pub fn apply<T>(&self) -> Result<T, crate::error::PostError>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_value(self.0.clone()).map_err(|e| e.into())
    }

    /// Get a value by a slash-separated path.
    /// For example, "data/upload_url" accesses the "upload_url" field inside "data".
    /// An empty path returns the whole body.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.0;

        for part in path.split('/').filter(|s| !s.is_empty()) {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(arr) => {
                    let index: usize = part.parse().ok()?;
                    arr.get(index)?
                }
                _ => return None,
            };
        }

        Some(current)
    }

    /// Get a string value by a slash-separated path
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).and_then(|v| v.as_str().map(|s| s.to_string()))
    }

    /// First non-empty string found among the given paths
    pub fn find_string(&self, paths: &[&str]) -> Option<String> {
        paths
            .iter()
            .filter_map(|path| self.get_string(path))
            .find(|s| !s.is_empty())
    }
}

impl From<Response> for Value {
    fn from(response: Response) -> Self {
        response.0
    }
}
