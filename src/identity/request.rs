use reqwest::Method;
use serde::Serialize;

use crate::error::AppResult;

/// Caller-side request options for `SessionAuthority::authenticated_fetch`.
/// Headers listed here win over the authority's own on a name collision.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: Method::GET, headers: Vec::new(), body: None }
    }
}

impl RequestOptions {
    pub fn get() -> Self { Self::default() }

    pub fn delete() -> Self { Self { method: Method::DELETE, ..Self::default() } }

    pub fn post_json<T: Serialize>(payload: &T) -> AppResult<Self> {
        Ok(Self { method: Method::POST, headers: Vec::new(), body: Some(serde_json::to_string(payload)?) })
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
