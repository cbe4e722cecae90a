pub(crate) mod resources;

use futures::future::{FutureExt, LocalBoxFuture};
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// The only failure the client distinguishes: the request did not complete, or it
/// completed with a non-2xx status. The response body of a failed request is ignored.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    /// HTTP status, when the server answered at all.
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub(crate) fn network(e: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            message: e.to_string(),
        }
    }

    pub(crate) fn status(status: u16, ctx: &str) -> Self {
        Self {
            status: Some(status),
            message: format!("{ctx} ({status})"),
        }
    }

    /// Replace the generic status text with what the caller was trying to do.
    /// Errors without a status keep their message.
    pub(crate) fn in_context(self, ctx: &str) -> Self {
        match self.status {
            Some(status) => Self::status(status, ctx),
            None => self,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub(crate) fn decode(e: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            message: format!("Unexpected response: {e}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub(crate) enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A fully described backend call. `path` is relative to the API base URL and
/// already carries any (encoded) query string.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: &impl Serialize) -> ApiResult<Self> {
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            body: Some(serde_json::to_value(body).map_err(ApiError::decode)?),
        })
    }

    pub fn put(path: impl Into<String>, body: &impl Serialize) -> ApiResult<Self> {
        Ok(Self {
            method: Method::Put,
            path: path.into(),
            body: Some(serde_json::to_value(body).map_err(ApiError::decode)?),
        })
    }
}

/// Sends one request, once. No retries, no timeouts, no caching.
pub(crate) trait Transport {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'static, ApiResult<serde_json::Value>>;
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        // `window.ENV.API_URL` first, then `window.ENV.api_url`.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    for key in ["API_URL", "api_url"] {
                        if let Ok(api_url) = js_sys::Reflect::get(&env, &key.into()) {
                            if let Some(url_str) = api_url.as_string() {
                                return Self { api_url: url_str };
                            }
                        }
                    }
                }
            }
        }

        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    pub(crate) fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for ApiClient {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'static, ApiResult<serde_json::Value>> {
        let url = self.url_for(&request.path);
        let mut req = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };
        if let Some(body) = &request.body {
            req = req.json(body);
        }
        let method = request.method;

        async move {
            tracing::debug!(%method, %url, "sending request");
            let res = req.send().await.map_err(ApiError::network)?;

            let status = res.status();
            if !status.is_success() {
                tracing::warn!(%method, %url, status = status.as_u16(), "request failed");
                return Err(ApiError::status(status.as_u16(), "Network response was not ok"));
            }

            let text = res.text().await.map_err(ApiError::network)?;
            if text.trim().is_empty() {
                return Ok(serde_json::Value::Null);
            }
            serde_json::from_str(&text).map_err(ApiError::decode)
        }
        .boxed_local()
    }
}
