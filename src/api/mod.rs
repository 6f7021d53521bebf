//! Client for the complaint backend's REST API.
//!
//! Every endpoint answers with an envelope:
//!
//! ```json
//! { "success": true, "message": "...", "data": { ... } }
//! ```
//!
//! Failures may also carry `errors: [{ "msg": "..." }]` (validation output
//! from the backend). The first of those, else `message`, is what the user
//! sees.

pub mod accounts;
pub mod announcements;
pub mod auth;
pub mod categories;
pub mod complaints;
pub mod dashboard;

pub use complaints::Submission;

use crate::app_config::ApiConfig;
use crate::error::{LaporError, LaporResult};
use crate::forms::AttachmentUpload;
use crate::models::Page;
use crate::session::Session;
use reqwest::multipart::Part;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Pagination and search for staff listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search: String,
}

impl ListQuery {
    pub fn first_page(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            search: String::new(),
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::first_page(crate::app_config::api().page_size)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    msg: Option<String>,
}

/// Failure-relevant part of an envelope.
#[derive(Debug, Default, Deserialize)]
struct EnvelopeHead {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

impl EnvelopeHead {
    fn failure_message(&self) -> Option<String> {
        self.errors
            .iter()
            .find_map(|e| e.msg.clone())
            .or_else(|| self.message.clone())
            .filter(|m| !m.trim().is_empty())
    }
}

/// A decoded successful envelope.
#[derive(Debug, Clone)]
pub(crate) struct Reply {
    body: Value,
}

impl Reply {
    pub(crate) fn message(&self) -> Option<String> {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Top-level envelope field.
    pub(crate) fn field<T: DeserializeOwned>(&self, key: &str) -> LaporResult<T> {
        decode_value(self.body.get(key), key)
    }

    pub(crate) fn has_field(&self, key: &str) -> bool {
        self.body.get(key).map_or(false, |v| !v.is_null())
    }

    pub(crate) fn data<T: DeserializeOwned>(&self) -> LaporResult<T> {
        decode_value(self.body.get("data"), "data")
    }

    /// `data.{key}` if present, else `data` itself.
    pub(crate) fn data_item<T: DeserializeOwned>(&self, key: &str) -> LaporResult<T> {
        match self.body.get("data").and_then(|d| d.get(key)) {
            Some(inner) if !inner.is_null() => decode_value(Some(inner), key),
            _ => self.data(),
        }
    }

    /// List under `data.{key}`, or `data` when it is already an array.
    pub(crate) fn data_list<T: DeserializeOwned>(&self, key: &str) -> LaporResult<Vec<T>> {
        match self.body.get("data") {
            Some(Value::Array(_)) => self.data(),
            Some(data) => decode_value(data.get(key), key),
            None => Ok(Vec::new()),
        }
    }

    /// Paginated list under `data.{key}` with `data.totalPages`.
    pub(crate) fn data_page<T: DeserializeOwned>(&self, key: &str) -> LaporResult<Page<T>> {
        let items = self.data_list(key)?;
        let total_pages = self
            .body
            .get("data")
            .and_then(|d| d.get("totalPages"))
            .and_then(Value::as_u64)
            .unwrap_or(1) as u32;
        Ok(Page { items, total_pages })
    }
}

fn decode_value<T: DeserializeOwned>(value: Option<&Value>, what: &str) -> LaporResult<T> {
    let value = value.ok_or_else(|| LaporError::Decode(format!("missing `{}`", what)))?;
    serde_json::from_value(value.clone())
        .map_err(|e| LaporError::Decode(format!("`{}`: {}", what, e)))
}

/// Classify a finished response.
///
/// Non-2xx and `success: false` are server errors; a 2xx body that is not
/// JSON is a decode error.
pub(crate) fn interpret(status: u16, body: &str) -> LaporResult<Reply> {
    let parsed: Result<Value, _> = serde_json::from_str(body);
    let ok = (200..300).contains(&status);

    let value = match parsed {
        Ok(value) => value,
        Err(_) if !ok => {
            return Err(LaporError::Server {
                status,
                message: format!("Permintaan gagal ({})", status),
            })
        }
        Err(e) => return Err(LaporError::Decode(e.to_string())),
    };

    let head: EnvelopeHead = serde_json::from_value(value.clone()).unwrap_or_default();
    if !ok || head.success == Some(false) {
        let message = head
            .failure_message()
            .unwrap_or_else(|| format!("Permintaan gagal ({})", status));
        return Err(LaporError::Server { status, message });
    }

    Ok(Reply { body: value })
}

/// Handle on the backend, optionally authenticated.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> LaporResult<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| LaporError::Config(format!("api.base_url {}: {}", config.base_url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| LaporError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base,
            token: None,
        })
    }

    /// Client built from the global configuration.
    pub fn from_config() -> LaporResult<Self> {
        Self::new(&crate::app_config::api())
    }

    /// A clone that sends `Authorization: Bearer {token}`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn for_session<U>(&self, session: &Session<U>) -> Self {
        self.with_token(session.token.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        log::debug!("{} {}", method, path);
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and decode the envelope.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> LaporResult<Reply> {
        let response = builder
            .send()
            .await
            .map_err(|e| LaporError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LaporError::Network(e.to_string()))?;

        let reply = interpret(status, &body);
        if let Err(e) = &reply {
            log::debug!("Request failed: {}", e);
        }
        reply
    }

    /// Send and return the raw body of a 2xx response.
    pub(crate) async fn send_bytes(&self, builder: RequestBuilder) -> LaporResult<Vec<u8>> {
        let response = builder
            .send()
            .await
            .map_err(|e| LaporError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| LaporError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            let text = String::from_utf8_lossy(&body);
            return Err(interpret(status, &text).err().unwrap_or(LaporError::Server {
                status,
                message: format!("Permintaan gagal ({})", status),
            }));
        }
        Ok(body.to_vec())
    }
}

/// Multipart file part with a content type taken from the file name.
pub(crate) fn file_part(upload: &AttachmentUpload) -> LaporResult<Part> {
    Part::bytes(upload.bytes.clone())
        .file_name(upload.file_name.clone())
        .mime_str(upload.mime().as_ref())
        .map_err(|e| LaporError::Decode(e.to_string()))
}
