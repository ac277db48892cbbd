//! Stateless HTTP request builder and response parser for the content API.
//!
//! # Design
//! `ContentClient` holds only a validated `base_url` and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip.
//!
//! A missing base URL is a configuration problem, so it is rejected when the
//! client is constructed; there is no way to build a request without one.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpBody, HttpMethod, HttpRequest, HttpResponse, MultipartPart};
use crate::types::FileDescriptor;

/// Environment variable holding the content API base URL.
pub const BASE_URL_ENV: &str = "STRAPI_API_URL";

/// Path of the media upload endpoint.
pub const UPLOAD_PATH: &str = "/api/upload";

/// Multipart field name the upload endpoint reads files from.
pub const UPLOAD_FIELD: &str = "files";

/// A file as stored by the content API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: u64,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ContentClient {
    base_url: String,
}

impl ContentClient {
    /// Bind a client to `base_url`.
    ///
    /// Fails with `ApiError::Configuration` if the URL is blank or not an
    /// absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(missing_base_url());
        }
        let parsed = Url::parse(trimmed).map_err(|e| {
            ApiError::Configuration(format!("{BASE_URL_ENV} is not a valid URL: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Configuration(format!(
                "{BASE_URL_ENV} must use http or https, got `{}`",
                parsed.scheme()
            )));
        }
        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
        })
    }

    /// Build from an optional setting, treating `None` like a blank value.
    pub fn from_setting(base_url: Option<&str>) -> Result<Self, ApiError> {
        match base_url {
            Some(url) => Self::new(url),
            None => Err(missing_base_url()),
        }
    }

    /// Build from the `STRAPI_API_URL` environment variable.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_setting(std::env::var(BASE_URL_ENV).ok().as_deref())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_create_record<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(ApiError::MissingPath);
        }
        let body = serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url_for(path),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(HttpBody::Json(body)),
        })
    }

    pub fn build_upload_file(&self, file: &FileDescriptor) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: self.url_for(UPLOAD_PATH),
            headers: Vec::new(),
            body: Some(HttpBody::Multipart(vec![MultipartPart {
                name: UPLOAD_FIELD.to_string(),
                file_name: file.name.clone(),
                content_type: file.mime_type.clone(),
                content: file.content.clone(),
            }])),
        }
    }

    pub fn parse_create_record(&self, response: HttpResponse) -> Result<serde_json::Value, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Parse the upload response and return the first stored file.
    pub fn parse_upload_file(&self, response: HttpResponse) -> Result<StoredFile, ApiError> {
        check_status(&response)?;
        let files: Vec<StoredFile> = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        files
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Deserialization("upload response contained no files".to_string()))
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

fn missing_base_url() -> ApiError {
    ApiError::Configuration(format!("{BASE_URL_ENV} environment variable is not defined."))
}

/// Map non-2xx responses to `ApiError::Status`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Status {
        status: response.status,
        status_text: response.status_text.clone(),
        body: response.body.clone(),
    })
}
