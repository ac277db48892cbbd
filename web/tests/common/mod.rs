#![allow(dead_code)]

use axum::http::{self, Request};
use forms_core::ContentClient;
use forms_web::{AppState, ReqwestTransport, Settings};
use http_body_util::BodyExt;

pub const BOUNDARY: &str = "forms-web-test";

pub fn state_for(base_url: &str) -> AppState {
    AppState::new(
        ContentClient::new(base_url).unwrap(),
        ReqwestTransport::new().unwrap(),
        Settings::default(),
    )
}

/// State whose content API is never reached.
pub fn offline_state() -> AppState {
    state_for("http://127.0.0.1:9")
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

pub fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

/// Builds a `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, mime: &str, content: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(content);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<axum::body::Body> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                http::header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(axum::body::Body::from(self.bytes))
            .unwrap()
    }
}

/// A complete, valid profile submission.
pub fn profile_body() -> MultipartBody {
    MultipartBody::default()
        .text("website", "https://example.com")
        .text("about", "Backend developer who likes forms.")
        .text("firstName", "Ada")
        .text("lastName", "Lovelace")
        .text("email", "ada@example.com")
        .text("country", "Canada")
        .text("streetAddress", "12 Analytical Way")
        .text("city", "Toronto")
        .text("region", "Ontario")
        .text("zip", "M5V 2T6")
        .file("image", "me.png", "image/png", b"\x89PNG fake image")
        .file("resume", "cv.pdf", "application/pdf", b"%PDF-1.7 fake resume")
}
