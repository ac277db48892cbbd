//! Per-request orchestration: decode result → validation → forwarding.
//!
//! # Design
//! A submission moves through `SubmissionState`s without ever going back:
//! `Received → Decoded → Validated → Forwarding → Succeeded`, ending early
//! in `Rejected` (bad body or field errors) or `Failed` (an external call
//! went wrong). Decoding is done by the host, which hands over a
//! `Result<RawInput, DecodeError>`; everything after that happens here.
//!
//! Forwarding is one attempt per call. Files already uploaded stay uploaded
//! if record creation fails afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::client::{ContentClient, StoredFile};
use crate::error::{ApiError, DecodeError, ForwardError, Operation};
use crate::http::Transport;
use crate::rules::FieldRuleSet;
use crate::types::{FieldErrors, FieldValue, RawInput, ValidatedRecord};
use crate::validate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Received,
    Decoded,
    Validated,
    Forwarding,
    Succeeded,
    Rejected,
    Failed,
}

impl SubmissionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SubmissionState::Succeeded | SubmissionState::Rejected | SubmissionState::Failed
        )
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionState::Received => "received",
            SubmissionState::Decoded => "decoded",
            SubmissionState::Validated => "validated",
            SubmissionState::Forwarding => "forwarding",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Rejected => "rejected",
            SubmissionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why a submission was turned away before any external call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Decode(DecodeError),
    Invalid(FieldErrors),
}

/// What a successful submission produced.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub record: ValidatedRecord,
    /// Storage reference per file field.
    pub uploads: BTreeMap<String, StoredFile>,
    /// Record-creation response, when the submission was forwarded.
    pub created: Option<Value>,
}

impl Receipt {
    fn local(record: ValidatedRecord) -> Self {
        Self {
            record,
            uploads: BTreeMap::new(),
            created: None,
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Rejected(Rejection),
    Succeeded(Receipt),
    Failed(ForwardError),
}

impl Outcome {
    pub fn state(&self) -> SubmissionState {
        match self {
            Outcome::Rejected(_) => SubmissionState::Rejected,
            Outcome::Succeeded(_) => SubmissionState::Succeeded,
            Outcome::Failed(_) => SubmissionState::Failed,
        }
    }
}

/// Runs submissions of one form against its rule set.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionHandler<'a> {
    form: &'a str,
    rules: &'a FieldRuleSet,
}

impl<'a> SubmissionHandler<'a> {
    /// `form` names the form in log events.
    pub fn new(form: &'a str, rules: &'a FieldRuleSet) -> Self {
        Self { form, rules }
    }

    /// Decoded → Validated, or Rejected.
    pub fn admit(&self, decoded: Result<RawInput, DecodeError>) -> Result<ValidatedRecord, Rejection> {
        let raw = match decoded {
            Ok(raw) => raw,
            Err(err) => {
                debug!(form = self.form, state = %SubmissionState::Rejected, error = %err, "body could not be decoded");
                return Err(Rejection::Decode(err));
            }
        };
        debug!(form = self.form, state = %SubmissionState::Decoded, inputs = raw.len());

        match validate(&raw, self.rules) {
            Ok(record) => {
                debug!(form = self.form, state = %SubmissionState::Validated, fields = record.len());
                Ok(record)
            }
            Err(errors) => {
                debug!(form = self.form, state = %SubmissionState::Rejected, failing = errors.len(), "validation failed");
                Err(Rejection::Invalid(errors))
            }
        }
    }

    /// Run a submission that has no external side effects.
    pub fn submit_local(&self, decoded: Result<RawInput, DecodeError>) -> Outcome {
        match self.admit(decoded) {
            Ok(record) => {
                debug!(form = self.form, state = %SubmissionState::Succeeded);
                Outcome::Succeeded(Receipt::local(record))
            }
            Err(rejection) => Outcome::Rejected(rejection),
        }
    }

    /// Run a submission and forward the validated record.
    pub async fn submit<T: Transport + Sync>(
        &self,
        decoded: Result<RawInput, DecodeError>,
        forwarder: &Forwarder<'_, T>,
    ) -> Outcome {
        let record = match self.admit(decoded) {
            Ok(record) => record,
            Err(rejection) => return Outcome::Rejected(rejection),
        };

        debug!(form = self.form, state = %SubmissionState::Forwarding, path = forwarder.path);
        match forwarder.forward(record).await {
            Ok(receipt) => {
                debug!(form = self.form, state = %SubmissionState::Succeeded, uploads = receipt.uploads.len());
                Outcome::Succeeded(receipt)
            }
            Err(err) => {
                warn!(form = self.form, state = %SubmissionState::Failed, error = %err, "forwarding failed");
                Outcome::Failed(err)
            }
        }
    }
}

/// Relays validated records to the content API.
#[derive(Debug)]
pub struct Forwarder<'a, T> {
    client: &'a ContentClient,
    transport: &'a T,
    path: &'a str,
}

impl<'a, T: Transport + Sync> Forwarder<'a, T> {
    /// Records are created at `path` relative to the client's base URL.
    pub fn new(client: &'a ContentClient, transport: &'a T, path: &'a str) -> Self {
        Self {
            client,
            transport,
            path,
        }
    }

    /// Upload every file field in name order, then create the record.
    pub async fn forward(&self, record: ValidatedRecord) -> Result<Receipt, ForwardError> {
        let mut uploads = BTreeMap::new();
        for (field, file) in record.files() {
            let upload = |source: ApiError| {
                ForwardError::new(
                    Operation::Upload {
                        field: field.to_string(),
                    },
                    source,
                )
            };
            let request = self.client.build_upload_file(file);
            let response = self.transport.execute(request).await.map_err(upload)?;
            let stored = self.client.parse_upload_file(response).map_err(upload)?;
            debug!(field, id = stored.id, size = file.size_bytes, "file uploaded");
            uploads.insert(field.to_string(), stored);
        }

        let create = |source: ApiError| {
            ForwardError::new(
                Operation::CreateRecord {
                    path: self.path.to_string(),
                },
                source,
            )
        };
        let payload = record_payload(&record, &uploads);
        let request = self.client.build_create_record(self.path, &payload).map_err(create)?;
        let response = self.transport.execute(request).await.map_err(create)?;
        let created = self.client.parse_create_record(response).map_err(create)?;

        Ok(Receipt {
            record,
            uploads,
            created: Some(created),
        })
    }
}

/// The record-creation body: `{"data": {...}}` with text fields as strings
/// and file fields replaced by their upload id.
pub fn record_payload(record: &ValidatedRecord, uploads: &BTreeMap<String, StoredFile>) -> Value {
    let mut data = Map::new();
    for (field, value) in record.iter() {
        match value {
            FieldValue::Text(text) => {
                data.insert(field.to_string(), Value::String(text.clone()));
            }
            FieldValue::File(_) => {
                if let Some(stored) = uploads.get(field) {
                    data.insert(field.to_string(), Value::from(stored.id));
                }
            }
        }
    }
    let mut body = Map::new();
    body.insert("data".to_string(), Value::Object(data));
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use bytes::Bytes;

    use super::*;
    use crate::http::{HttpBody, HttpRequest, HttpResponse};
    use crate::types::FileDescriptor;

    /// Replays canned responses and records every request.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn reply(self, status: u16, status_text: &str, body: &str) -> Self {
            self.replies.lock().unwrap().push_back(Ok(HttpResponse {
                status,
                status_text: status_text.to_string(),
                headers: Vec::new(),
                body: body.to_string(),
            }));
            self
        }

        fn fail(self, err: ApiError) -> Self {
            self.replies.lock().unwrap().push_back(Err(err));
            self
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected request")
        }
    }

    fn client() -> ContentClient {
        ContentClient::new("http://content.test").unwrap()
    }

    fn profile_input() -> RawInput {
        RawInput::new()
            .with_text("website", "https://example.com")
            .with_text("about", "I build forms.")
            .with_text("firstName", "Ada")
            .with_text("lastName", "Lovelace")
            .with_text("email", "ada@example.com")
            .with_text("country", "Canada")
            .with_text("streetAddress", "12 Analytical Way")
            .with_text("city", "Toronto")
            .with_text("region", "Ontario")
            .with_text("zip", "M5V 2T6")
            .with_file("image", FileDescriptor::new("me.png", "image/png", Bytes::from_static(b"png")))
            .with_file("resume", FileDescriptor::new("cv.pdf", "application/pdf", Bytes::from_static(b"pdf")))
    }

    const IMAGE_STORED: &str = r#"[{"id":1,"name":"me.png","url":"/uploads/me.png"}]"#;
    const RESUME_STORED: &str = r#"[{"id":2,"name":"cv.pdf","url":"/uploads/cv.pdf"}]"#;
    const CREATED: &str = r#"{"data":{"id":9,"attributes":{}},"meta":{}}"#;

    #[test]
    fn decode_failure_is_not_a_validation_failure() {
        let rules = FieldRuleSet::credentials();
        let handler = SubmissionHandler::new("login", &rules);
        let outcome = handler.submit_local(Err(DecodeError::Malformed("truncated".to_string())));
        assert!(matches!(outcome, Outcome::Rejected(Rejection::Decode(_))));
        assert_eq!(outcome.state(), SubmissionState::Rejected);
    }

    #[test]
    fn local_submission_succeeds_without_forwarding() {
        let rules = FieldRuleSet::credentials();
        let handler = SubmissionHandler::new("login", &rules);
        let raw = RawInput::new()
            .with_text("email", "a@b.com")
            .with_text("password", "secret1");
        let Outcome::Succeeded(receipt) = handler.submit_local(Ok(raw)) else {
            panic!("expected success");
        };
        assert!(receipt.created.is_none());
        assert!(receipt.uploads.is_empty());
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_transport() {
        let rules = FieldRuleSet::profile_registration();
        let handler = SubmissionHandler::new("profile", &rules);
        let transport = ScriptedTransport::default();
        let client = client();
        let forwarder = Forwarder::new(&client, &transport, "/api/profiles");

        let outcome = handler
            .submit(Ok(profile_input().with_text("zip", "1")), &forwarder)
            .await;
        let Outcome::Rejected(Rejection::Invalid(errors)) = outcome else {
            panic!("expected field errors");
        };
        assert!(errors.contains("zip"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn uploads_files_then_creates_record() {
        let rules = FieldRuleSet::profile_registration();
        let handler = SubmissionHandler::new("profile", &rules);
        let transport = ScriptedTransport::default()
            .reply(200, "OK", IMAGE_STORED)
            .reply(200, "OK", RESUME_STORED)
            .reply(200, "OK", CREATED);
        let client = client();
        let forwarder = Forwarder::new(&client, &transport, "/api/profiles");

        let Outcome::Succeeded(receipt) = handler.submit(Ok(profile_input()), &forwarder).await else {
            panic!("expected success");
        };
        assert_eq!(receipt.uploads["image"].id, 1);
        assert_eq!(receipt.uploads["resume"].id, 2);
        assert_eq!(receipt.created.unwrap()["data"]["id"], 9);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].url, "http://content.test/api/upload");
        assert_eq!(requests[2].url, "http://content.test/api/profiles");
        let Some(HttpBody::Json(body)) = &requests[2].body else {
            panic!("expected JSON record body");
        };
        let body: Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["data"]["image"], 1);
        assert_eq!(body["data"]["resume"], 2);
        assert_eq!(body["data"]["state"], "Ontario");
        assert!(body["data"].get("region").is_none());
    }

    #[tokio::test]
    async fn upload_status_error_names_the_field() {
        let rules = FieldRuleSet::profile_registration();
        let handler = SubmissionHandler::new("profile", &rules);
        let transport = ScriptedTransport::default().reply(500, "Internal Server Error", "boom");
        let client = client();
        let forwarder = Forwarder::new(&client, &transport, "/api/profiles");

        let Outcome::Failed(err) = handler.submit(Ok(profile_input()), &forwarder).await else {
            panic!("expected failure");
        };
        assert_eq!(
            err.to_string(),
            "Error uploading image: request failed. Status: 500 Internal Server Error"
        );
        // No retry, no further calls.
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn record_failure_keeps_earlier_uploads() {
        let rules = FieldRuleSet::profile_registration();
        let handler = SubmissionHandler::new("profile", &rules);
        let transport = ScriptedTransport::default()
            .reply(200, "OK", IMAGE_STORED)
            .reply(200, "OK", RESUME_STORED)
            .fail(ApiError::Transport("connection reset".to_string()));
        let client = client();
        let forwarder = Forwarder::new(&client, &transport, "/api/profiles");

        let outcome = handler.submit(Ok(profile_input()), &forwarder).await;
        let Outcome::Failed(err) = outcome else {
            panic!("expected failure");
        };
        assert!(matches!(err.operation, Operation::CreateRecord { .. }));
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn empty_record_path_fails_before_record_request() {
        let rules = FieldRuleSet::credentials();
        let transport = ScriptedTransport::default();
        let client = client();
        let forwarder = Forwarder::new(&client, &transport, "");
        let raw = RawInput::new()
            .with_text("email", "a@b.com")
            .with_text("password", "secret1");

        let record = SubmissionHandler::new("login", &rules).admit(Ok(raw)).unwrap();
        let err = forwarder.forward(record).await.unwrap_err();
        assert!(matches!(err.source, ApiError::MissingPath));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn terminal_states() {
        assert!(SubmissionState::Failed.is_terminal());
        assert!(!SubmissionState::Forwarding.is_terminal());
        assert_eq!(SubmissionState::Forwarding.to_string(), "forwarding");
    }
}
