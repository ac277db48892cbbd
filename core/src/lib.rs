//! Form validation and submission core for the profile forms front-end.
//!
//! # Overview
//! Turns decoded form input into either a `ValidatedRecord` or
//! `FieldErrors`, and relays validated records (and their files) to an
//! external content API. No I/O happens here: the API client builds
//! `HttpRequest` values and parses `HttpResponse` values, and a host-supplied
//! `Transport` performs the round-trips.
//!
//! # Design
//! - `rules` holds plain-data `FieldSpec`s; `validate` interprets them through
//!   a per-kind rule table.
//! - `ContentClient` is stateless apart from a base URL checked at
//!   construction.
//! - `submission` sequences decode → validate → forward and reports exactly
//!   one terminal `Outcome` per request.

pub mod client;
pub mod error;
pub mod http;
pub mod rules;
pub mod submission;
pub mod types;
pub mod validate;

pub use client::{ContentClient, StoredFile};
pub use error::{ApiError, DecodeError, ForwardError, Operation};
pub use http::{HttpBody, HttpMethod, HttpRequest, HttpResponse, MultipartPart, Transport};
pub use rules::{FieldKind, FieldRuleSet, FieldSpec};
pub use submission::{Forwarder, Outcome, Receipt, Rejection, SubmissionHandler, SubmissionState};
pub use types::{FieldErrors, FieldValue, FileDescriptor, RawInput, ValidatedRecord};
pub use validate::validate;
