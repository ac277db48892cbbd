//! Route handlers.
//!
//! Each POST handler decodes the body, runs its form through the
//! `SubmissionHandler` and maps the terminal `Outcome` onto HTTP: success
//! redirects to `/success`, rejections are 400 with a JSON body shaped for
//! the form, forwarding failures are 502.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use forms_core::{FieldErrors, Forwarder, Outcome, Rejection, SubmissionHandler};
use serde::Serialize;
use tracing::error;

use crate::decode::decode_body;
use crate::pages;
use crate::state::AppState;

pub const SUCCESS_PATH: &str = "/success";

pub const PROFILE_REJECTED: &str = "Missing Fields. Failed to Register.";

/// Profile form response body. `zod_errors` is `null` unless validation
/// failed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub message: String,
    pub zod_errors: Option<FieldErrors>,
}

/// Login form response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse<E> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<E>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn profile_form() -> Html<String> {
    Html(pages::profile_form())
}

pub async fn simple_form() -> Html<String> {
    Html(pages::login_form("Log in Simple", "/simple-form"))
}

pub async fn simple_zod_form() -> Html<String> {
    Html(pages::login_form("Log in Zod Simple", "/simple-zod-form"))
}

pub async fn success() -> Html<String> {
    Html(pages::success())
}

pub async fn submit_profile(State(state): State<AppState>, request: Request) -> Response {
    let settings = state.settings();
    let decoded = decode_body(request, settings.max_part_bytes).await;
    let handler = SubmissionHandler::new("profile", state.profile_rules());
    let forwarder = Forwarder::new(state.client(), state.transport(), &settings.profile_path);

    match handler.submit(decoded, &forwarder).await {
        Outcome::Succeeded(_) => Redirect::to(SUCCESS_PATH).into_response(),
        Outcome::Rejected(Rejection::Invalid(errors)) => profile_response(
            StatusCode::BAD_REQUEST,
            PROFILE_REJECTED.to_string(),
            Some(errors),
        ),
        Outcome::Rejected(Rejection::Decode(err)) => {
            profile_response(StatusCode::BAD_REQUEST, err.to_string(), None)
        }
        Outcome::Failed(err) => {
            error!(error = %err, "profile submission could not be forwarded");
            profile_response(StatusCode::BAD_GATEWAY, err.to_string(), None)
        }
    }
}

/// Login with one message per field.
pub async fn submit_simple_form(State(state): State<AppState>, request: Request) -> Response {
    let decoded = decode_body(request, state.settings().max_part_bytes).await;
    let outcome = SubmissionHandler::new("simple-form", state.credential_rules()).submit_local(decoded);
    login_response(outcome, |errors| errors.first_messages())
}

/// Login with every message per field.
pub async fn submit_simple_zod_form(State(state): State<AppState>, request: Request) -> Response {
    let decoded = decode_body(request, state.settings().max_part_bytes).await;
    let outcome =
        SubmissionHandler::new("simple-zod-form", state.credential_rules()).submit_local(decoded);
    login_response(outcome, |errors| errors)
}

fn profile_response(status: StatusCode, message: String, zod_errors: Option<FieldErrors>) -> Response {
    (status, Json(ProfileResponse { message, zod_errors })).into_response()
}

fn login_response<E, F>(outcome: Outcome, shape: F) -> Response
where
    E: Serialize,
    F: FnOnce(FieldErrors) -> E,
{
    let (status, body) = match outcome {
        Outcome::Succeeded(_) => return Redirect::to(SUCCESS_PATH).into_response(),
        Outcome::Rejected(Rejection::Invalid(errors)) => (
            StatusCode::BAD_REQUEST,
            LoginResponse {
                ok: false,
                errors: Some(shape(errors)),
                message: None,
            },
        ),
        Outcome::Rejected(Rejection::Decode(err)) => (
            StatusCode::BAD_REQUEST,
            LoginResponse {
                ok: false,
                errors: None,
                message: Some(err.to_string()),
            },
        ),
        Outcome::Failed(err) => (
            StatusCode::BAD_GATEWAY,
            LoginResponse {
                ok: false,
                errors: None,
                message: Some(err.to_string()),
            },
        ),
    };
    (status, Json(body)).into_response()
}
