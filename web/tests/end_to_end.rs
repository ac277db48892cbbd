//! Front-end forwarding against a live mock content API.

mod common;

use std::net::SocketAddr;

use axum::http::{header, StatusCode};
use common::{body_json, body_text, profile_body, state_for};
use forms_web::app;
use mock_server::Db;
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceExt;

async fn spawn_content_api() -> (SocketAddr, Db) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let db = Db::default();
    tokio::spawn(mock_server::run_with_db(listener, db.clone()));
    (addr, db)
}

#[tokio::test]
async fn valid_profile_is_uploaded_and_recorded() {
    let (addr, db) = spawn_content_api().await;
    let state = state_for(&format!("http://{addr}"));

    let resp = app(state)
        .oneshot(profile_body().into_request("/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/success");

    let content = db.read().await;
    assert_eq!(content.uploads.len(), 2);
    let names: Vec<_> = content.uploads.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["me.png", "cv.pdf"]);

    let profiles = &content.collections["profiles"];
    assert_eq!(profiles.len(), 1);
    let attributes = &profiles[0].attributes;
    assert_eq!(attributes["state"], "Ontario");
    assert_eq!(attributes["firstName"], "Ada");
    assert!(attributes.get("region").is_none());

    let image_id = content.uploads[0].id;
    let resume_id = content.uploads[1].id;
    assert_eq!(attributes["image"], json!(image_id));
    assert_eq!(attributes["resume"], json!(resume_id));
}

#[tokio::test]
async fn profile_success_is_a_redirect_not_a_json_body() {
    let (addr, _db) = spawn_content_api().await;
    let state = state_for(&format!("http://{addr}"));

    let resp = app(state)
        .oneshot(profile_body().into_request("/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/success");
    assert!(resp.headers().get(header::CONTENT_TYPE).is_none());
    assert!(body_text(resp).await.is_empty());
}

#[tokio::test]
async fn invalid_profile_never_reaches_the_content_api() {
    let (addr, db) = spawn_content_api().await;
    let state = state_for(&format!("http://{addr}"));

    let req = profile_body()
        .text("email", "not-an-email")
        .into_request("/");
    let resp = app(state).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["zodErrors"], json!({"email": ["Invalid email"]}));

    let content = db.read().await;
    assert!(content.uploads.is_empty());
    assert!(content.collections.is_empty());
}

#[tokio::test]
async fn upload_failure_is_reported_as_bad_gateway() {
    let (addr, db) = spawn_content_api().await;
    let state = state_for(&format!("http://{addr}/missing"));

    let resp = app(state)
        .oneshot(profile_body().into_request("/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "message": "Error uploading image: request failed. Status: 404 Not Found",
            "zodErrors": null
        })
    );
    assert!(db.read().await.collections.is_empty());
}

#[tokio::test]
async fn unreachable_content_api_is_reported_as_bad_gateway() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let resp = app(state_for(&format!("http://{addr}")))
        .oneshot(profile_body().into_request("/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(resp).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Error uploading image: transport failed"));
}
