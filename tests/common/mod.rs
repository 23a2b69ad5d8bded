//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use serde_json::Value;

use scribe::api::{AppState, create_router};
use scribe::completion::mock::MockCompletion;

pub const BOUNDARY: &str = "scribe-test-boundary";

/// Router backed by the given mock.
pub fn test_app(mock: Arc<MockCompletion>) -> Router {
    create_router(AppState::new(mock))
}

/// Serve the router on an ephemeral port and return its base URL.
pub async fn spawn_app(mock: Arc<MockCompletion>) -> String {
    spawn_router(test_app(mock)).await
}

pub async fn spawn_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(Method::POST)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// One field of a hand-built multipart form.
pub struct FormPart {
    name: String,
    file: Option<(String, String)>,
    data: Vec<u8>,
}

pub fn text_part(name: &str, value: &str) -> FormPart {
    FormPart {
        name: name.to_string(),
        file: None,
        data: value.as_bytes().to_vec(),
    }
}

pub fn file_part(name: &str, file_name: &str, content_type: &str, data: &[u8]) -> FormPart {
    FormPart {
        name: name.to_string(),
        file: Some((file_name.to_string(), content_type.to_string())),
        data: data.to_vec(),
    }
}

pub fn multipart_request(uri: &str, parts: Vec<FormPart>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        let name = &part.name;
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match &part.file {
            Some((file_name, content_type)) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .uri(uri)
        .method(Method::POST)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
