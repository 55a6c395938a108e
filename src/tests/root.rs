use axum::body::Body;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::http::header::ACCESS_CONTROL_REQUEST_METHOD;
use axum::http::header::ORIGIN;
use serde_json::Value;
use tower::Service;

use crate::tests::helper;

#[tokio::test]
async fn test_root() {
    let mut app = helper::setup_test_app();

    let (status_code, body) = helper::call(&mut app, Method::GET, "/", None).await;
    assert_eq!(StatusCode::OK, status_code);

    let body = serde_json::from_slice::<Value>(&body[..]).unwrap();
    assert_eq!(Some("folio"), body["service"]["name"].as_str());

    // every unknown route is a JSON 404
    let (status_code, body) = helper::call(&mut app, Method::GET, "/unknown", None).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    let body = serde_json::from_slice::<Value>(&body[..]).unwrap();
    assert_eq!(Some("Route not found"), body["error"].as_str());
}

#[tokio::test]
async fn test_cors_preflight() {
    let mut app = helper::setup_test_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/folders")
        .header(ORIGIN, "https://www.example.com")
        .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(
        Some("*"),
        response
            .headers()
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|header| header.to_str().unwrap())
    );
}
