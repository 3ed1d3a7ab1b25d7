use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use javarun::{Runner, build_router, serve_with_shutdown};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

use super::{fixture_source, test_config, test_runner};

async fn post_code(runner: Runner, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = build_router(runner).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_fragment_request() {
    let (runner, _root) = test_runner();
    let (status, body) = post_code(runner, json!({ "code": "System.out.println(1+1);" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "output": "2\n", "error": "" }));
}

#[tokio::test]
async fn test_full_class_request() {
    let (runner, _root) = test_runner();
    let (status, body) = post_code(runner, json!({ "code": fixture_source("Hello.java") })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "Hello, World!\n");
}

#[tokio::test]
async fn test_runtime_exception_request() {
    let (runner, _root) = test_runner();
    let (status, body) = post_code(
        runner,
        json!({ "code": "throw new RuntimeException(\"x\");" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"], "");
    assert!(body["error"].as_str().unwrap().contains("RuntimeException"));
}

#[tokio::test]
async fn test_compile_error_request() {
    let (runner, _root) = test_runner();
    let (status, body) = post_code(runner, json!({ "code": "int x = ;" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("error"));
    assert!(
        body["code"]
            .as_str()
            .unwrap()
            .starts_with("public class Main {")
    );
}

#[tokio::test]
async fn test_missing_code_request() {
    let (runner, _root) = test_runner();
    let (status, body) = post_code(runner, json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing Java code in request body" }));
}

#[tokio::test]
async fn test_serve_over_tcp() {
    let (mut config, _root) = test_config();
    // Grab a free port and hand it to the server
    let reserved = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    config.server.bind = reserved.local_addr().unwrap();
    drop(reserved);
    let addr = config.server.bind;

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(serve_with_shutdown(Runner::new(config), async {
        let _ = rx.await;
    }));

    let mut stream = None;
    for _ in 0..50 {
        match tokio::net::TcpStream::connect(addr).await {
            Ok(s) => {
                stream = Some(s);
                break;
            }
            Err(_) => tokio::time::sleep(Duration::from_millis(50)).await,
        }
    }
    let mut stream = stream.expect("server did not start");

    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"), "unexpected response: {response}");

    tx.send(()).unwrap();
    server.await.unwrap().expect("server failed");
}
