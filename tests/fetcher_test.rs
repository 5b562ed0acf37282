use std::collections::HashMap;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use typedfetch::prelude::*;

fn posts() -> serde_json::Value {
    json!([{"userId": 1, "id": 1, "title": "t", "body": "b"}])
}

fn posts_schema() -> JsonSchema {
    JsonSchema::new(&json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "userId": {"type": "integer"},
                "id": {"type": "integer"},
                "title": {"type": "string"},
                "body": {"type": "string"}
            },
            "required": ["userId", "id", "title", "body"]
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn round_trip_json_with_schema() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts()))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(FetcherConfig::builder().base_url(server.uri()).build());
    let response = fetcher
        .fetch(RequestConfig::get("/posts").schema(posts_schema()))
        .await
        .expect("schema-validated fetch should not error");

    match response {
        FetchResponse::Success {
            status_code, data, ..
        } => {
            assert_eq!(status_code, 200);
            assert_eq!(data.as_json(), Some(&posts()));
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn schema_mismatch_on_200_returns_parsing_failure() {
    let server = MockServer::start().await;
    let body = json!([{"userId": "oops", "id": 1, "title": "t", "body": "b"}]);
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(FetcherConfig::builder().base_url(server.uri()).build());
    let response = fetcher
        .fetch(RequestConfig::get("/posts").schema(posts_schema()))
        .await
        .unwrap();

    match response {
        FetchResponse::Failure {
            status_code,
            data,
            error_message,
            ..
        } => {
            assert_eq!(status_code, Some(200));
            assert!(error_message.starts_with("Parsing failed"), "{error_message}");
            // The invalid body is still available for diagnostics.
            assert_eq!(data.as_json(), Some(&body));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn post_serializes_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"title": "t", "body": "b"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 101})))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(FetcherConfig::builder().base_url(server.uri()).build());
    let response = fetcher
        .fetch(RequestConfig::post("/posts").json(json!({"title": "t", "body": "b"})))
        .await
        .unwrap();

    assert_eq!(response.status_code(), Some(201));
    assert!(!response.is_error());
}

#[tokio::test]
async fn multipart_body_sets_its_own_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(FetcherConfig::builder().base_url(server.uri()).build());
    let form = reqwest::multipart::Form::new().text("field", "value");
    let response = fetcher
        .fetch(RequestConfig::post("/upload").body(RequestBody::Multipart(form)))
        .await
        .unwrap();
    assert!(!response.is_error());

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("multipart/form-data"),
        "content-type was {content_type}"
    );
}

#[tokio::test]
async fn header_merge_layers_call_over_instance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/merged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(
        FetcherConfig::builder()
            .base_url(server.uri())
            .header("x-instance", "1")
            .header("x-shared", "instance")
            .build(),
    );
    fetcher
        .fetch(
            RequestConfig::get("/merged")
                .header("x-call", "2")
                .header("x-shared", "call"),
        )
        .await
        .unwrap();

    let request = &server.received_requests().await.unwrap()[0];
    assert_eq!(request.headers.get("x-instance").unwrap(), "1");
    assert_eq!(request.headers.get("x-call").unwrap(), "2");
    assert_eq!(request.headers.get("x-shared").unwrap(), "call");
}

#[tokio::test]
async fn omit_global_drops_instance_headers_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scoped"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(
        FetcherConfig::builder()
            .base_url(server.uri())
            .header("x-instance", "1")
            .build(),
    );
    fetcher
        .fetch(
            RequestConfig::get("/scoped")
                .headers(HashMap::new())
                .header_merge_strategy(HeaderMergeStrategy::OmitGlobal),
        )
        .await
        .unwrap();

    let request = &server.received_requests().await.unwrap()[0];
    assert!(request.headers.get("x-instance").is_none());
}

#[tokio::test]
async fn instance_throw_default_applies_and_call_overrides_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(
        FetcherConfig::builder()
            .base_url(server.uri())
            .throw_on_error(true)
            .build(),
    );

    // Instance default: errors propagate.
    let result = fetcher.fetch(RequestConfig::get("/error")).await;
    assert!(matches!(result, Err(FetchError::Http { status_code: 404, .. })));

    // Call-level override wins over the instance default.
    let response = fetcher
        .fetch(RequestConfig::get("/error").throw_on_error(false))
        .await
        .unwrap();
    assert!(response.is_error());
    assert_eq!(response.status_code(), Some(404));
}

#[tokio::test]
async fn raw_body_is_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/blob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(FetcherConfig::builder().base_url(server.uri()).build());
    fetcher
        .fetch(RequestConfig::put("/blob").body(RequestBody::Raw(bytes::Bytes::from_static(&[
            0xde, 0xad, 0xbe, 0xef,
        ]))))
        .await
        .unwrap();

    let request = &server.received_requests().await.unwrap()[0];
    assert_eq!(request.body, vec![0xde, 0xad, 0xbe, 0xef]);
}

#[tokio::test]
async fn array_buffer_response_returns_raw_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3, 4]))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(FetcherConfig::builder().base_url(server.uri()).build());
    let response = fetcher
        .fetch(RequestConfig::get("/blob").response_type(ResponseType::ArrayBuffer))
        .await
        .unwrap();

    assert_eq!(
        response.data().as_bytes().map(|b| b.as_ref()),
        Some(&[1u8, 2, 3, 4][..])
    );
}

#[tokio::test]
async fn cancellation_aborts_a_slow_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let fetcher = Fetcher::new(FetcherConfig::builder().base_url(server.uri()).build());

    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let response = fetcher
        .fetch(RequestConfig::get("/slow").signal(token))
        .await
        .unwrap();

    // Cancellation is just another transport failure: no status, null data.
    match response {
        FetchResponse::Failure {
            status_code, data, ..
        } => {
            assert_eq!(status_code, None);
            assert!(data.is_null());
        }
        other => panic!("expected failure, got {other:?}"),
    }
}
