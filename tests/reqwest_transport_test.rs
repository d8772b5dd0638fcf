mod common;

use common::RecordingNotifier;
use request_wrapper::clients::interceptors::{JSON_CONTENT_TYPE, MSG_NETWORK, MSG_TIMEOUT};
use request_wrapper::clients::ReqwestTransport;
use request_wrapper::{ClientConfig, HttpClient, Notice, RequestError, RequestOptions, TransportError};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(config: ClientConfig) -> (HttpClient, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let transport = ReqwestTransport::new(&config).expect("build reqwest transport");
    let client = HttpClient::new(config, Arc::new(transport), notifier.clone());
    (client, notifier)
}

#[tokio::test]
async fn get_sends_flattened_query_and_json_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/list"))
        .and(query_param("a", "1"))
        .and(query_param("b[x]", "2"))
        .and(query_param("b[y]", "3"))
        .and(header("content-type", JSON_CONTENT_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": [1, 2, 3],
            "msg": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, notifier) = client_for(ClientConfig::new(format!("{}/api", server.uri())));
    let envelope = client
        .request::<Vec<u32>>(RequestOptions::get("/list").params(json!({"a": 1, "b": {"x": 2, "y": 3}})))
        .await
        .unwrap();

    assert_eq!(envelope.data, Some(vec![1, 2, 3]));
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user"))
        .and(body_json(json!({"name": "张三"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200",
            "data": {"id": 9},
            "msg": "ok"
        })))
        .mount(&server)
        .await;

    let (client, _notifier) = client_for(ClientConfig::new(format!("{}/api", server.uri())));
    let envelope = client
        .post::<Value, _>("/user", &json!({"name": "张三"}))
        .await
        .unwrap();

    assert_eq!(envelope.data, Some(json!({"id": 9})));
    assert_eq!(envelope.msg, "ok");
}

#[tokio::test]
async fn http_error_status_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (client, notifier) = client_for(ClientConfig::new(server.uri()));
    let err = client.get::<Value>("/broken").await.unwrap_err();

    assert!(matches!(
        err,
        RequestError::Transport(TransportError::Status { status: 500 })
    ));
    assert_eq!(
        notifier.notices(),
        vec![Notice::timed("系统接口500异常", Duration::from_secs(5))]
    );
    assert!(client.pending_keys().is_empty());
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 200}))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri()).with_timeout(Duration::from_millis(100));
    let (client, notifier) = client_for(config);
    let err = client.get::<Value>("/slow").await.unwrap_err();

    assert!(matches!(
        err,
        RequestError::Transport(TransportError::Timeout { timeout_ms: 100 })
    ));
    assert_eq!(
        notifier.notices(),
        vec![Notice::timed(MSG_TIMEOUT, Duration::from_secs(5))]
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    // 端口 1 上不会有服务监听
    let (client, notifier) = client_for(ClientConfig::new("http://127.0.0.1:1"));
    let err = client.get::<Value>("/anything").await.unwrap_err();

    assert!(matches!(
        err,
        RequestError::Transport(TransportError::Network { .. })
    ));
    assert_eq!(notifier.notices()[0].message, MSG_NETWORK);
}

#[tokio::test]
async fn business_failure_keeps_the_raw_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 403,
            "msg": "no permission",
            "data": {"required": "admin"}
        })))
        .mount(&server)
        .await;

    let (client, notifier) = client_for(ClientConfig::new(server.uri()));
    let err = client.get::<Value>("/secret").await.unwrap_err();

    let envelope = err.envelope().unwrap();
    assert_eq!(envelope.data, Some(json!({"required": "admin"})));
    assert_eq!(notifier.notices().len(), 1);
}
