//! Multipart transport scenarios against a mock backend.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;

use provenance_gateway::config::GatewayConfig;
use provenance_gateway::message::model::{ProtocolMessage, RequestHeader, SecurityToken};
use provenance_gateway::transport::multipart;
use provenance_gateway::HttpServer;

mod common;

fn test_config(backend: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.backend.base_url = format!("http://{backend}");
    config.backend.timeout_secs = 5;
    config.identity.shared_secret = "integration-secret".to_string();
    config
}

async fn spawn_gateway(config: GatewayConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}

fn request_header(kind: &str) -> (ProtocolMessage, String) {
    let header = RequestHeader::new("urn:connector:caller", "urn:agent:caller")
        .with_token(SecurityToken::jwt(common::caller_bearer_token(
            "urn:connector:caller",
        )));
    let message = match kind {
        "create" => ProtocolMessage::CreateProcessRequest(header),
        "log" => ProtocolMessage::LogRequest(header),
        _ => ProtocolMessage::QueryRequest(header),
    };
    let json = serde_json::to_string(&message).unwrap();
    (message, json)
}

fn multipart_form(header_json: &str, payload: &str, payload_type: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .part(
            "header",
            reqwest::multipart::Part::text(header_json.to_string())
                .mime_str("application/json")
                .unwrap(),
        )
        .part(
            "payload",
            reqwest::multipart::Part::text(payload.to_string())
                .mime_str(payload_type)
                .unwrap(),
        )
}

#[tokio::test]
async fn test_create_process_returns_accepted_with_backend_body() {
    // Scenario A: backend answers 201 with the created pid.
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let backend = common::start_programmable_backend(move |request| {
        let recorder = recorder.clone();
        async move {
            recorder.lock().unwrap().push(request);
            (201, "p1".to_string())
        }
    })
    .await;

    let gateway = spawn_gateway(test_config(backend)).await;
    let (original, header_json) = request_header("create");

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{gateway}/process/p1"))
        .multipart(multipart_form(&header_json, "{}", "application/json"))
        .send()
        .await
        .expect("gateway unreachable");

    assert_eq!(response.status(), 201);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body = response.bytes().await.unwrap();

    let decoded = multipart::decode(&content_type, body).await.unwrap();
    match decoded.header {
        ProtocolMessage::Accepted(h) => assert_eq!(h.correlates_with, original.id()),
        other => panic!("expected Accepted, got {}", other.kind()),
    }
    assert_eq!(decoded.payload, b"p1");

    // The backend call was POST /process/p1 with the service bearer token.
    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = requests[0].to_lowercase();
    assert!(request.starts_with("post /process/p1"));
    assert!(request.contains("authorization: bearer "));
}

#[tokio::test]
async fn test_rejected_log_append_carries_backend_error_body() {
    // Scenario B: backend rejects the append with a literal error body.
    let backend = common::start_programmable_backend(|_request| async {
        (400, "bad log entry".to_string())
    })
    .await;

    let gateway = spawn_gateway(test_config(backend)).await;
    let (original, header_json) = request_header("log");

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{gateway}/messages/log/p1"))
        .multipart(multipart_form(&header_json, "", "application/json"))
        .send()
        .await
        .expect("gateway unreachable");

    assert_eq!(response.status(), 400);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body = response.bytes().await.unwrap();

    let decoded = multipart::decode(&content_type, body).await.unwrap();
    match decoded.header {
        ProtocolMessage::Rejected(h) => assert_eq!(h.correlates_with, original.id()),
        other => panic!("expected Rejected, got {}", other.kind()),
    }
    assert_eq!(decoded.payload, b"bad log entry");
}

#[tokio::test]
async fn test_wrong_payload_type_rejected_before_backend() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let backend = common::start_programmable_backend(move |_request| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (201, "unexpected".to_string())
        }
    })
    .await;

    let gateway = spawn_gateway(test_config(backend)).await;
    let (original, header_json) = request_header("create");

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{gateway}/process/p1"))
        .multipart(multipart_form(&header_json, "plain payload", "text/plain"))
        .send()
        .await
        .expect("gateway unreachable");

    assert_eq!(response.status(), 400);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body = response.bytes().await.unwrap();

    let decoded = multipart::decode(&content_type, body).await.unwrap();
    match decoded.header {
        ProtocolMessage::Rejected(h) => assert_eq!(h.correlates_with, original.id()),
        other => panic!("expected Rejected, got {}", other.kind()),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0, "backend must not be called");
}

#[tokio::test]
async fn test_undecodable_request_gets_transport_native_error() {
    let backend =
        common::start_programmable_backend(|_request| async { (200, String::new()) }).await;
    let gateway = spawn_gateway(test_config(backend)).await;

    // Not a multipart body at all: no header to correlate with.
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{gateway}/process/p1"))
        .header("content-type", "application/json")
        .body("{}")
        .send()
        .await
        .expect("gateway unreachable");

    assert_eq!(response.status(), 400);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(!content_type.starts_with("multipart/"));
}
