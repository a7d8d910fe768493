#![allow(clippy::unwrap_used)]
// Tests for `DnsClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dnscontroller_api::{DnsClient, Error};
use dnscontroller_core::Answer;

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DnsClient) {
    let server = MockServer::start().await;
    let client = DnsClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_get_record_with_answers() {
    let (server, client) = setup().await;
    let record_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    let body = json!({
        "record": "example.com",
        "record_type": "A",
        "uuid": record_id,
        "created_at": "2026-01-02T03:04:05Z",
        "updated_at": "2026-01-02T03:04:05Z",
        "answers": [{
            "uuid": Uuid::new_v4(),
            "target": "1.1.2.1",
            "type": "A",
            "ttl": 300,
            "has_details": false,
            "owner_id": owner_id,
            "record_id": record_id,
        }]
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/records/example.com/A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let record = client.get_record("example.com", "A").await.unwrap();

    assert_eq!(record.name, "example.com");
    assert_eq!(record.id, record_id);
    assert_eq!(record.answers().len(), 1);
    assert_eq!(record.answers()[0].target, "1.1.2.1");
    assert_eq!(record.answers()[0].owner_id, owner_id);
}

#[tokio::test]
async fn test_create_record() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/records/_sip._udp.example.com/SRV"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "record": "_sip._udp.example.com",
            "record_type": "SRV",
            "uuid": Uuid::new_v4(),
            "answers": [],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client
        .create_record("_sip._udp.example.com", "SRV")
        .await
        .unwrap();

    assert_eq!(record.record_type, "SRV");
    assert!(record.answers().is_empty());
}

#[tokio::test]
async fn test_delete_record() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/records/example.com/A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "resource deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_record("example.com", "A").await.unwrap();
}

#[tokio::test]
async fn test_create_answers_sends_array() {
    let (server, client) = setup().await;
    let owner_id = Uuid::new_v4();
    let answers = vec![Answer::new("1.1.2.1", "A", 60, owner_id, Uuid::nil())];

    Mock::given(method("POST"))
        .and(path("/api/v1/records/example.com/A/answers"))
        .and(body_json(serde_json::to_value(&answers).unwrap()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "record": "example.com",
            "record_type": "A",
            "uuid": Uuid::new_v4(),
            "answers": [{
                "uuid": Uuid::new_v4(),
                "target": "1.1.2.1",
                "type": "A",
                "ttl": 60,
                "has_details": false,
                "owner_id": owner_id,
                "record_id": Uuid::new_v4(),
            }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client
        .create_answers("example.com", "A", &answers)
        .await
        .unwrap();

    assert_eq!(record.answers().len(), 1);
}

#[tokio::test]
async fn test_ready() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/healthz/readiness"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "status": "DOWN" })))
        .mount(&server)
        .await;

    assert!(!client.ready().await.unwrap());
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_not_found_is_decoded() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/records/missing.example.com/A"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "failed to find record",
            "error": "record not found: missing.example.com/A",
        })))
        .mount(&server)
        .await;

    let err = client
        .get_record("missing.example.com", "A")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    match err {
        Error::Api {
            status,
            message,
            error,
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "failed to find record");
            assert_eq!(error, "record not found: missing.example.com/A");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_validation_error_is_bad_request() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/records/example.com/A/answers"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "invalid answers format",
            "error": "no answer target",
        })))
        .mount(&server)
        .await;

    let err = client
        .create_answers("example.com", "A", &[])
        .await
        .unwrap_err();

    assert!(err.is_bad_request());
    assert!(err.to_string().contains("no answer target"));
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/records/example.com/A"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client.create_record("example.com", "A").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Api { status: 502, ref error, .. } if error == "bad gateway"
    ));
}

#[tokio::test]
async fn test_malformed_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/records/example.com/A"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.get_record("example.com", "A").await.unwrap_err();

    assert!(matches!(err, Error::Deserialization { ref body, .. } if body == "not json"));
}
