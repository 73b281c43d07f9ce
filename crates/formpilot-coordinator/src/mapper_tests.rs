use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use formpilot_protocols::message::FormFieldDescriptor;

use crate::store::MemoryStore;

use super::*;

fn field(id: &str, label: &str) -> FormFieldDescriptor {
    FormFieldDescriptor {
        id: id.to_string(),
        tag_name: "input".to_string(),
        field_type: "text".to_string(),
        name: id.to_string(),
        label: label.to_string(),
        placeholder: String::new(),
        autocomplete: String::new(),
        options: Vec::new(),
    }
}

fn settings(base_url: String) -> InferenceSettings {
    InferenceSettings {
        base_url,
        ..InferenceSettings::default()
    }
}

async fn store_with(pairs: &[(&str, &str)]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for (key, value) in pairs {
        store.set(key, value).await.unwrap();
    }
    store
}

#[tokio::test]
async fn test_missing_credential_returns_empty_mapping_without_network_call() {
    let server = MockServer::start().await;
    // Any request reaching the server would fail the expectation.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_with(&[(keys::RESUME_TEXT, "Ada Lovelace")]).await;
    let mapper = Mapper::new(store, settings(server.uri()));

    let mapping = mapper.map_fields(&[field("name", "Full name")]).await;
    assert!(mapping.is_empty());
}

#[tokio::test]
async fn test_missing_resume_returns_empty_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_with(&[(keys::API_KEY, "test-key")]).await;
    let mapper = Mapper::new(store, settings(server.uri()));

    let mapping = mapper.map_fields(&[field("name", "Full name")]).await;
    assert!(mapping.is_empty());
}

#[tokio::test]
async fn test_happy_path_parses_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(body_partial_json(json!({
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "{\"name\":\"Ada Lovelace\",\"email\":\"ada@example.com\"}"}],
                },
                "finishReason": "STOP",
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(&[
        (keys::RESUME_TEXT, "Ada Lovelace — ada@example.com"),
        (keys::API_KEY, "test-key"),
    ])
    .await;
    let mapper = Mapper::new(store, settings(server.uri()));

    let mapping = mapper
        .map_fields(&[field("name", "Full name"), field("email", "Email")])
        .await;

    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.get("name").map(String::as_str), Some("Ada Lovelace"));
    assert_eq!(
        mapping.get("email").map(String::as_str),
        Some("ada@example.com")
    );
}

#[tokio::test]
async fn test_stored_model_override_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "{}"}]},
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(&[
        (keys::RESUME_TEXT, "resume"),
        (keys::API_KEY, "test-key"),
        (keys::MODEL, "gemini-2.5-pro"),
    ])
    .await;
    let mapper = Mapper::new(store, settings(server.uri()));

    let mapping = mapper.map_fields(&[field("name", "Full name")]).await;
    assert!(mapping.is_empty());
}

#[tokio::test]
async fn test_http_error_degrades_to_empty_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": 500, "message": "internal", "status": "INTERNAL"}
        })))
        .mount(&server)
        .await;

    let store = store_with(&[(keys::RESUME_TEXT, "resume"), (keys::API_KEY, "k")]).await;
    let mapper = Mapper::new(store, settings(server.uri()));

    assert!(mapper.map_fields(&[field("name", "Name")]).await.is_empty());
}

#[tokio::test]
async fn test_unparsable_candidate_degrades_to_empty_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "I cannot help with that."}]},
            }]
        })))
        .mount(&server)
        .await;

    let store = store_with(&[(keys::RESUME_TEXT, "resume"), (keys::API_KEY, "k")]).await;
    let mapper = Mapper::new(store, settings(server.uri()));

    assert!(mapper.map_fields(&[field("name", "Name")]).await.is_empty());
}

#[tokio::test]
async fn test_empty_candidates_degrade_to_empty_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let store = store_with(&[(keys::RESUME_TEXT, "resume"), (keys::API_KEY, "k")]).await;
    let mapper = Mapper::new(store, settings(server.uri()));

    assert!(mapper.map_fields(&[field("name", "Name")]).await.is_empty());
}
