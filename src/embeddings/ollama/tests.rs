use super::*;

#[test]
fn client_configuration() {
    let config = OllamaConfig {
        protocol: "http".to_string(),
        host: "test-host".to_string(),
        port: 1234,
        model: "test-model".to_string(),
    };
    let client = OllamaClient::new(&config).expect("Failed to create client");

    assert_eq!(client.model, "test-model");
    assert_eq!(client.base_url.host_str(), Some("test-host"));
    assert_eq!(client.base_url.port(), Some(1234));
    assert_eq!(client.retry_attempts, DEFAULT_RETRY_ATTEMPTS);
}

#[test]
fn client_builder_methods() {
    let config = OllamaConfig::default();
    let client = OllamaClient::new(&config)
        .expect("Failed to create client")
        .with_timeout(Duration::from_secs(60))
        .with_retry_attempts(5);

    assert_eq!(client.retry_attempts, 5);
}

#[test]
fn embed_request_serialization() {
    let request = EmbedRequest {
        model: "test-model".to_string(),
        input: vec!["first".to_string(), "second".to_string()],
    };

    let json = serde_json::to_string(&request).expect("request should serialize");
    assert!(json.contains("\"model\":\"test-model\""));
    assert!(json.contains("\"input\":[\"first\",\"second\"]"));
}

#[test]
fn embed_response_deserialization() {
    let json = r#"{"model":"test-model","embeddings":[[0.1,0.2],[0.3,0.4]]}"#;
    let response: EmbedResponse = serde_json::from_str(json).expect("response should parse");

    assert_eq!(response.embeddings.len(), 2);
    assert_eq!(response.embeddings[0], vec![0.1, 0.2]);
}

#[test]
fn empty_batch_short_circuits() {
    use crate::embeddings::EmbeddingProvider;

    let client = OllamaClient::new(&OllamaConfig::default()).expect("Failed to create client");
    // No texts means no HTTP traffic, so this succeeds without a server
    let vectors = client.embed_batch(&[]).expect("empty batch should succeed");
    assert!(vectors.is_empty());
}
