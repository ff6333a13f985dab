use reqwest::Client;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newscast_core::{GenError, GenerationService, HttpGenerator};

fn generator_for(server: &MockServer) -> HttpGenerator {
    HttpGenerator::new(Client::new(), server.uri(), "test-key")
}

#[tokio::test]
async fn image_generation_returns_media_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(body_partial_json(serde_json::json!({ "model": "dall-e-3" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "url": "http://media.example/out.png" }]
        })))
        .mount(&server)
        .await;

    let url = generator_for(&server)
        .generate_image("dall-e-3", "a sunset")
        .await
        .expect("image url");
    assert_eq!(url, "http://media.example/out.png");
}

#[tokio::test]
async fn completion_returns_message_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "content": "hello back" } }]
        })))
        .mount(&server)
        .await;

    let text = generator_for(&server)
        .complete("gpt-4o", "system", "hello")
        .await
        .expect("completion");
    assert_eq!(text, "hello back");
}

#[tokio::test]
async fn non_success_status_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = generator_for(&server)
        .complete("gpt-4o", "system", "hello")
        .await
        .expect_err("should fail");
    assert!(matches!(err, GenError::Status(status) if status.as_u16() == 429));
}

#[tokio::test]
async fn payload_without_url_is_an_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .mount(&server)
        .await;

    let err = generator_for(&server)
        .generate_image("dall-e-3", "a sunset")
        .await
        .expect_err("should fail");
    assert!(matches!(err, GenError::EmptyResponse));
}
