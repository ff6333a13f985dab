use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::GenError;

/// Request/response contract with the AI backend. One attempt per call;
/// fallback tiers live in [`Assistant`].
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Returns a URL to the generated media.
    async fn generate_image(&self, model: &str, prompt: &str) -> Result<String, GenError>;
    /// Returns a text completion.
    async fn complete(&self, model: &str, system: &str, prompt: &str) -> Result<String, GenError>;
}

/// OpenAI-compatible HTTP generation client.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpGenerator {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, GenError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GenError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl GenerationService for HttpGenerator {
    async fn generate_image(&self, model: &str, prompt: &str) -> Result<String, GenError> {
        let body = json!({
            "model": model,
            "prompt": prompt,
            "n": 1,
            "size": "1024x1024",
        });
        let value = self.post("/images/generations", body).await?;
        value["data"][0]["url"]
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or(GenError::EmptyResponse)
    }

    async fn complete(&self, model: &str, system: &str, prompt: &str) -> Result<String, GenError> {
        let body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
        });
        let value = self.post("/chat/completions", body).await?;
        value["choices"][0]["message"]["content"]
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or(GenError::EmptyResponse)
    }
}

#[derive(Debug, Clone)]
pub struct AssistConfig {
    pub image_model: String,
    pub image_fallback_model: String,
    pub text_model: String,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            image_model: "dall-e-3".to_owned(),
            image_fallback_model: "dall-e-2".to_owned(),
            text_model: "gpt-4o".to_owned(),
        }
    }
}

pub const GENERIC_FAILURE: &str = "❌ Failed to generate a response. Please try again later.";

const CHAT_SYSTEM: &str =
    "You are a professional AI assistant for a news bot. You can generate images if asked. \
     If a user asks for a video, tell them you are working on it.";
const IMAGE_APOLOGY_SYSTEM: &str =
    "The image generation failed. Describe the requested image vividly as if you were \
     showing it to them. Tone: artistic.";
const VIDEO_SYSTEM: &str =
    "The user wants a short video. Describe what a 4-second cinematic video of the request \
     would look like in detail, and mention that video generation is being processed.";

/// Fallback chains over a [`GenerationService`]. Every path terminates in a
/// user-visible string; failures never escape a command handler.
pub struct Assistant {
    service: Arc<dyn GenerationService>,
    config: AssistConfig,
}

impl Assistant {
    pub fn new(service: Arc<dyn GenerationService>, config: AssistConfig) -> Self {
        Self { service, config }
    }

    pub async fn chat(&self, prompt: &str) -> String {
        match self
            .service
            .complete(&self.config.text_model, CHAT_SYSTEM, prompt)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "chat completion failed");
                GENERIC_FAILURE.to_owned()
            }
        }
    }

    /// Image chain: primary model, fallback model, then a descriptive
    /// apology from the text model.
    pub async fn image(&self, prompt: &str) -> String {
        for model in [&self.config.image_model, &self.config.image_fallback_model] {
            match self.service.generate_image(model, prompt).await {
                Ok(url) => return format!("🎨 Generated for: {prompt}\n{url}"),
                Err(err) => warn!(%model, error = %err, "image generation failed"),
            }
        }
        match self
            .service
            .complete(&self.config.text_model, IMAGE_APOLOGY_SYSTEM, prompt)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "image apology completion failed");
                GENERIC_FAILURE.to_owned()
            }
        }
    }

    /// Video requests are served as a descriptive completion; there is no
    /// direct video backend.
    pub async fn video(&self, prompt: &str) -> String {
        match self
            .service
            .complete(&self.config.text_model, VIDEO_SYSTEM, prompt)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "video description failed");
                GENERIC_FAILURE.to_owned()
            }
        }
    }
}
