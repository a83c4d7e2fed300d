//! HTTP-backed text generator.
//!
//! Posts the Anthropic messages wire body to a model-runtime invoke endpoint
//! (`<endpoint>/model/<model-id>/invoke`) and extracts the first text block
//! from the response.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use super::{GenerationRequest, TextGenerator};
use crate::errors::ModelError;

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Configuration for the HTTP generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Base URL of the model runtime endpoint.
    pub endpoint: String,
    /// Bearer token for the endpoint, if required.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://bedrock-runtime.us-east-1.amazonaws.com".to_string(),
            api_key: None,
            timeout: Duration::from_secs(60),
            user_agent: format!("claims-pipeline/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GeneratorConfig {
    /// Builds the configuration from `BEDROCK_ENDPOINT` and
    /// `BEDROCK_API_KEY`, with defaults for anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = env::var("BEDROCK_ENDPOINT") {
            config.endpoint = endpoint;
        }
        config.api_key = env::var("BEDROCK_API_KEY").ok();
        config
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A [`TextGenerator`] backed by an HTTP model runtime.
#[derive(Debug, Clone)]
pub struct HttpTextGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl HttpTextGenerator {
    /// Creates a generator with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ClientBuild`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: GeneratorConfig) -> Result<Self, ModelError> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(ModelError::ClientBuild)?;
        Ok(Self { client, config })
    }

    fn invoke_url(&self, model_id: &str) -> String {
        format!(
            "{}/model/{}/invoke",
            self.config.endpoint.trim_end_matches('/'),
            model_id
        )
    }
}

#[derive(Debug, Serialize)]
struct InvokeBody<'a> {
    anthropic_version: &'static str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: [ContentBlock<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ContentBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> InvokeBody<'a> {
    fn for_request(request: &'a GenerationRequest) -> Self {
        Self {
            anthropic_version: ANTHROPIC_VERSION,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: [Message {
                role: "user",
                content: [ContentBlock {
                    kind: "text",
                    text: &request.prompt,
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(default)]
    text: Option<String>,
}

impl InvokeResponse {
    fn into_text(self) -> Option<String> {
        self.content.into_iter().find_map(|block| block.text)
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ModelError> {
        let url = self.invoke_url(&request.model_id);
        tracing::debug!(model_id = %request.model_id, url = %url, "invoking model");

        let mut builder = self
            .client
            .post(&url)
            .json(&InvokeBody::for_request(request));
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|source| {
            if source.is_timeout() {
                ModelError::Timeout {
                    model_id: request.model_id.clone(),
                }
            } else {
                ModelError::Request {
                    model_id: request.model_id.clone(),
                    source,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                model_id: request.model_id.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: InvokeResponse =
            response.json().await.map_err(|source| ModelError::Request {
                model_id: request.model_id.clone(),
                source,
            })?;

        parsed
            .into_text()
            .ok_or_else(|| ModelError::UnexpectedResponse {
                model_id: request.model_id.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::PipelineStage;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn generator(endpoint: &str) -> HttpTextGenerator {
        HttpTextGenerator::new(GeneratorConfig::default().with_endpoint(endpoint)).unwrap()
    }

    #[test]
    fn invoke_url_appends_the_model_path() {
        let generator = generator("https://runtime.example.com");
        assert_eq!(
            generator.invoke_url("model-a"),
            "https://runtime.example.com/model/model-a/invoke"
        );
    }

    #[test]
    fn invoke_url_tolerates_trailing_slashes() {
        let generator = generator("https://runtime.example.com/");
        assert_eq!(
            generator.invoke_url("model-a"),
            "https://runtime.example.com/model/model-a/invoke"
        );
    }

    #[test]
    fn wire_body_matches_the_messages_format() {
        let request = GenerationRequest::new(
            "model-a",
            "Analyze this document.",
            PipelineStage::Extraction.params(),
        );
        let body = serde_json::to_value(InvokeBody::for_request(&request)).unwrap();

        assert_eq!(
            body,
            json!({
                "anthropic_version": "bedrock-2023-05-31",
                "max_tokens": 1500,
                "temperature": 0.0,
                "messages": [{
                    "role": "user",
                    "content": [{"type": "text", "text": "Analyze this document."}]
                }]
            })
        );
    }

    #[test]
    fn response_text_comes_from_the_first_text_block() {
        let parsed: InvokeResponse = serde_json::from_value(json!({
            "content": [{"type": "text", "text": "generated output"}],
            "stop_reason": "end_turn"
        }))
        .unwrap();
        assert_eq!(parsed.into_text(), Some("generated output".to_string()));
    }

    #[test]
    fn empty_content_yields_no_text() {
        let parsed: InvokeResponse = serde_json::from_value(json!({"content": []})).unwrap();
        assert_eq!(parsed.into_text(), None);
    }
}
