//! The model-invocation boundary.
//!
//! Every stage goes through the [`TextGenerator`] trait, the single seam the
//! test suite substitutes deterministic stubs into.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ModelError;
use crate::stages::GenerationParams;

mod http;

pub use http::{GeneratorConfig, HttpTextGenerator};

/// One request to an external text-generation model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// The model identifier to invoke.
    pub model_id: String,
    /// The rendered prompt text.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Creates a request from a prompt and stage parameters.
    #[must_use]
    pub fn new(
        model_id: impl Into<String>,
        prompt: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            prompt: prompt.into(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        }
    }
}

/// External text-generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    /// Generates text for the given request.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] when the underlying call fails; callers do
    /// not retry.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::PipelineStage;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_carries_stage_parameters() {
        let request = GenerationRequest::new(
            "model-a",
            "Summarize this.",
            PipelineStage::Summary.params(),
        );
        assert_eq!(request.model_id, "model-a");
        assert_eq!(request.prompt, "Summarize this.");
        assert_eq!(request.max_tokens, 500);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
    }
}
