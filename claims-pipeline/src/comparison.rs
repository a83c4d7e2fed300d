//! Model-comparison mode.
//!
//! Runs the same prompt against an enumerated set of models and records
//! per-model latency, output length, and a truncated sample. Per-model
//! failures are recorded in the result list, never propagated; the artifact
//! is written separately from the processing result.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::providers::{GenerationRequest, TextGenerator};
use crate::stages::GenerationParams;

/// Maximum number of characters kept in an output sample.
pub const SAMPLE_LIMIT: usize = 200;

const COMPARISON_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.0,
    max_tokens: 1000,
};

/// The outcome of running one model against the comparison prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    /// The model that was invoked.
    pub model_id: String,
    /// Wall-clock latency of the call; absent when the call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    /// Length of the generated output in characters.
    pub output_length: usize,
    /// The output truncated to [`SAMPLE_LIMIT`] characters; empty on failure.
    pub sample: String,
    /// Whether the invocation succeeded.
    pub succeeded: bool,
    /// The failure description, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Builds the default comparison prompt for a document.
#[must_use]
pub fn default_comparison_prompt(document_text: &str) -> String {
    format!("Extract key information from this insurance claim document: {document_text}")
}

/// Runs the prompt against each model in turn, one entry per model.
pub async fn compare_models(
    generator: &dyn TextGenerator,
    prompt: &str,
    model_ids: &[String],
) -> Vec<ModelComparison> {
    let mut results = Vec::with_capacity(model_ids.len());

    for model_id in model_ids {
        tracing::info!(model_id = %model_id, "comparing model");
        let request = GenerationRequest::new(model_id.clone(), prompt, COMPARISON_PARAMS);
        let started = Instant::now();

        match generator.generate(&request).await {
            Ok(output) => results.push(ModelComparison {
                model_id: model_id.clone(),
                latency_ms: Some(started.elapsed().as_secs_f64() * 1000.0),
                output_length: output.chars().count(),
                sample: truncate_sample(&output),
                succeeded: true,
                error: None,
            }),
            Err(err) => {
                tracing::error!(model_id = %model_id, error = %err, "comparison call failed");
                results.push(ModelComparison {
                    model_id: model_id.clone(),
                    latency_ms: None,
                    output_length: 0,
                    sample: String::new(),
                    succeeded: false,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    results
}

/// Truncates output to the sample limit, appending an ellipsis when cut.
fn truncate_sample(output: &str) -> String {
    if output.chars().count() <= SAMPLE_LIMIT {
        return output.to_string();
    }
    let truncated: String = output.chars().take(SAMPLE_LIMIT).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGenerator;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn one_entry_per_model_with_correct_status() {
        let generator = ScriptedGenerator::new();
        generator.enqueue_ok("a fine answer");
        generator.enqueue_err("throttled");

        let models = vec!["model-a".to_string(), "model-b".to_string()];
        let results = compare_models(&generator, "prompt", &models).await;

        assert_eq!(results.len(), 2);

        assert_eq!(results[0].model_id, "model-a");
        assert!(results[0].succeeded);
        assert!(results[0].latency_ms.is_some());
        assert_eq!(results[0].output_length, "a fine answer".len());
        assert_eq!(results[0].sample, "a fine answer");
        assert_eq!(results[0].error, None);

        assert_eq!(results[1].model_id, "model-b");
        assert!(!results[1].succeeded);
        assert_eq!(results[1].latency_ms, None);
        assert_eq!(results[1].output_length, 0);
        assert_eq!(results[1].sample, "");
        assert!(results[1].error.as_deref().unwrap().contains("throttled"));
    }

    #[tokio::test]
    async fn failures_do_not_stop_later_models() {
        let generator = ScriptedGenerator::new();
        generator.enqueue_err("boom");
        generator.enqueue_ok("recovered");

        let models = vec!["model-a".to_string(), "model-b".to_string()];
        let results = compare_models(&generator, "prompt", &models).await;

        assert!(!results[0].succeeded);
        assert!(results[1].succeeded);
    }

    #[tokio::test]
    async fn every_model_gets_the_same_prompt() {
        let generator = ScriptedGenerator::new();
        generator.enqueue_ok("x");
        generator.enqueue_ok("y");

        let models = vec!["model-a".to_string(), "model-b".to_string()];
        compare_models(&generator, "the shared prompt", &models).await;

        let prompts: Vec<String> = generator
            .requests()
            .into_iter()
            .map(|r| r.prompt)
            .collect();
        assert_eq!(prompts, vec!["the shared prompt", "the shared prompt"]);
    }

    #[test]
    fn long_output_is_truncated_with_ellipsis() {
        let output = "x".repeat(SAMPLE_LIMIT + 50);
        let sample = truncate_sample(&output);
        assert_eq!(sample.len(), SAMPLE_LIMIT + 3);
        assert!(sample.ends_with("..."));
    }

    #[test]
    fn short_output_is_kept_verbatim() {
        assert_eq!(truncate_sample("short"), "short");
    }

    #[test]
    fn comparison_prompt_embeds_the_document() {
        let prompt = default_comparison_prompt("Claimant: Jane Doe");
        assert!(prompt.contains("Claimant: Jane Doe"));
    }
}
