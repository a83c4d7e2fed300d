//! Pipeline configuration.
//!
//! The configuration surface mirrors the deployment environment: one model
//! identifier per stage plus the optional model-comparison settings. All
//! values have working defaults so the pipeline can be constructed without
//! any environment present.

use serde::{Deserialize, Serialize};
use std::env;

use crate::stages::PipelineStage;

/// Default model for the understanding stage.
pub const DEFAULT_UNDERSTANDING_MODEL: &str = "anthropic.claude-3-5-sonnet-20240620-v1:0";
/// Default model for the extraction stage.
pub const DEFAULT_EXTRACTION_MODEL: &str = "anthropic.claude-3-5-sonnet-20240620-v1:0";
/// Default model for the summary stage.
pub const DEFAULT_SUMMARY_MODEL: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// The model identifier serving each pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageModels {
    /// Model for document understanding.
    pub understanding: String,
    /// Model for information extraction.
    pub extraction: String,
    /// Model for summary generation.
    pub summary: String,
}

impl StageModels {
    /// Uses the same model for all three stages.
    #[must_use]
    pub fn uniform(model_id: impl Into<String>) -> Self {
        let model_id = model_id.into();
        Self {
            understanding: model_id.clone(),
            extraction: model_id.clone(),
            summary: model_id,
        }
    }

    /// Returns the model identifier for the given stage.
    #[must_use]
    pub fn for_stage(&self, stage: PipelineStage) -> &str {
        match stage {
            PipelineStage::Understanding => &self.understanding,
            PipelineStage::Extraction => &self.extraction,
            PipelineStage::Summary => &self.summary,
        }
    }
}

impl Default for StageModels {
    fn default() -> Self {
        Self {
            understanding: DEFAULT_UNDERSTANDING_MODEL.to_string(),
            extraction: DEFAULT_EXTRACTION_MODEL.to_string(),
            summary: DEFAULT_SUMMARY_MODEL.to_string(),
        }
    }
}

/// Settings for the optional model-comparison mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Whether comparison mode runs after the pipeline.
    #[serde(default)]
    pub enabled: bool,
    /// The model identifiers to compare.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ComparisonConfig {
    /// Returns true when comparison mode should actually run.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && !self.models.is_empty()
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Per-stage model identifiers.
    #[serde(default)]
    pub models: StageModels,
    /// Model-comparison settings.
    #[serde(default)]
    pub comparison: ComparisonConfig,
    /// When set, malformed extraction output fails the invocation instead of
    /// degrading to raw text.
    #[serde(default)]
    pub strict_extraction: bool,
}

impl PipelineConfig {
    /// Builds the configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// Reads `BEDROCK_MODEL_UNDERSTANDING`, `BEDROCK_MODEL_EXTRACTION`,
    /// `BEDROCK_MODEL_SUMMARY`, `ENABLE_MODEL_COMPARISON`,
    /// `COMPARISON_MODELS` (comma-separated), and `STRICT_EXTRACTION`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            models: StageModels {
                understanding: env_or("BEDROCK_MODEL_UNDERSTANDING", DEFAULT_UNDERSTANDING_MODEL),
                extraction: env_or("BEDROCK_MODEL_EXTRACTION", DEFAULT_EXTRACTION_MODEL),
                summary: env_or("BEDROCK_MODEL_SUMMARY", DEFAULT_SUMMARY_MODEL),
            },
            comparison: ComparisonConfig {
                enabled: env_flag("ENABLE_MODEL_COMPARISON"),
                models: parse_model_list(
                    &env::var("COMPARISON_MODELS").unwrap_or_default(),
                ),
            },
            strict_extraction: env_flag("STRICT_EXTRACTION"),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Parses a comma-separated model list, skipping empty entries.
#[must_use]
pub fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
