//! Stage identity and per-stage generation parameters.
//!
//! The three stages are fixed: understanding, extraction, summary. Each is a
//! single external model call with its own creativity and length settings.

use serde::{Deserialize, Serialize};

/// One step of the three-step processing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    /// Analyze document type, structure, and completeness.
    Understanding,
    /// Extract structured claim fields from the document.
    Extraction,
    /// Generate a short prose summary from the extracted fields.
    Summary,
}

impl PipelineStage {
    /// All stages in execution order.
    pub const ALL: [Self; 3] = [Self::Understanding, Self::Extraction, Self::Summary];

    /// Returns the stable stage name used in errors, logs, and metadata.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Understanding => "understanding",
            Self::Extraction => "extraction",
            Self::Summary => "summary",
        }
    }

    /// Returns the name of the prompt template this stage renders.
    #[must_use]
    pub fn template_name(self) -> &'static str {
        match self {
            Self::Understanding => "document_understanding",
            Self::Extraction => "extract_info",
            Self::Summary => "generate_summary",
        }
    }

    /// Returns the generation parameters for this stage.
    ///
    /// Understanding favors determinism with a generous output ceiling,
    /// extraction is maximally deterministic, and summary trades a little
    /// determinism for natural prose within a small ceiling.
    #[must_use]
    pub fn params(self) -> GenerationParams {
        match self {
            Self::Understanding => GenerationParams {
                temperature: 0.1,
                max_tokens: 2000,
            },
            Self::Extraction => GenerationParams {
                temperature: 0.0,
                max_tokens: 1500,
            },
            Self::Summary => GenerationParams {
                temperature: 0.7,
                max_tokens: 500,
            },
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling parameters for one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature, 0.0 (deterministic) to 1.0.
    pub temperature: f32,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
}

/// The raw text produced by one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    /// The stage that produced this output.
    pub stage: PipelineStage,
    /// The raw model output text.
    pub text: String,
}

impl StageResult {
    /// Creates a new stage result.
    #[must_use]
    pub fn new(stage: PipelineStage, text: impl Into<String>) -> Self {
        Self {
            stage,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stage_names_are_stable() {
        assert_eq!(PipelineStage::Understanding.as_str(), "understanding");
        assert_eq!(PipelineStage::Extraction.as_str(), "extraction");
        assert_eq!(PipelineStage::Summary.as_str(), "summary");
    }

    #[test]
    fn stage_order_is_understanding_extraction_summary() {
        assert_eq!(
            PipelineStage::ALL,
            [
                PipelineStage::Understanding,
                PipelineStage::Extraction,
                PipelineStage::Summary
            ]
        );
    }

    #[test]
    fn extraction_is_fully_deterministic() {
        let params = PipelineStage::Extraction.params();
        assert_eq!(params.temperature, 0.0);
        assert_eq!(params.max_tokens, 1500);
    }

    #[test]
    fn summary_has_the_smallest_output_ceiling() {
        let ceilings: Vec<u32> = PipelineStage::ALL
            .iter()
            .map(|s| s.params().max_tokens)
            .collect();
        assert_eq!(ceilings.iter().min(), Some(&500));
        assert_eq!(PipelineStage::Summary.params().max_tokens, 500);
    }

    #[test]
    fn template_names_match_the_registry_set() {
        assert_eq!(
            PipelineStage::Understanding.template_name(),
            "document_understanding"
        );
        assert_eq!(PipelineStage::Extraction.template_name(), "extract_info");
        assert_eq!(PipelineStage::Summary.template_name(), "generate_summary");
    }
}
