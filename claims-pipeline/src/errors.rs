//! Error types for the claims processing pipeline.
//!
//! The taxonomy separates template-rendering errors (programmer/configuration
//! errors, never retried) from model-invocation failures (surfaced to the
//! caller, abort the remaining pipeline).

use thiserror::Error;

use crate::stages::PipelineStage;

/// Errors raised while rendering a prompt template.
#[derive(Debug, Clone, Error)]
pub enum TemplateError {
    /// The requested template is not registered.
    #[error("unknown template '{name}', available templates: {available:?}")]
    UnknownTemplate {
        /// The requested template name.
        name: String,
        /// Names of the templates that are registered.
        available: Vec<String>,
    },

    /// The template references a placeholder the caller did not supply.
    #[error("template '{template}' requires placeholder '{placeholder}' which was not supplied")]
    MissingSubstitution {
        /// The template being rendered.
        template: String,
        /// The placeholder with no matching substitution.
        placeholder: String,
    },
}

/// Errors raised by the external text-generation capability.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request to the model endpoint failed in transit.
    #[error("request to model '{model_id}' failed: {source}")]
    Request {
        /// The model that was being invoked.
        model_id: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The request to the model endpoint timed out.
    #[error("request to model '{model_id}' timed out")]
    Timeout {
        /// The model that was being invoked.
        model_id: String,
    },

    /// The model endpoint returned a non-success status.
    #[error("model '{model_id}' returned status {status}: {body}")]
    Status {
        /// The model that was being invoked.
        model_id: String,
        /// The HTTP status code.
        status: u16,
        /// The response body, if any.
        body: String,
    },

    /// The model responded, but not in the expected shape.
    #[error("model '{model_id}' returned an unexpected response shape")]
    UnexpectedResponse {
        /// The model that was being invoked.
        model_id: String,
    },

    /// A generic invocation failure, used by test doubles.
    #[error("model '{model_id}' invocation failed: {reason}")]
    Invocation {
        /// The model that was being invoked.
        model_id: String,
        /// The reason for failure.
        reason: String,
    },
}

/// The main error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A prompt template failed to render.
    #[error("{0}")]
    Template(#[from] TemplateError),

    /// An external model call failed; the invocation is aborted.
    #[error("model invocation failed during {stage} stage: {source}")]
    ModelInvocation {
        /// The stage whose model call failed.
        stage: PipelineStage,
        /// The underlying model error.
        #[source]
        source: ModelError,
    },

    /// The extraction stage's output is not valid structured data.
    ///
    /// Only raised when strict extraction is enabled; the default behavior
    /// keeps the raw text.
    #[error("extraction output is not valid JSON: {reason}")]
    MalformedExtraction {
        /// The parse failure description.
        reason: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Returns the stage tag for model-invocation failures.
    #[must_use]
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::ModelInvocation { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_template_names_the_alternatives() {
        let err = TemplateError::UnknownTemplate {
            name: "summarise".to_string(),
            available: vec!["generate_summary".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("summarise"));
        assert!(message.contains("generate_summary"));
    }

    #[test]
    fn model_invocation_error_carries_stage_tag() {
        let err = PipelineError::ModelInvocation {
            stage: PipelineStage::Extraction,
            source: ModelError::Invocation {
                model_id: "model-a".to_string(),
                reason: "throttled".to_string(),
            },
        };
        assert_eq!(err.stage(), Some(PipelineStage::Extraction));
        assert!(err.to_string().contains("extraction"));
    }

    #[test]
    fn template_errors_have_no_stage_tag() {
        let err = PipelineError::MalformedExtraction {
            reason: "expected value at line 1".to_string(),
        };
        assert_eq!(err.stage(), None);
    }
}
