//! Pipeline orchestration.
//!
//! Strictly sequential: understand(document) -> extract(document) ->
//! summarize(extraction) -> assemble. Each stage renders its prompt through
//! the template registry and issues one model call. Any stage failure aborts
//! the invocation; no partial result is assembled.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::document::SourceDocument;
use crate::errors::PipelineError;
use crate::providers::{GenerationRequest, TextGenerator};
use crate::result::{ProcessingMetadata, ProcessingResult, SourceDocumentRef};
use crate::stages::{PipelineStage, StageResult};
use crate::templates::TemplateRegistry;

mod state;


pub use state::PipelineState;

/// The three-stage document processing pipeline.
///
/// Holds only immutable state, so one pipeline can serve concurrent
/// invocations.
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    registry: TemplateRegistry,
    config: PipelineConfig,
    generator: Arc<dyn TextGenerator>,
}

impl DocumentPipeline {
    /// Creates a pipeline from its parts.
    #[must_use]
    pub fn new(
        registry: TemplateRegistry,
        config: PipelineConfig,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            registry,
            config,
            generator,
        }
    }

    /// Creates a pipeline with the built-in claim templates and default
    /// configuration.
    #[must_use]
    pub fn with_defaults(generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(
            TemplateRegistry::claims(),
            PipelineConfig::default(),
            generator,
        )
    }

    /// Returns the pipeline configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns the generator serving this pipeline.
    #[must_use]
    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    /// Runs the document through all three stages and assembles the result.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ModelInvocation`] tagged with the failing
    /// stage when a model call fails, a [`PipelineError::Template`] variant
    /// for registry misconfiguration, and
    /// [`PipelineError::MalformedExtraction`] in strict mode when the
    /// extraction output is not valid JSON.
    pub async fn process(
        &self,
        document: &SourceDocument,
    ) -> Result<ProcessingResult, PipelineError> {
        let mut outputs: HashMap<PipelineStage, StageResult> = HashMap::new();
        let mut state = PipelineState::initial();

        while let Some(stage) = state.stage() {
            let output = self.run_stage(stage, document, &outputs).await?;
            outputs.insert(stage, output);
            state = state.advance();
        }
        debug_assert!(state == PipelineState::Done);

        self.assemble(document, &outputs)
    }

    /// Renders the stage prompt and issues the model call.
    async fn run_stage(
        &self,
        stage: PipelineStage,
        document: &SourceDocument,
        outputs: &HashMap<PipelineStage, StageResult>,
    ) -> Result<StageResult, PipelineError> {
        let substitutions = match stage {
            // Understanding and extraction both work from the raw document.
            PipelineStage::Understanding | PipelineStage::Extraction => HashMap::from([(
                "document_text".to_string(),
                document.text().to_string(),
            )]),
            // Summary derives only from the extraction output.
            PipelineStage::Summary => {
                let extraction = outputs
                    .get(&PipelineStage::Extraction)
                    .map(|r| r.text.clone())
                    .unwrap_or_default();
                HashMap::from([("extracted_info".to_string(), extraction)])
            }
        };

        let prompt = self.registry.render(stage.template_name(), &substitutions)?;
        let model_id = self.config.models.for_stage(stage);
        let request = GenerationRequest::new(model_id, prompt, stage.params());

        let started = Instant::now();
        tracing::info!(stage = %stage, model_id = %model_id, "running stage");

        match self.generator.generate(&request).await {
            Ok(text) => {
                tracing::info!(
                    stage = %stage,
                    duration_ms = started.elapsed().as_millis() as u64,
                    output_chars = text.chars().count(),
                    "stage completed"
                );
                Ok(StageResult::new(stage, text))
            }
            Err(source) => {
                let err = PipelineError::ModelInvocation { stage, source };
                tracing::error!(stage = %stage, error = %err, "stage failed, aborting invocation");
                Err(err)
            }
        }
    }

    /// Assembles the final result once every stage output is present.
    fn assemble(
        &self,
        document: &SourceDocument,
        outputs: &HashMap<PipelineStage, StageResult>,
    ) -> Result<ProcessingResult, PipelineError> {
        let stage_text = |stage: PipelineStage| {
            outputs
                .get(&stage)
                .map(|r| r.text.clone())
                .unwrap_or_default()
        };
        debug_assert!(PipelineStage::ALL.iter().all(|s| outputs.contains_key(s)));

        let extracted_information = self.parse_extraction(stage_text(PipelineStage::Extraction))?;

        Ok(ProcessingResult {
            source_document: SourceDocumentRef::from(document),
            document_understanding: stage_text(PipelineStage::Understanding),
            extracted_information,
            summary: stage_text(PipelineStage::Summary),
            processing_metadata: ProcessingMetadata {
                models_used: self.config.models.clone(),
            },
        })
    }

    /// Interprets the extraction output as JSON, keeping the raw text when
    /// it does not parse (unless strict extraction is enabled).
    fn parse_extraction(&self, raw: String) -> Result<serde_json::Value, PipelineError> {
        let cleaned = strip_code_fences(&raw);
        match serde_json::from_str::<serde_json::Value>(cleaned) {
            Ok(value) => Ok(value),
            Err(err) if self.config.strict_extraction => {
                Err(PipelineError::MalformedExtraction {
                    reason: err.to_string(),
                })
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "extraction output is not valid JSON, keeping raw text"
                );
                Ok(serde_json::Value::String(raw))
            }
        }
    }
}

/// Strips a surrounding markdown code fence, if present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let Some((_, body)) = trimmed.split_once('\n') else {
        return trimmed;
    };
    let body = body.trim_end();
    body.strip_suffix("```").map_or(body, str::trim_end)
}
