//! Local-file runner.
//!
//! Reads a document from disk, runs the pipeline, and writes the result JSON
//! under an output directory at the derived destination key. Nothing is
//! written when the pipeline fails, so a platform-level re-run starts from a
//! clean slate.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::comparison::{compare_models, default_comparison_prompt};
use crate::document::{SourceDocument, SourceLocation};
use crate::errors::PipelineError;
use crate::pipeline::DocumentPipeline;
use crate::result::ProcessingResult;

/// Processes a local file and writes the result to
/// `<output_dir>/processed/<stem>.json`.
///
/// When comparison mode is active, the per-model comparison artifact is
/// written alongside as `<stem>.comparison.json`.
///
/// # Errors
///
/// Returns any pipeline error, or an IO error from reading the input or
/// writing the output. On pipeline failure no output file is created.
pub async fn process_file(
    pipeline: &DocumentPipeline,
    input_path: &Path,
    output_dir: &Path,
) -> Result<(ProcessingResult, PathBuf), PipelineError> {
    let text = fs::read_to_string(input_path).await?;
    let document = SourceDocument::new(SourceLocation::local(input_path), text);
    tracing::info!(
        path = %input_path.display(),
        chars = document.text().chars().count(),
        "processing document"
    );

    let result = pipeline.process(&document).await?;

    let output_path = output_dir.join(document.location().output_key());
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(&output_path, result.to_json_pretty()?).await?;
    tracing::info!(path = %output_path.display(), "results written");

    if pipeline.config().comparison.is_active() {
        let comparisons = compare_models(
            pipeline.generator().as_ref(),
            &default_comparison_prompt(document.text()),
            &pipeline.config().comparison.models,
        )
        .await;
        let comparison_path = output_path.with_extension("comparison.json");
        fs::write(&comparison_path, serde_json::to_string_pretty(&comparisons)?).await?;
        tracing::info!(path = %comparison_path.display(), "comparison results written");
    }

    Ok((result, output_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComparisonConfig, PipelineConfig};
    use crate::templates::TemplateRegistry;
    use crate::testing::{ScriptedGenerator, SAMPLE_EXTRACTION_JSON};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn write_input(dir: &Path) -> PathBuf {
        let input = dir.join("claim-001.txt");
        std::fs::write(
            &input,
            "Claimant: Jane Doe, Policy: POL-1, Incident: 2024-01-01, Amount: $100",
        )
        .unwrap();
        input
    }

    #[tokio::test]
    async fn writes_the_result_at_the_derived_key() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());

        let generator = Arc::new(ScriptedGenerator::new());
        generator.enqueue_ok("understood");
        generator.enqueue_ok(SAMPLE_EXTRACTION_JSON);
        generator.enqueue_ok("summarized");
        let pipeline = DocumentPipeline::with_defaults(generator);

        let (result, output_path) = process_file(&pipeline, &input, dir.path()).await.unwrap();

        assert_eq!(output_path, dir.path().join("processed/claim-001.json"));
        let written = std::fs::read_to_string(&output_path).unwrap();
        let parsed: ProcessingResult = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, result);
    }

    #[tokio::test]
    async fn no_artifact_is_written_on_stage_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());

        let generator = Arc::new(ScriptedGenerator::new());
        generator.enqueue_ok("understood");
        generator.enqueue_err("access denied");
        let pipeline = DocumentPipeline::with_defaults(generator);

        let err = process_file(&pipeline, &input, dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("extraction"));
        assert!(!dir.path().join("processed/claim-001.json").exists());
        assert!(!dir.path().join("processed").exists());
    }

    #[tokio::test]
    async fn comparison_artifact_is_written_when_active() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());

        let generator = Arc::new(ScriptedGenerator::new());
        generator.enqueue_ok("understood");
        generator.enqueue_ok(SAMPLE_EXTRACTION_JSON);
        generator.enqueue_ok("summarized");
        generator.enqueue_ok("comparison output a");
        generator.enqueue_err("comparison failure b");

        let config = PipelineConfig {
            comparison: ComparisonConfig {
                enabled: true,
                models: vec!["model-a".to_string(), "model-b".to_string()],
            },
            ..PipelineConfig::default()
        };
        let pipeline = DocumentPipeline::new(TemplateRegistry::claims(), config, generator);

        process_file(&pipeline, &input, dir.path()).await.unwrap();

        let comparison_path = dir.path().join("processed/claim-001.comparison.json");
        let written = std::fs::read_to_string(comparison_path).unwrap();
        let entries: Vec<crate::comparison::ModelComparison> =
            serde_json::from_str(&written).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].succeeded);
        assert!(!entries[1].succeeded);
        assert_eq!(entries[1].sample, "");
    }
}
