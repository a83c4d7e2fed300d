//! # Claims Pipeline
//!
//! A three-stage document understanding pipeline for insurance claim
//! documents: each incoming document is run through document understanding,
//! information extraction, and summary generation - one external model call
//! per stage - and the assembled output is a single JSON object.
//!
//! The pipeline is strictly sequential and stateless across invocations:
//!
//! - **Prompt templates**: an immutable [`templates::TemplateRegistry`]
//!   renders named, parameterized prompts.
//! - **Model boundary**: every call goes through the
//!   [`providers::TextGenerator`] trait, so tests substitute deterministic
//!   stubs from [`testing`].
//! - **Orchestration**: [`pipeline::DocumentPipeline`] drives the
//!   forward-only state machine and assembles the
//!   [`result::ProcessingResult`].
//! - **Comparison mode**: [`comparison::compare_models`] optionally runs the
//!   same prompt against additional models for evaluation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use claims_pipeline::prelude::*;
//! use std::sync::Arc;
//!
//! let generator = Arc::new(HttpTextGenerator::new(GeneratorConfig::from_env())?);
//! let pipeline = DocumentPipeline::new(
//!     TemplateRegistry::claims(),
//!     PipelineConfig::from_env(),
//!     generator,
//! );
//!
//! let document = SourceDocument::new(
//!     SourceLocation::bucket("claims-input", "uploads/claim-001.txt"),
//!     document_text,
//! );
//! let result = pipeline.process(&document).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, missing_docs, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod comparison;
pub mod config;
pub mod document;
pub mod errors;
pub mod local;
pub mod observability;
pub mod pipeline;
pub mod providers;
pub mod result;
pub mod stages;
pub mod templates;
pub mod testing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::comparison::{compare_models, ModelComparison};
    pub use crate::config::{ComparisonConfig, PipelineConfig, StageModels};
    pub use crate::document::{SourceDocument, SourceLocation};
    pub use crate::errors::{ModelError, PipelineError, TemplateError};
    pub use crate::pipeline::{DocumentPipeline, PipelineState};
    pub use crate::providers::{
        GenerationRequest, GeneratorConfig, HttpTextGenerator, TextGenerator,
    };
    pub use crate::result::{ProcessingMetadata, ProcessingResult, SourceDocumentRef};
    pub use crate::stages::{GenerationParams, PipelineStage, StageResult};
    pub use crate::templates::{PromptTemplate, TemplateRegistry};
}
