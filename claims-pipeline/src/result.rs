//! The assembled output of one document's run through all three stages.
//!
//! The JSON shape is the output contract: `source_document`,
//! `document_understanding`, `extracted_information`, `summary`, and
//! `processing_metadata`. A result only exists once every stage output is
//! present; partial results are never assembled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::StageModels;
use crate::document::SourceDocument;

/// Reference to the source document inside a processing result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocumentRef {
    /// The source bucket, absent for local files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// The object key or file path.
    pub key: String,
    /// When processing completed.
    pub processed_at: DateTime<Utc>,
}

impl From<&SourceDocument> for SourceDocumentRef {
    fn from(document: &SourceDocument) -> Self {
        Self {
            bucket: document.location().bucket_name().map(str::to_string),
            key: document.location().key().into_owned(),
            processed_at: Utc::now(),
        }
    }
}

/// Metadata recorded alongside the stage outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// The model identifier used for each stage.
    pub models_used: StageModels,
}

/// The complete output of one processed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// The source document reference.
    pub source_document: SourceDocumentRef,
    /// Free-text description of document type and structure.
    pub document_understanding: String,
    /// Extracted claim fields: a JSON object when the extraction stage
    /// returned valid JSON, otherwise the raw text.
    pub extracted_information: serde_json::Value,
    /// Short free-text summary of the claim.
    pub summary: String,
    /// Processing metadata.
    pub processing_metadata: ProcessingMetadata,
}

impl ProcessingResult {
    /// Serializes the result as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
