//! Shared fixtures for pipeline tests.

use crate::document::{SourceDocument, SourceLocation};

/// A stand-in stage-2 output: the claim fields as JSON.
pub const SAMPLE_EXTRACTION_JSON: &str = r#"{
  "claimant_name": "Jane Doe",
  "policy_number": "POL-1",
  "incident_date": "2024-01-01",
  "claim_amount": "$100",
  "incident_description": "Minor collision in a parking lot"
}"#;

/// Returns a short claim document body.
#[must_use]
pub fn sample_claim_text() -> &'static str {
    "Claimant: Jane Doe, Policy: POL-1, Incident: 2024-01-01, Amount: $100"
}

/// Returns a sample claim document as if fetched from the input bucket.
#[must_use]
pub fn sample_document() -> SourceDocument {
    SourceDocument::new(
        SourceLocation::bucket("claims-input", "uploads/claim-001.txt"),
        sample_claim_text(),
    )
}
