//! Test doubles and fixtures.
//!
//! The generator stubs here are the substitution point for the
//! [`TextGenerator`](crate::providers::TextGenerator) seam, available to
//! downstream crates as well as this crate's own tests.

mod fixtures;
mod mocks;

pub use fixtures::{sample_claim_text, sample_document, SAMPLE_EXTRACTION_JSON};
pub use mocks::{FixedGenerator, ScriptedGenerator};
