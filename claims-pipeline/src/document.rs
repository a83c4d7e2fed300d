//! Source document model.
//!
//! A document is fetched once, is immutable thereafter, and is discarded at
//! the end of the invocation. No identity is carried beyond a single run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Where a source document came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLocation {
    /// An object in a storage bucket.
    Bucket {
        /// The bucket name.
        bucket: String,
        /// The object key.
        key: String,
    },
    /// A file on the local filesystem.
    Local {
        /// The file path.
        path: PathBuf,
    },
}

impl SourceLocation {
    /// Creates a bucket location.
    #[must_use]
    pub fn bucket(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Bucket {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Creates a local-file location.
    #[must_use]
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    /// Returns the bucket name, if any.
    #[must_use]
    pub fn bucket_name(&self) -> Option<&str> {
        match self {
            Self::Bucket { bucket, .. } => Some(bucket),
            Self::Local { .. } => None,
        }
    }

    /// Returns the object key or file path identifying the document.
    #[must_use]
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            Self::Bucket { key, .. } => Cow::Borrowed(key),
            Self::Local { path } => path.to_string_lossy(),
        }
    }

    /// Returns the destination key derived from this location:
    /// `processed/<original-stem>.json`.
    ///
    /// The derivation is deterministic, so re-processing the same source
    /// overwrites the same destination object.
    #[must_use]
    pub fn output_key(&self) -> String {
        let key = self.key();
        let stem = Path::new(key.as_ref())
            .file_stem()
            .map_or_else(|| key.to_string(), |s| s.to_string_lossy().into_owned());
        format!("processed/{stem}.json")
    }
}

/// A document fetched for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    location: SourceLocation,
    text: String,
    retrieved_at: DateTime<Utc>,
}

impl SourceDocument {
    /// Creates a document from already-fetched text.
    #[must_use]
    pub fn new(location: SourceLocation, text: impl Into<String>) -> Self {
        Self {
            location,
            text: text.into(),
            retrieved_at: Utc::now(),
        }
    }

    /// Returns the document's origin.
    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Returns the raw document text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when the document was fetched.
    #[must_use]
    pub fn retrieved_at(&self) -> DateTime<Utc> {
        self.retrieved_at
    }

    /// Returns true when the document has no text content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
