//! Prompt template management.
//!
//! A [`TemplateRegistry`] is an immutable name-to-pattern map constructed once
//! at startup and passed explicitly into the pipeline, so tests can substitute
//! their own templates. Rendering substitutes caller-supplied values into
//! `{identifier}` placeholders; values are inserted verbatim with no escaping.

use regex::{Captures, Regex};
use std::collections::HashMap;

use crate::errors::TemplateError;

/// Placeholder syntax: an identifier wrapped in single braces.
const PLACEHOLDER_PATTERN: &str = r"\{([A-Za-z_][A-Za-z0-9_]*)\}";

/// A named, parameterized text pattern used to build a model prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    pattern: String,
}

impl PromptTemplate {
    /// Creates a new prompt template.
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Immutable registry of prompt templates.
///
/// Read-only after construction, so a single registry can be shared across
/// concurrent invocations without synchronization.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<String, PromptTemplate>,
    placeholder_re: Regex,
}

impl TemplateRegistry {
    /// Creates a registry from the given templates.
    ///
    /// # Panics
    ///
    /// Panics if the built-in placeholder regex fails to compile, which
    /// cannot happen for the constant pattern.
    #[must_use]
    pub fn new(templates: impl IntoIterator<Item = PromptTemplate>) -> Self {
        #[allow(clippy::unwrap_used)]
        let placeholder_re = Regex::new(PLACEHOLDER_PATTERN).unwrap();
        Self {
            templates: templates
                .into_iter()
                .map(|t| (t.name.clone(), t))
                .collect(),
            placeholder_re,
        }
    }

    /// Creates the registry with the built-in claims-processing templates:
    /// `document_understanding`, `extract_info`, and `generate_summary`.
    #[must_use]
    pub fn claims() -> Self {
        Self::new([
            PromptTemplate::new(
                "document_understanding",
                "\nAnalyze this insurance claim document and provide a comprehensive understanding of:\n\
                 1. Document type and structure\n\
                 2. Key sections identified\n\
                 3. Overall document quality and completeness\n\
                 4. Any notable patterns or anomalies\n\n\
                 Document:\n{document_text}\n\n\
                 Provide your analysis in JSON format with clear structure.",
            ),
            PromptTemplate::new(
                "extract_info",
                "\nExtract the following information from this insurance claim document and return it as valid JSON:\n\
                 - Claimant Name\n\
                 - Policy Number\n\
                 - Incident Date\n\
                 - Claim Amount\n\
                 - Incident Description\n\
                 - Claim Type\n\
                 - Any additional relevant information\n\n\
                 Document:\n{document_text}\n\n\
                 Return ONLY valid JSON, no additional text or explanation.",
            ),
            PromptTemplate::new(
                "generate_summary",
                "\nBased on this extracted claim information:\n{extracted_info}\n\n\
                 Generate a concise, professional summary of the insurance claim that includes:\n\
                 1. Key claim details\n\
                 2. Claimant information\n\
                 3. Incident overview\n\
                 4. Claim amount\n\n\
                 Keep the summary clear and under 200 words.",
            ),
        ])
    }

    /// Returns the registered template names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the template with the given name, if registered.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PromptTemplate> {
        self.templates.get(name)
    }

    /// Returns the placeholders referenced by the given template.
    #[must_use]
    pub fn placeholders(&self, template: &PromptTemplate) -> Vec<String> {
        self.placeholder_re
            .captures_iter(template.pattern())
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// Renders a named template by substituting the supplied values.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownTemplate`] when `name` is not
    /// registered, and [`TemplateError::MissingSubstitution`] when the
    /// pattern references a placeholder absent from `substitutions`.
    pub fn render(
        &self,
        name: &str,
        substitutions: &HashMap<String, String>,
    ) -> Result<String, TemplateError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::UnknownTemplate {
                name: name.to_string(),
                available: self.names(),
            })?;

        for placeholder in self.placeholders(template) {
            if !substitutions.contains_key(&placeholder) {
                return Err(TemplateError::MissingSubstitution {
                    template: name.to_string(),
                    placeholder,
                });
            }
        }

        // Every placeholder is known to be present, so the lookup in the
        // replacement closure cannot miss.
        let rendered = self
            .placeholder_re
            .replace_all(template.pattern(), |caps: &Captures<'_>| {
                substitutions.get(&caps[1]).cloned().unwrap_or_default()
            });
        Ok(rendered.into_owned())
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::claims()
    }
}
