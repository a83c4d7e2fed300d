//! Deterministic generator stubs.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::errors::ModelError;
use crate::providers::{GenerationRequest, TextGenerator};

/// A generator that replays a scripted sequence of outcomes and records
/// every request it receives.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    /// Creates a generator with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a successful output to the script.
    pub fn enqueue_ok(&self, text: impl Into<String>) {
        self.script.lock().push_back(Ok(text.into()));
    }

    /// Appends a simulated invocation failure to the script.
    pub fn enqueue_err(&self, reason: impl Into<String>) {
        self.script.lock().push_back(Err(reason.into()));
    }

    /// Returns every request received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ModelError> {
        self.requests.lock().push(request.clone());
        match self.script.lock().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(ModelError::Invocation {
                model_id: request.model_id.clone(),
                reason,
            }),
            None => Err(ModelError::Invocation {
                model_id: request.model_id.clone(),
                reason: "script exhausted".to_string(),
            }),
        }
    }
}

/// A generator that returns the same output for every request.
#[derive(Debug)]
pub struct FixedGenerator {
    output: String,
}

impl FixedGenerator {
    /// Creates a generator that always returns `output`.
    #[must_use]
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, ModelError> {
        Ok(self.output.clone())
    }
}
