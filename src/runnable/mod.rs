//! Composable pipeline steps.
//!
//! A [`Runnable`] turns a string input into a JSON value. Steps compose with
//! [`RunnableParallel`], which feeds the same input to several named steps at
//! once and collects their outputs into one JSON object:
//!
//! ```text
//!                   ┌─▶ retriever ───▶ "context":  [Document, ...]
//!   "question" ─────┤
//!                   └─▶ passthrough ─▶ "question": "question"
//! ```

use crate::types::{AppError, Document, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A step that maps a string input to a JSON output.
#[async_trait]
pub trait Runnable: Send + Sync {
    async fn invoke(&self, input: &str) -> Result<Value>;

    /// Invoke on each input in order, stopping at the first error.
    async fn batch(&self, inputs: &[String]) -> Result<Vec<Value>> {
        let mut outputs = Vec::with_capacity(inputs.len());
        for input in inputs {
            outputs.push(self.invoke(input).await?);
        }
        Ok(outputs)
    }
}

/// Returns its input unchanged, as a JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunnablePassthrough;

#[async_trait]
impl Runnable for RunnablePassthrough {
    async fn invoke(&self, input: &str) -> Result<Value> {
        Ok(Value::String(input.to_string()))
    }
}

/// Output of the standard `context` + `question` parallel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAndContext {
    pub context: Vec<Document>,
    pub question: String,
}

/// Runs named steps concurrently on the same input.
#[derive(Clone, Default)]
pub struct RunnableParallel {
    steps: Vec<(String, Arc<dyn Runnable>)>,
}

impl std::fmt::Debug for RunnableParallel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnableParallel")
            .field("steps", &self.step_names())
            .finish()
    }
}

impl RunnableParallel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step. A step with the same name is replaced.
    pub fn with_step(mut self, name: impl Into<String>, runnable: Arc<dyn Runnable>) -> Self {
        let name = name.into();
        match self.steps.iter_mut().find(|(existing, _)| *existing == name) {
            Some(step) => step.1 = runnable,
            None => self.steps.push((name, runnable)),
        }
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Invoke and decode the output as [`QuestionAndContext`].
    ///
    /// # Errors
    ///
    /// Any step error, or `AppError::Internal` if the output lacks a
    /// `context` document array or a `question` string.
    pub async fn invoke_question(&self, question: &str) -> Result<QuestionAndContext> {
        let value = self.invoke(question).await?;
        serde_json::from_value(value).map_err(|e| {
            AppError::Internal(format!(
                "Parallel output is not a question and context: {}",
                e
            ))
        })
    }
}

#[async_trait]
impl Runnable for RunnableParallel {
    #[instrument(skip(self, input), fields(steps = self.steps.len()))]
    async fn invoke(&self, input: &str) -> Result<Value> {
        let outputs = try_join_all(self.steps.iter().map(|(_, step)| step.invoke(input))).await?;

        let mut object = Map::with_capacity(outputs.len());
        for ((name, _), output) in self.steps.iter().zip(outputs) {
            object.insert(name.clone(), output);
        }

        debug!(keys = object.len(), "Parallel steps finished");
        Ok(Value::Object(object))
    }
}
