//! Concurrent generation, scoring and ranking of completions across
//! sampling temperatures.
//!
//! One [`TemperatureSweep`] handle drives the whole pipeline: for each
//! prompt it fans out one generation call per candidate temperature,
//! asks the same backend to judge every successful completion, and
//! merges scored and failed attempts into a single rank-ordered batch.

#[path = "sweep/types.rs"]
mod types;

#[path = "sweep/generate.rs"]
mod generate;

#[path = "sweep/rank.rs"]
mod rank;

#[path = "sweep/summary.rs"]
mod summary;

pub use summary::summarize;
pub use types::{GenerationResult, GenerationStatus, PromptBatch, RunSummary, SweepReport};

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::completion::CompletionProvider;
use crate::error::SweepError;

/// Default number of provider calls in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 6;

/// Drives temperature exploration against one completion backend.
///
/// The provider handle is injected at construction; both fan-out stages
/// share a fixed-size pool of worker permits, so calls beyond the cap
/// queue instead of firing immediately.
pub struct TemperatureSweep {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    permits: Arc<Semaphore>,
}

impl TemperatureSweep {
    /// Creates a sweep with the default concurrency cap.
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self::with_max_concurrency(provider, model, DEFAULT_MAX_CONCURRENCY)
    }

    /// Creates a sweep with a custom concurrency cap.
    pub fn with_max_concurrency(
        provider: Arc<dyn CompletionProvider>,
        model: impl Into<String>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Runs the full pipeline over every prompt.
    ///
    /// Prompts are processed in order; scoring for a prompt starts only
    /// after all of that prompt's generation calls have settled. Returns
    /// the ranked batches in input order plus the aggregate summary.
    pub async fn run(
        &self,
        prompts: &[String],
        temperatures: &[f64],
    ) -> Result<SweepReport, SweepError> {
        if prompts.is_empty() {
            return Err(SweepError::InvalidInput(
                "prompt list is empty".to_string(),
            ));
        }

        let mut batches = Vec::with_capacity(prompts.len());
        for (i, prompt) in prompts.iter().enumerate() {
            log::info!("processing prompt {}/{}", i + 1, prompts.len());
            let results = self.generate_batch(prompt, temperatures).await?;
            let ranked = self.rank_batch(prompt, results).await?;
            batches.push(PromptBatch {
                prompt: prompt.clone(),
                results: ranked,
            });
        }

        let summary = summarize(&batches, temperatures);
        Ok(SweepReport { batches, summary })
    }
}
