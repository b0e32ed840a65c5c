use serde::{Deserialize, Serialize};

use crate::error::SweepError;

/// Outcome discriminator for one generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    /// The backend returned text for this temperature
    Success,
    /// The call failed; `text` holds the error description
    Error,
}

/// One attempted completion at a single temperature.
///
/// Created by the generation fan-out with `status` fixed for its
/// lifetime; `score` is attached by the ranking engine and `rank` by its
/// final sort. A rank of `0` is the sentinel for batches where nothing
/// succeeded and there was no valid output to compare.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Sampling temperature used for this attempt.
    pub temperature: f64,
    /// Generated content on success, error description on failure.
    pub text: String,
    /// Outcome of the generation call.
    pub status: GenerationStatus,
    /// Judge score in `[0, 100]`; `0` for failed attempts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    /// 1-based position within the batch after ranking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl GenerationResult {
    /// Creates a successful attempt.
    pub fn success(temperature: f64, text: impl Into<String>) -> Self {
        Self {
            temperature,
            text: text.into(),
            status: GenerationStatus::Success,
            score: None,
            rank: None,
        }
    }

    /// Creates a failed attempt carrying the error description.
    pub fn error(temperature: f64, err: &SweepError) -> Self {
        Self {
            temperature,
            text: err.to_string(),
            status: GenerationStatus::Error,
            score: None,
            rank: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == GenerationStatus::Success
    }
}

/// One prompt's full exploration: exactly one result per requested
/// temperature, in rank order once the pipeline has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptBatch {
    pub prompt: String,
    pub results: Vec<GenerationResult>,
}

impl PromptBatch {
    /// Number of successful attempts in this batch.
    pub fn successful_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// The top-ranked result, if it succeeded.
    ///
    /// Batches where every attempt failed have no best result; their
    /// first entry carries the rank `0` sentinel.
    pub fn best(&self) -> Option<&GenerationResult> {
        self.results
            .first()
            .filter(|r| r.rank == Some(1) && r.is_success())
    }
}

/// Aggregate statistics over all prompts in one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_prompts: usize,
    pub total_responses: usize,
    pub total_successful: usize,
    /// Number of distinct temperatures requested per prompt.
    pub temperatures_tested: usize,
    /// Mean of each qualifying prompt's best temperature; `None` when no
    /// prompt produced a successful top-ranked result.
    pub avg_best_temperature: Option<f64>,
    /// Rounded percentage of attempts that succeeded.
    pub success_rate: u8,
}

/// Everything a report renderer needs: ranked batches in prompt order
/// plus the run-level summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub batches: Vec<PromptBatch>,
    pub summary: RunSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_result_keeps_description() {
        let err = SweepError::ProviderError("rate limited".to_string());
        let result = GenerationResult::error(0.5, &err);
        assert_eq!(result.status, GenerationStatus::Error);
        assert!(result.text.contains("rate limited"));
        assert!(result.score.is_none());
    }

    #[test]
    fn best_ignores_failed_top_entry() {
        let err = SweepError::HttpError("timeout".to_string());
        let mut failed = GenerationResult::error(0.3, &err);
        failed.score = Some(0);
        failed.rank = Some(0);
        let batch = PromptBatch {
            prompt: "p".to_string(),
            results: vec![failed],
        };
        assert!(batch.best().is_none());
        assert_eq!(batch.successful_count(), 0);
    }
}
