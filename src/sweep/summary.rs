use super::types::{PromptBatch, RunSummary};

/// Aggregates per-run statistics across all ranked batches.
///
/// The averaged best temperature is collected only from batches whose
/// top-ranked item actually succeeded; a prompt where every attempt
/// failed contributes nothing, and when no prompt qualifies the average
/// is `None` rather than a misleading `0`.
pub fn summarize(batches: &[PromptBatch], temperatures: &[f64]) -> RunSummary {
    let total_responses: usize = batches.iter().map(|b| b.results.len()).sum();
    let total_successful: usize = batches.iter().map(PromptBatch::successful_count).sum();

    let success_rate = if total_responses == 0 {
        0
    } else {
        (100.0 * total_successful as f64 / total_responses as f64).round() as u8
    };

    let best_temperatures: Vec<f64> = batches
        .iter()
        .filter_map(|b| b.best().map(|r| r.temperature))
        .collect();
    let avg_best_temperature = if best_temperatures.is_empty() {
        None
    } else {
        Some(best_temperatures.iter().sum::<f64>() / best_temperatures.len() as f64)
    };

    RunSummary {
        total_prompts: batches.len(),
        total_responses,
        total_successful,
        temperatures_tested: temperatures.len(),
        avg_best_temperature,
        success_rate,
    }
}
