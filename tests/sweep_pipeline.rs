//! End-to-end pipeline tests against a scripted in-memory provider.

use std::sync::Arc;

use async_trait::async_trait;

use autotemp::{
    CompletionProvider, CompletionRequest, CompletionResponse, GenerationStatus, SweepError,
    TemperatureSweep,
};

/// Scripted backend: generation calls succeed unless the prompt is
/// marked as broken; judge calls score hotter completions higher.
struct ScriptedProvider {
    broken_prompt: Option<String>,
}

impl ScriptedProvider {
    fn is_judge_call(req: &CompletionRequest) -> bool {
        req.max_output_tokens == 10
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, req: &CompletionRequest) -> Result<CompletionResponse, SweepError> {
        let content = &req.messages[0].content;

        if Self::is_judge_call(req) {
            // scoring prompt embeds the generation temperature
            let score = if content.contains("temp 0.9") {
                90
            } else if content.contains("temp 0.5") {
                50
            } else {
                10
            };
            return Ok(CompletionResponse {
                text: score.to_string(),
            });
        }

        if let Some(broken) = &self.broken_prompt {
            if content == broken {
                return Err(SweepError::ProviderError("backend down".to_string()));
            }
        }
        Ok(CompletionResponse {
            text: format!("completion at temp {}", req.temperature),
        })
    }
}

fn prompts(list: &[&str]) -> Vec<String> {
    list.iter().map(|p| p.to_string()).collect()
}

#[tokio::test]
async fn full_run_ranks_and_summarizes() {
    let provider = Arc::new(ScriptedProvider {
        broken_prompt: None,
    });
    let sweep = TemperatureSweep::new(provider, "test-model");

    let report = sweep
        .run(&prompts(&["alpha", "beta"]), &[0.1, 0.5, 0.9])
        .await
        .unwrap();

    assert_eq!(report.batches.len(), 2);
    for batch in &report.batches {
        assert_eq!(batch.results.len(), 3);
        // hotter completions score higher in this script
        let temps: Vec<f64> = batch.results.iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![0.9, 0.5, 0.1]);
        let ranks: Vec<Option<u32>> = batch.results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![Some(1), Some(2), Some(3)]);
        assert!(batch.results.iter().all(|r| r.score.is_some()));
    }

    let summary = &report.summary;
    assert_eq!(summary.total_prompts, 2);
    assert_eq!(summary.total_responses, 6);
    assert_eq!(summary.total_successful, 6);
    assert_eq!(summary.success_rate, 100);
    let avg = summary.avg_best_temperature.unwrap();
    assert!((avg - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn fully_failed_prompt_still_appears_in_the_report() {
    let provider = Arc::new(ScriptedProvider {
        broken_prompt: Some("beta".to_string()),
    });
    let sweep = TemperatureSweep::new(provider, "test-model");

    let report = sweep
        .run(&prompts(&["alpha", "beta", "gamma"]), &[0.5, 0.9])
        .await
        .unwrap();

    assert_eq!(report.batches.len(), 3);

    let broken = &report.batches[1];
    assert_eq!(broken.prompt, "beta");
    assert_eq!(broken.results.len(), 2);
    for result in &broken.results {
        assert_eq!(result.status, GenerationStatus::Error);
        assert_eq!(result.score, Some(0));
        assert_eq!(result.rank, Some(0));
        assert!(result.text.contains("backend down"));
    }

    // the failed prompt contributes nothing to the best-temperature average
    let summary = &report.summary;
    assert_eq!(summary.total_responses, 6);
    assert_eq!(summary.total_successful, 4);
    assert_eq!(summary.success_rate, 67);
    let avg = summary.avg_best_temperature.unwrap();
    assert!((avg - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn empty_prompt_list_is_rejected() {
    let provider = Arc::new(ScriptedProvider {
        broken_prompt: None,
    });
    let sweep = TemperatureSweep::new(provider, "test-model");

    let err = sweep.run(&[], &[0.5]).await.unwrap_err();
    assert!(matches!(err, SweepError::InvalidInput(_)));
}
