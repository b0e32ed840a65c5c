use std::sync::Arc;

use futures::future::join_all;

use crate::chat::ChatMessage;
use crate::completion::CompletionRequest;
use crate::error::SweepError;

use super::types::GenerationResult;
use super::TemperatureSweep;

/// Token budget for generation calls.
const GENERATION_MAX_OUTPUT_TOKENS: u32 = 512;

impl TemperatureSweep {
    /// Generates one completion per temperature, all concurrently.
    ///
    /// A failed provider call never aborts the batch: it is captured as a
    /// [`GenerationResult`] with `Error` status and the failure text. The
    /// output is always re-sorted ascending by temperature, independent
    /// of which request finished first.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidInput`] when `temperatures` is empty.
    pub async fn generate_batch(
        &self,
        prompt: &str,
        temperatures: &[f64],
    ) -> Result<Vec<GenerationResult>, SweepError> {
        if temperatures.is_empty() {
            return Err(SweepError::InvalidInput(
                "temperature set is empty".to_string(),
            ));
        }

        let calls = temperatures.iter().map(|&temperature| {
            let permits = Arc::clone(&self.permits);
            async move {
                let _permit = permits.acquire().await;
                self.generate_one(prompt, temperature).await
            }
        });

        let mut results = join_all(calls).await;
        results.sort_by(|a, b| {
            a.temperature
                .partial_cmp(&b.temperature)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(results)
    }

    async fn generate_one(&self, prompt: &str, temperature: f64) -> GenerationResult {
        let request = CompletionRequest::new(
            &self.model,
            vec![ChatMessage::user().content(prompt).build()],
        )
        .temperature(temperature)
        .max_output_tokens(GENERATION_MAX_OUTPUT_TOKENS)
        .top_p(1.0);

        match self.provider.complete(&request).await {
            Ok(response) => GenerationResult::success(temperature, response.text),
            Err(err) => {
                log::warn!("generation at temperature {temperature} failed: {err}");
                GenerationResult::error(temperature, &err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::completion::{CompletionProvider, CompletionRequest, CompletionResponse};
    use crate::error::SweepError;
    use crate::sweep::{GenerationStatus, TemperatureSweep};

    /// Provider whose latency shrinks as temperature grows, so the
    /// hottest request always lands first.
    struct ReverseLatencyProvider {
        fail_at: Option<f64>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    impl ReverseLatencyProvider {
        fn new(fail_at: Option<f64>) -> Self {
            Self {
                fail_at,
                in_flight: Arc::new(AtomicUsize::new(0)),
                max_in_flight: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for ReverseLatencyProvider {
        async fn complete(
            &self,
            req: &CompletionRequest,
        ) -> Result<CompletionResponse, SweepError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = Duration::from_millis((100.0 - req.temperature * 90.0) as u64);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_at == Some(req.temperature) {
                return Err(SweepError::ProviderError("boom".to_string()));
            }
            Ok(CompletionResponse {
                text: format!("completion at {}", req.temperature),
            })
        }
    }

    #[tokio::test]
    async fn output_is_sorted_by_temperature_despite_completion_order() {
        let provider = Arc::new(ReverseLatencyProvider::new(None));
        let sweep = TemperatureSweep::new(provider, "test-model");

        let results = sweep
            .generate_batch("p", &[0.9, 0.1, 0.5])
            .await
            .unwrap();

        let temps: Vec<f64> = results.iter().map(|r| r.temperature).collect();
        assert_eq!(temps, vec![0.1, 0.5, 0.9]);
    }

    #[tokio::test]
    async fn one_failure_never_drops_or_delays_the_rest() {
        let provider = Arc::new(ReverseLatencyProvider::new(Some(0.5)));
        let sweep = TemperatureSweep::new(provider, "test-model");

        let results = sweep
            .generate_batch("p", &[0.1, 0.5, 0.9])
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, GenerationStatus::Success);
        assert_eq!(results[1].status, GenerationStatus::Error);
        assert!(results[1].text.contains("boom"));
        assert_eq!(results[2].status, GenerationStatus::Success);
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_the_cap() {
        let provider = Arc::new(ReverseLatencyProvider::new(None));
        let max_in_flight = Arc::clone(&provider.max_in_flight);
        let sweep = TemperatureSweep::with_max_concurrency(provider, "test-model", 2);

        let temperatures: Vec<f64> = (1..=8).map(|i| i as f64 / 10.0).collect();
        let results = sweep.generate_batch("p", &temperatures).await.unwrap();

        assert_eq!(results.len(), 8);
        assert!(max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn empty_temperature_set_is_invalid_input() {
        let provider = Arc::new(ReverseLatencyProvider::new(None));
        let sweep = TemperatureSweep::new(provider, "test-model");

        let err = sweep.generate_batch("p", &[]).await.unwrap_err();
        assert!(matches!(err, SweepError::InvalidInput(_)));
    }
}
