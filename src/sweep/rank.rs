use std::sync::{Arc, OnceLock};

use futures::future::join_all;
use regex::Regex;

use crate::chat::ChatMessage;
use crate::completion::CompletionRequest;
use crate::error::SweepError;

use super::types::GenerationResult;
use super::TemperatureSweep;

/// Judge calls run deterministically: temperature 0 and a tiny token budget.
const SCORING_TEMPERATURE: f64 = 0.0;
const SCORING_MAX_OUTPUT_TOKENS: u32 = 10;

/// Sentinel rank for batches where nothing succeeded.
const UNRANKED: u32 = 0;

fn score_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("score pattern is valid"))
}

/// Extracts the first run of digits anywhere in the judge output,
/// clamped to `[0, 100]`. No digits at all means `0`: a judge reply we
/// cannot read is treated as a worthless response, not an unknown one.
fn parse_score(text: &str) -> u8 {
    let Some(m) = score_pattern().find(text) else {
        return 0;
    };
    // a digit run too long for u64 is far above the cap either way
    m.as_str().parse::<u64>().map_or(100, |v| v.min(100) as u8)
}

fn scoring_prompt(prompt: &str, response_text: &str, temperature: f64) -> String {
    format!(
        "Rate this response to the prompt on a scale of 0-100 considering:\n\
         - Relevance to the prompt\n\
         - Clarity and readability\n\
         - Usefulness and completeness\n\
         - Creativity (if appropriate)\n\
         \n\
         Prompt: \"{prompt}\"\n\
         Response: \"{response_text}\"\n\
         Temperature used: {temperature}\n\
         \n\
         Reply with ONLY the numerical score (0-100)."
    )
}

impl TemperatureSweep {
    /// Scores every successful result with a concurrent round of judge
    /// calls, then merges scored and failed items into one rank order.
    ///
    /// Failed attempts are pinned at score `0` and sort after every
    /// successful item, including successful items that also scored `0`.
    /// Ties between successful items keep their temperature-ascending
    /// input order (stable sort); lower temperature wins the tie.
    ///
    /// When every attempt failed, scoring is skipped entirely: each item
    /// gets score `0` and the rank `0` sentinel, and the original order
    /// is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::InvalidInput`] when `results` is empty.
    /// Judge failures never escape; they fold into a `0` score.
    pub async fn rank_batch(
        &self,
        prompt: &str,
        results: Vec<GenerationResult>,
    ) -> Result<Vec<GenerationResult>, SweepError> {
        if results.is_empty() {
            return Err(SweepError::InvalidInput("result set is empty".to_string()));
        }

        let (mut successful, mut failed): (Vec<_>, Vec<_>) =
            results.into_iter().partition(GenerationResult::is_success);

        if successful.is_empty() {
            for result in &mut failed {
                result.score = Some(0);
                result.rank = Some(UNRANKED);
            }
            return Ok(failed);
        }

        log::info!("scoring {} responses", successful.len());
        let judgements = successful.iter().map(|result| {
            let permits = Arc::clone(&self.permits);
            async move {
                let _permit = permits.acquire().await;
                self.score_response(prompt, &result.text, result.temperature)
                    .await
            }
        });
        let scores = join_all(judgements).await;

        for (result, score) in successful.iter_mut().zip(scores) {
            result.score = Some(score);
        }
        for result in &mut failed {
            result.score = Some(0);
        }

        // successful first, so a zero-scored success still outranks a failure
        let mut ranked = successful;
        ranked.append(&mut failed);
        ranked.sort_by_key(|r| std::cmp::Reverse(r.score.unwrap_or(0)));

        for (i, result) in ranked.iter_mut().enumerate() {
            result.rank = Some(i as u32 + 1);
        }
        Ok(ranked)
    }

    async fn score_response(&self, prompt: &str, response_text: &str, temperature: f64) -> u8 {
        let request = CompletionRequest::new(
            &self.model,
            vec![ChatMessage::user()
                .content(scoring_prompt(prompt, response_text, temperature))
                .build()],
        )
        .temperature(SCORING_TEMPERATURE)
        .max_output_tokens(SCORING_MAX_OUTPUT_TOKENS)
        .top_p(1.0);

        match self.provider.complete(&request).await {
            Ok(response) => parse_score(&response.text),
            Err(err) => {
                log::warn!("scoring call at temperature {temperature} failed: {err}");
                0
            }
        }
    }
}
