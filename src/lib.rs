//! # autotemp
//!
//! A concurrent temperature sweep engine for LLM completions. For each
//! input prompt it requests one completion per candidate sampling
//! temperature, asks the same backend to judge every completion on a
//! 0-100 scale, and ranks the completions best-to-worst, tolerating
//! partial failure at every step.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use autotemp::backends::groq::Groq;
//! use autotemp::TemperatureSweep;
//!
//! # async fn demo() -> Result<(), autotemp::SweepError> {
//! let provider = Arc::new(Groq::new("gsk-..."));
//! let sweep = TemperatureSweep::new(provider, "llama3-70b-8192");
//! let report = sweep
//!     .run(
//!         &["Write a haiku about rust".to_string()],
//!         &[0.1, 0.5, 0.9],
//!     )
//!     .await?;
//! println!("{:?}", report.summary);
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod chat;
pub mod completion;
pub mod error;
pub mod report;
pub mod secret_store;
pub mod sweep;

pub use completion::{CompletionProvider, CompletionRequest, CompletionResponse};
pub use error::SweepError;
pub use sweep::{
    GenerationResult, GenerationStatus, PromptBatch, RunSummary, SweepReport, TemperatureSweep,
};
