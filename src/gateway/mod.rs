//! Provider gateway for OpenRouter chat completions.
//!
//! The orchestrator talks to every remote model (both generation backends
//! and the paraphraser) through the [`ChatGateway`] trait, so tests can swap
//! in a mock server and the trial logic never sees HTTP.

pub mod error;
pub mod openrouter;
pub mod types;

pub use error::{ErrorContext, ProviderError};
pub use openrouter::OpenRouterAdapter;
pub use types::*;

#[async_trait::async_trait]
pub trait ChatGateway: Send + Sync {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, ProviderError>;
}
