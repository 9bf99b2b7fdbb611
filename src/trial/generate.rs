//! Generation fan-out: both backend calls for one prompt, concurrently.

use tracing::debug;

use crate::config::TrialConfig;
use crate::gateway::{ChatGateway, ChatModel, ChatRequest, Message};

use super::orchestrator::{Stage, TrialError};
use super::types::{Backend, BackendPair};

/// Issue one generation request per backend and collect both raw outputs.
///
/// Both requests are in flight before either is awaited. If either call
/// fails, the whole fan-out fails; there is never a half-generated trial.
/// Empty response content is a valid (blank) answer, not an error.
pub(crate) async fn generate_pair(
    gateway: &dyn ChatGateway,
    config: &TrialConfig,
    prompt: &str,
) -> Result<BackendPair<String>, TrialError> {
    let (alpha, beta) = tokio::try_join!(
        generate_one(gateway, config, Backend::Alpha, prompt),
        generate_one(gateway, config, Backend::Beta, prompt),
    )?;
    Ok(BackendPair::new(alpha, beta))
}

async fn generate_one(
    gateway: &dyn ChatGateway,
    config: &TrialConfig,
    backend: Backend,
    prompt: &str,
) -> Result<String, TrialError> {
    let request = ChatRequest::new(
        ChatModel::openrouter(config.model_for(backend)),
        vec![Message::user(prompt)],
    )
    .temperature(config.generation_temperature)
    .max_tokens(config.max_output_tokens);

    let response = gateway.chat(request).await.map_err(|source| {
        TrialError::Backend {
            stage: Stage::Generation,
            backend,
            source,
        }
    })?;

    debug!(
        backend = %backend,
        output_tokens = response.output_tokens,
        latency_ms = response.latency.as_millis() as u64,
        "generation complete"
    );

    Ok(response.content)
}
