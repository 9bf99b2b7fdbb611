//! Paraphrase normalizer: style-neutralize both raw outputs, concurrently.

use tracing::debug;

use crate::config::TrialConfig;
use crate::gateway::{ChatGateway, ChatModel, ChatRequest};
use crate::prompts::paraphrase_messages;

use super::orchestrator::{Stage, TrialError};
use super::types::{Backend, BackendPair};

/// Paraphrase each raw text through the style-normalizing model.
///
/// Each text is paraphrased in isolation; one backend's output never leaks
/// into the other's prompt. Both calls run concurrently and both must
/// succeed, so either failure fails the whole operation. Output stays keyed
/// by originating backend.
pub(crate) async fn paraphrase_pair(
    gateway: &dyn ChatGateway,
    config: &TrialConfig,
    raw: &BackendPair<String>,
) -> Result<BackendPair<String>, TrialError> {
    let (alpha, beta) = tokio::try_join!(
        paraphrase_one(gateway, config, Backend::Alpha, raw.get(Backend::Alpha)),
        paraphrase_one(gateway, config, Backend::Beta, raw.get(Backend::Beta)),
    )?;
    Ok(BackendPair::new(alpha, beta))
}

async fn paraphrase_one(
    gateway: &dyn ChatGateway,
    config: &TrialConfig,
    backend: Backend,
    raw_text: &str,
) -> Result<String, TrialError> {
    let request = ChatRequest::new(
        ChatModel::openrouter(&config.paraphrase_model),
        paraphrase_messages(&config.paraphrase_prefix, raw_text),
    )
    .temperature(config.paraphrase_temperature)
    .max_tokens(config.max_output_tokens);

    let response = gateway.chat(request).await.map_err(|source| {
        TrialError::Backend {
            stage: Stage::Paraphrase,
            backend,
            source,
        }
    })?;

    debug!(
        backend = %backend,
        output_tokens = response.output_tokens,
        "paraphrase complete"
    );

    Ok(response.content)
}
