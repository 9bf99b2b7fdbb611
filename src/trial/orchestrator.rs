//! Blind trial orchestrator.
//!
//! Sequences one run as generate -> paraphrase -> shuffle -> store, and
//! exposes the trial-scoped operations that key off a stored trial: reveal,
//! record a choice, continue a conversation with one side.
//!
//! A run is all-or-nothing: the only externally observable outcomes are a
//! stored trial (with its presentation) or a `TrialError`. Nothing is written
//! to the store until both remote stages have fully succeeded, so no partial
//! trial is ever visible to callers.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::TrialConfig;
use crate::gateway::{ChatGateway, ChatModel, ChatRequest, ProviderError};
use crate::prompts::continuation_messages;
use crate::store::{StoreError, TrialStore};

use super::generate::generate_pair;
use super::paraphrase::paraphrase_pair;
use super::shuffle::assign_slots;
use super::types::{Backend, BackendPair, Choice, Slot, SlotPair};

/// Default participant identifier when the caller supplies none.
pub const ANONYMOUS_PARTICIPANT: &str = "anon";

// =============================================================================
// Errors
// =============================================================================

/// Which remote stage of a trial failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generation,
    Paraphrase,
    Continuation,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Generation => "generation",
            Stage::Paraphrase => "paraphrase",
            Stage::Continuation => "continuation",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum TrialError {
    /// A backend or paraphrase call failed; the whole trial is abandoned.
    #[error("{stage} call failed ({backend}): {source}")]
    Backend {
        stage: Stage,
        backend: Backend,
        #[source]
        source: ProviderError,
    },

    /// No trial stored under this identifier.
    #[error("trial not found: {0}")]
    NotFound(Uuid),

    /// The slot label was not "1" or "2".
    #[error("invalid slot label: {0:?}")]
    InvalidSlot(String),

    /// The prompt was empty.
    #[error("prompt must not be empty")]
    EmptyPrompt,
}

impl From<StoreError> for TrialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownTrial(id) => TrialError::NotFound(id),
        }
    }
}

// =============================================================================
// Response shapes
// =============================================================================

/// One presented output.
#[derive(Debug, Clone, Serialize)]
pub struct SlotText {
    pub slot: Slot,
    pub text: String,
}

/// What a participant is shown: the trial handle plus the two paraphrased
/// outputs in presented order. Deliberately carries no backend identity.
#[derive(Debug, Clone, Serialize)]
pub struct TrialPresentation {
    pub trial_id: Uuid,
    pub outputs: [SlotText; 2],
}

/// Post-choice disclosure: which backend occupied which slot, plus the raw
/// (pre-paraphrase) texts.
#[derive(Debug, Clone, Serialize)]
pub struct Reveal {
    pub order: SlotPair<Backend>,
    pub raw: BackendPair<String>,
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Runs blind trials and serves the trial-scoped follow-up operations.
///
/// Holds the injected store and gateway; many orchestration runs and
/// choice/reveal/continue requests may execute concurrently against the
/// same instance.
pub struct Orchestrator {
    gateway: Arc<dyn ChatGateway>,
    store: Arc<TrialStore>,
    config: TrialConfig,
}

impl Orchestrator {
    pub fn new(gateway: Arc<dyn ChatGateway>, store: Arc<TrialStore>, config: TrialConfig) -> Self {
        Self {
            gateway,
            store,
            config,
        }
    }

    pub fn store(&self) -> &Arc<TrialStore> {
        &self.store
    }

    /// Run one blind trial end to end.
    ///
    /// Fan-out and normalization each run their two calls concurrently;
    /// randomization and the store insert are synchronous. The store is only
    /// touched on the success path.
    pub async fn run_blind_trial(&self, prompt: &str) -> Result<TrialPresentation, TrialError> {
        if prompt.trim().is_empty() {
            return Err(TrialError::EmptyPrompt);
        }

        let raw = generate_pair(self.gateway.as_ref(), &self.config, prompt).await?;
        let paraphrased = paraphrase_pair(self.gateway.as_ref(), &self.config, &raw).await?;

        let assignment = assign_slots(&mut rand::thread_rng());
        let by_slot = SlotPair::new(
            paraphrased.get(assignment.backend_in(Slot::One)).clone(),
            paraphrased.get(assignment.backend_in(Slot::Two)).clone(),
        );

        let trial = self.store.create_trial(prompt, raw, assignment, by_slot);
        debug!(trial_id = %trial.id, "trial stored");

        Ok(TrialPresentation {
            trial_id: trial.id,
            outputs: [
                SlotText {
                    slot: Slot::One,
                    text: trial.paraphrased.one,
                },
                SlotText {
                    slot: Slot::Two,
                    text: trial.paraphrased.two,
                },
            ],
        })
    }

    /// Disclose the slot -> backend mapping and raw texts for a stored trial.
    ///
    /// Read-only; the mapping is fixed at creation and this returns the same
    /// answer on every call.
    pub fn reveal(&self, trial_id: Uuid) -> Result<Reveal, TrialError> {
        let trial = self
            .store
            .get_trial(trial_id)
            .ok_or(TrialError::NotFound(trial_id))?;
        Ok(Reveal {
            order: trial.assignment.order(),
            raw: trial.raw,
        })
    }

    /// Record a participant's choice and return which backend won it.
    ///
    /// The backend is resolved from the trial's assignment at call time and
    /// frozen into the choice record.
    pub fn record_choice(
        &self,
        trial_id: Uuid,
        slot_label: &str,
        participant_id: Option<&str>,
        reacted_ms: Option<u64>,
    ) -> Result<Backend, TrialError> {
        let slot = Slot::from_label(slot_label)
            .ok_or_else(|| TrialError::InvalidSlot(slot_label.to_string()))?;
        let trial = self
            .store
            .get_trial(trial_id)
            .ok_or(TrialError::NotFound(trial_id))?;

        let chosen_backend = trial.assignment.backend_in(slot);
        self.store.record_choice(Choice {
            trial_id,
            participant_id: participant_id
                .filter(|p| !p.is_empty())
                .unwrap_or(ANONYMOUS_PARTICIPANT)
                .to_string(),
            slot,
            chosen_backend,
            reacted_ms,
            created_at: Utc::now(),
        })?;

        debug!(trial_id = %trial_id, slot = %slot, backend = %chosen_backend, "choice recorded");
        Ok(chosen_backend)
    }

    /// Ask a follow-up to the backend behind one slot.
    ///
    /// The continuation goes to that one backend only, framed with the
    /// original prompt and the backend's own raw answer. The response is
    /// returned unparaphrased and unblinded; continuations are explicitly
    /// outside the blind.
    pub async fn continue_conversation(
        &self,
        trial_id: Uuid,
        slot_label: &str,
        message: &str,
    ) -> Result<String, TrialError> {
        let slot = Slot::from_label(slot_label)
            .ok_or_else(|| TrialError::InvalidSlot(slot_label.to_string()))?;
        let trial = self
            .store
            .get_trial(trial_id)
            .ok_or(TrialError::NotFound(trial_id))?;

        let backend = trial.assignment.backend_in(slot);
        let prior_answer = trial.raw.get(backend);

        let request = ChatRequest::new(
            ChatModel::openrouter(self.config.model_for(backend)),
            continuation_messages(&trial.prompt, prior_answer, message),
        )
        .temperature(self.config.generation_temperature)
        .max_tokens(self.config.max_output_tokens);

        let response = self.gateway.chat(request).await.map_err(|source| {
            warn!(trial_id = %trial_id, backend = %backend, code = source.code(),
                "continuation call failed");
            TrialError::Backend {
                stage: Stage::Continuation,
                backend,
                source,
            }
        })?;

        Ok(response.content)
    }

    /// Aggregate win statistics, recomputed from the store.
    pub fn stats(&self) -> super::types::AggregateStats {
        self.store.stats()
    }
}
