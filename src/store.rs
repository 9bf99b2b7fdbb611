//! In-memory store for trials and choices.
//!
//! Process-lifetime state, constructed once at startup and passed by `Arc` to
//! the orchestrator and any query handlers; there is no global singleton.
//! Trials are inserted under fresh ids and never mutated; choices are an
//! append-only log. Both mutations are single collection operations behind an
//! `RwLock`, so concurrent orchestration runs and choice requests need no
//! further coordination.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::trial::{AggregateStats, BackendPair, Choice, SlotAssignment, SlotPair, Trial};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A choice referenced a trial that was never stored.
    #[error("unknown trial: {0}")]
    UnknownTrial(Uuid),
}

/// Keyed registry of trials plus the choice log.
#[derive(Debug, Default)]
pub struct TrialStore {
    trials: RwLock<HashMap<Uuid, Trial>>,
    choices: RwLock<Vec<Choice>>,
}

impl TrialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-built trial under a fresh id and return the record.
    ///
    /// Only called after generation and paraphrase have both succeeded for
    /// both backends, so a stored trial is always complete. Never fails:
    /// ids are fresh v4 UUIDs, so insertion cannot collide.
    pub fn create_trial(
        &self,
        prompt: impl Into<String>,
        raw: BackendPair<String>,
        assignment: SlotAssignment,
        paraphrased: SlotPair<String>,
    ) -> Trial {
        let trial = Trial {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            raw,
            assignment,
            paraphrased,
            created_at: Utc::now(),
        };
        self.write_trials().insert(trial.id, trial.clone());
        trial
    }

    /// Look up a trial by id. `None` for unknown ids.
    pub fn get_trial(&self, id: Uuid) -> Option<Trial> {
        self.read_trials().get(&id).cloned()
    }

    /// Append a choice to the log.
    ///
    /// The referenced trial must exist; a dangling choice would silently
    /// corrupt the win statistics, so it is rejected instead of appended.
    pub fn record_choice(&self, choice: Choice) -> Result<(), StoreError> {
        if !self.read_trials().contains_key(&choice.trial_id) {
            return Err(StoreError::UnknownTrial(choice.trial_id));
        }
        self.write_choices().push(choice);
        Ok(())
    }

    /// Recompute aggregate statistics from the current registry and log.
    ///
    /// O(choices) on every call and never cached, so the result is always
    /// consistent with the log contents at the instant of the read.
    pub fn stats(&self) -> AggregateStats {
        let total_trials = self.read_trials().len();
        let choices = self.read_choices();
        let mut wins = BackendPair::new(0usize, 0usize);
        for choice in choices.iter() {
            *wins.get_mut(choice.chosen_backend) += 1;
        }
        AggregateStats {
            total_trials,
            total_choices: choices.len(),
            wins,
        }
    }

    /// Number of stored trials. Used by tests to assert all-or-nothing runs.
    pub fn trial_count(&self) -> usize {
        self.read_trials().len()
    }

    fn read_trials(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, Trial>> {
        self.trials
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_trials(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Trial>> {
        self.trials
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_choices(&self) -> std::sync::RwLockReadGuard<'_, Vec<Choice>> {
        self.choices
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_choices(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Choice>> {
        self.choices
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial::{Backend, Slot};

    fn store_with_trial() -> (TrialStore, Trial) {
        let store = TrialStore::new();
        let trial = store.create_trial(
            "Explain X",
            BackendPair::new("alpha raw".into(), "beta raw".into()),
            SlotAssignment::new(Backend::Alpha),
            SlotPair::new("para one".into(), "para two".into()),
        );
        (store, trial)
    }

    fn choice_for(trial: &Trial, backend: Backend) -> Choice {
        Choice {
            trial_id: trial.id,
            participant_id: "anon".into(),
            slot: trial.assignment.slot_of(backend),
            chosen_backend: backend,
            reacted_ms: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn created_trial_is_retrievable_and_stable() {
        let (store, trial) = store_with_trial();
        let fetched = store.get_trial(trial.id).unwrap();
        assert_eq!(fetched.id, trial.id);
        assert_eq!(fetched.assignment, trial.assignment);
        assert_eq!(fetched.paraphrased, trial.paraphrased);

        // Repeated reads never change the assignment.
        let again = store.get_trial(trial.id).unwrap();
        assert_eq!(again.assignment, fetched.assignment);
    }

    #[test]
    fn get_trial_returns_none_for_unknown_id() {
        let store = TrialStore::new();
        assert!(store.get_trial(Uuid::new_v4()).is_none());
    }

    #[test]
    fn record_choice_rejects_unknown_trial() {
        let (store, trial) = store_with_trial();
        let mut dangling = choice_for(&trial, Backend::Alpha);
        dangling.trial_id = Uuid::new_v4();
        let err = store.record_choice(dangling).unwrap_err();
        assert!(matches!(err, StoreError::UnknownTrial(_)));
        assert_eq!(store.stats().total_choices, 0);
    }

    #[test]
    fn stats_totals_match_win_sum() {
        let (store, trial) = store_with_trial();
        store.record_choice(choice_for(&trial, Backend::Alpha)).unwrap();
        store.record_choice(choice_for(&trial, Backend::Alpha)).unwrap();
        store.record_choice(choice_for(&trial, Backend::Beta)).unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_trials, 1);
        assert_eq!(stats.total_choices, 3);
        assert_eq!(stats.wins.alpha + stats.wins.beta, stats.total_choices);
        assert_eq!(stats.wins.alpha, 2);
        assert_eq!(stats.wins.beta, 1);
    }

    #[test]
    fn trial_count_only_grows() {
        let (store, _) = store_with_trial();
        let before = store.trial_count();
        store.create_trial(
            "Another prompt",
            BackendPair::new(String::new(), String::new()),
            SlotAssignment::new(Backend::Beta),
            SlotPair::new(String::new(), String::new()),
        );
        assert_eq!(store.trial_count(), before + 1);
    }

    #[test]
    fn chosen_backend_reflects_slot_at_creation_time() {
        let (store, trial) = store_with_trial();
        let slot_one_backend = trial.assignment.backend_in(Slot::One);
        store
            .record_choice(Choice {
                trial_id: trial.id,
                participant_id: "alice".into(),
                slot: Slot::One,
                chosen_backend: slot_one_backend,
                reacted_ms: Some(850),
                created_at: Utc::now(),
            })
            .unwrap();
        let stats = store.stats();
        assert_eq!(*stats.wins.get(slot_one_backend), 1);
        assert_eq!(*stats.wins.get(slot_one_backend.other()), 0);
    }
}
