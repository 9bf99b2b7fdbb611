//! Core types for blind trials: backends, slots, assignments, records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// BACKENDS AND SLOTS
// =============================================================================

/// One of the two fixed text-generation backends under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Alpha,
    Beta,
}

impl Backend {
    /// Both backends, in canonical order.
    pub const BOTH: [Backend; 2] = [Backend::Alpha, Backend::Beta];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Alpha => "alpha",
            Backend::Beta => "beta",
        }
    }

    /// The other backend of the pair.
    pub fn other(&self) -> Backend {
        match self {
            Backend::Alpha => Backend::Beta,
            Backend::Beta => Backend::Alpha,
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A presentation position. Carries no identity until a trial's assignment
/// binds it to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

impl Slot {
    pub const BOTH: [Slot; 2] = [Slot::One, Slot::Two];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::One => "1",
            Slot::Two => "2",
        }
    }

    /// Parse a presentation label. Only `"1"` and `"2"` are valid.
    pub fn from_label(label: &str) -> Option<Slot> {
        match label {
            "1" => Some(Slot::One),
            "2" => Some(Slot::Two),
            _ => None,
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// PAIR CONTAINERS
// =============================================================================

/// A value per backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendPair<T> {
    pub alpha: T,
    pub beta: T,
}

impl<T> BackendPair<T> {
    pub fn new(alpha: T, beta: T) -> Self {
        Self { alpha, beta }
    }

    pub fn get(&self, backend: Backend) -> &T {
        match backend {
            Backend::Alpha => &self.alpha,
            Backend::Beta => &self.beta,
        }
    }

    pub fn get_mut(&mut self, backend: Backend) -> &mut T {
        match backend {
            Backend::Alpha => &mut self.alpha,
            Backend::Beta => &mut self.beta,
        }
    }
}

/// A value per presentation slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPair<T> {
    #[serde(rename = "1")]
    pub one: T,
    #[serde(rename = "2")]
    pub two: T,
}

impl<T> SlotPair<T> {
    pub fn new(one: T, two: T) -> Self {
        Self { one, two }
    }

    pub fn get(&self, slot: Slot) -> &T {
        match slot {
            Slot::One => &self.one,
            Slot::Two => &self.two,
        }
    }
}

// =============================================================================
// SLOT ASSIGNMENT
// =============================================================================

/// The private mapping from presentation slot to backend for one trial.
///
/// Only the backend occupying slot 1 is stored; slot 2 holds the other
/// backend by construction, so the mapping is a bijection by type and a
/// non-bijective assignment cannot be represented at all. Immutable once
/// the trial is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAssignment {
    slot_one: Backend,
}

impl SlotAssignment {
    /// Build an assignment placing `slot_one` in presentation slot 1.
    pub fn new(slot_one: Backend) -> Self {
        Self { slot_one }
    }

    /// Which backend occupies the given slot.
    pub fn backend_in(&self, slot: Slot) -> Backend {
        match slot {
            Slot::One => self.slot_one,
            Slot::Two => self.slot_one.other(),
        }
    }

    /// Which slot the given backend occupies.
    pub fn slot_of(&self, backend: Backend) -> Slot {
        if backend == self.slot_one {
            Slot::One
        } else {
            Slot::Two
        }
    }

    /// The full slot -> backend mapping, for reveal responses.
    pub fn order(&self) -> SlotPair<Backend> {
        SlotPair::new(self.slot_one, self.slot_one.other())
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// One blind-comparison unit: a prompt plus its two normalized, randomly
/// slotted outputs. Created exactly once after a fully successful
/// generate + paraphrase cycle; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Trial {
    /// Opaque unique identifier, never reused.
    pub id: Uuid,
    /// The original prompt text.
    pub prompt: String,
    /// Raw (pre-paraphrase) outputs, keyed by backend.
    pub raw: BackendPair<String>,
    /// Slot -> backend mapping, fixed at creation.
    pub assignment: SlotAssignment,
    /// Paraphrased outputs in presented order.
    pub paraphrased: SlotPair<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A recorded human choice against a trial. Append-only.
#[derive(Debug, Clone)]
pub struct Choice {
    pub trial_id: Uuid,
    /// Free-form participant identifier; "anon" when not supplied.
    pub participant_id: String,
    /// The slot the participant picked.
    pub slot: Slot,
    /// Backend resolved from the trial's assignment at choice time.
    pub chosen_backend: Backend,
    /// Reaction latency in milliseconds, when the caller measured one.
    pub reacted_ms: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// Win/trial counts, recomputed from the store on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    pub total_trials: usize,
    pub total_choices: usize,
    pub wins: BackendPair<usize>,
}
