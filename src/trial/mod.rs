//! Blind trial core: fan-out, normalization, randomization, lifecycle.

mod generate;
mod paraphrase;
pub mod orchestrator;
pub mod shuffle;
pub mod types;

pub use orchestrator::{
    Orchestrator, Reveal, SlotText, Stage, TrialError, TrialPresentation, ANONYMOUS_PARTICIPANT,
};
pub use shuffle::assign_slots;
pub use types::{
    AggregateStats, Backend, BackendPair, Choice, Slot, SlotAssignment, SlotPair, Trial,
};
