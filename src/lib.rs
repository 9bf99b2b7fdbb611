#![forbid(unsafe_code)]

//! # blindfold
//!
//! Blind, randomized head-to-head trials between two text-generation
//! backends. Both backends answer the same prompt in parallel, both answers
//! are run through a style-paraphrasing model to strip tone and phrasing
//! fingerprints, and the normalized texts are shown in a uniformly random
//! order. A human picks a winner without knowing which backend wrote which
//! answer; provenance is only disclosed on reveal.
//!
//! The crate is the orchestration core: provider gateway, trial pipeline
//! (fan-out -> paraphrase -> shuffle -> store), and the in-memory trial and
//! choice store with aggregate win statistics. Presentation and transport
//! live elsewhere.

pub mod config;
pub mod gateway;
pub mod prompts;
pub mod store;
pub mod trial;

pub use config::TrialConfig;
pub use gateway::{ChatGateway, OpenRouterAdapter, ProviderError};
pub use store::{StoreError, TrialStore};
pub use trial::{
    AggregateStats, Backend, Orchestrator, Reveal, Slot, SlotAssignment, Stage, Trial, TrialError,
    TrialPresentation,
};
