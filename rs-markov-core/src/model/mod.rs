//! Top-level module for the word-pair Markov chain.
//!
//! This module provides:
//! - The chain itself and its builder (`Chain`)
//! - Per-key successor storage (`SuccessorSet`)
//! - Sentence generation (`SentenceGenerator`)
//! - Generation configuration (`GenerationInput`)
//! - Cache-backed chain loading (`ChainStore`)

/// Second-order chain: word pair -> successor set, built from phrases.
pub mod chain;

/// Random walk over a built chain with boundary filters.
///
/// Exposes seed selection, positional or graph walk, sentence closing
/// and finishing.
pub mod generator;

/// Generation parameters: walk length, walk mode and noise filters.
pub mod generation_input;

/// Duplicate-free successor list attached to each chain entry.
pub mod successors;

/// Loads a chain from a cache, or builds and caches it on a miss.
pub mod chain_store;
