//! Top-level module for the bigram generation system.
//!
//! Data flows through the submodules in order:
//! - `tokenizer`: raw text to normalized words
//! - `bigram_model`: word pairs to a count graph, merging, pruning and
//!   normalization (`BigramGraph`)
//! - `corpus`: parallel counting of many source texts (`Corpus`)
//! - `generator`: weighted random walk over the normalized graph (`Generator`)

/// Word scanning and cleaning.
pub mod tokenizer;

/// Outgoing transitions of a single word.
///
/// Stores insertion-ordered weights and supports weighted sampling.
pub mod transitions;

/// Directed weighted word graph (`BigramGraph`).
///
/// Handles bigram validity, counting, merging, dead-end pruning
/// and conversion to probabilities.
pub mod bigram_model;

/// Set of source texts built into one model using worker threads.
pub mod corpus;

/// Random walk parameters.
pub mod generation_config;

/// High-level text generation over a transition model.
pub mod generator;
