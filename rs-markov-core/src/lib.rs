//! Bigram (first-order Markov) text generation library.
//!
//! This crate provides the statistical engine of the text synthesizer:
//! - Tokenization of raw prose into normalized words
//! - Bigram counting, merging of partial models and parallel corpus building
//! - Dead-end pruning and conversion of counts to probabilities
//! - Weighted random walks rendered as formatted text
//!
//! Typical use:
//! ```
//! use rs_markov_core::model::corpus::Corpus;
//! use rs_markov_core::model::generator::generate_text;
//!
//! let mut corpus = Corpus::new();
//! corpus.add_text("Markov chains are random. Chains are chains of states.");
//! let model = corpus.into_model().unwrap();
//! println!("{}", generate_text(&model).unwrap());
//! ```

/// Error type and `Result` alias shared by the crate.
pub mod error;

/// Tokenizer, bigram models, corpus building and generation.
pub mod model;

/// Local source loading.
pub mod io;

pub use error::{MarkovError, Result};
