//! Error types shared by the whole engine.

/// Result type used across the crate, defaulting to [`MarkovError`].
pub type Result<T, E = MarkovError> = std::result::Result<T, E>;

/// Errors that can be raised while building a model or generating text.
///
/// Routine filtering (invalid bigrams, empty tokens, empty models) never
/// produces an error; only the conditions below do.
#[derive(Debug, thiserror::Error)]
pub enum MarkovError {
	/// The model has transitions but no previous-word starting with an
	/// uppercase letter, so there is nowhere to begin a sentence.
	#[error("no word in the model starts with an uppercase letter")]
	NoEligibleStartWord,

	/// A generation parameter is out of range.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// A corpus worker thread panicked before returning its partial model.
	#[error("corpus worker thread panicked")]
	WorkerPanicked,

	/// Reading a local source failed.
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}
