use crate::error::{MarkovError, Result};

/// Default number of random-walk steps for one generated text.
pub const DEFAULT_MAX_WORDS: usize = 10_000;

/// Parameters of a random walk over a transition model.
///
/// # Responsibilities
/// - Bound the number of walk steps (`max_words`)
/// - Optionally pin the random source to a seed for reproducible output
///
/// # Invariants
/// - `max_words` is always > 0
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationConfig {
	/// Number of walk steps; a restart from a dead end emits one
	/// extra word per step.
	max_words: usize,

	/// Seed of the random source. `None` uses the thread-local generator.
	pub seed: Option<u64>,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self { max_words: DEFAULT_MAX_WORDS, seed: None }
	}
}

impl GenerationConfig {
	/// Creates a configuration with the default step count and no seed.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of walk steps.
	pub fn max_words(&self) -> usize {
		self.max_words
	}

	/// Sets the number of walk steps.
	///
	/// # Errors
	/// Returns an error if `max_words` is zero.
	pub fn set_max_words(&mut self, max_words: usize) -> Result<()> {
		if max_words == 0 {
			return Err(MarkovError::InvalidConfig("max_words must be greater than 0".to_owned()));
		}
		self.max_words = max_words;
		Ok(())
	}

	/// Builder-style variant of [`GenerationConfig::set_max_words`].
	pub fn with_max_words(mut self, max_words: usize) -> Result<Self> {
		self.set_max_words(max_words)?;
		Ok(self)
	}

	/// Builder-style seed setter.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}
}
