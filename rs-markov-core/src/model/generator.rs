use crate::error::{MarkovError, Result};
use crate::model::bigram_model::TransitionModel;
use crate::model::generation_config::GenerationConfig;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Text returned instead of a walk when the model has no transitions.
pub const NO_STATISTICS: &str = "No statistics available to generate text";

/// Formats a word for appending to generated text.
///
/// The word is followed by a space. A word ending a sentence (a trailing
/// period and no other period, so `U.S.` does not count) is also followed
/// by a blank line.
pub fn format_word(word: &str) -> String {
	let mut formatted = format!("{word} ");
	if word.ends_with('.') && word.matches('.').count() == 1 {
		formatted.push_str("\n\n");
	}
	formatted
}

/// Returns `true` if `word` looks like the beginning of a sentence.
pub fn starts_sentence(word: &str) -> bool {
	word.chars().next().is_some_and(char::is_uppercase)
}

/// Random walk over a normalized, pruned transition model.
///
/// # Responsibilities
/// - Precompute the pool of words a text may start with
/// - Walk the model with weighted sampling for `max_words` steps
/// - Render visited words with [`format_word`]
#[derive(Debug)]
pub struct Generator<'a> {
	model: &'a TransitionModel,
	/// Previous-words starting with an uppercase letter, in model order
	start_words: Vec<&'a str>,
	config: GenerationConfig,
}

impl<'a> Generator<'a> {
	/// Creates a generator over `model`.
	pub fn new(model: &'a TransitionModel, config: GenerationConfig) -> Self {
		let start_words: Vec<&'a str> = model.words().filter(|word| starts_sentence(word)).collect();
		debug!(
			"Generator over {} words, {} of them can start a text",
			model.len(),
			start_words.len()
		);
		Self { model, start_words, config }
	}

	/// Words a generated text can start with.
	pub fn start_words(&self) -> &[&'a str] {
		&self.start_words
	}

	/// Picks a start word uniformly among the words starting with an uppercase letter.
	///
	/// # Errors
	/// Returns [`MarkovError::NoEligibleStartWord`] if there is none.
	pub fn random_start_word<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&'a str> {
		self.start_words.choose(rng).copied().ok_or(MarkovError::NoEligibleStartWord)
	}

	/// Generates a text using the configured seed, or the thread RNG when unset.
	pub fn generate(&self) -> Result<String> {
		match self.config.seed {
			Some(seed) => self.generate_with_rng(&mut StdRng::seed_from_u64(seed)),
			None => self.generate_with_rng(&mut rand::rng()),
		}
	}

	/// Generates a text drawing every random choice from `rng`.
	///
	/// # Returns
	/// - `Ok(NO_STATISTICS)` if the model is empty
	/// - `Ok(String)` with the formatted walk otherwise
	///
	/// # Errors
	/// Returns [`MarkovError::NoEligibleStartWord`] if no word starts with an
	/// uppercase letter.
	///
	/// # Notes
	/// - A word without transitions should not occur in a pruned model. If it
	///   does, the walk restarts from a random start word, which is emitted too.
	pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
		let model = self.model;
		if model.is_empty() {
			return Ok(NO_STATISTICS.to_owned());
		}

		let mut current_word = self.random_start_word(rng)?;
		let mut text = String::new();

		for _ in 0..self.config.max_words() {
			text.push_str(&format_word(current_word));

			let transitions = match model.get(current_word) {
				Some(transitions) if !transitions.is_empty() => transitions,
				_ => {
					warn!("'{current_word}' has no transitions, restarting from a random word");
					current_word = self.random_start_word(rng)?;
					text.push_str(&format_word(current_word));
					let Some(transitions) = model.get(current_word) else {
						continue;
					};
					transitions
				}
			};

			if let Some(next_word) = transitions.predict(rng) {
				current_word = next_word;
			}
		}

		Ok(text)
	}
}

/// Generates a text from `model` with the default configuration.
pub fn generate_text(model: &TransitionModel) -> Result<String> {
	Generator::new(model, GenerationConfig::default()).generate()
}
