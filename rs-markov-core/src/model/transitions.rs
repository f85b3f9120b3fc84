use indexmap::IndexMap;

use rand::Rng;

use serde::{Deserialize, Serialize};


/// Outgoing edges of one previous-word in a bigram graph.
///
/// Conceptually this is a node in a Markov chain: each entry maps a
/// current-word to the weight of the edge leading to it. While counting,
/// weights are occurrence counts (`u64`); after normalization they are
/// probabilities (`f64`).
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during learning
/// - Merge with the transitions of the same word from another model
/// - Convert counts to probabilities
/// - Select the next word from a uniform random draw
///
/// ## Invariants
/// - Entries keep their insertion order; it drives the sampling walk order
/// - Each occurrence count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Transitions<W> {
	/// Outgoing transitions indexed by the next word.
	/// Example: { "chain" => 42, "tree" => 3 }
	next_words: IndexMap<String, W>,
}

impl<W> Default for Transitions<W> {
	fn default() -> Self {
		Self { next_words: IndexMap::new() }
	}
}

impl<W> Transitions<W> {
	/// Creates an empty set of transitions.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of distinct next words.
	pub fn len(&self) -> usize {
		self.next_words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.next_words.is_empty()
	}

	/// Returns `true` if a transition toward `next_word` exists.
	pub fn contains(&self, next_word: &str) -> bool {
		self.next_words.contains_key(next_word)
	}

	/// Returns the weight of the transition toward `next_word`.
	pub fn get(&self, next_word: &str) -> Option<&W> {
		self.next_words.get(next_word)
	}

	/// Iterates over `(next_word, weight)` in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &W)> {
		self.next_words.iter().map(|(word, weight)| (word.as_str(), weight))
	}

	/// Iterates over the next words in insertion order.
	pub fn words(&self) -> impl Iterator<Item = &str> {
		self.next_words.keys().map(String::as_str)
	}

	/// Removes the transition toward `next_word`, keeping the order of the others.
	pub(crate) fn remove(&mut self, next_word: &str) -> Option<W> {
		self.next_words.shift_remove(next_word)
	}
}

impl Transitions<u64> {
	/// Records an occurrence of a transition toward `next_word`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is appended with an initial count of 1.
	pub fn add_transition(&mut self, next_word: &str) {
		self.add_occurrences(next_word, 1);
	}

	fn add_occurrences(&mut self, next_word: &str, occurrences: u64) {
		match self.next_words.get_mut(next_word) {
			Some(count) => *count += occurrences,
			None => {
				self.next_words.insert(next_word.to_owned(), occurrences);
			}
		}
	}

	/// Total number of observed occurrences.
	pub fn total(&self) -> u64 {
		self.next_words.values().sum()
	}

	/// Merges the transitions of the same previous-word from another model.
	///
	/// Occurrence counts are summed; transitions unknown to `self` are
	/// appended in `other`'s order.
	pub fn merge(&mut self, other: &Self) {
		for (next_word, occurrences) in &other.next_words {
			self.add_occurrences(next_word, *occurrences);
		}
	}

	/// Converts occurrence counts into probabilities (`count / total`).
	///
	/// Order and membership are unchanged. A zero total yields zero
	/// probabilities instead of dividing by zero.
	pub fn to_probabilities(&self) -> Transitions<f64> {
		let total = self.total();
		let next_words = self
			.next_words
			.iter()
			.map(|(word, count)| {
				let probability = if total == 0 { 0.0 } else { *count as f64 / total as f64 };
				(word.clone(), probability)
			})
			.collect();
		Transitions { next_words }
	}
}

impl Transitions<f64> {
	/// Selects the next word for a draw `r` in `[0, 1)`.
	///
	/// Walks the transitions in insertion order, accumulating probabilities,
	/// and returns the first word where `r` is below the running total.
	/// If rounding leaves the total below `r`, the last word is returned.
	///
	/// Returns `None` if there are no transitions.
	pub fn select(&self, r: f64) -> Option<&str> {
		let mut cumulative_probability = 0.0;
		for (next_word, probability) in &self.next_words {
			cumulative_probability += probability;
			if r < cumulative_probability {
				return Some(next_word.as_str());
			}
		}

		// Floating point rounding near 1.0
		self.next_words.last().map(|(next_word, _)| next_word.as_str())
	}

	/// Predicts the next word using weighted random sampling.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		self.select(rng.random::<f64>())
	}
}
