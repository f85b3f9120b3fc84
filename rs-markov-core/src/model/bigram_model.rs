use super::tokenizer::tokenize;
use super::transitions::Transitions;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Bigram graph holding raw occurrence counts.
pub type BigramCounts = BigramGraph<u64>;

/// Bigram graph holding normalized transition probabilities.
pub type TransitionModel = BigramGraph<f64>;

/// Returns `true` if `(previous_word, current_word)` should be counted.
///
/// Full stops are stripped before the check, so `M.` counts as a single
/// letter. The pair is valid when both stripped words are non-empty and
/// either exactly one of them is `a`, or both are longer than one character.
/// `a a` is rejected.
pub fn valid_bigram(previous_word: &str, current_word: &str) -> bool {
	let previous_word = previous_word.trim_matches('.');
	let current_word = current_word.trim_matches('.');

	let words_not_empty = !previous_word.is_empty() && !current_word.is_empty();
	let one_word_is_a = (previous_word == "a") ^ (current_word == "a");
	let words_not_single_letter = previous_word.chars().count() > 1 && current_word.chars().count() > 1;

	words_not_empty && (one_word_is_a || words_not_single_letter)
}

/// Directed weighted word graph: previous-word → (current-word → weight).
///
/// `BigramGraph<u64>` is the counting state, built from tokens and merged
/// across sources. [`BigramGraph::convert_to_probabilities`] turns it into a
/// `BigramGraph<f64>` whose rows each sum to 1.0, ready for generation.
///
/// # Invariants
/// - Previous-words and each row's current-words keep their insertion order
/// - After [`BigramGraph::remove_broken_chains`], every current-word of every
///   row is itself a previous-word
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BigramGraph<W> {
	/// Mapping from a previous-word to its outgoing transitions
	transitions: IndexMap<String, Transitions<W>>,
}

impl<W> Default for BigramGraph<W> {
	fn default() -> Self {
		Self { transitions: IndexMap::new() }
	}
}

impl<W> BigramGraph<W> {
	/// Creates an empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of previous-words.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Number of distinct bigrams.
	pub fn edge_count(&self) -> usize {
		self.transitions.values().map(Transitions::len).sum()
	}

	/// Returns the transitions leaving `previous_word`.
	pub fn get(&self, previous_word: &str) -> Option<&Transitions<W>> {
		self.transitions.get(previous_word)
	}

	/// Returns `true` if `previous_word` has a row in the graph.
	pub fn contains(&self, previous_word: &str) -> bool {
		self.transitions.contains_key(previous_word)
	}

	/// Iterates over the previous-words in insertion order.
	pub fn words(&self) -> impl Iterator<Item = &str> {
		self.transitions.keys().map(String::as_str)
	}

	/// Iterates over `(previous_word, transitions)` in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Transitions<W>)> {
		self.transitions.iter().map(|(word, transitions)| (word.as_str(), transitions))
	}

	/// Removes every transition that would strand a random walk.
	///
	/// A current-word that is not a previous-word is a dead end: it is removed
	/// from every row pointing at it. A row left empty makes its previous-word
	/// a dead end too, which can cascade upstream. Dead words are processed
	/// from a work-list with a reverse index, so each edge is visited a
	/// bounded number of times instead of rescanning the whole graph until
	/// nothing changes.
	///
	/// Only membership is inspected, so this works on counts and probabilities.
	pub fn remove_broken_chains(&mut self) {
		// current-word -> previous-words with a transition toward it
		let mut predecessors: HashMap<String, Vec<String>> = HashMap::new();
		let mut dead: HashSet<String> = HashSet::new();
		let mut queue: VecDeque<String> = VecDeque::new();

		for (previous_word, transitions) in &self.transitions {
			if transitions.is_empty() && dead.insert(previous_word.clone()) {
				queue.push_back(previous_word.clone());
			}
			for current_word in transitions.words() {
				predecessors
					.entry(current_word.to_owned())
					.or_default()
					.push(previous_word.clone());
				if !self.transitions.contains_key(current_word) && dead.insert(current_word.to_owned()) {
					queue.push_back(current_word.to_owned());
				}
			}
		}

		while let Some(dead_word) = queue.pop_front() {
			let Some(previous_words) = predecessors.remove(&dead_word) else {
				continue;
			};
			for previous_word in previous_words {
				if dead.contains(&previous_word) {
					continue;
				}
				if let Some(transitions) = self.transitions.get_mut(&previous_word) {
					transitions.remove(&dead_word);
					if transitions.is_empty() {
						dead.insert(previous_word.clone());
						queue.push_back(previous_word);
					}
				}
			}
		}

		let before = self.transitions.len();
		self.transitions.retain(|previous_word, _| !dead.contains(previous_word));
		debug!(
			"Pruned {} dead-end words, {} words remain",
			before - self.transitions.len(),
			self.transitions.len()
		);
	}
}

impl BigramGraph<u64> {
	/// Counts every valid adjacent pair of `tokens`.
	pub fn count_bigrams<I>(tokens: I) -> Self
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		let mut graph = Self::new();
		let mut tokens = tokens.into_iter();
		let Some(mut previous_word) = tokens.next() else {
			return graph;
		};
		for current_word in tokens {
			graph.count_bigram(previous_word.as_ref(), current_word.as_ref());
			previous_word = current_word;
		}
		graph
	}

	/// Tokenizes `text` and counts its bigrams.
	pub fn from_text(text: &str) -> Self {
		Self::count_bigrams(tokenize(text))
	}

	/// Records one occurrence of `previous_word` followed by `current_word`.
	///
	/// Pairs rejected by [`valid_bigram`] are silently skipped.
	pub fn count_bigram(&mut self, previous_word: &str, current_word: &str) {
		if !valid_bigram(previous_word, current_word) {
			return;
		}
		match self.transitions.get_mut(previous_word) {
			Some(transitions) => transitions.add_transition(current_word),
			None => {
				let mut transitions: Transitions<u64> = Transitions::new();
				transitions.add_transition(current_word);
				self.transitions.insert(previous_word.to_owned(), transitions);
			}
		}
	}

	/// Merges another count graph into this one.
	///
	/// Counts of matching bigrams are summed; unknown previous-words and
	/// transitions are appended in `other`'s order. The resulting counts do
	/// not depend on merge order, only the insertion order does.
	pub fn merge(&mut self, other: &Self) {
		for (previous_word, transitions) in &other.transitions {
			if let Some(existing) = self.transitions.get_mut(previous_word) {
				existing.merge(transitions);
			} else {
				self.transitions.insert(previous_word.clone(), transitions.clone());
			}
		}
	}

	/// Converts every row's counts to probabilities (`count / row total`).
	///
	/// Order and membership are preserved.
	pub fn convert_to_probabilities(self) -> BigramGraph<f64> {
		let transitions = self
			.transitions
			.into_iter()
			.map(|(previous_word, transitions)| (previous_word, transitions.to_probabilities()))
			.collect();
		BigramGraph { transitions }
	}
}
