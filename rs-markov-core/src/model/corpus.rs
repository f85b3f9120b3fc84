use std::thread;

use log::info;

use crate::error::{MarkovError, Result};
use super::bigram_model::{BigramCounts, BigramGraph, TransitionModel};

/// Collection of source texts a transition model is learned from.
///
/// Each source is counted on its own, so no bigram spans two sources.
/// Partial models are merged in the order the sources were added.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
	texts: Vec<String>,
}

impl Corpus {
	/// Returns an empty corpus.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a source text.
	pub fn add_text<S: Into<String>>(&mut self, text: S) {
		self.texts.push(text.into());
	}

	/// Number of sources.
	pub fn len(&self) -> usize {
		self.texts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.texts.is_empty()
	}

	/// Counts the bigrams of every source and merges them into one graph.
	///
	/// # Behavior
	/// - Splits the sources into chunks (one per CPU core).
	/// - Spawns a thread per chunk to count its sources.
	/// - Joins the threads in chunk order and merges their partial graphs,
	///   so the result does not depend on which thread finishes first.
	///
	/// # Errors
	/// Returns [`MarkovError::WorkerPanicked`] if a worker thread panicked.
	pub fn count_bigrams(&self) -> Result<BigramCounts> {
		let workers = num_cpus::get().max(1);
		let chunk_size = self.texts.len().div_ceil(workers).max(1);

		let handles: Vec<_> = self
			.texts
			.chunks(chunk_size)
			.map(|chunk| {
				let chunk: Vec<String> = chunk.to_vec();
				thread::spawn(move || {
					let mut partial_model: BigramCounts = BigramGraph::new();
					for text in &chunk {
						partial_model.merge(&BigramGraph::from_text(text));
					}
					partial_model
				})
			})
			.collect();

		let mut counts: BigramCounts = BigramGraph::new();
		for handle in handles {
			let partial_model = handle.join().map_err(|_| MarkovError::WorkerPanicked)?;
			counts.merge(&partial_model);
		}
		Ok(counts)
	}

	/// Builds the transition model used for generation.
	///
	/// Counts and merges every source, removes dead ends, then converts
	/// counts to probabilities.
	pub fn into_model(self) -> Result<TransitionModel> {
		let mut counts = self.count_bigrams()?;
		info!(
			"Counted {} bigrams over {} words from {} sources",
			counts.edge_count(),
			counts.len(),
			self.texts.len()
		);
		counts.remove_broken_chains();
		info!("{} bigrams over {} words left after pruning", counts.edge_count(), counts.len());
		Ok(counts.convert_to_probabilities())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const FIRST: &str = " Andrei Andreevich Markov was a Russian mathematician. Markov was born in Ryazan.";
	const SECOND: &str = " Ryazan is a city in Russia. Markov was a student of Chebyshev.";

	#[test]
	fn test_empty_corpus() {
		let corpus = Corpus::new();
		assert!(corpus.is_empty());
		assert!(corpus.count_bigrams().unwrap().is_empty());
		assert!(corpus.into_model().unwrap().is_empty());
	}

	#[test]
	fn test_count_matches_sequential_merge() {
		let mut corpus = Corpus::new();
		let mut expected: BigramCounts = BigramGraph::new();
		for i in 0..50 {
			let text = if i % 2 == 0 { FIRST } else { SECOND };
			corpus.add_text(text);
			expected.merge(&BigramGraph::from_text(text));
		}
		let counts = corpus.count_bigrams().unwrap();
		assert_eq!(counts, expected);
		assert_eq!(counts.words().collect::<Vec<_>>(), expected.words().collect::<Vec<_>>());
		assert_eq!(counts.get("Markov").and_then(|t| t.get("was")), Some(&75));
	}

	#[test]
	fn test_sources_do_not_join() {
		let mut corpus = Corpus::new();
		corpus.add_text("Markov chain");
		corpus.add_text("Random field");
		let counts = corpus.count_bigrams().unwrap();
		assert!(counts.get("chain").is_none());
		assert_eq!(counts.len(), 2);
	}

	#[test]
	fn test_into_model() {
		let mut corpus = Corpus::new();
		corpus.add_text(FIRST);
		corpus.add_text(SECOND);
		let model = corpus.into_model().unwrap();

		assert!(!model.is_empty());
		for (previous_word, transitions) in model.iter() {
			let sum: f64 = transitions.iter().map(|(_, p)| *p).sum();
			assert!((sum - 1.0).abs() < 0.0001, "{previous_word} sums to {sum}");
			for current_word in transitions.words() {
				assert!(model.contains(current_word));
			}
		}
		// Chebyshev. ends the corpus, so it is a dead end
		assert!(!model.get("of").is_some_and(|t| t.contains("Chebyshev.")));
	}
}
