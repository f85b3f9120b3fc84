use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::info;
use regex::Regex;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use rs_markov_core::model::corpus::Corpus;
use rs_markov_core::model::generation_config::GenerationConfig;
use rs_markov_core::model::generator::Generator;

use crate::fetch::FetchedPage;

/// Completion endpoint used when none is configured (llama.cpp server default).
pub const DEFAULT_LLM_ENDPOINT: &str = "http://127.0.0.1:8080/v1/completions";

/// Model requested from the completion endpoint by default.
pub const DEFAULT_LLM_MODEL: &str = "microsoft/phi-2";

const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.5;

/// Turns the text of fetched pages into output text.
pub trait Synthesizer {
	fn synthesize(&self, pages: &[FetchedPage]) -> Result<String>;
}

/// Generates text from the bigram statistics of the pages.
pub struct MarkovSynthesizer {
	config: GenerationConfig,
}

impl MarkovSynthesizer {
	pub fn new(config: GenerationConfig) -> Self {
		Self { config }
	}
}

impl Synthesizer for MarkovSynthesizer {
	fn synthesize(&self, pages: &[FetchedPage]) -> Result<String> {
		let mut corpus = Corpus::new();
		for page in pages {
			corpus.add_text(page.text.as_str());
		}
		let model = corpus.into_model()?;
		let text = Generator::new(&model, self.config.clone()).generate()?;
		Ok(text)
	}
}

/// Reduces scraped text to letters, periods and single spaces.
///
/// Newlines are dropped (joining the lines), every other character that is
/// not an ASCII letter, a period or whitespace is removed, whitespace runs
/// collapse to one space and spaces before periods are removed.
pub struct PromptCleaner {
	disallowed: Regex,
	whitespace: Regex,
	space_before_period: Regex,
}

impl PromptCleaner {
	pub fn new() -> Result<Self, regex::Error> {
		Ok(Self {
			disallowed: Regex::new(r"[^a-zA-Z.\s]")?,
			whitespace: Regex::new(r"\s+")?,
			space_before_period: Regex::new(r" \.")?,
		})
	}

	pub fn clean(&self, text: &str) -> String {
		let text = text.replace('\n', "");
		let text = self.disallowed.replace_all(&text, "");
		let text = self.whitespace.replace_all(&text, " ");
		self.space_before_period.replace_all(&text, ".").into_owned()
	}

	/// Builds the summarization prompt for the concatenated page texts.
	pub fn prompt(&self, pages: &[FetchedPage]) -> String {
		let all_text: String = pages.iter().map(|page| page.text.as_str()).collect();
		format!("Summarize the following. {}.", self.clean(&all_text))
	}
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
	model: &'a str,
	prompt: &'a str,
	max_tokens: u32,
	temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
	choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
	text: String,
}

/// Asks an OpenAI-compatible completion endpoint to summarize the pages.
pub struct SummarySynthesizer {
	client: Client,
	endpoint: String,
	model: String,
	cleaner: PromptCleaner,
}

impl SummarySynthesizer {
	pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Result<Self> {
		let client = Client::builder()
			.timeout(timeout)
			.build()
			.context("Failed to build the HTTP client")?;
		Ok(Self {
			client,
			endpoint: endpoint.to_owned(),
			model: model.to_owned(),
			cleaner: PromptCleaner::new()?,
		})
	}
}

impl Synthesizer for SummarySynthesizer {
	fn synthesize(&self, pages: &[FetchedPage]) -> Result<String> {
		let prompt = self.cleaner.prompt(pages);
		info!("Sending a {} character prompt to {}", prompt.len(), self.endpoint);

		let request = CompletionRequest {
			model: &self.model,
			prompt: &prompt,
			max_tokens: MAX_TOKENS,
			temperature: TEMPERATURE,
		};
		let response: CompletionResponse = self
			.client
			.post(&self.endpoint)
			.json(&request)
			.send()
			.and_then(|response| response.error_for_status())
			.with_context(|| format!("Completion request to {} failed", self.endpoint))?
			.json()
			.context("Invalid completion response")?;

		match response.choices.into_iter().next() {
			Some(choice) => Ok(choice.text),
			None => bail!("Completion response from {} has no choices", self.endpoint),
		}
	}
}
