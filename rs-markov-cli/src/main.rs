use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use env_logger::Env;
use log::info;

mod fetch;
mod synthesizer;

use rs_markov_core::io::read_file;
use rs_markov_core::model::generation_config::{DEFAULT_MAX_WORDS, GenerationConfig};

use crate::fetch::{FetchedPage, Fetcher, RANDOM_PAGE};
use crate::synthesizer::{
	DEFAULT_LLM_ENDPOINT, DEFAULT_LLM_MODEL, MarkovSynthesizer, SummarySynthesizer, Synthesizer,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
	name = "rs-markov",
	about = "Generates random text from the word statistics of web pages",
	disable_help_flag = true
)]
struct Args {
	/// Pages to learn from. Defaults to two random Wikipedia articles.
	urls: Vec<String>,

	/// Local text file to learn from, in addition to the pages (repeatable).
	#[arg(short, long = "file")]
	files: Vec<PathBuf>,

	/// Summarize the fetched text with a language model instead.
	#[arg(long)]
	llm: bool,

	/// OpenAI-compatible completion endpoint used by --llm.
	#[arg(long, env = "RS_MARKOV_LLM_ENDPOINT", default_value = DEFAULT_LLM_ENDPOINT)]
	llm_endpoint: String,

	/// Model name sent to the completion endpoint.
	#[arg(long, default_value = DEFAULT_LLM_MODEL)]
	llm_model: String,

	/// Seed for reproducible output.
	#[arg(short, long)]
	seed: Option<u64>,

	/// Number of random walk steps.
	#[arg(short, long, default_value_t = DEFAULT_MAX_WORDS)]
	max_words: usize,

	/// HTTP timeout in seconds.
	#[arg(long, default_value_t = 30)]
	timeout: u64,

	/// Print usage.
	#[arg(short, long, action = ArgAction::SetTrue)]
	help: bool,
}

impl Args {
	/// Pages to fetch: the given URLs, or two random pages when no source is given.
	fn pages(&self) -> Vec<String> {
		if self.urls.is_empty() && self.files.is_empty() {
			vec![RANDOM_PAGE.to_owned(), RANDOM_PAGE.to_owned()]
		} else {
			self.urls.clone()
		}
	}

	fn synthesizer(&self) -> Result<Box<dyn Synthesizer>> {
		if self.llm {
			let timeout = Duration::from_secs(self.timeout);
			return Ok(Box::new(SummarySynthesizer::new(&self.llm_endpoint, &self.llm_model, timeout)?));
		}

		let mut config = GenerationConfig::new();
		config.set_max_words(self.max_words)?;
		config.seed = self.seed;
		Ok(Box::new(MarkovSynthesizer::new(config)))
	}
}

fn run(args: &Args) -> Result<()> {
	let synthesizer = args.synthesizer()?;
	let fetcher = Fetcher::new(Duration::from_secs(args.timeout))?;

	let mut sources: Vec<FetchedPage> = Vec::new();
	for url in args.pages() {
		let page = fetcher.fetch_text(&url)?;
		println!("FETCHED TEXT FROM: {}\n", page.url);
		sources.push(page);
	}
	for path in &args.files {
		let text = read_file(path).with_context(|| format!("Failed to read {}", path.display()))?;
		info!("Read {} bytes from {}", text.len(), path.display());
		sources.push(FetchedPage { text, url: path.display().to_string() });
	}

	println!("{}", synthesizer.synthesize(&sources)?);
	Ok(())
}

/// Returns `true` if `-h` or `--help` appears before a `--` separator.
fn requests_help<I, S>(raw_args: I) -> bool
where
	I: IntoIterator<Item = S>,
	S: AsRef<OsStr>,
{
	raw_args
		.into_iter()
		.map(|arg| arg.as_ref().to_owned())
		.take_while(|arg| arg != "--")
		.any(|arg| arg == "-h" || arg == "--help")
}

fn print_usage() -> ExitCode {
	if let Err(e) = Args::command().print_help() {
		eprintln!("Error: {e}");
	}
	ExitCode::FAILURE
}

/// Main entry point.
///
/// Fetches every source, then prints the text produced by the selected
/// synthesizer. `-h`/`--help` prints usage and exits with status 1, even
/// when other arguments are invalid.
fn main() -> ExitCode {
	env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

	let args = match Args::try_parse() {
		Ok(args) if !args.help => args,
		Ok(_) => return print_usage(),
		Err(_) if requests_help(env::args_os().skip(1)) => return print_usage(),
		Err(e) => e.exit(),
	};

	match run(&args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("Error: {e:#}");
			ExitCode::FAILURE
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_command() {
		Args::command().debug_assert();
	}

	#[test]
	fn test_defaults_to_random_pages() {
		let args = Args::try_parse_from(["rs-markov"]).unwrap();
		assert_eq!(args.pages(), vec![RANDOM_PAGE, RANDOM_PAGE]);
		assert!(!args.llm);
		assert!(!args.help);
		assert_eq!(args.max_words, 10_000);
		assert_eq!(args.seed, None);
	}

	#[test]
	fn test_urls() {
		let args = Args::try_parse_from(["rs-markov", "https://a.example", "https://b.example"]).unwrap();
		assert_eq!(args.pages(), vec!["https://a.example", "https://b.example"]);
	}

	#[test]
	fn test_files_only() {
		let args = Args::try_parse_from(["rs-markov", "--file", "markov.txt"]).unwrap();
		assert!(args.pages().is_empty());
		assert_eq!(args.files, vec![PathBuf::from("markov.txt")]);
	}

	#[test]
	fn test_llm_and_help_flags() {
		let args = Args::try_parse_from(["rs-markov", "--llm", "https://a.example"]).unwrap();
		assert!(args.llm);
		assert_eq!(args.pages(), vec!["https://a.example"]);

		let args = Args::try_parse_from(["rs-markov", "--help"]).unwrap();
		assert!(args.help);
	}

	#[test]
	fn test_help_with_invalid_arguments() {
		let raw_args = ["rs-markov", "--help", "--max-words", "abc"];
		assert!(Args::try_parse_from(raw_args).is_err());
		assert!(requests_help(&raw_args[1..]));
		assert!(requests_help(["--max-words", "abc", "-h"]));
	}

	#[test]
	fn test_requests_help() {
		assert!(!requests_help(["--max-words", "5", "https://a.example"]));
		assert!(!requests_help(["--", "--help"]));
		assert!(!requests_help(Vec::<String>::new()));
	}

	#[test]
	fn test_file_sources_use_library_reader() {
		let path = std::env::temp_dir().join(format!("rs-markov-cli-{}.txt", std::process::id()));
		std::fs::write(&path, "Markov chains are random. Chains are chains of states.").unwrap();
		let file = path.to_str().unwrap();
		let args = Args::try_parse_from(["rs-markov", "--file", file]).unwrap();
		let text = read_file(&args.files[0]);
		std::fs::remove_file(&path).unwrap();
		assert_eq!(text.unwrap(), "Markov chains are random. Chains are chains of states.");
		assert!(read_file("/nonexistent/rs-markov/corpus.txt").is_err());
	}

	#[test]
	fn test_invalid_max_words() {
		let args = Args::try_parse_from(["rs-markov", "--max-words", "0"]).unwrap();
		assert!(args.synthesizer().is_err());
	}
}
