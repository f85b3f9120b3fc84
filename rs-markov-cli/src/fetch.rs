use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::blocking::Client;
use scraper::{Html, Node};

/// Page fetched when no source is given.
pub const RANDOM_PAGE: &str = "https://en.wikipedia.org/wiki/Special:Random";

/// Paragraph text of a fetched page.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchedPage {
	/// Text found inside `<p>` elements, each fragment prefixed with a space
	pub text: String,
	/// Final URL after redirects
	pub url: String,
}

/// Returns the text found inside `<p>` elements of an HTML document.
///
/// Text nodes are visited depth first in document order and each one with a
/// `<p>` ancestor is appended with a leading space, so words in adjacent
/// paragraphs never run together.
pub fn extract_paragraph_text(html: &str) -> String {
	let document = Html::parse_document(html);
	let mut text = String::new();
	for node in document.tree.root().descendants() {
		let Node::Text(fragment) = node.value() else {
			continue;
		};
		let in_paragraph = node
			.ancestors()
			.any(|ancestor| ancestor.value().as_element().is_some_and(|element| element.name() == "p"));
		if in_paragraph {
			text.push(' ');
			text.push_str(fragment);
		}
	}
	text
}

/// Blocking HTTP client used to retrieve source pages.
pub struct Fetcher {
	client: Client,
}

impl Fetcher {
	/// Creates a fetcher with a request timeout.
	pub fn new(timeout: Duration) -> Result<Self> {
		let client = Client::builder()
			.timeout(timeout)
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build()
			.context("Failed to build the HTTP client")?;
		Ok(Self { client })
	}

	/// Downloads `url` and extracts its paragraph text.
	pub fn fetch_text(&self, url: &str) -> Result<FetchedPage> {
		let response = self
			.client
			.get(url)
			.send()
			.and_then(|response| response.error_for_status())
			.with_context(|| format!("Failed to fetch {url}"))?;

		let final_url = response.url().to_string();
		let html = response.text().with_context(|| format!("Failed to read the body of {final_url}"))?;
		debug!("Fetched {} bytes from {final_url}", html.len());

		Ok(FetchedPage { text: extract_paragraph_text(&html), url: final_url })
	}
}
