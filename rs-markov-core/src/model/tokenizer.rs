/// Punctuation allowed inside a word.
const IN_WORD_PUNCTUATION: [char; 3] = ['\'', '.', '-'];

/// Returns `true` if `c` may be part of a word candidate.
fn is_word_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || IN_WORD_PUNCTUATION.contains(&c)
}

/// Cleans a raw word candidate.
///
/// - Strips every leading and trailing apostrophe, hyphen and period
/// - Re-appends a single period if the candidate ended with one
///
/// Internal punctuation is kept, so abbreviations like `U.S.` survive as
/// `U.S.` and `'-..-'ma.rk-ov's'..-` becomes `ma.rk-ov's`.
/// A candidate made only of punctuation cleans to the empty string.
pub fn clean_word(candidate: &str) -> String {
	let ends_with_fullstop = candidate.ends_with('.');
	let mut word = candidate.trim_matches(&IN_WORD_PUNCTUATION[..]).to_owned();
	if ends_with_fullstop && !word.is_empty() {
		word.push('.');
	}
	word
}

/// Iterator over the normalized words of a text.
///
/// Created by [`tokenize`]. Words are produced lazily and the iterator
/// is consumed once.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
	text: &'a str,
	position: usize,
}

impl<'a> Iterator for Tokens<'a> {
	type Item = String;

	fn next(&mut self) -> Option<Self::Item> {
		while self.position < self.text.len() {
			let rest = &self.text[self.position..];
			let candidate_len = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
			let candidate = &rest[..candidate_len];
			self.position += candidate_len;

			// Skip the separator
			if let Some(separator) = self.text[self.position..].chars().next() {
				self.position += separator.len_utf8();
			}

			let word = clean_word(candidate);
			if !word.is_empty() {
				return Some(word);
			}
		}
		None
	}
}

/// Splits `text` into normalized words.
///
/// A word is a run of ASCII alphanumerics, apostrophes, periods and hyphens,
/// cleaned with [`clean_word`]. Any other character ends the current word.
/// The last word is emitted even when the text does not end with a separator.
pub fn tokenize(text: &str) -> Tokens<'_> {
	Tokens { text, position: 0 }
}
