use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Reads a whole text file into memory.
///
/// # Errors
/// Returns [`crate::MarkovError::Io`] if the file cannot be opened or is not valid UTF-8.
pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}
