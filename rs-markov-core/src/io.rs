use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Reads a text file and returns its non-blank lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Skips lines made only of whitespace
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(str::to_owned)
		.collect())
}

/// Builds the path of a cache entry inside a directory.
///
/// Example:
/// `data/` + `"markov_chain"` + `"bin"` → `data/markov_chain.bin`
pub(crate) fn build_entry_path<P: AsRef<Path>>(dir: P, key: &str, extension: &str) -> io::Result<PathBuf> {
	if key.is_empty() || key.contains(|c| c == '/' || c == '\\') {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("Invalid cache key: {key:?}")));
	}

	let mut output = PathBuf::from(dir.as_ref());
	output.push(key);
	output.set_extension(extension);

	Ok(output)
}

/// Lists all files with a given extension in a directory.
///
/// Returns full paths. A missing directory yields an empty list.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
	let dir = dir.as_ref();
	if !dir.is_dir() {
		return Ok(Vec::new());
	}

	let mut files = Vec::new();
	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			files.push(path);
		}
	}

	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn read_lines_skips_blank_lines() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("phrases.txt");
		fs::write(&path, "first line\n\n   \r\nsecond line\r\n").unwrap();

		assert_eq!(read_lines(&path).unwrap(), vec!["first line", "second line"]);
	}

	#[test]
	fn build_entry_path_rejects_path_like_keys() {
		assert_eq!(
			build_entry_path("data", "markov_chain", "bin").unwrap(),
			PathBuf::from("data/markov_chain.bin")
		);
		assert!(build_entry_path("data", "../escape", "bin").is_err());
		assert!(build_entry_path("data", "", "bin").is_err());
	}

	#[test]
	fn list_files_filters_by_extension() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("a.bin"), b"").unwrap();
		fs::write(dir.path().join("b.txt"), b"").unwrap();

		let files = list_files(dir.path(), "bin").unwrap();
		assert_eq!(files, vec![dir.path().join("a.bin")]);
		assert!(list_files(dir.path().join("missing"), "bin").unwrap().is_empty());
	}
}
