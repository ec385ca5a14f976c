use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Builds the snapshot path of a source for a given key length.
///
/// Example:
/// `data` + `"alice"` + `2` → `data/alice.k2.bin`
pub(crate) fn snapshot_path<P: AsRef<Path>>(dir: P, source: &str, key_length: usize) -> PathBuf {
	dir.as_ref().join(format!("{source}.k{key_length}.bin"))
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `data/alice.txt` → `alice`
/// - `alice` → `alice`
pub(crate) fn get_filename<P: AsRef<Path>>(path: P) -> io::Result<String> {
	path.as_ref()
		.file_stem()
		.map(|s| s.to_string_lossy().to_string())
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))
}

/// Normalizes a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder(input: &Path) -> PathBuf {
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths).
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	Ok(files)
}

/// Creates the parent directory of `path` if it is missing.
pub(crate) fn ensure_parent<P: AsRef<Path>>(path: P) -> io::Result<()> {
	match path.as_ref().parent() {
		Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
		_ => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn snapshot_path_encodes_key_length() {
		assert_eq!(snapshot_path("data", "alice", 3), PathBuf::from("data/alice.k3.bin"));
	}

	#[test]
	fn filename_drops_extension() {
		assert_eq!(get_filename("data/alice.txt").unwrap(), "alice");
		assert_eq!(get_filename("bob").unwrap(), "bob");
	}

	#[test]
	fn list_files_filters_by_extension() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("a.txt"), "x").unwrap();
		fs::write(dir.path().join("b.bin"), "x").unwrap();
		let files = list_files(dir.path(), "txt").unwrap();
		assert_eq!(files, vec!["a.txt".to_owned()]);
	}
}
