//! Tabular inputs and corpus plumbing.

pub mod corpus;
pub mod metadata;
pub mod templates;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use walkdir::WalkDir;

/// Expand a mix of files and directories into an ordered file list.
///
/// Directories are walked recursively and contribute their `.txt` files in
/// path order, so repeated runs see the same file indices.
pub fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
                .collect();
            found.sort();
            files.extend(found);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            bail!("input {} does not exist", input.display());
        }
    }
    Ok(files)
}

/// Derive a document identifier from a source-path fragment.
///
/// Input lines carry fragments like `cord19/0a1f3b.txt`; the file stem is the
/// identifier used to join against the metadata table.
pub fn doc_id_from_fragment(fragment: &str) -> Option<String> {
    let stem = Path::new(fragment.trim()).file_stem()?;
    let stem = stem.to_string_lossy();
    if stem.is_empty() {
        None
    } else {
        Some(stem.into_owned())
    }
}
