//! Corpus export into brat-style annotation files.

use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct PaperRow {
    paper_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    abstract_text: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// Write one marker-delimited `.txt` per paper for brat annotation.
///
/// Empty sections are skipped, matching the sparse rows of the CORD-19 dump.
pub fn export_brat(input: &Path, out_dir: &Path) -> Result<usize> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir {}", out_dir.display()))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(input)
        .with_context(|| format!("open corpus file {}", input.display()))?;

    // The dump names the abstract column "abstract", a Rust keyword.
    let headers = reader.headers()?.clone();
    let headers: csv::StringRecord = headers
        .iter()
        .map(|h| if h == "abstract" { "abstract_text" } else { h })
        .collect();
    reader.set_headers(headers);

    let mut written = 0usize;
    for row in reader.deserialize::<PaperRow>() {
        let row = row.context("read corpus row")?;
        let path = out_dir.join(format!("{}.txt", row.paper_id));
        let mut file =
            fs::File::create(&path).with_context(|| format!("create {}", path.display()))?;
        write_section(&mut file, "TITLE", row.title.as_deref())?;
        write_section(&mut file, "ABSTRACT", row.abstract_text.as_deref())?;
        write_section(&mut file, "TEXT", row.text.as_deref())?;
        written += 1;
    }

    info!(out = %out_dir.display(), documents = written, "exported brat corpus");
    Ok(written)
}

fn write_section(file: &mut fs::File, name: &str, body: Option<&str>) -> Result<()> {
    if let Some(body) = body.filter(|b| !b.trim().is_empty()) {
        write!(file, "[[ {name}_START ]]{body}[[ {name}_END ]]\n\n")?;
    }
    Ok(())
}
