//! Bibliographic metadata lookup for citation rendering.
//!
//! The CORD-19 `metadata.csv` keys full-text documents by sha; one row can
//! list several shas separated by semicolons when a paper ships multiple
//! files.

use std::{collections::HashMap, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// Bibliographic fields rendered beneath a matched line.
#[derive(Debug, Clone)]
pub struct Citation {
    pub title: String,
    pub doi: Option<String>,
    pub venue: Option<String>,
    pub published: Option<String>,
}

/// Document-id to citation mapping, passed explicitly to the reporter.
#[derive(Debug, Default)]
pub struct MetadataMap {
    entries: HashMap<String, Citation>,
}

#[derive(Debug, Deserialize)]
struct MetadataRow {
    #[serde(default)]
    sha: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    doi: String,
    #[serde(default)]
    journal: String,
    #[serde(default)]
    publish_time: String,
}

impl MetadataMap {
    /// Load the metadata table from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("open metadata file {}", path.display()))?;

        let mut entries = HashMap::new();
        for row in reader.deserialize::<MetadataRow>() {
            let row = row.context("read metadata row")?;
            if row.sha.trim().is_empty() {
                continue;
            }
            let citation = Citation {
                title: row.title,
                doi: none_if_empty(&row.doi),
                venue: none_if_empty(&row.journal),
                published: none_if_empty(&row.publish_time),
            };
            for sha in row.sha.split(';') {
                let sha = sha.trim();
                if !sha.is_empty() {
                    entries.insert(sha.to_string(), citation.clone());
                }
            }
        }

        info!(path = %path.display(), entries = entries.len(), "loaded metadata");
        Ok(Self { entries })
    }

    pub fn get(&self, doc_id: &str) -> Option<&Citation> {
        self.entries.get(doc_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn none_if_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
