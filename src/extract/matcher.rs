//! Line scanning and match aggregation for compiled task patterns.

use std::{
    borrow::Cow,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::info;

use crate::data::{
    doc_id_from_fragment,
    templates::{MatchMode, Task},
};

use super::pattern::CompiledPattern;

/// Raised when a yonly pattern captures anything other than exactly one
/// wildcard value for a matched line.
#[derive(Debug, Error)]
#[error("ambiguous capture in task {task}: {captured} wildcard groups matched line {line:?}")]
pub struct AmbiguousCapture {
    pub task: String,
    pub captured: usize,
    pub line: String,
}

/// Where a recorded line came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub file_idx: usize,
    pub line_idx: usize,
    pub doc_id: Option<String>,
}

/// Distinct recorded lines for one canonical key.
pub type LineSet = IndexMap<String, Provenance>;

/// Per-task mapping from canonical key to the distinct lines that produced it.
///
/// Insertion order is preserved so ranking ties break deterministically, and
/// re-recording an identical line under the same key is idempotent.
#[derive(Debug, Default)]
pub struct MatchTable {
    groups: IndexMap<String, LineSet>,
}

impl MatchTable {
    pub fn record(&mut self, key: String, line: String, provenance: Provenance) {
        self.groups.entry(key).or_default().insert(line, provenance);
    }

    /// Number of distinct keys. This is the result count reported per task.
    pub fn key_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&LineSet> {
        self.groups.get(key)
    }

    /// Keys with their line sets, ranked by descending distinct line count.
    /// The sort is stable, so equal counts keep insertion order.
    pub fn ranked(&self) -> Vec<(&String, &LineSet)> {
        let mut entries: Vec<_> = self.groups.iter().collect();
        entries.sort_by_key(|(_, lines)| std::cmp::Reverse(lines.len()));
        entries
    }
}

/// Derive the canonical key for a text line, or `None` when it does not match.
pub fn derive_text_key(
    pattern: &CompiledPattern,
    task_id: &str,
    line: &str,
) -> Result<Option<String>, AmbiguousCapture> {
    let Some(caps) = pattern.regex.captures(line) else {
        return Ok(None);
    };
    let key = match pattern.mode {
        MatchMode::Yonly => {
            let captured: Vec<&str> = pattern
                .wildcard_groups
                .iter()
                .filter_map(|name| caps.name(name))
                .map(|m| m.as_str())
                .collect();
            if captured.len() != 1 {
                return Err(AmbiguousCapture {
                    task: task_id.to_string(),
                    captured: captured.len(),
                    line: line.to_string(),
                });
            }
            captured[0].to_string()
        }
        MatchMode::First => caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
    };
    Ok(Some(key))
}

static OIE_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[0-9]+,[0-9]+").expect("valid span regex"));

/// Remove `#start,end` character-offset annotations from an OIE line.
pub fn strip_spans(line: &str) -> Cow<'_, str> {
    OIE_SPAN_RE.replace_all(line, "")
}

/// Pick the best matching extraction from one OIE line's candidates.
///
/// Shorter extractions are assumed to be more precise, so only the shortest
/// matching one is kept; a strict comparison makes the first shortest win
/// ties. The returned key has the field separator rewritten for display.
pub fn best_extraction<'a, I>(regex: &Regex, extractions: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<String> = None;
    for extraction in extractions {
        if regex.is_match(extraction) {
            let key = extraction.trim().replace("|||", " ");
            if best.as_ref().is_none_or(|b| b.len() > key.len()) {
                best = Some(key);
            }
        }
    }
    best
}

/// Split an optional leading tab-delimited path fragment off a text line.
pub fn split_text_line(raw: &str) -> (Option<String>, &str) {
    match raw.split_once('\t') {
        Some((fragment, rest)) if !fragment.contains("|||") => {
            (doc_id_from_fragment(fragment), rest)
        }
        _ => (None, raw),
    }
}

/// One template row paired with its compiled patterns.
pub struct CompiledTask {
    pub task: Task,
    pub text: Option<CompiledPattern>,
    pub oie: Option<CompiledPattern>,
}

/// Aggregated matches for one task, text and OIE sides kept separate.
#[derive(Default)]
pub struct TaskResults {
    pub text: MatchTable,
    pub oie: MatchTable,
}

impl TaskResults {
    /// Total result count: distinct keys, not recorded lines.
    pub fn total_keys(&self) -> usize {
        self.text.key_count() + self.oie.key_count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.oie.is_empty()
    }
}

/// Scan every text file line against every compiled text pattern.
pub fn scan_text_files(
    files: &[impl AsRef<Path>],
    tasks: &[CompiledTask],
    results: &mut [TaskResults],
) -> Result<()> {
    for (file_idx, path) in files.iter().enumerate() {
        let path = path.as_ref();
        info!(file = %path.display(), "scanning text file");
        let reader = BufReader::new(
            File::open(path).with_context(|| format!("open text file {}", path.display()))?,
        );
        for (line_idx, line) in reader.lines().enumerate() {
            let raw = line.with_context(|| format!("read {}:{line_idx}", path.display()))?;
            let (doc_id, text) = split_text_line(&raw);
            for (task, result) in tasks.iter().zip(results.iter_mut()) {
                let Some(pattern) = task.text.as_ref() else {
                    continue;
                };
                if let Some(key) = derive_text_key(pattern, &task.task.id, text)? {
                    result.text.record(
                        key,
                        text.to_string(),
                        Provenance {
                            file_idx,
                            line_idx,
                            doc_id: doc_id.clone(),
                        },
                    );
                }
            }
        }
    }
    Ok(())
}

/// Scan OIE files, line-aligned with their text files, against OIE patterns.
///
/// The aligned raw-text line is the display text of record; the matched
/// extraction only serves as the key.
pub fn scan_oie_files(
    oie_files: &[impl AsRef<Path>],
    text_files: &[impl AsRef<Path>],
    tasks: &[CompiledTask],
    results: &mut [TaskResults],
) -> Result<()> {
    for (file_idx, (oie_path, text_path)) in oie_files.iter().zip(text_files.iter()).enumerate() {
        let (oie_path, text_path) = (oie_path.as_ref(), text_path.as_ref());
        info!(file = %oie_path.display(), "scanning OIE file");
        let oie_reader = BufReader::new(
            File::open(oie_path).with_context(|| format!("open OIE file {}", oie_path.display()))?,
        );
        let text_reader = BufReader::new(
            File::open(text_path)
                .with_context(|| format!("open text file {}", text_path.display()))?,
        );
        for (line_idx, (oie_line, text_line)) in
            oie_reader.lines().zip(text_reader.lines()).enumerate()
        {
            let oie_line = oie_line.with_context(|| format!("read {}:{line_idx}", oie_path.display()))?;
            let text_line =
                text_line.with_context(|| format!("read {}:{line_idx}", text_path.display()))?;

            let cleaned = strip_spans(&oie_line);
            let mut fields = cleaned.split('\t').peekable();
            let mut doc_id = fields
                .peek()
                .filter(|first| !first.contains("|||"))
                .and_then(|first| doc_id_from_fragment(first));
            if doc_id.is_some() {
                fields.next();
            }
            let extractions: Vec<&str> = fields.filter(|f| !f.trim().is_empty()).collect();

            let (text_doc_id, display) = split_text_line(&text_line);
            if doc_id.is_none() {
                doc_id = text_doc_id;
            }

            for (task, result) in tasks.iter().zip(results.iter_mut()) {
                let Some(pattern) = task.oie.as_ref() else {
                    continue;
                };
                if let Some(key) = best_extraction(&pattern.regex, extractions.iter().copied()) {
                    result.oie.record(
                        key,
                        display.to_string(),
                        Provenance {
                            file_idx,
                            line_idx,
                            doc_id: doc_id.clone(),
                        },
                    );
                }
            }
        }
    }
    Ok(())
}
