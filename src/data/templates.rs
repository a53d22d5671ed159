//! Question-template table loading.

use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::info;

/// Positional columns of the template CSV, header row excluded.
const COL_ID: usize = 0;
const COL_QUERY: usize = 1;
const COL_TITLE: usize = 2;
const COL_OIE_PATTERNS: usize = 3;
const COL_TEXT_PATTERNS: usize = 4;
const COL_SUFFIX: usize = 5;
const COL_MODE: usize = 6;
const COLUMNS: usize = 7;

/// Raised when a template row lacks the required columns.
#[derive(Debug, Error)]
#[error("template row {row} is malformed: expected {expected} columns, found {found}")]
pub struct MalformedTemplate {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

/// How a compiled text pattern derives its canonical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Key is the first capture group (the matched alternative).
    First,
    /// Exactly one wildcard placeholder must capture; its text is the key.
    Yonly,
}

/// One row of the template table, immutable after load.
#[derive(Debug, Clone)]
pub struct Task {
    /// Identifier from the table's first column.
    pub id: String,
    /// Free-text query used by the retrieval helper.
    pub query: String,
    /// Human-readable question title.
    pub title: String,
    /// Multi-line OIE pattern source, may be empty.
    pub oie_source: String,
    /// Multi-line text pattern source, may be empty.
    pub text_source: String,
    /// Label rendered after each extracted key.
    pub suffix: String,
    pub mode: MatchMode,
}

impl Task {
    fn from_record(record: &csv::StringRecord, row: usize) -> Result<Self, MalformedTemplate> {
        if record.len() < COLUMNS {
            return Err(MalformedTemplate {
                row,
                expected: COLUMNS,
                found: record.len(),
            });
        }
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        let mode = match record.get(COL_MODE).unwrap_or_default().trim() {
            "yonly" => MatchMode::Yonly,
            _ => MatchMode::First,
        };
        Ok(Self {
            id: field(COL_ID),
            query: field(COL_QUERY),
            title: field(COL_TITLE),
            oie_source: field(COL_OIE_PATTERNS),
            text_source: field(COL_TEXT_PATTERNS),
            suffix: field(COL_SUFFIX),
            mode,
        })
    }
}

/// Load the template table, optionally restricted to a subset of row indices.
///
/// Subset indices are positions in the loaded table (header excluded) and are
/// honoured in the given order. An out-of-range index is fatal.
pub fn load_tasks(path: &Path, subset: Option<&[usize]>) -> Result<Vec<Task>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open template file {}", path.display()))?;

    let mut tasks = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read template row {row}"))?;
        tasks.push(Task::from_record(&record, row)?);
    }

    if let Some(indices) = subset {
        let mut selected = Vec::with_capacity(indices.len());
        for &idx in indices {
            let task = tasks.get(idx).cloned().with_context(|| {
                format!("task index {idx} out of range ({} tasks loaded)", tasks.len())
            })?;
            selected.push(task);
        }
        tasks = selected;
    }

    info!(path = %path.display(), count = tasks.len(), "loaded templates");
    Ok(tasks)
}

/// Read only the retrieval-query column, in template order.
pub fn load_queries(path: &Path) -> Result<Vec<String>> {
    let tasks = load_tasks(path, None)?;
    Ok(tasks.into_iter().map(|t| t.query).collect())
}
