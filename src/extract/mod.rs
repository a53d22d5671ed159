//! Template-driven extraction engine: load, compile, match, report.

pub mod matcher;
pub mod pattern;
pub mod report;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::{
    cli::IndexOrder,
    data::{metadata::MetadataMap, templates},
};

use matcher::{scan_oie_files, scan_text_files, CompiledTask, TaskResults};
use pattern::{compile_oie_pattern, compile_text_pattern, CompileOptions};

/// Everything one extraction run needs, resolved up front by the CLI.
#[derive(Debug)]
pub struct ExtractJob {
    pub template_file: PathBuf,
    pub text_files: Vec<PathBuf>,
    /// Line-aligned 1:1 with `text_files`; empty to skip the OIE pass.
    pub oie_files: Vec<PathBuf>,
    /// Positional task subset, in the given order.
    pub tasks: Option<Vec<usize>>,
    pub metadata: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub order: IndexOrder,
    pub anchor_virus: bool,
}

/// Run a full extraction: one text pass, one optional OIE pass, then the
/// HTML report. Everything is sequential; aggregation is written by the
/// matcher and only then read by the reporter.
pub fn run(job: &ExtractJob) -> Result<()> {
    if !job.oie_files.is_empty() && job.oie_files.len() != job.text_files.len() {
        bail!(
            "OIE file list ({}) must be line-aligned with the text file list ({})",
            job.oie_files.len(),
            job.text_files.len()
        );
    }

    let tasks = templates::load_tasks(&job.template_file, job.tasks.as_deref())?;
    let opts = CompileOptions {
        anchor_virus: job.anchor_virus,
    };
    let compiled = tasks
        .into_iter()
        .map(|task| {
            let text = compile_text_pattern(&task, opts)?;
            let oie = compile_oie_pattern(&task)?;
            Ok(CompiledTask { task, text, oie })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut results: Vec<TaskResults> = compiled.iter().map(|_| TaskResults::default()).collect();
    scan_text_files(&job.text_files, &compiled, &mut results)?;
    if !job.oie_files.is_empty() {
        scan_oie_files(&job.oie_files, &job.text_files, &compiled, &mut results)?;
    }

    let metadata = match job.metadata.as_deref() {
        Some(path) => Some(MetadataMap::load(path).context("load metadata table")?),
        None => None,
    };

    report::write_reports(
        &job.out_dir,
        &compiled,
        &results,
        metadata.as_ref(),
        job.order,
    )?;

    let total: usize = results.iter().map(TaskResults::total_keys).sum();
    info!(out = %job.out_dir.display(), tasks = compiled.len(), results = total, "extraction finished");
    Ok(())
}
