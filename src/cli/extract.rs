//! CLI entry-point for template-driven extraction.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{cli::IndexOrder, config::Settings, data, extract};

/// Args for the `extract` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Template CSV driving the extraction.
    #[arg(long)]
    pub template_file: PathBuf,
    /// Sentence-per-line text files, or directories of them.
    #[arg(long, num_args = 1.., required = true)]
    pub text_files: Vec<PathBuf>,
    /// OIE triple files, line-aligned 1:1 with the text files.
    #[arg(long, num_args = 0..)]
    pub oie_files: Vec<PathBuf>,
    /// Report output directory (defaults to <outputs>/report).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// Positional task subset, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub tasks: Option<Vec<usize>>,
    /// CORD-19 metadata CSV for citation rendering.
    #[arg(long)]
    pub metadata: Option<PathBuf>,
    /// Index-page ordering.
    #[arg(long, value_enum, default_value = "template")]
    pub order: IndexOrder,
    /// Anchor patterns without [X] to a nearby pathogen mention.
    #[arg(long)]
    pub anchor_virus: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let job = extract::ExtractJob {
        template_file: args.template_file,
        text_files: data::collect_input_files(&args.text_files)?,
        oie_files: data::collect_input_files(&args.oie_files)?,
        tasks: args.tasks,
        metadata: args.metadata,
        out_dir: args
            .out_dir
            .unwrap_or_else(|| settings.join_output("report")),
        order: args.order,
        anchor_virus: args.anchor_virus,
    };
    extract::run(&job)
}
