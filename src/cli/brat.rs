//! CLI entry-point for brat corpus export.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, data::corpus};

/// Args for the `brat` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CORD-19 CSV dump with paper_id, title, abstract and text columns.
    #[arg(long)]
    pub inp: PathBuf,
    /// Directory receiving one .txt per paper.
    #[arg(long)]
    pub out_dir: PathBuf,
}

#[instrument(skip(_settings))]
pub async fn run(args: Args, _settings: Settings) -> Result<()> {
    corpus::export_brat(&args.inp, &args.out_dir)?;
    Ok(())
}
