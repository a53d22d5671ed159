//! CLI entry-point for OpenIE annotation and triple post-processing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    cli::OpenIeTask,
    config::Settings,
    nlp::openie::{self, CoreNlpClient},
};

/// Args for the `openie` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// What to do with the input file.
    #[arg(long, value_enum, default_value = "run")]
    pub task: OpenIeTask,
    /// Input file (sentences for `run`, triple lines otherwise).
    #[arg(long)]
    pub inp: Option<PathBuf>,
    /// Output file.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Drop triples with identical spans during annotation.
    #[arg(long)]
    pub remove_dup: bool,
    /// Download the CoreNLP distribution instead of processing input.
    #[arg(long)]
    pub install: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    if args.install {
        let path = openie::install_distribution(&settings).await?;
        info!(path = %path.display(), "CoreNLP distribution ready");
        return Ok(());
    }

    let inp = args.inp.context("--inp is required")?;
    let out = args.out.context("--out is required")?;
    match args.task {
        OpenIeTask::Run => {
            let client = CoreNlpClient::new(&settings)?;
            openie::annotate_file(&client, &inp, &out, args.remove_dup).await
        }
        OpenIeTask::Filter => openie::filter_file(&inp, &out),
        OpenIeTask::Analyze => openie::analyze_file(&inp, &out),
    }
}
