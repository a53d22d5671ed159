//! Command-line interface wiring for cord-miner.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Settings;

pub mod brat;
pub mod extract;
pub mod index;
pub mod openie;
pub mod retrieve;
pub mod segment;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "COVID-19 literature mining toolkit", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Segment(args) => segment::run(args, settings).await,
            Commands::Openie(args) => openie::run(args, settings).await,
            Commands::Index(args) => index::run(args, settings).await,
            Commands::Retrieve(args) => retrieve::run(args, settings).await,
            Commands::Extract(args) => extract::run(args, settings).await,
            Commands::Brat(args) => brat::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split raw document lines into one sentence per line.
    Segment(segment::Args),
    /// Annotate sentences with OpenIE triples via CoreNLP.
    Openie(openie::Args),
    /// Index segmented sentences into Elasticsearch.
    Index(index::Args),
    /// Retrieve top sentences per template query.
    Retrieve(retrieve::Args),
    /// Run template-driven extraction and build the HTML report.
    Extract(extract::Args),
    /// Export a CORD-19 CSV dump into brat annotation files.
    Brat(brat::Args),
    /// Serve a generated report directory over HTTP.
    Serve(serve::Args),
}

/// Ordering of the report index page. Historical report revisions disagreed
/// on this, so it stays a caller choice.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum IndexOrder {
    /// Template-table order.
    Template,
    /// Descending total result count.
    Results,
}

/// Post-processing task for the `openie` command.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OpenIeTask {
    /// Annotate input lines with the CoreNLP server.
    Run,
    /// Keep only the most compact triple per line.
    Filter,
    /// Write relation frequency counts.
    Analyze,
}
