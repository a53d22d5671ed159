//! CLI entry-point for per-template sentence retrieval.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{config::Settings, data::templates, search::elastic::EsClient};

/// Args for the `retrieve` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Template CSV; its query column drives retrieval.
    #[arg(long)]
    pub template_file: PathBuf,
    /// Output file of retrieved sentences.
    #[arg(long)]
    pub out: PathBuf,
    /// Hits fetched per query.
    #[arg(long, default_value_t = 1)]
    pub topk: usize,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let queries = templates::load_queries(&args.template_file)?;
    let client = EsClient::new(&settings)?;

    let mut writer = BufWriter::new(
        File::create(&args.out).with_context(|| format!("create {}", args.out.display()))?,
    );
    for query in &queries {
        let hits = client
            .search(query, "sentence", args.topk)
            .await
            .with_context(|| format!("retrieve for query {query:?}"))?;
        writeln!(writer, "** {query}")?;
        for hit in hits {
            writeln!(
                writer,
                "{}\t{}\t{}",
                hit.doc.file, hit.doc.line_id, hit.doc.sentence
            )?;
        }
    }
    writer.flush()?;
    info!(queries = queries.len(), out = %args.out.display(), "retrieval finished");
    Ok(())
}
