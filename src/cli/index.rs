//! CLI entry-point for sentence indexing.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data,
    search::elastic::{EsClient, SentenceDoc},
};

/// Args for the `index` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Sentence files, or directories of them.
    #[arg(long, num_args = 1.., required = true)]
    pub inp: Vec<PathBuf>,
    /// Drop and recreate the index first.
    #[arg(long)]
    pub delete: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let files = data::collect_input_files(&args.inp)?;
    let client = EsClient::new(&settings)?;
    if args.delete {
        client.delete_index().await?;
    }
    client.create_index().await?;

    let concurrency = 2usize;
    let indexed: usize = stream::iter(files)
        .map(|file| {
            let client = client.clone();
            async move {
                let docs = read_sentences(&file)?;
                let count = client.bulk_index(&docs).await?;
                info!(file = %file.display(), count, "indexed file");
                Ok::<_, anyhow::Error>(count)
            }
        })
        .buffer_unordered(concurrency)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .sum();

    info!(indexed, "indexing finished");
    Ok(())
}

fn read_sentences(path: &Path) -> Result<Vec<SentenceDoc>> {
    let reader =
        BufReader::new(File::open(path).with_context(|| format!("open {}", path.display()))?);
    let file = path.display().to_string();
    let mut docs = Vec::new();
    for (line_id, line) in reader.lines().enumerate() {
        let sentence = line.with_context(|| format!("read {file}:{line_id}"))?;
        docs.push(SentenceDoc {
            file: file.clone(),
            line_id,
            sentence,
        });
    }
    Ok(docs)
}
