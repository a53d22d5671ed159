//! CLI entry-point for sentence segmentation.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{config::Settings, nlp::segment::segment};

/// Args for the `segment` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Input files; reads stdin when omitted.
    #[arg(long, num_args = 0..)]
    pub inp: Vec<PathBuf>,
    /// Output file; writes stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[instrument(skip(_settings))]
pub async fn run(args: Args, _settings: Settings) -> Result<()> {
    let mut writer: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let mut sentences = 0usize;
    if args.inp.is_empty() {
        sentences += segment_reader(io::stdin().lock(), &mut writer)?;
    } else {
        for path in &args.inp {
            let reader = BufReader::new(
                File::open(path).with_context(|| format!("open {}", path.display()))?,
            );
            sentences += segment_reader(reader, &mut writer)?;
        }
    }
    writer.flush()?;
    info!(sentences, "segmentation finished");
    Ok(())
}

fn segment_reader(reader: impl BufRead, writer: &mut impl Write) -> Result<usize> {
    let mut count = 0usize;
    for line in reader.lines() {
        let line = line.context("read input line")?;
        for sentence in segment(line.trim()) {
            writeln!(writer, "{sentence}")?;
            count += 1;
        }
    }
    Ok(count)
}
