//! Stanford CoreNLP OpenIE client and triple post-processing passes.

use std::{
    collections::{HashMap, HashSet},
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use urlencoding::encode;

use crate::config::Settings;

use super::triples::{parse_triples, triples_to_line, Span, Triple};

/// Annotation requests longer than this are skipped outright; the CoreNLP
/// server chokes on very long inputs.
pub const MAX_ANNOTATION_LEN: usize = 15_000;

const CORENLP_DOWNLOAD_BASE: &str = "http://nlp.stanford.edu/software";

/// HTTP client against a running CoreNLP server.
pub struct CoreNlpClient {
    http: Client,
    base_url: String,
}

impl CoreNlpClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .user_agent("cord-miner/0.1")
            .gzip(true)
            .build()?;
        Ok(Self {
            http,
            base_url: settings.corenlp_url.trim_end_matches('/').to_string(),
        })
    }

    /// Annotate one text with the openie annotator, returning triples with
    /// character offsets mapped through the sentence tokens.
    pub async fn annotate(&self, text: &str, remove_dup: bool) -> Result<Vec<Triple>> {
        if text.len() >= MAX_ANNOTATION_LEN {
            warn!(len = text.len(), "skipping over-long annotation input");
            return Ok(Vec::new());
        }
        let properties = serde_json::json!({
            "annotators": "openie",
            "outputFormat": "json",
        });
        let url = format!(
            "{}/?properties={}",
            self.base_url,
            encode(&properties.to_string())
        );
        let response = self
            .http
            .post(&url)
            .body(text.to_string())
            .send()
            .await
            .context("post annotation request")?
            .error_for_status()
            .context("CoreNLP annotation failed")?;
        let document: CoreNlpDocument = response.json().await.context("decode CoreNLP json")?;
        Ok(collect_triples(document, remove_dup))
    }
}

#[derive(Debug, Deserialize)]
struct CoreNlpDocument {
    #[serde(default)]
    sentences: Vec<CoreNlpSentence>,
}

#[derive(Debug, Deserialize)]
struct CoreNlpSentence {
    #[serde(default)]
    tokens: Vec<CoreNlpToken>,
    #[serde(default)]
    openie: Vec<CoreNlpTriple>,
}

#[derive(Debug, Deserialize)]
struct CoreNlpToken {
    #[serde(rename = "characterOffsetBegin")]
    begin: usize,
    #[serde(rename = "characterOffsetEnd")]
    end: usize,
}

#[derive(Debug, Deserialize)]
struct CoreNlpTriple {
    subject: String,
    relation: String,
    object: String,
    #[serde(rename = "subjectSpan")]
    subject_span: [usize; 2],
    #[serde(rename = "relationSpan")]
    relation_span: [usize; 2],
    #[serde(rename = "objectSpan")]
    object_span: [usize; 2],
}

fn collect_triples(document: CoreNlpDocument, remove_dup: bool) -> Vec<Triple> {
    let mut triples = Vec::new();
    let mut seen = HashSet::new();
    for sentence in document.sentences {
        for raw in sentence.openie {
            let spans = (
                span_from_tokens(&sentence.tokens, &raw.subject, raw.subject_span),
                span_from_tokens(&sentence.tokens, &raw.relation, raw.relation_span),
                span_from_tokens(&sentence.tokens, &raw.object, raw.object_span),
            );
            let (Some(subject), Some(relation), Some(object)) = spans else {
                continue;
            };
            if remove_dup {
                let key = format!(
                    "{}-{}\t{}-{}\t{}-{}",
                    subject.start, subject.end, relation.start, relation.end, object.start,
                    object.end
                );
                if !seen.insert(key) {
                    continue;
                }
            }
            triples.push(Triple {
                subject,
                relation,
                object,
            });
        }
    }
    triples
}

/// Token spans are half-open token-index ranges; map them to character
/// offsets via the first and last covered token.
fn span_from_tokens(tokens: &[CoreNlpToken], text: &str, span: [usize; 2]) -> Option<Span> {
    let start = tokens.get(span[0])?.begin;
    let end = tokens.get(span[1].checked_sub(1)?)?.end;
    Some(Span {
        text: text.to_string(),
        start,
        end,
    })
}

/// Annotate a file line by line, writing one triple line per input line.
///
/// Lines may carry a leading tab-delimited identifier; it is preserved as a
/// prefix of the output line.
pub async fn annotate_file(
    client: &CoreNlpClient,
    input: &Path,
    output: &Path,
    remove_dup: bool,
) -> Result<()> {
    let reader = BufReader::new(
        File::open(input).with_context(|| format!("open {}", input.display()))?,
    );
    let mut writer = BufWriter::new(
        File::create(output).with_context(|| format!("create {}", output.display()))?,
    );
    let mut annotated = 0usize;
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read {}:{line_idx}", input.display()))?;
        let (id, text) = match line.split_once('\t') {
            Some((id, text)) => (Some(id.to_string()), text.to_string()),
            None => (None, line),
        };
        let triples = client.annotate(text.trim(), remove_dup).await?;
        match id {
            Some(id) => writeln!(writer, "{id}\t{}", triples_to_line(&triples))?,
            None => writeln!(writer, "{}", triples_to_line(&triples))?,
        }
        annotated += 1;
    }
    info!(input = %input.display(), lines = annotated, "annotated file");
    Ok(())
}

/// Keep only the triple with the smallest total span length per line.
pub fn filter_file(input: &Path, output: &Path) -> Result<()> {
    let reader = BufReader::new(
        File::open(input).with_context(|| format!("open {}", input.display()))?,
    );
    let mut writer = BufWriter::new(
        File::create(output).with_context(|| format!("create {}", output.display()))?,
    );
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read {}:{line_idx}", input.display()))?;
        let (id, body) = split_leading_id(&line);
        let mut triples =
            parse_triples(body).with_context(|| format!("parse {}:{line_idx}", input.display()))?;
        triples.sort_by_key(Triple::total_len);
        triples.truncate(1);
        match id {
            Some(id) => writeln!(writer, "{id}\t{}", triples_to_line(&triples))?,
            None => writeln!(writer, "{}", triples_to_line(&triples))?,
        }
    }
    Ok(())
}

/// English stopwords used when pruning uninformative relations.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "could", "did", "do",
    "does", "for", "from", "had", "has", "have", "in", "is", "it", "its", "may", "might", "must",
    "no", "not", "of", "on", "or", "shall", "should", "so", "than", "that", "the", "their",
    "then", "there", "these", "they", "this", "to", "was", "we", "were", "which", "will", "with",
    "would",
];

/// Count relations across a triple file and write `relation\tcount` rows in
/// descending count order, pruning noise relations.
pub fn analyze_file(input: &Path, output: &Path) -> Result<()> {
    let reader = BufReader::new(
        File::open(input).with_context(|| format!("open {}", input.display()))?,
    );
    let mut counts: HashMap<String, u64> = HashMap::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read {}:{line_idx}", input.display()))?;
        let (_, body) = split_leading_id(&line);
        for triple in
            parse_triples(body).with_context(|| format!("parse {}:{line_idx}", input.display()))?
        {
            *counts.entry(triple.relation.text).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, u64)> = counts
        .into_iter()
        .filter(|(relation, _)| keep_relation(relation))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut writer = BufWriter::new(
        File::create(output).with_context(|| format!("create {}", output.display()))?,
    );
    for (relation, count) in &ranked {
        writeln!(writer, "{relation}\t{count}")?;
    }
    info!(relations = ranked.len(), output = %output.display(), "wrote relation counts");
    Ok(())
}

fn keep_relation(relation: &str) -> bool {
    let lowered = relation.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() > 10 {
        return false;
    }
    if lowered.chars().all(|c| c.is_ascii_punctuation()) {
        return false;
    }
    if lowered.starts_with(|c: char| c.is_ascii_punctuation()) {
        return false;
    }
    if tokens.iter().all(|token| STOPWORDS.contains(token)) {
        return false;
    }
    true
}

fn split_leading_id(line: &str) -> (Option<&str>, &str) {
    match line.split_once('\t') {
        Some((id, rest)) if !id.contains("|||") => (Some(id), rest),
        _ => (None, line),
    }
}

/// Download and extract the CoreNLP distribution into the data dir.
/// A no-op when the distribution is already present.
pub async fn install_distribution(settings: &Settings) -> Result<PathBuf> {
    let dist = format!("stanford-corenlp-full-{}", settings.corenlp_version);
    let install_dir = settings.join_data("corenlp");
    fs::create_dir_all(&install_dir)
        .with_context(|| format!("create {}", install_dir.display()))?;
    let target = install_dir.join(&dist);
    if target.exists() {
        info!(path = %target.display(), "using existing CoreNLP distribution");
        return Ok(target);
    }

    let url = format!("{CORENLP_DOWNLOAD_BASE}/{dist}.zip");
    info!(%url, "downloading CoreNLP distribution");
    let client = Client::builder().user_agent("cord-miner/0.1").build()?;
    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        bail!("CoreNLP download failed with status {}", response.status());
    }
    let bytes = response.bytes().await?;
    let archive_path = install_dir.join(format!("{dist}.zip"));
    fs::write(&archive_path, &bytes)
        .with_context(|| format!("write {}", archive_path.display()))?;

    info!(path = %install_dir.display(), "extracting CoreNLP distribution");
    let archive = File::open(&archive_path)?;
    zip::ZipArchive::new(archive)
        .context("open CoreNLP archive")?
        .extract(&install_dir)
        .context("extract CoreNLP archive")?;
    Ok(target)
}
