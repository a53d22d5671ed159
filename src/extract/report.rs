//! Static HTML report rendering for aggregated extraction results.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use askama::Template;
use chrono::Utc;
use tracing::info;

use crate::{
    cli::IndexOrder,
    data::metadata::{Citation, MetadataMap},
};

use super::matcher::{CompiledTask, LineSet, MatchTable, TaskResults};

const STYLESHEET: &str = include_str!("../../assets/main.css");
const LOGO: &str = include_str!("../../assets/logo.svg");

const TEXT_HEADING: &str = "Textual Template Results";
const OIE_HEADING: &str = "Information Extraction Results";

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    title: &'a str,
    items: &'a [IndexItem],
    generated_at: &'a str,
}

struct IndexItem {
    href: String,
    title: String,
    results: usize,
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    title: &'a str,
    sections: &'a [Section],
    generated_at: &'a str,
}

struct Section {
    heading: &'static str,
    groups: Vec<Group>,
}

struct Group {
    key: String,
    suffix: String,
    count: usize,
    rows: Vec<Row>,
}

struct Row {
    text: String,
    cite: Option<CiteView>,
    /// Set when a document id was present but absent from the metadata table.
    missing_ref: bool,
}

struct CiteView {
    title: String,
    doi: Option<String>,
    venue: Option<String>,
    published: Option<String>,
}

impl From<&Citation> for CiteView {
    fn from(citation: &Citation) -> Self {
        Self {
            title: citation.title.clone(),
            doi: citation.doi.clone(),
            venue: citation.venue.clone(),
            published: citation.published.clone(),
        }
    }
}

/// Render one page per task with a compiled pattern, plus the linking index.
/// The whole directory is regenerated on every run.
pub fn write_reports(
    out_dir: &Path,
    tasks: &[CompiledTask],
    results: &[TaskResults],
    metadata: Option<&MetadataMap>,
    order: IndexOrder,
) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("create report dir {}", out_dir.display()))?;
    fs::write(out_dir.join("main.css"), STYLESHEET).context("write stylesheet")?;
    fs::write(out_dir.join("logo.svg"), LOGO).context("write logo")?;

    let mut items = Vec::new();
    for (ordinal, (task, result)) in tasks.iter().zip(results.iter()).enumerate() {
        if task.text.is_none() && task.oie.is_none() {
            continue;
        }
        let fname = format!("report-{ordinal}.html");
        items.push(IndexItem {
            href: fname.clone(),
            title: task.task.title.clone(),
            results: result.total_keys(),
        });

        let mut sections = Vec::new();
        if task.text.is_some() {
            sections.push(build_section(TEXT_HEADING, &result.text, &task.task.suffix, metadata));
        }
        if task.oie.is_some() {
            sections.push(build_section(OIE_HEADING, &result.oie, &task.task.suffix, metadata));
        }

        let generated_at = Utc::now().to_rfc3339();
        let page = ReportTemplate {
            title: &task.task.title,
            sections: &sections,
            generated_at: &generated_at,
        };
        let path = out_dir.join(&fname);
        fs::write(&path, page.render().context("render report page")?)
            .with_context(|| format!("write {}", path.display()))?;
    }

    if matches!(order, IndexOrder::Results) {
        items.sort_by_key(|item| std::cmp::Reverse(item.results));
    }

    let generated_at = Utc::now().to_rfc3339();
    let index = IndexTemplate {
        title: "CORD-19 Information Extraction Report",
        items: &items,
        generated_at: &generated_at,
    };
    let index_path = out_dir.join("index.html");
    fs::write(&index_path, index.render().context("render index page")?)
        .with_context(|| format!("write {}", index_path.display()))?;

    info!(out = %out_dir.display(), pages = items.len(), "wrote report");
    Ok(())
}

fn build_section(
    heading: &'static str,
    table: &MatchTable,
    suffix: &str,
    metadata: Option<&MetadataMap>,
) -> Section {
    let groups = table
        .ranked()
        .into_iter()
        .map(|(key, lines)| Group {
            key: key.clone(),
            suffix: suffix.to_string(),
            count: lines.len(),
            rows: build_rows(lines, metadata),
        })
        .collect();
    Section { heading, groups }
}

fn build_rows(lines: &LineSet, metadata: Option<&MetadataMap>) -> Vec<Row> {
    lines
        .iter()
        .map(|(text, provenance)| {
            let cite = metadata
                .zip(provenance.doc_id.as_deref())
                .and_then(|(map, doc_id)| map.get(doc_id))
                .map(CiteView::from);
            let missing_ref =
                metadata.is_some() && provenance.doc_id.is_some() && cite.is_none();
            Row {
                text: text.clone(),
                cite,
                missing_ref,
            }
        })
        .collect()
}
