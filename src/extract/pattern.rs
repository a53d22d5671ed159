//! Compilation of template pattern sources into alternation regexes.
//!
//! Template cells hold one pattern per line. `[X]` stands for the pathogen
//! name, `[Y]` for a wildcard capture in text patterns, `[B]` for the literal
//! triple-field separator in OIE patterns.

use anyhow::{Context, Result};
use regex::Regex;
use tracing::warn;

use crate::data::templates::{MatchMode, Task};

/// Canonical pathogen name and its known synonyms.
pub const VIRUS_NAMES: &[&str] = &[
    "COVID-19",
    "Wuhan coronavirus",
    "Wuhan seafood market pneumonia virus",
    "SARS2",
    "coronavirus disease 2019",
    "SARS-CoV-2",
    "2019-nCoV",
];

const VIRUS_PLACEHOLDER: &str = "[X]";
const WILDCARD_PLACEHOLDER: &str = "[Y]";
const SEPARATOR_PLACEHOLDER: &str = "[B]";

/// Knobs for text-pattern expansion.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Expand lines without `[X]` into virus-prefixed and -suffixed variants,
    /// anchoring matches to textual proximity of a pathogen mention.
    pub anchor_virus: bool,
}

/// A task's pattern source compiled into one alternation.
#[derive(Debug)]
pub struct CompiledPattern {
    pub regex: Regex,
    /// Names of the wildcard capture groups, in placeholder order.
    pub wildcard_groups: Vec<String>,
    pub mode: MatchMode,
}

/// Alternation matching any spelling of the pathogen name.
pub fn virus_alternation() -> String {
    let escaped: Vec<String> = VIRUS_NAMES.iter().map(|name| regex::escape(name)).collect();
    format!("({})", escaped.join("|"))
}

/// Compile a task's free-text pattern source, if it has one.
///
/// Lines that start or end with the wildcard marker are dropped with a
/// warning rather than failing the task; a task whose lines all fail
/// validation compiles to `None` and is skipped downstream.
pub fn compile_text_pattern(task: &Task, opts: CompileOptions) -> Result<Option<CompiledPattern>> {
    let mut lines = Vec::new();
    for line in pattern_lines(&task.text_source) {
        if line.starts_with(WILDCARD_PLACEHOLDER) || line.ends_with(WILDCARD_PLACEHOLDER) {
            warn!(task = %task.id, pattern = %line, "pattern line must not start or end with [Y]; dropping");
            continue;
        }
        if opts.anchor_virus && !line.contains(VIRUS_PLACEHOLDER) {
            lines.push(format!("{VIRUS_PLACEHOLDER}.*?{line}"));
            lines.push(format!("{line}.*?{VIRUS_PLACEHOLDER}"));
        } else {
            lines.push(line.to_string());
        }
    }
    if lines.is_empty() {
        return Ok(None);
    }

    let virus = virus_alternation();
    let mut wildcard_groups = Vec::new();
    let alternatives: Vec<String> = lines
        .iter()
        .map(|line| {
            let line = line.replace(VIRUS_PLACEHOLDER, &virus);
            substitute_wildcards(&line, &mut wildcard_groups)
        })
        .collect();

    let source = format!("({})", alternatives.join("|"));
    let regex = Regex::new(&source)
        .with_context(|| format!("compile text pattern for task {}", task.id))?;
    Ok(Some(CompiledPattern {
        regex,
        wildcard_groups,
        mode: task.mode,
    }))
}

/// Compile a task's OIE pattern source, if it has one.
pub fn compile_oie_pattern(task: &Task) -> Result<Option<CompiledPattern>> {
    let lines: Vec<&str> = pattern_lines(&task.oie_source).collect();
    if lines.is_empty() {
        return Ok(None);
    }

    let virus = virus_alternation();
    let alternatives: Vec<String> = lines
        .iter()
        .map(|line| {
            line.replace(VIRUS_PLACEHOLDER, &virus)
                .replace(SEPARATOR_PLACEHOLDER, r"\|\|\|")
        })
        .collect();

    let source = format!("({})", alternatives.join("|"));
    let regex = Regex::new(&source)
        .with_context(|| format!("compile OIE pattern for task {}", task.id))?;
    Ok(Some(CompiledPattern {
        regex,
        wildcard_groups: Vec::new(),
        mode: MatchMode::First,
    }))
}

fn pattern_lines(source: &str) -> impl Iterator<Item = &str> {
    source
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
}

/// Replace each `[Y]` with a uniquely named non-greedy capture group.
///
/// Names run across the whole task so every placeholder occurrence stays
/// distinguishable when deriving the yonly key.
fn substitute_wildcards(line: &str, groups: &mut Vec<String>) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(pos) = rest.find(WILDCARD_PLACEHOLDER) {
        out.push_str(&rest[..pos]);
        let name = format!("y{}", groups.len());
        out.push_str(&format!("(?P<{name}>.*?)"));
        groups.push(name);
        rest = &rest[pos + WILDCARD_PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}
