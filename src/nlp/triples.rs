//! Wire format for OpenIE triples.
//!
//! A span serialises as `text#start,end`, a triple joins its three spans
//! with `|||`, and a line of triples is tab-separated. Character offsets are
//! relative to the annotated source line.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TripleParseError {
    #[error("span {0:?} lacks a #start,end suffix")]
    MalformedSpan(String),
    #[error("triple {0:?} does not have three |||-separated fields")]
    MalformedTriple(String),
}

/// A text span with character offsets into the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn parse(raw: &str) -> Result<Self, TripleParseError> {
        let malformed = || TripleParseError::MalformedSpan(raw.to_string());
        let (text, offsets) = raw.rsplit_once('#').ok_or_else(malformed)?;
        let (start, end) = offsets.split_once(',').ok_or_else(malformed)?;
        Ok(Self {
            text: text.to_string(),
            start: start.parse().map_err(|_| malformed())?,
            end: end.parse().map_err(|_| malformed())?,
        })
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{},{}", self.text, self.start, self.end)
    }
}

/// A subject/relation/object extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: Span,
    pub relation: Span,
    pub object: Span,
}

impl Triple {
    /// Summed span length, used to prefer the most compact extraction.
    pub fn total_len(&self) -> usize {
        self.subject.len() + self.relation.len() + self.object.len()
    }

    pub fn parse(raw: &str) -> Result<Self, TripleParseError> {
        let fields: Vec<&str> = raw.split("|||").collect();
        let [subject, relation, object] = fields[..] else {
            return Err(TripleParseError::MalformedTriple(raw.to_string()));
        };
        Ok(Self {
            subject: Span::parse(subject)?,
            relation: Span::parse(relation)?,
            object: Span::parse(object)?,
        })
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|||{}|||{}", self.subject, self.relation, self.object)
    }
}

/// Serialise one line of triples.
pub fn triples_to_line(triples: &[Triple]) -> String {
    triples
        .iter()
        .map(Triple::to_string)
        .collect::<Vec<_>>()
        .join("\t")
}

/// Parse one line of triples; an empty line holds no triples.
pub fn parse_triples(line: &str) -> Result<Vec<Triple>, TripleParseError> {
    if line.is_empty() {
        return Ok(Vec::new());
    }
    line.split('\t').map(Triple::parse).collect()
}
