//! Batch toolkit for mining COVID-19 literature: template-driven fact
//! extraction over sentence-segmented text and OpenIE triples, plus the
//! surrounding pipeline stages (segmentation, OpenIE annotation,
//! Elasticsearch retrieval, HTML reporting).

pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod extract;
pub mod logging;
pub mod nlp;
pub mod search;
