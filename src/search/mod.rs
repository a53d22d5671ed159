//! Full-text retrieval layer backed by Elasticsearch.

pub mod elastic;
