//! Runtime configuration utilities for cord-miner.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL of the Elasticsearch node.
    pub es_url: String,
    /// Index holding the segmented corpus sentences.
    pub es_index: String,
    /// Base URL of a running Stanford CoreNLP server.
    pub corenlp_url: String,
    /// CoreNLP distribution version used by `openie --install`.
    pub corenlp_version: String,
    /// Root folder for cached data artefacts.
    pub data_dir: PathBuf,
    /// Root folder for generated reports and retrieval output.
    pub outputs_dir: PathBuf,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let es_url =
            env::var("ES_URL").unwrap_or_else(|_| "http://localhost:9200".to_string());
        let es_index = env::var("ES_INDEX").unwrap_or_else(|_| "cord19".to_string());
        let corenlp_url =
            env::var("CORENLP_URL").unwrap_or_else(|_| "http://localhost:9000".to_string());
        let corenlp_version =
            env::var("CORENLP_VERSION").unwrap_or_else(|_| "2018-10-05".to_string());
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;
        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            es_url,
            es_index,
            corenlp_url,
            corenlp_version,
            data_dir,
            outputs_dir,
        })
    }

    /// Convenience helper for derived path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}
