use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every setting has a default, so an empty environment serves `./data`.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub embedding_model_path: PathBuf,
    pub classifier_model_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            data_dir: env_or("DATA_DIR", "./data").into(),
            embedding_model_path: env_or("EMBEDDING_MODEL_PATH", "job_ads_embeddings.json").into(),
            classifier_model_path: env_or("CLASSIFIER_MODEL_PATH", "job_ads_classifier.json")
                .into(),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
