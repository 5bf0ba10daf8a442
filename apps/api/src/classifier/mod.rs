//! Category prediction for new listings.
//!
//! A description becomes one document vector (sum of its word embeddings) which
//! a linear classifier maps to a category label. Both models are frozen
//! artifacts produced by an offline training pipeline.
//!
//! `AppState` holds an `Arc<dyn CategoryClassifier>` so handlers never see
//! which backend is in use.

pub mod embedding;
pub mod linear;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::classifier::embedding::EmbeddingModel;
use crate::classifier::linear::LinearClassifier;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Failed to read model artifact {}: {source}", path.display())]
    ArtifactIo { path: PathBuf, source: io::Error },

    #[error("Failed to parse model artifact: {0}")]
    ArtifactParse(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Model loading task failed: {0}")]
    LoadTask(String),
}

#[async_trait]
pub trait CategoryClassifier: Send + Sync {
    /// Predicts the category label for a free-text job description.
    async fn predict(&self, description: &str) -> Result<String, ClassifierError>;
}

struct Models {
    embedding: EmbeddingModel,
    classifier: LinearClassifier,
}

impl Models {
    fn load(embedding_path: &Path, classifier_path: &Path) -> Result<Self, ClassifierError> {
        let embedding = EmbeddingModel::from_json(&read_artifact(embedding_path)?)?;
        let classifier = LinearClassifier::from_json(&read_artifact(classifier_path)?)?;

        if classifier.n_features() != embedding.vector_size() {
            return Err(ClassifierError::InvalidArtifact(format!(
                "classifier expects {} features but embeddings have {} dimensions",
                classifier.n_features(),
                embedding.vector_size()
            )));
        }

        info!(
            "Loaded category models: {} dimensions, {} classes",
            embedding.vector_size(),
            classifier.classes().len()
        );
        Ok(Self {
            embedding,
            classifier,
        })
    }
}

fn read_artifact(path: &Path) -> Result<String, ClassifierError> {
    fs::read_to_string(path).map_err(|source| ClassifierError::ArtifactIo {
        path: path.to_path_buf(),
        source,
    })
}

/// Embedding + linear classifier backend.
///
/// Artifacts are read on the first prediction and kept for the life of the
/// process. A failed load is not cached; the next call tries again.
pub struct EmbeddingClassifier {
    embedding_path: PathBuf,
    classifier_path: PathBuf,
    models: OnceCell<Models>,
}

impl EmbeddingClassifier {
    pub fn new(embedding_path: impl Into<PathBuf>, classifier_path: impl Into<PathBuf>) -> Self {
        Self {
            embedding_path: embedding_path.into(),
            classifier_path: classifier_path.into(),
            models: OnceCell::new(),
        }
    }

    async fn models(&self) -> Result<&Models, ClassifierError> {
        self.models
            .get_or_try_init(|| async {
                let embedding_path = self.embedding_path.clone();
                let classifier_path = self.classifier_path.clone();
                tokio::task::spawn_blocking(move || Models::load(&embedding_path, &classifier_path))
                    .await
                    .map_err(|e| ClassifierError::LoadTask(e.to_string()))?
            })
            .await
    }
}

#[async_trait]
impl CategoryClassifier for EmbeddingClassifier {
    async fn predict(&self, description: &str) -> Result<String, ClassifierError> {
        let models = self.models().await?;
        let doc = models.embedding.document_vector(description);
        let label = models.classifier.predict(&doc.values)?.to_string();
        debug!(
            "Predicted category '{label}' from {} known tokens",
            doc.known_tokens
        );
        Ok(label)
    }
}
