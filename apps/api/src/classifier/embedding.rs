//! Frozen word-embedding space and the unweighted document vector.

use std::collections::HashMap;

use serde::Deserialize;

use crate::classifier::ClassifierError;

/// Sum of the known-token vectors of one text.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentVector {
    pub values: Vec<f32>,
    /// How many tokens were found in the vocabulary (repeats counted).
    pub known_tokens: usize,
}

/// Token -> vector lookup exported by the training pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingModel {
    vector_size: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingModel {
    #[cfg(test)]
    pub fn new(
        vector_size: usize,
        vectors: HashMap<String, Vec<f32>>,
    ) -> Result<Self, ClassifierError> {
        let model = Self {
            vector_size,
            vectors,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let model: EmbeddingModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        if self.vector_size == 0 {
            return Err(ClassifierError::InvalidArtifact(
                "embedding vector_size must be positive".to_string(),
            ));
        }
        if let Some((token, v)) = self
            .vectors
            .iter()
            .find(|(_, v)| v.len() != self.vector_size)
        {
            return Err(ClassifierError::InvalidArtifact(format!(
                "embedding for '{token}' has {} components, expected {}",
                v.len(),
                self.vector_size
            )));
        }
        Ok(())
    }

    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    pub fn vector(&self, token: &str) -> Option<&[f32]> {
        self.vectors.get(token).map(Vec::as_slice)
    }

    /// Sums the vectors of every in-vocabulary token of `text`.
    ///
    /// Tokens are the pieces between single spaces, untouched. A text with no
    /// known token yields the zero vector.
    pub fn document_vector(&self, text: &str) -> DocumentVector {
        let mut values = vec![0.0_f32; self.vector_size];
        let mut known_tokens = 0;
        for v in text.split(' ').filter_map(|t| self.vector(t)) {
            known_tokens += 1;
            for (acc, x) in values.iter_mut().zip(v) {
                *acc += x;
            }
        }
        DocumentVector {
            values,
            known_tokens,
        }
    }
}
