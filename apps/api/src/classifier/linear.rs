//! Frozen linear classifier (e.g. logistic regression) over document vectors.

use serde::Deserialize;

use crate::classifier::ClassifierError;

/// `coef` holds one row per class, or a single row for a two-class model.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearClassifier {
    classes: Vec<String>,
    coef: Vec<Vec<f32>>,
    intercept: Vec<f32>,
}

impl LinearClassifier {
    #[cfg(test)]
    pub fn new(
        classes: Vec<String>,
        coef: Vec<Vec<f32>>,
        intercept: Vec<f32>,
    ) -> Result<Self, ClassifierError> {
        let model = Self {
            classes,
            coef,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let model: LinearClassifier = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        let invalid = |msg: String| -> Result<(), ClassifierError> {
            Err(ClassifierError::InvalidArtifact(msg))
        };

        let rows = self.coef.len();
        let binary = self.classes.len() == 2 && rows == 1;
        if self.classes.is_empty() || (!binary && rows != self.classes.len()) {
            return invalid(format!(
                "{} coefficient rows for {} classes",
                rows,
                self.classes.len()
            ));
        }
        if self.intercept.len() != rows {
            return invalid(format!(
                "{} intercepts for {} coefficient rows",
                self.intercept.len(),
                rows
            ));
        }
        let width = self.coef[0].len();
        if self.coef.iter().any(|row| row.len() != width) {
            return invalid("coefficient rows differ in width".to_string());
        }
        Ok(())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of features each input vector must have.
    pub fn n_features(&self) -> usize {
        self.coef[0].len()
    }

    /// Label with the highest decision score; ties go to the earlier class.
    pub fn predict(&self, x: &[f32]) -> Result<&str, ClassifierError> {
        if x.len() != self.n_features() {
            return Err(ClassifierError::InvalidArtifact(format!(
                "document vector has {} features, classifier expects {}",
                x.len(),
                self.n_features()
            )));
        }

        let scores: Vec<f32> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| row.iter().zip(x).map(|(w, v)| w * v).sum::<f32>() + b)
            .collect();

        let idx = if scores.len() == 1 && self.classes.len() == 2 {
            usize::from(scores[0] > 0.0)
        } else {
            let mut best = 0;
            for (i, s) in scores.iter().enumerate().skip(1) {
                if *s > scores[best] {
                    best = i;
                }
            }
            best
        };
        Ok(&self.classes[idx])
    }
}
