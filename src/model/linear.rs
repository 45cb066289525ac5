//! Linear (logistic regression) classifier

use serde::{Deserialize, Serialize};

use super::{argmax, check_classes, check_sample, Classifier};
use crate::error::{Error, Result};

/// Multinomial or binary logistic regression.
///
/// With more than two classes `coef` has one row per class and the class with
/// the highest decision score wins. The binary case stores a single row: a
/// positive score selects `classes[1]`, anything else `classes[0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LogisticRegression {
    fn is_binary(&self) -> bool {
        self.classes.len() == 2 && self.coef.len() == 1
    }

    pub fn validate(&self) -> Result<()> {
        check_classes("LogisticRegression", &self.classes)?;
        let rows = if self.is_binary() { 1 } else { self.classes.len() };
        if self.coef.len() != rows || self.intercept.len() != rows {
            return Err(Error::startup(format!(
                "LogisticRegression expects {} coefficient rows and intercepts, found {} and {}",
                rows,
                self.coef.len(),
                self.intercept.len()
            )));
        }
        if let Some(row) = self.coef.iter().position(|r| r.len() != self.n_features) {
            return Err(Error::startup(format!(
                "LogisticRegression coefficient row {} has {} entries, expected {}",
                row,
                self.coef[row].len(),
                self.n_features
            )));
        }
        Ok(())
    }

    /// Raw decision scores, one per coefficient row
    pub fn decision_function(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_sample(self, features)?;
        Ok(self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect())
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "LogisticRegression"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict_one(&self, features: &[f64]) -> Result<i64> {
        let scores = self.decision_function(features)?;
        let index = if self.is_binary() {
            let score = scores
                .first()
                .ok_or_else(|| Error::inference("LogisticRegression has no intercept"))?;
            usize::from(*score > 0.0)
        } else {
            argmax(&scores).ok_or_else(|| Error::inference("LogisticRegression has no classes"))?
        };
        self.classes
            .get(index)
            .copied()
            .ok_or_else(|| Error::inference(format!("LogisticRegression class index {} out of range", index)))
    }
}
