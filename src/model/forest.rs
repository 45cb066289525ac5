//! Random forest classifier

use serde::{Deserialize, Serialize};

use super::{argmax, check_classes, check_sample, Classifier, DecisionTree};
use crate::error::{Error, Result};

/// Ensemble of decision trees sharing one class list.
///
/// The prediction is the class with the highest mean leaf probability across
/// trees (soft voting), not a majority of per-tree votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub estimators: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn n_trees(&self) -> usize {
        self.estimators.len()
    }

    pub fn validate(&self) -> Result<()> {
        check_classes("RandomForest", &self.classes)?;
        if self.estimators.is_empty() {
            return Err(Error::startup("RandomForest has no estimators"));
        }
        for (i, tree) in self.estimators.iter().enumerate() {
            if tree.classes != self.classes || tree.n_features != self.n_features {
                return Err(Error::startup(format!(
                    "RandomForest estimator {} does not match the forest's classes or feature count",
                    i
                )));
            }
            tree.validate()
                .map_err(|e| Error::startup(format!("RandomForest estimator {}: {}", i, e)))?;
        }
        Ok(())
    }

    /// Mean class probabilities over all trees
    pub fn predict_proba_one(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_sample(self, features)?;
        let mut sums = vec![0.0; self.classes.len()];
        for tree in &self.estimators {
            for (sum, p) in sums.iter_mut().zip(tree.predict_proba_one(features)?) {
                *sum += p;
            }
        }
        let n = self.n_trees().max(1) as f64;
        Ok(sums.into_iter().map(|s| s / n).collect())
    }
}

impl Classifier for RandomForest {
    fn name(&self) -> &str {
        "RandomForest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict_one(&self, features: &[f64]) -> Result<i64> {
        let proba = self.predict_proba_one(features)?;
        argmax(&proba)
            .and_then(|i| self.classes.get(i).copied())
            .ok_or_else(|| Error::inference("RandomForest produced no class probabilities"))
    }
}
