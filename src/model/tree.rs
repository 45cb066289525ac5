//! Decision tree classifier

use serde::{Deserialize, Serialize};

use super::{argmax, check_classes, check_sample, Classifier};
use crate::error::{Error, Result};

/// Child index marking a leaf
pub const LEAF: i64 = -1;

/// Decision tree stored as parallel node arrays.
///
/// Node `i` is a leaf when `children_left[i] == LEAF`. Internal nodes send a
/// sample left when `x[feature[i]] <= threshold[i]`, right otherwise. Leaf
/// rows of `value` hold per-class weights aligned with `classes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    pub fn is_leaf(&self, node: usize) -> bool {
        self.children_left.get(node) == Some(&LEAF)
    }

    pub fn validate(&self) -> Result<()> {
        check_classes("DecisionTree", &self.classes)?;

        let n = self.node_count();
        if n == 0 {
            return Err(Error::startup("DecisionTree has no nodes"));
        }
        let lengths = [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ];
        if lengths.iter().any(|len| *len != n) {
            return Err(Error::startup(format!(
                "DecisionTree node arrays disagree in length: {} children_left vs {:?}",
                n, lengths
            )));
        }

        let in_range = |child: i64| usize::try_from(child).map(|c| c < n).unwrap_or(false);
        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                if right != LEAF {
                    return Err(Error::startup(format!(
                        "DecisionTree node {} has a right child but no left child",
                        node
                    )));
                }
                if self.value[node].len() != self.classes.len() {
                    return Err(Error::startup(format!(
                        "DecisionTree leaf {} has {} class weights, expected {}",
                        node,
                        self.value[node].len(),
                        self.classes.len()
                    )));
                }
                continue;
            }
            if !in_range(left) || !in_range(right) {
                return Err(Error::startup(format!(
                    "DecisionTree node {} has children ({}, {}) outside 0..{}",
                    node, left, right, n
                )));
            }
            let feature = self.feature[node];
            if usize::try_from(feature).map(|f| f >= self.n_features).unwrap_or(true) {
                return Err(Error::startup(format!(
                    "DecisionTree node {} splits on feature {} but the model has {} features",
                    node, feature, self.n_features
                )));
            }
        }
        Ok(())
    }

    /// Walk from the root to the leaf the sample falls into.
    ///
    /// Trees built by hand or decoded without [`DecisionTree::validate`] may
    /// point outside their arrays; that is an inference error, never a panic.
    pub fn leaf_for(&self, features: &[f64]) -> Result<usize> {
        let malformed = |node: usize| Error::inference(format!("DecisionTree node {} is malformed", node));
        let mut node = 0usize;
        // a well-formed tree reaches a leaf in fewer steps than it has nodes
        for _ in 0..self.node_count() {
            let left = *self.children_left.get(node).ok_or_else(|| malformed(node))?;
            if left == LEAF {
                return Ok(node);
            }
            let x = self
                .feature
                .get(node)
                .and_then(|f| usize::try_from(*f).ok())
                .and_then(|f| features.get(f))
                .ok_or_else(|| malformed(node))?;
            let threshold = self.threshold.get(node).ok_or_else(|| malformed(node))?;
            let child = if x <= threshold {
                left
            } else {
                *self.children_right.get(node).ok_or_else(|| malformed(node))?
            };
            node = usize::try_from(child).map_err(|_| malformed(node))?;
        }
        Err(Error::inference("DecisionTree traversal did not reach a leaf"))
    }

    fn leaf_weights(&self, leaf: usize) -> Result<&[f64]> {
        self.value
            .get(leaf)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::inference(format!("DecisionTree leaf {} has no value row", leaf)))
    }

    /// Normalised class weights of the sample's leaf
    pub fn predict_proba_one(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_sample(self, features)?;
        let weights = self.leaf_weights(self.leaf_for(features)?)?;
        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            Ok(weights.iter().map(|w| w / total).collect())
        } else {
            Ok(weights.to_vec())
        }
    }
}

impl Classifier for DecisionTree {
    fn name(&self) -> &str {
        "DecisionTree"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict_one(&self, features: &[f64]) -> Result<i64> {
        check_sample(self, features)?;
        let leaf = self.leaf_for(features)?;
        argmax(self.leaf_weights(leaf)?)
            .and_then(|i| self.classes.get(i).copied())
            .ok_or_else(|| Error::inference(format!("DecisionTree leaf {} has no class weights", leaf)))
    }
}
