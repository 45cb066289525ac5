//! Classifier artifacts
//!
//! The model is produced by an external training pipeline and handed to the
//! service as a serialized [`ModelArtifact`]. It is loaded once at startup and
//! never mutated afterwards, so it is shared across workers as
//! `Arc<dyn Classifier>` without locking.

pub mod forest;
pub mod linear;
pub mod tree;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result, WithErrorContext};

pub use forest::RandomForest;
pub use linear::LogisticRegression;
pub use tree::DecisionTree;

/// Single-sample classifier
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Model type name, for logs
    fn name(&self) -> &str;

    /// Number of features expected per sample
    fn n_features(&self) -> usize;

    /// Class labels the model can emit
    fn classes(&self) -> &[i64];

    /// Predict the class label of one sample
    fn predict_one(&self, features: &[f64]) -> Result<i64>;
}

/// On-disk model formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Bincode,
}

impl ArtifactFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ArtifactFormat::Json),
            Some("bin") | Some("bincode") => Ok(ArtifactFormat::Bincode),
            other => Err(Error::startup(format!(
                "unsupported model artifact format {:?}, expected .json, .bin or .bincode",
                other.unwrap_or("")
            ))),
        }
    }
}

/// A serialized trained classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelArtifact {
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
    LogisticRegression(LogisticRegression),
}

impl ModelArtifact {
    /// Load and validate an artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let context = format!("failed to load model artifact {}", path.display());
        Self::read(path).with_context(context)
    }

    fn read(path: &Path) -> Result<Self> {
        let format = ArtifactFormat::from_path(path)?;
        let bytes = std::fs::read(path)?;
        debug!("read {} bytes of {:?} model artifact", bytes.len(), format);
        let artifact = Self::from_bytes(&bytes, format)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Decode without validating
    pub fn from_bytes(bytes: &[u8], format: ArtifactFormat) -> Result<Self> {
        let artifact = match format {
            ArtifactFormat::Json => serde_json::from_slice(bytes)?,
            ArtifactFormat::Bincode => bincode::deserialize(bytes)?,
        };
        Ok(artifact)
    }

    /// Save the artifact, format chosen by extension
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = match ArtifactFormat::from_path(path)? {
            ArtifactFormat::Json => serde_json::to_vec_pretty(self)?,
            ArtifactFormat::Bincode => bincode::serialize(self)?,
        };
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Check structural consistency
    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::DecisionTree(m) => m.validate(),
            ModelArtifact::RandomForest(m) => m.validate(),
            ModelArtifact::LogisticRegression(m) => m.validate(),
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            ModelArtifact::DecisionTree(m) => m,
            ModelArtifact::RandomForest(m) => m,
            ModelArtifact::LogisticRegression(m) => m,
        }
    }
}

impl Classifier for ModelArtifact {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn classes(&self) -> &[i64] {
        self.inner().classes()
    }

    fn predict_one(&self, features: &[f64]) -> Result<i64> {
        self.inner().predict_one(features)
    }
}

/// Load the artifact at `path` and check it takes `expected_features` inputs
pub fn load_classifier(path: impl AsRef<Path>, expected_features: usize) -> Result<ModelArtifact> {
    let path = path.as_ref();
    let artifact = ModelArtifact::load(path)?;
    if artifact.n_features() != expected_features {
        return Err(Error::startup(format!(
            "model artifact {} expects {} features but the service supplies {}",
            path.display(),
            artifact.n_features(),
            expected_features
        )));
    }
    info!(
        "Model loaded successfully - Type: {} ({} classes)",
        artifact.name(),
        artifact.classes().len()
    );
    Ok(artifact)
}

/// Reject samples the model cannot score
pub(crate) fn check_sample(model: &dyn Classifier, features: &[f64]) -> Result<()> {
    if features.len() != model.n_features() {
        return Err(Error::inference(format!(
            "X has {} features, but {} is expecting {} features as input",
            features.len(),
            model.name(),
            model.n_features()
        )));
    }
    if features.iter().any(|x| !x.is_finite()) {
        return Err(Error::inference("Input X contains NaN or infinity"));
    }
    Ok(())
}

/// Index of the largest value; ties resolve to the lowest index
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    if values.is_empty() {
        return None;
    }
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    Some(best)
}

pub(crate) fn check_classes(name: &str, classes: &[i64]) -> Result<()> {
    if classes.is_empty() {
        return Err(Error::startup(format!("{} has no classes", name)));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    const LEAF: i64 = tree::LEAF;

    /// Three-way split on PM2.5: <= 35 Low, <= 75 Medium, else High
    pub fn pm25_tree() -> DecisionTree {
        DecisionTree {
            n_features: 10,
            classes: vec![0, 1, 2],
            children_left: vec![1, LEAF, 3, LEAF, LEAF],
            children_right: vec![2, LEAF, 4, LEAF, LEAF],
            feature: vec![6, -2, 6, -2, -2],
            threshold: vec![35.0, -2.0, 75.0, -2.0, -2.0],
            value: vec![
                vec![5.0, 5.0, 7.0],
                vec![5.0, 0.0, 0.0],
                vec![0.0, 5.0, 7.0],
                vec![0.0, 4.0, 1.0],
                vec![0.0, 1.0, 6.0],
            ],
        }
    }

    /// Single leaf that always votes for `class`
    pub fn constant_tree(classes: Vec<i64>, class_index: usize) -> DecisionTree {
        let mut value = vec![0.0; classes.len()];
        value[class_index] = 1.0;
        DecisionTree {
            n_features: 10,
            classes,
            children_left: vec![LEAF],
            children_right: vec![LEAF],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![value],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn test_argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5]), Some(1));
        assert_eq!(argmax(&[1.0]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ArtifactFormat::from_path(Path::new("m.json")).unwrap(), ArtifactFormat::Json);
        assert_eq!(ArtifactFormat::from_path(Path::new("m.bin")).unwrap(), ArtifactFormat::Bincode);
        assert!(ArtifactFormat::from_path(Path::new("global_model.pkl")).is_err());
    }

    #[test]
    fn test_load_json_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let artifact = ModelArtifact::DecisionTree(pm25_tree());
        artifact.to_file(&path).unwrap();

        let loaded = load_classifier(&path, 10).unwrap();
        assert_eq!(loaded, artifact);
        assert_eq!(loaded.name(), "DecisionTree");
    }

    #[test]
    fn test_load_bincode_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let artifact = ModelArtifact::RandomForest(RandomForest {
            n_features: 10,
            classes: vec![0, 1, 2],
            estimators: vec![pm25_tree(), constant_tree(vec![0, 1, 2], 0)],
        });
        artifact.to_file(&path).unwrap();

        let loaded = load_classifier(&path, 10).unwrap();
        assert_eq!(loaded.name(), "RandomForest");
        assert_eq!(loaded.classes(), &[0, 1, 2]);
    }

    #[test]
    fn test_json_artifact_is_externally_tagged() {
        let text = serde_json::to_string(&ModelArtifact::DecisionTree(pm25_tree())).unwrap();
        assert!(text.starts_with("{\"decision_tree\":"));
    }

    #[test]
    fn test_missing_artifact_is_startup_error() {
        let dir = tempdir().unwrap();
        let err = load_classifier(dir.path().join("absent.json"), 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Startup);
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_corrupt_artifact_is_startup_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, b"{\"decision_tree\": {\"n_features\": ").unwrap();
        let err = load_classifier(&path, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Startup);
    }

    #[test]
    fn test_inconsistent_artifact_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut tree = pm25_tree();
        tree.children_left[0] = 9;
        ModelArtifact::DecisionTree(tree).to_file(&path).unwrap();
        assert!(load_classifier(&path, 10).is_err());
    }

    #[test]
    fn test_feature_count_mismatch_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut tree = pm25_tree();
        tree.n_features = 12;
        ModelArtifact::DecisionTree(tree).to_file(&path).unwrap();
        let err = load_classifier(&path, 10).unwrap_err();
        assert!(err.to_string().contains("expects 12 features"));
    }

    #[test]
    fn test_check_sample_rejects_bad_vectors() {
        let tree = pm25_tree();
        let err = check_sample(&tree, &[1.0; 9]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Inference);
        assert!(err.to_string().contains("X has 9 features"));

        let mut sample = [1.0; 10];
        sample[3] = f64::INFINITY;
        assert!(check_sample(&tree, &sample).is_err());
    }
}
