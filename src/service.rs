//! Risk classifier service
//!
//! Stateless apart from the immutable model: assemble the feature vector,
//! run single-sample inference, map the class label onto a [`RiskLevel`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::features::{HealthInput, FEATURE_COUNT};
use crate::model::{load_classifier, Classifier};
use crate::risk::RiskLevel;

/// Outcome of one assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub risk_code: u8,
    pub risk_level: RiskLevel,
}

impl Prediction {
    fn from_level(level: RiskLevel) -> Self {
        Self {
            risk_code: level.code(),
            risk_level: level,
        }
    }
}

/// Wraps the loaded model
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    model: Arc<dyn Classifier>,
}

impl RiskClassifier {
    pub fn new(model: Arc<dyn Classifier>) -> Self {
        Self { model }
    }

    /// Load the configured artifact. Any failure here is fatal for the process.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let artifact = load_classifier(&config.path, FEATURE_COUNT)?;
        Ok(Self::new(Arc::new(artifact)))
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Assess one request
    pub fn assess(&self, input: &HealthInput) -> Result<Prediction> {
        let features = input.to_vector();
        let label = self.model.predict_one(&features)?;
        let level = RiskLevel::from_code(label)?;
        Ok(Prediction::from_level(level))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::error::Error;

    /// Returns a fixed label, or fails when the temperature is below -100
    #[derive(Debug)]
    pub struct ScriptedClassifier {
        pub label: i64,
    }

    impl Classifier for ScriptedClassifier {
        fn name(&self) -> &str {
            "ScriptedClassifier"
        }

        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }

        fn classes(&self) -> &[i64] {
            &[0, 1, 2]
        }

        fn predict_one(&self, features: &[f64]) -> Result<i64> {
            if features[8] < -100.0 {
                return Err(Error::inference("could not convert temperature reading"));
            }
            Ok(self.label)
        }
    }

    pub fn scripted(label: i64) -> RiskClassifier {
        RiskClassifier::new(Arc::new(ScriptedClassifier { label }))
    }
}
