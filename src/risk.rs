//! Risk levels and the fixed code-to-label table

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Labels indexed by risk code. Order is part of the API.
pub const RISK_LABELS: [&str; 3] = ["Low", "Medium", "High"];

/// Ordinal risk level produced by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Map a classifier label to a level by position in [`RISK_LABELS`].
    ///
    /// Negative labels and labels past the end of the table are errors.
    pub fn from_code(code: i64) -> Result<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or_else(|| {
                Error::inference(format!(
                    "risk code {} is out of range for {} risk levels",
                    code,
                    RISK_LABELS.len()
                ))
            })
    }

    /// Position in [`RISK_LABELS`]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        RISK_LABELS[self as usize]
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_label_table_order() {
        assert_eq!(RISK_LABELS, ["Low", "Medium", "High"]);
    }

    #[test]
    fn test_codes_map_positionally() {
        assert_eq!(RiskLevel::from_code(0).unwrap().label(), "Low");
        assert_eq!(RiskLevel::from_code(1).unwrap().label(), "Medium");
        assert_eq!(RiskLevel::from_code(2).unwrap().label(), "High");
        for code in 0..3 {
            let level = RiskLevel::from_code(code).unwrap();
            assert_eq!(i64::from(level.code()), code);
            assert_eq!(level.label(), RISK_LABELS[code as usize]);
        }
    }

    #[test]
    fn test_out_of_range_codes_fail() {
        for code in [3, 42, -1, i64::MIN] {
            let err = RiskLevel::from_code(code).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Inference);
            assert!(err.to_string().contains(&code.to_string()));
        }
    }

    #[test]
    fn test_levels_are_ordinal() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert_eq!(RiskLevel::High.to_string(), "High");
    }
}
