//! Prediction request: the ten health and environment features
//!
//! Field order is significant. It is the column order the classifier was
//! trained on, so [`HealthInput::to_vector`] and [`FIELD_NAMES`] must agree.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, FieldError, Result};

/// Number of features the classifier consumes
pub const FEATURE_COUNT: usize = 10;

/// Request field names, in model feature order
pub const FIELD_NAMES: [&str; FEATURE_COUNT] = [
    "TotalSteps",
    "TotalDistance",
    "VeryActiveMinutes",
    "Calories",
    "AvgHeartRate",
    "TotalSleepMinutes",
    "PM25",
    "PM10",
    "Temperature",
    "Humidity",
];

/// One assessment request.
///
/// No range checks are applied: negative steps or a humidity above 100 are
/// passed to the model as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthInput {
    #[serde(rename = "TotalSteps")]
    pub total_steps: f64,
    #[serde(rename = "TotalDistance")]
    pub total_distance: f64,
    #[serde(rename = "VeryActiveMinutes")]
    pub very_active_minutes: f64,
    #[serde(rename = "Calories")]
    pub calories: f64,
    #[serde(rename = "AvgHeartRate")]
    pub avg_heart_rate: f64,
    #[serde(rename = "TotalSleepMinutes")]
    pub total_sleep_minutes: f64,
    #[serde(rename = "PM25")]
    pub pm25: f64,
    #[serde(rename = "PM10")]
    pub pm10: f64,
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    #[serde(rename = "Humidity")]
    pub humidity: f64,
}

impl HealthInput {
    /// Build from values given in [`FIELD_NAMES`] order
    pub fn from_vector(values: [f64; FEATURE_COUNT]) -> Self {
        let [total_steps, total_distance, very_active_minutes, calories, avg_heart_rate, total_sleep_minutes, pm25, pm10, temperature, humidity] =
            values;
        Self {
            total_steps,
            total_distance,
            very_active_minutes,
            calories,
            avg_heart_rate,
            total_sleep_minutes,
            pm25,
            pm10,
            temperature,
            humidity,
        }
    }

    /// Feature vector in model order
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.total_steps,
            self.total_distance,
            self.very_active_minutes,
            self.calories,
            self.avg_heart_rate,
            self.total_sleep_minutes,
            self.pm25,
            self.pm10,
            self.temperature,
            self.humidity,
        ]
    }

    /// The documented example request
    pub fn example() -> Self {
        Self::from_vector([10000.0, 7.5, 30.0, 2200.0, 75.0, 420.0, 85.0, 150.0, 28.0, 60.0])
    }

    /// Validate a decoded JSON body and extract the features.
    ///
    /// Every offending field is reported, in field order. Numbers are taken
    /// as-is, booleans count as 1.0/0.0 and strings are parsed as floats.
    /// `"nan"` and `"inf"` parse here and are refused later by the model.
    /// Keys outside [`FIELD_NAMES`] are ignored.
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = body.as_object().ok_or_else(|| {
            Error::validation(vec![FieldError::body(
                "Input should be a valid dictionary or object to extract fields from",
                "model_attributes_type",
            )])
        })?;

        let mut values = [0.0; FEATURE_COUNT];
        let mut errors = Vec::new();
        for (slot, field) in values.iter_mut().zip(FIELD_NAMES) {
            match object.get(field) {
                None => errors.push(FieldError::missing(field)),
                Some(value) => match parse_number(field, value) {
                    Ok(number) => *slot = number,
                    Err(err) => errors.push(err),
                },
            }
        }

        if errors.is_empty() {
            Ok(Self::from_vector(values))
        } else {
            Err(Error::validation(errors))
        }
    }
}

fn parse_number(field: &str, value: &Value) -> std::result::Result<f64, FieldError> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| FieldError::not_a_number(field)),
        Value::Bool(flag) => Ok(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| FieldError::unparsable_number(field)),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(FieldError::not_a_number(field)),
    }
}
