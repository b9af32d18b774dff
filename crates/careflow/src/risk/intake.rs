use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{
    fahrenheit_to_celsius, BiologicalSex, Condition, Symptom, VitalsSnapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Raw vitals as collected by the intake form. Every field is optional on the wire so
/// that missing values surface as validation errors instead of parse failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsSubmission {
    pub age: Option<i64>,
    pub sex: Option<String>,
    #[serde(rename = "systolicBP")]
    pub systolic_bp: Option<i64>,
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: Option<i64>,
    pub heart_rate: Option<i64>,
    pub temperature: Option<f64>,
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

/// Validation errors raised before any scoring happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    Missing(&'static str),
    #[error("{field} value {value} outside accepted range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("unrecognized sex '{0}'")]
    UnknownSex(String),
    #[error("unrecognized symptom '{0}'")]
    UnknownSymptom(String),
    #[error("systolic pressure {systolic} must exceed diastolic pressure {diastolic}")]
    InvertedBloodPressure { systolic: u16, diastolic: u16 },
}

/// Inclusive bounds accepted by the intake guard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalsLimits {
    pub age: (f64, f64),
    pub systolic: (f64, f64),
    pub diastolic: (f64, f64),
    pub heart_rate: (f64, f64),
    pub temperature_c: (f64, f64),
}

impl Default for VitalsLimits {
    fn default() -> Self {
        Self {
            age: (1.0, 120.0),
            systolic: (50.0, 260.0),
            diastolic: (30.0, 160.0),
            heart_rate: (20.0, 250.0),
            temperature_c: (30.0, 45.0),
        }
    }
}

/// Guard responsible for producing `VitalsSnapshot` instances.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    limits: VitalsLimits,
}

impl IntakeGuard {
    /// Convert an inbound submission into a validated snapshot.
    pub fn snapshot_from_submission(
        &self,
        submission: VitalsSubmission,
    ) -> Result<VitalsSnapshot, ValidationError> {
        let age = require("age", submission.age)?;
        let age = within("age", age as f64, self.limits.age)? as u8;

        let sex_raw = submission.sex.ok_or(ValidationError::Missing("sex"))?;
        let sex = BiologicalSex::parse(&sex_raw).ok_or(ValidationError::UnknownSex(sex_raw))?;

        let systolic = require("systolicBP", submission.systolic_bp)?;
        let systolic = within("systolicBP", systolic as f64, self.limits.systolic)? as u16;
        let diastolic = require("diastolicBP", submission.diastolic_bp)?;
        let diastolic = within("diastolicBP", diastolic as f64, self.limits.diastolic)? as u16;
        if systolic <= diastolic {
            return Err(ValidationError::InvertedBloodPressure {
                systolic,
                diastolic,
            });
        }

        let heart_rate = require("heartRate", submission.heart_rate)?;
        let heart_rate = within("heartRate", heart_rate as f64, self.limits.heart_rate)? as u16;

        let temperature = require("temperature", submission.temperature)?;
        let temperature_c = match submission.temperature_unit {
            TemperatureUnit::Celsius => temperature,
            TemperatureUnit::Fahrenheit => fahrenheit_to_celsius(temperature),
        };
        let temperature_c = within("temperature", temperature_c, self.limits.temperature_c)?;

        let mut symptoms = BTreeSet::new();
        for raw in submission.symptoms {
            if raw.trim().is_empty() {
                continue;
            }
            let symptom = Symptom::parse(&raw).ok_or(ValidationError::UnknownSymptom(raw))?;
            symptoms.insert(symptom);
        }

        let mut conditions = BTreeSet::new();
        let mut other_conditions = Vec::new();
        for raw in submission.conditions {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            match Condition::parse(trimmed) {
                Some(condition) => {
                    conditions.insert(condition);
                }
                None => {
                    if !other_conditions.iter().any(|known: &String| known == trimmed) {
                        other_conditions.push(trimmed.to_string());
                    }
                }
            }
        }

        Ok(VitalsSnapshot {
            age,
            sex,
            systolic,
            diastolic,
            heart_rate,
            temperature_c,
            symptoms,
            conditions,
            other_conditions,
        })
    }
}

fn require<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing(field))
}

fn within(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}
