//! Fixed-width numeric encoding of a vitals snapshot.
//!
//! Layout: `[age, sex, systolic, diastolic, heart_rate, temperature]` min-max normalized,
//! followed by one slot per symptom in vocabulary order, one slot per listed condition,
//! and a final flag for unlisted conditions. Values outside the clinical bounds are not
//! clamped.

use super::domain::{BiologicalSex, Condition, Symptom, VitalsSnapshot};

const VITAL_FEATURES: usize = 6;
const SYMPTOM_FEATURES: usize = 8;
const CONDITION_FEATURES: usize = 4;

pub const FEATURE_WIDTH: usize = VITAL_FEATURES + SYMPTOM_FEATURES + CONDITION_FEATURES + 1;

pub type FeatureVector = [f32; FEATURE_WIDTH];

/// Clinical bounds used for min-max normalization.
pub const AGE_BOUNDS: (f64, f64) = (18.0, 90.0);
pub const SYSTOLIC_BOUNDS: (f64, f64) = (90.0, 180.0);
pub const DIASTOLIC_BOUNDS: (f64, f64) = (60.0, 120.0);
pub const HEART_RATE_BOUNDS: (f64, f64) = (40.0, 120.0);
pub const TEMPERATURE_BOUNDS: (f64, f64) = (35.0, 41.0);

fn normalize(value: f64, (min, max): (f64, f64)) -> f32 {
    ((value - min) / (max - min)) as f32
}

pub fn encode(vitals: &VitalsSnapshot) -> FeatureVector {
    let mut features = [0.0; FEATURE_WIDTH];

    features[0] = normalize(f64::from(vitals.age), AGE_BOUNDS);
    features[1] = match vitals.sex {
        BiologicalSex::Male => 1.0,
        BiologicalSex::Female => 0.0,
    };
    features[2] = normalize(f64::from(vitals.systolic), SYSTOLIC_BOUNDS);
    features[3] = normalize(f64::from(vitals.diastolic), DIASTOLIC_BOUNDS);
    features[4] = normalize(f64::from(vitals.heart_rate), HEART_RATE_BOUNDS);
    features[5] = normalize(vitals.temperature_c, TEMPERATURE_BOUNDS);

    for (offset, symptom) in Symptom::ordered().into_iter().enumerate() {
        if vitals.has_symptom(symptom) {
            features[VITAL_FEATURES + offset] = 1.0;
        }
    }

    let condition_base = VITAL_FEATURES + SYMPTOM_FEATURES;
    for (offset, condition) in Condition::ordered().into_iter().enumerate() {
        if vitals.has_condition(condition) {
            features[condition_base + offset] = 1.0;
        }
    }

    if vitals.has_unlisted_condition() {
        features[FEATURE_WIDTH - 1] = 1.0;
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn snapshot() -> VitalsSnapshot {
        VitalsSnapshot {
            age: 54,
            sex: BiologicalSex::Female,
            systolic: 135,
            diastolic: 90,
            heart_rate: 80,
            temperature_c: 38.0,
            symptoms: BTreeSet::from([Symptom::Cough, Symptom::ChestPain]),
            conditions: BTreeSet::from([Condition::Asthma]),
            other_conditions: vec!["Migraine".to_string()],
        }
    }

    #[test]
    fn width_covers_vitals_vocabularies_and_flag() {
        assert_eq!(FEATURE_WIDTH, 19);
    }

    #[test]
    fn normalizes_vitals_against_clinical_bounds() {
        let features = encode(&snapshot());
        assert!((features[0] - 0.5).abs() < 1e-6);
        assert_eq!(features[1], 0.0);
        assert!((features[2] - 0.5).abs() < 1e-6);
        assert!((features[3] - 0.5).abs() < 1e-6);
        assert!((features[4] - 0.5).abs() < 1e-6);
        assert!((features[5] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn one_hot_slots_follow_vocabulary_order() {
        let features = encode(&snapshot());
        assert_eq!(features[6], 1.0, "chest pain");
        assert_eq!(features[7], 0.0);
        assert_eq!(features[11], 1.0, "cough");
        assert_eq!(features[17], 1.0, "asthma");
        assert_eq!(features[18], 1.0, "unlisted condition");
    }

    #[test]
    fn out_of_bounds_values_are_not_clamped() {
        let mut vitals = snapshot();
        vitals.systolic = 200;
        vitals.heart_rate = 30;
        let features = encode(&vitals);
        assert!(features[2] > 1.0);
        assert!(features[4] < 0.0);
    }

    #[test]
    fn encoding_is_bit_identical_for_identical_input() {
        let first = encode(&snapshot());
        let second = encode(&snapshot().clone());
        let first_bits: Vec<u32> = first.iter().map(|value| value.to_bits()).collect();
        let second_bits: Vec<u32> = second.iter().map(|value| value.to_bits()).collect();
        assert_eq!(first_bits, second_bits);
    }
}
