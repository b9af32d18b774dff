use super::common::*;
use crate::risk::domain::{Condition, RiskTier, Specialist, Symptom, VitalsSnapshot};
use crate::risk::scoring::{RuleEngine, SCORE_CAP};

#[test]
fn normal_vitals_score_zero_and_low() {
    let outcome = RuleEngine::new().score(&normal_vitals());

    assert_eq!(outcome.score, 0);
    assert_eq!(outcome.tier, RiskTier::Low);
    assert!(outcome.factors.is_empty());
    assert!(outcome.alerts.is_empty());
    assert_eq!(outcome.specialist, Specialist::GeneralPractice);
    assert_eq!(outcome.prediction, "Low risk (rule score 0/99)");
}

#[test]
fn hypertensive_crisis_alone_reaches_high() {
    let outcome = RuleEngine::new().score(&crisis_vitals());

    assert_eq!(outcome.score, 80);
    assert_eq!(outcome.tier, RiskTier::High);
    assert_eq!(outcome.specialist, Specialist::Cardiology);
    assert_eq!(outcome.factors.len(), 1);
    assert!(outcome.factors[0].label.contains("190/125"));
}

#[test]
fn breakdown_is_sorted_by_weight_and_omits_zero_entries() {
    let vitals = VitalsSnapshot {
        age: 70,
        systolic: 150,
        diastolic: 95,
        heart_rate: 110,
        temperature_c: 38.0,
        ..vitals_with(
            &[Symptom::ChestPain, Symptom::Dizziness, Symptom::Cough],
            &[Condition::Diabetes],
        )
    };

    let outcome = RuleEngine::new().score(&vitals);

    assert_eq!(u32::from(outcome.score), SCORE_CAP);
    let weights: Vec<u8> = outcome.factors.iter().map(|factor| factor.weight).collect();
    assert_eq!(weights, vec![90, 60, 40, 30, 20, 20, 10]);
    assert!(weights.windows(2).all(|pair| pair[0] >= pair[1]));
    assert!(weights.iter().all(|weight| *weight > 0));
    assert!(outcome
        .factors
        .iter()
        .all(|factor| !factor.label.starts_with("Moderate")));
}

#[test]
fn chest_pain_with_heart_disease_forces_emergency() {
    let outcome =
        RuleEngine::new().score(&vitals_with(&[Symptom::ChestPain], &[Condition::HeartDisease]));

    assert_eq!(outcome.score, 99);
    assert_eq!(outcome.tier, RiskTier::High);
    assert_eq!(outcome.factors[0].weight, 99);
    assert_eq!(
        outcome.factors[0].label,
        "Chest pain with history of heart disease"
    );
    assert_eq!(outcome.alerts.len(), 1);
    assert!(outcome.alerts[0].starts_with("EMERGENCY"));
    assert_eq!(outcome.specialist, Specialist::Cardiology);
}

#[test]
fn asthma_with_shortness_of_breath_alerts_without_forcing_score() {
    let outcome = RuleEngine::new().score(&vitals_with(
        &[Symptom::ShortnessOfBreath],
        &[Condition::Asthma],
    ));

    assert_eq!(outcome.score, 99);
    assert_eq!(outcome.tier, RiskTier::High);
    assert_eq!(outcome.alerts.len(), 1);
    assert!(outcome.alerts[0].contains("rescue inhaler"));
    assert!(outcome.factors.iter().all(|factor| factor.weight != 99));
    assert_eq!(outcome.specialist, Specialist::Pulmonology);
}

#[test]
fn moderate_symptoms_land_in_medium() {
    let outcome = RuleEngine::new().score(&VitalsSnapshot {
        temperature_c: 38.2,
        ..vitals_with(&[Symptom::Fever, Symptom::Fatigue], &[])
    });

    assert_eq!(outcome.score, 60);
    assert_eq!(outcome.tier, RiskTier::Medium);
    assert!(outcome.recommendation.contains("within the next few days"));
}

#[test]
fn specialist_priority_prefers_cardiac_then_pulmonary() {
    let engine = RuleEngine::new();

    let diabetic_with_cough = vitals_with(&[Symptom::Cough], &[Condition::Diabetes]);
    assert_eq!(
        engine.score(&diabetic_with_cough).specialist,
        Specialist::Pulmonology
    );

    let diabetic_tachycardic = VitalsSnapshot {
        heart_rate: 105,
        ..vitals_with(&[Symptom::Dizziness], &[Condition::Diabetes])
    };
    assert_eq!(
        engine.score(&diabetic_tachycardic).specialist,
        Specialist::Cardiology
    );

    let dizzy = vitals_with(&[Symptom::Dizziness], &[]);
    assert_eq!(engine.score(&dizzy).specialist, Specialist::Neurology);

    let diabetic = vitals_with(&[], &[Condition::Diabetes]);
    assert_eq!(engine.score(&diabetic).specialist, Specialist::Endocrinology);
}

#[test]
fn unlisted_conditions_add_a_named_factor() {
    let vitals = VitalsSnapshot {
        other_conditions: vec!["Migraine".to_string()],
        ..normal_vitals()
    };

    let outcome = RuleEngine::new().score(&vitals);

    assert_eq!(outcome.score, 10);
    assert_eq!(
        outcome.factors[0].label,
        "Other pre-existing condition: Migraine"
    );
}
