use super::common::*;
use crate::risk::domain::{RiskTier, Symptom, TierSource, VitalsSnapshot};
use crate::risk::fusion::{fuse, rule_confidence, HIGH_RISK_CONFIDENCE_FLOOR};
use crate::risk::scoring::RuleEngine;

#[test]
fn rule_high_is_never_downgraded_by_classifier() {
    let outcome = RuleEngine::new().score(&crisis_vitals());

    let assessment = fuse(outcome, Some(prediction([0.9, 0.06, 0.04])));

    assert_eq!(assessment.tier, RiskTier::High);
    assert_eq!(assessment.confidence, 90);
    assert_eq!(assessment.source, TierSource::RuleOverride);
    assert_eq!(assessment.rule_tier, RiskTier::High);
}

#[test]
fn override_confidence_is_floored() {
    let outcome = RuleEngine::new().score(&crisis_vitals());

    let assessment = fuse(outcome, Some(prediction([0.5, 0.3, 0.2])));

    assert_eq!(assessment.tier, RiskTier::High);
    assert_eq!(assessment.confidence, HIGH_RISK_CONFIDENCE_FLOOR);
}

#[test]
fn agreeing_high_keeps_classifier_as_source() {
    let outcome = RuleEngine::new().score(&crisis_vitals());

    let assessment = fuse(outcome, Some(prediction([0.02, 0.03, 0.95])));

    assert_eq!(assessment.tier, RiskTier::High);
    assert_eq!(assessment.confidence, 95);
    assert_eq!(assessment.source, TierSource::Classifier);
}

#[test]
fn classifier_decides_below_high_but_explanation_stays_with_rules() {
    let vitals = VitalsSnapshot {
        temperature_c: 38.2,
        ..vitals_with(&[Symptom::Fever], &[])
    };
    let outcome = RuleEngine::new().score(&vitals);
    let factors = outcome.factors.clone();
    assert_eq!(outcome.tier, RiskTier::Medium);

    let assessment = fuse(outcome, Some(prediction([0.7, 0.2, 0.1])));

    assert_eq!(assessment.tier, RiskTier::Low);
    assert_eq!(assessment.confidence, 70);
    assert_eq!(assessment.source, TierSource::Classifier);
    assert_eq!(assessment.rule_tier, RiskTier::Medium);
    assert_eq!(assessment.factors, factors);
    assert_eq!(assessment.class_probabilities, Some([0.7, 0.2, 0.1]));
}

#[test]
fn missing_classifier_falls_back_to_rule_verdict() {
    let engine = RuleEngine::new();

    let high = fuse(engine.score(&crisis_vitals()), None);
    assert_eq!(high.tier, RiskTier::High);
    assert_eq!(high.confidence, 85);
    assert_eq!(high.source, TierSource::RuleFallback);
    assert!(high.class_probabilities.is_none());

    let low = fuse(engine.score(&normal_vitals()), None);
    assert_eq!(low.tier, RiskTier::Low);
    assert_eq!(low.confidence, 100);
}

#[test]
fn rule_confidence_tracks_tier() {
    let engine = RuleEngine::new();

    let medium = engine.score(&VitalsSnapshot {
        temperature_c: 38.2,
        ..vitals_with(&[Symptom::Fever], &[])
    });
    assert_eq!(rule_confidence(&medium), 70);

    let low_with_factor = engine.score(&vitals_with(&[Symptom::Cough], &[]));
    assert_eq!(low_with_factor.score, 30);
    assert_eq!(rule_confidence(&low_with_factor), 70);

    let capped = engine.score(&VitalsSnapshot {
        heart_rate: 130,
        ..crisis_vitals()
    });
    assert_eq!(rule_confidence(&capped), 99);
}
