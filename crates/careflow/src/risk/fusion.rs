use super::classifier::ClassifierPrediction;
use super::domain::{RiskAssessment, RiskTier, TierSource};
use super::scoring::RuleOutcome;

/// Minimum confidence reported whenever the rule engine alone concludes High.
pub const HIGH_RISK_CONFIDENCE_FLOOR: u8 = 85;

/// Confidence attached to a rule-only verdict when the classifier is unavailable.
pub fn rule_confidence(outcome: &RuleOutcome) -> u8 {
    match outcome.tier {
        RiskTier::High => outcome.score.max(HIGH_RISK_CONFIDENCE_FLOOR),
        RiskTier::Medium => 70,
        RiskTier::Low => (100 - outcome.score.min(100)).clamp(60, 100),
    }
}

/// Combine the rule verdict with an optional classifier verdict.
///
/// The classifier decides tier and confidence by default while the explanation always
/// comes from the rule engine. A rule-engine High cannot be downgraded.
pub fn fuse(outcome: RuleOutcome, prediction: Option<ClassifierPrediction>) -> RiskAssessment {
    let (tier, confidence, source, class_probabilities) = match prediction {
        Some(prediction) if outcome.tier == RiskTier::High => {
            let source = if prediction.tier == RiskTier::High {
                TierSource::Classifier
            } else {
                TierSource::RuleOverride
            };
            (
                RiskTier::High,
                prediction.confidence.max(HIGH_RISK_CONFIDENCE_FLOOR),
                source,
                Some(prediction.probabilities),
            )
        }
        Some(prediction) => (
            prediction.tier,
            prediction.confidence,
            TierSource::Classifier,
            Some(prediction.probabilities),
        ),
        None => (
            outcome.tier,
            rule_confidence(&outcome),
            TierSource::RuleFallback,
            None,
        ),
    };

    RiskAssessment {
        tier,
        confidence,
        rule_score: outcome.score,
        rule_tier: outcome.tier,
        factors: outcome.factors,
        alerts: outcome.alerts,
        prediction: outcome.prediction,
        recommendation: outcome.recommendation,
        specialist: outcome.specialist,
        source,
        class_probabilities,
    }
}
