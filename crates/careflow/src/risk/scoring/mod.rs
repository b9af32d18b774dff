mod escalation;
mod rules;
mod specialist;

pub use specialist::{recommend_specialist, recommendation_for};

use super::domain::{ContributingFactor, RiskTier, Specialist, VitalsSnapshot};
use serde::{Deserialize, Serialize};

/// Upper bound of the rule score. Running totals above it are clipped.
pub const SCORE_CAP: u32 = 99;

/// Stateless weighted-factor engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, vitals: &VitalsSnapshot) -> RuleOutcome {
        let tally = rules::tally(vitals);
        let (tally, alerts) = escalation::apply(vitals, tally);

        let score = tally.score.min(SCORE_CAP) as u8;
        let tier = RiskTier::from_score(score);

        let mut factors = tally.factors;
        factors.retain(|factor| factor.weight > 0);
        factors.sort_by(|left, right| right.weight.cmp(&left.weight));

        let specialist = recommend_specialist(vitals);

        RuleOutcome {
            score,
            tier,
            prediction: format!("{} risk (rule score {score}/{SCORE_CAP})", tier.label()),
            recommendation: recommendation_for(tier, specialist),
            factors,
            alerts,
            specialist,
        }
    }
}

/// Rule engine verdict plus the explainability trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub score: u8,
    pub tier: RiskTier,
    pub factors: Vec<ContributingFactor>,
    pub alerts: Vec<String>,
    pub specialist: Specialist,
    pub prediction: String,
    pub recommendation: String,
}
