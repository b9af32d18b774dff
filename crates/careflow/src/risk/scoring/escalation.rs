use super::super::domain::{Condition, ContributingFactor, Symptom, VitalsSnapshot};
use super::rules::Tally;
use super::SCORE_CAP;

/// Outcome of a cross-signal check evaluated after the additive rules.
pub(crate) enum Escalation {
    /// Replace the running total regardless of its value.
    ForceScore {
        score: u32,
        factor: ContributingFactor,
        alert: String,
    },
    /// Explanatory alert only; the score is untouched.
    Alert(String),
}

type EscalationFn = fn(&VitalsSnapshot) -> Option<Escalation>;

const ESCALATIONS: [EscalationFn; 2] = [cardiac_emergency, asthma_exacerbation];

pub(crate) fn apply(vitals: &VitalsSnapshot, tally: Tally) -> (Tally, Vec<String>) {
    ESCALATIONS.iter().fold(
        (tally, Vec::new()),
        |(mut tally, mut alerts), escalation| {
            match escalation(vitals) {
                Some(Escalation::ForceScore {
                    score,
                    factor,
                    alert,
                }) => {
                    tally.score = score;
                    tally.factors.push(factor);
                    alerts.push(alert);
                }
                Some(Escalation::Alert(alert)) => alerts.push(alert),
                None => {}
            }
            (tally, alerts)
        },
    )
}

fn cardiac_emergency(vitals: &VitalsSnapshot) -> Option<Escalation> {
    if vitals.has_condition(Condition::HeartDisease) && vitals.has_symptom(Symptom::ChestPain) {
        Some(Escalation::ForceScore {
            score: SCORE_CAP,
            factor: ContributingFactor::new(
                "Chest pain with history of heart disease",
                SCORE_CAP as u8,
            ),
            alert: "EMERGENCY: chest pain with a history of heart disease. Call emergency services now."
                .to_string(),
        })
    } else {
        None
    }
}

fn asthma_exacerbation(vitals: &VitalsSnapshot) -> Option<Escalation> {
    if vitals.has_condition(Condition::Asthma) && vitals.has_symptom(Symptom::ShortnessOfBreath) {
        Some(Escalation::Alert(
            "Asthma history with shortness of breath: use your rescue inhaler and seek care if breathing does not improve."
                .to_string(),
        ))
    } else {
        None
    }
}
