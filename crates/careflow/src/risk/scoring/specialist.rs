use super::super::domain::{Condition, RiskTier, Specialist, Symptom, VitalsSnapshot};

fn cardiac_signal(vitals: &VitalsSnapshot) -> bool {
    vitals.systolic > 140
        || vitals.diastolic > 90
        || vitals.heart_rate > 100
        || vitals.heart_rate < 60
        || vitals.has_symptom(Symptom::ChestPain)
        || vitals.has_condition(Condition::HeartDisease)
}

fn pulmonary_signal(vitals: &VitalsSnapshot) -> bool {
    vitals.has_condition(Condition::Asthma) || vitals.has_breathing_symptom()
}

fn endocrine_signal(vitals: &VitalsSnapshot) -> bool {
    vitals.has_condition(Condition::Diabetes)
}

fn neurological_signal(vitals: &VitalsSnapshot) -> bool {
    vitals.has_symptom(Symptom::SevereHeadache) || vitals.has_symptom(Symptom::Dizziness)
}

/// Walks the signal families in priority order; the first family present wins.
pub fn recommend_specialist(vitals: &VitalsSnapshot) -> Specialist {
    const TREE: [(fn(&VitalsSnapshot) -> bool, Specialist); 4] = [
        (cardiac_signal, Specialist::Cardiology),
        (pulmonary_signal, Specialist::Pulmonology),
        (endocrine_signal, Specialist::Endocrinology),
        (neurological_signal, Specialist::Neurology),
    ];

    TREE.iter()
        .find(|(signal, _)| signal(vitals))
        .map(|(_, specialist)| *specialist)
        .unwrap_or(Specialist::GeneralPractice)
}

pub fn recommendation_for(tier: RiskTier, specialist: Specialist) -> String {
    match tier {
        RiskTier::High => format!(
            "Seek immediate medical attention. Go to the nearest emergency department or arrange an urgent visit with a {}.",
            specialist.label()
        ),
        RiskTier::Medium => format!(
            "Book a consultation with a {} within the next few days and record your vitals daily until then.",
            specialist.label()
        ),
        RiskTier::Low => format!(
            "Your readings are in a low-risk range. Keep up healthy habits and mention any changes to your {} at your next routine visit.",
            specialist.label()
        ),
    }
}
