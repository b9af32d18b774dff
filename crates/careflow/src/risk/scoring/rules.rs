use tracing::debug;

use super::super::domain::{
    Condition, ContributingFactor, Symptom, SymptomSeverity, VitalsSnapshot,
};

/// Score delta of one rule together with its breakdown entries. Both halves exist or
/// neither does, so the scalar score and the breakdown cannot drift apart.
pub(crate) struct Contribution {
    delta: u32,
    factors: Vec<ContributingFactor>,
}

impl Contribution {
    fn flat(delta: u32, label: String) -> Option<Self> {
        if delta == 0 {
            return None;
        }
        Some(Self {
            delta,
            factors: vec![ContributingFactor::new(label, delta.min(100) as u8)],
        })
    }

    fn itemized(delta: u32, factors: Vec<ContributingFactor>) -> Option<Self> {
        let factors: Vec<ContributingFactor> = factors
            .into_iter()
            .filter(|factor| factor.weight > 0)
            .collect();
        if delta == 0 || factors.is_empty() {
            return None;
        }
        Some(Self { delta, factors })
    }
}

pub(crate) type RuleFn = fn(&VitalsSnapshot, u32) -> Option<Contribution>;

/// A named scoring rule. `evaluate` receives the running score of the rules before it.
pub(crate) struct Rule {
    pub(crate) name: &'static str,
    pub(crate) evaluate: RuleFn,
}

/// Evaluation order matters only for the age amplifier, which reads the running score.
pub(crate) const RULES: [Rule; 10] = [
    Rule {
        name: "blood_pressure",
        evaluate: blood_pressure,
    },
    Rule {
        name: "heart_rate",
        evaluate: heart_rate,
    },
    Rule {
        name: "temperature",
        evaluate: temperature,
    },
    Rule {
        name: "age_amplifier",
        evaluate: age_amplifier,
    },
    Rule {
        name: "heart_disease",
        evaluate: heart_disease,
    },
    Rule {
        name: "hypertension",
        evaluate: hypertension,
    },
    Rule {
        name: "diabetes",
        evaluate: diabetes,
    },
    Rule {
        name: "asthma",
        evaluate: asthma,
    },
    Rule {
        name: "unlisted_conditions",
        evaluate: unlisted_conditions,
    },
    Rule {
        name: "symptoms",
        evaluate: symptoms,
    },
];

#[derive(Debug, Default)]
pub(crate) struct Tally {
    pub(crate) score: u32,
    pub(crate) factors: Vec<ContributingFactor>,
}

impl Tally {
    fn absorb(mut self, contribution: Option<Contribution>) -> Self {
        if let Some(contribution) = contribution {
            self.score += contribution.delta;
            self.factors.extend(contribution.factors);
        }
        self
    }
}

pub(crate) fn tally(vitals: &VitalsSnapshot) -> Tally {
    RULES.iter().fold(Tally::default(), |tally, rule| {
        let contribution = (rule.evaluate)(vitals, tally.score);
        if let Some(fired) = &contribution {
            debug!(rule = rule.name, delta = fired.delta, "scoring rule fired");
        }
        tally.absorb(contribution)
    })
}

fn blood_pressure(vitals: &VitalsSnapshot, _running: u32) -> Option<Contribution> {
    let (systolic, diastolic) = (vitals.systolic, vitals.diastolic);
    let reading = format!("{systolic}/{diastolic} mmHg");

    if systolic > 180 || diastolic > 120 {
        Contribution::flat(80, format!("Hypertensive crisis ({reading})"))
    } else if systolic > 140 || diastolic > 90 {
        Contribution::flat(40, format!("High blood pressure ({reading})"))
    } else if systolic < 90 || diastolic < 60 {
        Contribution::flat(40, format!("Low blood pressure ({reading})"))
    } else if systolic > 120 || diastolic > 80 {
        Contribution::flat(10, format!("Elevated blood pressure ({reading})"))
    } else {
        None
    }
}

fn heart_rate(vitals: &VitalsSnapshot, _running: u32) -> Option<Contribution> {
    let rate = vitals.heart_rate;

    if rate > 120 {
        Contribution::flat(50, format!("Severe tachycardia ({rate} bpm)"))
    } else if rate > 100 {
        Contribution::flat(20, format!("Tachycardia ({rate} bpm)"))
    } else if rate < 50 {
        Contribution::flat(75, format!("Critical bradycardia ({rate} bpm)"))
    } else if rate < 60 {
        Contribution::flat(15, format!("Bradycardia ({rate} bpm)"))
    } else {
        None
    }
}

fn temperature(vitals: &VitalsSnapshot, _running: u32) -> Option<Contribution> {
    let celsius = vitals.temperature_c;

    if celsius > 39.0 {
        Contribution::flat(60, format!("High fever ({celsius:.1} °C)"))
    } else if celsius > 37.5 {
        Contribution::flat(30, format!("Fever ({celsius:.1} °C)"))
    } else if celsius < 35.0 {
        Contribution::flat(60, format!("Hypothermia ({celsius:.1} °C)"))
    } else {
        None
    }
}

fn age_amplifier(vitals: &VitalsSnapshot, running: u32) -> Option<Contribution> {
    if vitals.age > 65 && running > 0 {
        Contribution::flat(10, format!("Age {} amplifies existing risk", vitals.age))
    } else {
        None
    }
}

fn heart_disease(vitals: &VitalsSnapshot, _running: u32) -> Option<Contribution> {
    if vitals.has_condition(Condition::HeartDisease) {
        Contribution::flat(30, "History of heart disease".to_string())
    } else {
        None
    }
}

fn hypertension(vitals: &VitalsSnapshot, _running: u32) -> Option<Contribution> {
    if !vitals.has_condition(Condition::Hypertension) {
        return None;
    }

    if vitals.blood_pressure_elevated() {
        Contribution::flat(20, "Hypertension with elevated blood pressure".to_string())
    } else {
        Contribution::flat(10, "Hypertension (currently controlled)".to_string())
    }
}

fn diabetes(vitals: &VitalsSnapshot, _running: u32) -> Option<Contribution> {
    if vitals.has_condition(Condition::Diabetes) {
        Contribution::flat(20, "Diabetes".to_string())
    } else {
        None
    }
}

fn asthma(vitals: &VitalsSnapshot, _running: u32) -> Option<Contribution> {
    if vitals.has_condition(Condition::Asthma) && vitals.has_breathing_symptom() {
        Contribution::flat(30, "Asthma with respiratory symptoms".to_string())
    } else {
        None
    }
}

fn unlisted_conditions(vitals: &VitalsSnapshot, _running: u32) -> Option<Contribution> {
    if vitals.has_unlisted_condition() {
        Contribution::flat(
            10,
            format!(
                "Other pre-existing condition: {}",
                vitals.other_conditions.join(", ")
            ),
        )
    } else {
        None
    }
}

/// Weight shown for each critical symptom in the breakdown. The score itself only
/// takes the flat critical increment once.
fn critical_symptom_weight(symptom: Symptom) -> u8 {
    match symptom {
        Symptom::ChestPain => 90,
        Symptom::ShortnessOfBreath => 85,
        Symptom::SevereHeadache => 70,
        Symptom::Dizziness => 60,
        _ => 0,
    }
}

fn symptoms(vitals: &VitalsSnapshot, _running: u32) -> Option<Contribution> {
    let critical: Vec<ContributingFactor> = vitals
        .symptoms
        .iter()
        .filter(|symptom| symptom.severity() == SymptomSeverity::Critical)
        .map(|symptom| {
            ContributingFactor::new(
                format!("{} (critical symptom)", symptom.label()),
                critical_symptom_weight(*symptom),
            )
        })
        .collect();

    if !critical.is_empty() {
        return Contribution::itemized(75, critical);
    }

    let moderate: Vec<&'static str> = vitals
        .symptoms
        .iter()
        .filter(|symptom| symptom.severity() == SymptomSeverity::Moderate)
        .map(|symptom| symptom.label())
        .collect();

    if moderate.is_empty() {
        None
    } else {
        Contribution::flat(30, format!("Moderate symptoms: {}", moderate.join(", ")))
    }
}
