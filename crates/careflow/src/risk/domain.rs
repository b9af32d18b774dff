use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

impl BiologicalSex {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Whether a reported symptom triggers the flat critical increment or the moderate one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymptomSeverity {
    Critical,
    Moderate,
}

/// Fixed symptom vocabulary offered by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    ChestPain,
    ShortnessOfBreath,
    SevereHeadache,
    Dizziness,
    Fever,
    Cough,
    Fatigue,
    Nausea,
}

impl Symptom {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::ChestPain,
            Self::ShortnessOfBreath,
            Self::SevereHeadache,
            Self::Dizziness,
            Self::Fever,
            Self::Cough,
            Self::Fatigue,
            Self::Nausea,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ChestPain => "Chest Pain",
            Self::ShortnessOfBreath => "Shortness of Breath",
            Self::SevereHeadache => "Severe Headache",
            Self::Dizziness => "Dizziness",
            Self::Fever => "Fever",
            Self::Cough => "Cough",
            Self::Fatigue => "Fatigue",
            Self::Nausea => "Nausea",
        }
    }

    pub const fn severity(self) -> SymptomSeverity {
        match self {
            Self::ChestPain | Self::ShortnessOfBreath | Self::SevereHeadache | Self::Dizziness => {
                SymptomSeverity::Critical
            }
            Self::Fever | Self::Cough | Self::Fatigue | Self::Nausea => SymptomSeverity::Moderate,
        }
    }

    pub const fn is_breathing_related(self) -> bool {
        matches!(self, Self::ShortnessOfBreath | Self::Cough)
    }

    /// Accepts either the display label or the snake_case key, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize_key(raw);
        Self::ordered()
            .into_iter()
            .find(|symptom| normalize_key(symptom.label()) == key)
    }
}

/// Listed pre-existing conditions. Anything else is carried as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    HeartDisease,
    Hypertension,
    Diabetes,
    Asthma,
}

impl Condition {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::HeartDisease,
            Self::Hypertension,
            Self::Diabetes,
            Self::Asthma,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HeartDisease => "Heart Disease",
            Self::Hypertension => "Hypertension",
            Self::Diabetes => "Diabetes",
            Self::Asthma => "Asthma",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::HeartDisease => "heart_disease",
            Self::Hypertension => "hypertension",
            Self::Diabetes => "diabetes",
            Self::Asthma => "asthma",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize_key(raw);
        Self::ordered()
            .into_iter()
            .find(|condition| condition.key() == key)
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|ch| if ch == ' ' || ch == '-' { '_' } else { ch })
        .collect()
}

/// Validated vitals captured for a single assessment. Temperature is held in Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    pub age: u8,
    pub sex: BiologicalSex,
    pub systolic: u16,
    pub diastolic: u16,
    pub heart_rate: u16,
    pub temperature_c: f64,
    pub symptoms: BTreeSet<Symptom>,
    pub conditions: BTreeSet<Condition>,
    pub other_conditions: Vec<String>,
}

impl VitalsSnapshot {
    pub fn has_symptom(&self, symptom: Symptom) -> bool {
        self.symptoms.contains(&symptom)
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }

    pub fn has_unlisted_condition(&self) -> bool {
        !self.other_conditions.is_empty()
    }

    pub fn has_breathing_symptom(&self) -> bool {
        self.symptoms
            .iter()
            .any(|symptom| symptom.is_breathing_related())
    }

    pub fn temperature_f(&self) -> f64 {
        celsius_to_fahrenheit(self.temperature_c)
    }

    /// Above the normal band, i.e. anything that scores on the blood pressure rule
    /// without being hypotensive.
    pub fn blood_pressure_elevated(&self) -> bool {
        self.systolic > 120 || self.diastolic > 80
    }
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Final stratification bucket. Ordering follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }

    pub const fn from_score(score: u8) -> Self {
        if score >= 70 {
            Self::High
        } else if score >= 35 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Low),
            1 => Some(Self::Medium),
            2 => Some(Self::High),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// One named entry of the explainability breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributingFactor {
    pub label: String,
    pub weight: u8,
}

impl ContributingFactor {
    pub fn new(label: impl Into<String>, weight: u8) -> Self {
        Self {
            label: label.into(),
            weight: weight.min(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialist {
    Cardiology,
    Pulmonology,
    Endocrinology,
    Neurology,
    GeneralPractice,
}

impl Specialist {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cardiology => "Cardiologist",
            Self::Pulmonology => "Pulmonologist",
            Self::Endocrinology => "Endocrinologist",
            Self::Neurology => "Neurologist",
            Self::GeneralPractice => "General Practitioner",
        }
    }
}

/// Which engine decided the final tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierSource {
    Classifier,
    RuleOverride,
    RuleFallback,
}

/// Fused result of one assessment. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    pub confidence: u8,
    pub rule_score: u8,
    pub rule_tier: RiskTier,
    pub factors: Vec<ContributingFactor>,
    pub alerts: Vec<String>,
    pub prediction: String,
    pub recommendation: String,
    pub specialist: Specialist,
    pub source: TierSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_probabilities: Option<[f32; 3]>,
}
