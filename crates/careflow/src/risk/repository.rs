use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    BiologicalSex, ContributingFactor, RiskAssessment, RiskTier, Specialist, Symptom, TierSource,
    VitalsSnapshot,
};
use crate::narrative::NarrativeSource;
use crate::store::{PatientId, StoreError};

/// Identifier wrapper for stored assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub String);

/// Immutable audit record of one assessment as persisted in the remote collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub patient_id: PatientId,
    pub age: u8,
    pub sex: BiologicalSex,
    #[serde(rename = "systolicBP")]
    pub systolic_bp: u16,
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: u16,
    pub heart_rate: u16,
    #[serde(rename = "temperatureF")]
    pub temperature_f: f64,
    pub symptoms: Vec<Symptom>,
    pub conditions: Vec<String>,
    pub predicted_tier: RiskTier,
    pub confidence: u8,
    pub factors: Vec<ContributingFactor>,
    pub recommendation: String,
    pub specialist: Specialist,
    pub source: TierSource,
    pub rule_score: u8,
    pub prediction: String,
    pub alerts: Vec<String>,
    pub narrative: String,
    pub narrative_source: NarrativeSource,
    pub timestamp: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn new(
        id: AssessmentId,
        patient_id: PatientId,
        vitals: &VitalsSnapshot,
        assessment: RiskAssessment,
        narrative: String,
        narrative_source: NarrativeSource,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut conditions: Vec<String> = vitals
            .conditions
            .iter()
            .map(|condition| condition.key().to_string())
            .collect();
        conditions.extend(vitals.other_conditions.iter().cloned());

        Self {
            id,
            patient_id,
            age: vitals.age,
            sex: vitals.sex,
            systolic_bp: vitals.systolic,
            diastolic_bp: vitals.diastolic,
            heart_rate: vitals.heart_rate,
            temperature_f: (vitals.temperature_f() * 10.0).round() / 10.0,
            symptoms: vitals.symptoms.iter().copied().collect(),
            conditions,
            predicted_tier: assessment.tier,
            confidence: assessment.confidence,
            factors: assessment.factors,
            recommendation: assessment.recommendation,
            specialist: assessment.specialist,
            source: assessment.source,
            rule_score: assessment.rule_score,
            prediction: assessment.prediction,
            alerts: assessment.alerts,
            narrative,
            narrative_source,
            timestamp,
        }
    }
}

/// Storage abstraction over the remote assessment collection.
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    async fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, StoreError>;
    async fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, StoreError>;
    async fn for_patient(&self, patient_id: &PatientId)
        -> Result<Vec<AssessmentRecord>, StoreError>;
}
