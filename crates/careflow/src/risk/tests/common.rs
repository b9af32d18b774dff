use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::narrative::{NarrativeError, NarrativeRequest, OfflineNarrator, TreatmentNarrator};
use crate::risk::classifier::{ClassifierHandle, ClassifierPrediction};
use crate::risk::domain::{BiologicalSex, Condition, Symptom, VitalsSnapshot};
use crate::risk::intake::{TemperatureUnit, VitalsSubmission};
use crate::risk::repository::{AssessmentId, AssessmentRecord, AssessmentRepository};
use crate::risk::service::RiskAssessmentService;
use crate::store::memory::InMemoryAssessmentRepository;
use crate::store::{PatientId, StoreError};

pub(super) fn normal_vitals() -> VitalsSnapshot {
    VitalsSnapshot {
        age: 40,
        sex: BiologicalSex::Female,
        systolic: 115,
        diastolic: 75,
        heart_rate: 72,
        temperature_c: 36.8,
        symptoms: BTreeSet::new(),
        conditions: BTreeSet::new(),
        other_conditions: Vec::new(),
    }
}

pub(super) fn vitals_with(
    symptoms: &[Symptom],
    conditions: &[Condition],
) -> VitalsSnapshot {
    VitalsSnapshot {
        symptoms: symptoms.iter().copied().collect(),
        conditions: conditions.iter().copied().collect(),
        ..normal_vitals()
    }
}

pub(super) fn crisis_vitals() -> VitalsSnapshot {
    VitalsSnapshot {
        systolic: 190,
        diastolic: 125,
        ..normal_vitals()
    }
}

pub(super) fn submission() -> VitalsSubmission {
    VitalsSubmission {
        age: Some(40),
        sex: Some("female".to_string()),
        systolic_bp: Some(115),
        diastolic_bp: Some(75),
        heart_rate: Some(72),
        temperature: Some(36.8),
        temperature_unit: TemperatureUnit::Celsius,
        symptoms: Vec::new(),
        conditions: Vec::new(),
    }
}

pub(super) fn crisis_submission() -> VitalsSubmission {
    VitalsSubmission {
        systolic_bp: Some(190),
        diastolic_bp: Some(125),
        ..submission()
    }
}

/// Classifier verdict with the given class distribution (Low, Medium, High).
pub(super) fn prediction(probabilities: [f32; 3]) -> ClassifierPrediction {
    ClassifierPrediction::from_probabilities(probabilities)
}

pub(super) fn patient() -> PatientId {
    PatientId("patient-001".to_string())
}

pub(super) fn build_service(
    classifier: ClassifierHandle,
) -> (
    RiskAssessmentService<InMemoryAssessmentRepository, OfflineNarrator>,
    Arc<InMemoryAssessmentRepository>,
) {
    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let service =
        RiskAssessmentService::new(repository.clone(), Arc::new(OfflineNarrator), classifier);
    (service, repository)
}

pub(super) struct ScriptedNarrator(pub(super) String);

#[async_trait]
impl TreatmentNarrator for ScriptedNarrator {
    async fn elaborate(&self, request: &NarrativeRequest) -> Result<String, NarrativeError> {
        Ok(format!("{} ({})", self.0, request.specialist.label()))
    }
}

pub(super) struct BlankNarrator;

#[async_trait]
impl TreatmentNarrator for BlankNarrator {
    async fn elaborate(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        Ok("   ".to_string())
    }
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl AssessmentRepository for UnavailableRepository {
    async fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    async fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    async fn for_patient(
        &self,
        _patient_id: &PatientId,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
