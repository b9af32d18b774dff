use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::classifier::{ClassifierHandle, ClassifierState};
use super::domain::{RiskAssessment, RiskTier, VitalsSnapshot};
use super::features::encode;
use super::fusion::fuse;
use super::intake::{IntakeGuard, ValidationError, VitalsSubmission};
use super::repository::{AssessmentId, AssessmentRecord, AssessmentRepository};
use super::scoring::RuleEngine;
use crate::narrative::{NarrativeRequest, NarrativeSource, TreatmentNarrator};
use crate::store::{PatientId, StoreError};

/// Service composing intake validation, both scoring engines, fusion and persistence.
pub struct RiskAssessmentService<R, N> {
    guard: IntakeGuard,
    engine: RuleEngine,
    classifier: ClassifierHandle,
    repository: Arc<R>,
    narrator: Arc<N>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("risk-{id:06}"))
}

impl<R, N> RiskAssessmentService<R, N>
where
    R: AssessmentRepository + 'static,
    N: TreatmentNarrator + 'static,
{
    pub fn new(repository: Arc<R>, narrator: Arc<N>, classifier: ClassifierHandle) -> Self {
        Self::with_guard(IntakeGuard::default(), repository, narrator, classifier)
    }

    pub fn with_guard(
        guard: IntakeGuard,
        repository: Arc<R>,
        narrator: Arc<N>,
        classifier: ClassifierHandle,
    ) -> Self {
        Self {
            guard,
            engine: RuleEngine::new(),
            classifier,
            repository,
            narrator,
        }
    }

    pub fn classifier_state(&self) -> ClassifierState {
        self.classifier.state()
    }

    /// Score a validated snapshot without persisting anything.
    pub async fn evaluate(&self, vitals: &VitalsSnapshot) -> RiskAssessment {
        let outcome = self.engine.score(vitals);

        let prediction = match self.classifier.ready().await {
            Ok(classifier) => Some(classifier.predict(&encode(vitals))),
            Err(error) => {
                warn!(%error, "classifier unavailable, using rule engine verdict");
                None
            }
        };

        fuse(outcome, prediction)
    }

    /// Validate, score and persist a new assessment for the patient.
    pub async fn assess(
        &self,
        patient_id: PatientId,
        submission: VitalsSubmission,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let vitals = self.guard.snapshot_from_submission(submission)?;
        let assessment = self.evaluate(&vitals).await;
        let (narrative, narrative_source) = self.narrate(&assessment).await;

        let record = AssessmentRecord::new(
            next_assessment_id(),
            patient_id,
            &vitals,
            assessment,
            narrative,
            narrative_source,
            Utc::now(),
        );

        let stored = self.repository.insert(record).await?;
        info!(
            assessment_id = %stored.id.0,
            patient_id = %stored.patient_id.0,
            tier = stored.predicted_tier.label(),
            confidence = stored.confidence,
            source = ?stored.source,
            "risk assessment recorded"
        );
        Ok(stored)
    }

    async fn narrate(&self, assessment: &RiskAssessment) -> (String, NarrativeSource) {
        let request = NarrativeRequest::from(assessment);
        match self.narrator.elaborate(&request).await {
            Ok(text) if !text.trim().is_empty() => (text, NarrativeSource::Generated),
            Ok(_) => {
                warn!("narrative service returned empty text, using deterministic recommendation");
                (assessment.recommendation.clone(), NarrativeSource::Deterministic)
            }
            Err(error) => {
                warn!(%error, "narrative service failed, using deterministic recommendation");
                (assessment.recommendation.clone(), NarrativeSource::Deterministic)
            }
        }
    }

    pub async fn get(&self, id: &AssessmentId) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(id)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(record)
    }

    /// Assessments for the patient, newest first.
    pub async fn history(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<AssessmentRecord>, AssessmentServiceError> {
        let mut records = self.repository.for_patient(patient_id).await?;
        records.sort_by(|left, right| {
            right
                .timestamp
                .cmp(&left.timestamp)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(records)
    }

    pub async fn latest_tier(
        &self,
        patient_id: &PatientId,
    ) -> Result<Option<RiskTier>, AssessmentServiceError> {
        Ok(self
            .history(patient_id)
            .await?
            .first()
            .map(|record| record.predicted_tier))
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
