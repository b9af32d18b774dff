use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::classifier::ClassifierState;
use super::intake::VitalsSubmission;
use super::repository::{AssessmentId, AssessmentRepository};
use super::service::{AssessmentServiceError, RiskAssessmentService};
use crate::narrative::TreatmentNarrator;
use crate::store::{PatientId, StoreError};

/// Inbound assessment payload: the patient plus the raw intake form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    pub patient_id: PatientId,
    #[serde(flatten)]
    pub vitals: VitalsSubmission,
}

/// Router builder exposing the risk assessment endpoints.
pub fn assessment_router<R, N>(service: Arc<RiskAssessmentService<R, N>>) -> Router
where
    R: AssessmentRepository + 'static,
    N: TreatmentNarrator + 'static,
{
    Router::new()
        .route("/api/v1/risk/assessments", post(assess_handler::<R, N>))
        .route(
            "/api/v1/risk/assessments/:assessment_id",
            get(assessment_handler::<R, N>),
        )
        .route(
            "/api/v1/patients/:patient_id/assessments",
            get(history_handler::<R, N>),
        )
        .route("/api/v1/risk/classifier", get(classifier_handler::<R, N>))
        .with_state(service)
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Store(StoreError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn assess_handler<R, N>(
    State(service): State<Arc<RiskAssessmentService<R, N>>>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: TreatmentNarrator + 'static,
{
    match service.assess(request.patient_id, request.vitals).await {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assessment_handler<R, N>(
    State(service): State<Arc<RiskAssessmentService<R, N>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: TreatmentNarrator + 'static,
{
    match service.get(&AssessmentId(assessment_id)).await {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<R, N>(
    State(service): State<Arc<RiskAssessmentService<R, N>>>,
    Path(patient_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: TreatmentNarrator + 'static,
{
    match service.history(&PatientId(patient_id)).await {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn classifier_handler<R, N>(
    State(service): State<Arc<RiskAssessmentService<R, N>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: TreatmentNarrator + 'static,
{
    let state = service.classifier_state();
    let payload = match &state {
        ClassifierState::Training { epoch, epochs } => {
            json!({ "state": state.label(), "epoch": epoch, "epochs": epochs })
        }
        ClassifierState::Failed(reason) => json!({ "state": state.label(), "reason": reason }),
        ClassifierState::Uninitialized | ClassifierState::Ready(_) => {
            json!({ "state": state.label() })
        }
    };
    (StatusCode::OK, axum::Json(payload)).into_response()
}
