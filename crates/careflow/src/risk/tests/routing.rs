use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::narrative::OfflineNarrator;
use crate::risk::classifier::ClassifierHandle;
use crate::risk::router::assessment_router;
use crate::risk::service::RiskAssessmentService;

fn router(classifier: ClassifierHandle) -> axum::Router {
    let (service, _) = build_service(classifier);
    assessment_router(Arc::new(service))
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).expect("encode payload")))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

fn crisis_payload() -> Value {
    json!({
        "patientId": "patient-001",
        "age": 58,
        "sex": "male",
        "systolicBP": 190,
        "diastolicBP": 125,
        "heartRate": 96,
        "temperature": 98.6,
        "temperatureUnit": "fahrenheit",
        "symptoms": ["Chest Pain"],
        "conditions": ["Heart Disease"],
    })
}

#[tokio::test]
async fn assessment_route_returns_created_record() {
    let response = router(ClassifierHandle::failed("offline"))
        .oneshot(post_json("/api/v1/risk/assessments", crisis_payload()))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["predictedTier"], "High");
    assert_eq!(body["confidence"], 99);
    assert_eq!(body["specialist"], "cardiology");
    assert_eq!(body["source"], "rule_fallback");
    assert_eq!(body["narrativeSource"], "deterministic");
    assert_eq!(body["systolicBP"], 190);
    assert_eq!(body["temperatureF"], 98.6);
    assert_eq!(body["factors"][0]["weight"], 99);
    assert!(body["alerts"][0]
        .as_str()
        .expect("alert text")
        .starts_with("EMERGENCY"));
}

#[tokio::test]
async fn invalid_vitals_are_unprocessable() {
    let mut payload = crisis_payload();
    payload["heartRate"] = json!(400);

    let response = router(ClassifierHandle::failed("offline"))
        .oneshot(post_json("/api/v1/risk/assessments", payload))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error text")
        .contains("heartRate"));
}

#[tokio::test]
async fn stored_assessments_are_readable_by_id_and_patient() {
    let (service, _) = build_service(ClassifierHandle::failed("offline"));
    let service = Arc::new(service);
    let record = service
        .assess(patient(), submission())
        .await
        .expect("assessment recorded");
    let app = assessment_router(service);

    let by_id = app
        .clone()
        .oneshot(get(&format!("/api/v1/risk/assessments/{}", record.id.0)))
        .await
        .expect("route responds");
    assert_eq!(by_id.status(), StatusCode::OK);
    assert_eq!(read_json_body(by_id).await["id"], record.id.0.as_str());

    let history = app
        .clone()
        .oneshot(get("/api/v1/patients/patient-001/assessments"))
        .await
        .expect("route responds");
    assert_eq!(history.status(), StatusCode::OK);
    let body = read_json_body(history).await;
    assert_eq!(body.as_array().expect("array").len(), 1);

    let missing = app
        .oneshot(get("/api/v1/risk/assessments/risk-missing"))
        .await
        .expect("route responds");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_outage_is_service_unavailable() {
    let service = RiskAssessmentService::new(
        Arc::new(UnavailableRepository),
        Arc::new(OfflineNarrator),
        ClassifierHandle::failed("offline"),
    );

    let response = assessment_router(Arc::new(service))
        .oneshot(post_json("/api/v1/risk/assessments", crisis_payload()))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn classifier_route_reports_lifecycle_state() {
    let response = router(ClassifierHandle::failed("cancelled"))
        .oneshot(get("/api/v1/risk/classifier"))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body, json!({ "state": "failed", "reason": "cancelled" }));
}
