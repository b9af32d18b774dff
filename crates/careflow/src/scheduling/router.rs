use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{AppointmentId, BookingRequest, NotificationId};
use super::service::{BookingError, BookingService};
use super::store::{AppointmentStore, NotificationStore, ProviderDirectory};
use crate::store::{PatientId, ProviderId, StoreError};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

type SharedBooking<A, N, P> = State<Arc<BookingService<A, N, P>>>;

/// Router builder exposing appointment, availability and notification endpoints.
pub fn booking_router<A, N, P>(service: Arc<BookingService<A, N, P>>) -> Router
where
    A: AppointmentStore + 'static,
    N: NotificationStore + 'static,
    P: ProviderDirectory + 'static,
{
    Router::new()
        .route("/api/v1/appointments", post(book_handler::<A, N, P>))
        .route(
            "/api/v1/appointments/:appointment_id",
            get(appointment_handler::<A, N, P>),
        )
        .route(
            "/api/v1/appointments/:appointment_id/cancel",
            post(cancel_handler::<A, N, P>),
        )
        .route(
            "/api/v1/appointments/:appointment_id/complete",
            post(complete_handler::<A, N, P>),
        )
        .route(
            "/api/v1/providers/:provider_id/availability",
            get(availability_handler::<A, N, P>),
        )
        .route(
            "/api/v1/patients/:patient_id/appointments",
            get(patient_appointments_handler::<A, N, P>),
        )
        .route(
            "/api/v1/patients/:patient_id/notifications",
            get(notifications_handler::<A, N, P>),
        )
        .route(
            "/api/v1/notifications/:notification_id/read",
            post(mark_read_handler::<A, N, P>),
        )
        .with_state(service)
}

fn error_response(error: BookingError) -> Response {
    let status = match &error {
        BookingError::SlotFull { .. } | BookingError::InvalidTransition { .. } => {
            StatusCode::CONFLICT
        }
        BookingError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        BookingError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        BookingError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn ok<T: serde::Serialize>(result: Result<T, BookingError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, axum::Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn book_handler<A, N, P>(
    State(service): SharedBooking<A, N, P>,
    axum::Json(request): axum::Json<BookingRequest>,
) -> Response
where
    A: AppointmentStore + 'static,
    N: NotificationStore + 'static,
    P: ProviderDirectory + 'static,
{
    match service.book(request).await {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn appointment_handler<A, N, P>(
    State(service): SharedBooking<A, N, P>,
    Path(appointment_id): Path<String>,
) -> Response
where
    A: AppointmentStore + 'static,
    N: NotificationStore + 'static,
    P: ProviderDirectory + 'static,
{
    ok(service.get(&AppointmentId(appointment_id)).await)
}

pub(crate) async fn cancel_handler<A, N, P>(
    State(service): SharedBooking<A, N, P>,
    Path(appointment_id): Path<String>,
) -> Response
where
    A: AppointmentStore + 'static,
    N: NotificationStore + 'static,
    P: ProviderDirectory + 'static,
{
    ok(service.cancel(&AppointmentId(appointment_id)).await)
}

pub(crate) async fn complete_handler<A, N, P>(
    State(service): SharedBooking<A, N, P>,
    Path(appointment_id): Path<String>,
) -> Response
where
    A: AppointmentStore + 'static,
    N: NotificationStore + 'static,
    P: ProviderDirectory + 'static,
{
    ok(service.complete(&AppointmentId(appointment_id)).await)
}

pub(crate) async fn availability_handler<A, N, P>(
    State(service): SharedBooking<A, N, P>,
    Path(provider_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Response
where
    A: AppointmentStore + 'static,
    N: NotificationStore + 'static,
    P: ProviderDirectory + 'static,
{
    ok(service
        .availability(&ProviderId(provider_id), query.date)
        .await)
}

pub(crate) async fn patient_appointments_handler<A, N, P>(
    State(service): SharedBooking<A, N, P>,
    Path(patient_id): Path<String>,
) -> Response
where
    A: AppointmentStore + 'static,
    N: NotificationStore + 'static,
    P: ProviderDirectory + 'static,
{
    ok(service.appointments_for_patient(&PatientId(patient_id)).await)
}

pub(crate) async fn notifications_handler<A, N, P>(
    State(service): SharedBooking<A, N, P>,
    Path(patient_id): Path<String>,
) -> Response
where
    A: AppointmentStore + 'static,
    N: NotificationStore + 'static,
    P: ProviderDirectory + 'static,
{
    ok(service.notifications_for(&PatientId(patient_id)).await)
}

pub(crate) async fn mark_read_handler<A, N, P>(
    State(service): SharedBooking<A, N, P>,
    Path(notification_id): Path<String>,
) -> Response
where
    A: AppointmentStore + 'static,
    N: NotificationStore + 'static,
    P: ProviderDirectory + 'static,
{
    ok(service
        .mark_notification_read(&NotificationId(notification_id))
        .await)
}
