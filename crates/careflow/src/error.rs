use crate::config::ConfigError;
use crate::risk::{AssessmentServiceError, DatasetError, TrainingError, ValidationError};
use crate::scheduling::BookingError;
use crate::store::StoreError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Validation(ValidationError),
    Dataset(DatasetError),
    Training(TrainingError),
    Assessment(AssessmentServiceError),
    Booking(BookingError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Validation(err) => write!(f, "invalid vitals: {}", err),
            AppError::Dataset(err) => write!(f, "training dataset error: {}", err),
            AppError::Training(err) => write!(f, "classifier training error: {}", err),
            AppError::Assessment(err) => write!(f, "assessment error: {}", err),
            AppError::Booking(err) => write!(f, "booking error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::Dataset(err) => Some(err),
            AppError::Training(err) => Some(err),
            AppError::Assessment(err) => Some(err),
            AppError::Booking(err) => Some(err),
        }
    }
}

fn store_status(error: &StoreError) -> StatusCode {
    match error {
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Conflict => StatusCode::CONFLICT,
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::Assessment(AssessmentServiceError::Validation(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Assessment(AssessmentServiceError::Store(err)) => store_status(err),
            AppError::Booking(BookingError::SlotFull { .. })
            | AppError::Booking(BookingError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            AppError::Booking(BookingError::Store(err)) => store_status(err),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Dataset(_)
            | AppError::Training(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DatasetError> for AppError {
    fn from(value: DatasetError) -> Self {
        Self::Dataset(value)
    }
}

impl From<TrainingError> for AppError {
    fn from(value: TrainingError) -> Self {
        Self::Training(value)
    }
}

impl From<AssessmentServiceError> for AppError {
    fn from(value: AssessmentServiceError) -> Self {
        Self::Assessment(value)
    }
}

impl From<BookingError> for AppError {
    fn from(value: BookingError) -> Self {
        Self::Booking(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::SlotLabel;
    use chrono::NaiveDate;

    #[test]
    fn validation_failures_map_to_unprocessable_entity() {
        let error = AppError::from(ValidationError::Missing("age"));
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let wrapped = AppError::from(AssessmentServiceError::from(ValidationError::UnknownSex(
            "unknown".to_string(),
        )));
        assert_eq!(wrapped.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn booking_failures_map_to_conflict_and_not_found() {
        let full = AppError::from(BookingError::SlotFull {
            slot: SlotLabel::first(),
            date: NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date"),
            capacity: 3,
        });
        assert_eq!(full.status(), StatusCode::CONFLICT);

        let missing = AppError::from(BookingError::Store(StoreError::NotFound));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_outage_maps_to_service_unavailable() {
        let error = AppError::from(AssessmentServiceError::Store(StoreError::Unavailable(
            "timeout".to_string(),
        )));
        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(error.to_string().contains("timeout"));
    }
}
