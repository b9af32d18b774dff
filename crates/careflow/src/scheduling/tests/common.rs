use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::risk::domain::RiskTier;
use crate::scheduling::domain::{
    Appointment, AppointmentId, AppointmentStatus, BookingRequest, NotificationId,
    RescheduleNotification,
};
use crate::scheduling::service::BookingService;
use crate::scheduling::slots::{SlotLabel, SlotPolicy};
use crate::scheduling::store::{AppointmentStore, NotificationStore, ProviderDirectory};
use crate::store::memory::{
    InMemoryAppointmentStore, InMemoryNotificationStore, StaticProviderDirectory,
};
use crate::store::{PatientId, ProviderId, StoreError};

pub(super) type MemoryBooking =
    BookingService<InMemoryAppointmentStore, InMemoryNotificationStore, StaticProviderDirectory>;

pub(super) fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date")
}

pub(super) fn provider() -> ProviderId {
    ProviderId("prov-lee".to_string())
}

pub(super) fn slot(label: &str) -> SlotLabel {
    SlotLabel::parse(label).expect("known slot label")
}

pub(super) fn request(patient: &str, label: &str, tier: RiskTier) -> BookingRequest {
    BookingRequest {
        patient_id: PatientId(patient.to_string()),
        provider_id: provider(),
        date: day(),
        slot_label: slot(label),
        risk_tier: tier,
        reason: "Follow-up".to_string(),
    }
}

/// Stand-alone appointment for planner tests; creation time follows `sequence`.
pub(super) fn appointment(sequence: u32, label: &str, tier: RiskTier) -> Appointment {
    let created_at = Utc
        .with_ymd_and_hms(2024, 6, 1, 8, 0, sequence)
        .single()
        .expect("valid timestamp");
    Appointment::booked(
        AppointmentId(format!("appt-{sequence}")),
        request(&format!("patient-{sequence}"), label, tier),
        created_at,
    )
}

pub(super) fn cancelled(mut appointment: Appointment) -> Appointment {
    appointment.status = AppointmentStatus::Cancelled;
    appointment
}

pub(super) fn directory() -> StaticProviderDirectory {
    StaticProviderDirectory::default().with_provider("prov-lee", "Dr. Amara Lee")
}

pub(super) fn build_service() -> (
    MemoryBooking,
    Arc<InMemoryAppointmentStore>,
    Arc<InMemoryNotificationStore>,
) {
    let appointments = Arc::new(InMemoryAppointmentStore::default());
    let notifications = Arc::new(InMemoryNotificationStore::default());
    let service = BookingService::new(
        appointments.clone(),
        notifications.clone(),
        Arc::new(directory()),
        SlotPolicy::default(),
    );
    (service, appointments, notifications)
}

/// Accepts inserts but refuses to move anything afterwards.
#[derive(Default)]
pub(super) struct FrozenAppointments {
    pub(super) inner: InMemoryAppointmentStore,
}

#[async_trait]
impl AppointmentStore for FrozenAppointments {
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        self.inner.insert(appointment).await
    }

    async fn update(&self, _appointment: Appointment) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("write quota exceeded".to_string()))
    }

    async fn fetch(&self, id: &AppointmentId) -> Result<Option<Appointment>, StoreError> {
        self.inner.fetch(id).await
    }

    async fn for_provider_day(
        &self,
        provider_id: &ProviderId,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError> {
        self.inner.for_provider_day(provider_id, date).await
    }

    async fn for_patient(&self, patient_id: &PatientId) -> Result<Vec<Appointment>, StoreError> {
        self.inner.for_patient(patient_id).await
    }
}

pub(super) struct OfflineAppointments;

#[async_trait]
impl AppointmentStore for OfflineAppointments {
    async fn insert(&self, _appointment: Appointment) -> Result<Appointment, StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    async fn update(&self, _appointment: Appointment) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    async fn fetch(&self, _id: &AppointmentId) -> Result<Option<Appointment>, StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    async fn for_provider_day(
        &self,
        _provider_id: &ProviderId,
        _date: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }

    async fn for_patient(&self, _patient_id: &PatientId) -> Result<Vec<Appointment>, StoreError> {
        Err(StoreError::Unavailable("document store offline".to_string()))
    }
}

pub(super) struct MutedNotifications;

#[async_trait]
impl NotificationStore for MutedNotifications {
    async fn publish(
        &self,
        _notification: RescheduleNotification,
    ) -> Result<RescheduleNotification, StoreError> {
        Err(StoreError::Unavailable("push gateway down".to_string()))
    }

    async fn for_recipient(
        &self,
        _recipient_id: &PatientId,
    ) -> Result<Vec<RescheduleNotification>, StoreError> {
        Ok(Vec::new())
    }

    async fn mark_read(&self, _id: &NotificationId) -> Result<RescheduleNotification, StoreError> {
        Err(StoreError::NotFound)
    }
}

pub(super) struct BrokenDirectory;

#[async_trait]
impl ProviderDirectory for BrokenDirectory {
    async fn display_name(&self, _provider_id: &ProviderId) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("profile service down".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
