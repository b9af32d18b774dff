use async_trait::async_trait;
use chrono::NaiveDate;

use super::domain::{Appointment, AppointmentId, NotificationId, RescheduleNotification};
use crate::store::{PatientId, ProviderId, StoreError};

/// Remote appointment collection. Reads and writes are independent round trips with no
/// transaction spanning them.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, StoreError>;
    async fn update(&self, appointment: Appointment) -> Result<(), StoreError>;
    async fn fetch(&self, id: &AppointmentId) -> Result<Option<Appointment>, StoreError>;
    /// Every appointment for the provider on `date`, in creation order.
    async fn for_provider_day(
        &self,
        provider_id: &ProviderId,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError>;
    async fn for_patient(&self, patient_id: &PatientId) -> Result<Vec<Appointment>, StoreError>;
}

/// Outbound reschedule notices.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn publish(
        &self,
        notification: RescheduleNotification,
    ) -> Result<RescheduleNotification, StoreError>;
    async fn for_recipient(
        &self,
        recipient_id: &PatientId,
    ) -> Result<Vec<RescheduleNotification>, StoreError>;
    async fn mark_read(&self, id: &NotificationId) -> Result<RescheduleNotification, StoreError>;
}

/// Provider profile lookups used to word notifications.
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    async fn display_name(&self, provider_id: &ProviderId) -> Result<Option<String>, StoreError>;
}
