//! Process-local document stores backed by `Mutex`-guarded collections.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{PatientId, ProviderId, StoreError};
use crate::risk::repository::{AssessmentId, AssessmentRecord, AssessmentRepository};
use crate::scheduling::domain::{
    Appointment, AppointmentId, NotificationId, RescheduleNotification,
};
use crate::scheduling::store::{AppointmentStore, NotificationStore, ProviderDirectory};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
}

#[derive(Default, Clone)]
pub struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

#[async_trait]
impl AssessmentRepository for InMemoryAssessmentRepository {
    async fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, StoreError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, StoreError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    async fn for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<AssessmentRecord>, StoreError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|record| &record.patient_id == patient_id)
            .cloned()
            .collect())
    }
}

/// Appointments kept in insertion order so day listings come back in creation order.
#[derive(Default, Clone)]
pub struct InMemoryAppointmentStore {
    appointments: Arc<Mutex<Vec<Appointment>>>,
}

impl InMemoryAppointmentStore {
    pub fn snapshot(&self) -> Result<Vec<Appointment>, StoreError> {
        Ok(lock(&self.appointments)?.clone())
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        let mut guard = lock(&self.appointments)?;
        if guard.iter().any(|existing| existing.id == appointment.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(appointment.clone());
        Ok(appointment)
    }

    async fn update(&self, appointment: Appointment) -> Result<(), StoreError> {
        let mut guard = lock(&self.appointments)?;
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == appointment.id)
            .ok_or(StoreError::NotFound)?;
        *slot = appointment;
        Ok(())
    }

    async fn fetch(&self, id: &AppointmentId) -> Result<Option<Appointment>, StoreError> {
        Ok(lock(&self.appointments)?
            .iter()
            .find(|appointment| &appointment.id == id)
            .cloned())
    }

    async fn for_provider_day(
        &self,
        provider_id: &ProviderId,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, StoreError> {
        Ok(lock(&self.appointments)?
            .iter()
            .filter(|appointment| {
                &appointment.provider_id == provider_id && appointment.date == date
            })
            .cloned()
            .collect())
    }

    async fn for_patient(&self, patient_id: &PatientId) -> Result<Vec<Appointment>, StoreError> {
        Ok(lock(&self.appointments)?
            .iter()
            .filter(|appointment| &appointment.patient_id == patient_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryNotificationStore {
    notifications: Arc<Mutex<Vec<RescheduleNotification>>>,
}

impl InMemoryNotificationStore {
    pub fn published(&self) -> Result<Vec<RescheduleNotification>, StoreError> {
        Ok(lock(&self.notifications)?.clone())
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn publish(
        &self,
        notification: RescheduleNotification,
    ) -> Result<RescheduleNotification, StoreError> {
        lock(&self.notifications)?.push(notification.clone());
        Ok(notification)
    }

    async fn for_recipient(
        &self,
        recipient_id: &PatientId,
    ) -> Result<Vec<RescheduleNotification>, StoreError> {
        Ok(lock(&self.notifications)?
            .iter()
            .filter(|notification| &notification.recipient_id == recipient_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<RescheduleNotification, StoreError> {
        let mut guard = lock(&self.notifications)?;
        let notification = guard
            .iter_mut()
            .find(|notification| &notification.id == id)
            .ok_or(StoreError::NotFound)?;
        notification.read = true;
        Ok(notification.clone())
    }
}

/// Fixed provider roster.
#[derive(Default, Clone)]
pub struct StaticProviderDirectory {
    names: HashMap<ProviderId, String>,
}

impl StaticProviderDirectory {
    pub fn with_provider(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(ProviderId(id.into()), name.into());
        self
    }
}

#[async_trait]
impl ProviderDirectory for StaticProviderDirectory {
    async fn display_name(&self, provider_id: &ProviderId) -> Result<Option<String>, StoreError> {
        Ok(self.names.get(provider_id).cloned())
    }
}
