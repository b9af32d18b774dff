use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    Appointment, AppointmentId, AppointmentStatus, BookingRequest, NotificationId,
    RescheduleNotification,
};
use super::rescheduler::{plan_bumps, Reassignment};
use super::slots::{availability, SlotAvailability, SlotLabel, SlotOccupancy, SlotPolicy};
use super::store::{AppointmentStore, NotificationStore, ProviderDirectory};
use crate::store::{PatientId, ProviderId, StoreError};

/// Slot allocator plus the priority rescheduler that runs after every booking.
pub struct BookingService<A, N, P> {
    appointments: Arc<A>,
    notifications: Arc<N>,
    providers: Arc<P>,
    policy: SlotPolicy,
}

static APPOINTMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_appointment_id() -> AppointmentId {
    let id = APPOINTMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AppointmentId(format!("appt-{id:06}"))
}

fn next_notification_id() -> NotificationId {
    let id = NOTIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    NotificationId(format!("notice-{id:06}"))
}

/// Result of a successful booking, including any bumps it caused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub appointment: Appointment,
    pub reassignments: Vec<Reassignment>,
    pub unresolved: Vec<AppointmentId>,
}

impl<A, N, P> BookingService<A, N, P>
where
    A: AppointmentStore + 'static,
    N: NotificationStore + 'static,
    P: ProviderDirectory + 'static,
{
    pub fn new(
        appointments: Arc<A>,
        notifications: Arc<N>,
        providers: Arc<P>,
        policy: SlotPolicy,
    ) -> Self {
        Self {
            appointments,
            notifications,
            providers,
            policy,
        }
    }

    /// Book the requested slot if it is below capacity, then rebalance it.
    ///
    /// The occupancy read and the insert are separate round trips, so two concurrent
    /// bookings can both pass the capacity check.
    pub async fn book(&self, request: BookingRequest) -> Result<BookingReceipt, BookingError> {
        let day = self
            .appointments
            .for_provider_day(&request.provider_id, request.date)
            .await?;
        let occupancy = SlotOccupancy::from_appointments(&day).count(request.slot_label);

        if occupancy >= self.policy.capacity {
            info!(
                provider_id = %request.provider_id.0,
                date = %request.date,
                slot = %request.slot_label,
                occupancy,
                "booking rejected, slot full"
            );
            return Err(BookingError::SlotFull {
                slot: request.slot_label,
                date: request.date,
                capacity: self.policy.capacity,
            });
        }

        let appointment = Appointment::booked(next_appointment_id(), request, Utc::now());
        let appointment = self.appointments.insert(appointment).await?;
        info!(
            appointment_id = %appointment.id.0,
            patient_id = %appointment.patient_id.0,
            slot = %appointment.slot,
            tier = appointment.risk_tier.label(),
            "appointment booked"
        );

        let (reassignments, unresolved) = self.rebalance(&appointment).await;

        Ok(BookingReceipt {
            appointment,
            reassignments,
            unresolved,
        })
    }

    /// Best-effort bump pass over the slot just booked. Failures are logged and never
    /// reach the booking caller.
    async fn rebalance(&self, booked: &Appointment) -> (Vec<Reassignment>, Vec<AppointmentId>) {
        let day = match self
            .appointments
            .for_provider_day(&booked.provider_id, booked.date)
            .await
        {
            Ok(day) => day,
            Err(error) => {
                warn!(%error, slot = %booked.slot, "skipping reschedule pass, day unreadable");
                return (Vec::new(), Vec::new());
            }
        };

        let plan = plan_bumps(booked.slot, &booked.id, &day, &self.policy);
        if plan.is_empty() {
            return (Vec::new(), Vec::new());
        }
        for id in &plan.unresolved {
            debug!(appointment_id = %id.0, slot = %booked.slot, "no later slot for bump candidate");
        }

        let provider_name = self.provider_name(&booked.provider_id).await;
        let mut applied = Vec::with_capacity(plan.reassignments.len());
        for reassignment in plan.reassignments {
            let Some(original) = day
                .iter()
                .find(|appointment| appointment.id == reassignment.appointment_id)
            else {
                continue;
            };

            let mut moved = original.clone();
            moved.reassign(reassignment.to);
            if let Err(error) = self.appointments.update(moved.clone()).await {
                warn!(%error, appointment_id = %moved.id.0, "failed to move bumped appointment");
                continue;
            }

            info!(
                appointment_id = %moved.id.0,
                from = %reassignment.from,
                to = %reassignment.to,
                "appointment bumped to later slot"
            );
            self.notify(&moved, &reassignment, &provider_name).await;
            applied.push(reassignment);
        }

        (applied, plan.unresolved)
    }

    async fn provider_name(&self, provider_id: &ProviderId) -> String {
        match self.providers.display_name(provider_id).await {
            Ok(Some(name)) => name,
            Ok(None) => provider_id.0.clone(),
            Err(error) => {
                warn!(%error, provider_id = %provider_id.0, "provider lookup failed");
                provider_id.0.clone()
            }
        }
    }

    async fn notify(&self, moved: &Appointment, reassignment: &Reassignment, provider: &str) {
        let notification = RescheduleNotification {
            id: next_notification_id(),
            recipient_id: moved.patient_id.clone(),
            appointment_id: moved.id.clone(),
            old_slot: reassignment.from,
            new_slot: reassignment.to,
            date: moved.date,
            message: format!(
                "Your appointment with {provider} on {} has moved from {} to {} to make room for urgent cases.",
                moved.date, reassignment.from, reassignment.to
            ),
            read: false,
            created_at: Utc::now(),
        };

        if let Err(error) = self.notifications.publish(notification).await {
            warn!(%error, patient_id = %moved.patient_id.0, "failed to publish reschedule notice");
        }
    }

    pub async fn get(&self, id: &AppointmentId) -> Result<Appointment, BookingError> {
        let appointment = self
            .appointments
            .fetch(id)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(appointment)
    }

    pub async fn cancel(&self, id: &AppointmentId) -> Result<Appointment, BookingError> {
        self.transition(id, AppointmentStatus::Cancelled).await
    }

    pub async fn complete(&self, id: &AppointmentId) -> Result<Appointment, BookingError> {
        self.transition(id, AppointmentStatus::Completed).await
    }

    async fn transition(
        &self,
        id: &AppointmentId,
        next: AppointmentStatus,
    ) -> Result<Appointment, BookingError> {
        let mut appointment = self.get(id).await?;
        if !appointment.status.can_transition_to(next) {
            return Err(BookingError::InvalidTransition {
                from: appointment.status,
                to: next,
            });
        }

        appointment.status = next;
        self.appointments.update(appointment.clone()).await?;
        info!(appointment_id = %id.0, status = next.label(), "appointment status changed");
        Ok(appointment)
    }

    pub async fn availability(
        &self,
        provider_id: &ProviderId,
        date: NaiveDate,
    ) -> Result<Vec<SlotAvailability>, BookingError> {
        let day = self.appointments.for_provider_day(provider_id, date).await?;
        Ok(availability(
            &SlotOccupancy::from_appointments(&day),
            &self.policy,
        ))
    }

    pub async fn occupancy(
        &self,
        provider_id: &ProviderId,
        date: NaiveDate,
        slot: SlotLabel,
    ) -> Result<usize, BookingError> {
        let day = self.appointments.for_provider_day(provider_id, date).await?;
        Ok(SlotOccupancy::from_appointments(&day).count(slot))
    }

    pub async fn appointments_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<Appointment>, BookingError> {
        let mut appointments = self.appointments.for_patient(patient_id).await?;
        appointments.sort_by(|left, right| {
            left.date
                .cmp(&right.date)
                .then_with(|| left.slot.cmp(&right.slot))
        });
        Ok(appointments)
    }

    /// Notices for the patient, newest first.
    pub async fn notifications_for(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<RescheduleNotification>, BookingError> {
        let mut notices = self.notifications.for_recipient(patient_id).await?;
        notices.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(notices)
    }

    pub async fn mark_notification_read(
        &self,
        id: &NotificationId,
    ) -> Result<RescheduleNotification, BookingError> {
        Ok(self.notifications.mark_read(id).await?)
    }
}

/// Error raised by the booking service.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("slot {slot} on {date} is full ({capacity} booked)")]
    SlotFull {
        slot: SlotLabel,
        date: NaiveDate,
        capacity: usize,
    },
    #[error("appointment cannot move from {} to {}", .from.label(), .to.label())]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}
