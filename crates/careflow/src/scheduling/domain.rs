use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::slots::SlotLabel;
use crate::risk::domain::RiskTier;
use crate::store::{PatientId, ProviderId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Booked,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Only `booked` appointments move, and only to a terminal status.
    pub const fn can_transition_to(self, next: AppointmentStatus) -> bool {
        matches!(
            (self, next),
            (
                AppointmentStatus::Booked,
                AppointmentStatus::Completed | AppointmentStatus::Cancelled
            )
        )
    }
}

/// Patient-facing booking request. The risk tier is a snapshot taken at booking time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub patient_id: PatientId,
    pub provider_id: ProviderId,
    pub date: NaiveDate,
    pub slot_label: SlotLabel,
    pub risk_tier: RiskTier,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub provider_id: ProviderId,
    pub date: NaiveDate,
    #[serde(rename = "slotLabel")]
    pub slot: SlotLabel,
    pub risk_tier: RiskTier,
    pub status: AppointmentStatus,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rescheduled_from: Option<SlotLabel>,
}

impl Appointment {
    pub fn booked(id: AppointmentId, request: BookingRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            patient_id: request.patient_id,
            provider_id: request.provider_id,
            date: request.date,
            slot: request.slot_label,
            risk_tier: request.risk_tier,
            status: AppointmentStatus::Booked,
            reason: request.reason,
            created_at,
            rescheduled_from: None,
        }
    }

    pub fn is_booked(&self) -> bool {
        self.status == AppointmentStatus::Booked
    }

    /// Move to another slot on the same day. Status stays `booked`; the first original
    /// slot is kept for audit.
    pub fn reassign(&mut self, slot: SlotLabel) {
        if self.rescheduled_from.is_none() {
            self.rescheduled_from = Some(self.slot);
        }
        self.slot = slot;
    }
}

/// Notice sent to a patient whose appointment was bumped to a later slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleNotification {
    pub id: NotificationId,
    pub recipient_id: PatientId,
    pub appointment_id: AppointmentId,
    pub old_slot: SlotLabel,
    pub new_slot: SlotLabel,
    pub date: NaiveDate,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
