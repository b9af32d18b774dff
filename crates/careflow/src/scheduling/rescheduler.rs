//! Priority bumping for slots that collect several High-tier patients.
//!
//! Planning is pure: it reads a provider-day of appointments and returns the moves to
//! make. Applying them against the store is the booking service's job.

use serde::{Deserialize, Serialize};

use super::domain::{Appointment, AppointmentId};
use super::slots::{SlotLabel, SlotOccupancy, SlotPolicy};
use crate::risk::domain::RiskTier;
use crate::store::PatientId;

/// One planned move of a lower-tier appointment to a later slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reassignment {
    pub appointment_id: AppointmentId,
    pub patient_id: PatientId,
    pub from: SlotLabel,
    pub to: SlotLabel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReschedulePlan {
    pub reassignments: Vec<Reassignment>,
    /// Bump candidates for which no later slot had room. They stay where they are.
    pub unresolved: Vec<AppointmentId>,
}

impl ReschedulePlan {
    pub fn is_empty(&self) -> bool {
        self.reassignments.is_empty() && self.unresolved.is_empty()
    }
}

/// Plan bumps for `slot` after `trigger` was booked into it, given every appointment the
/// provider has that day.
///
/// Nothing happens unless the slot holds at least `high_risk_cluster` booked High-tier
/// appointments, `trigger` included. Candidates are the slot's other non-High occupants in
/// list order; `trigger` itself is never moved. Each candidate takes the first later slot
/// whose running occupancy is below the emergency threshold, and that slot's count is
/// bumped before the next candidate looks.
pub fn plan_bumps(
    slot: SlotLabel,
    trigger: &AppointmentId,
    day: &[Appointment],
    policy: &SlotPolicy,
) -> ReschedulePlan {
    let occupants: Vec<&Appointment> = day
        .iter()
        .filter(|appointment| appointment.is_booked() && appointment.slot == slot)
        .collect();

    let high_risk = occupants
        .iter()
        .filter(|appointment| appointment.risk_tier == RiskTier::High)
        .count();
    if high_risk < policy.high_risk_cluster {
        return ReschedulePlan::default();
    }

    let initial = (SlotOccupancy::from_appointments(day), ReschedulePlan::default());
    let (_, plan) = occupants
        .into_iter()
        .filter(|appointment| {
            appointment.risk_tier != RiskTier::High && appointment.id != *trigger
        })
        .fold(initial, |(mut occupancy, mut plan), candidate| {
            let destination = slot
                .later()
                .find(|later| occupancy.count(*later) < policy.emergency_threshold);

            match destination {
                Some(to) => {
                    occupancy.increment(to);
                    occupancy.decrement(slot);
                    plan.reassignments.push(Reassignment {
                        appointment_id: candidate.id.clone(),
                        patient_id: candidate.patient_id.clone(),
                        from: slot,
                        to,
                    });
                }
                None => plan.unresolved.push(candidate.id.clone()),
            }

            (occupancy, plan)
        });

    plan
}
