use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::domain::{Appointment, AppointmentStatus};
use crate::config::SchedulingConfig;

/// Daily slot labels in booking order.
pub const SLOT_LABELS: [&str; 17] = [
    "09:00 AM", "09:30 AM", "10:00 AM", "10:30 AM", "11:00 AM", "11:30 AM", "12:00 PM",
    "02:00 PM", "02:30 PM", "03:00 PM", "03:30 PM", "04:00 PM",
    "05:00 PM", "05:30 PM", "06:00 PM", "06:30 PM", "07:00 PM",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayBand {
    Morning,
    Afternoon,
    Evening,
}

/// One of the fixed daily time labels. Ordering follows the day.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotLabel(u8);

impl SlotLabel {
    pub fn ordered() -> impl Iterator<Item = SlotLabel> {
        (0..SLOT_LABELS.len() as u8).map(SlotLabel)
    }

    pub fn first() -> Self {
        SlotLabel(0)
    }

    pub fn from_position(position: usize) -> Option<Self> {
        (position < SLOT_LABELS.len()).then_some(SlotLabel(position as u8))
    }

    /// Accepts the canonical label as well as `9:00 am` style spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        let padded = if normalized.find(':') == Some(1) {
            format!("0{normalized}")
        } else {
            normalized
        };
        SLOT_LABELS
            .iter()
            .position(|label| *label == padded)
            .and_then(Self::from_position)
    }

    pub fn position(self) -> usize {
        usize::from(self.0)
    }

    pub fn label(self) -> &'static str {
        SLOT_LABELS[self.position()]
    }

    pub fn band(self) -> DayBand {
        match self.0 {
            0..=6 => DayBand::Morning,
            7..=11 => DayBand::Afternoon,
            _ => DayBand::Evening,
        }
    }

    /// Slots after this one, in day order.
    pub fn later(self) -> impl Iterator<Item = SlotLabel> {
        (self.0 + 1..SLOT_LABELS.len() as u8).map(SlotLabel)
    }
}

impl fmt::Debug for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotLabel({})", self.label())
    }
}

impl fmt::Display for SlotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SlotLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for SlotLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SlotLabel::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown slot label '{raw}'")))
    }
}

/// Capacity constants applied to every provider calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPolicy {
    pub capacity: usize,
    pub emergency_threshold: usize,
    pub high_risk_cluster: usize,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self::from(&SchedulingConfig::default())
    }
}

impl From<&SchedulingConfig> for SlotPolicy {
    fn from(config: &SchedulingConfig) -> Self {
        Self {
            capacity: config.slot_capacity,
            emergency_threshold: config.emergency_threshold,
            high_risk_cluster: config.high_risk_cluster,
        }
    }
}

/// Count of `booked` appointments per slot for one provider-day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotOccupancy {
    counts: BTreeMap<SlotLabel, usize>,
}

impl SlotOccupancy {
    pub fn from_appointments<'a>(appointments: impl IntoIterator<Item = &'a Appointment>) -> Self {
        let mut occupancy = Self::default();
        for appointment in appointments {
            if appointment.status == AppointmentStatus::Booked {
                occupancy.increment(appointment.slot);
            }
        }
        occupancy
    }

    pub fn count(&self, slot: SlotLabel) -> usize {
        self.counts.get(&slot).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, slot: SlotLabel) {
        *self.counts.entry(slot).or_insert(0) += 1;
    }

    pub fn decrement(&mut self, slot: SlotLabel) {
        if let Some(count) = self.counts.get_mut(&slot) {
            *count = count.saturating_sub(1);
        }
    }
}

/// Availability of a single slot as shown to patients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub slot_label: SlotLabel,
    pub band: DayBand,
    pub booked: usize,
    pub capacity: usize,
    pub remaining: usize,
}

pub fn availability(occupancy: &SlotOccupancy, policy: &SlotPolicy) -> Vec<SlotAvailability> {
    SlotLabel::ordered()
        .map(|slot| {
            let booked = occupancy.count(slot);
            SlotAvailability {
                slot_label: slot,
                band: slot.band(),
                booked,
                capacity: policy.capacity,
                remaining: policy.capacity.saturating_sub(booked),
            }
        })
        .collect()
}
