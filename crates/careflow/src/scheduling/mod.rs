//! Appointment slots, booking, and the High-risk rescheduler.

pub mod domain;
pub mod rescheduler;
pub mod router;
pub mod service;
pub mod slots;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    Appointment, AppointmentId, AppointmentStatus, BookingRequest, NotificationId,
    RescheduleNotification,
};
pub use rescheduler::{plan_bumps, Reassignment, ReschedulePlan};
pub use router::{booking_router, AvailabilityQuery};
pub use service::{BookingError, BookingReceipt, BookingService};
pub use slots::{availability, DayBand, SlotAvailability, SlotLabel, SlotOccupancy, SlotPolicy};
pub use store::{AppointmentStore, NotificationStore, ProviderDirectory};
