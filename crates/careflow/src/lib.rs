//! Risk stratification and risk-aware appointment allocation for the patient portal.

pub mod config;
pub mod error;
pub mod narrative;
pub mod risk;
pub mod scheduling;
pub mod store;
pub mod telemetry;
