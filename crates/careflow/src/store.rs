//! Identifiers and failure modes shared by the remote document collections.
//!
//! The portal persists assessments, appointments and notifications in a shared,
//! multi-writer document store with last-writer-wins field semantics. Nothing here
//! provides locking; callers read, decide and write.

pub mod memory;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for portal patients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub String);

/// Identifier wrapper for care providers whose calendars hold slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(pub String);

/// Error enumeration for document store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}
