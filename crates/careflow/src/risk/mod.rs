//! Clinical risk stratification: intake validation, feature encoding, the rule engine,
//! the session classifier and the fusion policy that combines them.

pub mod classifier;
pub mod domain;
pub mod features;
pub mod fusion;
pub mod intake;
pub mod repository;
pub mod router;
pub(crate) mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use classifier::{
    ClassifierHandle, ClassifierPrediction, ClassifierState, ClassifierUnavailable, DatasetError,
    TierClassifier, TrainingError, TrainingReport, TrainingSet,
};
pub use domain::{
    BiologicalSex, Condition, ContributingFactor, RiskAssessment, RiskTier, Specialist, Symptom,
    TierSource, VitalsSnapshot,
};
pub use fusion::{fuse, HIGH_RISK_CONFIDENCE_FLOOR};
pub use intake::{IntakeGuard, TemperatureUnit, ValidationError, VitalsSubmission};
pub use repository::{AssessmentId, AssessmentRecord, AssessmentRepository};
pub use router::{assessment_router, AssessmentRequest};
pub use scoring::{RuleEngine, RuleOutcome};
pub use service::{AssessmentServiceError, RiskAssessmentService};
