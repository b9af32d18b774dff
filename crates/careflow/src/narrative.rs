//! Boundary to the external generative-language service that elaborates treatment
//! plans. The service is optional: every caller must cope with it failing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::risk::domain::{RiskAssessment, RiskTier, Specialist};

/// Prompt material handed to the narrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    pub tier: RiskTier,
    pub specialist: Specialist,
    pub factors: Vec<String>,
    pub alerts: Vec<String>,
    pub recommendation: String,
}

impl From<&RiskAssessment> for NarrativeRequest {
    fn from(assessment: &RiskAssessment) -> Self {
        Self {
            tier: assessment.tier,
            specialist: assessment.specialist,
            factors: assessment
                .factors
                .iter()
                .map(|factor| factor.label.clone())
                .collect(),
            alerts: assessment.alerts.clone(),
            recommendation: assessment.recommendation.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative service unavailable: {0}")]
    Unavailable(String),
    #[error("narrative service rejected the request: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait TreatmentNarrator: Send + Sync {
    async fn elaborate(&self, request: &NarrativeRequest) -> Result<String, NarrativeError>;
}

/// Narrator used when no generative endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineNarrator;

#[async_trait]
impl TreatmentNarrator for OfflineNarrator {
    async fn elaborate(&self, _request: &NarrativeRequest) -> Result<String, NarrativeError> {
        Err(NarrativeError::Unavailable(
            "no generative endpoint configured".to_string(),
        ))
    }
}

/// Where the narrative attached to an assessment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    Generated,
    Deterministic,
}
