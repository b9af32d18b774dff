//! Session-trained tier classifier.
//!
//! The network is rebuilt from the bundled synthetic dataset every time the service
//! starts; nothing is persisted between sessions.

mod dataset;
mod lifecycle;
mod network;

pub use dataset::{DatasetError, TrainingSample, TrainingSet};
pub use lifecycle::{ClassifierHandle, ClassifierState, ClassifierUnavailable};

use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::domain::RiskTier;
use super::features::{FeatureVector, FEATURE_WIDTH};
use crate::config::ClassifierConfig;
use network::Network;

pub const HIDDEN_LAYERS: [usize; 3] = [16, 12, 8];

/// Class distribution and arg-max verdict for one encoded snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierPrediction {
    /// Ordered Low, Medium, High.
    pub probabilities: [f32; 3],
    pub tier: RiskTier,
    pub confidence: u8,
}

impl ClassifierPrediction {
    pub fn from_probabilities(probabilities: [f32; 3]) -> Self {
        let (index, probability) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            });

        Self {
            probabilities,
            tier: RiskTier::from_index(index).unwrap_or(RiskTier::Low),
            confidence: (probability * 100.0).round().clamp(0.0, 100.0) as u8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TierClassifier {
    network: Network,
}

impl TierClassifier {
    pub fn predict(&self, features: &FeatureVector) -> ClassifierPrediction {
        let output = self.network.predict(features);
        let mut probabilities = [0.0; 3];
        for (slot, value) in probabilities.iter_mut().zip(output) {
            *slot = value;
        }
        ClassifierPrediction::from_probabilities(probabilities)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingProgress {
    pub epoch: usize,
    pub epochs: usize,
    pub mean_loss: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub epochs: usize,
    pub samples: usize,
    pub final_loss: f32,
    pub accuracy: f32,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainingError {
    #[error("training set is empty")]
    EmptyDataset,
    #[error("epoch count must be positive")]
    NoEpochs,
    #[error("training cancelled after {completed} epoch(s)")]
    Cancelled { completed: usize },
    #[error("loss diverged at epoch {epoch}")]
    Diverged { epoch: usize },
}

/// Supervised training with per-sample SGD over a seeded shuffle. Deterministic for a
/// given set and config. `cancel` is checked between epochs.
pub fn train(
    set: &TrainingSet,
    config: &ClassifierConfig,
    cancel: &AtomicBool,
    mut on_progress: impl FnMut(TrainingProgress),
) -> Result<(TierClassifier, TrainingReport), TrainingError> {
    if set.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }
    if config.epochs == 0 {
        return Err(TrainingError::NoEpochs);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut sizes = vec![FEATURE_WIDTH];
    sizes.extend_from_slice(&HIDDEN_LAYERS);
    sizes.push(RiskTier::ordered().len());
    let mut network = Network::new(&sizes, &mut rng);

    let samples = set.samples();
    let mut order: Vec<usize> = (0..samples.len()).collect();
    let mut mean_loss = f32::NAN;

    for epoch in 1..=config.epochs {
        if cancel.load(Ordering::Relaxed) {
            return Err(TrainingError::Cancelled {
                completed: epoch - 1,
            });
        }

        order.shuffle(&mut rng);
        let total: f32 = order
            .iter()
            .map(|index| {
                let sample = &samples[*index];
                network.train_step(&sample.features, sample.tier.index(), config.learning_rate)
            })
            .sum();
        mean_loss = total / samples.len() as f32;

        if !mean_loss.is_finite() {
            return Err(TrainingError::Diverged { epoch });
        }

        on_progress(TrainingProgress {
            epoch,
            epochs: config.epochs,
            mean_loss,
        });
    }

    let classifier = TierClassifier { network };
    let correct = samples
        .iter()
        .filter(|sample| classifier.predict(&sample.features).tier == sample.tier)
        .count();

    let report = TrainingReport {
        epochs: config.epochs,
        samples: samples.len(),
        final_loss: mean_loss,
        accuracy: correct as f32 / samples.len() as f32,
    };

    Ok((classifier, report))
}
