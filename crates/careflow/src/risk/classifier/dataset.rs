use std::collections::BTreeSet;
use std::io::Read;

use serde::Deserialize;

use super::super::domain::{BiologicalSex, Condition, RiskTier, Symptom, VitalsSnapshot};
use super::super::features::{encode, FeatureVector};

const BUNDLED_DATASET: &str = include_str!("../../../data/synthetic_vitals.csv");

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("invalid dataset CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unknown symptom '{label}'")]
    UnknownSymptom { row: usize, label: String },
    #[error("row {row}: unknown tier '{label}'")]
    UnknownTier { row: usize, label: String },
}

#[derive(Debug, Deserialize)]
struct DatasetRow {
    age: u8,
    sex: BiologicalSex,
    systolic: u16,
    diastolic: u16,
    heart_rate: u16,
    temperature_c: f64,
    #[serde(default)]
    symptoms: String,
    #[serde(default)]
    conditions: String,
    tier: String,
}

impl DatasetRow {
    fn into_sample(self, row: usize) -> Result<TrainingSample, DatasetError> {
        let mut symptoms = BTreeSet::new();
        for label in split_labels(&self.symptoms) {
            let symptom = Symptom::parse(label).ok_or_else(|| DatasetError::UnknownSymptom {
                row,
                label: label.to_string(),
            })?;
            symptoms.insert(symptom);
        }

        let mut conditions = BTreeSet::new();
        let mut other_conditions = Vec::new();
        for label in split_labels(&self.conditions) {
            match Condition::parse(label) {
                Some(condition) => {
                    conditions.insert(condition);
                }
                None => other_conditions.push(label.to_string()),
            }
        }

        let tier = RiskTier::parse(&self.tier).ok_or(DatasetError::UnknownTier {
            row,
            label: self.tier.clone(),
        })?;

        let vitals = VitalsSnapshot {
            age: self.age,
            sex: self.sex,
            systolic: self.systolic,
            diastolic: self.diastolic,
            heart_rate: self.heart_rate,
            temperature_c: self.temperature_c,
            symptoms,
            conditions,
            other_conditions,
        };

        Ok(TrainingSample {
            features: encode(&vitals),
            tier,
        })
    }
}

fn split_labels(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(';').map(str::trim).filter(|label| !label.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub features: FeatureVector,
    pub tier: RiskTier,
}

/// Encoded, labelled rows ready for training.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    samples: Vec<TrainingSample>,
}

impl TrainingSet {
    /// Synthetic dataset shipped with the crate.
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::from_reader(BUNDLED_DATASET.as_bytes())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut samples = Vec::new();
        for (index, row) in csv_reader.deserialize::<DatasetRow>().enumerate() {
            // Header is line 1.
            samples.push(row?.into_sample(index + 2)?);
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[TrainingSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn tier_counts(&self) -> [usize; 3] {
        self.samples.iter().fold([0; 3], |mut counts, sample| {
            counts[sample.tier.index()] += 1;
            counts
        })
    }
}
