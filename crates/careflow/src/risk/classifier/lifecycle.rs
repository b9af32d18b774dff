use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{train, TierClassifier, TrainingError, TrainingReport, TrainingSet};
use crate::config::ClassifierConfig;

/// Lifecycle of the session classifier.
#[derive(Debug, Clone)]
pub enum ClassifierState {
    Uninitialized,
    Training { epoch: usize, epochs: usize },
    Ready(Arc<TierClassifier>),
    Failed(String),
}

impl ClassifierState {
    pub fn label(&self) -> &'static str {
        match self {
            ClassifierState::Uninitialized => "uninitialized",
            ClassifierState::Training { .. } => "training",
            ClassifierState::Ready(_) => "ready",
            ClassifierState::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifierUnavailable {
    #[error("classifier training has not been started")]
    NotStarted,
    #[error("classifier training failed: {0}")]
    Failed(String),
    #[error("classifier training task was dropped")]
    Abandoned,
}

/// Shared handle onto the classifier state machine. Cloning shares the same state.
#[derive(Debug, Clone)]
pub struct ClassifierHandle {
    sender: Arc<watch::Sender<ClassifierState>>,
    receiver: watch::Receiver<ClassifierState>,
    cancel: Arc<AtomicBool>,
}

impl Default for ClassifierHandle {
    fn default() -> Self {
        Self::with_state(ClassifierState::Uninitialized)
    }
}

impl ClassifierHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready_with(classifier: TierClassifier) -> Self {
        Self::with_state(ClassifierState::Ready(Arc::new(classifier)))
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::with_state(ClassifierState::Failed(reason.into()))
    }

    fn with_state(state: ClassifierState) -> Self {
        let (sender, receiver) = watch::channel(state);
        Self {
            sender: Arc::new(sender),
            receiver,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> ClassifierState {
        self.receiver.borrow().clone()
    }

    /// Stop an in-flight training run at its next epoch boundary.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Train on a blocking worker; the returned task resolves once the state is
    /// `Ready` or `Failed`. Must be called from within a tokio runtime.
    pub fn spawn_training(&self, set: TrainingSet, config: ClassifierConfig) -> JoinHandle<()> {
        let handle = self.clone();
        self.sender.send_replace(ClassifierState::Training {
            epoch: 0,
            epochs: config.epochs,
        });

        tokio::spawn(async move {
            let worker = handle.clone();
            let outcome =
                tokio::task::spawn_blocking(move || worker.run_training(&set, &config)).await;
            if let Err(join_error) = outcome {
                warn!(error = %join_error, "classifier training worker aborted");
                handle
                    .sender
                    .send_replace(ClassifierState::Failed(join_error.to_string()));
            }
        })
    }

    /// Train on the current thread. Used by the CLI where no background work is needed.
    pub fn train_blocking(
        &self,
        set: &TrainingSet,
        config: &ClassifierConfig,
    ) -> Result<TrainingReport, TrainingError> {
        self.sender.send_replace(ClassifierState::Training {
            epoch: 0,
            epochs: config.epochs,
        });
        self.run_training(set, config)
    }

    fn run_training(
        &self,
        set: &TrainingSet,
        config: &ClassifierConfig,
    ) -> Result<TrainingReport, TrainingError> {
        let sender = Arc::clone(&self.sender);
        let result = train(set, config, &self.cancel, |progress| {
            sender.send_replace(ClassifierState::Training {
                epoch: progress.epoch,
                epochs: progress.epochs,
            });
        });

        match result {
            Ok((classifier, report)) => {
                info!(
                    epochs = report.epochs,
                    samples = report.samples,
                    final_loss = report.final_loss,
                    accuracy = report.accuracy,
                    "risk classifier ready"
                );
                self.sender
                    .send_replace(ClassifierState::Ready(Arc::new(classifier)));
                Ok(report)
            }
            Err(error) => {
                warn!(%error, "risk classifier training failed");
                self.sender
                    .send_replace(ClassifierState::Failed(error.to_string()));
                Err(error)
            }
        }
    }

    /// Wait for training to finish. Resolves immediately when already `Ready` or
    /// `Failed`, and refuses to wait on a run that was never started.
    pub async fn ready(&self) -> Result<Arc<TierClassifier>, ClassifierUnavailable> {
        let mut receiver = self.receiver.clone();
        loop {
            let settled = match &*receiver.borrow_and_update() {
                ClassifierState::Ready(classifier) => Some(Ok(Arc::clone(classifier))),
                ClassifierState::Failed(reason) => {
                    Some(Err(ClassifierUnavailable::Failed(reason.clone())))
                }
                ClassifierState::Uninitialized => Some(Err(ClassifierUnavailable::NotStarted)),
                ClassifierState::Training { .. } => None,
            };
            if let Some(outcome) = settled {
                return outcome;
            }
            if receiver.changed().await.is_err() {
                return Err(ClassifierUnavailable::Abandoned);
            }
        }
    }
}
