use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use careflow::config::AppConfig;
use careflow::narrative::OfflineNarrator;
use careflow::risk::{ClassifierHandle, RiskAssessmentService};
use careflow::scheduling::{BookingService, SlotPolicy};
use careflow::store::memory::{
    InMemoryAppointmentStore, InMemoryAssessmentRepository, InMemoryNotificationStore,
    StaticProviderDirectory,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) classifier: ClassifierHandle,
}

pub(crate) type AssessmentService =
    RiskAssessmentService<InMemoryAssessmentRepository, OfflineNarrator>;

pub(crate) type SchedulingService =
    BookingService<InMemoryAppointmentStore, InMemoryNotificationStore, StaticProviderDirectory>;

pub(crate) struct Services {
    pub(crate) assessments: Arc<AssessmentService>,
    pub(crate) booking: Arc<SchedulingService>,
}

/// Providers shown to patients in the portal until the profile service is wired in.
pub(crate) fn provider_directory() -> StaticProviderDirectory {
    StaticProviderDirectory::default()
        .with_provider("prov-cardiology-01", "Dr. Naomi Reyes")
        .with_provider("prov-pulmonology-01", "Dr. Ahmed Karimi")
        .with_provider("prov-general-01", "Dr. Lucia Moreno")
}

pub(crate) fn build_services(config: &AppConfig, classifier: ClassifierHandle) -> Services {
    let assessments = Arc::new(RiskAssessmentService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(OfflineNarrator),
        classifier,
    ));
    let booking = Arc::new(BookingService::new(
        Arc::new(InMemoryAppointmentStore::default()),
        Arc::new(InMemoryNotificationStore::default()),
        Arc::new(provider_directory()),
        SlotPolicy::from(&config.scheduling),
    ));

    Services {
        assessments,
        booking,
    }
}
