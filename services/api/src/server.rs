use crate::cli::ServeArgs;
use crate::infra::{build_services, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use careflow::config::AppConfig;
use careflow::error::AppError;
use careflow::risk::{ClassifierHandle, TrainingSet};
use careflow::telemetry;
use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let training_set = TrainingSet::bundled()?;
    info!(
        samples = training_set.len(),
        epochs = config.classifier.epochs,
        "training session risk classifier"
    );
    let classifier = ClassifierHandle::new();
    let training = classifier.spawn_training(training_set, config.classifier);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        classifier: classifier.clone(),
    };

    let services = build_services(&config, classifier.clone());
    let app = with_service_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "careflow portal service ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(drain_on(ctrl_c(), classifier, training))
        .await?;
    info!("careflow portal service stopped");
    Ok(())
}

async fn ctrl_c() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Resolves once `signal` fires and any in-flight classifier training has stopped.
pub(crate) async fn drain_on<S>(
    signal: S,
    classifier: ClassifierHandle,
    training: JoinHandle<()>,
) where
    S: Future<Output = ()>,
{
    signal.await;
    info!(state = classifier.state().label(), "shutdown requested");
    classifier.cancel();
    if let Err(error) = training.await {
        warn!(%error, "classifier training task did not join");
    }
}
