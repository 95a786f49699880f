use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryStore};
use crate::routes::app_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use healthycheck::articles::ArticleSource;
use healthycheck::checkup::{AssessmentStore, RULES_VERSION};
use healthycheck::config::AppConfig;
use healthycheck::error::AppError;
use healthycheck::store::RemoteStore;
use healthycheck::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
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

    if config.store.base_url.is_some() {
        let store = RemoteStore::from_config(&config.store)?;
        info!(store = store.base_url(), "using remote store");
        serve(config, Arc::new(store)).await
    } else {
        warn!("STORE_BASE_URL not set; assessments are kept in memory only");
        serve(config, Arc::new(InMemoryStore::default())).await
    }
}

async fn serve<S>(config: AppConfig, store: Arc<S>) -> Result<(), AppError>
where
    S: AssessmentStore + ArticleSource + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = app_router(store, config.store.page_size)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, rules = RULES_VERSION, "healthy check service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
