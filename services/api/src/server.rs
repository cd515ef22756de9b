use crate::cli::ServeArgs;
use crate::infra::{load_board, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use plan_scorer::board::SharedBoard;
use plan_scorer::config::AppConfig;
use plan_scorer::error::AppError;
use plan_scorer::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let board = load_board(&config.scoring);
    let shared = SharedBoard::new(board).with_snapshot_path(config.scoring.weights_path.clone());

    let app = with_service_routes(shared)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        normalization = config.scoring.normalization.label(),
        "proposal scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
