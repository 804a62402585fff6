use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::signal;
use tracing::{error, info, warn};

use bookstore_pos_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init DB
    let db_pool = api::db::establish_connection_from_app_config(&cfg).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }

    let state = api::AppState::new(Arc::new(db_pool), cfg.clone());

    tokio::spawn(api::rate_limiter::start_cleanup_task(
        state.rate_limit.limiter(),
        Duration::from_secs(cfg.rate_limit_window_seconds),
    ));

    let app = api::build_router(state);

    let addr: SocketAddr = match format!("{}:{}", cfg.host, cfg.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(host = %cfg.host, error = %e, "invalid host; binding 0.0.0.0");
            SocketAddr::from(([0, 0, 0, 0], cfg.port))
        }
    };
    info!(environment = %cfg.environment, "bookstore-pos-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
