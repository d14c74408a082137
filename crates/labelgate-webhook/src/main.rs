//! labelgate webhook
//!
//! - Admission endpoint: POST /validate (AdmissionReview v1/v1beta1)
//! - Ops: /healthz, /readyz, /metrics
//! - SIGHUP: reload policy from the config file (whole rule-set swap)
//! - SIGINT/SIGTERM: mark draining, then shut down gracefully

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use labelgate_core::error::{AdmissionError, Result};
use labelgate_webhook::{app_state::AppState, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg.gateway.listen.parse().map_err(|e| {
        AdmissionError::InvalidConfig(format!("gateway.listen must be a valid SocketAddr: {e}"))
    })?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    spawn_reload_listener(state.clone(), path.clone());

    tracing::info!(%listen, config = %path, "labelgate-webhook starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| AdmissionError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| AdmissionError::Internal(format!("server failed: {e}")))?;

    tracing::info!("labelgate-webhook stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl-c handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    state.set_draining();
    tracing::info!("shutdown signal received, draining");
}

#[cfg(unix)]
fn spawn_reload_listener(state: AppState, path: String) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "SIGHUP handler unavailable; reload disabled");
                return;
            }
        };
        while hup.recv().await.is_some() {
            match state.reload_from_file(&path) {
                Ok(generation) => tracing::info!(generation, config = %path, "policy reloaded"),
                Err(e) => tracing::error!(error = %e, config = %path, "policy reload rejected; keeping current rule set"),
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_listener(_state: AppState, _path: String) {}
