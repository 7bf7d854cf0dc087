use crate::{
    axum_http::{
        default_routers,
        routers::{
            followup_reminders::{self, FollowupReminderRouteState},
            renewal_followups::{self, RenewalFollowupRouteState},
        },
        trigger_auth::APIKEY_HEADER,
    },
    config::config_model::DotEnvyConfig,
    usecases::{
        generate_renewal_followups::GenerateRenewalFollowupsUseCase,
        send_followup_reminders::SendFollowupRemindersUseCase,
    },
};
use anyhow::{Context, Result};
use axum::{
    Router,
    http::{
        HeaderName, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

pub fn build_router(
    config: &DotEnvyConfig,
    reminders_usecase: Arc<SendFollowupRemindersUseCase>,
    renewals_usecase: Arc<GenerateRenewalFollowupsUseCase>,
) -> Result<Router> {
    let trigger_token = config.reminders.trigger_token.clone();

    let functions = followup_reminders::routes(FollowupReminderRouteState {
        usecase: reminders_usecase,
        trigger_token: trigger_token.clone(),
    })
    .merge(renewal_followups::routes(RenewalFollowupRouteState {
        usecase: renewals_usecase,
        trigger_token,
    }));

    let body_limit_bytes = config
        .worker_server
        .body_limit
        .checked_mul(1024 * 1024)
        .context("SERVER_BODY_LIMIT is too large")?;

    // Hosted-function callers send these headers on preflight.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static(APIKEY_HEADER),
        ]);

    Ok(Router::new()
        .fallback(default_routers::not_found)
        .nest("/functions/v1", functions)
        .route("/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.worker_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes.try_into()?))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

pub async fn start(
    config: Arc<DotEnvyConfig>,
    reminders_usecase: Arc<SendFollowupRemindersUseCase>,
    renewals_usecase: Arc<GenerateRenewalFollowupsUseCase>,
) -> Result<()> {
    let app = build_router(&config, reminders_usecase, renewals_usecase)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.worker_server.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, stage = %config.stage, "reminder worker HTTP server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    // SIGTERM is what container runtimes send on stop.
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl+c, shutting down"),
        _ = terminate => info!("received terminate signal, shutting down"),
    }
}
