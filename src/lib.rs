//! StartupQuest API.
//!
//! Serves lesson and rubric metadata to the web app, queues submissions for
//! the grading worker and exposes two admin routes that sync the content
//! files into the database. Those routes sit behind [`gate::AdminGate`]:
//! a per (client, route) fixed-window rate limit followed by a shared-secret
//! check on the `x-admin-key` header.

use anyhow::Context;
use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

pub mod catalog;
pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod gate;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod store;
pub mod sync;
pub mod tutor;
pub mod worker;

use config::{SeedArgs, ServeArgs};
use events::TracingSink;
use handlers::*;
use state::AppState;
use store::Store;

async fn count_requests(req: Request, next: Next) -> Response {
    metrics::REQUEST_TOTAL.inc();
    next.run(req).await
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/lessons", get(lessons_handler))
        .route("/lessons/{slug}", get(lesson_handler))
        .route("/lessons/{slug}/submit", post(submit_handler))
        .route("/submissions/{id}", get(submission_handler))
        .route("/progress/{slug}/start", post(start_handler))
        .route("/progress/{slug}/claim", post(claim_handler))
        .route("/me/profile", get(profile_handler))
        .route("/leaderboard", get(leaderboard_handler))
        .route("/rubrics", get(rubrics_handler))
        .route("/rubrics/{id}", get(rubric_handler))
        .route("/ai/tutor/chat", post(tutor_chat_handler))
        .route("/admin/rubrics/publish", post(publish_rubrics_handler))
        .route("/admin/lessons/sync", post(sync_lessons_handler))
        .fallback(not_found_handler)
        .method_not_allowed_fallback(not_found_handler)
        .layer(middleware::from_fn(count_requests))
        .with_state(state)
}

pub async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let store = Store::open(&args.database_path)
        .with_context(|| format!("opening database {}", args.database_path.display()))?;

    let gate_config = args.gate.gate_config();
    if gate_config.secret.is_empty() {
        info!("ADMIN_KEY not set, admin routes will reject every request");
    }

    let (state, job_rx) = AppState::new(
        args.content.clone(),
        &gate_config,
        Arc::new(TracingSink),
        store,
        args.job_queue_capacity,
    );

    // spawn the background worker
    tokio::spawn(worker::job_worker(job_rx, state.submissions.clone()));

    let app = router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!("API running on http://localhost:{}", args.port);
    info!("Lessons from {}", args.content.lessons_dir.display());
    info!("Rubrics from {}", args.content.rubrics_dir.display());
    info!(
        "Admin rate limit: {} requests per {} ms",
        gate_config.max_requests,
        gate_config.window.as_millis()
    );

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down");
    Ok(())
}

/// Syncs rubrics, then lessons, straight into the database.
pub fn seed(args: &SeedArgs) -> anyhow::Result<Vec<sync::SyncReport>> {
    let store = Store::open(&args.database_path)
        .with_context(|| format!("opening database {}", args.database_path.display()))?;

    let rubrics = sync::sync_rubrics(&args.content.rubrics_dir, &store)
        .context("syncing rubrics")?;
    let lessons = sync::sync_lessons(&args.content.lessons_dir, &store)
        .context("syncing lessons")?;

    Ok(vec![rubrics, lessons])
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {e}");
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
}
