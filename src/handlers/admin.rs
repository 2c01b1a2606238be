use axum::{
    Json,
    extract::{ConnectInfo, FromRequestParts, MatchedPath, State},
    http::{HeaderMap, request::Parts},
};
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{AppError, ContentError};
use crate::gate::ADMIN_KEY_HEADER;
use crate::state::AppState;
use crate::store::Store;
use crate::sync::{SyncReport, sync_lessons, sync_rubrics};

/// Best-effort caller identity: the peer IP, or `"unknown"` when the server
/// was not started with connect info.
pub struct ClientId(pub String);

impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(ClientId(id))
    }
}

#[derive(Serialize)]
pub struct SyncResponse {
    pub ok: bool,
    pub report: SyncReport,
}

fn supplied_key(headers: &HeaderMap) -> &str {
    headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// Gate first, then run the file sync off the async threads
async fn gated_sync(
    state: &AppState,
    client: &str,
    route: &str,
    headers: &HeaderMap,
    dir: PathBuf,
    run: fn(&Path, &Store) -> Result<SyncReport, ContentError>,
) -> Result<Json<SyncResponse>, AppError> {
    state.gate.admit(client, route, supplied_key(headers))?;

    let store = state.store.clone();
    let report = tokio::task::spawn_blocking(move || run(&dir, &store))
        .await
        .map_err(|e| AppError::Internal(format!("sync task failed: {e}")))??;

    Ok(Json(SyncResponse { ok: true, report }))
}

pub async fn publish_rubrics_handler(
    State(state): State<Arc<AppState>>,
    ClientId(client): ClientId,
    route: MatchedPath,
    headers: HeaderMap,
) -> Result<Json<SyncResponse>, AppError> {
    let dir = state.content.rubrics_dir.clone();
    gated_sync(&state, &client, route.as_str(), &headers, dir, sync_rubrics).await
}

pub async fn sync_lessons_handler(
    State(state): State<Arc<AppState>>,
    ClientId(client): ClientId,
    route: MatchedPath,
    headers: HeaderMap,
) -> Result<Json<SyncResponse>, AppError> {
    let dir = state.content.lessons_dir.clone();
    gated_sync(&state, &client, route.as_str(), &headers, dir, sync_lessons).await
}
