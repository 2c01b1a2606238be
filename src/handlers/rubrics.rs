use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::RubricRecord;
use crate::state::AppState;

#[derive(Serialize)]
pub struct RubricList {
    pub items: Vec<RubricRecord>,
}

pub async fn rubrics_handler(State(state): State<Arc<AppState>>) -> Result<Json<RubricList>, AppError> {
    let items = state.store.list_rubrics()?;
    Ok(Json(RubricList { items }))
}

pub async fn rubric_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RubricRecord>, AppError> {
    state
        .store
        .get_rubric(&id)?
        .map(Json)
        .ok_or(AppError::NotFound)
}
