use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::lessons::find_lesson;
use crate::error::AppError;
use crate::models::{Awarded, ClaimResponse, Leaderboard, LessonState, OkResponse, Profile};
use crate::state::AppState;

pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    find_lesson(&state, &slug).await?;

    let mut progress = state.progress.entry(slug).or_default();
    if progress.state == LessonState::NotStarted {
        progress.state = LessonState::InProgress;
    }

    Ok(Json(OkResponse { ok: true }))
}

// XP is only awarded on the first claim of a lesson
pub async fn claim_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ClaimResponse>, AppError> {
    let lesson = find_lesson(&state, &slug).await?;

    let mut progress = state.progress.entry(slug).or_default();
    let xp = if progress.state == LessonState::Completed {
        0
    } else {
        progress.state = LessonState::Completed;
        progress.xp_claimed = lesson.xp_reward;
        lesson.xp_reward
    };

    Ok(Json(ClaimResponse {
        awarded: Awarded { xp, gems: 0 },
    }))
}

pub async fn profile_handler(State(state): State<Arc<AppState>>) -> Json<Profile> {
    let xp = state.progress.iter().map(|p| p.xp_claimed).sum();
    Json(Profile {
        streak: 0,
        xp,
        badges: Vec::new(),
    })
}

pub async fn leaderboard_handler() -> Json<Leaderboard> {
    Json(Leaderboard {
        period: "weekly",
        top: Vec::new(),
    })
}
