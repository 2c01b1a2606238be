use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::path::Path as FsPath;
use std::sync::Arc;
use tracing::info;

use crate::catalog;
use crate::error::{AppError, StoreError};
use crate::models::{
    LessonDetail, LessonList, LessonRecord, LessonSummary, RubricRef, Submission, SubmissionStatus,
    SubmitResponse,
};
use crate::state::AppState;
use crate::store::Store;
use crate::worker::Job;

// Lesson files are listed, read and hashed on every call, so keep it off the
// async threads like the admin sync
async fn read_catalog<T, F>(state: &AppState, read: F) -> Result<T, AppError>
where
    F: FnOnce(&FsPath, &Store) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let dir = state.content.lessons_dir.clone();
    let store = state.store.clone();
    let found = tokio::task::spawn_blocking(move || read(&dir, &store))
        .await
        .map_err(|e| AppError::Internal(format!("catalog task failed: {e}")))??;
    Ok(found)
}

pub(super) async fn find_lesson(state: &AppState, slug: &str) -> Result<LessonRecord, AppError> {
    let slug = slug.to_string();
    read_catalog(state, move |dir, store| catalog::lesson(dir, store, &slug))
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn lessons_handler(State(state): State<Arc<AppState>>) -> Result<Json<LessonList>, AppError> {
    let lessons = read_catalog(&state, catalog::lessons).await?;

    let items = lessons
        .into_iter()
        .map(|l| LessonSummary {
            state: state
                .progress
                .get(&l.slug)
                .map(|p| p.state)
                .unwrap_or_default(),
            slug: l.slug,
            track: l.track,
            title: l.title,
            xp_reward: l.xp_reward,
        })
        .collect();

    Ok(Json(LessonList { items }))
}

pub async fn lesson_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<LessonDetail>, AppError> {
    let (lesson, rubric) = read_catalog(&state, move |dir, store| {
        let Some(lesson) = catalog::lesson(dir, store, &slug)? else {
            return Ok(None);
        };
        let rubric = if lesson.rubric_id.is_empty() {
            None
        } else {
            store.get_rubric(&lesson.rubric_id)?
        };
        Ok(Some((lesson, rubric)))
    })
    .await?
    .ok_or(AppError::NotFound)?;

    let rubric = rubric.map(|r| RubricRef { id: r.id, kind: r.kind });

    Ok(Json(LessonDetail {
        slug: lesson.slug,
        title: lesson.title,
        summary: lesson.summary,
        track: lesson.track,
        rubric,
        starter: serde_json::json!({}),
    }))
}

pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let lesson = find_lesson(&state, &slug).await?;

    let id = state.next_submission_id();
    state.submissions.insert(
        id.clone(),
        Submission {
            id: id.clone(),
            lesson: lesson.slug,
            status: SubmissionStatus::Queued,
            score: None,
            feedback: Vec::new(),
        },
    );

    state
        .job_tx
        .send(Job::grade(&id))
        .await
        .map_err(|_| AppError::Internal("Failed to queue submission".to_string()))?;

    info!(submission = %id, lesson = %slug, "submission queued");
    Ok((StatusCode::ACCEPTED, Json(SubmitResponse { submission_id: id })))
}

pub async fn submission_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Submission>, AppError> {
    state
        .submissions
        .get(&id)
        .map(|s| Json(s.clone()))
        .ok_or(AppError::NotFound)
}
