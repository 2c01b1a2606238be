mod admin;
mod health;
mod lessons;
mod metrics;
mod progress;
mod rubrics;
mod tutor;

pub use admin::{ClientId, SyncResponse, publish_rubrics_handler, sync_lessons_handler};
pub use health::health_handler;
pub use lessons::{lesson_handler, lessons_handler, submission_handler, submit_handler};
pub use metrics::metrics_handler;
pub use progress::{claim_handler, leaderboard_handler, profile_handler, start_handler};
pub use rubrics::{rubric_handler, rubrics_handler};
pub use tutor::tutor_chat_handler;

use crate::error::AppError;

pub async fn not_found_handler() -> AppError {
    AppError::NotFound
}
