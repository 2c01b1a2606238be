use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Lesson row, keyed by slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub slug: String,
    pub track: String,
    pub title: String,
    pub summary: String,
    pub content_url: String,
    pub rubric_id: String,
    pub order: i64,
    pub xp_reward: u32,
    pub badges: Vec<String>,
    pub checksum: String,
    pub synced_at: DateTime<Utc>,
}

// Catalog order: track, then order within the track, then slug
pub fn sort_lessons(lessons: &mut [LessonRecord]) {
    lessons.sort_by(|a, b| {
        (a.track.as_str(), a.order, a.slug.as_str()).cmp(&(b.track.as_str(), b.order, b.slug.as_str()))
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RubricKind {
    Code,
    Business,
    Quiz,
}

impl RubricKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "code" => Some(RubricKind::Code),
            "business" => Some(RubricKind::Business),
            "quiz" => Some(RubricKind::Quiz),
            _ => None,
        }
    }
}

// Rubric row, keyed by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricRecord {
    pub id: String,
    pub name: String,
    pub version: u32,
    pub kind: RubricKind,
    pub spec: serde_json::Value,
    pub checksum: String,
    pub synced_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonState {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub state: LessonState,
    pub xp_claimed: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub slug: String,
    pub track: String,
    pub title: String,
    pub state: LessonState,
    pub xp_reward: u32,
}

#[derive(Serialize)]
pub struct LessonList {
    pub items: Vec<LessonSummary>,
}

#[derive(Serialize)]
pub struct RubricRef {
    pub id: String,
    pub kind: RubricKind,
}

#[derive(Serialize)]
pub struct LessonDetail {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub track: String,
    pub rubric: Option<RubricRef>,
    pub starter: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Queued,
    Passed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: String,
    pub lesson: String,
    pub status: SubmissionStatus,
    pub score: Option<f64>,
    pub feedback: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub submission_id: String,
}

#[derive(Serialize)]
pub struct Awarded {
    pub xp: u32,
    pub gems: u32,
}

#[derive(Serialize)]
pub struct ClaimResponse {
    pub awarded: Awarded,
}

#[derive(Serialize)]
pub struct Profile {
    pub streak: u32,
    pub xp: u32,
    pub badges: Vec<String>,
}

#[derive(Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub xp: u32,
}

#[derive(Serialize)]
pub struct Leaderboard {
    pub period: &'static str,
    pub top: Vec<LeaderboardEntry>,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}
