use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, interval};
use tracing::{info, warn};

use crate::metrics::JOBS_PROCESSED;
use crate::models::{Submission, SubmissionStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    GradeSubmit,
    BadgesAward,
    EmailNotify,
    Other(String),
}

impl JobKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "queue:grade:submit" => JobKind::GradeSubmit,
            "queue:badges:award" => JobKind::BadgesAward,
            "queue:email:notify" => JobKind::EmailNotify,
            other => JobKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobKind::GradeSubmit => "queue:grade:submit",
            JobKind::BadgesAward => "queue:badges:award",
            JobKind::EmailNotify => "queue:email:notify",
            JobKind::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub kind: JobKind,
    pub payload: serde_json::Value,
}

impl Job {
    pub fn grade(submission_id: &str) -> Self {
        Self {
            id: format!("job_{submission_id}"),
            kind: JobKind::GradeSubmit,
            payload: serde_json::json!({ "submissionId": submission_id }),
        }
    }

    pub fn noop() -> Self {
        Self {
            id: chrono::Utc::now().timestamp_millis().to_string(),
            kind: JobKind::Other("noop".to_string()),
            payload: serde_json::json!({}),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobOutcome {
    Graded { status: SubmissionStatus, score: f64 },
    Badges { awarded: Vec<String> },
    Notified { sent: bool },
    Ack { ok: bool },
}

// Stub dispatch - every job kind has a fixed answer
pub fn process_job(job: &Job) -> JobOutcome {
    match job.kind {
        JobKind::GradeSubmit => JobOutcome::Graded {
            status: SubmissionStatus::Passed,
            score: 1.0,
        },
        JobKind::BadgesAward => JobOutcome::Badges { awarded: Vec::new() },
        JobKind::EmailNotify => JobOutcome::Notified { sent: true },
        JobKind::Other(_) => JobOutcome::Ack { ok: true },
    }
}

/// In-process queue consumer. Grading results are written back to the
/// submission they belong to.
pub async fn job_worker(
    mut rx: mpsc::Receiver<Job>,
    submissions: Arc<DashMap<String, Submission>>,
) {
    info!("Job worker started - processing jobs sequentially");

    while let Some(job) = rx.recv().await {
        let outcome = process_job(&job);
        JOBS_PROCESSED.with_label_values(&[job.kind.as_str()]).inc();

        if let JobOutcome::Graded { status, score } = &outcome {
            let target = job.payload["submissionId"].as_str().unwrap_or_default();
            match submissions.get_mut(target) {
                Some(mut submission) => {
                    submission.status = *status;
                    submission.score = Some(*score);
                }
                None => warn!(job = %job.id, submission = target, "graded unknown submission"),
            }
        }

        info!(job = %job.id, kind = job.kind.as_str(), ?outcome, "processed job");
    }
}

// Standalone loop for the `worker` subcommand
pub async fn poll_loop(every: Duration) {
    let mut ticker = interval(every);

    info!("Worker polling started (interval: {:?})", every);

    loop {
        ticker.tick().await;

        let job = Job::noop();
        let outcome = process_job(&job);
        JOBS_PROCESSED.with_label_values(&[job.kind.as_str()]).inc();
        info!(job = %job.id, kind = job.kind.as_str(), ?outcome, "processed job");
    }
}
