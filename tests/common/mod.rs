#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::ConnectInfo,
    http::{Request, StatusCode},
};
use std::fs;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use startupquest_api::config::{ContentArgs, GateConfig};
use startupquest_api::events::{EventSink, GateEvent};
use startupquest_api::state::AppState;
use startupquest_api::store::Store;
use startupquest_api::{router, worker};

#[derive(Default)]
pub struct Recorder(pub Mutex<Vec<GateEvent>>);

impl EventSink for Recorder {
    fn record(&self, event: &GateEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

pub struct TestApp {
    pub dir: TempDir,
    pub state: Arc<AppState>,
    pub events: Arc<Recorder>,
}

pub const INTRO_LESSON: &str = "---\nslug: foundations-intro\ntrack: foundations\ntitle: Foundations Intro\norder: 1\nxpReward: 25\nrubric: intro-quiz\n---\n\n# Welcome\n";
pub const AI_LESSON: &str = "---\nslug: ai-basics-101\ntrack: ai-basics\ntitle: AI Basics 101\norder: 1\n---\n";
pub const INTRO_RUBRIC: &str = r#"{"id": "intro-quiz", "kind": "quiz", "version": 2, "questions": [{"q": "What is an MVP?"}]}"#;

impl TestApp {
    pub fn new(secret: &str, max_requests: u32, window: Duration) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let lessons_dir = dir.path().join("lessons");
        let rubrics_dir = dir.path().join("rubrics");
        fs::create_dir(&lessons_dir).unwrap();
        fs::create_dir(&rubrics_dir).unwrap();
        fs::write(lessons_dir.join("foundations-intro.mdx"), INTRO_LESSON).unwrap();
        fs::write(lessons_dir.join("ai-basics-101.mdx"), AI_LESSON).unwrap();
        fs::write(rubrics_dir.join("intro-quiz.json"), INTRO_RUBRIC).unwrap();

        let store = Store::open(&dir.path().join("test.redb")).unwrap();
        let events = Arc::new(Recorder::default());
        let gate = GateConfig {
            window,
            max_requests,
            secret: secret.to_string(),
        };
        let (state, job_rx) = AppState::new(
            ContentArgs {
                lessons_dir,
                rubrics_dir,
            },
            &gate,
            events.clone(),
            store,
            16,
        );
        tokio::spawn(worker::job_worker(job_rx, state.submissions.clone()));

        Self { dir, state, events }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let res = self.router().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Request::post(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn admin(&self, uri: &str, key: Option<&str>, peer: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::post(uri);
        if let Some(key) = key {
            builder = builder.header("x-admin-key", key);
        }
        if let Some(peer) = peer {
            let addr: SocketAddr = format!("{peer}:40000").parse().unwrap();
            builder = builder.extension(ConnectInfo(addr));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }
}
