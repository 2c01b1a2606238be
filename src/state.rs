use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

use crate::config::{ContentArgs, GateConfig};
use crate::events::EventSink;
use crate::gate::AdminGate;
use crate::models::Progress;
use crate::models::Submission;
use crate::store::Store;
use crate::worker::Job;

// app's shared state
pub struct AppState {
    pub content: ContentArgs,
    pub gate: AdminGate,
    pub store: Store,
    pub job_tx: mpsc::Sender<Job>,
    pub submissions: Arc<DashMap<String, Submission>>,
    pub progress: DashMap<String, Progress>, // slug -> Progress
    submission_seq: AtomicU64,
}

impl AppState {
    /// Builds the state and hands back the receiving end of the job queue,
    /// which the caller gives to [`crate::worker::job_worker`].
    pub fn new(
        content: ContentArgs,
        gate_config: &GateConfig,
        sink: Arc<dyn EventSink>,
        store: Store,
        queue_capacity: usize,
    ) -> (Arc<Self>, mpsc::Receiver<Job>) {
        let (job_tx, job_rx) = mpsc::channel(queue_capacity.max(1));

        let state = Arc::new(Self {
            content,
            gate: AdminGate::new(gate_config, sink),
            store,
            job_tx,
            submissions: Arc::new(DashMap::new()),
            progress: DashMap::new(),
            submission_seq: AtomicU64::new(0),
        });

        (state, job_rx)
    }

    pub fn next_submission_id(&self) -> String {
        let seq = self.submission_seq.fetch_add(1, Ordering::Relaxed);
        format!("sub_{}_{}", chrono::Utc::now().timestamp_millis(), seq)
    }
}
