use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::content::{ContentItem, load_lessons, load_rubrics};
use crate::error::{ContentError, StoreError};
use crate::metrics::{SYNC_ITEMS, SYNC_LATENCY};
use crate::store::{Store, UpsertStatus};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    Upserted { key: String, status: UpsertStatus },
    ParseError { message: String },
    PersistError { key: String, message: String },
}

impl SyncOutcome {
    fn label(&self) -> &'static str {
        match self {
            SyncOutcome::Upserted { .. } => "upserted",
            SyncOutcome::ParseError { .. } => "parse_error",
            SyncOutcome::PersistError { .. } => "persist_error",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncItem {
    pub file: String,
    #[serde(flatten)]
    pub outcome: SyncOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub source: &'static str,
    pub upserted: usize,
    pub failed: usize,
    pub items: Vec<SyncItem>,
}

impl SyncReport {
    fn new(source: &'static str, items: Vec<SyncItem>) -> Self {
        let upserted = items
            .iter()
            .filter(|i| matches!(i.outcome, SyncOutcome::Upserted { .. }))
            .count();
        Self {
            source,
            upserted,
            failed: items.len() - upserted,
            items,
        }
    }
}

// Upserts every parsed item; a bad item never stops the rest
fn apply<T>(
    source: &'static str,
    items: Vec<ContentItem<T>>,
    key_of: impl Fn(&T) -> &str,
    upsert: impl Fn(&T) -> Result<UpsertStatus, StoreError>,
) -> SyncReport {
    let start = Instant::now();

    let items: Vec<SyncItem> = items
        .into_iter()
        .map(|item| {
            let outcome = match item.result {
                Err(e) => SyncOutcome::ParseError {
                    message: e.to_string(),
                },
                Ok(record) => {
                    let key = key_of(&record).to_string();
                    match upsert(&record) {
                        Ok(status) => SyncOutcome::Upserted { key, status },
                        Err(e) => SyncOutcome::PersistError {
                            key,
                            message: e.to_string(),
                        },
                    }
                }
            };

            if !matches!(outcome, SyncOutcome::Upserted { .. }) {
                warn!(source, file = %item.file, ?outcome, "sync skipped file");
            }
            SYNC_ITEMS.with_label_values(&[source, outcome.label()]).inc();

            SyncItem {
                file: item.file,
                outcome,
            }
        })
        .collect();

    SYNC_LATENCY.observe(start.elapsed().as_secs_f64());

    let report = SyncReport::new(source, items);
    info!(
        source,
        upserted = report.upserted,
        failed = report.failed,
        "sync finished"
    );
    report
}

pub fn sync_lessons(dir: &Path, store: &Store) -> Result<SyncReport, ContentError> {
    let items = load_lessons(dir)?;
    Ok(apply("lessons", items, |l| l.slug.as_str(), |l| store.upsert_lesson(l)))
}

pub fn sync_rubrics(dir: &Path, store: &Store) -> Result<SyncReport, ContentError> {
    let items = load_rubrics(dir)?;
    Ok(apply("rubrics", items, |r| r.id.as_str(), |r| store.upsert_rubric(r)))
}
