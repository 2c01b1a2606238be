//! Embedded lesson and rubric database.
//!
//! Two redb tables keyed by slug / rubric id, values JSON-encoded. Each
//! upsert is its own write transaction so a sync that stops halfway keeps
//! everything written before the stop.

use redb::{Database, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

use crate::error::StoreError;
use crate::models::{LessonRecord, RubricRecord, sort_lessons};

type RecordTable = TableDefinition<'static, &'static str, &'static [u8]>;

const LESSONS_TABLE: RecordTable = TableDefinition::new("lessons");
const RUBRICS_TABLE: RecordTable = TableDefinition::new("rubrics");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertStatus {
    Created,
    Updated,
    Unchanged,
}

#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(LESSONS_TABLE)?;
            write_txn.open_table(RUBRICS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    pub fn ping(&self) -> bool {
        self.db.begin_read().is_ok()
    }

    pub fn upsert_lesson(&self, lesson: &LessonRecord) -> Result<UpsertStatus, StoreError> {
        self.upsert(LESSONS_TABLE, &lesson.slug, lesson, |old: &LessonRecord| {
            old.checksum == lesson.checksum && old.content_url == lesson.content_url
        })
    }

    pub fn upsert_rubric(&self, rubric: &RubricRecord) -> Result<UpsertStatus, StoreError> {
        self.upsert(RUBRICS_TABLE, &rubric.id, rubric, |old: &RubricRecord| {
            old.checksum == rubric.checksum
        })
    }

    pub fn get_lesson(&self, slug: &str) -> Result<Option<LessonRecord>, StoreError> {
        self.get(LESSONS_TABLE, slug)
    }

    pub fn get_rubric(&self, id: &str) -> Result<Option<RubricRecord>, StoreError> {
        self.get(RUBRICS_TABLE, id)
    }

    /// Lessons ordered by track, then order, then slug.
    pub fn list_lessons(&self) -> Result<Vec<LessonRecord>, StoreError> {
        let mut lessons: Vec<LessonRecord> = self.list(LESSONS_TABLE)?;
        sort_lessons(&mut lessons);
        Ok(lessons)
    }

    // Keys iterate in order, so rubrics come back sorted by id
    pub fn list_rubrics(&self) -> Result<Vec<RubricRecord>, StoreError> {
        self.list(RUBRICS_TABLE)
    }

    fn upsert<T>(
        &self,
        def: RecordTable,
        key: &str,
        record: &T,
        unchanged: impl Fn(&T) -> bool,
    ) -> Result<UpsertStatus, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let write_txn = self.db.begin_write()?;
        let status = {
            let mut table = write_txn.open_table(def)?;

            let existing: Option<T> = match table.get(key)? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };

            match existing {
                Some(old) if unchanged(&old) => UpsertStatus::Unchanged,
                found => {
                    let bytes = serde_json::to_vec(record)?;
                    table.insert(key, bytes.as_slice())?;
                    if found.is_some() {
                        UpsertStatus::Updated
                    } else {
                        UpsertStatus::Created
                    }
                }
            }
        };
        write_txn.commit()?;

        Ok(status)
    }

    fn get<T: DeserializeOwned>(&self, def: RecordTable, key: &str) -> Result<Option<T>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(def)?;

        match table.get(key)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    fn list<T: DeserializeOwned>(&self, def: RecordTable) -> Result<Vec<T>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(def)?;

        let mut out = Vec::new();
        for entry in table.iter()? {
            let (_key, value) = entry?;
            out.push(serde_json::from_slice(value.value())?);
        }
        Ok(out)
    }
}
