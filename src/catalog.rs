use std::path::Path;
use tracing::{debug, warn};

use crate::content::load_lessons;
use crate::error::StoreError;
use crate::models::{LessonRecord, sort_lessons};
use crate::store::Store;

/// Lessons for the public API.
///
/// The lesson files are the primary source. When the directory cannot be
/// read, or holds no parseable lesson, the last synced rows in the store are
/// served instead.
pub fn lessons(dir: &Path, store: &Store) -> Result<Vec<LessonRecord>, StoreError> {
    match load_lessons(dir) {
        Ok(items) => {
            let mut found: Vec<LessonRecord> =
                items.into_iter().filter_map(|item| item.result.ok()).collect();
            if !found.is_empty() {
                sort_lessons(&mut found);
                return Ok(found);
            }
            debug!(dir = %dir.display(), "no lesson files, reading from database");
        }
        Err(e) => warn!(error = %e, "lesson files unavailable, reading from database"),
    }

    store.list_lessons()
}

pub fn lesson(dir: &Path, store: &Store, slug: &str) -> Result<Option<LessonRecord>, StoreError> {
    Ok(lessons(dir, store)?.into_iter().find(|l| l.slug == slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn files_win_over_database() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(&dir.path().join("db.redb")).unwrap();
        let lessons_dir = dir.path().join("lessons");
        fs::create_dir(&lessons_dir).unwrap();
        fs::write(lessons_dir.join("a.mdx"), "---\nslug: from-file\n---\n").unwrap();

        let db_only = crate::content::lesson_from_source("x", "---\nslug: from-db\n---\n").unwrap();
        store.upsert_lesson(&db_only).unwrap();

        let slugs: Vec<_> = lessons(&lessons_dir, &store).unwrap().into_iter().map(|l| l.slug).collect();
        assert_eq!(slugs, vec!["from-file"]);
    }

    #[test]
    fn falls_back_to_database() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(&dir.path().join("db.redb")).unwrap();
        let db_only = crate::content::lesson_from_source("x", "---\nslug: from-db\n---\n").unwrap();
        store.upsert_lesson(&db_only).unwrap();

        let missing = dir.path().join("missing");
        assert_eq!(lesson(&missing, &store, "from-db").unwrap().unwrap().slug, "from-db");
        assert!(lesson(&missing, &store, "other").unwrap().is_none());
    }
}
