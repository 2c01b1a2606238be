//! Flat-file content: lessons are `*.mdx` files with a front matter block,
//! rubrics are `*.json` documents. Each file is parsed on its own and a bad
//! file only produces an error item for that file.

use chrono::Utc;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ContentError;
use crate::models::{LessonRecord, RubricKind, RubricRecord};

const DEFAULT_XP_REWARD: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontValue {
    Int(i64),
    Text(String),
}

impl FrontValue {
    // Non-empty textual form, like a JS truthiness check on the raw value
    fn text(&self) -> Option<String> {
        match self {
            FrontValue::Int(n) => Some(n.to_string()),
            FrontValue::Text(s) if s.is_empty() => None,
            FrontValue::Text(s) => Some(s.clone()),
        }
    }
}

pub type FrontMatter = BTreeMap<String, FrontValue>;

// One parsed file
#[derive(Debug)]
pub struct ContentItem<T> {
    pub file: String,
    pub result: Result<T, ContentError>,
}

pub fn parse_front_matter(src: &str) -> FrontMatter {
    let mut fm = FrontMatter::new();

    if !src.starts_with("---") {
        return fm;
    }
    let Some(end) = src[3..].find("\n---").map(|i| i + 3) else {
        return fm;
    };

    for line in src[3..end].trim().lines() {
        let Some((key, raw)) = line.split_once(':') else {
            continue;
        };
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            continue;
        }
        fm.insert(key.to_string(), parse_value(raw.trim()));
    }

    fm
}

fn parse_value(raw: &str) -> FrontValue {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = raw.parse() {
            return FrontValue::Int(n);
        }
    }

    let quoted = raw.len() >= 2
        && ((raw.starts_with('"') && raw.ends_with('"'))
            || (raw.starts_with('\'') && raw.ends_with('\'')));
    if quoted {
        return FrontValue::Text(raw[1..raw.len() - 1].to_string());
    }

    FrontValue::Text(raw.to_string())
}

pub fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn int_field(fm: &FrontMatter, field: &'static str, default: i64) -> Result<i64, ContentError> {
    match fm.get(field) {
        None => Ok(default),
        Some(FrontValue::Int(n)) => Ok(*n),
        Some(FrontValue::Text(s)) if s.is_empty() => Ok(default),
        Some(FrontValue::Text(s)) => Err(ContentError::InvalidNumber {
            field,
            value: s.clone(),
        }),
    }
}

fn text_field(fm: &FrontMatter, field: &str) -> Option<String> {
    fm.get(field).and_then(FrontValue::text)
}

pub fn lesson_from_source(content_url: &str, src: &str) -> Result<LessonRecord, ContentError> {
    let fm = parse_front_matter(src);
    let slug = text_field(&fm, "slug").ok_or(ContentError::MissingSlug)?;

    let xp = int_field(&fm, "xpReward", DEFAULT_XP_REWARD as i64)?;
    let xp_reward = u32::try_from(xp).map_err(|_| ContentError::InvalidNumber {
        field: "xpReward",
        value: xp.to_string(),
    })?;

    Ok(LessonRecord {
        track: text_field(&fm, "track").unwrap_or_default(),
        title: text_field(&fm, "title").unwrap_or_else(|| slug.clone()),
        summary: text_field(&fm, "summary").unwrap_or_default(),
        content_url: content_url.to_string(),
        rubric_id: text_field(&fm, "rubric").unwrap_or_default(),
        order: int_field(&fm, "order", 0)?,
        xp_reward,
        badges: Vec::new(),
        checksum: checksum(src.as_bytes()),
        synced_at: Utc::now(),
        slug,
    })
}

pub fn rubric_from_source(file_name: &str, src: &str) -> Result<RubricRecord, ContentError> {
    let doc: Value = serde_json::from_str(src)?;
    let obj = doc.as_object().ok_or(ContentError::NotAnObject)?;

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => file_name.to_string(),
    };

    let version = match obj.get("version") {
        None | Some(Value::Null) => 1,
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ContentError::InvalidNumber {
                field: "version",
                value: v.to_string(),
            })?,
    };

    let kind = match obj.get("kind") {
        None | Some(Value::Null) => RubricKind::Quiz,
        Some(Value::String(s)) if s.is_empty() => RubricKind::Quiz,
        Some(Value::String(s)) => {
            RubricKind::parse(s).ok_or_else(|| ContentError::UnknownKind(s.clone()))?
        }
        Some(other) => return Err(ContentError::UnknownKind(other.to_string())),
    };

    Ok(RubricRecord {
        name: id.clone(),
        id,
        version,
        kind,
        checksum: checksum(src.as_bytes()),
        synced_at: Utc::now(),
        spec: doc,
    })
}

// File names in `dir` with the given extension, sorted
fn list_files(dir: &Path, extension: &str) -> Result<Vec<String>, ContentError> {
    let entries = fs::read_dir(dir).map_err(|source| ContentError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == extension))
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    Ok(names)
}

fn read(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses every lesson file in `dir`. Fails only when the directory itself
/// cannot be listed.
pub fn load_lessons(dir: &Path) -> Result<Vec<ContentItem<LessonRecord>>, ContentError> {
    let items = list_files(dir, "mdx")?
        .into_iter()
        .map(|file| {
            let path = dir.join(&file);
            let content_url = path.display().to_string();
            let result = read(&path).and_then(|src| lesson_from_source(&content_url, &src));
            ContentItem { file, result }
        })
        .collect();
    Ok(items)
}

pub fn load_rubrics(dir: &Path) -> Result<Vec<ContentItem<RubricRecord>>, ContentError> {
    let items = list_files(dir, "json")?
        .into_iter()
        .map(|file| {
            let result = read(&dir.join(&file)).and_then(|src| rubric_from_source(&file, &src));
            ContentItem { file, result }
        })
        .collect();
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LESSON: &str = "---\nslug: foundations-intro\ntrack: foundations\ntitle: \"Foundations Intro\"\norder: 1\nxpReward: 15\nrubric: 'intro-quiz'\n---\n\n# Hello\n";

    #[test]
    fn parses_front_matter_values() {
        let fm = parse_front_matter(LESSON);
        assert_eq!(fm.get("slug"), Some(&FrontValue::Text("foundations-intro".into())));
        assert_eq!(fm.get("title"), Some(&FrontValue::Text("Foundations Intro".into())));
        assert_eq!(fm.get("rubric"), Some(&FrontValue::Text("intro-quiz".into())));
        assert_eq!(fm.get("order"), Some(&FrontValue::Int(1)));
        assert_eq!(fm.get("xpReward"), Some(&FrontValue::Int(15)));
    }

    #[test]
    fn no_front_matter_without_leading_fence() {
        assert!(parse_front_matter("\n---\nslug: x\n---\n").is_empty());
        assert!(parse_front_matter("# just markdown").is_empty());
    }

    #[test]
    fn unterminated_block_is_empty() {
        assert!(parse_front_matter("---\nslug: x\n").is_empty());
    }

    #[test]
    fn skips_lines_that_are_not_key_value() {
        let fm = parse_front_matter("---\nbad-key: no\n  indented: no\njust text\nok_key:yes\n---\n");
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.get("ok_key"), Some(&FrontValue::Text("yes".into())));
    }

    #[test]
    fn value_with_colon_keeps_the_rest() {
        let fm = parse_front_matter("---\nsummary: Ship it: fast\n---\n");
        assert_eq!(fm.get("summary"), Some(&FrontValue::Text("Ship it: fast".into())));
    }

    #[test]
    fn lesson_defaults_apply() {
        let lesson = lesson_from_source("x.mdx", "---\nslug: bare\n---\n").unwrap();
        assert_eq!(lesson.slug, "bare");
        assert_eq!(lesson.title, "bare");
        assert_eq!(lesson.track, "");
        assert_eq!(lesson.order, 0);
        assert_eq!(lesson.xp_reward, 10);
        assert!(lesson.badges.is_empty());
        assert_eq!(lesson.checksum.len(), 64);
    }

    #[test]
    fn lesson_needs_a_slug() {
        assert!(matches!(
            lesson_from_source("x.mdx", "---\ntitle: Nope\n---\n"),
            Err(ContentError::MissingSlug)
        ));
    }

    #[test]
    fn lesson_rejects_textual_order() {
        let err = lesson_from_source("x.mdx", "---\nslug: s\norder: first\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::InvalidNumber { field: "order", .. }));
    }

    #[test]
    fn rubric_defaults_to_file_name_and_quiz() {
        let rubric = rubric_from_source("intro-quiz.json", "{\"questions\": []}").unwrap();
        assert_eq!(rubric.id, "intro-quiz.json");
        assert_eq!(rubric.name, "intro-quiz.json");
        assert_eq!(rubric.version, 1);
        assert_eq!(rubric.kind, RubricKind::Quiz);
        assert_eq!(rubric.spec["questions"], serde_json::json!([]));
    }

    #[test]
    fn rubric_reads_declared_fields() {
        let rubric =
            rubric_from_source("f", r#"{"id": "mvp-code", "kind": "code", "version": 3}"#).unwrap();
        assert_eq!(rubric.id, "mvp-code");
        assert_eq!(rubric.kind, RubricKind::Code);
        assert_eq!(rubric.version, 3);
    }

    #[test]
    fn rubric_errors() {
        assert!(matches!(rubric_from_source("f", "{oops"), Err(ContentError::Json(_))));
        assert!(matches!(rubric_from_source("f", "[1, 2]"), Err(ContentError::NotAnObject)));
        assert!(matches!(
            rubric_from_source("f", r#"{"kind": "essay"}"#),
            Err(ContentError::UnknownKind(k)) if k == "essay"
        ));
    }

    #[test]
    fn load_lessons_yields_item_per_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.mdx"), LESSON).unwrap();
        fs::write(dir.path().join("a.mdx"), "no front matter").unwrap();
        fs::write(dir.path().join("notes.txt"), "---\nslug: ignored\n---\n").unwrap();

        let items = load_lessons(dir.path()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].file, "a.mdx");
        assert!(matches!(items[0].result, Err(ContentError::MissingSlug)));
        assert_eq!(items[1].file, "b.mdx");
        let lesson = items[1].result.as_ref().unwrap();
        assert_eq!(lesson.slug, "foundations-intro");
        assert!(lesson.content_url.ends_with("b.mdx"));
    }

    #[test]
    fn load_rubrics_keys_anonymous_rubric_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("intro-quiz.json"), r#"{"kind": "quiz"}"#).unwrap();
        fs::write(dir.path().join("named.json"), r#"{"id": "mvp-code"}"#).unwrap();

        let items = load_rubrics(dir.path()).unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.result.as_ref().unwrap().id.as_str()).collect();
        assert_eq!(ids, vec!["intro-quiz.json", "mvp-code"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_rubrics(&dir.path().join("absent")),
            Err(ContentError::Io { .. })
        ));
    }
}
