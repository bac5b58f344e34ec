// Submission intake: derive page completion and status from raw form answers.
use crate::config::AppConfig;
use crate::model::{ImportError, Responses, Submission, SubmissionMetadata, SubmissionStatus};
use crate::storage::SubmissionStore;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Number of distinct pages touched by the answered questions.
/// Keys without a page mapping do not count.
pub fn completed_pages(form: &Responses, question_pages: &HashMap<String, u32>) -> u32 {
    let pages: BTreeSet<u32> = form
        .keys()
        .filter_map(|question| question_pages.get(question).copied())
        .filter(|&page| page > 0)
        .collect();
    pages.len() as u32
}

pub fn build_submission(
    form: Responses,
    config: &AppConfig,
    actual_completed_pages: Option<u32>,
    metadata: Option<SubmissionMetadata>,
    now: DateTime<Utc>,
) -> Submission {
    let calculated = completed_pages(&form, &config.question_pages);
    let completed = actual_completed_pages.filter(|&p| p > 0).unwrap_or(calculated);
    let status = if completed >= config.total_pages {
        SubmissionStatus::Completed
    } else {
        SubmissionStatus::Partial
    };

    debug!(
        "Intake: {} answers, {} pages calculated, {} pages final, status {}",
        form.len(),
        calculated,
        completed,
        status.as_str()
    );

    let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let metadata = match metadata {
        Some(mut meta) => {
            if meta.timestamp.is_empty() {
                meta.timestamp = timestamp;
            }
            meta
        }
        None => SubmissionMetadata {
            timestamp,
            ..Default::default()
        },
    };

    Submission {
        id: None,
        quiz_title: config.quiz_title.clone(),
        responses: form,
        total_pages: config.total_pages,
        completed_pages: completed,
        status,
        created_at: None,
        updated_at: None,
        metadata: Some(metadata),
    }
}

/// One element of an import file: either an already-built submission or the
/// raw answers of a form, which go through intake.
///
/// An object carrying `user_responses` is always a submission; if it does not
/// deserialize as one the whole import fails.
#[derive(Debug, Clone)]
pub enum ImportEntry {
    Submission(Submission),
    Form(Responses),
}

impl<'de> Deserialize<'de> for ImportEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("user_responses").is_some() {
            Submission::deserialize(value)
                .map(ImportEntry::Submission)
                .map_err(de::Error::custom)
        } else {
            Responses::deserialize(value)
                .map(ImportEntry::Form)
                .map_err(de::Error::custom)
        }
    }
}

pub fn load_import(path: impl AsRef<Path>) -> Result<Vec<ImportEntry>, ImportError> {
    let content = fs::read_to_string(path)?;
    let entries: Vec<ImportEntry> = serde_json::from_str(&content)?;
    Ok(entries)
}

/// Inserts every entry of the import file; returns the number stored.
pub fn import_file<S: SubmissionStore>(
    path: impl AsRef<Path>,
    store: &S,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<usize, ImportError> {
    let entries = load_import(&path)?;
    let mut stored = 0;
    for entry in entries {
        let submission = match entry {
            ImportEntry::Submission(submission) => submission,
            ImportEntry::Form(form) => build_submission(form, config, None, None, now),
        };
        store.insert_submission(&submission)?;
        stored += 1;
    }
    info!("Imported {} submissions from {}", stored, path.as_ref().display());
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResponseValue;
    use crate::storage::SqliteStorage;
    use chrono::TimeZone;
    use std::io::Write;

    fn config() -> AppConfig {
        let question_pages = [
            ("question1", 1),
            ("question2", 2),
            ("question3", 2),
            ("question4", 3),
            ("question9", 7),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        AppConfig {
            database_path: ":memory:".into(),
            quiz_title: "Product Feedback".into(),
            total_pages: 3,
            question_pages,
            import_path: None,
            report_path: None,
            report_interval_seconds: None,
        }
    }

    fn form(keys: &[&str]) -> Responses {
        keys.iter()
            .map(|k| (k.to_string(), ResponseValue::from("answer")))
            .collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_completed_pages_counts_distinct_mapped_pages() {
        let cfg = config();
        assert_eq!(completed_pages(&form(&["question2", "question3"]), &cfg.question_pages), 1);
        assert_eq!(
            completed_pages(&form(&["question1", "question3", "unknown"]), &cfg.question_pages),
            2
        );
        assert_eq!(completed_pages(&form(&[]), &cfg.question_pages), 0);
    }

    #[test]
    fn test_status_from_calculated_pages() {
        let cfg = config();
        let full = build_submission(form(&["question1", "question2", "question4"]), &cfg, None, None, now());
        assert_eq!(full.status, SubmissionStatus::Completed);
        assert_eq!(full.completed_pages, 3);
        assert_eq!(full.metadata.unwrap().timestamp, "2025-05-01T09:00:00.000Z");

        let partial = build_submission(form(&["question1"]), &cfg, None, None, now());
        assert_eq!(partial.status, SubmissionStatus::Partial);
        assert_eq!(partial.completed_pages, 1);
    }

    #[test]
    fn test_actual_pages_override_unless_zero() {
        let cfg = config();
        let overridden = build_submission(form(&["question1"]), &cfg, Some(3), None, now());
        assert_eq!(overridden.status, SubmissionStatus::Completed);

        let zero = build_submission(form(&["question1"]), &cfg, Some(0), None, now());
        assert_eq!(zero.completed_pages, 1);
    }

    #[test]
    fn test_import_file_mixes_forms_and_submissions() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"question1": ["Item 1"], "question9": "Loved the cookie"}},
                {{
                    "quiz_title": "Product Feedback",
                    "user_responses": {{"question9": "too expensive"}},
                    "total_pages": 9,
                    "completed_pages": 2,
                    "submission_status": "abandoned"
                }}
            ]"#
        )
        .unwrap();

        let store = SqliteStorage::in_memory().unwrap();
        let stored = import_file(file.path(), &store, &config(), now()).unwrap();
        assert_eq!(stored, 2);

        let all = store.get_all_submissions().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|s| s.status == SubmissionStatus::Abandoned));
        assert!(all.iter().any(|s| s.status == SubmissionStatus::Partial && s.completed_pages == 2));
    }

    #[test]
    fn test_import_rejects_incomplete_submission() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // no completed_pages: must not be taken for a form
        write!(
            file,
            r#"[{{
                "quiz_title": "Product Feedback",
                "user_responses": {{"question9": "too expensive"}},
                "total_pages": 9,
                "submission_status": "completed"
            }}]"#
        )
        .unwrap();

        let store = SqliteStorage::in_memory().unwrap();
        assert!(matches!(
            import_file(file.path(), &store, &config(), now()),
            Err(ImportError::Parse(_))
        ));
        assert_eq!(store.count_submissions().unwrap(), 0);
    }

    #[test]
    fn test_import_rejects_unknown_submission_status() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{
                "quiz_title": "Product Feedback",
                "user_responses": {{"question9": "fine"}},
                "total_pages": 9,
                "completed_pages": 9,
                "submission_status": "lost"
            }}]"#
        )
        .unwrap();

        let store = SqliteStorage::in_memory().unwrap();
        assert!(matches!(
            import_file(file.path(), &store, &config(), now()),
            Err(ImportError::Parse(_))
        ));
    }

    #[test]
    fn test_import_entry_shapes() {
        let form: ImportEntry = serde_json::from_str(r#"{"question9": "Loved it"}"#).unwrap();
        assert!(matches!(form, ImportEntry::Form(ref f) if f.contains_key("question9")));

        let full: ImportEntry = serde_json::from_str(
            r#"{"quiz_title": "Q", "user_responses": {"question9": "too expensive"},
                "total_pages": 9, "completed_pages": 9, "submission_status": "completed"}"#,
        )
        .unwrap();
        let ImportEntry::Submission(sub) = full else {
            panic!("expected a submission");
        };
        assert_eq!(sub.responses["question9"], ResponseValue::from("too expensive"));
    }

    #[test]
    fn test_import_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"not\": \"an array\"}}").unwrap();
        let store = SqliteStorage::in_memory().unwrap();
        assert!(matches!(
            import_file(file.path(), &store, &config(), now()),
            Err(ImportError::Parse(_))
        ));
    }
}
