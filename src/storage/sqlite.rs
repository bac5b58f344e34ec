use crate::model::{StorageError, Submission, SubmissionMetadata, SubmissionStatus};
use crate::storage::SubmissionStore;
use crate::utils::parse_datetime;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, Row};
use tracing::debug;

pub struct SqliteStorage {
    conn: Connection,
}

/// Raw column values, converted into a `Submission` outside the row callback.
struct SubmissionRow {
    id: String,
    quiz_title: String,
    user_responses: String,
    total_pages: u32,
    completed_pages: u32,
    submission_status: String,
    created_at: String,
    updated_at: String,
    metadata: Option<String>,
}

const SELECT_COLUMNS: &str = "id, quiz_title, user_responses, total_pages, completed_pages, \
     submission_status, created_at, updated_at, metadata";

impl SqliteStorage {
    /// Opens (or creates) the database file and runs migrations.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Self::init(Connection::open(db_path)?)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS quiz_submissions (
                id TEXT PRIMARY KEY,
                quiz_title TEXT NOT NULL,
                user_responses TEXT NOT NULL,
                total_pages INTEGER NOT NULL,
                completed_pages INTEGER NOT NULL,
                submission_status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_quiz_submissions_created_at
                ON quiz_submissions (created_at);
            ",
        )?;

        // Columns added after the first schema
        Self::migrate_add_column_if_missing(&conn, "quiz_submissions", "metadata", "TEXT")?;

        Ok(Self { conn })
    }

    /// Adds the column if the table does not have it yet.
    fn migrate_add_column_if_missing(
        conn: &Connection,
        table: &str,
        column: &str,
        column_def: &str,
    ) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let existing_columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        if !existing_columns.iter().any(|c| c == column) {
            debug!("Migrating {}: adding column {}", table, column);
            let alter_sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def);
            conn.execute(&alter_sql, [])?;
        }

        Ok(())
    }

    /// Fetches one submission by id.
    #[cfg(test)]
    pub fn get_submission(&self, id: &str) -> Result<Option<Submission>, StorageError> {
        use rusqlite::OptionalExtension;

        let sql = format!("SELECT {} FROM quiz_submissions WHERE id = ?1", SELECT_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        row.map(Self::into_submission).transpose()
    }

    fn map_row(row: &Row) -> Result<SubmissionRow, rusqlite::Error> {
        Ok(SubmissionRow {
            id: row.get(0)?,
            quiz_title: row.get(1)?,
            user_responses: row.get(2)?,
            total_pages: row.get(3)?,
            completed_pages: row.get(4)?,
            submission_status: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
            metadata: row.get(8)?,
        })
    }

    fn into_submission(row: SubmissionRow) -> Result<Submission, StorageError> {
        let status = SubmissionStatus::parse(&row.submission_status)
            .ok_or_else(|| StorageError::InvalidStatus(row.submission_status.clone()))?;
        let metadata = row
            .metadata
            .as_deref()
            .map(serde_json::from_str::<SubmissionMetadata>)
            .transpose()?;

        Ok(Submission {
            id: Some(row.id),
            quiz_title: row.quiz_title,
            responses: serde_json::from_str(&row.user_responses)?,
            total_pages: row.total_pages,
            completed_pages: row.completed_pages,
            status,
            created_at: Some(Self::parse_timestamp(&row.created_at)?),
            updated_at: Some(Self::parse_timestamp(&row.updated_at)?),
            metadata,
        })
    }

    fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StorageError> {
        parse_datetime(value).ok_or_else(|| StorageError::InvalidTimestamp(value.to_string()))
    }

    fn format_timestamp(value: &DateTime<Utc>) -> String {
        // fixed width so text ordering matches time ordering
        value.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

impl SubmissionStore for SqliteStorage {
    fn insert_submission(&self, submission: &Submission) -> Result<Submission, StorageError> {
        let mut stored = submission.clone();
        let id = stored.id.get_or_insert_with(|| uuid::Uuid::new_v4().to_string()).clone();
        // stored precision is microseconds; keep the returned record identical to what is read back
        let created_at = stored.created_at.unwrap_or_else(Utc::now).trunc_subsecs(6);
        let updated_at = stored.updated_at.unwrap_or(created_at).trunc_subsecs(6);
        stored.created_at = Some(created_at);
        stored.updated_at = Some(updated_at);

        let metadata = stored.metadata.as_ref().map(serde_json::to_string).transpose()?;

        self.conn.execute(
            "INSERT INTO quiz_submissions (
                id, quiz_title, user_responses, total_pages, completed_pages,
                submission_status, created_at, updated_at, metadata
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &id,
                &stored.quiz_title,
                serde_json::to_string(&stored.responses)?,
                stored.total_pages,
                stored.completed_pages,
                stored.status.as_str(),
                Self::format_timestamp(&created_at),
                Self::format_timestamp(&updated_at),
                metadata,
            ],
        )?;

        debug!("Stored submission {} ({})", id, stored.status.as_str());
        Ok(stored)
    }

    fn get_all_submissions(&self) -> Result<Vec<Submission>, StorageError> {
        let sql = format!(
            "SELECT {} FROM quiz_submissions ORDER BY created_at DESC, rowid DESC",
            SELECT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::map_row)?;

        let mut submissions = Vec::new();
        for row in rows {
            submissions.push(Self::into_submission(row?)?);
        }

        Ok(submissions)
    }

    fn count_submissions(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quiz_submissions", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
