pub mod sqlite;

pub use sqlite::SqliteStorage;

use crate::model::{StorageError, Submission};

/// Persistence boundary for submissions: the analyzer only ever sees what
/// `get_all_submissions` returns.
pub trait SubmissionStore {
    /// Stores the submission, filling in id and timestamps when absent, and
    /// returns the record as stored.
    fn insert_submission(&self, submission: &Submission) -> Result<Submission, StorageError>;
    /// All submissions, newest first.
    fn get_all_submissions(&self) -> Result<Vec<Submission>, StorageError>;
    fn count_submissions(&self) -> Result<usize, StorageError>;
}
