use std::sync::Mutex;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::domain::{ClassName, UserId};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// One accepted submission. Only metadata is kept; the file stays with the
/// transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submission_id: Uuid,
    pub user_id: UserId,
    pub student: String,
    pub class: ClassName,
    pub filename: String,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(
        user_id: UserId,
        student: impl Into<String>,
        class: ClassName,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            submission_id: Uuid::new_v4(),
            user_id,
            student: student.into(),
            class,
            filename: filename.into(),
            submitted_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("no class selected")]
    MissingSelection,
    #[error("unsupported attachment kind '{kind}'")]
    UnsupportedAttachment { kind: String },
    #[error("failed to record submission: {0}")]
    RecordingFailed(#[source] anyhow::Error),
}

/// Sink for accepted submissions.
pub trait SubmissionLog: Send + Sync {
    fn record(&self, record: &SubmissionRecord) -> anyhow::Result<()>;
}

/// Writes one structured log line per submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSubmissionLog;

impl SubmissionLog for TracingSubmissionLog {
    fn record(&self, record: &SubmissionRecord) -> anyhow::Result<()> {
        info!(
            submission_id = %record.submission_id,
            user_id = %record.user_id,
            student = %record.student,
            class = %record.class,
            filename = %record.filename,
            "new assignment submitted"
        );
        Ok(())
    }
}

/// Keeps submissions in memory so callers can inspect them.
#[derive(Debug, Default)]
pub struct MemorySubmissionLog {
    records: Mutex<Vec<SubmissionRecord>>,
}

impl MemorySubmissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SubmissionRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SubmissionLog for MemorySubmissionLog {
    fn record(&self, record: &SubmissionRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .map_err(|_| anyhow!("submission log lock poisoned"))?
            .push(record.clone());
        Ok(())
    }
}
