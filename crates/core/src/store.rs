//! ProgressStore trait — read access to the rows the tutoring engine
//! assembles context from, plus the single write it performs.
//!
//! Subjects, topics, and progress rows are owned by the surrounding
//! application; the engine only reads them. The one mutation the engine is
//! allowed is appending a completed chat exchange. That invariant is
//! enforced by this trait's surface: there is no update or delete path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Topics with a recorded score below this count as weak areas.
pub const WEAK_SCORE_THRESHOLD: f32 = 70.0;

/// At most this many weak areas are surfaced into a tutor prompt.
pub const WEAK_AREA_LIMIT: usize = 5;

/// How many stored exchanges are replayed into the message list.
pub const HISTORY_LIMIT: usize = 5;

/// Grade assumed when neither the request nor the subject row supplies one.
pub const DEFAULT_GRADE: u8 = 11;

/// A school subject belonging to one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject ID
    pub id: String,

    /// The student this subject row belongs to
    pub user_id: String,

    /// Subject name (e.g., "Fizika")
    pub name: String,

    /// Grade level (e.g., 11)
    pub grade: u8,

    /// Free-text teacher label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
}

/// Completion status of a topic within a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopicStatus {
    #[default]
    Locked,
    InProgress,
    Completed,
}

impl TopicStatus {
    /// The stored string form (`locked`, `in-progress`, `completed`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Parse the stored string form, defaulting to `Locked` for unknown values.
    pub fn parse(s: &str) -> Self {
        match s {
            "in-progress" => Self::InProgress,
            "completed" => Self::Completed,
            _ => Self::Locked,
        }
    }
}

/// A topic within a subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Unique topic ID
    pub id: String,

    /// Owning subject
    pub subject_id: String,

    /// Topic title (e.g., "Niutono dėsniai")
    pub title: String,

    /// Completion status
    #[serde(default)]
    pub status: TopicStatus,

    /// Score 0–100, when the topic has been assessed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// Per-subject progress as surfaced to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProgress {
    /// Subject ID
    pub id: String,

    /// Subject name
    pub name: String,

    /// Mean of this subject's progress rows, 0–100
    pub progress_pct: f32,
}

/// The aggregate progress view a prompt is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// The student's subjects with their progress percentages
    pub subjects: Vec<SubjectProgress>,

    /// Mean of per-subject percentages; exactly 0 for zero subjects
    pub overall_progress: f32,

    /// Titles of up to [`WEAK_AREA_LIMIT`] topics scoring below
    /// [`WEAK_SCORE_THRESHOLD`], ascending by score
    pub weak_areas: Vec<String>,
}

/// One stored user/assistant exchange.
///
/// Both sides of the turn are carried explicitly, so replaying history
/// never has to infer roles from row ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    /// What the student sent
    pub message: String,

    /// What the tutor answered
    pub response: String,

    /// When the exchange was stored
    pub created_at: DateTime<Utc>,
}

/// A completed exchange to be appended after a successful completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExchange {
    /// The student
    pub user_id: String,

    /// Subject scope, when the chat was subject-bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,

    /// What the student sent
    pub message: String,

    /// What the tutor answered
    pub response: String,
}

/// The core ProgressStore trait.
///
/// Implementations: SQLite, in-memory (for testing and ephemeral runs).
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Look up a subject's grade level. `None` if the subject doesn't exist.
    async fn subject_grade(
        &self,
        subject_id: &str,
    ) -> std::result::Result<Option<u8>, StoreError>;

    /// Aggregate progress for a student, optionally scoped to one subject.
    async fn progress_summary(
        &self,
        user_id: &str,
        subject_id: Option<&str>,
    ) -> std::result::Result<ProgressSummary, StoreError>;

    /// Up to `limit` most recent exchanges, returned oldest-first.
    async fn recent_exchanges(
        &self,
        user_id: &str,
        subject_id: Option<&str>,
        limit: usize,
    ) -> std::result::Result<Vec<Exchange>, StoreError>;

    /// Append one completed exchange. Returns the new row's ID.
    async fn append_exchange(
        &self,
        exchange: NewExchange,
    ) -> std::result::Result<String, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_status_string_roundtrip() {
        for status in [
            TopicStatus::Locked,
            TopicStatus::InProgress,
            TopicStatus::Completed,
        ] {
            assert_eq!(TopicStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn topic_status_unknown_defaults_to_locked() {
        assert_eq!(TopicStatus::parse("archived"), TopicStatus::Locked);
    }

    #[test]
    fn topic_status_serde_uses_kebab_case() {
        let json = serde_json::to_string(&TopicStatus::InProgress).unwrap();
        assert_eq!(json, r#""in-progress""#);
    }

    #[test]
    fn empty_summary_has_zero_progress() {
        let summary = ProgressSummary::default();
        assert!(summary.subjects.is_empty());
        assert_eq!(summary.overall_progress, 0.0);
        assert!(summary.weak_areas.is_empty());
    }
}
