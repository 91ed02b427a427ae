//! SQLite progress store.
//!
//! One database file with four tables: `subjects`, `topics`, `progress`,
//! and `chat_messages`. The schema is created on open. Subjects, topics,
//! and progress rows are written only through the provisioning helpers
//! (`upsert_subject` and friends) used by seeding and tests — the
//! `ProgressStore` trait surface stays read-only apart from appending
//! exchanges.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

use tutorius_core::error::StoreError;
use tutorius_core::store::{
    Exchange, NewExchange, ProgressStore, ProgressSummary, Subject, SubjectProgress, Topic,
    WEAK_AREA_LIMIT, WEAK_SCORE_THRESHOLD,
};

/// The production SQLite progress store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a database at the given path.
    ///
    /// Pass `":memory:"` for an in-process ephemeral database (useful for
    /// tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite progress store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subjects (
                id      TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name    TEXT NOT NULL,
                grade   INTEGER NOT NULL DEFAULT 11,
                teacher TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("subjects table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS topics (
                id         TEXT PRIMARY KEY,
                subject_id TEXT NOT NULL REFERENCES subjects(id),
                title      TEXT NOT NULL,
                status     TEXT NOT NULL DEFAULT 'locked',
                score      REAL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("topics table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS progress (
                id         TEXT PRIMARY KEY,
                user_id    TEXT NOT NULL,
                subject_id TEXT NOT NULL REFERENCES subjects(id),
                percentage REAL NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("progress table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_messages (
                id         TEXT PRIMARY KEY,
                user_id    TEXT NOT NULL,
                subject_id TEXT,
                message    TEXT NOT NULL,
                response   TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("chat_messages table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chat_messages_user
             ON chat_messages(user_id, created_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("chat_messages index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    // --- Provisioning helpers (outside the ProgressStore trait) ---

    /// Insert or update a subject row.
    pub async fn upsert_subject(&self, subject: &Subject) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO subjects (id, user_id, name, grade, teacher)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                name    = excluded.name,
                grade   = excluded.grade,
                teacher = excluded.teacher
            "#,
        )
        .bind(&subject.id)
        .bind(&subject.user_id)
        .bind(&subject.name)
        .bind(subject.grade as i64)
        .bind(&subject.teacher)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("upsert subject: {e}")))?;
        Ok(())
    }

    /// Insert or update a topic row.
    pub async fn upsert_topic(&self, topic: &Topic) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO topics (id, subject_id, title, status, score)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                subject_id = excluded.subject_id,
                title      = excluded.title,
                status     = excluded.status,
                score      = excluded.score
            "#,
        )
        .bind(&topic.id)
        .bind(&topic.subject_id)
        .bind(&topic.title)
        .bind(topic.status.as_str())
        .bind(topic.score.map(f64::from))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("upsert topic: {e}")))?;
        Ok(())
    }

    /// Record one progress measurement for a user × subject pair.
    /// Rows accumulate; the summary aggregates them via mean.
    pub async fn record_progress(
        &self,
        user_id: &str,
        subject_id: &str,
        percentage: f32,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO progress (id, user_id, subject_id, percentage) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(subject_id)
        .bind(f64::from(percentage))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("record progress: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn subject_grade(&self, subject_id: &str) -> Result<Option<u8>, StoreError> {
        let row = sqlx::query("SELECT grade FROM subjects WHERE id = ?1")
            .bind(subject_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("subject grade: {e}")))?;

        match row {
            Some(row) => {
                let grade: i64 = row
                    .try_get("grade")
                    .map_err(|e| StoreError::QueryFailed(format!("grade column: {e}")))?;
                Ok(Some(grade as u8))
            }
            None => Ok(None),
        }
    }

    async fn progress_summary(
        &self,
        user_id: &str,
        subject_id: Option<&str>,
    ) -> Result<ProgressSummary, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.name, COALESCE(AVG(p.percentage), 0.0) AS progress_pct
            FROM subjects s
            LEFT JOIN progress p ON p.subject_id = s.id AND p.user_id = s.user_id
            WHERE s.user_id = ?1 AND (?2 IS NULL OR s.id = ?2)
            GROUP BY s.id, s.name
            ORDER BY s.name
            "#,
        )
        .bind(user_id)
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("progress summary: {e}")))?;

        let mut subjects = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row
                .try_get("id")
                .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?;
            let name: String = row
                .try_get("name")
                .map_err(|e| StoreError::QueryFailed(format!("name column: {e}")))?;
            let progress_pct: f64 = row
                .try_get("progress_pct")
                .map_err(|e| StoreError::QueryFailed(format!("progress column: {e}")))?;
            subjects.push(SubjectProgress {
                id,
                name,
                progress_pct: progress_pct as f32,
            });
        }

        let overall_progress = if subjects.is_empty() {
            0.0
        } else {
            subjects.iter().map(|s| s.progress_pct).sum::<f32>() / subjects.len() as f32
        };

        let weak_rows = sqlx::query(
            r#"
            SELECT t.title
            FROM topics t
            JOIN subjects s ON s.id = t.subject_id
            WHERE s.user_id = ?1 AND (?2 IS NULL OR s.id = ?2)
              AND t.score IS NOT NULL AND t.score < ?3
            ORDER BY t.score ASC
            LIMIT ?4
            "#,
        )
        .bind(user_id)
        .bind(subject_id)
        .bind(f64::from(WEAK_SCORE_THRESHOLD))
        .bind(WEAK_AREA_LIMIT as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("weak areas: {e}")))?;

        let mut weak_areas = Vec::with_capacity(weak_rows.len());
        for row in &weak_rows {
            let title: String = row
                .try_get("title")
                .map_err(|e| StoreError::QueryFailed(format!("title column: {e}")))?;
            weak_areas.push(title);
        }

        Ok(ProgressSummary {
            subjects,
            overall_progress,
            weak_areas,
        })
    }

    async fn recent_exchanges(
        &self,
        user_id: &str,
        subject_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Exchange>, StoreError> {
        // Newest-first fetch bounded by `limit`, then reversed so the
        // caller replays history oldest-first.
        let rows = sqlx::query(
            r#"
            SELECT message, response, created_at
            FROM chat_messages
            WHERE user_id = ?1 AND (?2 IS NULL OR subject_id = ?2)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?3
            "#,
        )
        .bind(user_id)
        .bind(subject_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("recent exchanges: {e}")))?;

        let mut exchanges = Vec::with_capacity(rows.len());
        for row in &rows {
            let message: String = row
                .try_get("message")
                .map_err(|e| StoreError::QueryFailed(format!("message column: {e}")))?;
            let response: String = row
                .try_get("response")
                .map_err(|e| StoreError::QueryFailed(format!("response column: {e}")))?;
            let created_at_str: String = row
                .try_get("created_at")
                .map_err(|e| StoreError::QueryFailed(format!("created_at column: {e}")))?;

            let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());

            exchanges.push(Exchange {
                message,
                response,
                created_at,
            });
        }

        exchanges.reverse();
        Ok(exchanges)
    }

    async fn append_exchange(&self, exchange: NewExchange) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, user_id, subject_id, message, response, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(&exchange.user_id)
        .bind(&exchange.subject_id)
        .bind(&exchange.message)
        .bind(&exchange.response)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("append exchange: {e}")))?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorius_core::store::TopicStatus;

    fn subject(id: &str, user: &str, name: &str, grade: u8) -> Subject {
        Subject {
            id: id.into(),
            user_id: user.into(),
            name: name.into(),
            grade,
            teacher: None,
        }
    }

    fn scored_topic(id: &str, subject_id: &str, title: &str, score: Option<f32>) -> Topic {
        Topic {
            id: id.into(),
            subject_id: subject_id.into(),
            title: title.into(),
            status: TopicStatus::InProgress,
            score,
        }
    }

    // One connection: pooled `:memory:` databases are per-connection.
    async fn test_store() -> SqliteStore {
        let options = SqliteConnectOptions::from_str(":memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        SqliteStore::from_pool(pool).await.unwrap()
    }

    #[tokio::test]
    async fn subject_grade_lookup() {
        let store = test_store().await;
        store
            .upsert_subject(&subject("s1", "u1", "Fizika", 11))
            .await
            .unwrap();

        assert_eq!(store.subject_grade("s1").await.unwrap(), Some(11));
        assert_eq!(store.subject_grade("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn summary_for_unknown_user_is_empty() {
        let store = test_store().await;
        let summary = store.progress_summary("nobody", None).await.unwrap();
        assert!(summary.subjects.is_empty());
        assert_eq!(summary.overall_progress, 0.0);
        assert!(summary.weak_areas.is_empty());
    }

    #[tokio::test]
    async fn summary_averages_progress_rows_per_subject() {
        let store = test_store().await;
        store
            .upsert_subject(&subject("s1", "u1", "Fizika", 11))
            .await
            .unwrap();
        store
            .upsert_subject(&subject("s2", "u1", "Matematika", 11))
            .await
            .unwrap();

        // Two measurements for Fizika average to 50, one for Matematika is 80.
        store.record_progress("u1", "s1", 40.0).await.unwrap();
        store.record_progress("u1", "s1", 60.0).await.unwrap();
        store.record_progress("u1", "s2", 80.0).await.unwrap();

        let summary = store.progress_summary("u1", None).await.unwrap();
        assert_eq!(summary.subjects.len(), 2);

        let fizika = summary.subjects.iter().find(|s| s.name == "Fizika").unwrap();
        assert!((fizika.progress_pct - 50.0).abs() < 0.01);

        // Overall is the mean over subjects: (50 + 80) / 2.
        assert!((summary.overall_progress - 65.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn summary_can_be_scoped_to_one_subject() {
        let store = test_store().await;
        store
            .upsert_subject(&subject("s1", "u1", "Fizika", 11))
            .await
            .unwrap();
        store
            .upsert_subject(&subject("s2", "u1", "Matematika", 11))
            .await
            .unwrap();
        store.record_progress("u1", "s1", 30.0).await.unwrap();

        let summary = store.progress_summary("u1", Some("s1")).await.unwrap();
        assert_eq!(summary.subjects.len(), 1);
        assert_eq!(summary.subjects[0].name, "Fizika");
    }

    #[tokio::test]
    async fn weak_areas_filter_sort_and_truncate() {
        let store = test_store().await;
        store
            .upsert_subject(&subject("s1", "u1", "Fizika", 11))
            .await
            .unwrap();

        let scores = [
            ("t1", "Kinematika", Some(65.0)),
            ("t2", "Dinamika", Some(40.0)),
            ("t3", "Energija", Some(90.0)), // not weak
            ("t4", "Svyravimai", Some(55.0)),
            ("t5", "Bangos", Some(69.9)),
            ("t6", "Elektra", Some(10.0)),
            ("t7", "Optika", None), // unscored, never weak
            ("t8", "Šiluma", Some(68.0)),
        ];
        for (id, title, score) in scores {
            store
                .upsert_topic(&scored_topic(id, "s1", title, score))
                .await
                .unwrap();
        }

        let summary = store.progress_summary("u1", None).await.unwrap();
        // Six topics score below 70; only five are kept, ascending by score.
        assert_eq!(
            summary.weak_areas,
            vec!["Elektra", "Dinamika", "Svyravimai", "Kinematika", "Šiluma"]
        );
    }

    #[tokio::test]
    async fn exchanges_round_trip_oldest_first() {
        let store = test_store().await;

        for i in 1..=3 {
            store
                .append_exchange(NewExchange {
                    user_id: "u1".into(),
                    subject_id: Some("s1".into()),
                    message: format!("klausimas {i}"),
                    response: format!("atsakymas {i}"),
                })
                .await
                .unwrap();
        }

        let exchanges = store.recent_exchanges("u1", None, 5).await.unwrap();
        assert_eq!(exchanges.len(), 3);
        assert_eq!(exchanges[0].message, "klausimas 1");
        assert_eq!(exchanges[2].message, "klausimas 3");
    }

    #[tokio::test]
    async fn exchange_limit_keeps_the_newest() {
        let store = test_store().await;

        for i in 1..=4 {
            store
                .append_exchange(NewExchange {
                    user_id: "u1".into(),
                    subject_id: None,
                    message: format!("klausimas {i}"),
                    response: format!("atsakymas {i}"),
                })
                .await
                .unwrap();
        }

        let exchanges = store.recent_exchanges("u1", None, 2).await.unwrap();
        assert_eq!(exchanges.len(), 2);
        assert_eq!(exchanges[0].message, "klausimas 3");
        assert_eq!(exchanges[1].message, "klausimas 4");
    }

    #[tokio::test]
    async fn exchanges_scoped_by_subject() {
        let store = test_store().await;

        store
            .append_exchange(NewExchange {
                user_id: "u1".into(),
                subject_id: Some("s1".into()),
                message: "apie fiziką".into(),
                response: "atsakymas".into(),
            })
            .await
            .unwrap();
        store
            .append_exchange(NewExchange {
                user_id: "u1".into(),
                subject_id: Some("s2".into()),
                message: "apie matematiką".into(),
                response: "atsakymas".into(),
            })
            .await
            .unwrap();

        let exchanges = store.recent_exchanges("u1", Some("s1"), 5).await.unwrap();
        assert_eq!(exchanges.len(), 1);
        assert_eq!(exchanges[0].message, "apie fiziką");
    }
}
