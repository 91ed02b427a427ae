//! In-memory progress store — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use tutorius_core::error::StoreError;
use tutorius_core::store::{
    Exchange, NewExchange, ProgressStore, ProgressSummary, Subject, SubjectProgress, Topic,
    WEAK_AREA_LIMIT, WEAK_SCORE_THRESHOLD,
};

#[derive(Debug, Clone)]
struct ProgressRow {
    user_id: String,
    subject_id: String,
    percentage: f32,
}

#[derive(Debug, Clone)]
struct StoredExchange {
    user_id: String,
    subject_id: Option<String>,
    exchange: Exchange,
}

/// A Vec-backed store with the same aggregate semantics as the SQLite
/// backend.
#[derive(Default)]
pub struct InMemoryStore {
    subjects: RwLock<Vec<Subject>>,
    topics: RwLock<Vec<Topic>>,
    progress: RwLock<Vec<ProgressRow>>,
    exchanges: RwLock<Vec<StoredExchange>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a subject row.
    pub async fn upsert_subject(&self, subject: Subject) {
        let mut subjects = self.subjects.write().await;
        match subjects.iter_mut().find(|s| s.id == subject.id) {
            Some(existing) => *existing = subject,
            None => subjects.push(subject),
        }
    }

    /// Insert or update a topic row.
    pub async fn upsert_topic(&self, topic: Topic) {
        let mut topics = self.topics.write().await;
        match topics.iter_mut().find(|t| t.id == topic.id) {
            Some(existing) => *existing = topic,
            None => topics.push(topic),
        }
    }

    /// Record one progress measurement for a user × subject pair.
    pub async fn record_progress(&self, user_id: &str, subject_id: &str, percentage: f32) {
        self.progress.write().await.push(ProgressRow {
            user_id: user_id.into(),
            subject_id: subject_id.into(),
            percentage,
        });
    }
}

#[async_trait]
impl ProgressStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn subject_grade(&self, subject_id: &str) -> Result<Option<u8>, StoreError> {
        let subjects = self.subjects.read().await;
        Ok(subjects.iter().find(|s| s.id == subject_id).map(|s| s.grade))
    }

    async fn progress_summary(
        &self,
        user_id: &str,
        subject_id: Option<&str>,
    ) -> Result<ProgressSummary, StoreError> {
        let subjects = self.subjects.read().await;
        let topics = self.topics.read().await;
        let progress = self.progress.read().await;

        let mut selected: Vec<&Subject> = subjects
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter(|s| subject_id.is_none_or(|id| s.id == id))
            .collect();
        selected.sort_by(|a, b| a.name.cmp(&b.name));

        let subject_rows: Vec<SubjectProgress> = selected
            .iter()
            .map(|s| {
                let rows: Vec<f32> = progress
                    .iter()
                    .filter(|p| p.user_id == user_id && p.subject_id == s.id)
                    .map(|p| p.percentage)
                    .collect();
                let progress_pct = if rows.is_empty() {
                    0.0
                } else {
                    rows.iter().sum::<f32>() / rows.len() as f32
                };
                SubjectProgress {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    progress_pct,
                }
            })
            .collect();

        let overall_progress = if subject_rows.is_empty() {
            0.0
        } else {
            subject_rows.iter().map(|s| s.progress_pct).sum::<f32>() / subject_rows.len() as f32
        };

        let mut weak: Vec<(&Topic, f32)> = topics
            .iter()
            .filter(|t| selected.iter().any(|s| s.id == t.subject_id))
            .filter_map(|t| t.score.map(|score| (t, score)))
            .filter(|(_, score)| *score < WEAK_SCORE_THRESHOLD)
            .collect();
        weak.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        weak.truncate(WEAK_AREA_LIMIT);

        Ok(ProgressSummary {
            subjects: subject_rows,
            overall_progress,
            weak_areas: weak.into_iter().map(|(t, _)| t.title.clone()).collect(),
        })
    }

    async fn recent_exchanges(
        &self,
        user_id: &str,
        subject_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Exchange>, StoreError> {
        let exchanges = self.exchanges.read().await;
        let matching: Vec<&StoredExchange> = exchanges
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| subject_id.is_none_or(|id| e.subject_id.as_deref() == Some(id)))
            .collect();

        // Insertion order is chronological; keep the newest `limit` rows,
        // oldest-first.
        let skip = matching.len().saturating_sub(limit);
        Ok(matching
            .into_iter()
            .skip(skip)
            .map(|e| e.exchange.clone())
            .collect())
    }

    async fn append_exchange(&self, exchange: NewExchange) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.exchanges.write().await.push(StoredExchange {
            user_id: exchange.user_id,
            subject_id: exchange.subject_id,
            exchange: Exchange {
                message: exchange.message,
                response: exchange.response,
                created_at: Utc::now(),
            },
        });
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

    #[tokio::test]
    async fn zero_subjects_means_zero_progress() {
        let store = InMemoryStore::new();
        let summary = store.progress_summary("u1", None).await.unwrap();
        assert_eq!(summary.overall_progress, 0.0);
        assert!(summary.subjects.is_empty());
    }

    #[tokio::test]
    async fn weak_areas_match_sqlite_semantics() {
        let store = InMemoryStore::new();
        store.upsert_subject(subject("s1", "u1", "Fizika", 11)).await;
        store
            .upsert_topic(scored_topic("t1", "s1", "Dinamika", Some(40.0)))
            .await;
        store
            .upsert_topic(scored_topic("t2", "s1", "Energija", Some(90.0)))
            .await;
        store
            .upsert_topic(scored_topic("t3", "s1", "Kinematika", Some(65.0)))
            .await;
        store.upsert_topic(scored_topic("t4", "s1", "Optika", None)).await;

        let summary = store.progress_summary("u1", None).await.unwrap();
        assert_eq!(summary.weak_areas, vec!["Dinamika", "Kinematika"]);
    }

    #[tokio::test]
    async fn exchanges_keep_newest_within_limit() {
        let store = InMemoryStore::new();
        for i in 1..=4 {
            store
                .append_exchange(NewExchange {
                    user_id: "u1".into(),
                    subject_id: None,
                    message: format!("k{i}"),
                    response: format!("a{i}"),
                })
                .await
                .unwrap();
        }

        let exchanges = store.recent_exchanges("u1", None, 2).await.unwrap();
        assert_eq!(exchanges.len(), 2);
        assert_eq!(exchanges[0].message, "k3");
        assert_eq!(exchanges[1].message, "k4");
    }

    #[tokio::test]
    async fn grade_lookup_misses_unknown_subject() {
        let store = InMemoryStore::new();
        store.upsert_subject(subject("s1", "u1", "Fizika", 12)).await;
        assert_eq!(store.subject_grade("s1").await.unwrap(), Some(12));
        assert_eq!(store.subject_grade("nope").await.unwrap(), None);
    }
}
