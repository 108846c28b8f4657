use std::sync::Arc;

use futures::future::join_all;
use storage::repository::{ProgressRepository, TopicRepository};
use wordify_core::model::{OverallProgress, Topic, TopicProgressSummary, User};

use crate::error::DashboardError;

/// A topic with its learner's aggregated progress.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicCard {
    pub topic: Topic,
    pub summary: TopicProgressSummary,
}

/// Topic list screen data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dashboard {
    pub topics: Vec<TopicCard>,
    pub overall: OverallProgress,
}

impl Dashboard {
    #[must_use]
    pub fn topic(&self, index: usize) -> Option<&Topic> {
        self.topics.get(index).map(|card| &card.topic)
    }
}

/// Loads topics and aggregates each topic's progress snapshot.
#[derive(Clone)]
pub struct DashboardService {
    topics: Arc<dyn TopicRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl DashboardService {
    #[must_use]
    pub fn new(topics: Arc<dyn TopicRepository>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { topics, progress }
    }

    /// Fetch the topic list, then every topic's progress concurrently.
    ///
    /// A topic whose progress cannot be fetched counts as not started.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Storage` if the topic list cannot be fetched.
    pub async fn load(&self, user: &User) -> Result<Dashboard, DashboardError> {
        let topics = self.topics.list_topics().await?;

        let fetches = topics
            .iter()
            .map(|topic| self.progress.progress_for_topic(&user.id, &topic.id));
        let snapshots = join_all(fetches).await;

        let cards: Vec<TopicCard> = topics
            .into_iter()
            .zip(snapshots)
            .map(|(topic, snapshot)| {
                let records = snapshot.unwrap_or_else(|err| {
                    tracing::warn!(topic = %topic.id, error = %err, "failed to load topic progress");
                    Vec::new()
                });
                let summary = TopicProgressSummary::from_records(topic.vocabulary_count, &records);
                if summary.stale_records() > 0 {
                    tracing::warn!(
                        topic = %topic.id,
                        stale = summary.stale_records(),
                        vocabulary = topic.vocabulary_count,
                        "more progress records than vocabulary items"
                    );
                }
                TopicCard { topic, summary }
            })
            .collect();

        let overall = OverallProgress::from_summaries(cards.iter().map(|c| &c.summary));
        Ok(Dashboard {
            topics: cards,
            overall,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::InMemoryRepository;
    use storage::repository::{StorageError, VocabularyRepository};
    use wordify_core::model::{
        ProgressRecord, TopicDraft, TopicId, UserId, VocabularyDraft, VocabularyId,
    };

    struct FlakyProgress {
        inner: InMemoryRepository,
        failing: TopicId,
    }

    #[async_trait]
    impl ProgressRepository for FlakyProgress {
        async fn progress_for_topic(
            &self,
            user: &UserId,
            topic_id: &TopicId,
        ) -> Result<Vec<ProgressRecord>, StorageError> {
            if topic_id == &self.failing {
                return Err(StorageError::Timeout);
            }
            self.inner.progress_for_topic(user, topic_id).await
        }

        async fn update_progress(
            &self,
            user: &UserId,
            vocabulary_id: &VocabularyId,
            is_correct: bool,
        ) -> Result<ProgressRecord, StorageError> {
            self.inner.update_progress(user, vocabulary_id, is_correct).await
        }
    }

    fn learner() -> User {
        User {
            id: UserId::new("u1"),
            ..User::default()
        }
    }

    async fn topic(repo: &InMemoryRepository, name: &str, words: usize) -> Topic {
        let topic = repo
            .create_topic(&TopicDraft::new(name, "").validate().unwrap())
            .await
            .unwrap();
        for i in 0..words {
            let draft = VocabularyDraft {
                word: format!("{name}{i}"),
                meaning: "m".into(),
                ..VocabularyDraft::default()
            };
            repo.create_vocabulary(&topic.id, &draft).await.unwrap();
        }
        topic
    }

    #[tokio::test]
    async fn no_topics_yields_zero_overall() {
        let repo = InMemoryRepository::new();
        let service = DashboardService::new(Arc::new(repo.clone()), Arc::new(repo));
        let dashboard = service.load(&learner()).await.unwrap();
        assert!(dashboard.topics.is_empty());
        assert_eq!(dashboard.overall, OverallProgress::default());
        assert!(dashboard.overall.overall_progress().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn failed_topic_progress_counts_as_not_started() {
        let repo = InMemoryRepository::new();
        let travel = topic(&repo, "Travel", 2).await;
        let food = topic(&repo, "Food", 3).await;
        let words = repo.list_by_topic(&travel.id).await.unwrap();
        for _ in 0..3 {
            repo.update_progress(&learner().id, &words[0].id, true)
                .await
                .unwrap();
        }

        let progress = FlakyProgress {
            inner: repo.clone(),
            failing: food.id.clone(),
        };
        let service = DashboardService::new(Arc::new(repo), Arc::new(progress));
        let dashboard = service.load(&learner()).await.unwrap();

        assert_eq!(dashboard.topics.len(), 2);
        let travel_card = &dashboard.topics[0].summary;
        assert_eq!(travel_card.mastered(), 1);
        assert_eq!(travel_card.not_started(), 1);
        let food_card = &dashboard.topics[1].summary;
        assert_eq!(food_card.not_started(), 3);

        assert_eq!(dashboard.overall.total_words, 5);
        assert_eq!(dashboard.overall.mastered, 1);
        assert_eq!(dashboard.overall.overall_progress_rounded(), 20);
    }
}
