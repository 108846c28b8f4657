use std::sync::Arc;

use storage::repository::QuizRepository;
use wordify_core::model::{
    HistoryQuery, HistoryStats, QuizSessionId, QuizSessionRecord, QuizSessionResult, User,
};

use crate::error::QuizFlowError;

/// Quiz history screen data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryPage {
    /// Sessions matching the query, in display order.
    pub sessions: Vec<QuizSessionRecord>,
    /// Totals over every session, regardless of the query.
    pub stats: Option<HistoryStats>,
}

/// A stored session with its recomputed score.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDetail {
    pub record: QuizSessionRecord,
    pub result: QuizSessionResult,
}

/// Read-only access to past quiz sessions.
#[derive(Clone)]
pub struct QuizHistoryService {
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizHistoryService {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { quizzes }
    }

    /// # Errors
    ///
    /// Returns `QuizFlowError::Storage` if the history cannot be fetched.
    pub async fn history(&self, user: &User, query: &HistoryQuery) -> Result<HistoryPage, QuizFlowError> {
        let all = self.quizzes.quiz_history(&user.id).await?;
        let stats = HistoryStats::from_records(&all);
        let sessions = query.apply(&all).into_iter().cloned().collect();
        Ok(HistoryPage { sessions, stats })
    }

    /// Fetch one session and score it from its raw counts.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Storage` (e.g. not found) or
    /// `QuizFlowError::Quiz` when the stored counts are inconsistent.
    pub async fn session(&self, user: &User, id: &QuizSessionId) -> Result<SessionDetail, QuizFlowError> {
        let record = self.quizzes.quiz_session(&user.id, id).await?;
        let result = record.result()?;
        Ok(SessionDetail { record, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryRepository;
    use storage::repository::{QuizSubmission, StorageError, TopicRepository, VocabularyRepository};
    use wordify_core::model::{HistoryFilter, HistorySort, TopicDraft, UserId, VocabularyDraft};

    fn learner() -> User {
        User {
            id: UserId::new("u1"),
            ..User::default()
        }
    }

    async fn play(repo: &InMemoryRepository, topic: &str, correct: usize, total: usize) {
        let created = repo
            .create_topic(&TopicDraft::new(topic, "").validate().unwrap())
            .await
            .unwrap();
        for i in 0..total {
            let draft = VocabularyDraft {
                word: format!("{topic}{i}"),
                meaning: "m".into(),
                ..VocabularyDraft::default()
            };
            repo.create_vocabulary(&created.id, &draft).await.unwrap();
        }
        let mut questions = repo
            .generate_quiz(&created.id, u32::try_from(total).unwrap())
            .await
            .unwrap();
        for (i, question) in questions.iter_mut().enumerate() {
            let answer = if i < correct {
                question.correct_answer.clone()
            } else {
                "wrong".to_owned()
            };
            question.answer(i, &answer).unwrap();
        }
        let submission = QuizSubmission {
            topic_id: created.id,
            questions,
            time_spent_secs: 60,
        };
        repo.submit_quiz(&learner().id, &submission).await.unwrap();
    }

    #[tokio::test]
    async fn stats_cover_all_sessions_while_page_is_filtered() {
        let repo = InMemoryRepository::new();
        play(&repo, "Travel", 9, 10).await;
        play(&repo, "Animals", 4, 10).await;
        let service = QuizHistoryService::new(Arc::new(repo));

        let query = HistoryQuery {
            filter: HistoryFilter::NeedsPractice,
            sort: HistorySort::Score,
            ..HistoryQuery::default()
        };
        let page = service.history(&learner(), &query).await.unwrap();
        assert_eq!(page.sessions.len(), 1);
        assert_eq!(page.sessions[0].topic_name, "Animals");

        let stats = page.stats.unwrap();
        assert_eq!(stats.total_quizzes, 2);
        assert_eq!(stats.best_score, 9);
        assert_eq!(stats.total_time_spent_secs, 120);
    }

    #[tokio::test]
    async fn empty_history_has_no_stats() {
        let service = QuizHistoryService::new(Arc::new(InMemoryRepository::new()));
        let page = service.history(&learner(), &HistoryQuery::default()).await.unwrap();
        assert!(page.sessions.is_empty());
        assert!(page.stats.is_none());
    }

    #[tokio::test]
    async fn session_detail_is_rescored() {
        let repo = InMemoryRepository::new();
        play(&repo, "Travel", 3, 4).await;
        let service = QuizHistoryService::new(Arc::new(repo));
        let page = service.history(&learner(), &HistoryQuery::default()).await.unwrap();
        let id = page.sessions[0].id.clone();

        let detail = service.session(&learner(), &id).await.unwrap();
        assert_eq!(detail.result.accuracy_rounded(), 75);
        assert_eq!(detail.record.questions.len(), 4);

        let missing = service
            .session(&learner(), &QuizSessionId::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(missing, QuizFlowError::Storage(StorageError::NotFound(_))));
    }
}
