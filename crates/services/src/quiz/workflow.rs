use std::sync::Arc;

use storage::repository::{QuizRepository, QuizSubmission};
use wordify_core::Clock;
use wordify_core::model::{
    QuizConfig, QuizSessionId, QuizSessionResult, Topic, User,
};

use super::run::{AnswerFeedback, QuizRun};
use crate::error::QuizFlowError;

/// A quiz the backend accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedQuiz {
    pub session_id: QuizSessionId,
    pub result: QuizSessionResult,
}

/// Orchestrates quiz generation, answering and submission.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { clock, quizzes }
    }

    /// The clock submissions are timed with.
    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Generate questions for `topic` and start the timer.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Storage` if generation fails and
    /// `QuizFlowError::Quiz` if the backend returned no questions.
    pub async fn start(&self, topic: &Topic, config: QuizConfig) -> Result<QuizRun, QuizFlowError> {
        let questions = self
            .quizzes
            .generate_quiz(&topic.id, config.question_count())
            .await?;
        tracing::debug!(
            topic = %topic.id,
            requested = config.question_count(),
            generated = questions.len(),
            mode = %config.mode(),
            "quiz generated"
        );
        Ok(QuizRun::new(topic.id.clone(), config, questions, self.clock.now())?)
    }

    /// Answer the current question, stamping the time from the service clock.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::Quiz` for a blank or repeated answer.
    pub fn answer(&self, run: &mut QuizRun, user_answer: &str) -> Result<AnswerFeedback, QuizFlowError> {
        Ok(run.answer(user_answer, self.clock.now())?)
    }

    /// Score the finished run locally and persist it.
    ///
    /// Nothing is returned unless the backend stored the session, so the
    /// caller never reaches a result screen without a session id.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::NotFinished` while questions remain,
    /// `QuizFlowError::Quiz` if the answers cannot be scored, and
    /// `QuizFlowError::Storage` if submission fails.
    pub async fn submit(&self, user: &User, run: &QuizRun) -> Result<SubmittedQuiz, QuizFlowError> {
        if !run.is_finished() {
            return Err(QuizFlowError::NotFinished);
        }
        let time_spent_secs = run.elapsed_secs(self.clock.now());
        let result = QuizSessionResult::from_questions(run.questions(), time_spent_secs)?;

        let submission = QuizSubmission {
            topic_id: run.topic_id().clone(),
            questions: run.questions().to_vec(),
            time_spent_secs,
        };
        let record = self.quizzes.submit_quiz(&user.id, &submission).await?;

        tracing::info!(
            session = %record.id,
            topic = %submission.topic_id,
            correct = result.correct_answers(),
            total = result.total_questions(),
            time_spent_secs,
            "quiz submitted"
        );
        Ok(SubmittedQuiz {
            session_id: record.id,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::{Navigator, View};
    use async_trait::async_trait;
    use chrono::Duration;
    use storage::InMemoryRepository;
    use storage::repository::{
        ProgressRepository, StorageError, TopicRepository, VocabularyRepository,
    };
    use wordify_core::model::{
        PerformanceTier, QuizError, QuizMode, QuizQuestion, QuizSessionRecord,
        TopicDraft, TopicId, UserId, VocabularyDraft,
    };
    use wordify_core::time::fixed_now;

    /// Generates quizzes normally but cannot reach the backend on submit.
    struct UnreachableOnSubmit {
        inner: InMemoryRepository,
    }

    #[async_trait]
    impl QuizRepository for UnreachableOnSubmit {
        async fn generate_quiz(
            &self,
            topic_id: &TopicId,
            question_count: u32,
        ) -> Result<Vec<QuizQuestion>, StorageError> {
            self.inner.generate_quiz(topic_id, question_count).await
        }

        async fn submit_quiz(
            &self,
            _user: &UserId,
            _submission: &QuizSubmission,
        ) -> Result<QuizSessionRecord, StorageError> {
            Err(StorageError::Timeout)
        }

        async fn quiz_history(&self, user: &UserId) -> Result<Vec<QuizSessionRecord>, StorageError> {
            self.inner.quiz_history(user).await
        }

        async fn quiz_session(
            &self,
            user: &UserId,
            id: &QuizSessionId,
        ) -> Result<QuizSessionRecord, StorageError> {
            self.inner.quiz_session(user, id).await
        }
    }

    async fn topic_with(repo: &InMemoryRepository, words: usize) -> Topic {
        let topic = repo
            .create_topic(&TopicDraft::new("Feelings", "").validate().unwrap())
            .await
            .unwrap();
        for i in 0..words {
            let draft = VocabularyDraft {
                word: format!("word{i}"),
                meaning: format!("meaning {i}"),
                ..VocabularyDraft::default()
            };
            repo.create_vocabulary(&topic.id, &draft).await.unwrap();
        }
        topic
    }

    fn learner() -> User {
        User {
            id: UserId::new("u1"),
            ..User::default()
        }
    }

    #[tokio::test]
    async fn ten_questions_seven_correct() {
        let repo = InMemoryRepository::new();
        let topic = topic_with(&repo, 12).await;
        let start_clock = Clock::fixed(fixed_now());
        let service = QuizLoopService::new(start_clock, Arc::new(repo.clone()));
        let config = QuizConfig::new(10, QuizMode::Typing).unwrap();
        let mut run = service.start(&topic, config).await.unwrap();
        assert_eq!(run.len(), 10);

        let mut late_clock = start_clock;
        late_clock.advance(Duration::seconds(300));
        let finisher = QuizLoopService::new(late_clock, Arc::new(repo.clone()));
        for i in 0..10 {
            let expected = run.current().unwrap().correct_answer.clone();
            let answer = if i < 7 { expected.to_uppercase() } else { "nope".to_owned() };
            let svc = if i == 9 { &finisher } else { &service };
            svc.answer(&mut run, &answer).unwrap();
            run.advance().unwrap();
        }

        let submitted = finisher.submit(&learner(), &run).await.unwrap();
        let result = submitted.result;
        assert_eq!(result.correct_answers(), 7);
        assert_eq!(result.incorrect_answers(), 3);
        assert_eq!(result.accuracy_rounded(), 70);
        assert_eq!(result.tier(), PerformanceTier::Good);
        assert_eq!(result.time_spent_secs(), 300);
        assert_eq!(result.average_time_per_item(), 30);

        let stored = repo.quiz_session(&learner().id, &submitted.session_id).await.unwrap();
        assert_eq!(stored.correct_answers, 7);
        let progress = repo.progress_for_topic(&learner().id, &topic.id).await.unwrap();
        assert_eq!(progress.len(), 10);
    }

    #[tokio::test]
    async fn unfinished_quiz_cannot_be_submitted() {
        let repo = InMemoryRepository::new();
        let topic = topic_with(&repo, 3).await;
        let service = QuizLoopService::new(Clock::fixed(fixed_now()), Arc::new(repo.clone()));
        let mut run = service.start(&topic, QuizConfig::default()).await.unwrap();
        assert_eq!(run.len(), 3);
        service.answer(&mut run, "word0").unwrap();

        assert!(matches!(
            service.submit(&learner(), &run).await,
            Err(QuizFlowError::NotFinished)
        ));
        assert!(repo.quiz_history(&learner().id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_topic_fails_to_start() {
        let repo = InMemoryRepository::new();
        let topic = topic_with(&repo, 0).await;
        let service = QuizLoopService::new(Clock::fixed(fixed_now()), Arc::new(repo));
        let err = service.start(&topic, QuizConfig::default()).await.unwrap_err();
        assert!(matches!(err, QuizFlowError::Storage(StorageError::Validation(_))));
        assert_eq!(err.user_message(), "No vocabulary found for this topic");
    }

    #[tokio::test]
    async fn blank_answer_is_rejected() {
        let repo = InMemoryRepository::new();
        let topic = topic_with(&repo, 1).await;
        let service = QuizLoopService::new(Clock::fixed(fixed_now()), Arc::new(repo));
        let mut run = service.start(&topic, QuizConfig::default()).await.unwrap();
        assert!(matches!(
            service.answer(&mut run, "  "),
            Err(QuizFlowError::Quiz(QuizError::EmptyAnswer))
        ));
    }

    #[tokio::test]
    async fn failed_submit_keeps_the_quiz_screen() {
        let repo = InMemoryRepository::new();
        let topic = topic_with(&repo, 2).await;
        let service = QuizLoopService::new(
            Clock::fixed(fixed_now()),
            Arc::new(UnreachableOnSubmit { inner: repo.clone() }),
        );
        let config = QuizConfig::new(2, QuizMode::MultipleChoice).unwrap();

        let mut nav = Navigator::new();
        nav.select_topic(topic.clone()).unwrap();
        nav.start_quiz().unwrap();
        nav.complete_setup(config).unwrap();

        let mut run = service.start(&topic, config).await.unwrap();
        loop {
            let answer = run.current().unwrap().correct_answer.clone();
            service.answer(&mut run, &answer).unwrap();
            if !run.advance().unwrap() {
                break;
            }
        }

        let err = match service.submit(&learner(), &run).await {
            Ok(submitted) => panic!("unexpected session {}", submitted.session_id),
            Err(err) => err,
        };
        assert!(matches!(err, QuizFlowError::Storage(StorageError::Timeout)));
        assert!(matches!(nav.view(), View::Quiz { .. }));
        assert!(run.is_finished());
        assert!(repo.quiz_history(&learner().id).await.unwrap().is_empty());
    }

    #[test]
    fn exposes_the_scoring_clock() {
        let service = QuizLoopService::new(Clock::fixed(fixed_now()), Arc::new(InMemoryRepository::new()));
        assert_eq!(service.clock().now(), fixed_now());
    }
}
