use async_trait::async_trait;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;
use wordify_core::Clock;
use wordify_core::model::{
    PasswordChange, ProfileUpdate, ProgressRecord, ProgressStatus, QuestionId, QuizQuestion,
    QuizSessionId, QuizSessionRecord, Registration, Role, StatusAction, Topic, TopicId, User,
    UserId, UserStats, UserStatus, ValidTopic, VocabularyDraft, VocabularyId, VocabularyItem,
};

use crate::repository::{
    AccountRepository, AuthSession, ProgressRepository, QuizRepository, QuizSubmission,
    StorageError, TopicRepository, UserRepository, VocabularyRepository,
};

/// Distractors offered next to the correct word.
const WRONG_OPTIONS: usize = 3;

/// Accuracy and attempt thresholds at which an item counts as mastered.
const MASTERED_ACCURACY: f64 = 80.0;
const MASTERED_MIN_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    topics: Vec<Topic>,
    vocabulary: Vec<VocabularyItem>,
    progress: HashMap<(UserId, VocabularyId), ProgressRecord>,
    sessions: Vec<(UserId, QuizSessionRecord)>,
    accounts: Vec<Account>,
    tokens: HashMap<String, UserId>,
    current_token: Option<String>,
}

impl MemoryState {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn topic(&self, id: &TopicId) -> Result<&Topic, StorageError> {
        self.topics
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| StorageError::NotFound("Topic not found".into()))
    }

    fn vocabulary_count(&self, id: &TopicId) -> u32 {
        let count = self
            .vocabulary
            .iter()
            .filter(|v| v.topic_id.as_ref() == Some(id))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn topic_with_count(&self, topic: &Topic) -> Topic {
        Topic {
            vocabulary_count: self.vocabulary_count(&topic.id),
            ..topic.clone()
        }
    }

    fn account(&self, id: &UserId) -> Option<&Account> {
        self.accounts.iter().find(|a| &a.user.id == id)
    }

    fn account_mut(&mut self, id: &UserId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| &a.user.id == id)
    }

    fn issue_token(&mut self, user: &UserId) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), user.clone());
        self.current_token = Some(token.clone());
        token
    }

    fn record_answer(
        &mut self,
        user: &UserId,
        vocabulary_id: &VocabularyId,
        is_correct: bool,
        clock: Clock,
    ) -> Result<ProgressRecord, StorageError> {
        let topic_id = self
            .vocabulary
            .iter()
            .find(|v| &v.id == vocabulary_id)
            .and_then(|v| v.topic_id.clone())
            .ok_or_else(|| StorageError::NotFound("Vocabulary not found".into()))?;

        let record = self
            .progress
            .entry((user.clone(), vocabulary_id.clone()))
            .or_insert_with(|| ProgressRecord {
                user_id: Some(user.clone()),
                vocabulary_id: vocabulary_id.clone(),
                topic_id,
                status: ProgressStatus::NotStarted,
                correct_count: 0,
                total_attempts: 0,
                last_studied: None,
            });

        record.total_attempts = record.total_attempts.saturating_add(1);
        if is_correct {
            record.correct_count = record.correct_count.saturating_add(1);
        }
        record.status = if record.accuracy() >= MASTERED_ACCURACY
            && record.total_attempts >= MASTERED_MIN_ATTEMPTS
        {
            ProgressStatus::Mastered
        } else {
            ProgressStatus::Learning
        };
        record.last_studied = Some(clock.now());
        Ok(record.clone())
    }
}

/// In-process backend for tests, demos and offline use.
///
/// Mirrors the REST backend's observable rules: unique topic names, unique
/// words per topic, the mastery threshold and random distractor selection.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
    clock: Clock,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Clock::default())
    }

    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Transport(e.to_string()))
    }

    /// Create an account directly, bypassing registration rules.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Validation` when the email is taken.
    pub fn add_account(
        &self,
        email: &str,
        name: &str,
        role: Role,
        password: &str,
    ) -> Result<User, StorageError> {
        let mut state = self.lock()?;
        if state.accounts.iter().any(|a| a.user.email.eq_ignore_ascii_case(email)) {
            return Err(StorageError::Validation(
                "user with this email already exists.".into(),
            ));
        }
        let (first_name, last_name) = name.split_once(' ').unwrap_or((name, ""));
        let user = User {
            id: UserId::new(state.next_id()),
            email: email.to_owned(),
            username: email.split('@').next().unwrap_or(email).to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            name: name.to_owned(),
            role,
            status: UserStatus::Active,
            language: "english".into(),
            timezone: "UTC+0".into(),
            date_joined: Some(self.clock.now()),
            ..User::default()
        };
        state.accounts.push(Account {
            user: user.clone(),
            password: password.to_owned(),
        });
        Ok(user)
    }
}

fn lowercase_eq(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn build_questions(pool: &[VocabularyItem], question_count: usize) -> Vec<QuizQuestion> {
    let mut rng = rand::rng();
    let picked: Vec<&VocabularyItem> = pool.choose_multiple(&mut rng, question_count).collect();
    picked
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let wrong: Vec<&VocabularyItem> = pool.iter().filter(|v| v.id != item.id).collect();
            let mut options: Vec<String> = wrong
                .choose_multiple(&mut rng, WRONG_OPTIONS)
                .map(|v| v.word.clone())
                .collect();
            options.push(item.word.clone());
            options.shuffle(&mut rng);
            QuizQuestion::new(
                QuestionId::new(format!("q{}", i + 1)),
                item.clone(),
                options,
                item.word.clone(),
            )
        })
        .collect()
}

#[async_trait]
impl TopicRepository for InMemoryRepository {
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError> {
        let state = self.lock()?;
        Ok(state.topics.iter().map(|t| state.topic_with_count(t)).collect())
    }

    async fn get_topic(&self, id: &TopicId) -> Result<Topic, StorageError> {
        let state = self.lock()?;
        let topic = state.topic(id)?;
        Ok(state.topic_with_count(topic))
    }

    async fn create_topic(&self, topic: &ValidTopic) -> Result<Topic, StorageError> {
        let mut state = self.lock()?;
        if state.topics.iter().any(|t| t.name == topic.name()) {
            return Err(StorageError::Validation(
                "A topic with this name already exists.".into(),
            ));
        }
        let created = Topic {
            id: TopicId::new(state.next_id()),
            name: topic.name().to_owned(),
            description: topic.description().to_owned(),
            color: topic.color().to_owned(),
            vocabulary_count: 0,
            created_at: Some(self.clock.now()),
        };
        state.topics.push(created.clone());
        Ok(created)
    }

    async fn update_topic(&self, id: &TopicId, topic: &ValidTopic) -> Result<Topic, StorageError> {
        let mut state = self.lock()?;
        if state.topics.iter().any(|t| t.name == topic.name() && &t.id != id) {
            return Err(StorageError::Validation(
                "A topic with this name already exists.".into(),
            ));
        }
        let existing = state
            .topics
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| StorageError::NotFound("Topic not found".into()))?;
        existing.name = topic.name().to_owned();
        existing.description = topic.description().to_owned();
        existing.color = topic.color().to_owned();
        let updated = existing.clone();
        Ok(state.topic_with_count(&updated))
    }

    async fn delete_topic(&self, id: &TopicId) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        state.topic(id)?;
        state.topics.retain(|t| &t.id != id);
        state.vocabulary.retain(|v| v.topic_id.as_ref() != Some(id));
        state.progress.retain(|_, p| &p.topic_id != id);
        state
            .sessions
            .retain(|(_, s)| s.topic_id.as_ref() != Some(id));
        Ok(())
    }
}

#[async_trait]
impl VocabularyRepository for InMemoryRepository {
    async fn list_by_topic(&self, topic_id: &TopicId) -> Result<Vec<VocabularyItem>, StorageError> {
        let state = self.lock()?;
        state.topic(topic_id)?;
        Ok(state
            .vocabulary
            .iter()
            .filter(|v| v.topic_id.as_ref() == Some(topic_id))
            .cloned()
            .collect())
    }

    async fn create_vocabulary(
        &self,
        topic_id: &TopicId,
        draft: &VocabularyDraft,
    ) -> Result<VocabularyItem, StorageError> {
        let mut state = self.lock()?;
        state.topic(topic_id)?;
        let duplicate = state
            .vocabulary
            .iter()
            .any(|v| v.topic_id.as_ref() == Some(topic_id) && v.word == draft.word);
        if duplicate {
            return Err(StorageError::Validation(
                "This word already exists in this topic.".into(),
            ));
        }
        let item = VocabularyItem {
            id: VocabularyId::new(state.next_id()),
            topic_id: Some(topic_id.clone()),
            word: draft.word.clone(),
            pronunciation: draft.pronunciation.clone(),
            meaning: draft.meaning.clone(),
            example: draft.example.clone(),
            image_url: None,
            difficulty: draft.difficulty,
        };
        state.vocabulary.push(item.clone());
        Ok(item)
    }

    async fn update_vocabulary(
        &self,
        id: &VocabularyId,
        draft: &VocabularyDraft,
    ) -> Result<VocabularyItem, StorageError> {
        let mut state = self.lock()?;
        let topic_id = state
            .vocabulary
            .iter()
            .find(|v| &v.id == id)
            .map(|v| v.topic_id.clone())
            .ok_or_else(|| StorageError::NotFound("Vocabulary not found".into()))?;
        let duplicate = state
            .vocabulary
            .iter()
            .any(|v| &v.id != id && v.topic_id == topic_id && v.word == draft.word);
        if duplicate {
            return Err(StorageError::Validation(
                "This word already exists in this topic.".into(),
            ));
        }
        let item = state
            .vocabulary
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| StorageError::NotFound("Vocabulary not found".into()))?;
        item.word.clone_from(&draft.word);
        item.pronunciation.clone_from(&draft.pronunciation);
        item.meaning.clone_from(&draft.meaning);
        item.example.clone_from(&draft.example);
        item.difficulty = draft.difficulty;
        Ok(item.clone())
    }

    async fn delete_vocabulary(&self, id: &VocabularyId) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let before = state.vocabulary.len();
        state.vocabulary.retain(|v| &v.id != id);
        if state.vocabulary.len() == before {
            return Err(StorageError::NotFound("Vocabulary not found".into()));
        }
        state.progress.retain(|(_, vocab), _| vocab != id);
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn progress_for_topic(
        &self,
        user: &UserId,
        topic_id: &TopicId,
    ) -> Result<Vec<ProgressRecord>, StorageError> {
        let state = self.lock()?;
        let mut records: Vec<ProgressRecord> = state
            .progress
            .iter()
            .filter(|((owner, _), p)| owner == user && &p.topic_id == topic_id)
            .map(|(_, p)| p.clone())
            .collect();
        records.sort_by(|a, b| b.last_studied.cmp(&a.last_studied));
        Ok(records)
    }

    async fn update_progress(
        &self,
        user: &UserId,
        vocabulary_id: &VocabularyId,
        is_correct: bool,
    ) -> Result<ProgressRecord, StorageError> {
        let mut state = self.lock()?;
        state.record_answer(user, vocabulary_id, is_correct, self.clock)
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn generate_quiz(
        &self,
        topic_id: &TopicId,
        question_count: u32,
    ) -> Result<Vec<QuizQuestion>, StorageError> {
        let pool: Vec<VocabularyItem> = {
            let state = self.lock()?;
            state.topic(topic_id)?;
            state
                .vocabulary
                .iter()
                .filter(|v| v.topic_id.as_ref() == Some(topic_id))
                .cloned()
                .collect()
        };
        let count = usize::try_from(question_count)
            .unwrap_or(usize::MAX)
            .min(pool.len());
        if count == 0 {
            return Err(StorageError::Validation(
                "No vocabulary found for this topic".into(),
            ));
        }
        Ok(build_questions(&pool, count))
    }

    async fn submit_quiz(
        &self,
        user: &UserId,
        submission: &QuizSubmission,
    ) -> Result<QuizSessionRecord, StorageError> {
        if submission.questions.is_empty() {
            return Err(StorageError::Validation("Questions cannot be empty.".into()));
        }
        let mut state = self.lock()?;
        let topic = state.topic(&submission.topic_id)?.clone();

        let total = u32::try_from(submission.questions.len()).unwrap_or(u32::MAX);
        let correct = submission
            .questions
            .iter()
            .filter(|q| q.is_correct() == Some(true))
            .count();
        let record = QuizSessionRecord {
            id: QuizSessionId::new(Uuid::new_v4().to_string()),
            topic_id: Some(topic.id.clone()),
            topic_name: topic.name.clone(),
            topic_color: topic.color.clone(),
            questions: submission.questions.clone(),
            total_questions: total,
            correct_answers: u32::try_from(correct).unwrap_or(u32::MAX),
            time_spent_secs: submission.time_spent_secs,
            completed_at: Some(self.clock.now()),
        };

        for question in &submission.questions {
            // Questions for vocabulary deleted mid-quiz are skipped.
            if let Err(err) = state.record_answer(
                user,
                &question.vocabulary.id,
                question.is_correct() == Some(true),
                self.clock,
            ) {
                tracing::debug!(
                    vocabulary = %question.vocabulary.id,
                    error = %err,
                    "progress not recorded for submitted answer"
                );
            }
        }
        state.sessions.push((user.clone(), record.clone()));
        Ok(record)
    }

    async fn quiz_history(&self, user: &UserId) -> Result<Vec<QuizSessionRecord>, StorageError> {
        let state = self.lock()?;
        let mut history: Vec<QuizSessionRecord> = state
            .sessions
            .iter()
            .filter(|(owner, _)| owner == user)
            .map(|(_, s)| s.clone())
            .collect();
        history.reverse();
        Ok(history)
    }

    async fn quiz_session(
        &self,
        user: &UserId,
        id: &QuizSessionId,
    ) -> Result<QuizSessionRecord, StorageError> {
        let state = self.lock()?;
        state
            .sessions
            .iter()
            .find(|(owner, s)| owner == user && &s.id == id)
            .map(|(_, s)| s.clone())
            .ok_or_else(|| StorageError::NotFound("Not found.".into()))
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, StorageError> {
        let mut state = self.lock()?;
        let user = state
            .accounts
            .iter()
            .find(|a| lowercase_eq(&a.user.email, email.trim()) && a.password == password)
            .map(|a| a.user.clone())
            .ok_or_else(|| StorageError::Validation("Invalid email or password.".into()))?;
        if user.status != UserStatus::Active {
            return Err(StorageError::Validation("Account is not active.".into()));
        }
        Ok(AuthSession {
            token: state.issue_token(&user.id),
            refresh: None,
            user,
        })
    }

    async fn register(&self, registration: &Registration) -> Result<AuthSession, StorageError> {
        let name = format!("{} {}", registration.first_name, registration.last_name);
        let user = self.add_account(
            &registration.email,
            name.trim(),
            Role::User,
            &registration.password,
        )?;
        Ok(AuthSession {
            token: self.lock()?.issue_token(&user.id),
            refresh: None,
            user,
        })
    }

    async fn resume(&self, token: &str) -> Result<User, StorageError> {
        let mut state = self.lock()?;
        let user = state
            .tokens
            .get(token.trim())
            .and_then(|id| state.account(id))
            .filter(|a| a.user.status == UserStatus::Active)
            .map(|a| a.user.clone())
            .ok_or_else(|| StorageError::Unauthorized("Invalid token.".into()))?;
        state.current_token = Some(token.trim().to_owned());
        Ok(user)
    }

    async fn logout(&self) {
        if let Ok(mut state) = self.lock() {
            if let Some(token) = state.current_token.take() {
                state.tokens.remove(&token);
            }
        }
    }

    async fn profile(&self, user: &UserId) -> Result<User, StorageError> {
        let state = self.lock()?;
        state
            .account(user)
            .map(|a| a.user.clone())
            .ok_or_else(|| {
                StorageError::Unauthorized("Authentication credentials were not provided.".into())
            })
    }

    async fn update_profile(&self, user: &UserId, update: &ProfileUpdate) -> Result<User, StorageError> {
        let mut state = self.lock()?;
        let account = state.account_mut(user).ok_or_else(|| {
            StorageError::Unauthorized("Authentication credentials were not provided.".into())
        })?;
        update.apply_to(&mut account.user);
        Ok(account.user.clone())
    }

    async fn change_password(&self, user: &UserId, change: &PasswordChange) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let account = state.account_mut(user).ok_or_else(|| {
            StorageError::Unauthorized("Authentication credentials were not provided.".into())
        })?;
        if account.password != change.current_password {
            return Err(StorageError::Validation(
                "Current password is incorrect.".into(),
            ));
        }
        account.password.clone_from(&change.new_password);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let state = self.lock()?;
        let mut users: Vec<User> = state.accounts.iter().map(|a| a.user.clone()).collect();
        users.sort_by(|a, b| b.date_joined.cmp(&a.date_joined));
        Ok(users)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, StorageError> {
        let state = self.lock()?;
        state
            .account(id)
            .map(|a| a.user.clone())
            .ok_or_else(|| StorageError::NotFound("User not found".into()))
    }

    async fn set_user_status(&self, id: &UserId, action: StatusAction) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let account = state
            .account_mut(id)
            .ok_or_else(|| StorageError::NotFound("User not found".into()))?;
        account.user.status = action.resulting_status();
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        let account = state
            .account(id)
            .ok_or_else(|| StorageError::NotFound("User not found".into()))?;
        if account.user.is_admin() {
            return Err(StorageError::Validation("Cannot delete admin users".into()));
        }
        state.accounts.retain(|a| &a.user.id != id);
        state.progress.retain(|(owner, _), _| owner != id);
        state.sessions.retain(|(owner, _)| owner != id);
        Ok(())
    }

    async fn user_stats(&self) -> Result<UserStats, StorageError> {
        let state = self.lock()?;
        let users: Vec<User> = state.accounts.iter().map(|a| a.user.clone()).collect();
        Ok(UserStats::from_users(&users))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordify_core::model::{Difficulty, TopicDraft};
    use wordify_core::time::fixed_clock;

    async fn topic_with_words(repo: &InMemoryRepository, name: &str, words: &[&str]) -> Topic {
        let topic = repo
            .create_topic(&TopicDraft::new(name, "").validate().unwrap())
            .await
            .unwrap();
        for word in words {
            let draft = VocabularyDraft {
                word: (*word).to_owned(),
                meaning: format!("meaning of {word}"),
                difficulty: Difficulty::Easy,
                ..VocabularyDraft::default()
            };
            repo.create_vocabulary(&topic.id, &draft).await.unwrap();
        }
        topic
    }

    #[tokio::test]
    async fn topic_names_are_unique() {
        let repo = InMemoryRepository::new();
        topic_with_words(&repo, "Food", &[]).await;
        let err = repo
            .create_topic(&TopicDraft::new("Food", "again").validate().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[tokio::test]
    async fn topics_report_vocabulary_count() {
        let repo = InMemoryRepository::new();
        let topic = topic_with_words(&repo, "Food", &["apple", "bread"]).await;
        let fetched = repo.get_topic(&topic.id).await.unwrap();
        assert_eq!(fetched.vocabulary_count, 2);
    }

    #[tokio::test]
    async fn words_are_unique_per_topic() {
        let repo = InMemoryRepository::new();
        let topic = topic_with_words(&repo, "Food", &["apple"]).await;
        let draft = VocabularyDraft {
            word: "apple".into(),
            meaning: "again".into(),
            ..VocabularyDraft::default()
        };
        let err = repo.create_vocabulary(&topic.id, &draft).await.unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
    }

    #[tokio::test]
    async fn three_correct_answers_master_an_item() {
        let repo = InMemoryRepository::with_clock(fixed_clock());
        let topic = topic_with_words(&repo, "Food", &["apple"]).await;
        let vocab = repo.list_by_topic(&topic.id).await.unwrap().remove(0);
        let user = UserId::new("u1");

        let first = repo.update_progress(&user, &vocab.id, true).await.unwrap();
        assert_eq!(first.status, ProgressStatus::Learning);
        repo.update_progress(&user, &vocab.id, true).await.unwrap();
        let third = repo.update_progress(&user, &vocab.id, true).await.unwrap();
        assert_eq!(third.status, ProgressStatus::Mastered);

        let fourth = repo.update_progress(&user, &vocab.id, false).await.unwrap();
        assert_eq!(fourth.total_attempts, 4);
        assert_eq!(fourth.status, ProgressStatus::Learning);
    }

    #[tokio::test]
    async fn generated_quiz_is_capped_by_vocabulary() {
        let repo = InMemoryRepository::new();
        let topic = topic_with_words(&repo, "Food", &["apple", "bread", "cheese", "dates", "eggs"]).await;
        let questions = repo.generate_quiz(&topic.id, 10).await.unwrap();
        assert_eq!(questions.len(), 5);
        for q in &questions {
            assert_eq!(q.options.len(), 4);
            assert!(q.options.contains(&q.correct_answer));
            assert!(!q.is_answered());
        }
    }

    #[tokio::test]
    async fn empty_topic_cannot_generate_a_quiz() {
        let repo = InMemoryRepository::new();
        let topic = topic_with_words(&repo, "Empty", &[]).await;
        let err = repo.generate_quiz(&topic.id, 5).await.unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
        let err = repo.generate_quiz(&TopicId::new("404"), 5).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn submitting_a_quiz_records_session_and_progress() {
        let repo = InMemoryRepository::with_clock(fixed_clock());
        let topic = topic_with_words(&repo, "Food", &["apple", "bread"]).await;
        let user = UserId::new("u1");
        let mut questions = repo.generate_quiz(&topic.id, 2).await.unwrap();
        let first_answer = questions[0].correct_answer.clone();
        questions[0].answer(0, &first_answer).unwrap();
        questions[1].answer(1, "wrong").unwrap();

        let submission = QuizSubmission {
            topic_id: topic.id.clone(),
            questions,
            time_spent_secs: 42,
        };
        let session = repo.submit_quiz(&user, &submission).await.unwrap();
        assert_eq!(session.total_questions, 2);
        assert_eq!(session.correct_answers, 1);
        assert_eq!(session.topic_name, "Food");

        let progress = repo.progress_for_topic(&user, &topic.id).await.unwrap();
        assert_eq!(progress.len(), 2);

        let fetched = repo.quiz_session(&user, &session.id).await.unwrap();
        assert_eq!(fetched, session);
        let other = repo.quiz_session(&UserId::new("u2"), &session.id).await;
        assert!(matches!(other, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn submit_skips_progress_for_deleted_vocabulary() {
        let repo = InMemoryRepository::with_clock(fixed_clock());
        let topic = topic_with_words(&repo, "Food", &["apple", "bread"]).await;
        let user = UserId::new("u1");
        let mut questions = repo.generate_quiz(&topic.id, 2).await.unwrap();
        for (i, question) in questions.iter_mut().enumerate() {
            let answer = question.correct_answer.clone();
            question.answer(i, &answer).unwrap();
        }
        repo.delete_vocabulary(&questions[1].vocabulary.id).await.unwrap();

        let submission = QuizSubmission {
            topic_id: topic.id.clone(),
            questions,
            time_spent_secs: 10,
        };
        let session = repo.submit_quiz(&user, &submission).await.unwrap();
        assert_eq!(session.correct_answers, 2);

        let progress = repo.progress_for_topic(&user, &topic.id).await.unwrap();
        assert_eq!(progress.len(), 1);
    }

    #[tokio::test]
    async fn login_checks_password_and_status() {
        let repo = InMemoryRepository::new();
        let user = repo
            .add_account("ada@example.com", "Ada Lovelace", Role::User, "secret")
            .unwrap();

        assert!(repo.login("ADA@example.com", "secret").await.is_ok());
        let err = repo.login("ada@example.com", "nope").await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid email or password.");

        repo.set_user_status(&user.id, StatusAction::Suspend).await.unwrap();
        let err = repo.login("ada@example.com", "secret").await.unwrap_err();
        assert_eq!(err.user_message(), "Account is not active.");
    }

    #[tokio::test]
    async fn issued_token_resumes_until_logout() {
        let repo = InMemoryRepository::new();
        repo.add_account("ada@example.com", "Ada Lovelace", Role::User, "secret")
            .unwrap();
        let session = repo.login("ada@example.com", "secret").await.unwrap();

        let user = repo.resume(&session.token).await.unwrap();
        assert_eq!(user.email, "ada@example.com");

        repo.logout().await;
        let err = repo.resume(&session.token).await.unwrap_err();
        assert!(matches!(err, StorageError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn admins_cannot_be_deleted() {
        let repo = InMemoryRepository::new();
        let admin = repo
            .add_account("root@example.com", "Root", Role::Admin, "pw")
            .unwrap();
        let err = repo.delete_user(&admin.id).await.unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
        assert_eq!(repo.user_stats().await.unwrap().admin_users, 1);
    }
}
