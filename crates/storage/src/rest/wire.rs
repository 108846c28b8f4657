//! JSON shapes exchanged with the REST backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wordify_core::model::{
    DEFAULT_TOPIC_COLOR, Difficulty, ProgressRecord, ProgressStatus, QuestionId, QuizQuestion,
    QuizSessionId, QuizSessionRecord, Role, StatusAction, Topic, TopicId, User, UserId,
    UserStatus, VocabularyDraft, VocabularyId, VocabularyItem,
};

/// A list that may arrive bare or wrapped in a paginated `results` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListBody<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Plain(items) | ListBody::Paged { results: items } => items,
        }
    }
}

//
// ─── TOPICS ────────────────────────────────────────────────────────────────────
//

fn default_color() -> String {
    DEFAULT_TOPIC_COLOR.to_owned()
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicDto {
    id: TopicId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default)]
    vocabulary_count: u32,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<TopicDto> for Topic {
    fn from(dto: TopicDto) -> Self {
        Topic {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            color: dto.color,
            vocabulary_count: dto.vocabulary_count,
            created_at: dto.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TopicBody<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub color: &'a str,
}

//
// ─── VOCABULARY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub(crate) struct VocabularyBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<&'a TopicId>,
    pub word: &'a str,
    pub pronunciation: &'a str,
    pub meaning: &'a str,
    pub example: &'a str,
    pub difficulty: Difficulty,
}

impl<'a> VocabularyBody<'a> {
    pub(crate) fn new(topic: Option<&'a TopicId>, draft: &'a VocabularyDraft) -> Self {
        Self {
            topic,
            word: &draft.word,
            pronunciation: &draft.pronunciation,
            meaning: &draft.meaning,
            example: &draft.example,
            difficulty: draft.difficulty,
        }
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressDto {
    #[serde(default)]
    user: Option<UserId>,
    #[serde(alias = "vocabulary_id")]
    vocabulary: VocabularyId,
    #[serde(alias = "topic_id")]
    topic: TopicId,
    status: ProgressStatus,
    #[serde(default)]
    correct_count: u32,
    #[serde(default)]
    total_attempts: u32,
    #[serde(default)]
    last_studied: Option<DateTime<Utc>>,
}

impl From<ProgressDto> for ProgressRecord {
    fn from(dto: ProgressDto) -> Self {
        ProgressRecord {
            user_id: dto.user,
            vocabulary_id: dto.vocabulary,
            topic_id: dto.topic,
            status: dto.status,
            correct_count: dto.correct_count,
            total_attempts: dto.total_attempts,
            last_studied: dto.last_studied,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressUpdateBody<'a> {
    pub vocabulary_id: &'a VocabularyId,
    pub is_correct: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressUpdateResponse {
    pub progress: ProgressDto,
}

//
// ─── QUIZZES ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionDto {
    pub id: QuestionId,
    #[serde(default)]
    pub vocabulary: Option<VocabularyItem>,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default, alias = "correctAnswer")]
    correct_answer: String,
    #[serde(default, alias = "userAnswer")]
    user_answer: Option<String>,
    #[serde(default, alias = "isCorrect")]
    is_correct: Option<bool>,
}

impl QuestionDto {
    /// `None` when the backend omitted the vocabulary detail.
    pub(crate) fn into_question(self) -> Option<QuizQuestion> {
        let vocabulary = self.vocabulary?;
        Some(match self.is_correct {
            Some(correct) => QuizQuestion::answered(
                self.id,
                vocabulary,
                self.options,
                self.correct_answer,
                self.user_answer.filter(|a| !a.is_empty()),
                correct,
            ),
            None => QuizQuestion::new(self.id, vocabulary, self.options, self.correct_answer),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateBody<'a> {
    pub topic_id: &'a TopicId,
    pub question_count: u32,
}

#[derive(Debug, Serialize)]
struct VocabularyOut<'a> {
    id: &'a VocabularyId,
    word: &'a str,
    pronunciation: &'a str,
    meaning: &'a str,
    example: &'a str,
    difficulty: Difficulty,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionOut<'a> {
    id: &'a QuestionId,
    vocabulary: VocabularyOut<'a>,
    options: &'a [String],
    correct_answer: &'a str,
    user_answer: &'a str,
    is_correct: bool,
}

impl<'a> From<&'a QuizQuestion> for QuestionOut<'a> {
    fn from(q: &'a QuizQuestion) -> Self {
        let v = &q.vocabulary;
        Self {
            id: &q.id,
            vocabulary: VocabularyOut {
                id: &v.id,
                word: &v.word,
                pronunciation: &v.pronunciation,
                meaning: &v.meaning,
                example: &v.example,
                difficulty: v.difficulty,
            },
            options: &q.options,
            correct_answer: &q.correct_answer,
            user_answer: q.user_answer().unwrap_or_default(),
            is_correct: q.is_correct().unwrap_or(false),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitBody<'a> {
    pub topic_id: &'a TopicId,
    pub questions: Vec<QuestionOut<'a>>,
    pub time_spent: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    pub session: SessionDto,
}

/// Server view of a quiz session. Server-side `score` and `accuracy` are
/// ignored; results are recomputed from the raw counts.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionDto {
    id: QuizSessionId,
    #[serde(default)]
    topic: Option<TopicId>,
    #[serde(default)]
    topic_name: String,
    #[serde(default = "default_color")]
    topic_color: String,
    #[serde(default)]
    questions: Vec<QuestionDto>,
    #[serde(default)]
    total_questions: Option<u32>,
    #[serde(default)]
    correct_answers: Option<u32>,
    #[serde(default)]
    time_spent: u32,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl From<SessionDto> for QuizSessionRecord {
    fn from(dto: SessionDto) -> Self {
        let listed = u32::try_from(dto.questions.len()).unwrap_or(u32::MAX);
        let counted = dto
            .questions
            .iter()
            .filter(|q| q.is_correct == Some(true))
            .count();
        let counted = u32::try_from(counted).unwrap_or(u32::MAX);
        let total_questions = dto.total_questions.unwrap_or(listed);
        let correct_answers = dto.correct_answers.unwrap_or(counted);

        let questions: Vec<QuizQuestion> = dto
            .questions
            .into_iter()
            .filter_map(|q| {
                let id = q.id.clone();
                let question = q.into_question();
                if question.is_none() {
                    tracing::debug!(question = %id, "quiz question without vocabulary detail skipped");
                }
                question
            })
            .collect();

        QuizSessionRecord {
            id: dto.id,
            topic_id: dto.topic,
            topic_name: dto.topic_name,
            topic_color: dto.topic_color,
            questions,
            total_questions,
            correct_answers,
            time_spent_secs: dto.time_spent,
            completed_at: dto.completed_at,
        }
    }
}

//
// ─── ACCOUNTS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct UserDto {
    id: UserId,
    #[serde(default)]
    email: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    role: Role,
    #[serde(default)]
    status: UserStatus,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    total_quizzes: u32,
    #[serde(default)]
    words_learned: u32,
    #[serde(default)]
    average_score: f64,
    #[serde(default)]
    date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    last_login: Option<DateTime<Utc>>,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        let name = if dto.name.trim().is_empty() {
            format!("{} {}", dto.first_name, dto.last_name).trim().to_owned()
        } else {
            dto.name
        };
        User {
            id: dto.id,
            email: dto.email,
            username: dto.username,
            first_name: dto.first_name,
            last_name: dto.last_name,
            name,
            role: dto.role,
            status: dto.status,
            avatar: dto.avatar.filter(|a| !a.is_empty()),
            bio: dto.bio.unwrap_or_default(),
            location: dto.location.unwrap_or_default(),
            website: dto.website.unwrap_or_default(),
            language: dto.language.unwrap_or_default(),
            timezone: dto.timezone.unwrap_or_default(),
            total_quizzes: dto.total_quizzes,
            words_learned: dto.words_learned,
            average_score: dto.average_score,
            date_joined: dto.date_joined,
            last_login: dto.last_login,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub refresh: Option<String>,
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusBody {
    pub action: StatusAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paged_and_plain_lists_unwrap() {
        let plain: ListBody<u32> = serde_json::from_str("[1, 2]").unwrap();
        let paged: ListBody<u32> = serde_json::from_str(r#"{"count": 2, "results": [1, 2]}"#).unwrap();
        assert_eq!(plain.into_vec(), paged.into_vec());
    }

    #[test]
    fn session_counts_fall_back_to_question_flags() {
        let json = r##"{
            "id": 9, "topic": 2, "topic_name": "Food", "topic_color": "#10B981",
            "score": 50, "accuracy": 50.0, "time_spent": 30,
            "questions": [
                {"id": "q1", "vocabulary": {"id": 1, "word": "apple", "meaning": "fruit"},
                 "options": ["apple"], "correct_answer": "apple", "user_answer": "apple", "is_correct": true},
                {"id": "q2", "options": [], "correctAnswer": "bread", "isCorrect": false}
            ]
        }"##;
        let dto: SessionDto = serde_json::from_str(json).unwrap();
        let record = QuizSessionRecord::from(dto);
        assert_eq!(record.total_questions, 2);
        assert_eq!(record.correct_answers, 1);
        assert_eq!(record.questions.len(), 1);
        assert_eq!(record.questions[0].is_correct(), Some(true));
        assert_eq!(record.id.as_str(), "9");
    }

    #[test]
    fn progress_accepts_not_started_status() {
        let json = r#"{"id": 1, "vocabulary": 4, "topic": 2, "status": "not_started",
                       "correct_count": 0, "total_attempts": 0, "accuracy": 0}"#;
        let record = ProgressRecord::from(serde_json::from_str::<ProgressDto>(json).unwrap());
        assert_eq!(record.status, ProgressStatus::NotStarted);
        assert_eq!(record.vocabulary_id.as_str(), "4");
    }

    #[test]
    fn user_name_falls_back_to_parts() {
        let json = r#"{"id": 3, "email": "a@b.c", "first_name": "Ada", "last_name": "L", "name": "", "bio": null}"#;
        let user = User::from(serde_json::from_str::<UserDto>(json).unwrap());
        assert_eq!(user.name, "Ada L");
        assert_eq!(user.role, Role::User);
    }
}
