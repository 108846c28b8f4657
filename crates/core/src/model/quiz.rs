use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{QuestionId, QuizSessionId, TopicId};
use crate::model::progress::{percent, round_percent};
use crate::model::vocabulary::VocabularyItem;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("a quiz needs at least one question")]
    NoQuestions,

    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("answer cannot be empty")]
    EmptyAnswer,

    #[error("question {index} has no correct answer")]
    MissingCorrectAnswer { index: usize },

    #[error("question {index} was already answered")]
    AlreadyAnswered { index: usize },

    #[error("question {index} has not been answered")]
    Unanswered { index: usize },

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { total: u32, correct: u32 },

    #[error("too many questions for a single quiz: {len}")]
    TooManyQuestions { len: usize },

    #[error("unknown quiz mode: {0}")]
    UnknownMode(String),
}

//
// ─── MODE & CONFIG ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizMode {
    /// Choose the correct word from the offered options.
    #[default]
    MultipleChoice,
    /// Type the word that matches the definition.
    Typing,
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuizMode::MultipleChoice => "multiple-choice",
            QuizMode::Typing => "typing",
        })
    }
}

impl FromStr for QuizMode {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multiple-choice" | "multiple_choice" | "mc" => Ok(Self::MultipleChoice),
            "typing" | "type" => Ok(Self::Typing),
            _ => Err(QuizError::UnknownMode(s.to_owned())),
        }
    }
}

/// Question counts offered by the quiz setup screen.
pub const QUESTION_COUNT_CHOICES: [u32; 4] = [5, 10, 15, 20];
pub const DEFAULT_QUESTION_COUNT: u32 = 10;

/// Choices made on the quiz setup screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    question_count: u32,
    mode: QuizMode,
}

impl QuizConfig {
    /// # Errors
    ///
    /// Returns `QuizError::InvalidQuestionCount` if `question_count` is zero.
    pub fn new(question_count: u32, mode: QuizMode) -> Result<Self, QuizError> {
        if question_count == 0 {
            return Err(QuizError::InvalidQuestionCount);
        }
        Ok(Self {
            question_count,
            mode,
        })
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            mode: QuizMode::default(),
        }
    }
}

//
// ─── ANSWER MATCHING ───────────────────────────────────────────────────────────
//

/// Case-insensitive comparison after trimming surrounding whitespace.
///
/// The single rule used both for immediate feedback and for scoring.
#[must_use]
pub fn answers_match(user_answer: &str, correct_answer: &str) -> bool {
    let user = user_answer.trim();
    let correct = correct_answer.trim();
    user == correct || user.to_lowercase() == correct.to_lowercase()
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One quiz question with the learner's answer once it is given.
///
/// `is_correct` is fixed at answer time and never recomputed, so later
/// edits to `correct_answer` cannot change a recorded result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub id: QuestionId,
    pub vocabulary: VocabularyItem,
    /// Empty in typing mode.
    pub options: Vec<String>,
    pub correct_answer: String,
    user_answer: Option<String>,
    is_correct: Option<bool>,
}

impl QuizQuestion {
    #[must_use]
    pub fn new(
        id: QuestionId,
        vocabulary: VocabularyItem,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            id,
            vocabulary,
            options,
            correct_answer: correct_answer.into(),
            user_answer: None,
            is_correct: None,
        }
    }

    /// Rehydrate a question that was answered in an earlier session.
    #[must_use]
    pub fn answered(
        id: QuestionId,
        vocabulary: VocabularyItem,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        user_answer: Option<String>,
        is_correct: bool,
    ) -> Self {
        Self {
            id,
            vocabulary,
            options,
            correct_answer: correct_answer.into(),
            user_answer,
            is_correct: Some(is_correct),
        }
    }

    #[must_use]
    pub fn user_answer(&self) -> Option<&str> {
        self.user_answer.as_deref()
    }

    #[must_use]
    pub fn is_correct(&self) -> Option<bool> {
        self.is_correct
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.is_correct.is_some()
    }

    /// Record the learner's answer and decide correctness once.
    ///
    /// `index` only feeds error messages.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyAnswer` for blank input,
    /// `QuizError::MissingCorrectAnswer` when the question carries no answer key,
    /// and `QuizError::AlreadyAnswered` on a second attempt.
    pub fn answer(&mut self, index: usize, user_answer: &str) -> Result<bool, QuizError> {
        if self.is_answered() {
            return Err(QuizError::AlreadyAnswered { index });
        }
        let trimmed = user_answer.trim();
        if trimmed.is_empty() {
            return Err(QuizError::EmptyAnswer);
        }
        if self.correct_answer.trim().is_empty() {
            return Err(QuizError::MissingCorrectAnswer { index });
        }

        let correct = answers_match(trimmed, &self.correct_answer);
        self.user_answer = Some(trimmed.to_owned());
        self.is_correct = Some(correct);
        Ok(correct)
    }
}

//
// ─── SESSION RESULT ────────────────────────────────────────────────────────────
//

/// Scored outcome of one completed quiz. Immutable once built.
///
/// Invariants: `correct + incorrect == total`, `total > 0`,
/// `accuracy` in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizSessionResult {
    total_questions: u32,
    correct_answers: u32,
    time_spent_secs: u32,
}

impl QuizSessionResult {
    /// Score a fully answered question list.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty quiz,
    /// `QuizError::Unanswered` if any question lacks an answer,
    /// or `QuizError::TooManyQuestions` if the count cannot fit in `u32`.
    pub fn from_questions(
        questions: &[QuizQuestion],
        time_spent_secs: u32,
    ) -> Result<Self, QuizError> {
        let mut correct = 0_u32;
        for (index, question) in questions.iter().enumerate() {
            match question.is_correct() {
                Some(true) => correct = correct.saturating_add(1),
                Some(false) => {}
                None => return Err(QuizError::Unanswered { index }),
            }
        }
        let total = u32::try_from(questions.len()).map_err(|_| QuizError::TooManyQuestions {
            len: questions.len(),
        })?;

        Self::from_counts(total, correct, time_spent_secs)
    }

    /// Rebuild a result from raw counts, e.g. a session fetched from history.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` when `total` is 0 and
    /// `QuizError::CountMismatch` when `correct > total`.
    pub fn from_counts(total: u32, correct: u32, time_spent_secs: u32) -> Result<Self, QuizError> {
        if total == 0 {
            return Err(QuizError::NoQuestions);
        }
        if correct > total {
            return Err(QuizError::CountMismatch { total, correct });
        }
        Ok(Self {
            total_questions: total,
            correct_answers: correct,
            time_spent_secs,
        })
    }

    /// Score is the number of correct answers.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> u32 {
        self.total_questions - self.correct_answers
    }

    #[must_use]
    pub fn accuracy(&self) -> f64 {
        percent(self.correct_answers, self.total_questions)
    }

    #[must_use]
    pub fn accuracy_rounded(&self) -> u32 {
        round_percent(self.accuracy())
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> u32 {
        self.time_spent_secs
    }

    /// Seconds per question, integer division.
    #[must_use]
    pub fn average_time_per_item(&self) -> u32 {
        self.time_spent_secs / self.total_questions
    }

    #[must_use]
    pub fn tier(&self) -> PerformanceTier {
        PerformanceTier::from_accuracy(self.accuracy())
    }

    #[must_use]
    pub fn headline(&self) -> ResultHeadline {
        ResultHeadline::from_accuracy(self.accuracy())
    }
}

//
// ─── FEEDBACK LABELS ───────────────────────────────────────────────────────────
//

/// Three-way feedback band. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerformanceTier {
    Excellent,
    Good,
    NeedsPractice,
}

impl PerformanceTier {
    #[must_use]
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            Self::Excellent
        } else if accuracy >= 70.0 {
            Self::Good
        } else {
            Self::NeedsPractice
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "Excellent",
            PerformanceTier::Good => "Good",
            PerformanceTier::NeedsPractice => "Needs Practice",
        }
    }
}

/// Finer-grained message for the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultHeadline {
    Outstanding,
    Excellent,
    GoodJob,
    NotBad,
    KeepPracticing,
}

impl ResultHeadline {
    #[must_use]
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            Self::Outstanding
        } else if accuracy >= 80.0 {
            Self::Excellent
        } else if accuracy >= 70.0 {
            Self::GoodJob
        } else if accuracy >= 60.0 {
            Self::NotBad
        } else {
            Self::KeepPracticing
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ResultHeadline::Outstanding => "Outstanding!",
            ResultHeadline::Excellent => "Excellent!",
            ResultHeadline::GoodJob => "Good Job!",
            ResultHeadline::NotBad => "Not Bad!",
            ResultHeadline::KeepPracticing => "Keep Practicing!",
        }
    }
}

//
// ─── PERSISTED SESSION ─────────────────────────────────────────────────────────
//

/// A quiz session as stored by the backend, with its server id.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSessionRecord {
    pub id: QuizSessionId,
    pub topic_id: Option<TopicId>,
    pub topic_name: String,
    pub topic_color: String,
    pub questions: Vec<QuizQuestion>,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub time_spent_secs: u32,
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuizSessionRecord {
    /// Recompute the scored result from raw counts.
    ///
    /// # Errors
    ///
    /// Propagates `QuizError` when the stored counts are inconsistent.
    pub fn result(&self) -> Result<QuizSessionResult, QuizError> {
        QuizSessionResult::from_counts(
            self.total_questions,
            self.correct_answers,
            self.time_spent_secs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::VocabularyId;
    use crate::model::vocabulary::Difficulty;
    use proptest::prelude::*;

    fn vocab(word: &str) -> VocabularyItem {
        VocabularyItem {
            id: VocabularyId::new(word),
            topic_id: None,
            word: word.to_owned(),
            pronunciation: String::new(),
            meaning: format!("meaning of {word}"),
            example: String::new(),
            image_url: None,
            difficulty: Difficulty::Medium,
        }
    }

    fn question(i: usize, word: &str) -> QuizQuestion {
        QuizQuestion::new(
            QuestionId::new(format!("q{i}")),
            vocab(word),
            vec![word.to_owned(), "other".to_owned()],
            word,
        )
    }

    #[test]
    fn answer_match_ignores_case_and_whitespace() {
        let mut q = question(1, "Resilient");
        assert_eq!(q.answer(0, " resilient "), Ok(true));
        assert_eq!(q.user_answer(), Some("resilient"));
        assert_eq!(q.is_correct(), Some(true));
    }

    #[test]
    fn answer_is_fixed_at_answer_time() {
        let mut q = question(1, "apple");
        q.answer(0, "apple").unwrap();
        q.correct_answer = "pear".into();
        assert_eq!(q.is_correct(), Some(true));
        assert_eq!(q.answer(0, "pear"), Err(QuizError::AlreadyAnswered { index: 0 }));
    }

    #[test]
    fn blank_answer_is_rejected() {
        let mut q = question(1, "apple");
        assert_eq!(q.answer(0, "   "), Err(QuizError::EmptyAnswer));
        assert!(!q.is_answered());
    }

    #[test]
    fn missing_answer_key_is_rejected() {
        let mut q = question(1, "apple");
        q.correct_answer.clear();
        assert_eq!(
            q.answer(3, "apple"),
            Err(QuizError::MissingCorrectAnswer { index: 3 })
        );
    }

    #[test]
    fn ten_questions_seven_correct() {
        let mut questions: Vec<_> = (0..10).map(|i| question(i, "word")).collect();
        for (i, q) in questions.iter_mut().enumerate() {
            let answer = if i < 7 { "word" } else { "wrong" };
            q.answer(i, answer).unwrap();
        }

        let result = QuizSessionResult::from_questions(&questions, 300).unwrap();
        assert_eq!(result.score(), 7);
        assert_eq!(result.correct_answers(), 7);
        assert_eq!(result.incorrect_answers(), 3);
        assert_eq!(result.accuracy_rounded(), 70);
        assert_eq!(result.tier(), PerformanceTier::Good);
        assert_eq!(result.average_time_per_item(), 30);
        assert_eq!(result.headline(), ResultHeadline::GoodJob);
    }

    #[test]
    fn empty_quiz_is_an_error() {
        assert_eq!(
            QuizSessionResult::from_questions(&[], 10),
            Err(QuizError::NoQuestions)
        );
    }

    #[test]
    fn unanswered_question_blocks_scoring() {
        let mut questions = vec![question(0, "a"), question(1, "b")];
        questions[0].answer(0, "a").unwrap();
        assert_eq!(
            QuizSessionResult::from_questions(&questions, 10),
            Err(QuizError::Unanswered { index: 1 })
        );
    }

    #[test]
    fn counts_are_validated() {
        assert_eq!(
            QuizSessionResult::from_counts(3, 4, 0),
            Err(QuizError::CountMismatch {
                total: 3,
                correct: 4
            })
        );
    }

    #[test]
    fn tier_lower_bounds_are_inclusive() {
        assert_eq!(PerformanceTier::from_accuracy(90.0), PerformanceTier::Excellent);
        assert_eq!(PerformanceTier::from_accuracy(89.99), PerformanceTier::Good);
        assert_eq!(PerformanceTier::from_accuracy(70.0), PerformanceTier::Good);
        assert_eq!(PerformanceTier::from_accuracy(69.99), PerformanceTier::NeedsPractice);
    }

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("typing".parse::<QuizMode>().unwrap(), QuizMode::Typing);
        assert_eq!("MC".parse::<QuizMode>().unwrap(), QuizMode::MultipleChoice);
        assert!("essay".parse::<QuizMode>().is_err());
    }

    #[test]
    fn config_rejects_zero_questions() {
        assert_eq!(
            QuizConfig::new(0, QuizMode::Typing),
            Err(QuizError::InvalidQuestionCount)
        );
        assert_eq!(QuizConfig::default().question_count(), 10);
    }

    proptest! {
        #[test]
        fn counts_always_add_up(total in 1_u32..500, correct_seed in 0_u32..500, secs in 0_u32..10_000) {
            let correct = correct_seed % (total + 1);
            let result = QuizSessionResult::from_counts(total, correct, secs).unwrap();
            prop_assert_eq!(result.correct_answers() + result.incorrect_answers(), total);
            prop_assert!((0.0..=100.0).contains(&result.accuracy()));
        }

        #[test]
        fn more_correct_never_scores_lower(total in 1_u32..200, a in 0_u32..200, b in 0_u32..200) {
            let (lo, hi) = (a.min(b) % (total + 1), a.max(b) % (total + 1));
            let (lo, hi) = (lo.min(hi), lo.max(hi));
            let low = QuizSessionResult::from_counts(total, lo, 0).unwrap();
            let high = QuizSessionResult::from_counts(total, hi, 0).unwrap();
            prop_assert!(high.score() >= low.score());
        }

        #[test]
        fn padded_answers_still_match(word in "[A-Za-z]{1,12}", left in " {0,3}", right in " {0,3}") {
            let padded = format!("{left}{}{right}", word.to_uppercase());
            prop_assert!(answers_match(&padded, &word));
        }
    }
}
