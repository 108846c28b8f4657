use chrono::{DateTime, Utc};
use wordify_core::model::{QuizConfig, QuizError, QuizMode, QuizQuestion, TopicId};
use wordify_core::time::elapsed_secs;

/// Immediate feedback shown after answering a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_answer: String,
}

/// A quiz being taken. Questions are answered in order, one at a time.
///
/// The timer runs from construction until the last question is answered.
#[derive(Debug, Clone)]
pub struct QuizRun {
    topic_id: TopicId,
    config: QuizConfig,
    questions: Vec<QuizQuestion>,
    index: usize,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl QuizRun {
    /// Typing mode drops the generated options.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty question list.
    pub fn new(
        topic_id: TopicId,
        config: QuizConfig,
        mut questions: Vec<QuizQuestion>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if config.mode() == QuizMode::Typing {
            for question in &mut questions {
                question.options.clear();
            }
        }
        Ok(Self {
            topic_id,
            config,
            questions,
            index: 0,
            started_at,
            finished_at: None,
        })
    }

    #[must_use]
    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }

    #[must_use]
    pub fn config(&self) -> QuizConfig {
        self.config
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.index)
    }

    /// Zero-based index of the current question.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn correct_so_far(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.is_correct() == Some(true))
            .count()
    }

    /// Every question has an answer.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Answer the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyAnswer` for blank input and
    /// `QuizError::AlreadyAnswered` if the current question has an answer.
    pub fn answer(&mut self, user_answer: &str, at: DateTime<Utc>) -> Result<AnswerFeedback, QuizError> {
        let index = self.index;
        let question = self
            .questions
            .get_mut(index)
            .ok_or(QuizError::AlreadyAnswered { index })?;
        let correct = question.answer(index, user_answer)?;
        let correct_answer = question.correct_answer.clone();
        if index + 1 == self.questions.len() {
            self.finished_at = Some(at);
        }
        Ok(AnswerFeedback {
            correct,
            correct_answer,
        })
    }

    /// Move to the next question. Returns `false` on the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Unanswered` while the current question has no answer.
    pub fn advance(&mut self) -> Result<bool, QuizError> {
        let index = self.index;
        if !self.questions.get(index).is_some_and(QuizQuestion::is_answered) {
            return Err(QuizError::Unanswered { index });
        }
        if index + 1 >= self.questions.len() {
            return Ok(false);
        }
        self.index += 1;
        Ok(true)
    }

    /// Seconds since the quiz started, frozen once it is finished.
    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        elapsed_secs(self.started_at, self.finished_at.unwrap_or(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use wordify_core::model::{Difficulty, QuestionId, VocabularyId, VocabularyItem};
    use wordify_core::time::fixed_now;

    fn question(i: usize, word: &str) -> QuizQuestion {
        let item = VocabularyItem {
            id: VocabularyId::new(i.to_string()),
            topic_id: None,
            word: word.to_owned(),
            pronunciation: String::new(),
            meaning: format!("meaning of {word}"),
            example: String::new(),
            image_url: None,
            difficulty: Difficulty::Medium,
        };
        QuizQuestion::new(
            QuestionId::new(format!("q{}", i + 1)),
            item,
            vec![word.to_owned(), "other".to_owned()],
            word,
        )
    }

    fn sample_run(mode: QuizMode) -> QuizRun {
        let config = QuizConfig::new(2, mode).unwrap();
        QuizRun::new(
            TopicId::new("1"),
            config,
            vec![question(0, "Resilient"), question(1, "Candid")],
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn typing_mode_hides_options() {
        let run = sample_run(QuizMode::Typing);
        assert!(run.questions().iter().all(|q| q.options.is_empty()));
        let run = sample_run(QuizMode::MultipleChoice);
        assert_eq!(run.current().unwrap().options.len(), 2);
    }

    #[test]
    fn answers_are_normalized_and_final() {
        let mut run = sample_run(QuizMode::Typing);
        let start = fixed_now();
        assert_eq!(run.answer("   ", start), Err(QuizError::EmptyAnswer));
        assert_eq!(run.advance(), Err(QuizError::Unanswered { index: 0 }));

        let feedback = run.answer(" resilient ", start).unwrap();
        assert!(feedback.correct);
        assert_eq!(feedback.correct_answer, "Resilient");
        assert_eq!(
            run.answer("again", start),
            Err(QuizError::AlreadyAnswered { index: 0 })
        );
        assert_eq!(run.current().unwrap().user_answer(), Some("resilient"));
    }

    #[test]
    fn timer_stops_at_final_answer() {
        let mut run = sample_run(QuizMode::MultipleChoice);
        let start = fixed_now();
        run.answer("Resilient", start + Duration::seconds(10)).unwrap();
        assert!(run.advance().unwrap());
        assert!(!run.is_finished());
        assert_eq!(run.elapsed_secs(start + Duration::seconds(20)), 20);

        run.answer("other", start + Duration::seconds(45)).unwrap();
        assert!(run.is_finished());
        assert!(!run.advance().unwrap());
        assert_eq!(run.elapsed_secs(start + Duration::seconds(500)), 45);
        assert_eq!(run.correct_so_far(), 1);
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let err = QuizRun::new(TopicId::new("1"), QuizConfig::default(), Vec::new(), fixed_now())
            .unwrap_err();
        assert_eq!(err, QuizError::NoQuestions);
    }
}
