mod history;
mod ids;
mod learning;
mod progress;
mod quiz;
mod topic;
mod user;
mod vocabulary;

pub use ids::{ParseIdError, QuestionId, QuizSessionId, TopicId, UserId, VocabularyId};

pub use history::{HistoryFilter, HistoryQuery, HistorySort, HistoryStats, session_accuracy};
pub use learning::{LearningError, LearningSession, LearningSummary, LearningTier};
pub use progress::{
    OverallProgress, ProgressRecord, ProgressStatus, ProgressTier, TopicProgressSummary, percent,
    round_percent,
};
pub use quiz::{
    DEFAULT_QUESTION_COUNT, PerformanceTier, QUESTION_COUNT_CHOICES, QuizConfig, QuizError,
    QuizMode, QuizQuestion, QuizSessionRecord, QuizSessionResult, ResultHeadline, answers_match,
};
pub use topic::{DEFAULT_TOPIC_COLOR, TOPIC_NAME_MAX_CHARS, Topic, TopicDraft, TopicError, ValidTopic};
pub use user::{
    AccountError, PasswordChange, ProfileUpdate, Registration, Role, StatusAction, User,
    UserQuery, UserStats, UserStatus,
};
pub use vocabulary::{
    Difficulty, PRONUNCIATION_MAX_CHARS, VocabularyDraft, VocabularyError, VocabularyItem,
    WORD_MAX_CHARS,
};
