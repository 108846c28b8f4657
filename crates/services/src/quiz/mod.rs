mod history;
mod run;
mod workflow;

pub use crate::error::QuizFlowError;
pub use history::{HistoryPage, QuizHistoryService, SessionDetail};
pub use run::{AnswerFeedback, QuizRun};
pub use workflow::{QuizLoopService, SubmittedQuiz};
