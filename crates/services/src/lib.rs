#![forbid(unsafe_code)]

pub mod admin_service;
pub mod app_services;
pub mod auth_service;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod learning;
pub mod navigator;
pub mod quiz;

pub use wordify_core::Clock;

pub use admin_service::AdminService;
pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use context::{AppContext, Session};
pub use dashboard::{Dashboard, DashboardService, TopicCard};
pub use error::{
    AdminError, AppServicesError, AuthError, DashboardError, LearningFlowError, NavigationError,
    QuizFlowError,
};
pub use learning::{CardOutcome, LearningLoopService};
pub use navigator::{Navigator, Transition, View, ViewToken};
pub use quiz::{
    AnswerFeedback, HistoryPage, QuizHistoryService, QuizLoopService, QuizRun, SessionDetail,
    SubmittedQuiz,
};
