//! Shared error types for the services crate.

use thiserror::Error;

use storage::RestInitError;
use storage::repository::StorageError;
use wordify_core::model::{AccountError, LearningError, QuizError};

/// Errors emitted by `AuthService` and by context checks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("please sign in first")]
    NotSignedIn,
    #[error("only administrators can do that")]
    NotAdmin,
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `LearningLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LearningFlowError {
    #[error(transparent)]
    Learning(#[from] LearningError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while running or reviewing quizzes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizFlowError {
    #[error("quiz is still in progress")]
    NotFinished,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AdminService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Validation(#[from] wordify_core::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A navigator action was invoked without the context its target view needs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("no topic selected")]
    NoTopicSelected,
    #[error("no quiz configuration chosen")]
    NoQuizConfig,
    #[error("cannot {action} from the {view} view")]
    InvalidTransition {
        action: &'static str,
        view: &'static str,
    },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Rest(#[from] RestInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Message suitable for the person who triggered the action. Storage
/// failures hide transport detail; everything else uses its `Display`.
macro_rules! user_message {
    ($($ty:ident),* $(,)?) => {
        $(
            impl $ty {
                #[must_use]
                pub fn user_message(&self) -> String {
                    match self {
                        $ty::Storage(err) => err.user_message(),
                        other => other.to_string(),
                    }
                }
            }
        )*
    };
}

user_message!(AuthError, LearningFlowError, QuizFlowError, AppServicesError);

impl DashboardError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Storage(err) => err.user_message(),
        }
    }
}

impl AdminError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Auth(err) => err.user_message(),
            AdminError::Validation(err) => err.to_string(),
            AdminError::Storage(err) => err.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failures_use_friendly_text() {
        let err = QuizFlowError::from(StorageError::Transport("connection reset".into()));
        assert!(!err.user_message().contains("reset"));

        let err = AdminError::from(AuthError::from(StorageError::Forbidden(
            "You do not have permission to perform this action.".into(),
        )));
        assert_eq!(
            err.user_message(),
            "You do not have permission to perform this action."
        );
        assert_eq!(AuthError::NotAdmin.user_message(), "only administrators can do that");
    }
}
