use std::sync::Arc;

use storage::repository::Storage;
use storage::{InMemoryRepository, RestConfig};

use crate::Clock;
use crate::admin_service::AdminService;
use crate::auth_service::AuthService;
use crate::context::AppContext;
use crate::dashboard::DashboardService;
use crate::error::AppServicesError;
use crate::learning::LearningLoopService;
use crate::quiz::{QuizHistoryService, QuizLoopService};

/// Assembles app-facing services around one shared `AppContext`.
#[derive(Clone)]
pub struct AppServices {
    context: AppContext,
    auth: Arc<AuthService>,
    dashboard: Arc<DashboardService>,
    learning: Arc<LearningLoopService>,
    quiz_loop: Arc<QuizLoopService>,
    quiz_history: Arc<QuizHistoryService>,
    admin: Arc<AdminService>,
}

impl AppServices {
    /// Build services backed by the REST API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Rest` if the HTTP client cannot be built.
    pub fn rest(config: RestConfig, clock: Clock) -> Result<Self, AppServicesError> {
        Ok(Self::from_storage(&Storage::rest(config)?, clock))
    }

    /// Build services over an in-process repository.
    #[must_use]
    pub fn in_memory(repo: InMemoryRepository, clock: Clock) -> Self {
        Self::from_storage(&Storage::from_repository(repo), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let context = AppContext::new();
        let auth = Arc::new(AuthService::new(
            context.clone(),
            Arc::clone(&storage.accounts),
        ));
        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&storage.topics),
            Arc::clone(&storage.progress),
        ));
        let learning = Arc::new(LearningLoopService::new(
            clock,
            Arc::clone(&storage.vocabulary),
            Arc::clone(&storage.progress),
        ));
        let quiz_loop = Arc::new(QuizLoopService::new(clock, Arc::clone(&storage.quizzes)));
        let quiz_history = Arc::new(QuizHistoryService::new(Arc::clone(&storage.quizzes)));
        let admin = Arc::new(AdminService::new(
            context.clone(),
            Arc::clone(&storage.topics),
            Arc::clone(&storage.vocabulary),
            Arc::clone(&storage.users),
        ));

        Self {
            context,
            auth,
            dashboard,
            learning,
            quiz_loop,
            quiz_history,
            admin,
        }
    }

    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.context
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn learning(&self) -> Arc<LearningLoopService> {
        Arc::clone(&self.learning)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn quiz_history(&self) -> Arc<QuizHistoryService> {
        Arc::clone(&self.quiz_history)
    }

    #[must_use]
    pub fn admin(&self) -> Arc<AdminService> {
        Arc::clone(&self.admin)
    }
}
