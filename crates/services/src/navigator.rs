//! Learner screen flow.
//!
//! `topics` is the initial view and the target of every `back`. Views that
//! act on a topic carry it, so a view can never exist without its context:
//! actions whose preconditions are missing fail with [`NavigationError`]
//! instead of opening an empty screen.

use wordify_core::model::{QuizConfig, QuizSessionId, Topic};

use crate::error::NavigationError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Topics,
    Learning {
        topic: Topic,
    },
    QuizSetup {
        topic: Topic,
    },
    Quiz {
        topic: Topic,
        config: QuizConfig,
    },
    /// `topic` is `None` when the result was opened from history.
    QuizResult {
        session_id: QuizSessionId,
        topic: Option<Topic>,
    },
    QuizHistory,
}

impl View {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            View::Topics => "topics",
            View::Learning { .. } => "learning",
            View::QuizSetup { .. } => "quiz-setup",
            View::Quiz { .. } => "quiz",
            View::QuizResult { .. } => "quiz-result",
            View::QuizHistory => "quiz-history",
        }
    }
}

/// What the caller should do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    /// Reload topic progress before showing the new view.
    pub refresh_progress: bool,
}

/// Identifies the view an asynchronous load was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewToken(u64);

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    view: View,
    selected_topic: Option<Topic>,
    generation: u64,
    refresh_epoch: u64,
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    #[must_use]
    pub fn selected_topic(&self) -> Option<&Topic> {
        self.selected_topic.as_ref()
    }

    /// Number of times the topic list asked for fresh progress.
    #[must_use]
    pub fn refresh_epoch(&self) -> u64 {
        self.refresh_epoch
    }

    /// Token for a load started on the current view.
    #[must_use]
    pub fn token(&self) -> ViewToken {
        ViewToken(self.generation)
    }

    #[must_use]
    pub fn is_current(&self, token: ViewToken) -> bool {
        token.0 == self.generation
    }

    /// Keep `value` only if the view it was loaded for is still showing.
    pub fn accept<T>(&self, token: ViewToken, value: T) -> Option<T> {
        if self.is_current(token) {
            Some(value)
        } else {
            tracing::debug!(
                loaded_for = token.0,
                current = self.generation,
                "discarding result for a view that is gone"
            );
            None
        }
    }

    fn enter(&mut self, view: View) -> Transition {
        self.generation = self.generation.wrapping_add(1);
        self.view = view;
        Transition::default()
    }

    fn expect_view(&self, action: &'static str, allowed: fn(&View) -> bool) -> Result<(), NavigationError> {
        if allowed(&self.view) {
            Ok(())
        } else {
            Err(NavigationError::InvalidTransition {
                action,
                view: self.view.name(),
            })
        }
    }

    fn require_topic(&self) -> Result<Topic, NavigationError> {
        self.selected_topic
            .clone()
            .ok_or(NavigationError::NoTopicSelected)
    }

    /// Open the flashcard pass for `topic`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` outside the topic list.
    pub fn select_topic(&mut self, topic: Topic) -> Result<Transition, NavigationError> {
        self.expect_view("select a topic", |v| matches!(v, View::Topics))?;
        self.selected_topic = Some(topic.clone());
        Ok(self.enter(View::Learning { topic }))
    }

    /// Open quiz setup for `topic` straight from the topic list.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` outside the topic list.
    pub fn quiz_topic(&mut self, topic: Topic) -> Result<Transition, NavigationError> {
        self.expect_view("start a quiz", |v| matches!(v, View::Topics))?;
        self.selected_topic = Some(topic.clone());
        Ok(self.enter(View::QuizSetup { topic }))
    }

    /// Open quiz setup for the selected topic.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NoTopicSelected` when no topic was selected.
    pub fn start_quiz(&mut self) -> Result<Transition, NavigationError> {
        let topic = self.require_topic()?;
        self.expect_view("start a quiz", |v| {
            matches!(v, View::Topics | View::Learning { .. })
        })?;
        Ok(self.enter(View::QuizSetup { topic }))
    }

    /// # Errors
    ///
    /// Returns `NavigationError::NoTopicSelected` without a topic and
    /// `NavigationError::InvalidTransition` outside quiz setup.
    pub fn complete_setup(&mut self, config: QuizConfig) -> Result<Transition, NavigationError> {
        let topic = self.require_topic()?;
        self.expect_view("begin the quiz", |v| matches!(v, View::QuizSetup { .. }))?;
        Ok(self.enter(View::Quiz { topic, config }))
    }

    /// Show the result of the quiz that was just submitted.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` unless a quiz is showing.
    pub fn complete_quiz(&mut self, session_id: QuizSessionId) -> Result<Transition, NavigationError> {
        let View::Quiz { topic, .. } = &self.view else {
            return Err(NavigationError::InvalidTransition {
                action: "finish a quiz",
                view: self.view.name(),
            });
        };
        let topic = Some(topic.clone());
        Ok(self.enter(View::QuizResult { session_id, topic }))
    }

    /// Return to the same topic's quiz setup.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NoTopicSelected` for a result opened from
    /// history and `NavigationError::InvalidTransition` outside a result.
    pub fn retake_quiz(&mut self) -> Result<Transition, NavigationError> {
        let View::QuizResult { topic, .. } = &self.view else {
            return Err(NavigationError::InvalidTransition {
                action: "retake a quiz",
                view: self.view.name(),
            });
        };
        let topic = topic.clone().ok_or(NavigationError::NoTopicSelected)?;
        Ok(self.enter(View::QuizSetup { topic }))
    }

    /// Open the quiz history. Available from every view.
    pub fn view_history(&mut self) -> Transition {
        self.enter(View::QuizHistory)
    }

    /// Open a past session from the history list.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` outside the history view.
    pub fn view_result(&mut self, session_id: QuizSessionId) -> Result<Transition, NavigationError> {
        self.expect_view("open a past result", |v| matches!(v, View::QuizHistory))?;
        self.selected_topic = None;
        Ok(self.enter(View::QuizResult {
            session_id,
            topic: None,
        }))
    }

    /// Return to the topic list and ask for fresh progress.
    pub fn back(&mut self) -> Transition {
        self.selected_topic = None;
        self.refresh_epoch = self.refresh_epoch.wrapping_add(1);
        self.enter(View::Topics);
        Transition {
            refresh_progress: true,
        }
    }
}
