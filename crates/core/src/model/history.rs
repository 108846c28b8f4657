use std::cmp::Ordering;

use crate::model::progress::{percent, round_percent};
use crate::model::quiz::{PerformanceTier, QuizSessionRecord};

/// Accuracy of a stored session, computed from its raw counts.
///
/// Inconsistent counts (more correct than total) are capped at the total.
#[must_use]
pub fn session_accuracy(record: &QuizSessionRecord) -> f64 {
    percent(
        record.correct_answers.min(record.total_questions),
        record.total_questions,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    All,
    Excellent,
    Good,
    NeedsPractice,
}

impl HistoryFilter {
    fn admits(self, accuracy: f64) -> bool {
        let tier = PerformanceTier::from_accuracy(accuracy);
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Excellent => tier == PerformanceTier::Excellent,
            HistoryFilter::Good => tier == PerformanceTier::Good,
            HistoryFilter::NeedsPractice => tier == PerformanceTier::NeedsPractice,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistorySort {
    /// Most recent first.
    #[default]
    Date,
    /// Highest score first.
    Score,
    /// Highest accuracy first.
    Accuracy,
    /// Topic name, A to Z.
    Topic,
}

/// Search, filter and sort options for the quiz history screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryQuery {
    pub search: String,
    pub filter: HistoryFilter,
    pub sort: HistorySort,
}

impl HistoryQuery {
    fn matches(&self, record: &QuizSessionRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() && !record.topic_name.to_lowercase().contains(&needle) {
            return false;
        }
        self.filter.admits(session_accuracy(record))
    }

    /// Returns the matching sessions in display order.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [QuizSessionRecord]) -> Vec<&'a QuizSessionRecord> {
        let mut out: Vec<_> = records.iter().filter(|r| self.matches(r)).collect();
        out.sort_by(|a, b| compare(self.sort, a, b));
        out
    }
}

fn compare(sort: HistorySort, a: &QuizSessionRecord, b: &QuizSessionRecord) -> Ordering {
    match sort {
        // Sessions without a completion time sort last.
        HistorySort::Date => b.completed_at.cmp(&a.completed_at),
        HistorySort::Score => b.correct_answers.cmp(&a.correct_answers),
        HistorySort::Accuracy => session_accuracy(b).total_cmp(&session_accuracy(a)),
        HistorySort::Topic => a
            .topic_name
            .to_lowercase()
            .cmp(&b.topic_name.to_lowercase()),
    }
}

/// Totals shown above the quiz history list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_quizzes: u32,
    pub average_score: u32,
    pub average_accuracy: u32,
    pub total_time_spent_secs: u64,
    pub best_score: u32,
}

impl HistoryStats {
    /// `None` when there is no history yet.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn from_records(records: &[QuizSessionRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let count = records.len() as f64;
        let score_sum: u64 = records.iter().map(|r| u64::from(r.correct_answers)).sum();
        let accuracy_sum: f64 = records.iter().map(session_accuracy).sum();

        Some(Self {
            total_quizzes: u32::try_from(records.len()).unwrap_or(u32::MAX),
            average_score: (score_sum as f64 / count).round() as u32,
            average_accuracy: round_percent(accuracy_sum / count),
            total_time_spent_secs: records.iter().map(|r| u64::from(r.time_spent_secs)).sum(),
            best_score: records.iter().map(|r| r.correct_answers).max().unwrap_or(0),
        })
    }
}
