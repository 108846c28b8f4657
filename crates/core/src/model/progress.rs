use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{TopicId, UserId, VocabularyId};

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Per-item learning status as tracked by the backend.
///
/// `Review` and `NotStarted` records still count as "studied": a record
/// exists for the item, it just is neither mastered nor in active learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Learning,
    Mastered,
    Review,
    NotStarted,
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Snapshot of one learner's progress on one vocabulary item.
///
/// Owned by the backend; the client only ever reads these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub user_id: Option<UserId>,
    pub vocabulary_id: VocabularyId,
    pub topic_id: TopicId,
    pub status: ProgressStatus,
    pub correct_count: u32,
    pub total_attempts: u32,
    pub last_studied: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// Share of attempts answered correctly, in percent. 0 with no attempts.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        percent(self.correct_count, self.total_attempts)
    }
}

//
// ─── TOPIC SUMMARY ─────────────────────────────────────────────────────────────
//

/// Derived progress counts for a single topic. Never persisted.
///
/// Invariant: `mastered + learning + not_started <= total` and
/// `percentage` lies in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicProgressSummary {
    total: u32,
    mastered: u32,
    learning: u32,
    not_started: u32,
    percentage: f64,
    stale_records: u32,
}

impl TopicProgressSummary {
    /// Reduce a topic's progress records against its vocabulary count.
    ///
    /// Records beyond `total_count` (stale backend data) are clamped away:
    /// `not_started` floors at zero and the mastered/learning counts are
    /// capped so they never exceed the total. The excess is reported by
    /// [`Self::stale_records`].
    #[must_use]
    pub fn from_records(total_count: u32, records: &[ProgressRecord]) -> Self {
        let mut mastered = 0_u32;
        let mut learning = 0_u32;
        for record in records {
            match record.status {
                ProgressStatus::Mastered => mastered = mastered.saturating_add(1),
                ProgressStatus::Learning => learning = learning.saturating_add(1),
                ProgressStatus::Review | ProgressStatus::NotStarted => {}
            }
        }

        let studied = u32::try_from(records.len()).unwrap_or(u32::MAX);
        let not_started = total_count.saturating_sub(studied);
        let stale_records = studied.saturating_sub(total_count);

        let mastered = mastered.min(total_count);
        let learning = learning.min(total_count - mastered);

        Self {
            total: total_count,
            mastered,
            learning,
            not_started,
            percentage: percent(mastered, total_count),
            stale_records,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn mastered(&self) -> u32 {
        self.mastered
    }

    #[must_use]
    pub fn learning(&self) -> u32 {
        self.learning
    }

    #[must_use]
    pub fn not_started(&self) -> u32 {
        self.not_started
    }

    /// Unrounded completion percentage.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Completion percentage rounded for display.
    #[must_use]
    pub fn percentage_rounded(&self) -> u32 {
        round_percent(self.percentage)
    }

    /// Number of records that exceeded the topic's vocabulary count.
    #[must_use]
    pub fn stale_records(&self) -> u32 {
        self.stale_records
    }

    #[must_use]
    pub fn tier(&self) -> ProgressTier {
        ProgressTier::from_percentage(self.percentage)
    }
}

//
// ─── OVERALL ───────────────────────────────────────────────────────────────────
//

/// Progress summed across every topic.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverallProgress {
    pub total_words: u32,
    pub mastered: u32,
    pub learning: u32,
    pub not_started: u32,
}

impl OverallProgress {
    #[must_use]
    pub fn from_summaries<'a>(summaries: impl IntoIterator<Item = &'a TopicProgressSummary>) -> Self {
        summaries
            .into_iter()
            .fold(Self::default(), |acc, summary| Self {
                total_words: acc.total_words.saturating_add(summary.total()),
                mastered: acc.mastered.saturating_add(summary.mastered()),
                learning: acc.learning.saturating_add(summary.learning()),
                not_started: acc.not_started.saturating_add(summary.not_started()),
            })
    }

    /// Unrounded share of all words that are mastered. 0 with no words.
    #[must_use]
    pub fn overall_progress(&self) -> f64 {
        percent(self.mastered, self.total_words)
    }

    #[must_use]
    pub fn overall_progress_rounded(&self) -> u32 {
        round_percent(self.overall_progress())
    }
}

//
// ─── TIER ──────────────────────────────────────────────────────────────────────
//

/// Display label for a topic's completion percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTier {
    NotStarted,
    Beginner,
    Learning,
    Advanced,
    Mastered,
}

impl ProgressTier {
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage <= 0.0 {
            Self::NotStarted
        } else if percentage < 30.0 {
            Self::Beginner
        } else if percentage < 70.0 {
            Self::Learning
        } else if percentage < 100.0 {
            Self::Advanced
        } else {
            Self::Mastered
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProgressTier::NotStarted => "Start Learning",
            ProgressTier::Beginner => "Beginner",
            ProgressTier::Learning => "Learning",
            ProgressTier::Advanced => "Advanced",
            ProgressTier::Mastered => "Mastered",
        }
    }
}

//
// ─── HELPERS ───────────────────────────────────────────────────────────────────
//

/// `part / whole * 100`, or 0 when `whole` is 0.
#[must_use]
pub fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    f64::from(part) / f64::from(whole) * 100.0
}

/// Round a percentage to the nearest whole number, clamped to `[0, 100]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_percent(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(id: u32, status: ProgressStatus) -> ProgressRecord {
        ProgressRecord {
            user_id: None,
            vocabulary_id: VocabularyId::new(id.to_string()),
            topic_id: TopicId::new("1"),
            status,
            correct_count: 0,
            total_attempts: 0,
            last_studied: None,
        }
    }

    fn records(mastered: u32, learning: u32, review: u32) -> Vec<ProgressRecord> {
        let mut out = Vec::new();
        let mut id = 0;
        for (count, status) in [
            (mastered, ProgressStatus::Mastered),
            (learning, ProgressStatus::Learning),
            (review, ProgressStatus::Review),
        ] {
            for _ in 0..count {
                id += 1;
                out.push(record(id, status));
            }
        }
        out
    }

    #[test]
    fn twenty_words_five_records() {
        let summary = TopicProgressSummary::from_records(20, &records(3, 2, 0));
        assert_eq!(summary.mastered(), 3);
        assert_eq!(summary.learning(), 2);
        assert_eq!(summary.not_started(), 15);
        assert_eq!(summary.percentage_rounded(), 15);
        assert!((summary.percentage() - 15.0).abs() < f64::EPSILON);
        assert_eq!(summary.stale_records(), 0);
    }

    #[test]
    fn review_records_count_as_studied() {
        let summary = TopicProgressSummary::from_records(10, &records(1, 1, 3));
        assert_eq!(summary.not_started(), 5);
        assert_eq!(summary.mastered() + summary.learning(), 2);
    }

    #[test]
    fn empty_topic_is_zero_percent() {
        let summary = TopicProgressSummary::from_records(0, &[]);
        assert_eq!(summary.percentage(), 0.0);
        assert_eq!(summary.tier(), ProgressTier::NotStarted);
    }

    #[test]
    fn stale_records_are_clamped() {
        let summary = TopicProgressSummary::from_records(2, &records(3, 1, 0));
        assert_eq!(summary.not_started(), 0);
        assert_eq!(summary.mastered(), 2);
        assert_eq!(summary.learning(), 0);
        assert_eq!(summary.stale_records(), 2);
        assert_eq!(summary.percentage_rounded(), 100);
    }

    #[test]
    fn unrounded_percentage_is_kept() {
        let summary = TopicProgressSummary::from_records(3, &records(1, 0, 0));
        assert!((summary.percentage() - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.percentage_rounded(), 33);
    }

    #[test]
    fn overall_progress_with_no_topics_is_zero() {
        let overall = OverallProgress::from_summaries(&[]);
        assert_eq!(overall, OverallProgress::default());
        assert_eq!(overall.overall_progress(), 0.0);
        assert_eq!(overall.overall_progress_rounded(), 0);
    }

    #[test]
    fn overall_progress_sums_topics() {
        let a = TopicProgressSummary::from_records(20, &records(3, 2, 0));
        let b = TopicProgressSummary::from_records(10, &records(6, 1, 1));
        let overall = OverallProgress::from_summaries([&a, &b]);
        assert_eq!(overall.total_words, 30);
        assert_eq!(overall.mastered, 9);
        assert_eq!(overall.learning, 3);
        assert_eq!(overall.not_started, 17);
        assert_eq!(overall.overall_progress_rounded(), 30);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(ProgressTier::from_percentage(0.0), ProgressTier::NotStarted);
        assert_eq!(ProgressTier::from_percentage(29.9), ProgressTier::Beginner);
        assert_eq!(ProgressTier::from_percentage(30.0), ProgressTier::Learning);
        assert_eq!(ProgressTier::from_percentage(70.0), ProgressTier::Advanced);
        assert_eq!(ProgressTier::from_percentage(100.0), ProgressTier::Mastered);
    }

    #[test]
    fn record_accuracy() {
        let mut r = record(1, ProgressStatus::Learning);
        assert_eq!(r.accuracy(), 0.0);
        r.correct_count = 4;
        r.total_attempts = 5;
        assert!((r.accuracy() - 80.0).abs() < f64::EPSILON);
    }

    fn status_strategy() -> impl Strategy<Value = ProgressStatus> {
        prop_oneof![
            Just(ProgressStatus::Learning),
            Just(ProgressStatus::Mastered),
            Just(ProgressStatus::Review),
            Just(ProgressStatus::NotStarted),
        ]
    }

    proptest! {
        #[test]
        fn summary_stays_within_bounds(
            total in 0_u32..200,
            statuses in proptest::collection::vec(status_strategy(), 0..300),
        ) {
            let recs: Vec<_> = statuses
                .iter()
                .enumerate()
                .map(|(i, s)| record(u32::try_from(i).unwrap(), *s))
                .collect();
            let summary = TopicProgressSummary::from_records(total, &recs);

            prop_assert!(summary.mastered() + summary.learning() + summary.not_started() <= total);
            prop_assert!((0.0..=100.0).contains(&summary.percentage()));
            prop_assert_eq!(summary, TopicProgressSummary::from_records(total, &recs));
        }
    }
}
