//! Scoring and the high-score table.

use gridshot_common::ScoreError;
use serde::{Deserialize, Serialize};

/// Points per killed NPC.
pub const KILL_POINTS: u32 = 100;

/// Seconds after which the time bonus reaches zero.
pub const PAR_TIME_SECS: f32 = 300.0;

/// Points per second left under par time.
pub const TIME_BONUS_PER_SEC: f32 = 10.0;

/// Points per remaining health point.
pub const HEALTH_POINTS: i32 = 2;

/// Number of entries the high-score table keeps.
pub const HIGH_SCORE_SLOTS: usize = 3;

/// Computes a score: `kills * 100 + max(0, 300 - elapsed) * 10 + health * 2`,
/// truncated toward zero.
#[must_use]
pub fn compute_score(kills: u32, elapsed_secs: f32, health: i32) -> i64 {
    let kill_points = f64::from(kills) * f64::from(KILL_POINTS);
    let time_bonus = f64::from((PAR_TIME_SECS - elapsed_secs).max(0.0)) * f64::from(TIME_BONUS_PER_SEC);
    let health_points = f64::from(health) * f64::from(HEALTH_POINTS);
    (kill_points + time_bonus + health_points) as i64
}

/// The best scores seen so far, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreTable {
    scores: Vec<i64>,
}

impl HighScoreTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from arbitrary scores, keeping the best ones.
    #[must_use]
    pub fn from_scores<I: IntoIterator<Item = i64>>(scores: I) -> Self {
        let mut table = Self {
            scores: scores.into_iter().collect(),
        };
        table.normalize();
        table
    }

    /// Whether `score` would enter the table.
    ///
    /// True while the table has free slots, otherwise only when `score`
    /// beats the lowest kept entry.
    #[must_use]
    pub fn is_new_high_score(&self, score: i64) -> bool {
        if self.scores.len() < HIGH_SCORE_SLOTS {
            return true;
        }
        self.scores.iter().min().map_or(true, |&min| score > min)
    }

    /// Inserts a score and drops whatever falls off the bottom.
    ///
    /// Returns the 0-based rank the score took, or `None` if it did not
    /// place.
    pub fn record(&mut self, score: i64) -> Option<usize> {
        let qualifies = self.is_new_high_score(score);
        self.scores.push(score);
        self.normalize();
        if !qualifies {
            return None;
        }
        self.scores.iter().position(|&s| s == score)
    }

    /// Kept scores, highest first.
    #[must_use]
    pub fn scores(&self) -> &[i64] {
        &self.scores
    }

    /// Best score, if any.
    #[must_use]
    pub fn best(&self) -> Option<i64> {
        self.scores.first().copied()
    }

    /// Number of kept scores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether no score has been kept yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    fn normalize(&mut self) {
        self.scores.sort_unstable_by(|a, b| b.cmp(a));
        self.scores.truncate(HIGH_SCORE_SLOTS);
    }
}

/// Persistence back-end for the high-score table.
pub trait HighScoreStore {
    /// Loads the stored table.
    ///
    /// Implementations should treat a missing file as an empty table.
    fn load(&self) -> Result<HighScoreTable, ScoreError>;

    /// Replaces the stored table.
    fn save(&self, table: &HighScoreTable) -> Result<(), ScoreError>;

    /// Loads the table, or an empty one if loading fails for any reason.
    fn load_or_default(&self) -> HighScoreTable {
        match self.load() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("Failed to load high scores, starting empty: {e}");
                HighScoreTable::new()
            },
        }
    }
}

/// In-memory store, mostly for tests and tools.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    table: std::cell::RefCell<HighScoreTable>,
}

impl MemoryScoreStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<HighScoreTable, ScoreError> {
        Ok(self.table.borrow().clone())
    }

    fn save(&self, table: &HighScoreTable) -> Result<(), ScoreError> {
        *self.table.borrow_mut() = table.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_score_formula() {
        assert_eq!(compute_score(3, 120.0, 80), 2260);
        assert_eq!(compute_score(0, 0.0, 100), 3200);
    }

    #[test]
    fn test_time_bonus_floors_at_zero() {
        assert_eq!(compute_score(5, 1000.0, 0), 500);
    }

    #[test]
    fn test_score_truncates() {
        // 10 * (300 - 299.95) = 0.5 -> truncated
        assert_eq!(compute_score(0, 299.95, 0), 0);
    }

    #[test]
    fn test_table_keeps_top_three() {
        let mut table = HighScoreTable::new();
        assert!(table.is_new_high_score(0));
        assert_eq!(table.record(500), Some(0));
        assert_eq!(table.record(900), Some(0));
        assert_eq!(table.record(100), Some(2));
        assert_eq!(table.scores(), &[900, 500, 100]);

        assert!(!table.is_new_high_score(100));
        assert_eq!(table.record(50), None);
        assert_eq!(table.scores(), &[900, 500, 100]);

        assert!(table.is_new_high_score(101));
        assert_eq!(table.record(700), Some(1));
        assert_eq!(table.scores(), &[900, 700, 500]);
        assert_eq!(table.best(), Some(900));
    }

    #[test]
    fn test_from_scores_sorts_and_truncates() {
        let table = HighScoreTable::from_scores([3, 9, 1, 7]);
        assert_eq!(table.scores(), &[9, 7, 3]);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryScoreStore::new();
        assert!(store.load_or_default().is_empty());
        let table = HighScoreTable::from_scores([10, 20]);
        store.save(&table).expect("save");
        assert_eq!(store.load().expect("load"), table);
    }

    proptest! {
        #[test]
        fn prop_table_is_sorted_and_bounded(scores in proptest::collection::vec(-1000i64..100_000, 0..20)) {
            let mut table = HighScoreTable::new();
            for s in &scores {
                table.record(*s);
            }
            prop_assert!(table.len() <= HIGH_SCORE_SLOTS);
            prop_assert!(table.scores().windows(2).all(|w| w[0] >= w[1]));

            let mut expected = scores.clone();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            expected.truncate(HIGH_SCORE_SLOTS);
            prop_assert_eq!(table.scores(), expected.as_slice());
        }

        #[test]
        fn prop_score_is_monotonic_in_kills(kills in 0u32..100, elapsed in 0.0f32..600.0, health in 0i32..=100) {
            prop_assert!(compute_score(kills + 1, elapsed, health) >= compute_score(kills, elapsed, health) + 100);
        }
    }
}
