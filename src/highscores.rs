//! High score leaderboard
//!
//! Tracks the top 10 finished matches. Fed by game-over events; persistence
//! is left to the host via the JSON helpers.

use serde::{Deserialize, Serialize};

use crate::sim::{GameListener, MatchSummary};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score
    pub score: u64,
    /// Level reached
    pub level: u32,
    pub kills: u32,
    pub max_combo: u32,
    /// Match length on the match clock
    pub duration_ms: u64,
}

impl From<&MatchSummary> for HighScoreEntry {
    fn from(summary: &MatchSummary) -> Self {
        Self {
            score: summary.final_score,
            level: summary.level,
            kills: summary.kills,
            max_combo: summary.max_combo,
            duration_ms: summary.duration_ms,
        }
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    /// Rank of the most recent qualifying match (1-indexed)
    #[serde(skip)]
    pub last_rank: Option<usize>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot a score would take; ties go below earlier entries
    fn slot_for(&self, score: u64) -> Option<usize> {
        let slot = self.entries.partition_point(|e| e.score >= score);
        (score > 0 && slot < MAX_HIGH_SCORES).then_some(slot)
    }

    pub fn qualifies(&self, score: u64) -> bool {
        self.slot_for(score).is_some()
    }

    /// 1-indexed rank a score would reach, if any
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        self.slot_for(score).map(|slot| slot + 1)
    }

    /// Record a finished match, returning its 1-indexed rank
    pub fn add_score(&mut self, summary: &MatchSummary) -> Option<usize> {
        let slot = self.slot_for(summary.final_score)?;
        self.entries.insert(slot, HighScoreEntry::from(summary));
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(slot + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore a saved leaderboard; broken data starts fresh
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<HighScores>(json) {
            Ok(mut scores) => {
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(err) => {
                log::warn!("Discarding unreadable high scores: {}", err);
                Self::new()
            }
        }
    }
}

impl GameListener for HighScores {
    fn on_game_over(&mut self, summary: &MatchSummary) {
        self.last_rank = self.add_score(summary);
        if let Some(rank) = self.last_rank {
            log::info!("New high score #{}: {}", rank, summary.final_score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(score: u64) -> MatchSummary {
        MatchSummary {
            final_score: score,
            level: 2,
            kills: 5,
            max_combo: 3,
            duration_ms: 30_000,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(&summary(0)), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_sorted_insert() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(&summary(100)), Some(1));
        assert_eq!(scores.add_score(&summary(300)), Some(1));
        assert_eq!(scores.add_score(&summary(200)), Some(2));
        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![300, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
    }

    #[test]
    fn test_capped_at_ten() {
        let mut scores = HighScores::new();
        for i in 1..=12 {
            scores.add_score(&summary(i * 10));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(30));
        assert!(!scores.qualifies(30));
        assert_eq!(scores.potential_rank(35), Some(10));
    }

    #[test]
    fn test_ties_rank_below_existing() {
        let mut scores = HighScores::new();
        scores.add_score(&summary(200));
        scores.add_score(&summary(100));
        assert_eq!(scores.potential_rank(200), Some(2));
        assert_eq!(scores.add_score(&summary(200)), Some(2));
        assert_eq!(scores.entries.len(), 3);
    }

    #[test]
    fn test_listener_records_game_over() {
        let mut scores = HighScores::new();
        scores.on_game_over(&summary(450));
        assert_eq!(scores.last_rank, Some(1));
        assert_eq!(scores.entries[0].kills, 5);
    }

    #[test]
    fn test_json_round_trip_and_garbage() {
        let mut scores = HighScores::new();
        scores.add_score(&summary(10));
        let json = scores.to_json().unwrap();
        let back = HighScores::from_json(&json);
        assert_eq!(back.entries, scores.entries);

        assert!(HighScores::from_json("{not json").is_empty());
    }
}
