//! Point weights for SkillRack activity categories.
//!
//! | Category        | Points per unit |
//! |-----------------|-----------------|
//! | Code Track      | 2               |
//! | Daily Test      | 20              |
//! | Daily Challenge | 2               |
//! | Code Test       | 30              |
//! | Code Tutor      | 0 (display only)|

use serde::Serialize;

use crate::profile::Counters;

/// A counter that participates in the score table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCategory {
    CodeTrack,
    DailyTest,
    DailyChallenge,
    CodeTest,
    CodeTutor,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 5] = [
        ScoreCategory::CodeTrack,
        ScoreCategory::DailyTest,
        ScoreCategory::DailyChallenge,
        ScoreCategory::CodeTest,
        ScoreCategory::CodeTutor,
    ];

    #[must_use]
    pub const fn weight(self) -> u64 {
        match self {
            Self::CodeTrack | Self::DailyChallenge => 2,
            Self::DailyTest => 20,
            Self::CodeTest => 30,
            Self::CodeTutor => 0,
        }
    }

    #[must_use]
    pub fn count(self, counts: &Counters) -> u64 {
        match self {
            Self::CodeTrack => counts.code_track,
            Self::DailyTest => counts.daily_test,
            Self::DailyChallenge => counts.daily_challenge,
            Self::CodeTest => counts.code_test,
            Self::CodeTutor => counts.code_tutor,
        }
    }

    #[must_use]
    pub fn points(self, counts: &Counters) -> u64 {
        self.count(counts).saturating_mul(self.weight())
    }
}

/// Total score for a set of counters.
#[must_use]
pub fn score(counts: &Counters) -> u64 {
    ScoreCategory::ALL
        .into_iter()
        .fold(0u64, |total, category| {
            total.saturating_add(category.points(counts))
        })
}

/// Per-category points alongside the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub code_track: u64,
    pub daily_test: u64,
    pub daily_challenge: u64,
    pub code_test: u64,
    pub code_tutor: u64,
    pub total: u64,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn from_counts(counts: &Counters) -> Self {
        Self {
            code_track: ScoreCategory::CodeTrack.points(counts),
            daily_test: ScoreCategory::DailyTest.points(counts),
            daily_challenge: ScoreCategory::DailyChallenge.points(counts),
            code_test: ScoreCategory::CodeTest.points(counts),
            code_tutor: ScoreCategory::CodeTutor.points(counts),
            total: score(counts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_counts() -> Counters {
        Counters {
            code_track: 470,
            daily_test: 30,
            daily_challenge: 25,
            code_test: 15,
            code_tutor: 100,
            ..Counters::default()
        }
    }

    #[test]
    fn score_applies_fixed_weights() {
        assert_eq!(score(&sample_counts()), 2040);
    }

    #[test]
    fn score_of_empty_counters_is_zero() {
        assert_eq!(score(&Counters::default()), 0);
    }

    #[test]
    fn code_tutor_contributes_nothing() {
        let counts = Counters {
            code_tutor: 9_999,
            ..Counters::default()
        };
        assert_eq!(score(&counts), 0);
    }

    #[test]
    fn unscored_counters_are_ignored() {
        let counts = Counters {
            rank: 12,
            level: 5,
            gold: 3,
            programs_solved: 800,
            ..Counters::default()
        };
        assert_eq!(score(&counts), 0);
    }

    #[test]
    fn breakdown_sums_to_total() {
        let breakdown = ScoreBreakdown::from_counts(&sample_counts());
        assert_eq!(breakdown.code_track, 940);
        assert_eq!(breakdown.daily_test, 600);
        assert_eq!(breakdown.daily_challenge, 50);
        assert_eq!(breakdown.code_test, 450);
        assert_eq!(breakdown.code_tutor, 0);
        assert_eq!(
            breakdown.code_track
                + breakdown.daily_test
                + breakdown.daily_challenge
                + breakdown.code_test
                + breakdown.code_tutor,
            breakdown.total
        );
    }

    #[test]
    fn score_saturates_instead_of_overflowing() {
        let counts = Counters {
            code_test: u64::MAX,
            daily_test: u64::MAX,
            ..Counters::default()
        };
        assert_eq!(score(&counts), u64::MAX);
    }
}
