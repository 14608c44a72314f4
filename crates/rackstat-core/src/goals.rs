//! Goal planning: how many more activities reach a target score in time.
//!
//! Suggestions only use the two repeatable scored activities: Code Tracks
//! (2 points, no daily cap) and Daily Tests (20 points, at most one per day).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::score::ScoreCategory;

pub const MAX_TARGET_POINTS: u64 = 1_000_000;
pub const MAX_TIMELINE_DAYS: u32 = 3650;

/// Code Tracks per day above which the tracks-only plan is "challenging".
const TRACKS_ONLY_DAILY_LIMIT: u64 = 10;
/// Extra Code Tracks per day above which the mixed plan is "challenging".
const MIXED_DAILY_TRACK_LIMIT: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalError {
    #[error("Target points must be greater than 0")]
    TargetNotPositive,

    #[error("Target points seems unreasonably high (max: 1,000,000)")]
    TargetTooHigh { max: u64 },

    #[error("Target must be higher than your current points ({current})")]
    TargetNotAboveCurrent { current: u64 },

    #[error("Timeline must be at least 1 day")]
    TimelineTooShort,

    #[error("Timeline seems unreasonably long (max: 10 years)")]
    TimelineTooLong { max: u32 },
}

/// Inputs for a goal plan, as submitted by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRequest {
    pub current_points: u64,
    pub target_points: u64,
    pub timeline_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementPath {
    pub strategy: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_requirement: Option<String>,
    pub feasible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCalculation {
    pub target_points: u64,
    pub current_points: u64,
    pub timeline_days: u32,
    pub required_points: u64,
    pub suggestions: Vec<AchievementPath>,
}

/// Validates the inputs, then builds the plan.
///
/// # Errors
///
/// Returns a [`GoalError`] describing the first invalid input.
pub fn plan_goal(request: GoalRequest) -> Result<GoalCalculation, GoalError> {
    validate_goal(request)?;
    Ok(calculate_goal(
        request.current_points,
        request.target_points,
        request.timeline_days,
    ))
}

/// Range checks for a goal request.
///
/// # Errors
///
/// Returns a [`GoalError`] describing the first invalid input.
pub fn validate_goal(request: GoalRequest) -> Result<(), GoalError> {
    let GoalRequest {
        current_points,
        target_points,
        timeline_days,
    } = request;

    if target_points == 0 {
        return Err(GoalError::TargetNotPositive);
    }
    if target_points > MAX_TARGET_POINTS {
        return Err(GoalError::TargetTooHigh {
            max: MAX_TARGET_POINTS,
        });
    }
    if target_points <= current_points {
        return Err(GoalError::TargetNotAboveCurrent {
            current: current_points,
        });
    }
    if timeline_days == 0 {
        return Err(GoalError::TimelineTooShort);
    }
    if timeline_days > MAX_TIMELINE_DAYS {
        return Err(GoalError::TimelineTooLong {
            max: MAX_TIMELINE_DAYS,
        });
    }
    Ok(())
}

/// Builds achievement suggestions without validating the inputs.
///
/// A zero `timeline_days` is treated as one day.
#[must_use]
pub fn calculate_goal(current_points: u64, target_points: u64, timeline_days: u32) -> GoalCalculation {
    let required_points = target_points.saturating_sub(current_points);
    let days = u64::from(timeline_days.max(1));

    let mut suggestions = Vec::new();

    if required_points == 0 {
        suggestions.push(AchievementPath {
            strategy: "Goal Already Achieved".to_owned(),
            description: "Congratulations! You have already reached your target points.".to_owned(),
            daily_requirement: None,
            feasible: true,
        });
    } else {
        let track_weight = ScoreCategory::CodeTrack.weight();
        let test_weight = ScoreCategory::DailyTest.weight();

        let tracks_needed = required_points.div_ceil(track_weight);
        let tracks_per_day = tracks_needed.div_ceil(days);
        suggestions.push(AchievementPath {
            strategy: "Code Tracks Only".to_owned(),
            description: format!("Solve {tracks_needed} Code Track problems"),
            daily_requirement: Some(format!("{tracks_per_day} Code Tracks per day")),
            feasible: tracks_per_day <= TRACKS_ONLY_DAILY_LIMIT,
        });

        let tests_needed = required_points.div_ceil(test_weight);
        suggestions.push(AchievementPath {
            strategy: "Daily Tests Only".to_owned(),
            description: format!("Complete {tests_needed} Daily Tests"),
            daily_requirement: Some("1 Daily Test per day".to_owned()),
            feasible: tests_needed <= days,
        });

        let test_days = days.min(tests_needed);
        let remaining = required_points.saturating_sub(test_days * test_weight);
        let extra_tracks = remaining.div_ceil(track_weight);
        if test_days > 0 && extra_tracks > 0 {
            let extra_per_day = extra_tracks.div_ceil(days);
            suggestions.push(AchievementPath {
                strategy: "Mixed Strategy".to_owned(),
                description: format!("{test_days} Daily Tests + {extra_tracks} Code Tracks"),
                daily_requirement: Some(format!(
                    "1 Daily Test + {extra_per_day} Code Tracks per day"
                )),
                feasible: extra_per_day <= MIXED_DAILY_TRACK_LIMIT,
            });
        }
    }

    GoalCalculation {
        target_points,
        current_points,
        timeline_days,
        required_points,
        suggestions,
    }
}
