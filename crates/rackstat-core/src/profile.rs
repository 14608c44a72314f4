//! Profile data extracted from a SkillRack resume page.
//!
//! Free-text fields use the empty string as the "not found" sentinel and
//! counters default to zero, so every [`ProfileRecord`] is fully populated
//! even when the upstream markup is unrecognizable.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::score::score;

/// The fixed vocabulary of labelled statistic blocks on a profile page.
///
/// Adding or removing a tracked statistic means editing this enum, its
/// [`StatLabel::label`] string, and the matching [`Counters`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatLabel {
    Rank,
    Level,
    Gold,
    Silver,
    Bronze,
    ProgramsSolved,
    CodeTest,
    CodeTrack,
    DailyChallenge,
    DailyTest,
    CodeTutor,
}

impl StatLabel {
    pub const ALL: [StatLabel; 11] = [
        StatLabel::Rank,
        StatLabel::Level,
        StatLabel::Gold,
        StatLabel::Silver,
        StatLabel::Bronze,
        StatLabel::ProgramsSolved,
        StatLabel::CodeTest,
        StatLabel::CodeTrack,
        StatLabel::DailyChallenge,
        StatLabel::DailyTest,
        StatLabel::CodeTutor,
    ];

    /// Exact, case-sensitive label text as rendered on the profile page.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rank => "RANK",
            Self::Level => "LEVEL",
            Self::Gold => "GOLD",
            Self::Silver => "SILVER",
            Self::Bronze => "BRONZE",
            Self::ProgramsSolved => "PROGRAMS SOLVED",
            Self::CodeTest => "CODE TEST",
            Self::CodeTrack => "CODE TRACK",
            Self::DailyChallenge => "DC",
            Self::DailyTest => "DT",
            Self::CodeTutor => "CODE TUTOR",
        }
    }

    /// Looks up a label by its exact page text.
    #[must_use]
    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.label() == text)
    }
}

/// The eleven integer counters read from statistic blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub rank: u64,
    pub level: u64,
    pub gold: u64,
    pub silver: u64,
    pub bronze: u64,
    pub programs_solved: u64,
    pub code_test: u64,
    pub code_track: u64,
    pub daily_challenge: u64,
    pub daily_test: u64,
    pub code_tutor: u64,
}

impl Counters {
    #[must_use]
    pub fn get(&self, label: StatLabel) -> u64 {
        match label {
            StatLabel::Rank => self.rank,
            StatLabel::Level => self.level,
            StatLabel::Gold => self.gold,
            StatLabel::Silver => self.silver,
            StatLabel::Bronze => self.bronze,
            StatLabel::ProgramsSolved => self.programs_solved,
            StatLabel::CodeTest => self.code_test,
            StatLabel::CodeTrack => self.code_track,
            StatLabel::DailyChallenge => self.daily_challenge,
            StatLabel::DailyTest => self.daily_test,
            StatLabel::CodeTutor => self.code_tutor,
        }
    }

    pub fn set(&mut self, label: StatLabel, value: u64) {
        let slot = match label {
            StatLabel::Rank => &mut self.rank,
            StatLabel::Level => &mut self.level,
            StatLabel::Gold => &mut self.gold,
            StatLabel::Silver => &mut self.silver,
            StatLabel::Bronze => &mut self.bronze,
            StatLabel::ProgramsSolved => &mut self.programs_solved,
            StatLabel::CodeTest => &mut self.code_test,
            StatLabel::CodeTrack => &mut self.code_track,
            StatLabel::DailyChallenge => &mut self.daily_challenge,
            StatLabel::DailyTest => &mut self.daily_test,
            StatLabel::CodeTutor => &mut self.code_tutor,
        };
        *slot = value;
    }

    /// Returns `true` when every counter is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        StatLabel::ALL.into_iter().all(|l| self.get(l) == 0)
    }
}

/// Language name → solved-problem count, in page order.
///
/// Serialized as a JSON object whose keys keep insertion order. Re-inserting
/// an existing language overwrites its count in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageUsage(Vec<(String, u64)>);

impl LanguageUsage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, language: impl Into<String>, count: u64) {
        let language = language.into();
        if let Some(entry) = self.0.iter_mut().find(|(name, _)| *name == language) {
            entry.1 = count;
        } else {
            self.0.push((language, count));
        }
    }

    #[must_use]
    pub fn get(&self, language: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(name, _)| name == language)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for LanguageUsage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

/// A certificate card listed on the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Certificate {
    pub title: String,
    /// `DD-MM-YYYY HH:MM`, or empty when the card carries no date.
    #[serde(rename = "date")]
    pub issued_at: String,
    #[serde(rename = "link")]
    pub verification_link: String,
}

/// Result of a successful scrape.
///
/// Wire names follow the JSON contract the web client consumes (`id`,
/// `college`, `year`, `stats`, `languages`); `stats` carries the counters
/// plus the derived `totalPoints`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(rename = "profileImage", skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    pub name: String,
    #[serde(rename = "id")]
    pub identifier: String,
    pub department: String,
    #[serde(rename = "college")]
    pub institution: String,
    #[serde(rename = "year")]
    pub cohort_year: String,
    pub gender: String,
    #[serde(rename = "stats", serialize_with = "serialize_stats")]
    pub counts: Counters,
    #[serde(rename = "languages")]
    pub language_usage: LanguageUsage,
    pub certificates: Vec<Certificate>,
    /// `false` when none of the known profile markup was found, which
    /// separates "extractor no longer matches the page" from "new account
    /// with no activity".
    pub markup_recognized: bool,
}

impl ProfileRecord {
    /// Weighted total of the scored counters.
    #[must_use]
    pub fn total_points(&self) -> u64 {
        score(&self.counts)
    }
}

fn serialize_stats<S: Serializer>(counts: &Counters, serializer: S) -> Result<S::Ok, S::Error> {
    let mut stats = serializer.serialize_struct("ProfileStats", StatLabel::ALL.len() + 1)?;
    stats.serialize_field("rank", &counts.rank)?;
    stats.serialize_field("level", &counts.level)?;
    stats.serialize_field("gold", &counts.gold)?;
    stats.serialize_field("silver", &counts.silver)?;
    stats.serialize_field("bronze", &counts.bronze)?;
    stats.serialize_field("programsSolved", &counts.programs_solved)?;
    stats.serialize_field("codeTest", &counts.code_test)?;
    stats.serialize_field("codeTrack", &counts.code_track)?;
    stats.serialize_field("dailyChallenge", &counts.daily_challenge)?;
    stats.serialize_field("dailyTest", &counts.daily_test)?;
    stats.serialize_field("codeTutor", &counts.code_tutor)?;
    stats.serialize_field("totalPoints", &score(counts))?;
    stats.end()
}
