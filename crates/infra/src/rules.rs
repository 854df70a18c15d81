//! Registration rules shared by every write path: age brackets, event
//! eligibility, fees and per-club capacity limits.
//!
//! Everything here is a pure function of its inputs so the same rules can be
//! checked before touching the database and re-used by the store when it has
//! to decide whether a team demonstration fee applies.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_AGE: i32 = 4;
pub const MAX_AGE: i32 = 15;

/// Flat fee for an individual registration.
pub const STANDARD_FEE: i32 = 110;
/// Individual registration fee when a club membership ID is supplied.
pub const MEMBER_FEE: i32 = 100;
/// Charged once per club, on the first team demonstration member.
pub const TEAM_DEMO_FEE: i32 = 120;

pub const TEAM_DEMO_MIN_SIZE: usize = 3;
pub const TEAM_DEMO_MAX_SIZE: usize = 5;

pub const MAX_TEAM_MANAGERS: usize = 1;
pub const DEFAULT_MAX_COACHES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Age above 15 is not allowed for this event.")]
    AgeAboveLimit,
    #[error("Age must be between 4 and 15 years old.")]
    AgeOutOfRange,
    #[error("Only 1 Team Manager allowed per team.")]
    TeamManagerLimit,
    #[error("Maximum {0} Coaches allowed per team.")]
    CoachLimit(usize),
    #[error("Maximum 5 team members allowed")]
    TeamFull,
    #[error("unknown coach tag type: {0}")]
    UnknownTagType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeCategory {
    #[serde(rename = "4-6")]
    FourToSix,
    #[serde(rename = "7-9")]
    SevenToNine,
    #[serde(rename = "10-12")]
    TenToTwelve,
    #[serde(rename = "13-15")]
    ThirteenToFifteen,
}

impl AgeCategory {
    pub const ALL: [AgeCategory; 4] = [
        AgeCategory::FourToSix,
        AgeCategory::SevenToNine,
        AgeCategory::TenToTwelve,
        AgeCategory::ThirteenToFifteen,
    ];

    pub fn for_age(age: i32) -> Option<Self> {
        match age {
            4..=6 => Some(Self::FourToSix),
            7..=9 => Some(Self::SevenToNine),
            10..=12 => Some(Self::TenToTwelve),
            13..=15 => Some(Self::ThirteenToFifteen),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FourToSix => "4-6",
            Self::SevenToNine => "7-9",
            Self::TenToTwelve => "10-12",
            Self::ThirteenToFifteen => "13-15",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Pattern,
    Sparring,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Pattern => "pattern",
            Event::Sparring => "sparring",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoachTag {
    Coach,
    #[serde(rename = "Team Manager")]
    TeamManager,
}

impl CoachTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoachTag::Coach => "Coach",
            CoachTag::TeamManager => "Team Manager",
        }
    }

    pub fn parse(value: &str) -> Result<Self, RuleError> {
        match value.trim() {
            "Coach" => Ok(CoachTag::Coach),
            "Team Manager" => Ok(CoachTag::TeamManager),
            other => Err(RuleError::UnknownTagType(other.to_string())),
        }
    }
}

/// Whole years between `dob` and `today`, one less if this year's birthday
/// has not been reached yet.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Events a competitor of `age` is entered into. Not user selectable.
pub fn eligible_events(age: i32) -> Vec<Event> {
    match age {
        4..=6 => vec![Event::Sparring],
        7..=15 => vec![Event::Pattern, Event::Sparring],
        _ => Vec::new(),
    }
}

/// Comma-joined events in fixed order, e.g. `"pattern, sparring"`.
pub fn events_label(events: &[Event]) -> String {
    let mut sorted = events.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted
        .iter()
        .map(Event::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flat per-registration fee. Entering both events does not double it.
pub fn registration_fee(events: &[Event], membership_id: Option<&str>) -> i32 {
    if events.is_empty() {
        return 0;
    }
    match membership_id.map(str::trim) {
        Some(id) if !id.is_empty() => MEMBER_FEE,
        _ => STANDARD_FEE,
    }
}

/// Derived fields of a competitor registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub age: i32,
    pub category: AgeCategory,
    pub events: Vec<Event>,
    pub fee: i32,
}

impl Assessment {
    pub fn events_label(&self) -> String {
        events_label(&self.events)
    }
}

pub fn assess(
    dob: NaiveDate,
    today: NaiveDate,
    membership_id: Option<&str>,
) -> Result<Assessment, RuleError> {
    let age = age_on(dob, today);
    if age > MAX_AGE {
        return Err(RuleError::AgeAboveLimit);
    }
    let category = AgeCategory::for_age(age).ok_or(RuleError::AgeOutOfRange)?;
    let events = eligible_events(age);
    let fee = registration_fee(&events, membership_id);

    Ok(Assessment {
        age,
        category,
        events,
        fee,
    })
}

/// Current coach roster counts for a club.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoachCounts {
    pub team_managers: usize,
    pub coaches: usize,
}

impl CoachCounts {
    pub fn tally<'a>(tags: impl IntoIterator<Item = &'a str>) -> Self {
        tags.into_iter()
            .fold(Self::default(), |mut counts, tag| {
                match CoachTag::parse(tag) {
                    Ok(CoachTag::TeamManager) => counts.team_managers += 1,
                    Ok(CoachTag::Coach) => counts.coaches += 1,
                    Err(_) => {}
                }
                counts
            })
    }

    /// Submit-time check for a new roster entry.
    pub fn check_add(&self, tag: CoachTag, max_coaches: usize) -> Result<(), RuleError> {
        match tag {
            CoachTag::TeamManager if self.team_managers >= MAX_TEAM_MANAGERS => {
                Err(RuleError::TeamManagerLimit)
            }
            CoachTag::Coach if self.coaches >= max_coaches => {
                Err(RuleError::CoachLimit(max_coaches))
            }
            _ => Ok(()),
        }
    }

    /// Whether the roster form should still offer an "Add" action.
    ///
    /// Disabled once the manager slot and the coach cap are both used, or
    /// when coaches already exceed the cap by one.
    pub fn can_add(&self, max_coaches: usize) -> bool {
        let full = self.team_managers >= MAX_TEAM_MANAGERS && self.coaches >= max_coaches;
        !(full || self.coaches > max_coaches)
    }
}

pub fn check_team_add(current_size: usize) -> Result<(), RuleError> {
    if current_size >= TEAM_DEMO_MAX_SIZE {
        return Err(RuleError::TeamFull);
    }
    Ok(())
}

/// Ledger charge for adding one member to a team of `current_size`.
pub fn team_fee_on_add(current_size: usize) -> i32 {
    if current_size == 0 {
        TEAM_DEMO_FEE
    } else {
        0
    }
}

/// Ledger refund for removing one member from a team of `current_size`.
pub fn team_fee_on_remove(current_size: usize) -> i32 {
    if current_size == 1 {
        TEAM_DEMO_FEE
    } else {
        0
    }
}

pub fn team_is_complete(size: usize) -> bool {
    (TEAM_DEMO_MIN_SIZE..=TEAM_DEMO_MAX_SIZE).contains(&size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_on_counts_birthday() {
        let dob = date(2015, 6, 15);
        assert_eq!(age_on(dob, date(2025, 6, 14)), 9);
        assert_eq!(age_on(dob, date(2025, 6, 15)), 10);
        assert_eq!(age_on(dob, date(2025, 12, 31)), 10);
        assert_eq!(age_on(dob, date(2025, 1, 1)), 9);
    }

    #[test]
    fn test_category_brackets() {
        for age in 4..=6 {
            assert_eq!(AgeCategory::for_age(age), Some(AgeCategory::FourToSix));
        }
        for age in 7..=9 {
            assert_eq!(AgeCategory::for_age(age), Some(AgeCategory::SevenToNine));
        }
        for age in 10..=12 {
            assert_eq!(AgeCategory::for_age(age), Some(AgeCategory::TenToTwelve));
        }
        for age in 13..=15 {
            assert_eq!(AgeCategory::for_age(age), Some(AgeCategory::ThirteenToFifteen));
        }
        assert_eq!(AgeCategory::for_age(3), None);
        assert_eq!(AgeCategory::for_age(16), None);
    }

    #[test]
    fn test_events_follow_age() {
        assert_eq!(eligible_events(5), vec![Event::Sparring]);
        assert_eq!(eligible_events(7), vec![Event::Pattern, Event::Sparring]);
        assert_eq!(eligible_events(15), vec![Event::Pattern, Event::Sparring]);
        assert!(eligible_events(16).is_empty());

        assert_eq!(events_label(&[Event::Sparring, Event::Pattern]), "pattern, sparring");
        assert_eq!(events_label(&[Event::Sparring]), "sparring");
        assert_eq!(events_label(&[]), "");
    }

    #[test]
    fn test_registration_fee() {
        let both = [Event::Pattern, Event::Sparring];
        assert_eq!(registration_fee(&both, None), 110);
        assert_eq!(registration_fee(&both, Some("")), 110);
        assert_eq!(registration_fee(&both, Some("   ")), 110);
        assert_eq!(registration_fee(&both, Some("BRC-041")), 100);
        assert_eq!(registration_fee(&[Event::Sparring], None), 110);
        assert_eq!(registration_fee(&[], Some("BRC-041")), 0);
    }

    #[test]
    fn test_assess_rejects_out_of_range_ages() {
        let today = date(2025, 3, 1);
        assert_eq!(
            assess(date(2008, 1, 1), today, None),
            Err(RuleError::AgeAboveLimit)
        );
        assert_eq!(
            assess(date(2022, 1, 1), today, None),
            Err(RuleError::AgeOutOfRange)
        );

        let young = assess(date(2020, 2, 1), today, Some("M-1")).unwrap();
        assert_eq!(young.age, 5);
        assert_eq!(young.category, AgeCategory::FourToSix);
        assert_eq!(young.events_label(), "sparring");
        assert_eq!(young.fee, 100);
    }

    #[test]
    fn test_coach_capacity() {
        let counts = CoachCounts::tally(["Team Manager", "Coach", "Coach"]);
        assert_eq!(counts, CoachCounts { team_managers: 1, coaches: 2 });

        assert_eq!(
            counts.check_add(CoachTag::TeamManager, DEFAULT_MAX_COACHES),
            Err(RuleError::TeamManagerLimit)
        );
        assert!(counts.check_add(CoachTag::Coach, DEFAULT_MAX_COACHES).is_ok());

        let full = CoachCounts { team_managers: 0, coaches: 3 };
        assert_eq!(
            full.check_add(CoachTag::Coach, DEFAULT_MAX_COACHES),
            Err(RuleError::CoachLimit(3))
        );
        // A manager can still be added, so the form stays open.
        assert!(full.can_add(DEFAULT_MAX_COACHES));
        assert!(!CoachCounts { team_managers: 1, coaches: 3 }.can_add(DEFAULT_MAX_COACHES));
        assert!(!CoachCounts { team_managers: 0, coaches: 4 }.can_add(DEFAULT_MAX_COACHES));
    }

    #[test]
    fn test_team_fee_first_and_last() {
        assert_eq!(team_fee_on_add(0), TEAM_DEMO_FEE);
        assert_eq!(team_fee_on_add(1), 0);
        assert_eq!(team_fee_on_remove(1), TEAM_DEMO_FEE);
        assert_eq!(team_fee_on_remove(2), 0);
        assert_eq!(team_fee_on_remove(0), 0);

        assert!(check_team_add(4).is_ok());
        assert_eq!(check_team_add(5), Err(RuleError::TeamFull));
        assert!(!team_is_complete(2));
        assert!(team_is_complete(3));
        assert!(team_is_complete(5));
    }
}
