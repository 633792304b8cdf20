//! Day-first calendar dates.
//!
//! Site paperwork writes dates as `dd.mm.yyyy` (and work cards often drop
//! the year: "срок до 25.09"). [`DayDate`] parses both forms once, at the
//! boundary, and renders back to the full literal.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, Result};

/// Matches `d.m`, `dd.mm` and `dd.mm.yyyy`.
fn day_first_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,2})\.(\d{1,2})(?:\.(\d{4}))?$").expect("day-first pattern is valid")
    })
}

/// A calendar date that reads and writes as `dd.mm.yyyy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayDate(NaiveDate);

impl DayDate {
    /// Wraps an existing date.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Builds a date from its parts.
    pub fn from_dmy(day: u32, month: u32, year: i32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| ModelError::DateOutOfRange(format!("{:02}.{:02}.{}", day, month, year)))
    }

    /// Today's date in the local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Parses `dd.mm.yyyy`. The short form `dd.mm` is rejected.
    pub fn parse(literal: &str) -> Result<Self> {
        Self::parse_inner(literal, None)
    }

    /// Parses `dd.mm.yyyy`, or `dd.mm` taking the year from `reference`.
    pub fn parse_with_year(literal: &str, reference: DayDate) -> Result<Self> {
        Self::parse_inner(literal, Some(reference.year()))
    }

    fn parse_inner(literal: &str, default_year: Option<i32>) -> Result<Self> {
        let trimmed = literal.trim();
        let caps = day_first_pattern()
            .captures(trimmed)
            .ok_or_else(|| ModelError::InvalidDate(literal.to_string()))?;

        let day: u32 = caps[1]
            .parse()
            .map_err(|_| ModelError::InvalidDate(literal.to_string()))?;
        let month: u32 = caps[2]
            .parse()
            .map_err(|_| ModelError::InvalidDate(literal.to_string()))?;

        let year = match caps.get(3) {
            Some(y) => y
                .as_str()
                .parse()
                .map_err(|_| ModelError::InvalidDate(literal.to_string()))?,
            None => default_year.ok_or_else(|| ModelError::InvalidDate(literal.to_string()))?,
        };

        Self::from_dmy(day, month, year)
    }

    /// Returns the wrapped date.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Returns the calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns true if this date is strictly before `other`.
    pub fn is_before(&self, other: DayDate) -> bool {
        self.0 < other.0
    }

    /// Short `dd.mm` rendering used on work cards.
    pub fn short(&self) -> String {
        self.0.format("%d.%m").to_string()
    }
}

impl fmt::Display for DayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%d.%m.%Y"))
    }
}

impl FromStr for DayDate {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for DayDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for DayDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        DayDate::parse(&literal).map_err(serde::de::Error::custom)
    }
}
