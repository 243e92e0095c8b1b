//! Run date normalization
//!
//! Every pipeline run is scoped to one calendar day. The date argument may
//! arrive in several layouts; it is normalized once into a [`RunDate`] whose
//! `DDMMYYYY` key names input files and audit rows for the rest of the run.
//!
//! Validation is bounds-only: day 1..=31, month 1..=12, year 2000..=2099.
//! A 31st of a 30-day month passes. The compact `DDMMYYYY` layout goes
//! through the same check instead of being taken verbatim, so `32012021`
//! is rejected before it can name input files or audit rows.

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

static COMPACT_RE: OnceLock<Regex> = OnceLock::new();
static SEPARATED_RE: OnceLock<Regex> = OnceLock::new();

fn compact_re() -> &'static Regex {
    COMPACT_RE.get_or_init(|| Regex::new(r"^(\d{2})(\d{2})(\d{4})$").expect("valid regex"))
}

fn separated_re() -> &'static Regex {
    SEPARATED_RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[-./](\d{1,2})[-./](\d{4}|\d{2})$").expect("valid regex")
    })
}

/// Canonical date of one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunDate {
    year: u32,
    month: u32,
    day: u32,
}

impl RunDate {
    /// Build a run date from components, applying the bounds check.
    pub fn new(day: u32, month: u32, year: u32) -> CoreResult<Self> {
        Self::checked(&format!("{day:02}{month:02}{year}"), day, month, year)
    }

    /// Parse a free-form date argument.
    pub fn parse(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();

        if let Some(caps) = compact_re().captures(trimmed) {
            let (day, month, year) = (num(&caps[1]), num(&caps[2]), num(&caps[3]));
            return Self::checked(trimmed, day, month, year);
        }

        if let Some(caps) = separated_re().captures(trimmed) {
            let (day, month) = (num(&caps[1]), num(&caps[2]));
            let mut year = num(&caps[3]);
            if caps[3].len() == 2 {
                year += 2000;
            }
            return Self::checked(trimmed, day, month, year);
        }

        Err(CoreError::InvalidDateFormat {
            input: input.to_string(),
        })
    }

    fn checked(input: &str, day: u32, month: u32, year: u32) -> CoreResult<Self> {
        let invalid = |component, value| CoreError::InvalidDateValue {
            input: input.to_string(),
            component,
            value,
        };
        if !(1..=31).contains(&day) {
            return Err(invalid("day", day));
        }
        if !(1..=12).contains(&month) {
            return Err(invalid("month", month));
        }
        if !(2000..=2099).contains(&year) {
            return Err(invalid("year", year));
        }
        Ok(Self { year, month, day })
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    /// `DDMMYYYY` key used in file names and audit rows.
    pub fn key(&self) -> String {
        format!("{:02}{:02}{}", self.day, self.month, self.year)
    }

    /// `YYYY-MM-DD` form handed to SQL scripts.
    pub fn iso(&self) -> String {
        format!("{}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// Captures are all-digit and at most four characters long.
fn num(digits: &str) -> u32 {
    digits.parse().unwrap_or(0)
}

impl FromStr for RunDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RunDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Normalize a date argument straight to its `DDMMYYYY` key.
pub fn normalize(input: &str) -> CoreResult<String> {
    RunDate::parse(input).map(|d| d.key())
}

#[cfg(test)]
#[path = "run_date_test.rs"]
mod tests;
