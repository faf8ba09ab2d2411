//! Relative date adjustments for `$NOW(...)` tokens.
//!
//! Grammar: `[+|-]<amount>[ ]<unit>`, e.g. `-1 day`, `+2weeks`, `30 min`.
//! Units are matched case-insensitively.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};

use crate::error::{Error, Result};

/// Unit of a [`DateAdjustment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentUnit {
    /// Calendar years.
    Years,
    /// Calendar months.
    Months,
    /// Seven-day weeks.
    Weeks,
    /// Days.
    Days,
    /// Hours.
    Hours,
    /// Minutes.
    Minutes,
    /// Seconds.
    Seconds,
    /// Milliseconds.
    Milliseconds,
}

impl AdjustmentUnit {
    fn from_name(name: &str) -> Option<Self> {
        let unit = match name.to_ascii_lowercase().as_str() {
            "years" | "year" | "yrs" | "yr" | "y" => Self::Years,
            "months" | "month" => Self::Months,
            "weeks" | "week" | "w" => Self::Weeks,
            "days" | "day" | "d" => Self::Days,
            "hours" | "hour" | "h" => Self::Hours,
            "minutes" | "minute" | "mins" | "min" | "m" => Self::Minutes,
            "seconds" | "second" | "secs" | "sec" | "s" => Self::Seconds,
            "milliseconds" | "millisecond" | "ms" => Self::Milliseconds,
            _ => return None,
        };
        Some(unit)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Weeks => "weeks",
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
            Self::Milliseconds => "milliseconds",
        }
    }
}

/// A signed relative offset such as `-1 day` or `+3 months`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateAdjustment {
    /// Whether the offset moves backwards in time.
    pub subtract: bool,
    /// Magnitude of the offset.
    pub amount: u32,
    /// Unit of the offset.
    pub unit: AdjustmentUnit,
}

impl DateAdjustment {
    /// Apply the offset to `date`.
    ///
    /// Years and months use calendar arithmetic, clamping the day of month
    /// (Jan 31 + 1 month is Feb 28/29). Other units are fixed durations.
    pub fn apply(&self, date: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let adjusted = match self.unit {
            AdjustmentUnit::Years => self.shift_months(date, self.amount.checked_mul(12)),
            AdjustmentUnit::Months => self.shift_months(date, Some(self.amount)),
            unit => {
                let amount = i64::from(self.amount);
                let delta = match unit {
                    AdjustmentUnit::Weeks => Duration::try_weeks(amount),
                    AdjustmentUnit::Days => Duration::try_days(amount),
                    AdjustmentUnit::Hours => Duration::try_hours(amount),
                    AdjustmentUnit::Minutes => Duration::try_minutes(amount),
                    AdjustmentUnit::Seconds => Duration::try_seconds(amount),
                    _ => Duration::try_milliseconds(amount),
                };
                delta.and_then(|delta| {
                    if self.subtract {
                        date.checked_sub_signed(delta)
                    } else {
                        date.checked_add_signed(delta)
                    }
                })
            }
        };

        adjusted.ok_or_else(|| Error::DateOutOfRange(format!("{date} {self}")))
    }

    fn shift_months(&self, date: DateTime<Utc>, months: Option<u32>) -> Option<DateTime<Utc>> {
        let months = Months::new(months?);
        if self.subtract {
            date.checked_sub_months(months)
        } else {
            date.checked_add_months(months)
        }
    }
}

impl FromStr for DateAdjustment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidAdjustment(s.to_string());

        let (subtract, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(invalid());
        }
        let amount: u32 = rest[..digits_end].parse().map_err(|_| invalid())?;

        // At most one whitespace character between amount and unit.
        let mut unit = &rest[digits_end..];
        if let Some(c) = unit.chars().next().filter(|c| c.is_whitespace()) {
            unit = &unit[c.len_utf8()..];
        }

        let unit = AdjustmentUnit::from_name(unit).ok_or_else(invalid)?;

        Ok(Self {
            subtract,
            amount,
            unit,
        })
    }
}

impl fmt::Display for DateAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.subtract { '-' } else { '+' };
        write!(f, "{sign}{} {}", self.amount, self.unit.as_str())
    }
}

/// Parse `adjustment` and apply it to `date`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use dynfilter::adjust_date;
///
/// let base = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
/// let adjusted = adjust_date(base, "-1 day").unwrap();
/// assert_eq!(adjusted, Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap());
/// ```
pub fn adjust_date(date: DateTime<Utc>, adjustment: &str) -> Result<DateTime<Utc>> {
    adjustment.parse::<DateAdjustment>()?.apply(date)
}
