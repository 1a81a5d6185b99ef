//! Error types for calendar conversion.

use thiserror::Error;

/// Errors from the calendar service. These abort a chart computation.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CalendarError {
    /// Gregorian date/time that does not exist.
    #[error("invalid solar date {year}-{month:02}-{day:02} {hour:02}:00")]
    InvalidSolarDate {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
    },
    /// Lunar date that does not exist.
    #[error("invalid lunar date {year} month {month} day {day}")]
    InvalidLunarDate { year: i32, month: i32, day: u32 },
    /// Leap month requested for a year that has no such leap month.
    #[error("lunar year {year} has no leap month {month}")]
    NoLeapMonth { year: i32, month: u32 },
    /// Year outside the supported range.
    #[error("year {0} outside supported range {min}..={max}", min = crate::MIN_YEAR, max = crate::MAX_YEAR)]
    YearOutOfRange(i32),
    /// Calendar settings out of range.
    #[error("invalid calendar configuration: {0}")]
    InvalidConfig(&'static str),
    /// Iterative solar-term search did not converge.
    #[error("no convergence: {0}")]
    NoConvergence(&'static str),
}
