//! Calendar service for Four Pillars charts.
//!
//! The chart engine depends only on the [`CalendarService`] trait. This crate
//! also ships [`AstronomicalCalendar`], an implementation built on
//! low-precision solar longitude and true new moons:
//! - Gregorian ↔ Chinese lunisolar conversion (leap months included)
//! - four-pillar extraction with solar-term month boundaries
//! - raw fortune periods (dayun) and fortune years (liunian)

pub mod astronomical;
pub mod calendar_types;
pub mod error;
pub mod julian;
pub mod lunar;
pub mod service;
pub mod solar;

pub use astronomical::{AstronomicalCalendar, PERIOD_YEARS};
pub use calendar_types::{
    BirthInput, CalendarConfig, CalendarMoment, Gender, LunarDate, MAX_FORTUNE_PERIODS,
    RawFortunePeriod, RawFortuneYear,
};
pub use error::CalendarError;
pub use service::CalendarService;

/// Earliest supported Gregorian year.
pub const MIN_YEAR: i32 = 1900;

/// Latest supported Gregorian year.
pub const MAX_YEAR: i32 = 2100;
