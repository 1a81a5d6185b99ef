//! Types exchanged with the calendar service.

use std::fmt::{Display, Formatter};

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use sizhu_base::SexagenaryPair;

/// Subject gender; selects fortune-period direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            _ => None,
        }
    }
}

/// A birth moment as entered by the user, in local standard time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthInput {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Hour of day, 0..=23.
    pub hour: u32,
    /// Date fields are a lunar date.
    pub is_lunar: bool,
    /// Lunar month is the leap month (ignored for solar input).
    pub is_leap_month: bool,
    pub gender: Gender,
}

impl BirthInput {
    /// Solar (Gregorian) input.
    pub const fn solar(year: i32, month: u32, day: u32, hour: u32, gender: Gender) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            is_lunar: false,
            is_leap_month: false,
            gender,
        }
    }

    /// Lunar input.
    pub const fn lunar(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        is_leap_month: bool,
        gender: Gender,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            is_lunar: true,
            is_leap_month,
            gender,
        }
    }

    /// Month with leap months encoded as negative numbers.
    pub fn signed_month(&self) -> i32 {
        let m = self.month as i32;
        if self.is_leap_month { -m } else { m }
    }
}

/// A date in the Chinese lunisolar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub is_leap: bool,
}

impl Display for LunarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let leap = if self.is_leap { "閏" } else { "" };
        write!(f, "{}年{leap}{}月{}日", self.year, self.month, self.day)
    }
}

/// A resolved birth moment: civil solar date-time plus its lunar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMoment {
    pub solar: NaiveDateTime,
    pub lunar: LunarDate,
}

impl CalendarMoment {
    /// `2003年1月15日` style solar date.
    pub fn solar_label(&self) -> String {
        format!(
            "{}年{}月{}日",
            self.solar.year(),
            self.solar.month(),
            self.solar.day()
        )
    }

    pub fn lunar_label(&self) -> String {
        self.lunar.to_string()
    }

    pub fn hour(&self) -> u32 {
        self.solar.hour()
    }
}

/// One fortune year inside a raw fortune period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFortuneYear {
    pub year: i32,
    pub age: i32,
    pub pair: SexagenaryPair,
}

/// One raw fortune period (dayun) as produced by the calendar service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFortunePeriod {
    /// 0-based position; index 0 is the stub before the first real period.
    pub index: u8,
    /// `None` for the stub period.
    pub pair: Option<SexagenaryPair>,
    pub start_age: i32,
    pub start_year: i32,
    pub end_year: i32,
    pub years: Vec<RawFortuneYear>,
}

/// Upper bound on raw fortune periods: the stub plus twelve decades.
pub const MAX_FORTUNE_PERIODS: usize = 13;

/// Settings for [`AstronomicalCalendar`](crate::AstronomicalCalendar).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Local standard time offset from UTC, hours.
    pub utc_offset_hours: f64,
    /// Number of raw fortune periods to generate, stub included.
    pub fortune_period_count: usize,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 8.0,
            fortune_period_count: 10,
        }
    }
}

impl CalendarConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(-12.0..=14.0).contains(&self.utc_offset_hours) {
            return Err("utc_offset_hours must be in [-12, 14]");
        }
        if !(2..=MAX_FORTUNE_PERIODS).contains(&self.fortune_period_count) {
            return Err("fortune_period_count must be in [2, 13]");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_month_encodes_leap() {
        let b = BirthInput::lunar(2020, 4, 1, 0, true, Gender::Female);
        assert_eq!(b.signed_month(), -4);
        let b = BirthInput::solar(2020, 4, 1, 0, Gender::Female);
        assert_eq!(b.signed_month(), 4);
    }

    #[test]
    fn lunar_label() {
        let d = LunarDate {
            year: 2020,
            month: 4,
            day: 1,
            is_leap: true,
        };
        assert_eq!(d.to_string(), "2020年閏4月1日");
    }

    #[test]
    fn gender_names() {
        assert_eq!(Gender::from_name("Female"), Some(Gender::Female));
        assert_eq!(Gender::from_name("x"), None);
        assert_eq!(Gender::Male.name(), "male");
    }

    #[test]
    fn default_config_valid() {
        assert!(CalendarConfig::default().validate().is_ok());
        let bad = CalendarConfig {
            fortune_period_count: 1,
            ..CalendarConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn period_count_bounded() {
        let at_max = CalendarConfig {
            fortune_period_count: MAX_FORTUNE_PERIODS,
            ..CalendarConfig::default()
        };
        assert!(at_max.validate().is_ok());
        let too_many = CalendarConfig {
            fortune_period_count: 300,
            ..CalendarConfig::default()
        };
        assert!(too_many.validate().is_err());
    }
}
