//! The calendar service contract consumed by the chart engine.

use chrono::{NaiveDate, NaiveDateTime};
use sizhu_base::{FourPillars, SexagenaryPair};

use crate::calendar_types::{BirthInput, CalendarMoment, Gender, LunarDate, RawFortunePeriod};
use crate::error::CalendarError;
use crate::{MAX_YEAR, MIN_YEAR};

/// Calendar conversion, pillar extraction and raw fortune generation.
///
/// Implementations are synchronous and must be safe to share between threads.
pub trait CalendarService: Send + Sync {
    /// Civil date-time of a lunar date. A negative month selects the leap month.
    fn lunar_to_solar(
        &self,
        year: i32,
        signed_month: i32,
        day: u32,
        hour: u32,
    ) -> Result<NaiveDateTime, CalendarError>;

    /// Lunar date of a civil date-time.
    fn solar_to_lunar(&self, solar: NaiveDateTime) -> Result<LunarDate, CalendarError>;

    /// The four sexagenary pillars of a civil date-time.
    fn four_pillars(
        &self,
        solar: NaiveDateTime,
    ) -> Result<FourPillars<SexagenaryPair>, CalendarError>;

    /// Raw fortune periods, each with its fortune years.
    fn fortune_sequence(
        &self,
        solar: NaiveDateTime,
        gender: Gender,
    ) -> Result<Vec<RawFortunePeriod>, CalendarError>;

    /// Validate a birth input and resolve it to a solar/lunar moment.
    fn resolve(&self, input: &BirthInput) -> Result<CalendarMoment, CalendarError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&input.year) {
            return Err(CalendarError::YearOutOfRange(input.year));
        }
        if input.is_lunar {
            if input.hour > 23 {
                return Err(CalendarError::InvalidLunarDate {
                    year: input.year,
                    month: input.signed_month(),
                    day: input.day,
                });
            }
            let solar =
                self.lunar_to_solar(input.year, input.signed_month(), input.day, input.hour)?;
            let lunar = LunarDate {
                year: input.year,
                month: input.month as u8,
                day: input.day as u8,
                is_leap: input.is_leap_month,
            };
            Ok(CalendarMoment { solar, lunar })
        } else {
            let solar = NaiveDate::from_ymd_opt(input.year, input.month, input.day)
                .and_then(|d| d.and_hms_opt(input.hour, 0, 0))
                .ok_or(CalendarError::InvalidSolarDate {
                    year: input.year,
                    month: input.month,
                    day: input.day,
                    hour: input.hour,
                })?;
            let lunar = self.solar_to_lunar(solar)?;
            Ok(CalendarMoment { solar, lunar })
        }
    }
}
