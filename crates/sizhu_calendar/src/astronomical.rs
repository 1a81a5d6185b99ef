//! Calendar service backed by low-precision solar and lunar theory.
//!
//! Pillar rules:
//! - year changes at the Start of Spring (solar longitude 315°)
//! - month branch from the jie terms: 315° opens 寅, one branch per 30°
//! - month stem by the five-tiger rule, hour stem by the five-rat rule
//! - day index `(JDN + 49) mod 60` of the local civil date (2000-01-01 = 戊午)
//! - the 23:00 hour takes its stem from the following day; the day pillar
//!   itself does not advance until midnight

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, Timelike};
use sizhu_base::{Branch, FourPillars, SexagenaryPair, Stem};
use tracing::debug;

use crate::calendar_types::{
    CalendarConfig, Gender, LunarDate, RawFortunePeriod, RawFortuneYear,
};
use crate::error::CalendarError;
use crate::julian::{civil_to_jd_ut, date_to_jdn};
use crate::lunar;
use crate::service::CalendarService;
use crate::solar::{
    START_OF_SPRING_DEG, find_solar_longitude, next_jie, normalize_360, previous_jie,
    solar_longitude_ut,
};
use crate::{MAX_YEAR, MIN_YEAR};

/// Minutes of distance to the jie term per year of fortune start offset (3 days).
const MINUTES_PER_YEAR: i64 = 3 * 24 * 60;
/// Minutes per month of offset (6 hours).
const MINUTES_PER_MONTH: i64 = 6 * 60;
/// Minutes per day of offset.
const MINUTES_PER_DAY: i64 = 12;

/// Years covered by each real fortune period.
pub const PERIOD_YEARS: i32 = 10;

/// Calendar service computed from solar longitude and true new moons.
#[derive(Debug, Clone, Default)]
pub struct AstronomicalCalendar {
    config: CalendarConfig,
}

impl AstronomicalCalendar {
    pub fn new(config: CalendarConfig) -> Result<Self, CalendarError> {
        config.validate().map_err(CalendarError::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    fn offset(&self) -> f64 {
        self.config.utc_offset_hours
    }

    fn check_year(year: i32) -> Result<(), CalendarError> {
        if (MIN_YEAR..=MAX_YEAR).contains(&year) {
            Ok(())
        } else {
            Err(CalendarError::YearOutOfRange(year))
        }
    }

    /// UT instant of the Start of Spring in a Gregorian year.
    pub fn start_of_spring(&self, year: i32) -> Result<f64, CalendarError> {
        let guess = NaiveDate::from_ymd_opt(year, 2, 4).ok_or(CalendarError::YearOutOfRange(year))?;
        find_solar_longitude(START_OF_SPRING_DEG, date_to_jdn(guess) as f64)
    }

    /// Offset from the birth moment to the start of the first real fortune period.
    fn fortune_start(&self, solar: NaiveDateTime, forward: bool) -> Result<NaiveDateTime, CalendarError> {
        let jd = civil_to_jd_ut(solar, self.offset());
        let jie = if forward { next_jie(jd)? } else { previous_jie(jd)? };
        let minutes = ((jie - jd).abs() * 1_440.0).round() as i64;
        let years = minutes / MINUTES_PER_YEAR;
        let rest = minutes % MINUTES_PER_YEAR;
        let months = rest / MINUTES_PER_MONTH;
        let days = (rest % MINUTES_PER_MONTH) / MINUTES_PER_DAY;
        debug!(minutes, years, months, days, forward, "fortune start offset");

        let total_months = u32::try_from(years * 12 + months)
            .map_err(|_| CalendarError::NoConvergence("fortune start offset"))?;
        solar
            .checked_add_months(Months::new(total_months))
            .and_then(|d| d.checked_add_days(Days::new(days as u64)))
            .ok_or(CalendarError::YearOutOfRange(solar.year()))
    }
}

fn fortune_years(start_year: i32, end_year: i32, start_age: i32) -> Vec<RawFortuneYear> {
    (start_year..=end_year)
        .map(|year| RawFortuneYear {
            year,
            age: start_age + (year - start_year),
            pair: SexagenaryPair::from_cycle_index(year as i64 - 4),
        })
        .collect()
}

impl CalendarService for AstronomicalCalendar {
    fn lunar_to_solar(
        &self,
        year: i32,
        signed_month: i32,
        day: u32,
        hour: u32,
    ) -> Result<NaiveDateTime, CalendarError> {
        Self::check_year(year)?;
        let date = lunar::lunar_to_solar(year, signed_month, day, self.offset())?;
        date.and_hms_opt(hour, 0, 0)
            .ok_or(CalendarError::InvalidLunarDate {
                year,
                month: signed_month,
                day,
            })
    }

    fn solar_to_lunar(&self, solar: NaiveDateTime) -> Result<LunarDate, CalendarError> {
        Self::check_year(solar.year())?;
        lunar::solar_to_lunar(solar.date(), self.offset())
    }

    fn four_pillars(
        &self,
        solar: NaiveDateTime,
    ) -> Result<FourPillars<SexagenaryPair>, CalendarError> {
        Self::check_year(solar.year())?;
        let jd = civil_to_jd_ut(solar, self.offset());
        let lon = solar_longitude_ut(jd);

        let ganzhi_year = if jd < self.start_of_spring(solar.year())? {
            solar.year() - 1
        } else {
            solar.year()
        };
        let year = SexagenaryPair::from_cycle_index(ganzhi_year as i64 - 4);

        let month_offset = (normalize_360(lon - START_OF_SPRING_DEG) / 30.0).floor() as i64;
        let tiger = Stem::from_index((year.stem.index() % 5) as i64 * 2 + 2);
        let month = SexagenaryPair::new(tiger.offset(month_offset), Branch::Yin.offset(month_offset));

        let day_index = date_to_jdn(solar.date()) + 49;
        let day = SexagenaryPair::from_cycle_index(day_index);

        let hour_branch = Branch::from_index(((solar.hour() + 1) / 2) as i64);
        let stem_day = if solar.hour() == 23 {
            Stem::from_index(day_index + 1)
        } else {
            day.stem
        };
        let hour_stem =
            Stem::from_index((stem_day.index() % 5) as i64 * 2 + hour_branch.index() as i64);
        let hour = SexagenaryPair::new(hour_stem, hour_branch);

        Ok(FourPillars::new(year, month, day, hour))
    }

    fn fortune_sequence(
        &self,
        solar: NaiveDateTime,
        gender: Gender,
    ) -> Result<Vec<RawFortunePeriod>, CalendarError> {
        let pillars = self.four_pillars(solar)?;
        let yang_year = pillars.year.stem.polarity().is_yang();
        let forward = yang_year == (gender == Gender::Male);
        let start = self.fortune_start(solar, forward)?;

        let birth_year = solar.year();
        let first_real_year = start.year();
        let step: i64 = if forward { 1 } else { -1 };

        let mut periods = Vec::with_capacity(self.config.fortune_period_count);
        periods.push(RawFortunePeriod {
            index: 0,
            pair: None,
            start_age: 1,
            start_year: birth_year,
            end_year: first_real_year - 1,
            years: fortune_years(birth_year, first_real_year - 1, 1),
        });
        let count = u8::try_from(self.config.fortune_period_count)
            .map_err(|_| CalendarError::InvalidConfig("fortune_period_count out of range"))?;
        for i in 1..count {
            let start_year = first_real_year + (i32::from(i) - 1) * PERIOD_YEARS;
            let start_age = start_year - birth_year + 1;
            let end_year = start_year + PERIOD_YEARS - 1;
            periods.push(RawFortunePeriod {
                index: i,
                pair: Some(pillars.month.offset(step * i64::from(i))),
                start_age,
                start_year,
                end_year,
                years: fortune_years(start_year, end_year, start_age),
            });
        }
        Ok(periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar_types::MAX_FORTUNE_PERIODS;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn pair(s: &str) -> SexagenaryPair {
        s.parse().unwrap()
    }

    #[test]
    fn pillars_2003_01_15() {
        let cal = AstronomicalCalendar::default();
        let p = cal.four_pillars(at(2003, 1, 15, 10)).unwrap();
        assert_eq!(p.year, pair("壬午"));
        assert_eq!(p.month, pair("癸丑"));
        assert_eq!(p.day, pair("戊子"));
        assert_eq!(p.hour, pair("丁巳"));
    }

    #[test]
    fn j2000_day_pillar() {
        let cal = AstronomicalCalendar::default();
        let p = cal.four_pillars(at(2000, 1, 1, 12)).unwrap();
        assert_eq!(p.day, pair("戊午"));
        assert_eq!(p.hour, pair("戊午"));
        // Before the Start of Spring: still 己卯 year, 丙子 month.
        assert_eq!(p.year, pair("己卯"));
        assert_eq!(p.month, pair("丙子"));
    }

    #[test]
    fn late_zi_hour_takes_next_day_stem() {
        let cal = AstronomicalCalendar::default();
        let p = cal.four_pillars(at(2000, 1, 1, 23)).unwrap();
        assert_eq!(p.day, pair("戊午"));
        assert_eq!(p.hour.branch, Branch::Zi);
        // next day 己未: 己 day starts its hours at 甲子
        assert_eq!(p.hour.stem, Stem::Jia);
    }

    #[test]
    fn year_turns_at_start_of_spring() {
        let cal = AstronomicalCalendar::default();
        assert_eq!(cal.four_pillars(at(2024, 2, 3, 12)).unwrap().year, pair("癸卯"));
        assert_eq!(cal.four_pillars(at(2024, 2, 5, 12)).unwrap().year, pair("甲辰"));
        assert_eq!(cal.four_pillars(at(2024, 2, 5, 12)).unwrap().month, pair("丙寅"));
    }

    #[test]
    fn fortune_sequence_shape() {
        let cal = AstronomicalCalendar::default();
        let seq = cal.fortune_sequence(at(2003, 1, 15, 10), Gender::Male).unwrap();
        assert_eq!(seq.len(), 10);
        assert!(seq[0].pair.is_none());
        assert_eq!(seq[0].start_age, 1);
        // 壬 year + male runs forward from 癸丑.
        assert_eq!(seq[1].pair, Some(pair("甲寅")));
        assert_eq!(seq[2].pair, Some(pair("乙卯")));
        for w in seq[1..].windows(2) {
            assert_eq!(w[1].start_year - w[0].start_year, 10);
            assert_eq!(w[1].start_age - w[0].start_age, 10);
        }
        for p in &seq[1..] {
            assert_eq!(p.years.len(), 10);
            assert_eq!(p.years[0].age, p.start_age);
            assert_eq!(p.start_age, p.start_year - 2003 + 1);
        }
    }

    #[test]
    fn longest_sequence_indexes_every_period() {
        let cal = AstronomicalCalendar::new(CalendarConfig {
            fortune_period_count: MAX_FORTUNE_PERIODS,
            ..CalendarConfig::default()
        })
        .unwrap();
        let seq = cal.fortune_sequence(at(2003, 1, 15, 10), Gender::Male).unwrap();
        assert_eq!(seq.len(), MAX_FORTUNE_PERIODS);
        for (i, p) in seq.iter().enumerate() {
            assert_eq!(usize::from(p.index), i);
        }
        assert!(AstronomicalCalendar::new(CalendarConfig {
            fortune_period_count: 300,
            ..CalendarConfig::default()
        })
        .is_err());
    }

    #[test]
    fn female_runs_backward() {
        let cal = AstronomicalCalendar::default();
        let seq = cal.fortune_sequence(at(2003, 1, 15, 10), Gender::Female).unwrap();
        assert_eq!(seq[1].pair, Some(pair("壬子")));
    }

    #[test]
    fn fortune_year_pairs() {
        let cal = AstronomicalCalendar::default();
        let seq = cal.fortune_sequence(at(2003, 1, 15, 10), Gender::Male).unwrap();
        let all: Vec<&RawFortuneYear> = seq.iter().flat_map(|p| p.years.iter()).collect();
        let y2024 = all.iter().find(|y| y.year == 2024).unwrap();
        assert_eq!(y2024.pair, pair("甲辰"));
        assert_eq!(y2024.age, 22);
    }

    #[test]
    fn out_of_range_year() {
        let cal = AstronomicalCalendar::default();
        assert_eq!(
            cal.four_pillars(at(1850, 1, 1, 0)),
            Err(CalendarError::YearOutOfRange(1850))
        );
    }
}
