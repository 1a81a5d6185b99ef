//! Chinese lunisolar months from true new moons and principal solar terms.
//!
//! New moons: Meeus, Astronomical Algorithms ch. 49 (mean phase plus periodic
//! and planetary-argument corrections, accuracy well under a minute).
//!
//! Month rules:
//! - a month starts on the local day of a new moon
//! - month 11 is the month containing the December solstice
//! - when 13 new moons separate two consecutive month-11 starts, the first
//!   month after month 11 that contains no principal term (zhongqi, solar
//!   longitude a multiple of 30°) is the leap month and repeats the previous number

use chrono::{Datelike, NaiveDate};

use crate::calendar_types::LunarDate;
use crate::error::CalendarError;
use crate::julian::{date_to_jdn, delta_t_days, local_day_number, local_midnight_jd_ut};
use crate::solar::{WINTER_SOLSTICE_DEG, find_solar_longitude, solar_longitude_ut};

/// Mean synodic month, days.
pub const SYNODIC_MONTH: f64 = 29.530_588_861;

/// Mean new moon epoch (k = 0, 2000-01-06), JDE.
const NEW_MOON_EPOCH: f64 = 2_451_550.097_66;

/// Periodic terms for the new moon: (coefficient, E power, M, M', F, Ω multipliers).
#[rustfmt::skip]
static NEW_MOON_TERMS: [(f64, i32, f64, f64, f64, f64); 25] = [
    (-0.407_20, 0, 0.0, 1.0, 0.0, 0.0),
    ( 0.172_41, 1, 1.0, 0.0, 0.0, 0.0),
    ( 0.016_08, 0, 0.0, 2.0, 0.0, 0.0),
    ( 0.010_39, 0, 0.0, 0.0, 2.0, 0.0),
    ( 0.007_39, 1, -1.0, 1.0, 0.0, 0.0),
    (-0.005_14, 1, 1.0, 1.0, 0.0, 0.0),
    ( 0.002_08, 2, 2.0, 0.0, 0.0, 0.0),
    (-0.001_11, 0, 0.0, 1.0, -2.0, 0.0),
    (-0.000_57, 0, 0.0, 1.0, 2.0, 0.0),
    ( 0.000_56, 1, 1.0, 2.0, 0.0, 0.0),
    (-0.000_42, 0, 0.0, 3.0, 0.0, 0.0),
    ( 0.000_42, 1, 1.0, 0.0, 2.0, 0.0),
    ( 0.000_38, 1, 1.0, 0.0, -2.0, 0.0),
    (-0.000_24, 1, -1.0, 2.0, 0.0, 0.0),
    (-0.000_17, 0, 0.0, 0.0, 0.0, 1.0),
    (-0.000_07, 0, 2.0, 1.0, 0.0, 0.0),
    ( 0.000_04, 0, 0.0, 2.0, -2.0, 0.0),
    ( 0.000_04, 0, 3.0, 0.0, 0.0, 0.0),
    ( 0.000_03, 0, 1.0, 1.0, -2.0, 0.0),
    ( 0.000_03, 0, 0.0, 2.0, 2.0, 0.0),
    (-0.000_03, 0, 1.0, 1.0, 2.0, 0.0),
    ( 0.000_03, 0, -1.0, 1.0, 2.0, 0.0),
    (-0.000_02, 0, -1.0, 1.0, -2.0, 0.0),
    (-0.000_02, 0, 1.0, 3.0, 0.0, 0.0),
    ( 0.000_02, 0, 0.0, 4.0, 0.0, 0.0),
];

/// Planetary-argument corrections: (coefficient, A0, A rate per lunation).
#[rustfmt::skip]
static PLANETARY_TERMS: [(f64, f64, f64); 13] = [
    (0.000_165, 251.88, 0.016_321),
    (0.000_164, 251.83, 26.651_886),
    (0.000_126, 349.42, 36.412_478),
    (0.000_110, 84.66, 18.206_239),
    (0.000_062, 141.74, 53.303_771),
    (0.000_060, 207.14, 2.453_732),
    (0.000_056, 154.84, 7.306_860),
    (0.000_047, 34.52, 27.261_239),
    (0.000_042, 207.19, 0.121_824),
    (0.000_040, 291.34, 1.844_379),
    (0.000_037, 161.72, 24.198_154),
    (0.000_035, 239.56, 25.513_099),
    (0.000_023, 331.55, 3.592_518),
];

/// JDE (TT) of true new moon number `k` (k = 0 near 2000-01-06).
pub fn new_moon_jde(k: i64) -> f64 {
    let k = k as f64;
    let t = k / 1_236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let jde = NEW_MOON_EPOCH + SYNODIC_MONTH * k + 0.000_154_37 * t2 - 0.000_000_150 * t3
        + 0.000_000_000_73 * t4;
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;
    let m = (2.553_4 + 29.105_356_70 * k - 0.000_001_4 * t2 - 0.000_000_11 * t3).to_radians();
    let mp = (201.564_3 + 385.816_935_28 * k + 0.010_758_2 * t2 + 0.000_012_38 * t3
        - 0.000_000_058 * t4)
        .to_radians();
    let f = (160.710_8 + 390.670_502_84 * k - 0.001_611_8 * t2 - 0.000_002_27 * t3
        + 0.000_000_011 * t4)
        .to_radians();
    let om = (124.774_6 - 1.563_755_88 * k + 0.002_067_2 * t2 + 0.000_002_15 * t3).to_radians();

    let periodic: f64 = NEW_MOON_TERMS
        .iter()
        .map(|&(coef, e_pow, cm, cmp, cf, co)| {
            coef * e.powi(e_pow) * (cm * m + cmp * mp + cf * f + co * om).sin()
        })
        .sum();

    let a1 = (299.77 + 0.107_408 * k - 0.009_173 * t2).to_radians();
    let planetary: f64 = 0.000_325 * a1.sin()
        + PLANETARY_TERMS
            .iter()
            .map(|&(coef, a0, rate)| coef * (a0 + rate * k).to_radians().sin())
            .sum::<f64>();

    jde + periodic + planetary
}

/// UT Julian Date of new moon `k`.
pub fn new_moon_ut(k: i64) -> f64 {
    let jde = new_moon_jde(k);
    jde - delta_t_days(jde)
}

/// One lunar month as a span of local day numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarMonthSpan {
    /// Month number 1..=12.
    pub number: u8,
    pub is_leap: bool,
    /// First local day number.
    pub start: i64,
    /// Day number after the last day.
    pub end: i64,
}

impl LunarMonthSpan {
    pub fn len(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, jdn: i64) -> bool {
        self.start <= jdn && jdn < self.end
    }
}

/// Months of the solar year (sui) running from the month-11 start before the
/// December solstice of `year - 1` up to the one before the solstice of `year`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiLayout {
    /// Gregorian year of the closing solstice.
    pub year: i32,
    pub months: Vec<LunarMonthSpan>,
}

impl SuiLayout {
    /// Lay out the sui ending at the December solstice of `year`.
    pub fn build(year: i32, utc_offset_hours: f64) -> Result<Self, CalendarError> {
        let k_open = month_eleven_lunation(year - 1, utc_offset_hours)?;
        let k_close = month_eleven_lunation(year, utc_offset_hours)?;
        let has_leap = k_close - k_open == 13;

        let day = |k: i64| local_day_number(new_moon_ut(k), utc_offset_hours);
        let mut months = Vec::with_capacity((k_close - k_open) as usize);
        let mut leap_assigned = false;
        let mut number = 11u8;
        for k in k_open..k_close {
            let (start, end) = (day(k), day(k + 1));
            let mut is_leap = false;
            if k != k_open {
                if has_leap && !leap_assigned && !has_principal_term(start, end, utc_offset_hours)
                {
                    is_leap = true;
                    leap_assigned = true;
                } else {
                    number = number % 12 + 1;
                }
            }
            months.push(LunarMonthSpan {
                number,
                is_leap,
                start,
                end,
            });
        }
        Ok(Self { year, months })
    }

    /// Index of the first month 1 (lunar new year), if this sui contains it.
    pub fn new_year_index(&self) -> Option<usize> {
        self.months
            .iter()
            .position(|m| m.number == 1 && !m.is_leap)
    }

    pub fn first_day(&self) -> Option<i64> {
        self.months.first().map(|m| m.start)
    }

    pub fn end_day(&self) -> Option<i64> {
        self.months.last().map(|m| m.end)
    }
}

/// Lunation number of the month containing the December solstice of `year`.
fn month_eleven_lunation(year: i32, utc_offset_hours: f64) -> Result<i64, CalendarError> {
    let guess = date_to_jdn(
        NaiveDate::from_ymd_opt(year, 12, 21).ok_or(CalendarError::YearOutOfRange(year))?,
    ) as f64;
    let solstice = find_solar_longitude(WINTER_SOLSTICE_DEG, guess)?;
    let target = local_day_number(solstice, utc_offset_hours);
    Ok(lunation_on_or_before(target, utc_offset_hours))
}

/// Number of the last new moon whose local day is on or before `jdn`.
fn lunation_on_or_before(jdn: i64, utc_offset_hours: f64) -> i64 {
    let day = |k: i64| local_day_number(new_moon_ut(k), utc_offset_hours);
    let mut k = ((jdn as f64 - NEW_MOON_EPOCH) / SYNODIC_MONTH).floor() as i64;
    while day(k) > jdn {
        k -= 1;
    }
    while day(k + 1) <= jdn {
        k += 1;
    }
    k
}

/// Whether a principal term falls on a local day in `[start, end)`.
fn has_principal_term(start: i64, end: i64, utc_offset_hours: f64) -> bool {
    let lon_at = |jdn: i64| solar_longitude_ut(local_midnight_jd_ut(jdn, utc_offset_hours));
    let a = (lon_at(start) / 30.0).floor();
    let b = (lon_at(end) / 30.0).floor();
    a != b
}

/// Lunar date of a Gregorian civil date.
pub fn solar_to_lunar(date: NaiveDate, utc_offset_hours: f64) -> Result<LunarDate, CalendarError> {
    let jdn = date_to_jdn(date);
    let mut sui = SuiLayout::build(date.year(), utc_offset_hours)?;
    if sui.end_day().is_some_and(|end| jdn >= end) {
        sui = SuiLayout::build(date.year() + 1, utc_offset_hours)?;
    }
    let idx = sui
        .months
        .iter()
        .position(|m| m.contains(jdn))
        .ok_or(CalendarError::NoConvergence("lunar month lookup"))?;
    let month = sui.months[idx];
    let before_new_year = sui.new_year_index().is_none_or(|ny| idx < ny);
    let year = if before_new_year { sui.year - 1 } else { sui.year };
    Ok(LunarDate {
        year,
        month: month.number,
        day: (jdn - month.start + 1) as u8,
        is_leap: month.is_leap,
    })
}

/// Gregorian civil date of a lunar date. A negative month selects the leap month.
pub fn lunar_to_solar(
    year: i32,
    signed_month: i32,
    day: u32,
    utc_offset_hours: f64,
) -> Result<NaiveDate, CalendarError> {
    let invalid = CalendarError::InvalidLunarDate {
        year,
        month: signed_month,
        day,
    };
    let number = signed_month.unsigned_abs();
    let is_leap = signed_month < 0;
    if !(1..=12).contains(&number) || !(1..=30).contains(&day) {
        return Err(invalid);
    }

    // Months 11 and 12 of year Y open the sui that closes in December of Y + 1.
    let late = number >= 11;
    let sui = SuiLayout::build(if late { year + 1 } else { year }, utc_offset_hours)?;
    let ny = sui.new_year_index().unwrap_or(sui.months.len());
    let candidates = if late { &sui.months[..ny] } else { &sui.months[ny..] };
    let Some(month) = candidates
        .iter()
        .find(|m| m.number as u32 == number && m.is_leap == is_leap)
    else {
        return Err(if is_leap {
            CalendarError::NoLeapMonth {
                year,
                month: number,
            }
        } else {
            invalid
        });
    };
    if day as i64 > month.len() {
        return Err(invalid);
    }
    crate::julian::jdn_to_date(month.start + day as i64 - 1).ok_or(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn meeus_example_49a() {
        // New moon of 1977 February: k = -283, JDE 2443192.65118
        let jde = new_moon_jde(-283);
        assert!((jde - 2_443_192.651_18).abs() < 0.000_1, "{jde}");
    }

    #[test]
    fn sui_has_twelve_or_thirteen_months() {
        for year in [2000, 2001, 2017, 2020, 2023] {
            let sui = SuiLayout::build(year, 8.0).unwrap();
            let n = sui.months.len();
            assert!(n == 12 || n == 13, "{year}: {n}");
            assert_eq!(sui.months.iter().filter(|m| m.is_leap).count(), n - 12);
            for m in &sui.months {
                assert!((29..=30).contains(&m.len()));
            }
        }
    }

    #[test]
    fn spring_festival_dates() {
        // 2003-02-01, 2020-01-25, 2023-01-22 were lunar new year days.
        for date in [ymd(2003, 2, 1), ymd(2020, 1, 25), ymd(2023, 1, 22)] {
            let l = solar_to_lunar(date, 8.0).unwrap();
            assert_eq!((l.month, l.day, l.is_leap), (1, 1, false), "{date}");
            assert_eq!(l.year, date.year());
        }
    }

    #[test]
    fn before_new_year_is_previous_year() {
        let l = solar_to_lunar(ymd(2003, 1, 15), 8.0).unwrap();
        assert_eq!(l.year, 2002);
        assert_eq!(l.month, 12);
        assert_eq!(l.day, 13);
    }

    #[test]
    fn leap_fourth_month_2020() {
        // 2020 had a leap 4th month starting 2020-05-23.
        let l = solar_to_lunar(ymd(2020, 5, 23), 8.0).unwrap();
        assert_eq!((l.month, l.day, l.is_leap), (4, 1, true));
        assert_eq!(lunar_to_solar(2020, -4, 1, 8.0).unwrap(), ymd(2020, 5, 23));
    }

    #[test]
    fn missing_leap_month_rejected() {
        assert_eq!(
            lunar_to_solar(2021, -4, 1, 8.0),
            Err(CalendarError::NoLeapMonth {
                year: 2021,
                month: 4
            })
        );
    }

    #[test]
    fn lunar_round_trip() {
        let date = lunar_to_solar(2002, 12, 13, 8.0).unwrap();
        assert_eq!(date, ymd(2003, 1, 15));
    }
}
