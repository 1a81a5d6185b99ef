//! Golden tests for the astronomical calendar service.
//!
//! Reference values are published Chinese calendar dates (UTC+8).

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use sizhu_base::SexagenaryPair;
use sizhu_calendar::{
    AstronomicalCalendar, BirthInput, CalendarError, CalendarService, Gender, LunarDate,
};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn pair(s: &str) -> SexagenaryPair {
    s.parse().unwrap()
}

/// 2003-01-15 10:00 is lunar 2002-12-13.
#[test]
fn resolve_solar_input() {
    let cal = AstronomicalCalendar::default();
    let m = cal
        .resolve(&BirthInput::solar(2003, 1, 15, 10, Gender::Male))
        .unwrap();
    assert_eq!(m.solar, at(2003, 1, 15, 10));
    assert_eq!(
        m.lunar,
        LunarDate {
            year: 2002,
            month: 12,
            day: 13,
            is_leap: false
        }
    );
    assert_eq!(m.solar_label(), "2003年1月15日");
    assert_eq!(m.lunar_label(), "2002年12月13日");
}

/// Lunar 2020 leap-4-1 is 2020-05-23.
#[test]
fn resolve_leap_lunar_input() {
    let cal = AstronomicalCalendar::default();
    let m = cal
        .resolve(&BirthInput::lunar(2020, 4, 1, 8, true, Gender::Female))
        .unwrap();
    assert_eq!(m.solar, at(2020, 5, 23, 8));
    assert!(m.lunar.is_leap);
}

#[test]
fn malformed_solar_date_rejected() {
    let cal = AstronomicalCalendar::default();
    let err = cal
        .resolve(&BirthInput::solar(2023, 2, 30, 10, Gender::Male))
        .unwrap_err();
    assert!(matches!(err, CalendarError::InvalidSolarDate { .. }));
}

#[test]
fn bad_hour_rejected() {
    let cal = AstronomicalCalendar::default();
    assert!(
        cal.resolve(&BirthInput::solar(2023, 2, 3, 24, Gender::Male))
            .is_err()
    );
}

#[test]
fn short_lunar_month_rejects_day_30() {
    // Lunar 2023 month 1 has 29 days.
    let cal = AstronomicalCalendar::default();
    let err = cal.lunar_to_solar(2023, 1, 30, 0).unwrap_err();
    assert!(matches!(err, CalendarError::InvalidLunarDate { .. }));
}

/// Known day pillars.
#[test]
fn day_pillars() {
    let cal = AstronomicalCalendar::default();
    let cases = [
        (at(1949, 10, 1, 15), "甲子"),
        (at(2008, 8, 8, 20), "庚辰"),
        (at(2024, 1, 1, 12), "甲子"),
    ];
    for (dt, expected) in cases {
        assert_eq!(cal.four_pillars(dt).unwrap().day, pair(expected), "{dt}");
    }
}

/// 2008-08-08 20:00: 戊子 年 庚申 月 庚辰 日 丙戌 時.
#[test]
fn full_chart_2008() {
    let cal = AstronomicalCalendar::default();
    let p = cal.four_pillars(at(2008, 8, 8, 20)).unwrap();
    assert_eq!(p.year, pair("戊子"));
    assert_eq!(p.month, pair("庚申"));
    assert_eq!(p.hour, pair("丙戌"));
}

proptest! {
    /// solar → lunar → solar lands on the same civil date.
    #[test]
    fn lunar_round_trip(days in 0i64..36_500) {
        let cal = AstronomicalCalendar::default();
        let date = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap() + chrono::Days::new(days as u64);
        let dt = date.and_hms_opt(12, 0, 0).unwrap();
        let l = cal.solar_to_lunar(dt).unwrap();
        let month = if l.is_leap { -(l.month as i32) } else { l.month as i32 };
        let back = cal.lunar_to_solar(l.year, month, l.day as u32, 12).unwrap();
        prop_assert_eq!(back, dt);
    }

    /// Every generated pillar is a valid sexagenary pair.
    #[test]
    fn pillars_valid(days in 0i64..36_500, hour in 0u32..24) {
        let cal = AstronomicalCalendar::default();
        let date = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap() + chrono::Days::new(days as u64);
        let p = cal.four_pillars(date.and_hms_opt(hour, 0, 0).unwrap()).unwrap();
        for pillar in p.iter() {
            prop_assert!(pillar.is_valid());
        }
    }
}
