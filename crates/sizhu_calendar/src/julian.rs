//! Julian day conversions for local civil time.
//!
//! Day numbers are counted in local standard time: the local day number of an
//! instant is `floor(jd_ut + 0.5 + offset_hours / 24)`.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Julian Date of J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Offset between chrono's day count (0001-01-01 = day 1) and the Julian day number.
const CE_TO_JDN: i64 = 1_721_425;

/// Julian day number of a civil date (noon-based integer).
pub fn date_to_jdn(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 + CE_TO_JDN
}

/// Civil date of a Julian day number.
pub fn jdn_to_date(jdn: i64) -> Option<NaiveDate> {
    i32::try_from(jdn - CE_TO_JDN)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

/// Julian Date (UT) of a local civil date-time.
pub fn civil_to_jd_ut(dt: NaiveDateTime, utc_offset_hours: f64) -> f64 {
    let day_fraction = dt.num_seconds_from_midnight() as f64 / 86_400.0;
    date_to_jdn(dt.date()) as f64 - 0.5 + day_fraction - utc_offset_hours / 24.0
}

/// Local day number containing a UT instant.
pub fn local_day_number(jd_ut: f64, utc_offset_hours: f64) -> i64 {
    (jd_ut + 0.5 + utc_offset_hours / 24.0).floor() as i64
}

/// UT Julian Date of local midnight starting the given day number.
pub fn local_midnight_jd_ut(jdn: i64, utc_offset_hours: f64) -> f64 {
    jdn as f64 - 0.5 - utc_offset_hours / 24.0
}

/// Decimal year of a Julian Date, adequate for ΔT polynomials.
pub fn jd_to_decimal_year(jd: f64) -> f64 {
    2000.0 + (jd - J2000_JD) / 365.2425
}

/// ΔT = TT − UT in seconds (polynomial fits, Espenak & Meeus).
pub fn delta_t_seconds(year: f64) -> f64 {
    let long_term = |y: f64| {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    };
    match year {
        y if (1900.0..1920.0).contains(&y) => {
            let t = y - 1900.0;
            -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
                - 0.000197 * t.powi(4)
        }
        y if (1920.0..1941.0).contains(&y) => {
            let t = y - 1920.0;
            21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
        }
        y if (1941.0..1961.0).contains(&y) => {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
        }
        y if (1961.0..1986.0).contains(&y) => {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
        }
        y if (1986.0..2005.0).contains(&y) => {
            let t = y - 2000.0;
            63.86 + 0.3345 * t - 0.060374 * t.powi(2)
                + 0.0017275 * t.powi(3)
                + 0.000651814 * t.powi(4)
                + 0.00002373599 * t.powi(5)
        }
        y if (2005.0..2050.0).contains(&y) => {
            let t = y - 2000.0;
            62.92 + 0.32217 * t + 0.005589 * t.powi(2)
        }
        y if (2050.0..2150.0).contains(&y) => long_term(y) - 0.5628 * (2150.0 - y),
        y => long_term(y),
    }
}

/// ΔT in days at a UT Julian Date.
pub fn delta_t_days(jd_ut: f64) -> f64 {
    delta_t_seconds(jd_to_decimal_year(jd_ut)) / 86_400.0
}

/// Local civil date-time of a UT instant, truncated to whole seconds.
pub fn jd_ut_to_civil(jd_ut: f64, utc_offset_hours: f64) -> Option<NaiveDateTime> {
    let local = jd_ut + 0.5 + utc_offset_hours / 24.0;
    let jdn = local.floor() as i64;
    let secs = ((local - local.floor()) * 86_400.0).floor() as u32;
    jdn_to_date(jdn)?.and_hms_opt(secs / 3600, (secs / 60) % 60, secs % 60)
}
