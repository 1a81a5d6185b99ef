//! Apparent solar longitude and solar-term search.
//!
//! Low-precision solar theory (Meeus, Astronomical Algorithms ch. 25):
//! geometric mean longitude plus equation of center, corrected for nutation
//! and aberration. Accuracy ~0.01°, i.e. solar terms to within ~15 minutes.

use crate::error::CalendarError;
use crate::julian::{J2000_JD, delta_t_days};

/// Mean solar motion, days per degree.
const DAYS_PER_DEGREE: f64 = 365.242_19 / 360.0;

/// Convergence threshold for term search, degrees (~0.1 s of solar motion).
const CONVERGENCE_DEG: f64 = 1e-6;

const MAX_ITERATIONS: u32 = 50;

/// Longitude of the first jie term (Start of Spring, 立春).
pub const START_OF_SPRING_DEG: f64 = 315.0;

/// Longitude of the December solstice (冬至).
pub const WINTER_SOLSTICE_DEG: f64 = 270.0;

/// Normalize an angle to [0, 360).
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg % 360.0;
    if r < 0.0 { r + 360.0 } else { r }
}

/// Normalize an angle to [-180, +180).
pub fn normalize_pm180(deg: f64) -> f64 {
    let r = normalize_360(deg);
    if r >= 180.0 { r - 360.0 } else { r }
}

/// Apparent geocentric ecliptic longitude of the Sun at a TT Julian Date, degrees.
pub fn apparent_solar_longitude(jd_tt: f64) -> f64 {
    let t = (jd_tt - J2000_JD) / 36_525.0;
    let l0 = 280.46646 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = (357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t).to_radians();
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();
    let omega = (125.04 - 1_934.136 * t).to_radians();
    normalize_360(l0 + c - 0.005_69 - 0.004_78 * omega.sin())
}

/// Apparent solar longitude at a UT Julian Date, degrees.
pub fn solar_longitude_ut(jd_ut: f64) -> f64 {
    apparent_solar_longitude(jd_ut + delta_t_days(jd_ut))
}

/// UT Julian Date at which the Sun reaches `target_deg`, searched near `jd_guess`.
///
/// The guess must be within ~half a year of the crossing; the nearest crossing wins.
pub fn find_solar_longitude(target_deg: f64, jd_guess: f64) -> Result<f64, CalendarError> {
    let mut jd = jd_guess;
    for _ in 0..MAX_ITERATIONS {
        let diff = normalize_pm180(target_deg - solar_longitude_ut(jd));
        jd += diff * DAYS_PER_DEGREE;
        if diff.abs() < CONVERGENCE_DEG {
            return Ok(jd);
        }
    }
    Err(CalendarError::NoConvergence("solar longitude search"))
}

/// The most recent jie term (315° + 30°·k) at or before `jd_ut`.
pub fn previous_jie(jd_ut: f64) -> Result<f64, CalendarError> {
    let lon = solar_longitude_ut(jd_ut);
    let since = normalize_360(lon - START_OF_SPRING_DEG) % 30.0;
    let target = normalize_360(lon - since);
    let found = find_solar_longitude(target, jd_ut - since * DAYS_PER_DEGREE)?;
    // Round-off can land a hair past the input near a boundary.
    if found > jd_ut {
        find_solar_longitude(normalize_360(target - 30.0), found - 30.0 * DAYS_PER_DEGREE)
    } else {
        Ok(found)
    }
}

/// The first jie term strictly after `jd_ut`.
pub fn next_jie(jd_ut: f64) -> Result<f64, CalendarError> {
    let lon = solar_longitude_ut(jd_ut);
    let until = 30.0 - normalize_360(lon - START_OF_SPRING_DEG) % 30.0;
    let target = normalize_360(lon + until);
    let found = find_solar_longitude(target, jd_ut + until * DAYS_PER_DEGREE)?;
    if found <= jd_ut {
        find_solar_longitude(normalize_360(target + 30.0), found + 30.0 * DAYS_PER_DEGREE)
    } else {
        Ok(found)
    }
}
