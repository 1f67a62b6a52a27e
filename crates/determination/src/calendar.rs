//! Julian day numbers and local sidereal time.

use astro_core::angle::wrap_to_360;
use astro_core::constants::{DAYS_PER_CENTURY, J2000_JD};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalendarError {
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("julian day {0} is outside the representable calendar")]
    Unrepresentable(f64),
}

fn check(field: &'static str, value: f64, lo: f64, hi: f64) -> Result<(), CalendarError> {
    if value < lo || value > hi || !value.is_finite() {
        return Err(CalendarError::OutOfRange { field, value });
    }
    Ok(())
}

/// Julian day at 0h UT, valid for years 1901 through 2099.
fn julian_day_zero(year: i32, month: u32, day: u32) -> f64 {
    let (y, m, d) = (year as f64, month as f64, day as f64);
    367.0 * y - (7.0 * (y + ((m + 9.0) / 12.0).trunc()) / 4.0).trunc() + (275.0 * m / 9.0).trunc() + d
        + 1_721_013.5
}

/// Julian day of a UT calendar instant.
pub fn julian_day(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: f64,
) -> Result<f64, CalendarError> {
    check("year", year as f64, 1901.0, 2099.0)?;
    check("month", month as f64, 1.0, 12.0)?;
    check("day", day as f64, 1.0, 31.0)?;
    check("hour", hour as f64, 0.0, 23.0)?;
    check("minute", minute as f64, 0.0, 59.0)?;
    check("second", second, 0.0, 59.0)?;

    let ut = hour as f64 + minute as f64 / 60.0 + second / 3600.0;
    Ok(julian_day_zero(year, month, day) + ut / 24.0)
}

pub fn julian_day_of(instant: NaiveDateTime) -> Result<f64, CalendarError> {
    let second = instant.second() as f64 + instant.nanosecond() as f64 * 1e-9;
    julian_day(
        instant.year(),
        instant.month(),
        instant.day(),
        instant.hour(),
        instant.minute(),
        second.min(59.0),
    )
}

/// Calendar instant (UT) of a Julian day, to the millisecond.
pub fn julian_day_to_date(jd: f64) -> Result<NaiveDateTime, CalendarError> {
    let j2000 = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .ok_or(CalendarError::Unrepresentable(J2000_JD))?;
    let millis = ((jd - J2000_JD) * 86_400_000.0).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return Err(CalendarError::Unrepresentable(jd));
    }
    j2000
        .checked_add_signed(Duration::milliseconds(millis as i64))
        .ok_or(CalendarError::Unrepresentable(jd))
}

/// Splits a fraction of a day into whole hours, whole minutes and seconds.
pub fn fraction_of_day_to_hms(fraction: f64) -> (u32, u32, f64) {
    let hours = 24.0 * fraction.rem_euclid(1.0);
    let h = hours.trunc();
    let minutes = (hours - h) * 60.0;
    let m = minutes.trunc();
    (h as u32, m as u32, (minutes - m) * 60.0)
}

/// Local sidereal time (degrees, `[0, 360)`) at east longitude `east_longitude_deg`.
pub fn local_sidereal_time(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: f64,
    east_longitude_deg: f64,
) -> Result<f64, CalendarError> {
    // Validates every field.
    julian_day(year, month, day, hour, minute, second)?;
    let j0 = julian_day_zero(year, month, day);
    let ut = hour as f64 + minute as f64 / 60.0 + second / 3600.0;

    let t0 = (j0 - J2000_JD) / DAYS_PER_CENTURY;
    let greenwich_0 = wrap_to_360(
        100.460_618_4 + 36_000.770_04 * t0 + 0.000_387_933 * t0 * t0 - 2.583e-8 * t0 * t0 * t0,
    );
    let greenwich = greenwich_0 + 360.985_647_24 * ut / 24.0;
    Ok(wrap_to_360(greenwich + east_longitude_deg))
}
