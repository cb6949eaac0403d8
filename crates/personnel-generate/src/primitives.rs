//! Random primitive providers.
//!
//! Each provider draws one value within the supplied bounds from the
//! caller's generator; nothing here keeps state of its own.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use rand::Rng;
use rand::seq::{IndexedRandom, index};

use personnel_core::{EMPLOYEE_ID_MIN, EMPLOYEE_ID_SPACE, EmployeeId};

use crate::errors::GenerationError;
use crate::model::CountRange;

/// Quarter-hour minute marks used for shift start times.
pub const QUARTER_HOURS: &[u32] = &[0, 15, 30, 45];

/// Uniform calendar date in `[min, max]`.
pub fn date_in_range<R: Rng + ?Sized>(
    rng: &mut R,
    min: NaiveDate,
    max: NaiveDate,
) -> Result<NaiveDate, GenerationError> {
    if max < min {
        return Err(GenerationError::InvalidRange(format!(
            "date max {max} precedes min {min}"
        )));
    }
    Ok(offset_days(rng, min, max))
}

/// Uniform calendar date between `a` and `b`, in either order.
pub fn date_between<R: Rng + ?Sized>(rng: &mut R, a: NaiveDate, b: NaiveDate) -> NaiveDate {
    if a <= b {
        offset_days(rng, a, b)
    } else {
        offset_days(rng, b, a)
    }
}

fn offset_days<R: Rng + ?Sized>(rng: &mut R, min: NaiveDate, max: NaiveDate) -> NaiveDate {
    let span = (max - min).num_days();
    min + TimeDelta::days(rng.random_range(0..=span))
}

/// Uniform instant at one-minute granularity in `[min, max]`.
pub fn timestamp_minute<R: Rng + ?Sized>(
    rng: &mut R,
    min: NaiveDateTime,
    max: NaiveDateTime,
) -> Result<NaiveDateTime, GenerationError> {
    let start = minute_ceil(min);
    if max < start {
        return Err(GenerationError::InvalidRange(format!(
            "timestamp max {max} precedes min {min}"
        )));
    }
    let span = (max - start).num_minutes();
    Ok(start + TimeDelta::minutes(rng.random_range(0..=span)))
}

fn minute_ceil(value: NaiveDateTime) -> NaiveDateTime {
    let truncated = value
        .with_second(0)
        .and_then(|value| value.with_nanosecond(0))
        .unwrap_or(value);
    if truncated < value {
        truncated + TimeDelta::minutes(1)
    } else {
        truncated
    }
}

/// Time of day with an hour in `[min_hour, max_hour]` and a minute drawn
/// from `minutes`.
pub fn time_of_day<R: Rng + ?Sized>(
    rng: &mut R,
    min_hour: u32,
    max_hour: u32,
    minutes: &[u32],
) -> Result<NaiveTime, GenerationError> {
    if min_hour > max_hour || max_hour > 23 {
        return Err(GenerationError::InvalidRange(format!(
            "hour range {min_hour}..={max_hour} is not within a day"
        )));
    }
    let minute = *minutes.choose(rng).ok_or_else(|| {
        GenerationError::InvalidRange("minute choices must not be empty".to_string())
    })?;
    let hour = rng.random_range(min_hour..=max_hour);
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        GenerationError::InvalidRange(format!("minute {minute} is not a valid minute"))
    })
}

/// `count` distinct nine-digit identifiers with a nonzero leading digit,
/// sampled without replacement in random order.
pub fn unique_employee_ids<R: Rng + ?Sized>(
    rng: &mut R,
    count: u64,
) -> Result<Vec<EmployeeId>, GenerationError> {
    if count > EMPLOYEE_ID_SPACE {
        return Err(GenerationError::Exhausted {
            requested: count,
            available: EMPLOYEE_ID_SPACE,
        });
    }
    let ids = index::sample(rng, EMPLOYEE_ID_SPACE as usize, count as usize)
        .into_iter()
        .map(|offset| EMPLOYEE_ID_MIN + offset as EmployeeId)
        .collect();
    Ok(ids)
}

/// Uniform count within an inclusive range.
pub fn count_in<R: Rng + ?Sized>(rng: &mut R, range: CountRange) -> u32 {
    rng.random_range(range.min..=range.max)
}

/// Uniform pick from a non-empty reference list.
pub fn pick<R: Rng + ?Sized>(rng: &mut R, values: &[&'static str]) -> &'static str {
    values.choose(rng).copied().unwrap_or_default()
}

/// Uniform monetary amount in cents.
pub fn amount_cents<R: Rng + ?Sized>(rng: &mut R, min_cents: i64, max_cents: i64) -> i64 {
    rng.random_range(min_cents..=max_cents)
}
