//! Cross-field predicates checked after a candidate value is drawn.
//!
//! Every predicate is pure; callers repair a violation with a closed-form
//! fallback instead of re-sampling.

use chrono::{Datelike, NaiveDate};

/// Youngest allowed age at hire.
pub const MIN_HIRE_AGE: i32 = 18;
/// Oldest allowed age at hire.
pub const MAX_HIRE_AGE: i32 = 65;

/// True when there is no termination date or the hire strictly precedes it.
pub fn hire_before_termination(hire: NaiveDate, termination: Option<NaiveDate>) -> bool {
    match termination {
        Some(termination) => hire < termination,
        None => true,
    }
}

/// Whole years between `birth` and `on`, decremented when the anniversary
/// has not been reached yet.
pub fn age_at(on: NaiveDate, birth: NaiveDate) -> i32 {
    let mut years = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years
}

/// True when the age at hire lies in `[min_age, max_age]`.
pub fn birth_within_age_range(
    hire: NaiveDate,
    birth: NaiveDate,
    min_age: i32,
    max_age: i32,
) -> bool {
    let age = age_at(hire, birth);
    min_age <= age && age <= max_age
}

/// True when the pay date is on or after the hire date.
pub fn hire_before_pay(hire: NaiveDate, pay: NaiveDate) -> bool {
    pay >= hire
}
