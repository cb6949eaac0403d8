//! Per-entity row synthesis.
//!
//! Each synthesizer composes the random primitives into one row and then
//! repairs cross-field violations with a closed-form fallback, so every
//! row is produced with bounded work and always satisfies its invariants.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime, TimeDelta, Timelike};
use rand::Rng;
use rand::seq::{IndexedRandom, index};
use tracing::warn;

use personnel_core::catalog::{
    DEPARTMENTS, EMAIL_DOMAINS, FIRST_NAMES, LAST_NAMES, LICENSE_NAMES, NOTES, POSITIONS,
    STREET_NAMES, STREET_SUFFIXES,
};
use personnel_core::{
    DateWindow, Department, EmergencyContact, EmergencyContacts, Employee, EmployeeId,
    EmployeeLicense, EmployeeRoster, MAX_HIRE_AGE, MIN_HIRE_AGE, OncallShift, PayrollEntry,
    Position, birth_within_age_range, hire_before_pay, hire_before_termination, years_before,
};

use crate::errors::GenerationError;
use crate::model::{GenerateOptions, RepairLog};
use crate::primitives::{
    QUARTER_HOURS, amount_cents, count_in, date_between, date_in_range, pick, time_of_day,
    timestamp_minute,
};

/// Repair codes recorded in the generation report.
pub mod repair {
    /// The 18..65 year birth window collapsed; birth set 30 years before hire.
    pub const BIRTH_AGE_WINDOW: &str = "birth_date.age_window";
    /// The drawn birth date failed the age check; birth set 30 years before hire.
    pub const BIRTH_REVALIDATED: &str = "birth_date.revalidated";
    pub const TERMINATION_HIRE_PLUS_30: &str = "termination.hire_plus_30";
    /// The department owns no position; any position was used instead.
    pub const POSITION_ANY_DEPARTMENT: &str = "position.any_department";
    pub const PAY_DATE_CLAMPED: &str = "pay_date.clamped_to_hire";
    pub const LICENSE_EXPIRY_CLAMPED: &str = "license_expiry.clamped_to_ceiling";
    pub const SHIFT_END_CLAMPED: &str = "shift_end.clamped_to_day";
}

/// Age used when the birth date has to be forced.
pub const FALLBACK_HIRE_AGE: u32 = 30;
/// Days added to the hire date when a termination draw is not after it.
pub const TERMINATION_FALLBACK_DAYS: i64 = 30;

const PAYROLL_MIN_CENTS: i64 = 80_000;
const PAYROLL_MAX_CENTS: i64 = 1_500_000;
const LICENSE_MIN_DAYS: i64 = 365;
const LICENSE_MAX_DAYS: i64 = 365 * 5;
const SHIFT_FIRST_START_HOUR: u32 = 6;
const SHIFT_LAST_START_HOUR: u32 = 20;
const SHIFT_MIN_HOURS: u32 = 2;
const SHIFT_MAX_HOURS: u32 = 8;
const LAST_HOUR_OF_DAY: u32 = 23;
const ESCALATION_LEVELS: u8 = 5;

/// Departments from the reference catalog, numbered from 1.
pub fn departments<R: Rng + ?Sized>(
    rng: &mut R,
    window: &DateWindow,
) -> Result<Vec<Department>, GenerationError> {
    let mut rows = Vec::with_capacity(DEPARTMENTS.len());
    for (seed, department_id) in DEPARTMENTS.iter().zip(1_u32..) {
        rows.push(Department {
            department_id,
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            created_at: created_at(rng, window)?,
        });
    }
    Ok(rows)
}

/// Positions from the reference catalog, numbered from 1.
pub fn positions<R: Rng + ?Sized>(
    rng: &mut R,
    window: &DateWindow,
) -> Result<Vec<Position>, GenerationError> {
    let mut rows = Vec::with_capacity(POSITIONS.len());
    for (seed, position_id) in POSITIONS.iter().zip(1_u32..) {
        rows.push(Position {
            position_id,
            title: seed.title.to_string(),
            department_id: seed.department_id,
            description: seed.description.to_string(),
            created_at: created_at(rng, window)?,
        });
    }
    Ok(rows)
}

fn created_at<R: Rng + ?Sized>(
    rng: &mut R,
    window: &DateWindow,
) -> Result<chrono::NaiveDateTime, GenerationError> {
    timestamp_minute(rng, window.timestamp_floor(), window.timestamp_ceiling())
}

/// Builds employee rows one at a time, tracking the emails already issued.
#[derive(Debug)]
pub struct EmployeeSynthesizer<'a> {
    options: &'a GenerateOptions,
    window: DateWindow,
    department_ids: Vec<u32>,
    position_ids: Vec<u32>,
    positions: Vec<(u32, u32)>,
    used_emails: HashSet<String>,
}

impl<'a> EmployeeSynthesizer<'a> {
    pub fn new(
        options: &'a GenerateOptions,
        window: DateWindow,
        departments: &[Department],
        positions: &[Position],
    ) -> Self {
        Self {
            options,
            window,
            department_ids: departments.iter().map(|row| row.department_id).collect(),
            position_ids: positions.iter().map(|row| row.position_id).collect(),
            positions: positions
                .iter()
                .map(|row| (row.department_id, row.position_id))
                .collect(),
            used_emails: HashSet::new(),
        }
    }

    /// Synthesizes the next employee. Managers are drawn from `roster`,
    /// which holds every employee generated so far.
    pub fn synthesize<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        employee_id: EmployeeId,
        roster: &EmployeeRoster,
        repairs: &mut RepairLog,
    ) -> Result<Employee, GenerationError> {
        let first_name = pick(rng, FIRST_NAMES);
        let last_name = pick(rng, LAST_NAMES);
        let email = self.unique_email(rng, first_name, last_name);
        let phone = phone_number(rng);
        let address = format!(
            "{} {} {}",
            rng.random_range(1..=9999),
            pick(rng, STREET_NAMES),
            pick(rng, STREET_SUFFIXES)
        );

        let hire_date = date_in_range(rng, self.window.min, self.window.max)?;
        let birth_date = birth_date_for_hire(rng, hire_date, repairs);
        let termination_date = if rng.random_bool(self.options.termination_rate) {
            Some(termination_after_hire(rng, hire_date, &self.window, repairs))
        } else {
            None
        };

        let (department_id, position_id) = self.assignment(rng, repairs);
        let manager_id = self.manager(rng, roster);
        let emergency_contacts = EmergencyContacts {
            contacts: vec![EmergencyContact {
                name: format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)),
                phone: phone_number(rng),
            }],
        };
        let notes = if rng.random_bool(self.options.note_rate) {
            pick(rng, NOTES).to_string()
        } else {
            String::new()
        };

        Ok(Employee {
            employee_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email,
            phone,
            address,
            birth_date,
            hire_date,
            termination_date,
            active: termination_date.is_none(),
            department_id,
            position_id,
            manager_id,
            emergency_contacts,
            notes,
            created_at: created_at(rng, &self.window)?,
        })
    }

    fn unique_email<R: Rng + ?Sized>(&mut self, rng: &mut R, first: &str, last: &str) -> String {
        let base = format!("{}.{}", first.to_lowercase(), last.to_lowercase());
        let domain = pick(rng, EMAIL_DOMAINS);
        let mut email = format!("{base}@{domain}");
        let mut suffix = 1_u64;
        while self.used_emails.contains(&email) {
            email = format!("{base}{suffix}@{domain}");
            suffix += 1;
        }
        self.used_emails.insert(email.clone());
        email
    }

    fn assignment<R: Rng + ?Sized>(&self, rng: &mut R, repairs: &mut RepairLog) -> (u32, u32) {
        let department_id = self.department_ids.choose(rng).copied().unwrap_or(1);
        let matching: Vec<u32> = self
            .positions
            .iter()
            .filter(|(owner, _)| *owner == department_id)
            .map(|(_, position_id)| *position_id)
            .collect();
        if let Some(position_id) = matching.choose(rng) {
            return (department_id, *position_id);
        }

        // Department/position consistency is not guaranteed on this path.
        repairs.record(repair::POSITION_ANY_DEPARTMENT);
        let position_id = self.position_ids.choose(rng).copied().unwrap_or(1);
        warn!(
            department_id,
            position_id, "department owns no position; assigned a position from any department"
        );
        (department_id, position_id)
    }

    fn manager<R: Rng + ?Sized>(&self, rng: &mut R, roster: &EmployeeRoster) -> Option<EmployeeId> {
        if roster.is_empty() || (roster.len() as u64) < self.options.manager_free_prefix {
            return None;
        }
        if rng.random_bool(self.options.manager_free_rate) {
            return None;
        }
        roster
            .get(rng.random_range(0..roster.len()))
            .map(|manager| manager.employee_id)
    }
}

fn phone_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("+1{}", rng.random_range(2_000_000_000_u64..=9_999_999_999))
}

/// Birth date between 65 and 18 years before `hire`, forced to exactly
/// [`FALLBACK_HIRE_AGE`] years before hire when the window collapses or
/// the draw fails the age check.
pub fn birth_date_for_hire<R: Rng + ?Sized>(
    rng: &mut R,
    hire: NaiveDate,
    repairs: &mut RepairLog,
) -> NaiveDate {
    let earliest = years_before(hire, MAX_HIRE_AGE as u32);
    let latest = years_before(hire, MIN_HIRE_AGE as u32);
    birth_in_window(rng, hire, earliest, latest, repairs)
}

/// Birth date drawn from `[earliest, latest]` and checked against the
/// working-age range at `hire`.
pub fn birth_in_window<R: Rng + ?Sized>(
    rng: &mut R,
    hire: NaiveDate,
    earliest: NaiveDate,
    latest: NaiveDate,
    repairs: &mut RepairLog,
) -> NaiveDate {
    let fallback = years_before(hire, FALLBACK_HIRE_AGE);
    let birth = match date_in_range(rng, earliest, latest) {
        Ok(birth) => birth,
        Err(_) => {
            repairs.record(repair::BIRTH_AGE_WINDOW);
            fallback
        }
    };
    if birth_within_age_range(hire, birth, MIN_HIRE_AGE, MAX_HIRE_AGE) {
        birth
    } else {
        repairs.record(repair::BIRTH_REVALIDATED);
        fallback
    }
}

/// Termination date drawn between hire and the window ceiling; a draw that
/// does not fall after hire becomes hire plus
/// [`TERMINATION_FALLBACK_DAYS`].
pub fn termination_after_hire<R: Rng + ?Sized>(
    rng: &mut R,
    hire: NaiveDate,
    window: &DateWindow,
    repairs: &mut RepairLog,
) -> NaiveDate {
    let drawn = date_between(rng, hire, window.max);
    if hire_before_termination(hire, Some(drawn)) {
        drawn
    } else {
        repairs.record(repair::TERMINATION_HIRE_PLUS_30);
        // Not clamped to the window: a hire on the ceiling terminates after it.
        hire + TimeDelta::days(TERMINATION_FALLBACK_DAYS)
    }
}

/// Payroll entries for every employee, numbered from 1 in roster order.
pub fn payroll<R: Rng + ?Sized>(
    rng: &mut R,
    options: &GenerateOptions,
    roster: &EmployeeRoster,
    window: &DateWindow,
    repairs: &mut RepairLog,
) -> Result<Vec<PayrollEntry>, GenerationError> {
    let mut rows = Vec::new();
    let mut payroll_id = 1_u64;
    for employee in roster {
        for _ in 0..count_in(rng, options.payroll_per_employee) {
            let drawn = date_between(rng, employee.hire_date, window.max);
            let pay_date = if hire_before_pay(employee.hire_date, drawn) {
                drawn
            } else {
                repairs.record(repair::PAY_DATE_CLAMPED);
                employee.hire_date
            };
            rows.push(PayrollEntry {
                payroll_id,
                employee_id: employee.employee_id,
                amount_cents: amount_cents(rng, PAYROLL_MIN_CENTS, PAYROLL_MAX_CENTS),
                pay_date,
                notes: pick(rng, NOTES).to_string(),
                created_at: created_at(rng, window)?,
            });
            payroll_id += 1;
        }
    }
    Ok(rows)
}

/// Licenses for a random subset of the roster, sampled without replacement.
pub fn licenses<R: Rng + ?Sized>(
    rng: &mut R,
    options: &GenerateOptions,
    roster: &EmployeeRoster,
    window: &DateWindow,
    repairs: &mut RepairLog,
) -> Result<Vec<EmployeeLicense>, GenerationError> {
    let holders = options.license_holders(roster.len() as u64) as usize;
    let mut rows = Vec::new();
    let mut license_id = 1_u64;
    for slot in index::sample(rng, roster.len(), holders) {
        let Some(employee) = roster.get(slot) else {
            continue;
        };
        for _ in 0..count_in(rng, options.licenses_per_employee) {
            let license_name = pick(rng, LICENSE_NAMES);
            let issued_date = date_between(rng, employee.hire_date, window.max);
            let span = TimeDelta::days(rng.random_range(LICENSE_MIN_DAYS..=LICENSE_MAX_DAYS));
            let mut expiry_date = issued_date + span;
            if expiry_date > window.max {
                repairs.record(repair::LICENSE_EXPIRY_CLAMPED);
                expiry_date = window.max;
            }
            rows.push(EmployeeLicense {
                license_id,
                employee_id: employee.employee_id,
                license_name: license_name.to_string(),
                issued_date,
                expiry_date,
                notes: pick(rng, NOTES).to_string(),
                created_at: created_at(rng, window)?,
            });
            license_id += 1;
        }
    }
    Ok(rows)
}

/// On-call shifts for every employee, numbered from 1 in roster order.
pub fn oncall_shifts<R: Rng + ?Sized>(
    rng: &mut R,
    options: &GenerateOptions,
    roster: &EmployeeRoster,
    window: &DateWindow,
    repairs: &mut RepairLog,
) -> Result<Vec<OncallShift>, GenerationError> {
    let mut rows = Vec::new();
    let mut shift_id = 1_u64;
    for employee in roster {
        for _ in 0..count_in(rng, options.shifts_per_employee) {
            let day_of_week = rng.random_range(1..=7_u8);
            let (start_time, end_time) = shift_times(rng, repairs)?;
            rows.push(OncallShift {
                shift_id,
                employee_id: employee.employee_id,
                day_of_week,
                start_time,
                end_time,
                escalation_order: rng.random_range(1..=ESCALATION_LEVELS),
                created_at: created_at(rng, window)?,
            });
            shift_id += 1;
        }
    }
    Ok(rows)
}

/// Start within working hours and an end 2 to 8 hours later, clamped to the
/// last hour of the day with the start's minute kept.
pub fn shift_times<R: Rng + ?Sized>(
    rng: &mut R,
    repairs: &mut RepairLog,
) -> Result<(NaiveTime, NaiveTime), GenerationError> {
    let start = time_of_day(rng, SHIFT_FIRST_START_HOUR, SHIFT_LAST_START_HOUR, QUARTER_HOURS)?;
    let mut end_hour = start.hour() + rng.random_range(SHIFT_MIN_HOURS..=SHIFT_MAX_HOURS);
    if end_hour > LAST_HOUR_OF_DAY {
        repairs.record(repair::SHIFT_END_CLAMPED);
        end_hour = LAST_HOUR_OF_DAY;
    }
    let end = NaiveTime::from_hms_opt(end_hour, start.minute(), 0).ok_or_else(|| {
        GenerationError::InvalidRange(format!("shift end {end_hour}:{} is invalid", start.minute()))
    })?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use personnel_core::age_at;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn birth_dates_stay_within_working_age() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut repairs = RepairLog::new();
        for hire in [date(2020, 1, 1), date(2024, 2, 29), date(2029, 12, 31)] {
            for _ in 0..500 {
                let birth = birth_date_for_hire(&mut rng, hire, &mut repairs);
                let age = age_at(hire, birth);
                assert!((18..=65).contains(&age), "age {age} for {birth} hired {hire}");
            }
        }
        assert_eq!(repairs.count(repair::BIRTH_AGE_WINDOW), 0);
    }

    #[test]
    fn termination_on_ceiling_hire_uses_fallback() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut repairs = RepairLog::new();
        let window = DateWindow::global();
        let termination = termination_after_hire(&mut rng, window.max, &window, &mut repairs);
        assert_eq!(termination, date(2030, 1, 30));
        assert!(!window.contains(termination));
        assert_eq!(repairs.count(repair::TERMINATION_HIRE_PLUS_30), 1);
    }

    #[test]
    fn collapsed_birth_window_forces_thirty_years_before_hire() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut repairs = RepairLog::new();
        let hire = date(2024, 2, 29);
        let birth = birth_in_window(&mut rng, hire, date(2006, 1, 1), date(1960, 1, 1), &mut repairs);

        assert_eq!(birth, years_before(hire, 30));
        assert_eq!(birth, date(1994, 2, 28));
        assert_eq!(repairs.count(repair::BIRTH_AGE_WINDOW), 1);
        assert_eq!(repairs.count(repair::BIRTH_REVALIDATED), 0);
    }

    #[test]
    fn underage_birth_is_revalidated() {
        let mut rng = ChaCha8Rng::seed_from_u64(18);
        let mut repairs = RepairLog::new();
        let hire = date(2025, 6, 1);
        let birth = birth_in_window(&mut rng, hire, date(2010, 1, 1), date(2012, 1, 1), &mut repairs);

        assert_eq!(birth, date(1995, 6, 1));
        assert_eq!(repairs.count(repair::BIRTH_AGE_WINDOW), 0);
        assert_eq!(repairs.count(repair::BIRTH_REVALIDATED), 1);
    }

    #[test]
    fn shift_end_keeps_start_minute() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let mut repairs = RepairLog::new();
        for _ in 0..1000 {
            let (start, end) = shift_times(&mut rng, &mut repairs).unwrap();
            assert_eq!(start.minute(), end.minute());
            assert!(end > start);
            assert!(end.hour() <= 23);
            assert!(end.hour() - start.hour() <= 8);
        }
        assert!(repairs.count(repair::SHIFT_END_CLAMPED) > 0);
    }

    #[test]
    fn emails_get_numeric_suffixes_on_collision() {
        let options = GenerateOptions::default();
        let mut synthesizer =
            EmployeeSynthesizer::new(&options, DateWindow::global(), &[], &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let email = synthesizer.unique_email(&mut rng, "Ada", "Lovelace");
            assert!(email.starts_with("ada.lovelace"));
            assert!(seen.insert(email));
        }
    }

    #[test]
    fn department_without_positions_falls_back_to_any_position() {
        let options = GenerateOptions::default();
        let mut rng = ChaCha8Rng::seed_from_u64(15);
        let window = DateWindow::global();
        let departments = departments(&mut rng, &window).unwrap();
        let positions: Vec<Position> = positions(&mut rng, &window)
            .unwrap()
            .into_iter()
            .filter(|position| position.department_id == 1)
            .collect();
        let synthesizer = EmployeeSynthesizer::new(&options, window, &departments, &positions);
        let mut repairs = RepairLog::new();

        for _ in 0..200 {
            let (department_id, position_id) = synthesizer.assignment(&mut rng, &mut repairs);
            assert!((1..=12).contains(&department_id));
            let owner = positions
                .iter()
                .find(|position| position.position_id == position_id)
                .map(|position| position.department_id);
            assert_eq!(owner, Some(1));
        }
        assert!(repairs.count(repair::POSITION_ANY_DEPARTMENT) > 0);
    }

    #[test]
    fn first_employees_have_no_manager() {
        let options = GenerateOptions {
            manager_free_prefix: 3,
            manager_free_rate: 0.0,
            ..GenerateOptions::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(16);
        let window = DateWindow::global();
        let departments = departments(&mut rng, &window).unwrap();
        let positions = positions(&mut rng, &window).unwrap();
        let mut synthesizer = EmployeeSynthesizer::new(&options, window, &departments, &positions);
        let mut repairs = RepairLog::new();
        let mut roster = EmployeeRoster::new();

        for employee_id in 100_000_001..100_000_011 {
            let employee = synthesizer
                .synthesize(&mut rng, employee_id, &roster, &mut repairs)
                .unwrap();
            let slot = roster.len();
            match employee.manager_id {
                None => assert!(slot < 3),
                Some(manager_id) => {
                    assert!(slot >= 3);
                    assert!(roster.slot_of(manager_id).is_some_and(|manager| manager < slot));
                }
            }
            roster.push(employee);
        }
    }
}
