use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};

/// Inclusive calendar range bounding every generated date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateWindow {
    /// 2020-01-01 through 2029-12-31.
    pub fn global() -> Self {
        Self {
            min: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            max: NaiveDate::from_ymd_opt(2029, 12, 31).unwrap_or_default(),
        }
    }

    /// First representable minute of the window.
    pub fn timestamp_floor(&self) -> NaiveDateTime {
        self.min.and_time(NaiveTime::MIN)
    }

    /// Last representable minute of the window (23:59 on the ceiling date).
    pub fn timestamp_ceiling(&self) -> NaiveDateTime {
        self.max
            .and_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }
}

/// Calendar-aware "same day, `years` earlier". Feb 29 maps to Feb 28.
pub fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_window_spans_the_decade() {
        let window = DateWindow::global();
        assert_eq!(window.min.to_string(), "2020-01-01");
        assert_eq!(window.max.to_string(), "2029-12-31");
        assert_eq!(
            window.timestamp_ceiling().format("%Y-%m-%d %H:%M").to_string(),
            "2029-12-31 23:59"
        );
    }

    #[test]
    fn years_before_clamps_leap_day() {
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            years_before(leap, 18),
            NaiveDate::from_ymd_opt(2006, 2, 28).unwrap()
        );
        assert_eq!(
            years_before(leap, 4),
            NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()
        );
    }
}
