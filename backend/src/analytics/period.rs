//! Period boundary arithmetic for month and year windows.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("month {0} is outside 1-12")]
    InvalidMonth(i64),
    #[error("year {0} is outside 1-9999")]
    InvalidYear(i64),
}

impl PeriodError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidMonth(_) => "month",
            Self::InvalidYear(_) => "year",
        }
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True when `[start, end]` shares at least one day with this window.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end && end >= self.start
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |day| *day <= self.end)
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// A validated calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    first_day: NaiveDate,
}

impl Period {
    /// Out-of-range months are rejected rather than wrapped into another year.
    pub fn new(year: i64, month: i64) -> Result<Self, PeriodError> {
        if !(i64::from(MIN_YEAR)..=i64::from(MAX_YEAR)).contains(&year) {
            return Err(PeriodError::InvalidYear(year));
        }
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }

        NaiveDate::from_ymd_opt(year as i32, month as u32, 1)
            .map(|first_day| Self { first_day })
            .ok_or(PeriodError::InvalidMonth(month))
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day + Months::new(1) - Days::new(1)
    }

    pub fn previous(&self) -> Self {
        Self {
            first_day: self.first_day - Months::new(1),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            first_day: self.first_day + Months::new(1),
        }
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn month_window(&self) -> DateWindow {
        DateWindow::new(self.first_day, self.last_day())
    }

    pub fn year_window(&self) -> DateWindow {
        let start = self.first_day - Months::new(self.month0());
        DateWindow::new(start, start + Months::new(12) - Days::new(1))
    }

    /// Sale month key, `YYYY-MM`.
    pub fn key(&self) -> String {
        self.first_day.format("%Y-%m").to_string()
    }

    fn month0(&self) -> u32 {
        self.first_day.month0()
    }
}

/// Windows resolved for one reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindows {
    pub year: i32,
    pub month: u32,
    pub month_window: DateWindow,
    pub previous_month_window: DateWindow,
    pub year_window: DateWindow,
}

impl From<Period> for PeriodWindows {
    fn from(period: Period) -> Self {
        Self {
            year: period.year(),
            month: period.month(),
            month_window: period.month_window(),
            previous_month_window: period.previous().month_window(),
            year_window: period.year_window(),
        }
    }
}

impl PeriodWindows {
    pub fn period(&self) -> Period {
        Period {
            first_day: self.month_window.start,
        }
    }
}

/// Month, previous-month and year windows for a reporting period.
pub fn resolve(year: i64, month: i64) -> Result<PeriodWindows, PeriodError> {
    Period::new(year, month).map(PeriodWindows::from)
}
