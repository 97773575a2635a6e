use crate::error::{BudgetError, Result};
use chrono::{Datelike, Local, NaiveDate};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month, normalized to its first day.
///
/// Ordering is calendar order: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Returns `None` when `month` is outside `1..=12` or the year is outside
    /// the range chrono can represent.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parses month-picker input in the format "YYYY-MM".
    ///
    /// Both parts are read as plain integers, so "2025-3" is accepted as March.
    pub fn parse_input(input: &str) -> Result<Self> {
        let invalid = || BudgetError::InvalidMonthInput(input.to_string());

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let mut parts = trimmed.split('-');
        let year = parts
            .next()
            .and_then(|p| p.trim().parse::<i32>().ok())
            .ok_or_else(invalid)?;
        let month = parts
            .next()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Self::new(year, month).ok_or_else(invalid)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Zero-padded "YYYY-MM" key.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Long month name followed by the year, e.g. "January 2025".
    pub fn label(&self) -> String {
        match self.first_day() {
            Some(date) => date.format("%B %Y").to_string(),
            None => self.key(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = BudgetError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse_input(&value)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.key()
    }
}

impl JsonSchema for MonthKey {
    fn schema_name() -> String {
        "MonthKey".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

/// Inclusive start/end pair defining the active month columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MonthRange {
    pub start: MonthKey,
    pub end: MonthKey,
}

impl MonthRange {
    pub fn new(start: MonthKey, end: MonthKey) -> Self {
        Self { start, end }
    }

    /// January through December of `year`.
    pub fn calendar_year(year: i32) -> Option<Self> {
        Some(Self {
            start: MonthKey::new(year, 1)?,
            end: MonthKey::new(year, 12)?,
        })
    }

    pub fn current_year() -> Self {
        let year = Local::now().date_naive().year();
        Self {
            start: MonthKey { year, month: 1 },
            end: MonthKey { year, month: 12 },
        }
    }

    pub fn resolve(&self) -> Vec<MonthKey> {
        resolve(self)
    }

    /// Number of resolved months, without building the list.
    pub fn month_count(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        (months_between(self.start, self.end) + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Expands a range into its months in calendar order.
///
/// An inverted range resolves to no months at all.
pub fn resolve(range: &MonthRange) -> Vec<MonthKey> {
    let mut months = Vec::with_capacity(range.month_count());

    let mut current = range.start;
    while current <= range.end {
        months.push(current);
        current = current.next();
    }

    months
}

pub fn months_between(start: MonthKey, end: MonthKey) -> i64 {
    let year_diff = end.year as i64 - start.year as i64;
    let month_diff = end.month as i64 - start.month as i64;
    year_diff * 12 + month_diff
}

/// Column header handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthColumn {
    pub index: usize,
    pub month: MonthKey,
    pub key: String,
    pub label: String,
}

pub fn month_columns(range: &MonthRange) -> Vec<MonthColumn> {
    resolve(range)
        .into_iter()
        .enumerate()
        .map(|(index, month)| MonthColumn {
            index,
            month,
            key: month.key(),
            label: month.label(),
        })
        .collect()
}
