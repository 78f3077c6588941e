//! The calendar month used to select which transactions are in view.

use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The most months `Month::recent` will list: one hundred years.
pub const MAX_RECENT_MONTHS: usize = 1200;

/// A calendar month, rendered and parsed as `YYYY-MM` with a zero-padded month.
///
/// Two `Month` values are equal exactly when their `YYYY-MM` renderings are equal, so comparing
/// months is the same as comparing the strings produced by `format_month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    /// 1 through 12.
    month: u32,
}

impl Month {
    /// Creates a month, returning `None` if `month` is not in `1..=12` or the year is out of
    /// `chrono`'s range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The month containing `date`, on the date's own calendar.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns true if `date` falls within this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        Month::of(date) == *self
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        // Month values can only be constructed from valid dates.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// The month before this one.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// A human-readable label such as `March 2024`.
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    /// Returns `count` months ending with the month containing `today`, newest first. At most
    /// `MAX_RECENT_MONTHS` are returned.
    pub fn recent(today: NaiveDate, count: usize) -> Vec<Month> {
        let count = count.min(MAX_RECENT_MONTHS);
        let mut months = Vec::with_capacity(count);
        let mut current = Month::of(today);
        for _ in 0..count {
            months.push(current);
            current = current.previous();
        }
        months
    }
}

/// Renders the month of `date` as `YYYY-MM`.
pub fn format_month(date: NaiveDate) -> String {
    Month::of(date).to_string()
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .with_context(|| format!("Expected a month in the form YYYY-MM, got '{s}'"))?;
        if year.len() != 4 || month.len() != 2 {
            bail!("Expected a month in the form YYYY-MM, got '{s}'");
        }
        let year: i32 = year
            .parse()
            .with_context(|| format!("Invalid year in month '{s}'"))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("Invalid month number in month '{s}'"))?;
        Month::new(year, month).with_context(|| format!("Month out of range in '{s}'"))
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Month::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// A month as offered to a month filter: the `YYYY-MM` value and a label for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthOption {
    pub value: Month,
    pub label: String,
}

impl From<Month> for MonthOption {
    fn from(value: Month) -> Self {
        Self {
            value,
            label: value.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_month_zero_pads() {
        assert_eq!(format_month(date(2024, 3, 5)), "2024-03");
        assert_eq!(format_month(date(2024, 11, 30)), "2024-11");
    }

    #[test]
    fn test_parse_round_trip() {
        let m = Month::from_str("2024-03").unwrap();
        assert_eq!(m.year(), 2024);
        assert_eq!(m.month(), 3);
        assert_eq!(m.to_string(), "2024-03");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Month::from_str("2024-3").is_err());
        assert!(Month::from_str("2024-13").is_err());
        assert!(Month::from_str("2024-00").is_err());
        assert!(Month::from_str("March").is_err());
        assert!(Month::from_str("24-03").is_err());
    }

    #[test]
    fn test_contains() {
        let m = Month::from_str("2024-03").unwrap();
        assert!(m.contains(date(2024, 3, 1)));
        assert!(m.contains(date(2024, 3, 31)));
        assert!(!m.contains(date(2024, 4, 1)));
        assert!(!m.contains(date(2023, 3, 15)));
    }

    #[test]
    fn test_recent_crosses_year_boundary() {
        let months: Vec<String> = Month::recent(date(2024, 2, 14), 4)
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(months, vec!["2024-02", "2024-01", "2023-12", "2023-11"]);
    }

    #[test]
    fn test_recent_is_capped() {
        let months = Month::recent(date(2024, 3, 1), usize::MAX);
        assert_eq!(months.len(), MAX_RECENT_MONTHS);
        assert_eq!(months.last().unwrap().to_string(), "1924-04");
    }

    #[test]
    fn test_recent_twelve() {
        let months = Month::recent(date(2024, 12, 31), 12);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].to_string(), "2024-12");
        assert_eq!(months[11].to_string(), "2024-01");
    }

    #[test]
    fn test_label() {
        let option = MonthOption::from(Month::from_str("2024-03").unwrap());
        assert_eq!(option.label, "March 2024");
        assert_eq!(option.value.to_string(), "2024-03");
    }

    #[test]
    fn test_serde() {
        let m = Month::from_str("2025-01").unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"2025-01\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
