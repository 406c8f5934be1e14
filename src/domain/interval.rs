// Calendar periods used as the time axis of a chart
use super::error::ChartError;
use chrono::{DateTime, Datelike, Months, NaiveDate, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    Month,
    Quarter,
    Year,
}

impl Interval {
    pub fn months_per_period(self) -> u32 {
        match self {
            Interval::Month => 1,
            Interval::Quarter => 3,
            Interval::Year => 12,
        }
    }

    /// Start of the period containing `time`, at midnight UTC.
    pub fn period_start(self, time: DateTime<Utc>) -> DateTime<Utc> {
        let month = match self {
            Interval::Month => time.month(),
            Interval::Quarter => (time.month0() / 3) * 3 + 1,
            Interval::Year => 1,
        };
        NaiveDate::from_ymd_opt(time.year(), month, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .unwrap_or(time)
    }

    pub fn next_period(self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        start.checked_add_months(Months::new(self.months_per_period()))
    }

    /// Every period start from `min` to `max` inclusive, both snapped to period starts.
    pub fn periods_between(self, min: DateTime<Utc>, max: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let end = self.period_start(max);
        let mut current = self.period_start(min);
        let mut periods = Vec::new();

        while current <= end {
            periods.push(current);
            match self.next_period(current) {
                Some(next) => current = next,
                None => break,
            }
        }

        periods
    }

    /// Position of the period on a continuous axis with one unit per period.
    pub fn continuous_index(self, time: DateTime<Utc>) -> f64 {
        let year = time.year() as i64;
        let index = match self {
            Interval::Month => year * 12 + time.month0() as i64,
            Interval::Quarter => year * 4 + (time.month0() / 3) as i64,
            Interval::Year => year,
        };
        index as f64
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Interval::Month => "month",
            Interval::Quarter => "quarter",
            Interval::Year => "year",
        };
        f.write_str(name)
    }
}

impl FromStr for Interval {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" | "monthly" => Ok(Interval::Month),
            "quarter" | "quarterly" => Ok(Interval::Quarter),
            "year" | "yearly" => Ok(Interval::Year),
            other => Err(ChartError::UnknownInterval(other.to_string())),
        }
    }
}

/// Continuous month number (year * 12 + zero-based month), used to place annotations.
pub fn month_continuous(time: DateTime<Utc>) -> f64 {
    Interval::Month.continuous_index(time)
}

/// Canonical series key: RFC3339 in UTC with a `Z` suffix, e.g. `2024-01-01T00:00:00Z`.
pub fn canonical_key(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Quarter label such as `2024-Q1`.
pub fn format_quarter(time: DateTime<Utc>) -> String {
    format!("{}-Q{}", time.year(), time.month0() / 3 + 1)
}
