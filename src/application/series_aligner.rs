// Series aligner - Expands a sparse series onto a gap-free period axis
use crate::domain::data_series::DataSeries;
use crate::domain::error::ChartError;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub times: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

impl AlignedSeries {
    pub fn min_max_values(&self) -> Option<(f64, f64)> {
        let mut values = self.values.iter().copied();
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// One value per period between the series' first and last timestamps.
///
/// Periods without an item are filled with zero: for count-style metrics a
/// missing period means no activity, so nothing is interpolated.
pub fn align(series: &DataSeries) -> Result<AlignedSeries, ChartError> {
    let (min_time, max_time) = series.min_max_times()?;
    let times = series.interval.periods_between(min_time, max_time);
    let values = times
        .iter()
        .map(|time| series.value_at(*time) as f64)
        .collect();

    Ok(AlignedSeries { times, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::data_series::DataItem;
    use crate::domain::interval::Interval;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, 1, 0, 0, 0).unwrap()
    }

    fn series(interval: Interval, points: &[(i32, u32, i64)]) -> DataSeries {
        let mut series = DataSeries::new("Orders".to_string(), interval);
        for (y, m, v) in points {
            series.add_item(DataItem::new("Orders".to_string(), utc(*y, *m), *v));
        }
        series
    }

    #[test]
    fn test_align_zero_fills_missing_month() {
        let ds = series(Interval::Month, &[(2024, 1, 100), (2024, 3, 150)]);
        let aligned = align(&ds).unwrap();

        assert_eq!(aligned.times, vec![utc(2024, 1), utc(2024, 2), utc(2024, 3)]);
        assert_eq!(aligned.values, vec![100.0, 0.0, 150.0]);
    }

    #[test]
    fn test_align_length_matches_period_count() {
        let ds = series(
            Interval::Month,
            &[(2022, 11, 4), (2023, 6, 9), (2024, 2, 12)],
        );
        let aligned = align(&ds).unwrap();

        // Nov 2022 through Feb 2024 inclusive
        assert_eq!(aligned.times.len(), 16);
        assert_eq!(aligned.values[0], 4.0);
        assert_eq!(aligned.values[7], 9.0);
        assert_eq!(aligned.values[15], 12.0);
        assert_eq!(aligned.values.iter().filter(|v| **v != 0.0).count(), 3);
    }

    #[test]
    fn test_align_quarterly_steps() {
        let ds = series(Interval::Quarter, &[(2023, 8, 10), (2024, 2, 30)]);
        let aligned = align(&ds).unwrap();

        assert_eq!(aligned.times, vec![utc(2023, 7), utc(2023, 10), utc(2024, 1)]);
        assert_eq!(aligned.values, vec![10.0, 0.0, 30.0]);
    }

    #[test]
    fn test_align_empty_series() {
        let ds = DataSeries::new("Nothing".to_string(), Interval::Month);
        assert_eq!(
            align(&ds),
            Err(ChartError::EmptySeries("Nothing".to_string()))
        );
    }

    #[test]
    fn test_min_max_values_includes_zero_fill() {
        let ds = series(Interval::Month, &[(2024, 1, 100), (2024, 3, 150)]);
        let aligned = align(&ds).unwrap();
        assert_eq!(aligned.min_max_values(), Some((0.0, 150.0)));
    }
}
