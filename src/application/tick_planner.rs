// Tick planner - Value-axis and time-axis ticks and gridlines
use crate::domain::chart::{GridKind, GridLine, Tick};
use crate::domain::format::{abbreviate, contains_word, currency_prefix};
use crate::domain::interval::{format_quarter, Interval};
use chrono::{DateTime, Datelike, Utc};

/// Smallest step on the integer metric scale, also used for a single-point range.
const MIN_STEP: f64 = 1.0;

/// Rounds a raw step to the nearest of 1, 2, 5 or 10 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let base = 10f64.powf(raw.log10().floor());
    let fraction = raw / base;
    let nice = if fraction < 1.5 {
        1.0
    } else if fraction < 3.0 {
        2.0
    } else if fraction < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

/// Round tick values covering `[min, max]`, roughly `num_ticks` of them.
///
/// The first tick is at or below `min` and the last at or above `max`, so the
/// axis may extend slightly past the data. Values are integers, so the step is
/// never below 1 and narrow ranges get fewer ticks.
pub fn pretty_ticks(num_ticks: usize, min: f64, max: f64) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let range = max - min;
    let step = if range > 0.0 {
        nice_step(range / num_ticks.max(1) as f64).max(MIN_STEP)
    } else {
        MIN_STEP
    };

    let start = (min / step).floor() * step;
    let mut ticks = vec![start];
    let mut i = 1;
    loop {
        let tick = start + i as f64 * step;
        ticks.push(tick);
        if tick >= max {
            break;
        }
        i += 1;
    }
    ticks
}

/// Labels each tick value with `format`, rounding to the integer metric scale.
pub fn value_ticks(values: &[f64], format: impl Fn(i64) -> String) -> Vec<Tick> {
    values
        .iter()
        .map(|v| Tick {
            position: *v,
            label: format(v.round() as i64),
        })
        .collect()
}

pub fn value_gridlines(values: &[f64]) -> Vec<GridLine> {
    values
        .iter()
        .map(|v| GridLine {
            position: *v,
            kind: GridKind::Minor,
        })
        .collect()
}

/// One tick and gridline per period boundary from `min_time` to `max_time`.
///
/// Positions use the interval's continuous index. Gridlines at the start of a
/// calendar year are major, all others minor.
pub fn time_ticks(
    interval: Interval,
    min_time: DateTime<Utc>,
    max_time: DateTime<Utc>,
    format: impl Fn(DateTime<Utc>) -> String,
) -> (Vec<Tick>, Vec<GridLine>) {
    let periods = interval.periods_between(min_time, max_time);
    let mut ticks = Vec::with_capacity(periods.len());
    let mut gridlines = Vec::with_capacity(periods.len());

    for period in periods {
        let position = interval.continuous_index(period);
        ticks.push(Tick {
            position,
            label: format(period),
        });
        let kind = if period.month() == 1 {
            GridKind::Major
        } else {
            GridKind::Minor
        };
        gridlines.push(GridLine { position, kind });
    }

    (ticks, gridlines)
}

/// Default time-axis label for an interval: `Jan '24`, `2024-Q1`, or `2024`.
pub fn x_tick_formatter(interval: Interval) -> fn(DateTime<Utc>) -> String {
    match interval {
        Interval::Month => |t: DateTime<Utc>| t.format("%b '%y").to_string(),
        Interval::Quarter => format_quarter,
        Interval::Year => |t: DateTime<Utc>| t.format("%Y").to_string(),
    }
}

/// Default value-axis label: abbreviated, with a dollar sign for MRR series.
pub fn y_tick_formatter(series_name: &str) -> impl Fn(i64) -> String + use<> {
    let currency = contains_word(series_name, "mrr");
    move |value| {
        let abbr = abbreviate(value);
        if currency {
            currency_prefix("$", &abbr)
        } else {
            abbr
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, 1, 0, 0, 0).unwrap()
    }

    fn assert_covers(ticks: &[f64], min: f64, max: f64) {
        assert!(ticks.len() >= 2, "too few ticks: {:?}", ticks);
        assert!(ticks[0] <= min, "{:?} does not start at or below {}", ticks, min);
        assert!(*ticks.last().unwrap() >= max, "{:?} does not reach {}", ticks, max);
        assert!(ticks.windows(2).all(|w| w[0] < w[1]), "not increasing: {:?}", ticks);
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(1.2), 1.0);
        assert_eq!(nice_step(23.0), 20.0);
        assert!((nice_step(0.04) - 0.05).abs() < 1e-12);
        assert_eq!(nice_step(800.0), 1000.0);
    }

    #[test]
    fn test_pretty_ticks_covers_range() {
        let ticks = pretty_ticks(7, 0.0, 150.0);
        assert_eq!(ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0, 120.0, 140.0, 160.0]);

        for (n, min, max) in [
            (7, 13.0, 987.0),
            (10, -42.0, 17.0),
            (5, 1_000_003.0, 1_250_000.0),
            (3, 0.0, 1.0),
            (1, 5.0, 6.0),
        ] {
            assert_covers(&pretty_ticks(n, min, max), min, max);
        }
    }

    #[test]
    fn test_pretty_ticks_degenerate_range() {
        let ticks = pretty_ticks(7, 5.0, 5.0);
        assert_covers(&ticks, 5.0, 5.0);
        assert_eq!(ticks, vec![5.0, 6.0]);

        assert_covers(&pretty_ticks(0, 0.0, 0.0), 0.0, 0.0);
    }

    #[test]
    fn test_narrow_integer_range_has_distinct_labels() {
        let values = pretty_ticks(7, 40.0, 42.0);
        assert_eq!(values, vec![40.0, 41.0, 42.0]);

        let ticks = value_ticks(&values, y_tick_formatter("Customers"));
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["40", "41", "42"]);
        assert_eq!(pretty_ticks(3, 0.0, 1.0), vec![0.0, 1.0]);
    }

    #[test]
    fn test_pretty_ticks_swapped_and_non_finite() {
        assert_covers(&pretty_ticks(5, 90.0, 10.0), 10.0, 90.0);
        assert!(pretty_ticks(5, f64::NAN, 10.0).is_empty());
    }

    #[test]
    fn test_time_ticks_monthly_major_on_january() {
        let (ticks, gridlines) = time_ticks(
            Interval::Month,
            utc(2023, 11),
            utc(2024, 2),
            x_tick_formatter(Interval::Month),
        );

        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Nov '23", "Dec '23", "Jan '24", "Feb '24"]);
        let kinds: Vec<GridKind> = gridlines.iter().map(|g| g.kind).collect();
        assert_eq!(
            kinds,
            vec![GridKind::Minor, GridKind::Minor, GridKind::Major, GridKind::Minor]
        );
        assert_eq!(ticks[1].position + 1.0, ticks[2].position);
    }

    #[test]
    fn test_time_ticks_quarterly_labels() {
        let (ticks, _) = time_ticks(
            Interval::Quarter,
            utc(2023, 10),
            utc(2024, 4),
            x_tick_formatter(Interval::Quarter),
        );
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["2023-Q4", "2024-Q1", "2024-Q2"]);
    }

    #[test]
    fn test_y_tick_formatter_currency() {
        assert_eq!(y_tick_formatter("Total MRR")(25_000), "$25K");
        assert_eq!(y_tick_formatter("Active users")(25_000), "25K");
    }
}
