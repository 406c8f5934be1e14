// Annotation engine - Period-over-period comparisons and their chart labels
use crate::domain::chart::AnnotationPoint;
use crate::domain::data_series::DataSeries;
use crate::domain::error::ChartError;
use crate::domain::format::abbreviate;
use crate::domain::interval::month_continuous;
use chrono::{DateTime, Months, Utc};

/// Which comparison points to annotate, and whether to append percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationFlags {
    pub now: bool,
    pub month_ago: bool,
    pub quarter_ago: bool,
    pub year_ago: bool,
    pub show_percentage: bool,
}

impl AnnotationFlags {
    pub fn any(&self) -> bool {
        self.now || self.month_ago || self.quarter_ago || self.year_ago
    }
}

/// Latest value of a series compared with one month, quarter, and year earlier.
#[derive(Debug, Clone, PartialEq)]
pub struct XoXRecord {
    pub time: DateTime<Utc>,
    pub value: i64,
    pub time_month_ago: DateTime<Utc>,
    pub month_ago_value: i64,
    pub time_quarter_ago: DateTime<Utc>,
    pub quarter_ago_value: i64,
    pub time_year_ago: DateTime<Utc>,
    pub year_ago_value: i64,
    /// `None` when the earlier value is zero.
    pub mom: Option<f64>,
    pub qoq: Option<f64>,
    pub yoy: Option<f64>,
}

/// Percentage change from `previous` to `current`, undefined for a zero base.
pub fn percent_change(previous: i64, current: i64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    let delta = current as i128 - previous as i128;
    Some(delta as f64 * 100.0 / previous as f64)
}

fn months_before(time: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    time.checked_sub_months(Months::new(months)).unwrap_or(time)
}

/// Compares the latest item against exact lookups 1, 3 and 12 months earlier.
///
/// A comparison period with no item counts as zero, the same policy the
/// series aligner uses. On sparse series this reads as a drop to zero rather
/// than missing data, and the matching percentage becomes undefined.
pub fn compute_xox(series: &DataSeries) -> Result<XoXRecord, ChartError> {
    let last = series.last()?;
    let time_month_ago = months_before(last.time, 1);
    let time_quarter_ago = months_before(last.time, 3);
    let time_year_ago = months_before(last.time, 12);

    let month_ago_value = series.value_at(time_month_ago);
    let quarter_ago_value = series.value_at(time_quarter_ago);
    let year_ago_value = series.value_at(time_year_ago);

    Ok(XoXRecord {
        time: last.time,
        value: last.value,
        time_month_ago,
        month_ago_value,
        time_quarter_ago,
        quarter_ago_value,
        time_year_ago,
        year_ago_value,
        mom: percent_change(month_ago_value, last.value),
        qoq: percent_change(quarter_ago_value, last.value),
        yoy: percent_change(year_ago_value, last.value),
    })
}

fn percentage_suffix(pct: Option<f64>, show: bool) -> String {
    match pct {
        Some(pct) if show => format!(", {}%", pct.trunc() as i64),
        _ => String::new(),
    }
}

/// Annotation points in the order now, month, quarter, year, placed on the
/// continuous month axis.
pub fn build_annotations(record: &XoXRecord, flags: &AnnotationFlags) -> Vec<AnnotationPoint> {
    let mut points = Vec::new();

    if flags.now {
        points.push(AnnotationPoint {
            x: month_continuous(record.time),
            y: record.value as f64,
            label: abbreviate(record.value),
        });
    }
    if flags.month_ago {
        points.push(AnnotationPoint {
            x: month_continuous(record.time_month_ago),
            y: record.month_ago_value as f64,
            label: format!("M: {}", abbreviate(record.month_ago_value)),
        });
    }
    if flags.quarter_ago {
        points.push(AnnotationPoint {
            x: month_continuous(record.time_quarter_ago),
            y: record.quarter_ago_value as f64,
            label: format!(
                "Q: {}{}",
                abbreviate(record.quarter_ago_value),
                percentage_suffix(record.qoq, flags.show_percentage)
            ),
        });
    }
    if flags.year_ago {
        points.push(AnnotationPoint {
            x: month_continuous(record.time_year_ago),
            y: record.year_ago_value as f64,
            label: format!(
                "Y: {}{}",
                abbreviate(record.year_ago_value),
                percentage_suffix(record.yoy, flags.show_percentage)
            ),
        });
    }

    points
}
