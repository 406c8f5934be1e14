// Chart assembler - Builds a complete line chart description from one series
use crate::application::annotation_engine::{build_annotations, compute_xox, AnnotationFlags};
use crate::application::regression::regression_values;
use crate::application::series_aligner::align;
use crate::application::tick_planner::{
    pretty_ticks, time_ticks, value_gridlines, value_ticks, x_tick_formatter, y_tick_formatter,
};
use crate::domain::chart::{
    AxisPosition, AxisSpec, ChartDescription, Dimensions, Legend, LegendEntry, PlotPoint,
    PlotSeries, SeriesKind, Theme,
};
use crate::domain::data_series::DataSeries;
use crate::domain::error::ChartError;
use crate::domain::interval::Interval;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Relative mismatch allowed between width/height and an explicit aspect ratio.
const ASPECT_TOLERANCE: f64 = 0.01;

pub type DateFormatter = Arc<dyn Fn(DateTime<Utc>) -> String + Send + Sync>;
pub type ValueFormatter = Arc<dyn Fn(i64) -> String + Send + Sync>;

/// Options for line charts. Zero width, height or aspect
/// ratio means "not supplied".
#[derive(Clone, Default)]
pub struct LineChartOptions {
    pub legend: bool,
    pub y_axis_left: bool,
    /// 0 or less: no trend line, 1: linear, 2 and up: polynomial.
    pub regression_degree: i32,
    pub annotations: AnnotationFlags,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
    pub title_suffix_date: Option<DateFormatter>,
    pub title_suffix_value: Option<ValueFormatter>,
}

impl fmt::Debug for LineChartOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineChartOptions")
            .field("legend", &self.legend)
            .field("y_axis_left", &self.y_axis_left)
            .field("regression_degree", &self.regression_degree)
            .field("annotations", &self.annotations)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("title_suffix_date", &self.title_suffix_date.is_some())
            .field("title_suffix_value", &self.title_suffix_value.is_some())
            .finish()
    }
}

/// Resolves chart size from width+height, width+aspect, or height+aspect
/// (aspect = width / height). Nothing supplied leaves the renderer default.
pub fn resolve_dimensions(
    width: u32,
    height: u32,
    aspect_ratio: f64,
) -> Result<Option<Dimensions>, ChartError> {
    if !aspect_ratio.is_finite() || aspect_ratio < 0.0 {
        return Err(ChartError::InvalidDimensions(format!(
            "aspect ratio must be a positive number, got {}",
            aspect_ratio
        )));
    }
    let has_aspect = aspect_ratio > 0.0;

    let dimensions = match (width > 0, height > 0, has_aspect) {
        (false, false, false) => return Ok(None),
        (true, true, _) => {
            if has_aspect {
                let actual = width as f64 / height as f64;
                if ((actual - aspect_ratio) / aspect_ratio).abs() > ASPECT_TOLERANCE {
                    return Err(ChartError::InvalidDimensions(format!(
                        "{}x{} does not match aspect ratio {}",
                        width, height, aspect_ratio
                    )));
                }
            }
            Dimensions { width, height }
        }
        (true, false, true) => Dimensions {
            width,
            height: (width as f64 / aspect_ratio).round() as u32,
        },
        (false, true, true) => Dimensions {
            width: (height as f64 * aspect_ratio).round() as u32,
            height,
        },
        (true, false, false) => {
            return Err(ChartError::InvalidDimensions(
                "width needs a height or an aspect ratio".to_string(),
            ));
        }
        (false, true, false) => {
            return Err(ChartError::InvalidDimensions(
                "height needs a width or an aspect ratio".to_string(),
            ));
        }
        (false, false, true) => {
            return Err(ChartError::InvalidDimensions(
                "aspect ratio needs a width or a height".to_string(),
            ));
        }
    };

    if dimensions.width == 0 || dimensions.height == 0 {
        return Err(ChartError::InvalidDimensions(format!(
            "resolved size {}x{} is empty",
            dimensions.width, dimensions.height
        )));
    }
    Ok(Some(dimensions))
}

/// Series name followed by the optional latest-date and latest-value suffixes.
fn build_title(series: &DataSeries, options: &LineChartOptions) -> Result<String, ChartError> {
    let mut title = series.series_name.clone();
    if options.title_suffix_date.is_none() && options.title_suffix_value.is_none() {
        return Ok(title);
    }

    let last = series.last()?;
    let suffixes = [
        options.title_suffix_date.as_ref().map(|f| f(last.time)),
        options.title_suffix_value.as_ref().map(|f| f(last.value)),
    ];
    for suffix in suffixes.into_iter().flatten() {
        if !suffix.is_empty() {
            title.push_str(" - ");
            title.push_str(&suffix);
        }
    }
    Ok(title)
}

fn regression_series(main: &PlotSeries, degree: i32, theme: &Theme) -> Option<PlotSeries> {
    if degree <= 0 {
        return None;
    }
    let xs: Vec<f64> = main.points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = main.points.iter().map(|p| p.y).collect();

    // A fit through n points has degree at most n - 1
    let degree = (degree as usize).min(xs.len().saturating_sub(1));
    if degree == 0 {
        tracing::debug!("Skipping regression for {}: too few points", main.name);
        return None;
    }

    let Some(fitted) = regression_values(&xs, &ys, degree) else {
        tracing::warn!(
            "Skipping degree {} regression for {}: fit is singular",
            degree,
            main.name
        );
        return None;
    };

    let name = if degree == 1 {
        "Linear Regression".to_string()
    } else {
        format!("Polynomial Regression (degree {})", degree)
    };
    let points = main
        .points
        .iter()
        .zip(fitted)
        .map(|(p, y)| PlotPoint {
            x: p.x,
            time: p.time,
            y,
        })
        .collect();

    Some(PlotSeries {
        name,
        style: theme.regression_style,
        kind: SeriesKind::Regression { degree },
        points,
    })
}

fn annotation_series(
    series: &DataSeries,
    flags: &AnnotationFlags,
    theme: &Theme,
) -> Result<Option<PlotSeries>, ChartError> {
    if !flags.any() {
        return Ok(None);
    }
    if series.interval != Interval::Month {
        tracing::debug!(
            "Annotations for {} skipped: only drawn on monthly charts, got {}",
            series.series_name,
            series.interval
        );
        return Ok(None);
    }

    let record = compute_xox(series)?;
    let annotations = build_annotations(&record, flags);
    if annotations.is_empty() {
        return Ok(None);
    }

    Ok(Some(PlotSeries {
        name: "Annotations".to_string(),
        style: theme.annotation_style,
        kind: SeriesKind::Annotations(annotations),
        points: Vec::new(),
    }))
}

/// Turns one series into a line chart description.
///
/// Fails on an empty series and on irreconcilable dimensions. Numeric edge
/// cases such as undefined percentages or a singular trend fit only drop the
/// affected decoration.
pub fn assemble(
    series: &DataSeries,
    options: &LineChartOptions,
    theme: &Theme,
) -> Result<ChartDescription, ChartError> {
    let aligned = align(series)?;
    let dimensions = resolve_dimensions(options.width, options.height, options.aspect_ratio)?;
    let title = build_title(series, options)?;
    let interval = series.interval;

    let main = PlotSeries {
        name: series.series_name.clone(),
        style: theme.main_style,
        kind: SeriesKind::Values,
        points: aligned
            .times
            .iter()
            .zip(&aligned.values)
            .map(|(time, value)| PlotPoint {
                x: interval.continuous_index(*time),
                time: *time,
                y: *value,
            })
            .collect(),
    };
    let regression = regression_series(&main, options.regression_degree, theme);
    let mut plot_series = vec![main];
    plot_series.extend(regression);

    let (min_value, max_value) = aligned.min_max_values().unwrap_or((0.0, 0.0));
    let y_values = pretty_ticks(theme.y_num_ticks, min_value, max_value);
    let y_axis = AxisSpec {
        position: if options.y_axis_left {
            AxisPosition::Left
        } else {
            AxisPosition::Right
        },
        ticks: value_ticks(&y_values, y_tick_formatter(&series.series_name)),
        gridlines: value_gridlines(&y_values),
        major_style: theme.grid_minor_style,
        minor_style: theme.grid_minor_style,
    };

    let (min_time, max_time) = series.min_max_times()?;
    let (x_ticks, x_gridlines) =
        time_ticks(interval, min_time, max_time, x_tick_formatter(interval));
    let x_axis = AxisSpec {
        position: AxisPosition::Bottom,
        ticks: x_ticks,
        gridlines: x_gridlines,
        major_style: theme.grid_major_style,
        minor_style: theme.grid_minor_style,
    };

    if let Some(annotations) = annotation_series(series, &options.annotations, theme)? {
        plot_series.push(annotations);
    }

    // Bound last so every constructed series gets an entry
    let legend = options.legend.then(|| Legend {
        entries: plot_series
            .iter()
            .enumerate()
            .map(|(series_index, s)| LegendEntry {
                series_index,
                name: s.name.clone(),
                color: s.style.stroke_color,
            })
            .collect(),
    });

    tracing::debug!(
        "Assembled chart {:?}: {} series, {} points",
        title,
        plot_series.len(),
        aligned.times.len()
    );

    Ok(ChartDescription {
        title,
        dimensions,
        padding_top: theme.padding_top,
        series: plot_series,
        x_axis,
        y_axis,
        legend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::GridKind;
    use crate::domain::data_series::DataItem;
    use crate::domain::format::abbreviate;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, 1, 0, 0, 0).unwrap()
    }

    fn series(name: &str, interval: Interval, points: &[(i32, u32, i64)]) -> DataSeries {
        let mut series = DataSeries::new(name.to_string(), interval);
        for (y, m, v) in points {
            series.add_item(DataItem::new(name.to_string(), utc(*y, *m), *v));
        }
        series
    }

    fn full_options() -> LineChartOptions {
        LineChartOptions {
            legend: true,
            y_axis_left: true,
            regression_degree: 1,
            annotations: AnnotationFlags {
                now: true,
                month_ago: true,
                quarter_ago: true,
                year_ago: true,
                show_percentage: true,
            },
            width: 800,
            aspect_ratio: 2.0,
            title_suffix_date: Some(Arc::new(|t: DateTime<Utc>| t.format("%b %Y").to_string())),
            title_suffix_value: Some(Arc::new(abbreviate)),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_dimensions() {
        assert_eq!(resolve_dimensions(0, 0, 0.0).unwrap(), None);
        assert_eq!(
            resolve_dimensions(800, 0, 2.0).unwrap(),
            Some(Dimensions { width: 800, height: 400 })
        );
        assert_eq!(
            resolve_dimensions(0, 300, 1.5).unwrap(),
            Some(Dimensions { width: 450, height: 300 })
        );
        assert_eq!(
            resolve_dimensions(640, 480, 0.0).unwrap(),
            Some(Dimensions { width: 640, height: 480 })
        );
        assert_eq!(
            resolve_dimensions(800, 400, 2.0).unwrap(),
            Some(Dimensions { width: 800, height: 400 })
        );
    }

    #[test]
    fn test_resolve_dimensions_rejects_conflicts() {
        for (w, h, ar) in [
            (800, 300, 2.0),
            (800, 0, 0.0),
            (0, 400, 0.0),
            (0, 0, 1.5),
            (800, 0, -1.0),
            (800, 0, f64::NAN),
            (1, 0, 4.0),
        ] {
            assert!(
                matches!(
                    resolve_dimensions(w, h, ar),
                    Err(ChartError::InvalidDimensions(_))
                ),
                "{}x{} @ {} should be rejected",
                w,
                h,
                ar
            );
        }
    }

    #[test]
    fn test_assemble_width_and_aspect_ratio() {
        let ds = series("Signups", Interval::Month, &[(2024, 1, 10), (2024, 2, 20)]);
        let options = LineChartOptions {
            width: 800,
            height: 0,
            aspect_ratio: 2.0,
            ..Default::default()
        };
        let chart = assemble(&ds, &options, &Theme::default()).unwrap();
        assert_eq!(chart.dimensions, Some(Dimensions { width: 800, height: 400 }));
    }

    #[test]
    fn test_assemble_minimal_chart() {
        let ds = series("Signups", Interval::Month, &[(2024, 1, 100), (2024, 3, 150)]);
        let chart = assemble(&ds, &LineChartOptions::default(), &Theme::default()).unwrap();

        assert_eq!(chart.title, "Signups");
        assert_eq!(chart.dimensions, None);
        assert_eq!(chart.padding_top, 50);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.legend, None);

        let main = &chart.series[0];
        assert_eq!(main.kind, SeriesKind::Values);
        let ys: Vec<f64> = main.points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![100.0, 0.0, 150.0]);

        assert_eq!(chart.y_axis.position, AxisPosition::Right);
        let first = chart.y_axis.ticks.first().unwrap().position;
        let last = chart.y_axis.ticks.last().unwrap().position;
        assert!(first <= 0.0 && last >= 150.0);
        assert_eq!(chart.y_axis.ticks.len(), chart.y_axis.gridlines.len());

        let labels: Vec<&str> = chart.x_axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan '24", "Feb '24", "Mar '24"]);
        assert_eq!(chart.x_axis.gridlines[0].kind, GridKind::Major);
        assert_eq!(chart.x_axis.ticks[0].position, main.points[0].x);
    }

    #[test]
    fn test_assemble_full_chart() {
        let ds = series(
            "Total MRR",
            Interval::Month,
            &[(2023, 6, 1000), (2024, 3, 2000), (2024, 5, 1500), (2024, 6, 1700)],
        );
        let chart = assemble(&ds, &full_options(), &Theme::default()).unwrap();

        assert_eq!(chart.title, "Total MRR - Jun 2024 - 1.7K");
        assert_eq!(chart.dimensions, Some(Dimensions { width: 800, height: 400 }));
        assert_eq!(chart.y_axis.position, AxisPosition::Left);
        assert!(chart.y_axis.ticks.iter().all(|t| t.label.starts_with('$')));

        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.series[0].points.len(), 13);
        assert_eq!(chart.series[1].kind, SeriesKind::Regression { degree: 1 });
        assert_eq!(chart.series[1].points.len(), 13);
        match &chart.series[2].kind {
            SeriesKind::Annotations(points) => {
                let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
                assert_eq!(labels, vec!["1.7K", "M: 1.5K", "Q: 2K, -15%", "Y: 1K, 70%"]);
            }
            other => panic!("expected annotations, got {:?}", other),
        }

        let legend = chart.legend.unwrap();
        let names: Vec<&str> = legend.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Total MRR", "Linear Regression", "Annotations"]);
        assert_eq!(legend.entries[2].series_index, 2);
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let ds = series(
            "Total MRR",
            Interval::Month,
            &[(2023, 1, 400), (2023, 7, 900), (2024, 1, 1300)],
        );
        let options = LineChartOptions {
            regression_degree: 3,
            ..full_options()
        };
        let theme = Theme::default();

        let first = assemble(&ds, &options, &theme).unwrap();
        let second = assemble(&ds, &options, &theme).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_regression_reports_fitted_degree() {
        let ds = series(
            "Total MRR",
            Interval::Month,
            &[(2023, 1, 400), (2023, 2, 900), (2023, 3, 1300)],
        );
        let options = LineChartOptions {
            regression_degree: 5,
            ..Default::default()
        };
        let chart = assemble(&ds, &options, &Theme::default()).unwrap();
        assert_eq!(chart.series[1].kind, SeriesKind::Regression { degree: 2 });
        assert_eq!(chart.series[1].name, "Polynomial Regression (degree 2)");

        let single = series("Total MRR", Interval::Month, &[(2023, 1, 400)]);
        let chart = assemble(&single, &options, &Theme::default()).unwrap();
        assert_eq!(chart.series.len(), 1);
    }

    #[test]
    fn test_assemble_quarterly_skips_annotations() {
        let ds = series(
            "Bookings",
            Interval::Quarter,
            &[(2023, 1, 10), (2023, 10, 40), (2024, 1, 55)],
        );
        let chart = assemble(&ds, &full_options(), &Theme::default()).unwrap();

        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].points.len(), 5);
        let labels: Vec<&str> = chart.x_axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["2023-Q1", "2023-Q2", "2023-Q3", "2023-Q4", "2024-Q1"]);
    }

    #[test]
    fn test_assemble_empty_title_suffix_omitted() {
        let ds = series("Signups", Interval::Month, &[(2024, 1, 5)]);
        let options = LineChartOptions {
            title_suffix_date: Some(Arc::new(|_: DateTime<Utc>| String::new())),
            ..Default::default()
        };
        let chart = assemble(&ds, &options, &Theme::default()).unwrap();
        assert_eq!(chart.title, "Signups");
        assert!(chart.y_axis.ticks.len() >= 2);
    }

    #[test]
    fn test_assemble_errors() {
        let empty = DataSeries::new("Nothing".to_string(), Interval::Month);
        assert_eq!(
            assemble(&empty, &LineChartOptions::default(), &Theme::default()),
            Err(ChartError::EmptySeries("Nothing".to_string()))
        );

        let ds = series("Signups", Interval::Month, &[(2024, 1, 5)]);
        let options = LineChartOptions {
            width: 800,
            height: 300,
            aspect_ratio: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            assemble(&ds, &options, &Theme::default()),
            Err(ChartError::InvalidDimensions(_))
        ));
    }
}
