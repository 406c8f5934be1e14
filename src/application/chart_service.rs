// Chart service - Use case for building configured charts
use crate::application::annotation_engine::AnnotationFlags;
use crate::application::chart_assembler::{assemble, LineChartOptions};
use crate::application::series_repository::SeriesRepository;
use crate::application::tick_planner::y_tick_formatter;
use crate::domain::chart::{ChartDescription, Theme};
use crate::domain::data_series::DataSeries;
use crate::domain::interval::Interval;
use crate::infrastructure::config::{ChartConfig, ChartsConfig};
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct ChartService {
    repository: Arc<dyn SeriesRepository>,
    charts_config: ChartsConfig,
    theme: Theme,
}

impl ChartService {
    pub fn new(
        repository: Arc<dyn SeriesRepository>,
        charts_config: ChartsConfig,
        theme: Theme,
    ) -> Self {
        Self {
            repository,
            charts_config,
            theme,
        }
    }

    pub fn list_chart_ids(&self) -> Vec<String> {
        self.charts_config
            .charts
            .iter()
            .map(|c| c.id.clone())
            .collect()
    }

    /// Assemble the chart with the given id; `None` if no chart has that id
    pub async fn get_chart(&self, chart_id: &str) -> anyhow::Result<Option<ChartDescription>> {
        let Some(chart_config) = self.charts_config.charts.iter().find(|c| c.id == chart_id)
        else {
            return Ok(None);
        };

        let series = self
            .repository
            .get_series(&chart_config.dataset, &chart_config.set, &chart_config.series)
            .await
            .with_context(|| format!("Failed to load series for chart {}", chart_id))?
            // A series that was never ingested has no points
            .unwrap_or_else(|| DataSeries::new(chart_config.series.clone(), Interval::Month));

        tracing::debug!(
            "Building chart {} from {} points of {}/{}/{}",
            chart_id,
            series.len(),
            chart_config.dataset,
            chart_config.set,
            chart_config.series
        );

        let options = chart_options(chart_config, &series);
        let chart = assemble(&series, &options, &self.theme)
            .with_context(|| format!("Failed to assemble chart {}", chart_id))?;

        Ok(Some(chart))
    }
}

/// Translate a chart's config entry into assembler options
pub fn chart_options(config: &ChartConfig, series: &DataSeries) -> LineChartOptions {
    let title_suffix_date = config.title_date_format.clone().map(|layout| {
        Arc::new(move |time: DateTime<Utc>| time.format(&layout).to_string())
            as Arc<dyn Fn(DateTime<Utc>) -> String + Send + Sync>
    });
    let title_suffix_value = config.title_current_value.then(|| {
        Arc::new(y_tick_formatter(&series.series_name))
            as Arc<dyn Fn(i64) -> String + Send + Sync>
    });

    LineChartOptions {
        legend: config.legend,
        y_axis_left: config.y_axis_left,
        regression_degree: config.regression_degree,
        annotations: AnnotationFlags {
            now: config.annotations.now,
            month_ago: config.annotations.month_ago,
            quarter_ago: config.annotations.quarter_ago,
            year_ago: config.annotations.year_ago,
            show_percentage: config.annotations.show_percentage,
        },
        width: config.width,
        height: config.height,
        aspect_ratio: config.aspect_ratio,
        title_suffix_date,
        title_suffix_value,
    }
}
