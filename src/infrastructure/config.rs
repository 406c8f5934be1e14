use crate::domain::chart::{Color, Theme};
use crate::domain::error::ChartError;
use anyhow::Context;
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: ServerSettings,
    #[serde(default)]
    pub datasets: Vec<DatasetConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChartsConfig {
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub id: String,
    pub dataset: String,
    pub set: String,
    pub series: String,
    #[serde(default)]
    pub legend: bool,
    #[serde(default)]
    pub y_axis_left: bool,
    #[serde(default)]
    pub regression_degree: i32,
    #[serde(default)]
    pub annotations: AnnotationConfig,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub aspect_ratio: f64,
    /// chrono strftime layout for the latest-date title suffix, e.g. `%b %Y`
    pub title_date_format: Option<String>,
    #[serde(default)]
    pub title_current_value: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct AnnotationConfig {
    #[serde(default)]
    pub now: bool,
    #[serde(default)]
    pub month_ago: bool,
    #[serde(default)]
    pub quarter_ago: bool,
    #[serde(default)]
    pub year_ago: bool,
    #[serde(default)]
    pub show_percentage: bool,
}

/// Optional overrides on top of the default theme; colors are hex strings.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ThemeConfig {
    pub main_color: Option<String>,
    pub regression_color: Option<String>,
    pub annotation_color: Option<String>,
    pub grid_major_color: Option<String>,
    pub grid_minor_color: Option<String>,
    pub padding_top: Option<u32>,
    pub y_num_ticks: Option<usize>,
}

impl ThemeConfig {
    pub fn to_theme(&self) -> Result<Theme, ChartError> {
        let mut theme = Theme::default();
        let overrides = [
            (&self.main_color, &mut theme.main_style),
            (&self.regression_color, &mut theme.regression_style),
            (&self.annotation_color, &mut theme.annotation_style),
            (&self.grid_major_color, &mut theme.grid_major_style),
            (&self.grid_minor_color, &mut theme.grid_minor_style),
        ];
        for (hex, style) in overrides {
            if let Some(hex) = hex {
                style.stroke_color = Some(Color::from_hex(hex)?);
            }
        }
        if let Some(padding_top) = self.padding_top {
            theme.padding_top = padding_top;
        }
        if let Some(y_num_ticks) = self.y_num_ticks {
            theme.y_num_ticks = y_num_ticks;
        }
        Ok(theme)
    }
}

impl ChartsConfig {
    /// Rejects configs that would only fail once a chart is requested.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.theme.to_theme().context("Invalid [theme] section")?;

        let mut seen = std::collections::HashSet::new();
        for chart in &self.charts {
            if !seen.insert(chart.id.as_str()) {
                anyhow::bail!("Duplicate chart id {}", chart.id);
            }
            if let Some(layout) = &chart.title_date_format {
                if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
                    anyhow::bail!(
                        "Chart {} has an invalid title_date_format {:?}",
                        chart.id,
                        layout
                    );
                }
            }
        }
        Ok(())
    }
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_charts_config() -> anyhow::Result<ChartsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/charts"))
        .build()?;

    let charts: ChartsConfig = settings.try_deserialize()?;
    charts.validate()?;
    Ok(charts)
}

/// Parse a charts config from TOML text
pub fn parse_charts_config(toml: &str) -> anyhow::Result<ChartsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    let charts: ChartsConfig = settings.try_deserialize()?;
    charts.validate()?;
    Ok(charts)
}
