// Chart description handed to a rendering backend
use super::error::ChartError;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `rrggbb` or `#rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self, ChartError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ChartError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ChartError::InvalidColor(hex.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub stroke_width: f64,
    pub stroke_color: Option<Color>,
}

impl Style {
    pub fn new(stroke_width: f64, stroke_color: Option<Color>) -> Self {
        Self {
            stroke_width,
            stroke_color,
        }
    }
}

/// Colors, strokes, and axis defaults shared by every assembled chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub main_style: Style,
    pub regression_style: Style,
    pub annotation_style: Style,
    pub grid_major_style: Style,
    pub grid_minor_style: Style,
    pub padding_top: u32,
    pub y_num_ticks: usize,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            main_style: Style::new(3.0, None),
            regression_style: Style::new(2.0, Some(Color::rgb(0xff, 0xa5, 0x00))),
            annotation_style: Style::new(2.0, Some(Color::rgb(0x32, 0xcd, 0x32))),
            grid_major_style: Style::new(1.0, Some(Color::rgb(0x00, 0x00, 0x00))),
            grid_minor_style: Style::new(1.0, Some(Color::rgb(0xaa, 0xaa, 0xaa))),
            padding_top: 50,
            y_num_ticks: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub time: DateTime<Utc>,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesKind {
    Values,
    Regression { degree: usize },
    Annotations(Vec<AnnotationPoint>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub name: String,
    pub style: Style,
    pub kind: SeriesKind,
    pub points: Vec<PlotPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    Major,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub position: f64,
    pub kind: GridKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPosition {
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub position: AxisPosition,
    pub ticks: Vec<Tick>,
    pub gridlines: Vec<GridLine>,
    pub major_style: Style,
    pub minor_style: Style,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub series_index: usize,
    pub name: String,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Fully resolved line chart. `dimensions` is `None` when the renderer should use its default size.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDescription {
    pub title: String,
    pub dimensions: Option<Dimensions>,
    pub padding_top: u32,
    pub series: Vec<PlotSeries>,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub legend: Option<Legend>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        let color = Color::from_hex("#32CD32").unwrap();
        assert_eq!(color, Color::rgb(50, 205, 50));
        assert_eq!(color.to_hex(), "#32cd32");
        assert_eq!(Color::from_hex("aaaaaa").unwrap(), Color::rgb(170, 170, 170));
    }

    #[test]
    fn test_color_hex_rejects_garbage() {
        assert_eq!(
            Color::from_hex("limegreen"),
            Err(ChartError::InvalidColor("limegreen".to_string()))
        );
        assert!(Color::from_hex("#12345").is_err());
    }
}
