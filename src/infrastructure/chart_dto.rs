// Mapper to convert chart descriptions to their JSON wire shape
use crate::domain::chart::{
    AxisPosition, AxisSpec, ChartDescription, GridKind, Legend, PlotSeries, SeriesKind, Style,
};
use crate::domain::interval::canonical_key;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ChartDto {
    pub title: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub padding_top: u32,
    pub series: Vec<SeriesDto>,
    pub x_axis: AxisDto,
    pub y_axis: AxisDto,
    pub legend: Option<Vec<LegendEntryDto>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKindDto {
    Values,
    Regression,
    Annotations,
}

#[derive(Debug, Serialize)]
pub struct StyleDto {
    pub stroke_width: f64,
    pub stroke_color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SeriesDto {
    pub name: String,
    pub kind: SeriesKindDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<usize>,
    pub style: StyleDto,
    pub points: Vec<PointDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationDto>,
}

#[derive(Debug, Serialize)]
pub struct PointDto {
    pub x: f64,
    pub time: String,
    pub y: f64,
}

#[derive(Debug, Serialize)]
pub struct AnnotationDto {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct TickDto {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct GridLineDto {
    pub position: f64,
    pub major: bool,
}

#[derive(Debug, Serialize)]
pub struct AxisDto {
    pub position: &'static str,
    pub ticks: Vec<TickDto>,
    pub gridlines: Vec<GridLineDto>,
    pub major_style: StyleDto,
    pub minor_style: StyleDto,
}

#[derive(Debug, Serialize)]
pub struct LegendEntryDto {
    pub series_index: usize,
    pub name: String,
    pub color: Option<String>,
}

pub fn chart_to_dto(chart: ChartDescription) -> ChartDto {
    let series: Vec<SeriesDto> = chart.series.into_iter().map(series_to_dto).collect();

    ChartDto {
        title: chart.title,
        width: chart.dimensions.map(|d| d.width),
        height: chart.dimensions.map(|d| d.height),
        padding_top: chart.padding_top,
        series,
        x_axis: axis_to_dto(chart.x_axis),
        y_axis: axis_to_dto(chart.y_axis),
        legend: chart.legend.map(legend_to_dto),
    }
}

fn style_to_dto(style: Style) -> StyleDto {
    StyleDto {
        stroke_width: style.stroke_width,
        stroke_color: style.stroke_color.map(|c| c.to_hex()),
    }
}

fn series_to_dto(series: PlotSeries) -> SeriesDto {
    let (kind, degree, annotations) = match series.kind {
        SeriesKind::Values => (SeriesKindDto::Values, None, Vec::new()),
        SeriesKind::Regression { degree } => (SeriesKindDto::Regression, Some(degree), Vec::new()),
        SeriesKind::Annotations(points) => (
            SeriesKindDto::Annotations,
            None,
            points
                .into_iter()
                .map(|a| AnnotationDto {
                    x: a.x,
                    y: a.y,
                    label: a.label,
                })
                .collect(),
        ),
    };

    let points: Vec<PointDto> = series
        .points
        .into_iter()
        .map(|p| PointDto {
            x: p.x,
            time: canonical_key(p.time),
            y: p.y,
        })
        .collect();

    SeriesDto {
        name: series.name,
        kind,
        degree,
        style: style_to_dto(series.style),
        points,
        annotations,
    }
}

fn axis_to_dto(axis: AxisSpec) -> AxisDto {
    let position = match axis.position {
        AxisPosition::Bottom => "bottom",
        AxisPosition::Left => "left",
        AxisPosition::Right => "right",
    };

    AxisDto {
        position,
        ticks: axis
            .ticks
            .into_iter()
            .map(|t| TickDto {
                position: t.position,
                label: t.label,
            })
            .collect(),
        gridlines: axis
            .gridlines
            .into_iter()
            .map(|g| GridLineDto {
                position: g.position,
                major: g.kind == GridKind::Major,
            })
            .collect(),
        major_style: style_to_dto(axis.major_style),
        minor_style: style_to_dto(axis.minor_style),
    }
}

fn legend_to_dto(legend: Legend) -> Vec<LegendEntryDto> {
    legend
        .entries
        .into_iter()
        .map(|e| LegendEntryDto {
            series_index: e.series_index,
            name: e.name,
            color: e.color.map(|c| c.to_hex()),
        })
        .collect()
}
