// Domain layer - Series data model and chart description
pub mod chart;
pub mod data_series;
pub mod error;
pub mod format;
pub mod interval;
