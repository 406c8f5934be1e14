// Application layer - Chart pipeline and use cases
pub mod annotation_engine;
pub mod chart_assembler;
pub mod chart_service;
pub mod dataset_service;
pub mod regression;
pub mod series_aligner;
pub mod series_repository;
pub mod tick_planner;
