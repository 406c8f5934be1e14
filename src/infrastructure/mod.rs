// Infrastructure layer - External dependencies and adapters
pub mod chart_dto;
pub mod config;
pub mod file_repository;
