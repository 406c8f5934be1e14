// HTTP request handlers
use crate::domain::error::ChartError;
use crate::infrastructure::chart_dto::{chart_to_dto, ChartDto};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List configured chart ids
pub async fn list_charts(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.chart_service.list_chart_ids())
}

/// Assemble a configured chart and return its description
pub async fn get_chart(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartDto>, StatusCode> {
    match state.chart_service.get_chart(&id).await {
        Ok(Some(chart)) => Ok(Json(chart_to_dto(chart))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            let status = error_status(&e);
            if status.is_server_error() {
                tracing::error!("Error building chart {}: {:#}", id, e);
            } else {
                tracing::debug!("Chart {} not renderable: {:#}", id, e);
            }
            Err(status)
        }
    }
}

/// List loaded dataset names
pub async fn list_datasets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, StatusCode> {
    state
        .dataset_service
        .list_datasets()
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error listing datasets: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// List set labels of a dataset
pub async fn list_sets(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, StatusCode> {
    match state.dataset_service.list_set_names(&name).await {
        Ok(Some(sets)) => Ok(Json(sets)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Error listing sets of {}: {:#}", name, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// List series names of a dataset's set
pub async fn list_series(
    Path((name, set)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, StatusCode> {
    match state.dataset_service.list_series_names(&name, &set).await {
        Ok(Some(series)) => Ok(Json(series)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Error listing series of {}/{}: {:#}", name, set, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn error_status(error: &anyhow::Error) -> StatusCode {
    match error.downcast_ref::<ChartError>() {
        Some(ChartError::EmptySeries(_)) | Some(ChartError::InvalidDimensions(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_status() {
        let empty: anyhow::Result<()> =
            Err(ChartError::EmptySeries("Churn".to_string())).context("Failed to assemble chart");
        assert_eq!(
            error_status(&empty.unwrap_err()),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let color = anyhow::Error::new(ChartError::InvalidColor("grey".to_string()));
        assert_eq!(error_status(&color), StatusCode::INTERNAL_SERVER_ERROR);

        let io = anyhow::anyhow!("disk on fire");
        assert_eq!(error_status(&io), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
