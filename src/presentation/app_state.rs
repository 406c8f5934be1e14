// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::application::dataset_service::DatasetService;

#[derive(Clone)]
pub struct AppState {
    pub chart_service: ChartService,
    pub dataset_service: DatasetService,
}
