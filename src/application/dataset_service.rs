// Dataset service - Use case for browsing loaded datasets
use crate::application::series_repository::SeriesRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct DatasetService {
    repository: Arc<dyn SeriesRepository>,
}

impl DatasetService {
    pub fn new(repository: Arc<dyn SeriesRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_datasets(&self) -> anyhow::Result<Vec<String>> {
        self.repository.list_dataset_names().await
    }

    pub async fn list_set_names(&self, dataset: &str) -> anyhow::Result<Option<Vec<String>>> {
        self.repository.list_set_names(dataset).await
    }

    pub async fn list_series_names(
        &self,
        dataset: &str,
        set: &str,
    ) -> anyhow::Result<Option<Vec<String>>> {
        self.repository.list_series_names(dataset, set).await
    }
}
