// Repository trait for series data access
use crate::domain::data_series::DataSeries;
use async_trait::async_trait;

#[async_trait]
pub trait SeriesRepository: Send + Sync {
    /// List all loaded dataset names, sorted
    async fn list_dataset_names(&self) -> anyhow::Result<Vec<String>>;

    /// Set labels within a dataset, sorted; `None` if the dataset is unknown
    async fn list_set_names(&self, dataset: &str) -> anyhow::Result<Option<Vec<String>>>;

    /// Series names within a set, sorted; `None` if the dataset or set is unknown
    async fn list_series_names(
        &self,
        dataset: &str,
        set: &str,
    ) -> anyhow::Result<Option<Vec<String>>>;

    /// A single series from a dataset's set; `None` if any level is missing
    async fn get_series(
        &self,
        dataset: &str,
        set: &str,
        series: &str,
    ) -> anyhow::Result<Option<DataSeries>>;
}
