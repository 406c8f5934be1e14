// File-backed series repository, loaded once at startup
use crate::application::series_repository::SeriesRepository;
use crate::domain::data_series::{DataItem, DataSeries, DataSeriesSetSimpleSet};
use crate::domain::interval::Interval;
use crate::infrastructure::config::DatasetConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct FileSeriesRepository {
    datasets: HashMap<String, DataSeriesSetSimpleSet>,
}

#[derive(Debug, Deserialize)]
struct DatasetFile {
    interval: String,
    #[serde(default)]
    items: Vec<ItemRecord>,
}

#[derive(Debug, Deserialize)]
struct ItemRecord {
    set: String,
    series: String,
    time: String,
    value: i64,
}

impl FileSeriesRepository {
    pub fn new(datasets: Vec<DataSeriesSetSimpleSet>) -> Self {
        Self {
            datasets: datasets
                .into_iter()
                .map(|dataset| (dataset.name.clone(), dataset))
                .collect(),
        }
    }

    /// Read and ingest every configured dataset file
    pub fn load(configs: &[DatasetConfig]) -> Result<Self> {
        let mut datasets = Vec::with_capacity(configs.len());
        for config in configs {
            let json = std::fs::read_to_string(&config.path)
                .with_context(|| format!("Failed to read dataset file {}", config.path))?;
            let dataset = Self::parse_dataset(&config.name, &json)
                .with_context(|| format!("Failed to parse dataset file {}", config.path))?;

            tracing::info!(
                "Loaded dataset {} ({}) with {} sets",
                dataset.name,
                dataset.interval,
                dataset.set_names_sorted().len()
            );
            datasets.push(dataset);
        }
        Ok(Self::new(datasets))
    }

    /// Ingest a dataset document; rows with unparseable timestamps are skipped
    pub fn parse_dataset(name: &str, json: &str) -> Result<DataSeriesSetSimpleSet> {
        let file: DatasetFile = serde_json::from_str(json).context("Invalid dataset JSON")?;
        let interval: Interval = file.interval.parse()?;

        let mut dataset = DataSeriesSetSimpleSet::new(name.to_string(), interval);
        for record in file.items {
            match chrono::DateTime::parse_from_rfc3339(&record.time) {
                Ok(time) => dataset.add_item(
                    &record.set,
                    DataItem::new(record.series, time.to_utc(), record.value),
                ),
                Err(e) => {
                    tracing::warn!(
                        "Skipping {}/{} item with bad time {:?}: {}",
                        record.set,
                        record.series,
                        record.time,
                        e
                    );
                }
            }
        }
        Ok(dataset)
    }
}

#[async_trait]
impl SeriesRepository for FileSeriesRepository {
    async fn list_dataset_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.datasets.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn list_set_names(&self, dataset: &str) -> Result<Option<Vec<String>>> {
        Ok(self.datasets.get(dataset).map(|d| d.set_names_sorted()))
    }

    async fn list_series_names(&self, dataset: &str, set: &str) -> Result<Option<Vec<String>>> {
        Ok(self
            .datasets
            .get(dataset)
            .and_then(|d| d.get(set))
            .map(|s| s.series_names_sorted()))
    }

    async fn get_series(
        &self,
        dataset: &str,
        set: &str,
        series: &str,
    ) -> Result<Option<DataSeries>> {
        Ok(self
            .datasets
            .get(dataset)
            .and_then(|d| d.get(set))
            .and_then(|s| s.get(series))
            .cloned())
    }
}
