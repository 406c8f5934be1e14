// Static time-series data model: items, series, and grouped sets
use super::error::ChartError;
use super::interval::{canonical_key, Interval};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct DataItem {
    pub series_name: String,
    pub time: DateTime<Utc>,
    pub value: i64,
}

impl DataItem {
    pub fn new(series_name: String, time: DateTime<Utc>, value: i64) -> Self {
        Self {
            series_name,
            time,
            value,
        }
    }
}

/// One metric over time, keyed by the canonical RFC3339 string of each period start.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeries {
    pub series_name: String,
    pub interval: Interval,
    items: BTreeMap<String, DataItem>,
}

impl DataSeries {
    pub fn new(series_name: String, interval: Interval) -> Self {
        Self {
            series_name,
            interval,
            items: BTreeMap::new(),
        }
    }

    /// Adds an item at the start of its period. Items landing on the same period are summed,
    /// saturating at the `i64` bounds.
    pub fn add_item(&mut self, item: DataItem) {
        let time = self.interval.period_start(item.time);
        let key = canonical_key(time);
        let value = match self.items.get(&key) {
            Some(existing) => match existing.value.checked_add(item.value) {
                Some(sum) => sum,
                None => {
                    tracing::warn!(
                        "{} at {}: {} + {} overflows, saturating",
                        self.series_name,
                        key,
                        existing.value,
                        item.value
                    );
                    existing.value.saturating_add(item.value)
                }
            },
            None => item.value,
        };
        self.items
            .insert(key, DataItem::new(self.series_name.clone(), time, value));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, time: DateTime<Utc>) -> Option<&DataItem> {
        self.items.get(&canonical_key(time))
    }

    /// Value at the period starting at `time`, or zero when that period has no item.
    pub fn value_at(&self, time: DateTime<Utc>) -> i64 {
        self.get(time).map(|item| item.value).unwrap_or(0)
    }

    /// Items in chronological order.
    pub fn sorted_items(&self) -> impl DoubleEndedIterator<Item = &DataItem> {
        self.items.values()
    }

    pub fn last(&self) -> Result<&DataItem, ChartError> {
        self.sorted_items()
            .next_back()
            .ok_or_else(|| ChartError::EmptySeries(self.series_name.clone()))
    }

    pub fn min_max_times(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ChartError> {
        let min = self.items.values().map(|item| item.time).min();
        let max = self.items.values().map(|item| item.time).max();
        match (min, max) {
            (Some(min), Some(max)) => Ok((min, max)),
            _ => Err(ChartError::EmptySeries(self.series_name.clone())),
        }
    }

    pub fn min_max_values(&self) -> Result<(i64, i64), ChartError> {
        let min = self.items.values().map(|item| item.value).min();
        let max = self.items.values().map(|item| item.value).max();
        match (min, max) {
            (Some(min), Some(max)) => Ok((min, max)),
            _ => Err(ChartError::EmptySeries(self.series_name.clone())),
        }
    }
}

/// Series sharing a grouping name, keyed by series name.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeriesSet {
    pub name: String,
    pub interval: Interval,
    series: HashMap<String, DataSeries>,
}

impl DataSeriesSet {
    pub fn new(name: String, interval: Interval) -> Self {
        Self {
            name,
            interval,
            series: HashMap::new(),
        }
    }

    pub fn add_item(&mut self, item: DataItem) {
        let interval = self.interval;
        self.series
            .entry(item.series_name.clone())
            .or_insert_with(|| DataSeries::new(item.series_name.clone(), interval))
            .add_item(item);
    }

    pub fn get(&self, series_name: &str) -> Option<&DataSeries> {
        self.series.get(series_name)
    }

    pub fn series_names_sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = self.series.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Named collection of series sets, filled one item at a time.
///
/// Not synchronized: ingest from a single writer, then share it read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeriesSetSimpleSet {
    pub name: String,
    pub interval: Interval,
    sets: HashMap<String, DataSeriesSet>,
}

impl DataSeriesSetSimpleSet {
    pub fn new(name: String, interval: Interval) -> Self {
        Self {
            name,
            interval,
            sets: HashMap::new(),
        }
    }

    /// Routes the item into the `set_name` set and its series, creating both as needed.
    pub fn add_item(&mut self, set_name: &str, item: DataItem) {
        let interval = self.interval;
        self.sets
            .entry(set_name.to_string())
            .or_insert_with(|| DataSeriesSet::new(set_name.to_string(), interval))
            .add_item(item);
    }

    pub fn get(&self, set_name: &str) -> Option<&DataSeriesSet> {
        self.sets.get(set_name)
    }

    pub fn set_names_sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sets.keys().cloned().collect();
        names.sort();
        names
    }
}
