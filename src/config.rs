//! Layered pipeline settings: defaults, optional file, `WEATHER_*` environment.

use crate::error::Result;
use crate::utils::constants::{
    DATE_COLUMN, DECADE_START_YEAR, DEFAULT_CHUNK_SIZE, DEFAULT_REDUCERS, DEFAULT_STATIONS_FILE,
    ENV_PREFIX, EXCLUDED_STATION_IDS, PRECIPITATION_HOURS_COLUMN, STATION_ID_COLUMN,
    TEMPERATURE_MEAN_COLUMN,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Header names of the observation columns the pipelines read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ColumnNames {
    #[validate(length(min = 1))]
    pub station_id: String,

    #[validate(length(min = 1))]
    pub date: String,

    #[validate(length(min = 1))]
    pub temperature_mean: String,

    #[validate(length(min = 1))]
    pub precipitation_hours: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            station_id: STATION_ID_COLUMN.to_string(),
            date: DATE_COLUMN.to_string(),
            temperature_mean: TEMPERATURE_MEAN_COLUMN.to_string(),
            precipitation_hours: PRECIPITATION_HOURS_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    #[validate(nested)]
    pub columns: ColumnNames,

    pub excluded_stations: Vec<u32>,

    #[validate(range(min = 1800, max = 2200))]
    pub decade_start_year: i32,

    pub stations_file: PathBuf,

    #[validate(range(min = 1))]
    pub max_workers: usize,

    #[validate(range(min = 1))]
    pub chunk_size: usize,

    #[validate(range(min = 1))]
    pub reducers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            excluded_stations: EXCLUDED_STATION_IDS.to_vec(),
            decade_start_year: DECADE_START_YEAR,
            stations_file: PathBuf::from(DEFAULT_STATIONS_FILE),
            max_workers: num_cpus::get(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            reducers: DEFAULT_REDUCERS,
        }
    }
}

impl PipelineConfig {
    /// Load settings from an optional file, then `WEATHER_*` environment variables.
    ///
    /// Nested keys use a double underscore, e.g. `WEATHER_COLUMNS__DATE`.
    /// `WEATHER_EXCLUDED_STATIONS` takes a comma separated list.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!("Reading settings from {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("excluded_stations"),
        );

        let settings: PipelineConfig = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_stations_file(mut self, stations_file: Option<PathBuf>) -> Self {
        if let Some(path) = stations_file {
            self.stations_file = path;
        }
        self
    }

    pub fn with_max_workers(mut self, max_workers: Option<usize>) -> Self {
        if let Some(max_workers) = max_workers {
            self.max_workers = max_workers;
        }
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: Option<usize>) -> Self {
        if let Some(chunk_size) = chunk_size {
            self.chunk_size = chunk_size;
        }
        self
    }

    pub fn with_reducers(mut self, reducers: Option<usize>) -> Self {
        if let Some(reducers) = reducers {
            self.reducers = reducers;
        }
        self
    }
}
