/// Observation column names as they appear in the input header
pub const STATION_ID_COLUMN: &str = "location_id";
pub const DATE_COLUMN: &str = "date";
pub const TEMPERATURE_MEAN_COLUMN: &str = "temperature_2m_mean (°C)";
pub const PRECIPITATION_HOURS_COLUMN: &str = "precipitation_hours (h)";

/// Station reference file layout (zero-based field positions)
pub const DEFAULT_STATIONS_FILE: &str = "locationData.csv";
pub const REFERENCE_ID_FIELD: usize = 0;
pub const REFERENCE_NAME_FIELD: usize = 7;

/// Name prefix for station ids missing from the reference file
pub const UNKNOWN_STATION_PREFIX: &str = "Location_";

/// Resort towns carried in the dataset that are not districts
pub const EXCLUDED_STATION_IDS: [u32; 2] = [25, 26];

/// First year of the decade covered by the monthly report
pub const DECADE_START_YEAR: i32 = 2014;

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
pub const DEFAULT_REDUCERS: usize = 4;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "WEATHER";
