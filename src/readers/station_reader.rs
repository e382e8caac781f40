use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{ProcessingError, Result};
use crate::models::StationDirectory;
use crate::utils::constants::{REFERENCE_ID_FIELD, REFERENCE_NAME_FIELD};
use crate::utils::encoding::read_text_file;

pub struct StationReader {
    skip_headers: bool,
}

impl StationReader {
    pub fn new() -> Self {
        Self { skip_headers: true }
    }

    pub fn with_skip_headers(skip_headers: bool) -> Self {
        Self { skip_headers }
    }

    /// Load the station directory. Any failure is a reference load error.
    pub fn read_directory(&self, path: &Path) -> Result<StationDirectory> {
        let directory = read_text_file(path)
            .and_then(|text| self.parse_directory(&text))
            .map_err(|e| ProcessingError::ReferenceLoad {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;

        info!(
            "Loaded {} stations from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    /// Parse reference rows: station id in the first field, name in the eighth
    pub fn parse_directory(&self, text: &str) -> Result<StationDirectory> {
        let mut reader = ReaderBuilder::new()
            .has_headers(self.skip_headers)
            .flexible(true)
            .quoting(false)
            .from_reader(text.as_bytes());

        let mut directory = StationDirectory::new();
        for row in reader.records() {
            let row = row?;

            // Rows without a name column carry nothing we can use
            if row.len() <= REFERENCE_NAME_FIELD {
                debug!("Ignoring short reference row: {:?}", row);
                continue;
            }

            let id_field = row[REFERENCE_ID_FIELD].trim();
            let station_id = match id_field.parse::<u32>() {
                Ok(id) => id,
                Err(_) => {
                    warn!("Ignoring reference row with invalid station id '{}'", id_field);
                    continue;
                }
            };

            directory.insert(station_id, row[REFERENCE_NAME_FIELD].trim().to_string());
        }

        Ok(directory)
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}
