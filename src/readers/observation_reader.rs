use csv::{ReaderBuilder, StringRecord};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::ColumnNames;
use crate::error::{ProcessingError, Result, SkipReason};
use crate::models::RunStats;
use crate::readers::schema::{ObservationSchema, RequiredFields};
use crate::utils::constants::DEFAULT_CHUNK_SIZE;
use crate::utils::encoding::read_text_file;

/// A contiguous run of data lines processed by one map task
#[derive(Debug, Clone)]
pub struct InputSplit {
    pub index: usize,
    pub records: Vec<StringRecord>,
}

/// Schema plus the data lines of one input, cut into splits
#[derive(Debug, Clone)]
pub struct ObservationInput {
    pub schema: ObservationSchema,
    pub splits: Vec<InputSplit>,
    pub stats: RunStats,
}

impl ObservationInput {
    pub fn record_count(&self) -> usize {
        self.splits.iter().map(|s| s.records.len()).sum()
    }
}

pub struct ObservationReader {
    columns: ColumnNames,
    fields: RequiredFields,
    chunk_size: usize,
}

impl ObservationReader {
    pub fn new(columns: ColumnNames, fields: RequiredFields) -> Self {
        Self {
            columns,
            fields,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Read an observation file and cut it into splits
    pub fn read_path(&self, path: &Path) -> Result<ObservationInput> {
        let text = read_text_file(path)?;
        let input = self.read_str(&text)?;

        info!(
            "Read {} data lines from {} in {} splits",
            input.stats.lines_read,
            path.display(),
            input.splits.len()
        );
        Ok(input)
    }

    /// Read observations from in-memory text. The first line is the header.
    pub fn read_str(&self, text: &str) -> Result<ObservationInput> {
        // One physical line is one record; a stray quote must not swallow
        // the lines after it
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(text.as_bytes());
        let mut rows = reader.records();

        let header = rows.next().ok_or(ProcessingError::MissingHeader)??;
        let schema = ObservationSchema::from_header(&header, &self.columns, self.fields)?;
        debug!(
            "Resolved schema over {} header columns (station: {}, temperature: {})",
            schema.width(),
            schema.reads_station(),
            schema.reads_temperature()
        );

        let mut stats = RunStats::new();
        let mut splits = Vec::new();
        let mut current = Vec::with_capacity(self.chunk_size);

        for row in rows {
            stats.lines_read += 1;
            match row {
                Ok(record) => {
                    current.push(record);
                    if current.len() == self.chunk_size {
                        splits.push(InputSplit {
                            index: splits.len(),
                            records: std::mem::take(&mut current),
                        });
                    }
                }
                Err(e) => {
                    let reason = SkipReason::Unreadable(e.to_string());
                    warn!("Skipping data line {}: {}", stats.lines_read, reason);
                    stats.record_skip(&reason);
                }
            }
        }

        if !current.is_empty() {
            splits.push(InputSplit {
                index: splits.len(),
                records: current,
            });
        }

        Ok(ObservationInput {
            schema,
            splits,
            stats,
        })
    }
}
