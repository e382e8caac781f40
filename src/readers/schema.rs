//! Header resolution and per-line record extraction.
//!
//! The header is parsed once into an [`ObservationSchema`]; every data line is
//! then parsed against that schema. A line can only be parsed once a schema
//! exists.

use csv::StringRecord;
use std::collections::HashMap;

use crate::config::ColumnNames;
use crate::error::{ProcessingError, Result, SkipReason};
use crate::models::{parse_observation_date, ObservationRecord};

/// Which observation fields a pipeline needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredFields {
    /// Date and precipitation; station and temperature are not read
    PrecipitationOnly,
    /// Station, date, precipitation and mean temperature
    PrecipitationAndTemperature,
}

/// Column positions resolved from the header line
#[derive(Debug, Clone)]
pub struct ObservationSchema {
    station_id: Option<usize>,
    date: usize,
    precipitation_hours: usize,
    temperature_mean: Option<usize>,
    width: usize,
    columns: ColumnNames,
}

impl ObservationSchema {
    /// Resolve every required column name to an index, failing if one is missing
    pub fn from_header(
        header: &StringRecord,
        columns: &ColumnNames,
        fields: RequiredFields,
    ) -> Result<Self> {
        let index: HashMap<&str, usize> = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();

        let lookup = |name: &str| -> Result<usize> {
            index
                .get(name)
                .copied()
                .ok_or_else(|| ProcessingError::MissingColumn(name.to_string()))
        };

        let (station_id, temperature_mean) = match fields {
            RequiredFields::PrecipitationOnly => (None, None),
            RequiredFields::PrecipitationAndTemperature => (
                Some(lookup(&columns.station_id)?),
                Some(lookup(&columns.temperature_mean)?),
            ),
        };

        Ok(Self {
            station_id,
            date: lookup(&columns.date)?,
            precipitation_hours: lookup(&columns.precipitation_hours)?,
            temperature_mean,
            width: header.len(),
            columns: columns.clone(),
        })
    }

    /// Number of fields in the header
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn reads_station(&self) -> bool {
        self.station_id.is_some()
    }

    pub fn reads_temperature(&self) -> bool {
        self.temperature_mean.is_some()
    }

    /// Parse one data line. Temperature is 0.0 when the schema does not read it.
    pub fn parse_record(
        &self,
        record: &StringRecord,
    ) -> std::result::Result<ObservationRecord, SkipReason> {
        self.parse_record_with(record, |_| Ok(()))
    }

    /// Parse one data line, letting `admit_station` reject the station before
    /// any other field is parsed.
    pub fn parse_record_with<A>(
        &self,
        record: &StringRecord,
        admit_station: A,
    ) -> std::result::Result<ObservationRecord, SkipReason>
    where
        A: FnOnce(u32) -> std::result::Result<(), SkipReason>,
    {
        if record.len() < self.width {
            return Err(SkipReason::TooFewFields {
                expected: self.width,
                found: record.len(),
            });
        }

        let field = |i: usize| record.get(i).unwrap_or_default().trim();

        let station_id = match self.station_id {
            Some(i) => {
                let raw = field(i);
                let id = raw
                    .parse::<u32>()
                    .map_err(|_| SkipReason::InvalidStationId(raw.to_string()))?;
                admit_station(id)?;
                Some(id)
            }
            None => None,
        };

        let date = parse_observation_date(field(self.date))?;

        let precipitation_hours = parse_number(
            field(self.precipitation_hours),
            &self.columns.precipitation_hours,
        )?;
        if precipitation_hours < 0.0 {
            return Err(SkipReason::NegativePrecipitation(precipitation_hours));
        }

        let temperature_mean = match self.temperature_mean {
            Some(i) => parse_number(field(i), &self.columns.temperature_mean)?,
            None => 0.0,
        };

        Ok(ObservationRecord::new(
            station_id,
            date,
            temperature_mean,
            precipitation_hours,
        ))
    }

    #[cfg(test)]
    pub(crate) fn from_header_line(
        line: &str,
        columns: &ColumnNames,
        fields: RequiredFields,
    ) -> Result<Self> {
        Self::from_header(&split_line(line), columns, fields)
    }

    #[cfg(test)]
    pub(crate) fn parse_line(
        &self,
        line: &str,
    ) -> std::result::Result<ObservationRecord, SkipReason> {
        self.parse_record(&split_line(line))
    }
}

#[cfg(test)]
fn split_line(line: &str) -> StringRecord {
    StringRecord::from(line.split(',').collect::<Vec<_>>())
}

fn parse_number(value: &str, column: &str) -> std::result::Result<f64, SkipReason> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(SkipReason::InvalidNumber {
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}
