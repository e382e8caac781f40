use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{ProcessingError, Result};

/// Writes report lines so that the destination either holds the complete
/// output or is left untouched.
pub struct ReportWriter;

impl ReportWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_lines<I, S>(&self, path: &Path, lines: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut written = 0;
        self.write_atomically(path, |out| {
            for line in lines {
                writeln!(out, "{}", line.as_ref())?;
                written += 1;
            }
            Ok(())
        })?;

        info!("Wrote {} lines to {}", written, path.display());
        Ok(written)
    }

    pub fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        self.write_atomically(path, |out| {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
            Ok(())
        })
    }

    fn write_atomically<F>(&self, path: &Path, body: F) -> Result<()>
    where
        F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<()>,
    {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        if path.is_dir() {
            return Err(ProcessingError::Config(format!(
                "Output path {} is a directory",
                path.display()
            )));
        }

        let mut staging = NamedTempFile::new_in(parent)?;
        {
            let mut out = BufWriter::new(&mut staging);
            body(&mut out)?;
            out.flush()?;
        }
        staging.persist(path).map_err(|e| ProcessingError::Io(e.error))?;
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
