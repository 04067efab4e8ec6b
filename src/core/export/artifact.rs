//! CSV artifact files
//!
//! Header row first, single-byte delimiter, minimal quoting. NULL is written
//! as an empty field, and an empty field reads back as NULL.

use crate::domain::{Cell, Result, ResultSet};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Writes result sets into a directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
    delimiter: u8,
    extension: String,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>, delimiter: u8, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            delimiter,
            extension: extension.into(),
        }
    }

    /// Path of the artifact named `stem`
    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.{}", self.extension))
    }

    /// Write `data` as `<stem>.<ext>` and return the file name
    pub fn write(&self, stem: &str, data: &ResultSet) -> Result<String> {
        let path = self.path_for(stem);
        write_artifact(&path, data, self.delimiter)?;
        tracing::debug!(path = %path.display(), rows = data.row_count(), "Artifact written");
        Ok(format!("{stem}.{}", self.extension))
    }
}

/// Write `data` to `path`
pub fn write_artifact(path: &Path, data: &ResultSet, delimiter: u8) -> Result<()> {
    let file = File::create(path)?;
    let mut w = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(BufWriter::new(file));

    if !data.columns().is_empty() {
        w.write_record(data.columns())?;
    }
    for row in data.rows() {
        w.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    w.flush()?;
    Ok(())
}

/// Read an artifact written with `delimiter`
///
/// NULL and the empty string are both written as an empty field, so an
/// empty field always reads back as NULL. A value of `Some("")` does not
/// survive the round trip.
pub fn read_artifact(path: &Path, delimiter: u8) -> Result<ResultSet> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)?;

    let columns = reader.headers()?.iter().map(str::to_string).collect();
    let mut data = ResultSet::new(columns);
    for record in reader.records() {
        let record = record?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| (!field.is_empty()).then(|| field.to_string()))
            .collect();
        data.push_row(row)?;
    }
    Ok(data)
}
