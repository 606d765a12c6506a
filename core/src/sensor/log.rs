use crate::prelude::ReadingLogError;
use crate::sensor::reading::Reading;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Ordered history of readings, persisted as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingLog {
    readings: Vec<Reading>,
}

impl ReadingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reading: Reading) {
        self.readings.push(reading);
    }

    pub fn get(&self, index: usize) -> Option<&Reading> {
        self.readings.get(index)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReadingLogError> {
        let file = File::open(path.as_ref())?;
        let log = serde_json::from_reader(BufReader::new(file))?;
        Ok(log)
    }

    /// Writes the log next to `path` and renames it into place, so readers
    /// never observe a half-written file.
    pub fn save_atomic<P: AsRef<Path>>(&self, path: P) -> Result<(), ReadingLogError> {
        let path = path.as_ref();
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(directory)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
        }
        temp.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl From<Vec<Reading>> for ReadingLog {
    fn from(readings: Vec<Reading>) -> Self {
        Self { readings }
    }
}

/// `log_<ddmmYYYY>_<HHMMSS>.json` in the working directory.
pub fn timestamped_log_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%d%m%Y_%H%M%S");
    PathBuf::from(format!("log_{stamp}.json"))
}
