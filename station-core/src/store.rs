use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Serialize;
use serde_json::{Value, ser::PrettyFormatter};
use thiserror::Error;

use crate::model::Observation;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access data file '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Data file '{}' is not valid JSON", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Data file '{}' must contain a JSON object of date -> observation", .path.display())]
    NotAnObject { path: PathBuf },

    #[error("Failed to serialize observations")]
    Serialize(#[source] serde_json::Error),
}

/// All observations keyed by ISO date. Iteration order is ascending by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: BTreeMap<String, Observation>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from `path`, creating the file with `{}` if it is missing.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        if !path.exists() {
            info!("Data file {} not found, creating an empty one", path.display());
            let empty = Self::new();
            empty.save(path)?;
            return Ok(empty);
        }

        let contents = fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let value: Value = serde_json::from_str(&contents).map_err(|source| {
            StorageError::Malformed { path: path.to_path_buf(), source }
        })?;

        if !value.is_object() {
            return Err(StorageError::NotAnObject { path: path.to_path_buf() });
        }

        let records: BTreeMap<String, Observation> = serde_json::from_value(value)
            .map_err(|source| StorageError::Malformed { path: path.to_path_buf(), source })?;

        info!("Loaded {} observation(s) from {}", records.len(), path.display());
        Ok(Self { records })
    }

    /// Overwrite `path` with the whole store, sorted by date, 4-space indented.
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Saved {} observation(s) to {}", self.records.len(), path.display());
        Ok(())
    }

    fn to_json(&self) -> Result<Vec<u8>, StorageError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.records.serialize(&mut ser).map_err(StorageError::Serialize)?;
        Ok(buf)
    }

    /// Insert or replace the observation for `date`. No validation happens here.
    pub fn set(&mut self, date: impl Into<String>, observation: Observation) {
        let date = date.into();
        debug!("Recording observation for {date}");
        self.records.insert(date, observation);
    }

    pub fn get(&self, date: &str) -> Option<&Observation> {
        self.records.get(date)
    }

    pub fn contains(&self, date: &str) -> bool {
        self.records.contains_key(date)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entries in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Observation)> {
        self.records.iter().map(|(date, obs)| (date.as_str(), obs))
    }
}
