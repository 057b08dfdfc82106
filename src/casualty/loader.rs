use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use serde::de::IgnoredAny;
use serde::Deserialize;

use super::{Feature, FeatureCollection, Field, RawRecord};
use crate::error::LoadError;

/// Coordinate value upstream producers use for "location unknown"
pub const SENTINEL_COORDINATE: f64 = 9999.0;

/// Array entry: anything that isn't an object is skipped rather than
/// failing the whole file
#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Record(RawRecord),
    Other(IgnoredAny),
}

/// Accept a coordinate if present, numeric, finite and not the sentinel
pub(super) fn valid_coordinate(field: Option<&Field>) -> Option<f64> {
    let value = field?.as_number()?;
    (value.is_finite() && value != SENTINEL_COORDINATE).then_some(value)
}

/// Parse a JSON array of records and keep the ones that validate, in input order
pub fn parse_records(bytes: &mut [u8]) -> Result<FeatureCollection, LoadError> {
    let entries: Vec<Entry> = simd_json::serde::from_slice(bytes)?;
    let total = entries.len();

    let features: FeatureCollection = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Record(record) => Feature::from_record(record),
            Entry::Other(_) => None,
        })
        .collect();

    log::debug!("kept {} of {} dataset records", features.len(), total);
    Ok(features)
}

/// Reads the casualty dataset from a JSON file
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    path: PathBuf,
}

impl DatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and validate the whole dataset
    pub fn load(&self) -> Result<FeatureCollection, LoadError> {
        let mut bytes = fs::read(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_records(&mut bytes)
    }

    /// Run [`load`](Self::load) on a worker thread. The returned handle
    /// resolves exactly once.
    pub fn spawn(self) -> PendingLoad {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            log::info!("loading dataset from {}", self.path.display());
            // Receiver may already be gone if the UI quit first
            let _ = tx.send(self.load());
        });
        PendingLoad { rx: Some(rx) }
    }
}

/// A dataset load in flight
pub struct PendingLoad {
    rx: Option<Receiver<Result<FeatureCollection, LoadError>>>,
}

impl PendingLoad {
    /// Poll without blocking. Yields the result once, then `None` forever.
    pub fn try_resolve(&mut self) -> Option<Result<FeatureCollection, LoadError>> {
        let rx = self.rx.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(LoadError::Disconnected),
        };
        self.rx = None;
        Some(result)
    }

    /// Whether the result has already been taken
    pub fn is_resolved(&self) -> bool {
        self.rx.is_none()
    }
}
