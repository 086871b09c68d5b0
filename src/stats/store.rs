//! Stats sinks: the save-round-result seam and two bounded stores.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Results kept per store.
pub const DEFAULT_STORE_CAPACITY: usize = 20;

/// Where finished rounds go.
///
/// Fire-and-forget: implementations must not panic and report failures
/// through logging only. Any `Fn(&R)` closure is a sink.
pub trait StatsSink<R>: Send + Sync {
    fn save_round_result(&self, result: &R);
}

impl<R, F> StatsSink<R> for F
where
    F: Fn(&R) + Send + Sync,
{
    fn save_round_result(&self, result: &R) {
        self(result);
    }
}

/// Newest results in memory, newest first.
#[derive(Debug)]
pub struct RecentResultsStore<R> {
    capacity: usize,
    results: Mutex<VecDeque<R>>,
}

impl<R: Clone> RecentResultsStore<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_STORE_CAPACITY)
    }

    /// Store keeping at most `capacity` results (at least 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            results: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, result: R) {
        let mut results = self.results.lock();
        results.push_front(result);
        results.truncate(self.capacity);
    }

    /// All kept results, newest first.
    #[must_use]
    pub fn results(&self) -> Vec<R> {
        self.results.lock().iter().cloned().collect()
    }

    #[must_use]
    pub fn latest(&self) -> Option<R> {
        self.results.lock().front().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.lock().is_empty()
    }

    pub fn clear(&self) {
        self.results.lock().clear();
    }
}

impl<R: Clone> Default for RecentResultsStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone + Send> StatsSink<R> for RecentResultsStore<R> {
    fn save_round_result(&self, result: &R) {
        self.push(result.clone());
    }
}

/// Newest results in a JSON array file, newest first.
///
/// A missing or blank file reads as empty. A corrupt file fails
/// [`load`](Self::load) and is overwritten by the next save.
#[derive(Debug)]
pub struct JsonFileStore<R> {
    path: PathBuf,
    capacity: usize,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
    _marker: std::marker::PhantomData<fn() -> R>,
}

impl<R> JsonFileStore<R>
where
    R: Serialize + DeserializeOwned,
{
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, DEFAULT_STORE_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
            lock: Mutex::new(()),
            _marker: std::marker::PhantomData,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all kept results, newest first.
    pub fn load(&self) -> Result<Vec<R>, StoreError> {
        let _guard = self.lock.lock();
        self.read()
    }

    /// Prepend `result` and rewrite the file.
    pub fn save(&self, result: &R) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut results = match self.read() {
            Ok(results) => results,
            Err(StoreError::Json(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt stats file");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let encoded = serde_json::to_value(result)?;
        let mut values = results
            .drain(..)
            .map(serde_json::to_value)
            .collect::<Result<VecDeque<_>, _>>()?;
        values.push_front(encoded);
        values.truncate(self.capacity);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&values)?)?;
        Ok(())
    }

    /// Remove the file. Missing is fine.
    pub fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read(&self) -> Result<Vec<R>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

impl<R> StatsSink<R> for JsonFileStore<R>
where
    R: Serialize + DeserializeOwned,
{
    fn save_round_result(&self, result: &R) {
        if let Err(e) = self.save(result) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to save round result");
        }
    }
}
