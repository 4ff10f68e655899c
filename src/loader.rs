//! Dataset acquisition with a per-record shape check.
//!
//! Individual malformed records are dropped with a warning; only a payload
//! that cannot be read at all, or is not a JSON array, fails the load.

use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::IdeaRecord;

static NEXT_DATASET_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a loaded dataset, unique within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetId(u64);

impl DatasetId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Immutable, order-preserving collection of validated idea records
#[derive(Debug, Clone)]
pub struct Dataset {
    id: DatasetId,
    records: Arc<[IdeaRecord]>,
}

impl Dataset {
    pub fn new(records: Vec<IdeaRecord>) -> Self {
        Self {
            id: DatasetId(NEXT_DATASET_ID.fetch_add(1, Ordering::Relaxed)),
            records: records.into(),
        }
    }

    pub fn id(&self) -> DatasetId {
        self.id
    }

    pub fn records(&self) -> &[IdeaRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&IdeaRecord> {
        self.records.get(index)
    }
}

/// Outcome of a successful load
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub dataset: Dataset,
    /// Entries that failed the shape check
    pub dropped: usize,
}

/// Availability of the dataset as seen by consumers
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Ready(Dataset),
    Failed(String),
}

impl LoadState {
    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            LoadState::Ready(dataset) => Some(dataset),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

/// Validate every element of a JSON array payload
pub fn load_from_value(payload: Value) -> Result<LoadReport> {
    let items = match payload {
        Value::Array(items) => items,
        other => {
            return Err(Error::InvalidDataset(format!(
                "expected an array, got {}",
                json_kind(&other)
            )))
        }
    };

    let total = items.len();
    let mut records = Vec::with_capacity(total);
    let mut dropped = 0;

    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<IdeaRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                dropped += 1;
                warn!(index, reason = %e, "Invalid idea object skipped");
            }
        }
    }

    info!(kept = records.len(), dropped, total, "Loaded idea dataset");

    Ok(LoadReport {
        dataset: Dataset::new(records),
        dropped,
    })
}

pub fn load_from_str(json: &str) -> Result<LoadReport> {
    let payload: Value = serde_json::from_str(json)?;
    load_from_value(payload)
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<LoadReport> {
    let payload: Value = serde_json::from_reader(reader)?;
    load_from_value(payload)
}

pub async fn load_from_path(path: impl AsRef<Path>) -> Result<LoadReport> {
    let contents = tokio::fs::read_to_string(path.as_ref()).await?;
    load_from_str(&contents)
}

/// Load a dataset, folding any total failure into `LoadState::Failed`
pub async fn load_state_from_path(path: impl AsRef<Path>) -> LoadState {
    let path = path.as_ref();
    match load_from_path(path).await {
        Ok(report) => LoadState::Ready(report.dataset),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Dataset unavailable");
            LoadState::Failed(format!("{}: {}", path.display(), e))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
