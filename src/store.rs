use tokio::sync::watch;
use tracing::warn;

use crate::classify::{classify_result, StageCounts};
use crate::config::SchedulerConfig;
use crate::error::{Error, Result};
use crate::filter::FilterSpecification;
use crate::loader::{Dataset, LoadState};
use crate::processor::{FilterScheduler, FilteredResult};

/// Filter state shared by the views, passed down explicitly.
///
/// Changing the dataset or replacing the filter restarts the scheduler.
pub struct IdeaStore {
    load_state: LoadState,
    filter: FilterSpecification,
    scheduler: FilterScheduler,
}

impl IdeaStore {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            load_state: LoadState::Loading,
            filter: FilterSpecification::default(),
            scheduler: FilterScheduler::new(config),
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn filter(&self) -> &FilterSpecification {
        &self.filter
    }

    /// Apply the outcome of a dataset load
    pub fn set_load_state(&mut self, state: LoadState) -> Option<u64> {
        match state {
            LoadState::Ready(dataset) => Some(self.set_dataset(dataset)),
            other => {
                self.withdraw_dataset();
                self.load_state = other;
                None
            }
        }
    }

    pub fn set_dataset(&mut self, dataset: Dataset) -> u64 {
        self.load_state = LoadState::Ready(dataset.clone());
        self.scheduler.trigger(dataset, self.filter.clone())
    }

    pub fn set_load_failed(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%reason, "Dataset load failed");
        self.withdraw_dataset();
        self.load_state = LoadState::Failed(reason);
    }

    /// Stop filtering a dataset that is no longer available
    fn withdraw_dataset(&mut self) {
        if self.load_state.dataset().is_some() {
            self.scheduler.cancel();
        }
    }

    /// Replace the whole filter. Returns the new generation if a run started.
    pub fn set_filter(&mut self, spec: FilterSpecification) -> Option<u64> {
        if spec == self.filter && self.scheduler.generation() > 0 {
            return None;
        }
        self.filter = spec;

        let dataset = self.load_state.dataset()?.clone();
        Some(self.scheduler.trigger(dataset, self.filter.clone()))
    }

    pub fn subscribe(&self) -> watch::Receiver<FilteredResult> {
        self.scheduler.subscribe()
    }

    pub fn scheduler(&self) -> &FilterScheduler {
        &self.scheduler
    }

    /// Latest published result, once a dataset is available
    pub fn latest(&self) -> Option<FilteredResult> {
        self.load_state.dataset()?;
        Some(self.scheduler.latest())
    }

    /// Bucket sizes of the latest result at the selected stage
    pub fn stage_counts(&self) -> Option<StageCounts> {
        self.latest().map(|result| classify_result(&result).counts())
    }

    /// Complete result for the current dataset and filter
    pub async fn wait_for_completion(&self) -> Result<FilteredResult> {
        match &self.load_state {
            LoadState::Ready(_) => self.scheduler.wait_for_completion().await,
            LoadState::Loading => Err(Error::DatasetUnavailable("dataset is still loading".to_string())),
            LoadState::Failed(reason) => Err(Error::DatasetUnavailable(reason.clone())),
        }
    }
}
