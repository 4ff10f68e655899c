//! Incremental, cancellable evaluation of the filter over a dataset.
//!
//! A run walks the dataset in fixed-size slices, publishing the growing
//! match set after every slice and pausing between slices so the caller's
//! event loop stays responsive. Every trigger advances a generation token;
//! a run whose generation is no longer current stops at the next slice
//! boundary and never publishes again.

use async_stream::stream;
use futures::{Stream, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::SchedulerConfig;
use crate::error::{Error, Result};
use crate::filter::{matches_with_rule, FilterSpecification};
use crate::loader::{Dataset, DatasetId};
use crate::types::IdeaRecord;

/// Monotonic counter identifying the latest filter run
#[derive(Debug, Clone, Default)]
pub struct GenerationToken {
    current: Arc<AtomicU64>,
}

impl GenerationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    /// Start a new generation, returning its value
    pub fn advance(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

/// Records of a dataset that matched a filter, in dataset order
#[derive(Debug, Clone)]
pub struct FilteredResult {
    generation: u64,
    dataset: Dataset,
    spec: Arc<FilterSpecification>,
    indices: Arc<[usize]>,
    complete: bool,
}

impl FilteredResult {
    /// Empty, incomplete result for a run that has not published yet
    pub fn pending(generation: u64, dataset: Dataset, spec: Arc<FilterSpecification>) -> Self {
        Self {
            generation,
            dataset,
            spec,
            indices: Arc::from(Vec::<usize>::new()),
            complete: false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dataset_id(&self) -> DatasetId {
        self.dataset.id()
    }

    pub fn spec(&self) -> &FilterSpecification {
        &self.spec
    }

    /// True once every slice of the run has been evaluated
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Dataset positions of the matching records
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &IdeaRecord> + '_ {
        self.indices.iter().filter_map(|&i| self.dataset.get(i))
    }

    pub fn records(&self) -> Vec<&IdeaRecord> {
        self.iter().collect()
    }

    /// Whether this result was produced by the given generation and dataset
    pub fn produced_by(&self, generation: u64, dataset: DatasetId) -> bool {
        self.generation == generation && self.dataset.id() == dataset
    }

    /// Same dataset, same specification, same matches in the same order
    pub fn same_content(&self, other: &FilteredResult) -> bool {
        self.dataset.id() == other.dataset.id()
            && self.spec == other.spec
            && self.indices == other.indices
    }
}

/// How a single run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Superseded,
}

/// Lifecycle of the scheduler as a whole.
///
/// A run that loses to a newer trigger is superseded: it is no longer the
/// `Running` generation, and its task ends with [`RunOutcome::Superseded`].
/// [`FilterScheduler::last_outcome`] reports how the previous run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running { generation: u64 },
}

/// Stream of growing partial results for one run.
///
/// Yields once per slice; the last item is flagged complete. The stream ends
/// early, without yielding, as soon as `generation` stops being current.
pub fn filter_stream(
    dataset: Dataset,
    spec: Arc<FilterSpecification>,
    config: SchedulerConfig,
    token: GenerationToken,
    generation: u64,
) -> impl Stream<Item = FilteredResult> + Send + Unpin + 'static {
    let slice_size = config.slice_size.max(1);
    Box::pin(stream! {
        let total = dataset.len();
        let mut accumulator: Vec<usize> = Vec::new();
        let mut start = 0;

        loop {
            if !token.is_current(generation) {
                debug!(generation, processed = start, total, "Filter run superseded");
                return;
            }

            let end = (start + slice_size).min(total);
            for (offset, record) in dataset.records()[start..end].iter().enumerate() {
                if matches_with_rule(record, &spec, config.stage_rule) {
                    accumulator.push(start + offset);
                }
            }

            let complete = end >= total;
            debug!(generation, processed = end, total, matched = accumulator.len(), "Filter slice evaluated");

            yield FilteredResult {
                generation,
                dataset: dataset.clone(),
                spec: spec.clone(),
                indices: Arc::from(accumulator.as_slice()),
                complete,
            };

            if complete {
                return;
            }

            start = end;
            pause(config.inter_slice_delay).await;
        }
    })
}

async fn pause(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}

/// Drive a single run to the end without a scheduler
pub async fn run_to_completion(
    dataset: Dataset,
    spec: FilterSpecification,
    config: SchedulerConfig,
) -> FilteredResult {
    let token = GenerationToken::new();
    let generation = token.advance();
    let spec = Arc::new(spec);
    let mut last = FilteredResult::pending(generation, dataset.clone(), spec.clone());

    let mut stream = filter_stream(dataset, spec, config, token, generation);
    while let Some(result) = stream.next().await {
        last = result;
    }
    last
}

/// Owns the generation token and the published result.
///
/// Consumers watch [`FilterScheduler::subscribe`] and see a sequence of
/// growing partial results per generation, ending in one complete result.
pub struct FilterScheduler {
    config: SchedulerConfig,
    token: GenerationToken,
    sender: Arc<watch::Sender<FilteredResult>>,
    running: Option<JoinHandle<RunOutcome>>,
    last_outcome: Option<RunOutcome>,
}

impl FilterScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let initial = FilteredResult::pending(
            0,
            Dataset::new(Vec::new()),
            Arc::new(FilterSpecification::default()),
        );
        let (sender, _receiver) = watch::channel(initial);
        Self {
            config,
            token: GenerationToken::new(),
            sender: Arc::new(sender),
            running: None,
            last_outcome: None,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.token.current()
    }

    /// Supersede any in-flight run and start a new one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger(&mut self, dataset: Dataset, spec: FilterSpecification) -> u64 {
        let generation = self.token.advance();
        let spec = Arc::new(spec);

        self.stop_running();

        self.sender
            .send_replace(FilteredResult::pending(generation, dataset.clone(), spec.clone()));

        let stream = filter_stream(dataset, spec, self.config.clone(), self.token.clone(), generation);
        let sender = self.sender.clone();
        let token = self.token.clone();
        self.running = Some(tokio::spawn(drive(stream, sender, token, generation)));

        generation
    }

    /// Supersede the in-flight run without starting a new one.
    ///
    /// Consumers see an empty, incomplete result of the new generation.
    pub fn cancel(&mut self) -> u64 {
        let generation = self.token.advance();
        self.stop_running();
        self.sender.send_replace(FilteredResult::pending(
            generation,
            Dataset::new(Vec::new()),
            Arc::new(FilterSpecification::default()),
        ));
        debug!(generation, "Filter run cancelled");
        generation
    }

    fn stop_running(&mut self) {
        if let Some(previous) = self.running.take() {
            if previous.is_finished() {
                self.last_outcome = Some(RunOutcome::Completed);
            } else {
                previous.abort();
                self.last_outcome = Some(RunOutcome::Superseded);
            }
        }
    }

    /// How the most recently replaced or joined run ended
    pub fn last_outcome(&self) -> Option<RunOutcome> {
        self.last_outcome
    }

    pub fn subscribe(&self) -> watch::Receiver<FilteredResult> {
        self.sender.subscribe()
    }

    /// Most recently published result
    pub fn latest(&self) -> FilteredResult {
        self.sender.borrow().clone()
    }

    pub fn state(&self) -> SchedulerState {
        match &self.running {
            Some(handle) if !handle.is_finished() => SchedulerState::Running {
                generation: self.token.current(),
            },
            _ => SchedulerState::Idle,
        }
    }

    /// Wait for the complete result of the latest generation
    pub async fn wait_for_completion(&self) -> Result<FilteredResult> {
        if self.token.current() == 0 {
            return Err(Error::Config("No filter run has been triggered".to_string()));
        }

        let mut receiver = self.sender.subscribe();
        loop {
            {
                let current = receiver.borrow_and_update();
                if current.generation == self.token.current() && current.complete {
                    return Ok(current.clone());
                }
            }
            if self.running.is_none() {
                return Err(Error::Join("Filter run was cancelled".to_string()));
            }
            receiver
                .changed()
                .await
                .map_err(|e| Error::Join(e.to_string()))?;
        }
    }

    /// Await the in-flight run task, if any
    pub async fn join(&mut self) -> Result<Option<RunOutcome>> {
        match self.running.take() {
            Some(handle) => {
                let outcome = handle.await.map_err(|e| Error::Join(e.to_string()))?;
                self.last_outcome = Some(outcome);
                Ok(Some(outcome))
            }
            None => Ok(None),
        }
    }
}

impl Drop for FilterScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.running.take() {
            handle.abort();
        }
    }
}

/// Forward a run's results into the watch channel while it stays current
async fn drive<S>(
    mut stream: S,
    sender: Arc<watch::Sender<FilteredResult>>,
    token: GenerationToken,
    generation: u64,
) -> RunOutcome
where
    S: Stream<Item = FilteredResult> + Unpin,
{
    while let Some(result) = stream.next().await {
        let complete = result.complete;
        let matched = result.len();

        // The generation check and the write happen under the channel's lock,
        // so a newer trigger's reset can never be overwritten.
        let published = sender.send_if_modified(|current| {
            if !token.is_current(generation) || current.generation != generation {
                return false;
            }
            *current = result;
            true
        });

        if !published {
            debug!(generation, "Dropped result of superseded filter run");
            return RunOutcome::Superseded;
        }

        if complete {
            info!(generation, matched, "Filter run complete");
            return RunOutcome::Completed;
        }
    }

    RunOutcome::Superseded
}
