//! Incremental filtering and stage classification for civic idea datasets.
//!
//! A validated dataset is filtered in bounded slices so an interactive
//! caller stays responsive; every filter change supersedes the run in
//! flight, and the filtered records can be split into pipeline-stage
//! buckets for the views.

pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod processor;
pub mod selectors;
pub mod store;
pub mod types;

pub use classify::{classify, classify_result, StageBuckets, StageCounts};
pub use config::{SchedulerConfig, SchedulerConfigBuilder, StageRule};
pub use error::{Error, Result};
pub use filter::{matches, matches_with_rule, FilterResult, FilterSpecification, RecordFilter};
pub use loader::{Dataset, DatasetId, LoadReport, LoadState};
pub use processor::{
    filter_stream, run_to_completion, FilterScheduler, FilteredResult, GenerationToken,
    RunOutcome, SchedulerState,
};
pub use store::IdeaStore;
pub use types::{AdvancementStatus, Borough, IdeaRecord, Stage};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::classify::{classify, classify_result, StageCounts};
    pub use crate::config::{SchedulerConfig, SchedulerConfigBuilder, StageRule};
    pub use crate::error::{Error, Result};
    pub use crate::filter::FilterSpecification;
    pub use crate::loader::{Dataset, LoadState};
    pub use crate::processor::{FilterScheduler, FilteredResult};
    pub use crate::store::IdeaStore;
    pub use crate::types::{Borough, IdeaRecord, Stage};
    pub use futures::StreamExt;
}
