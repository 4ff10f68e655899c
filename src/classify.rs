use serde::Serialize;

use crate::processor::FilteredResult;
use crate::types::{IdeaRecord, Stage};

/// Records at the selected stage, and how they split one gate further
#[derive(Debug, Clone)]
pub struct StageBuckets<'a> {
    pub stage: Stage,
    pub at_stage: Vec<&'a IdeaRecord>,
    pub advanced: Vec<&'a IdeaRecord>,
    pub not_advanced: Vec<&'a IdeaRecord>,
}

/// Bucket sizes, for summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub stage: Stage,
    pub at_stage: usize,
    pub advanced: usize,
    pub not_advanced: usize,
}

impl<'a> StageBuckets<'a> {
    pub fn counts(&self) -> StageCounts {
        StageCounts {
            stage: self.stage,
            at_stage: self.at_stage.len(),
            advanced: self.advanced.len(),
            not_advanced: self.not_advanced.len(),
        }
    }
}

/// Split filtered records into the three buckets for `stage`.
///
/// | stage     | at stage         | advanced         | not advanced              |
/// |-----------|------------------|------------------|---------------------------|
/// | submitted | all              | status present   | status absent             |
/// | BA        | status present   | final ballot     | status, not final ballot  |
/// | ballot    | final ballot     | shortlisted      | status, not shortlisted   |
///
/// Each bucket keeps the input order.
pub fn classify<'a, I>(records: I, stage: Stage) -> StageBuckets<'a>
where
    I: IntoIterator<Item = &'a IdeaRecord>,
{
    let mut buckets = StageBuckets {
        stage,
        at_stage: Vec::new(),
        advanced: Vec::new(),
        not_advanced: Vec::new(),
    };

    for record in records {
        let (at_stage, advanced, not_advanced) = match (stage, &record.status) {
            (Stage::Submitted, None) => (true, false, true),
            (Stage::Submitted, Some(_)) => (true, true, false),
            (Stage::BoroughReview, None) => (false, false, false),
            (Stage::BoroughReview, Some(s)) => (true, s.final_ballot, !s.final_ballot),
            (Stage::Ballot, None) => (false, false, false),
            (Stage::Ballot, Some(s)) => (s.final_ballot, s.shortlisted, !s.shortlisted),
        };

        if at_stage {
            buckets.at_stage.push(record);
        }
        if advanced {
            buckets.advanced.push(record);
        }
        if not_advanced {
            buckets.not_advanced.push(record);
        }
    }

    buckets
}

/// Classify a filtered result at the stage its filter selected
pub fn classify_result(result: &FilteredResult) -> StageBuckets<'_> {
    classify(result.iter(), result.spec().stage())
}
