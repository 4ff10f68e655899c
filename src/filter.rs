use serde::Serialize;
use std::collections::BTreeSet;

use crate::config::StageRule;
use crate::types::{Borough, IdeaRecord, Stage};

/// Filter result indicating whether a record should be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Keep,
    FilterOut,
}

impl From<bool> for FilterResult {
    fn from(keep: bool) -> Self {
        if keep {
            FilterResult::Keep
        } else {
            FilterResult::FilterOut
        }
    }
}

/// Filter trait for idea records
pub trait RecordFilter {
    fn should_keep(&self, record: &IdeaRecord) -> FilterResult;
}

/// The active predicate over the dataset.
///
/// Values are never edited in place: every `with_*` call consumes the
/// specification and returns a new one, so a scheduler run can hold on to
/// the exact specification it was started with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterSpecification {
    keyword: Option<String>,
    #[serde(skip)]
    needle: Option<String>,
    borough: Option<Borough>,
    topic_tags: BTreeSet<String>,
    audience_tags: BTreeSet<String>,
    stage: Stage,
}

impl FilterSpecification {
    /// Specification that keeps every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the keyword. An empty keyword means "no constraint";
    /// whitespace is kept and takes part in the substring match.
    pub fn with_keyword(mut self, keyword: Option<&str>) -> Self {
        let keyword = keyword.filter(|k| !k.is_empty());
        self.keyword = keyword.map(str::to_string);
        self.needle = keyword.map(str::to_lowercase);
        self
    }

    pub fn with_borough(mut self, borough: Option<Borough>) -> Self {
        self.borough = borough;
        self
    }

    pub fn with_topic_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topic_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_audience_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audience_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn borough(&self) -> Option<Borough> {
        self.borough
    }

    pub fn topic_tags(&self) -> &BTreeSet<String> {
        &self.topic_tags
    }

    pub fn audience_tags(&self) -> &BTreeSet<String> {
        &self.audience_tags
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
}

impl RecordFilter for FilterSpecification {
    fn should_keep(&self, record: &IdeaRecord) -> FilterResult {
        matches(record, self).into()
    }
}

/// Evaluate the filter with the default stage rule
pub fn matches(record: &IdeaRecord, spec: &FilterSpecification) -> bool {
    matches_with_rule(record, spec, StageRule::Observed)
}

/// Conjunction of the location, topic, audience, keyword and stage clauses
pub fn matches_with_rule(record: &IdeaRecord, spec: &FilterSpecification, rule: StageRule) -> bool {
    borough_clause(record, spec)
        && contains_all(record.topic_tags(), &spec.topic_tags)
        && contains_all(record.audience_tags(), &spec.audience_tags)
        && keyword_clause(record, spec)
        && stage_clause(record, spec.stage, rule)
}

fn borough_clause(record: &IdeaRecord, spec: &FilterSpecification) -> bool {
    spec.borough.map_or(true, |b| record.borough == b)
}

/// Every required tag must appear on the record
fn contains_all(tags: &[String], required: &BTreeSet<String>) -> bool {
    required.iter().all(|r| tags.iter().any(|t| t == r))
}

fn keyword_clause(record: &IdeaRecord, spec: &FilterSpecification) -> bool {
    match &spec.needle {
        Some(needle) => record.narrative_text().to_lowercase().contains(needle.as_str()),
        None => true,
    }
}

/// Whether a record passes the stage gate selected in the filter
pub fn stage_clause(record: &IdeaRecord, stage: Stage, rule: StageRule) -> bool {
    match (stage, rule) {
        (Stage::Submitted, _) => true,
        (Stage::BoroughReview, StageRule::Observed) => record.on_final_ballot(),
        (Stage::BoroughReview, StageRule::Narrative) => record.has_advanced(),
        (Stage::Ballot, _) => record.on_final_ballot(),
    }
}
