//! Derived views over filtered records used by the map, scatter and topic panels.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::{AdvancementStatus, Borough, IdeaRecord};

/// How far an idea got, for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancementTier {
    NotAdvanced,
    BoroughReview,
    Finalist,
}

impl From<Option<&AdvancementStatus>> for AdvancementTier {
    fn from(status: Option<&AdvancementStatus>) -> Self {
        match status {
            None => AdvancementTier::NotAdvanced,
            Some(s) if s.shortlisted => AdvancementTier::Finalist,
            Some(_) => AdvancementTier::BoroughReview,
        }
    }
}

pub fn advancement_tier(record: &IdeaRecord) -> AdvancementTier {
    AdvancementTier::from(record.status.as_ref())
}

/// Group records under each of their topic tags.
///
/// Tags are trimmed and blank tags skipped; a record with several tags
/// appears in several groups.
pub fn topic_splits<'a, I>(records: I) -> BTreeMap<String, Vec<&'a IdeaRecord>>
where
    I: IntoIterator<Item = &'a IdeaRecord>,
{
    let mut splits: BTreeMap<String, Vec<&'a IdeaRecord>> = BTreeMap::new();
    for record in records {
        for tag in record.topic_tags() {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            splits.entry(tag.to_string()).or_default().push(record);
        }
    }
    splits
}

/// Number of records per borough; every borough is present
pub fn location_counts<'a, I>(records: I) -> BTreeMap<Borough, usize>
where
    I: IntoIterator<Item = &'a IdeaRecord>,
{
    let mut counts: BTreeMap<Borough, usize> = Borough::all().into_iter().map(|b| (b, 0)).collect();
    for record in records {
        *counts.entry(record.borough).or_insert(0) += 1;
    }
    counts
}

/// Stable ordering: not advanced, then advanced without ballot, then ballot
pub fn stage_ordering<'a, I>(records: I) -> Vec<&'a IdeaRecord>
where
    I: IntoIterator<Item = &'a IdeaRecord>,
{
    let mut ordered: Vec<&'a IdeaRecord> = records.into_iter().collect();
    ordered.sort_by_key(|r| match &r.status {
        None => 0,
        Some(s) if !s.final_ballot => 1,
        Some(_) => 2,
    });
    ordered
}
