use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The five locations an idea can be filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Borough {
    Brooklyn,
    Bronx,
    Manhattan,
    Queens,
    #[serde(rename = "staten island")]
    StatenIsland,
}

impl Borough {
    /// All boroughs, in display order
    pub fn all() -> [Borough; 5] {
        [
            Borough::Brooklyn,
            Borough::Bronx,
            Borough::Manhattan,
            Borough::Queens,
            Borough::StatenIsland,
        ]
    }

    /// Wire name of the borough
    pub fn as_str(&self) -> &'static str {
        match self {
            Borough::Brooklyn => "brooklyn",
            Borough::Bronx => "bronx",
            Borough::Manhattan => "manhattan",
            Borough::Queens => "queens",
            Borough::StatenIsland => "staten island",
        }
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Borough {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        Borough::all()
            .into_iter()
            .find(|b| b.as_str() == normalized)
            .ok_or_else(|| {
                Error::Config(format!(
                    "Invalid borough '{}'. Allowed values are: brooklyn, bronx, manhattan, queens, staten island",
                    s
                ))
            })
    }
}

/// Pipeline gate an idea may pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    #[serde(rename = "submitted")]
    Submitted,
    #[serde(rename = "BA")]
    BoroughReview,
    #[serde(rename = "ballot")]
    Ballot,
}

impl Stage {
    pub fn all() -> [Stage; 3] {
        [Stage::Submitted, Stage::BoroughReview, Stage::Ballot]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Submitted => "submitted",
            Stage::BoroughReview => "BA",
            Stage::Ballot => "ballot",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "submitted" => Ok(Stage::Submitted),
            "ba" | "borough-review" | "borough_review" | "boroughreview" => {
                Ok(Stage::BoroughReview)
            }
            "ballot" => Ok(Stage::Ballot),
            _ => Err(Error::Config(format!(
                "Invalid stage '{}'. Allowed values are: submitted, BA, ballot",
                s
            ))),
        }
    }
}

/// Borough assembly outcome for an idea that advanced past submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementStatus {
    #[serde(rename = "BAImpactArea")]
    pub impact_area: Vec<String>,
    #[serde(rename = "BASubcategory")]
    pub subcategory: Vec<String>,
    /// Selected as one of the finalists
    #[serde(rename = "Final20Ideas")]
    pub shortlisted: bool,
    #[serde(rename = "FinalBallot")]
    pub final_ballot: bool,
    #[serde(rename = "FinalDescription", deserialize_with = "required_nullable")]
    pub final_description: Option<String>,
    #[serde(rename = "FinalTitle", deserialize_with = "required_nullable")]
    pub final_title: Option<String>,
}

/// A single submitted idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaRecord {
    pub audience: Vec<String>,
    pub borough: Borough,
    pub flags: Vec<String>,
    #[serde(rename = "IGSession")]
    pub session: String,
    #[serde(rename = "originalTitle")]
    pub original_title: String,
    pub challenge: String,
    /// Narrative text searched by keyword filtering
    pub solution: String,
    #[serde(rename = "ideaType")]
    pub idea_type: String,
    /// Topic tags
    #[serde(rename = "impactArea")]
    pub impact_area: Vec<String>,
    #[serde(rename = "subCategory")]
    pub sub_category: Vec<String>,
    /// `None` when the idea never advanced past submission
    #[serde(deserialize_with = "required_nullable")]
    pub status: Option<AdvancementStatus>,
}

impl IdeaRecord {
    pub fn narrative_text(&self) -> &str {
        &self.solution
    }

    pub fn topic_tags(&self) -> &[String] {
        &self.impact_area
    }

    pub fn audience_tags(&self) -> &[String] {
        &self.audience
    }

    pub fn has_advanced(&self) -> bool {
        self.status.is_some()
    }

    pub fn on_final_ballot(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.final_ballot)
    }

    pub fn shortlisted(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.shortlisted)
    }
}

/// Field must be present, but may be `null`.
fn required_nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}
