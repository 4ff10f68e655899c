#![allow(dead_code)]

use ideaflow::{AdvancementStatus, Borough, Dataset, IdeaRecord};

/// Builder for idea records used across tests
pub struct IdeaBuilder {
    record: IdeaRecord,
}

impl IdeaBuilder {
    pub fn new() -> Self {
        Self {
            record: IdeaRecord {
                audience: vec!["Everyone".to_string()],
                borough: Borough::Brooklyn,
                flags: vec![],
                session: "Session 1".to_string(),
                original_title: "Untitled idea".to_string(),
                challenge: "A challenge".to_string(),
                solution: "A solution".to_string(),
                idea_type: "Type A".to_string(),
                impact_area: vec![],
                sub_category: vec![],
                status: None,
            },
        }
    }

    pub fn borough(mut self, borough: Borough) -> Self {
        self.record.borough = borough;
        self
    }

    pub fn topics(mut self, topics: &[&str]) -> Self {
        self.record.impact_area = topics.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn audience(mut self, audience: &[&str]) -> Self {
        self.record.audience = audience.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn solution(mut self, text: &str) -> Self {
        self.record.solution = text.to_string();
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.record.original_title = title.to_string();
        self
    }

    pub fn advanced(mut self, shortlisted: bool, final_ballot: bool) -> Self {
        self.record.status = Some(AdvancementStatus {
            impact_area: self.record.impact_area.clone(),
            subcategory: vec![],
            shortlisted,
            final_ballot,
            final_description: None,
            final_title: None,
        });
        self
    }

    pub fn build(self) -> IdeaRecord {
        self.record
    }
}

const TOPICS: [&[&str]; 4] = [
    &["Education"],
    &["Education", "Public Safety"],
    &["Public Safety", "Arts & Culture"],
    &["Health & Wellbeing"],
];

const SOLUTIONS: [&str; 5] = [
    "Build a community Garden on the empty lot",
    "Fund after-school tutoring",
    "Add GARDEN beds to school yards",
    "Start a gardening club for seniors",
    "Install brighter street lights",
];

/// 250 ideas: 60 advanced, 20 of those on the final ballot, 5 of those shortlisted.
///
/// Every fourth idea (starting at index 1) advanced; of the advanced ones,
/// every third is on the ballot and every twelfth is shortlisted.
pub fn synthetic_records() -> Vec<IdeaRecord> {
    let mut advanced = 0;
    (0..250)
        .map(|i| {
            let builder = IdeaBuilder::new()
                .borough(Borough::all()[i % 5])
                .topics(TOPICS[i % TOPICS.len()])
                .solution(SOLUTIONS[i % SOLUTIONS.len()])
                .title(&format!("Idea {}", i));

            if i % 4 == 1 && advanced < 60 {
                let k = advanced;
                advanced += 1;
                builder.advanced(k % 12 == 0, k % 3 == 0).build()
            } else {
                builder.build()
            }
        })
        .collect()
}

pub fn synthetic_dataset() -> Dataset {
    Dataset::new(synthetic_records())
}

/// Raw JSON for one valid idea
pub fn idea_json(borough: &str) -> serde_json::Value {
    serde_json::json!({
        "audience": ["Families"],
        "borough": borough,
        "flags": [],
        "IGSession": "Session 3",
        "originalTitle": "Shade trees",
        "challenge": "Hot sidewalks",
        "solution": "Plant trees along the avenue",
        "ideaType": "Type B",
        "impactArea": ["Environment & Public Space"],
        "subCategory": ["Type C"],
        "status": {
            "BAImpactArea": ["Environment & Public Space"],
            "BASubcategory": [],
            "Final20Ideas": false,
            "FinalBallot": true,
            "FinalDescription": null,
            "FinalTitle": "Shade the avenue"
        }
    })
}
