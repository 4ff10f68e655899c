mod common;

use common::{synthetic_records, IdeaBuilder};
use ideaflow::{
    matches, matches_with_rule, Borough, FilterResult, FilterSpecification, IdeaRecord,
    RecordFilter, Stage, StageRule,
};

fn matching_titles(records: &[IdeaRecord], spec: &FilterSpecification) -> Vec<String> {
    records
        .iter()
        .filter(|r| matches(r, spec))
        .map(|r| r.original_title.clone())
        .collect()
}

#[test]
fn test_default_spec_keeps_everything() {
    let records = synthetic_records();
    let spec = FilterSpecification::default();
    assert!(records.iter().all(|r| matches(r, &spec)));
}

#[test]
fn test_keyword_is_case_insensitive_substring() {
    let records = vec![
        IdeaBuilder::new().title("a").solution("Community Garden on Main St").build(),
        IdeaBuilder::new().title("b").solution("More GARDEN beds").build(),
        IdeaBuilder::new().title("c").solution("A gardening club").build(),
        IdeaBuilder::new().title("d").solution("Gard en party").build(),
        IdeaBuilder::new().title("e").solution("Rooftop farm").build(),
    ];

    let lower = FilterSpecification::new().with_keyword(Some("garden"));
    assert_eq!(matching_titles(&records, &lower), vec!["a", "b", "c"]);

    let upper = FilterSpecification::new().with_keyword(Some("GARDEN"));
    assert_eq!(matching_titles(&records, &upper), vec!["a", "b", "c"]);
}

#[test]
fn test_keyword_searches_solution_only() {
    let idea = IdeaBuilder::new()
        .title("Garden")
        .solution("Repave the plaza")
        .build();
    let spec = FilterSpecification::new().with_keyword(Some("garden"));
    assert!(!matches(&idea, &spec));
}

#[test]
fn test_topic_tags_require_all() {
    let records = vec![
        IdeaBuilder::new().title("both").topics(&["Education", "Public Safety"]).build(),
        IdeaBuilder::new().title("edu").topics(&["Education"]).build(),
        IdeaBuilder::new().title("safety").topics(&["Public Safety", "Other"]).build(),
        IdeaBuilder::new()
            .title("superset")
            .topics(&["Arts & Culture", "Public Safety", "Education"])
            .build(),
    ];

    let spec = FilterSpecification::new().with_topic_tags(["Education", "Public Safety"]);
    assert_eq!(matching_titles(&records, &spec), vec!["both", "superset"]);
}

#[test]
fn test_audience_tags_require_all() {
    let records = vec![
        IdeaBuilder::new().title("a").audience(&["Families", "Seniors (65+)"]).build(),
        IdeaBuilder::new().title("b").audience(&["Families"]).build(),
    ];

    let spec = FilterSpecification::new().with_audience_tags(["Families", "Seniors (65+)"]);
    assert_eq!(matching_titles(&records, &spec), vec!["a"]);

    let one = FilterSpecification::new().with_audience_tags(["Families"]);
    assert_eq!(matching_titles(&records, &one), vec!["a", "b"]);
}

#[test]
fn test_borough_clause() {
    let records = vec![
        IdeaBuilder::new().title("bk").borough(Borough::Brooklyn).build(),
        IdeaBuilder::new().title("si").borough(Borough::StatenIsland).build(),
    ];

    let spec = FilterSpecification::new().with_borough(Some(Borough::StatenIsland));
    assert_eq!(matching_titles(&records, &spec), vec!["si"]);

    let cleared = spec.with_borough(None);
    assert_eq!(matching_titles(&records, &cleared), vec!["bk", "si"]);
}

#[test]
fn test_stage_clause_observed() {
    let not_advanced = IdeaBuilder::new().build();
    let advanced = IdeaBuilder::new().advanced(false, false).build();
    let ballot = IdeaBuilder::new().advanced(false, true).build();

    let submitted = FilterSpecification::new().with_stage(Stage::Submitted);
    let review = FilterSpecification::new().with_stage(Stage::BoroughReview);
    let on_ballot = FilterSpecification::new().with_stage(Stage::Ballot);

    assert!(matches(&not_advanced, &submitted));
    assert!(matches(&advanced, &submitted));
    assert!(matches(&ballot, &submitted));

    // BA and ballot are the same test under the observed rule
    for spec in [&review, &on_ballot] {
        assert!(!matches(&not_advanced, spec));
        assert!(!matches(&advanced, spec));
        assert!(matches(&ballot, spec));
    }
}

#[test]
fn test_stage_clause_narrative() {
    let not_advanced = IdeaBuilder::new().build();
    let advanced = IdeaBuilder::new().advanced(false, false).build();
    let review = FilterSpecification::new().with_stage(Stage::BoroughReview);

    assert!(!matches_with_rule(&not_advanced, &review, StageRule::Narrative));
    assert!(matches_with_rule(&advanced, &review, StageRule::Narrative));

    let on_ballot = FilterSpecification::new().with_stage(Stage::Ballot);
    assert!(!matches_with_rule(&advanced, &on_ballot, StageRule::Narrative));
}

#[test]
fn test_clauses_are_conjunctive() {
    let idea = IdeaBuilder::new()
        .borough(Borough::Queens)
        .topics(&["Education"])
        .audience(&["Students"])
        .solution("Library garden")
        .advanced(false, true)
        .build();

    let all = FilterSpecification::new()
        .with_borough(Some(Borough::Queens))
        .with_topic_tags(["Education"])
        .with_audience_tags(["Students"])
        .with_keyword(Some("garden"))
        .with_stage(Stage::Ballot);
    assert!(matches(&idea, &all));

    let failing = [
        all.clone().with_borough(Some(Borough::Bronx)),
        all.clone().with_topic_tags(["Other"]),
        all.clone().with_audience_tags(["Seniors (65+)"]),
        all.clone().with_keyword(Some("bus lane")),
    ];
    for spec in &failing {
        assert!(!matches(&idea, spec), "expected {:?} to reject", spec);
    }
}

#[test]
fn test_tightening_never_grows_match_set() {
    let records = synthetic_records();
    let bases = [
        FilterSpecification::new(),
        FilterSpecification::new().with_keyword(Some("garden")),
        FilterSpecification::new().with_borough(Some(Borough::Bronx)),
        FilterSpecification::new().with_stage(Stage::Ballot),
    ];

    for base in bases {
        let base_matches = matching_titles(&records, &base);
        let tighter = [
            base.clone().with_topic_tags(["Education"]),
            base.clone().with_audience_tags(["Everyone", "Families"]),
            base.clone().with_keyword(Some("garden beds")),
            base.clone().with_stage(Stage::Ballot),
        ];
        for spec in tighter {
            let narrowed = matching_titles(&records, &spec);
            assert!(narrowed.len() <= base_matches.len());
            assert!(narrowed.iter().all(|t| base_matches.contains(t)));
        }
    }
}

#[test]
fn test_record_filter_trait() {
    let idea = IdeaBuilder::new().borough(Borough::Manhattan).build();
    let keep = FilterSpecification::new().with_borough(Some(Borough::Manhattan));
    let drop = FilterSpecification::new().with_borough(Some(Borough::Queens));
    assert_eq!(keep.should_keep(&idea), FilterResult::Keep);
    assert_eq!(drop.should_keep(&idea), FilterResult::FilterOut);
}

#[test]
fn test_keyword_whitespace_is_part_of_the_match() {
    let records = vec![
        IdeaBuilder::new().title("hyphen").solution("A community-garden plot").build(),
        IdeaBuilder::new().title("spaced").solution("Our Garden plot").build(),
        IdeaBuilder::new().title("end").solution("Plant a garden").build(),
    ];

    let leading = FilterSpecification::new().with_keyword(Some(" garden"));
    assert_eq!(leading.keyword(), Some(" garden"));
    assert_eq!(matching_titles(&records, &leading), vec!["spaced", "end"]);

    let trailing = FilterSpecification::new().with_keyword(Some("garden "));
    assert_eq!(matching_titles(&records, &trailing), vec!["spaced"]);

    let empty = FilterSpecification::new().with_keyword(Some(""));
    assert_eq!(matching_titles(&records, &empty).len(), 3);
}
