use callcheck::models::MatchPosition;
use callcheck::{
    analyze, build_segments, score, AnalysisOverlay, ScoringMode, Segment, Topic, TopicRegistry,
    TopicResult,
};

const TRANSCRIPTS: &[&str] = &[
    "",
    "Hello, thanks for calling.",
    "Our rate is $185 per hour with a 3 hour minimum and a crew of 3.",
    "We guarantee there are no hidden fees. Insurance coverage is included, coverage is full value protection.",
    "Deposit collected: $150 deposit on the credit card. Price will never change!",
    "Café déjà vu: the price is $199 an hour, insurance included. 🚚 Second stop is fine.",
    "PRICE price Price, pricing; cost-cost estimate/quote",
];

fn run(transcript: &str) -> Vec<TopicResult> {
    analyze(transcript, &TopicRegistry::builtin(), &AnalysisOverlay::new())
}

fn joined(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

#[test]
fn segments_reproduce_transcript() {
    for transcript in TRANSCRIPTS {
        let segments = build_segments(transcript, &run(transcript));
        assert_eq!(joined(&segments), *transcript);
    }
}

#[test]
fn segments_reproduce_transcript_with_stale_positions() {
    let transcript = "short";
    let mut results = run("Our rate is $185 per hour with insurance.");
    results[0].positions.push(MatchPosition {
        start: 2,
        end: 400,
        matched_text: "stale".to_string(),
    });

    let segments = build_segments(transcript, &results);
    assert_eq!(joined(&segments), transcript);
}

#[test]
fn empty_transcript_fails_every_scored_topic() {
    let results = run("");
    let summary = score(&results);

    assert_eq!(results.len(), 8);
    assert!(results.iter().all(|r| !r.passed && r.positions.is_empty()));
    assert_eq!(summary.percent, 0);
    assert_eq!(summary.passed_count, 0);
    assert_eq!(summary.scored_total, 5);
    assert_eq!(summary.flagged_count, 0);
    assert!(build_segments("", &results).is_empty());
}

#[test]
fn highlights_never_overlap() {
    for transcript in TRANSCRIPTS {
        let results = run(transcript);
        let segments = build_segments(transcript, &results);

        let mut offset = 0;
        let mut last_end = 0;
        for segment in &segments {
            let start = offset;
            let end = offset + segment.text.len();
            if let Some(topic_id) = &segment.topic_id {
                assert!(start >= last_end);
                let result = results.iter().find(|r| r.topic_id() == topic_id).unwrap();
                assert!(
                    result.positions.iter().any(|p| p.start == start && p.end == end),
                    "highlight {:?} at {}..{} has no backing position",
                    segment.text,
                    start,
                    end
                );
                last_end = end;
            }
            offset = end;
        }
    }
}

#[test]
fn analysis_is_idempotent() {
    let overlay = AnalysisOverlay::new()
        .with_custom_keywords("insurance", ["policy"])
        .with_active_parameters("price", [185, 199]);
    let registry = TopicRegistry::builtin();

    for transcript in TRANSCRIPTS {
        let first = analyze(transcript, &registry, &overlay);
        let second = analyze(transcript, &registry, &overlay);
        assert_eq!(first, second);
    }
}

#[test]
fn positions_unique_by_start() {
    for transcript in TRANSCRIPTS {
        for result in run(transcript) {
            let mut starts: Vec<usize> = result.positions.iter().map(|p| p.start).collect();
            let total = starts.len();
            starts.dedup();
            assert_eq!(starts.len(), total, "topic {}", result.topic_id());
            assert!(result.positions.windows(2).all(|w| w[0].start < w[1].start));
        }
    }
}

#[test]
fn unscored_topics_never_change_denominator() {
    let transcript = "Flat rate, guaranteed. Insurance included. Second stop too.";
    let standard = Topic::new("insurance", "Insurance", ScoringMode::Standard).with_keywords(["insurance"]);
    let neutral = Topic::new("flatrate", "Flat Rate", ScoringMode::Neutral).with_keywords(["flat rate"]);
    let inverted = Topic::new("redflag", "Red Flag", ScoringMode::Inverted).with_keywords(["guaranteed"]);
    let missing_neutral =
        Topic::new("stops", "Stops", ScoringMode::Neutral).with_keywords(["third stop"]);

    let base = TopicRegistry::new(vec![standard.clone()]).unwrap();
    let extended =
        TopicRegistry::new(vec![standard, neutral, inverted, missing_neutral]).unwrap();

    let base_score = score(&analyze(transcript, &base, &AnalysisOverlay::new()));
    let extended_score = score(&analyze(transcript, &extended, &AnalysisOverlay::new()));

    assert_eq!(base_score.scored_total, 1);
    assert_eq!(extended_score.scored_total, 1);
    assert_eq!(extended_score.percent, base_score.percent);
    assert_eq!(extended_score.flagged_count, 1);
}

#[test]
fn keywords_match_whole_words_only() {
    let topic = Topic::new("price", "Price", ScoringMode::Standard).with_keywords(["rate"]);
    let registry = TopicRegistry::new(vec![topic]).unwrap();

    for transcript in ["accurate", "the rates", "ratepayer", "pirate"] {
        let results = analyze(transcript, &registry, &AnalysisOverlay::new());
        assert!(!results[0].passed, "matched inside {:?}", transcript);
    }

    let results = analyze("Rate: fine", &registry, &AnalysisOverlay::new());
    assert!(results[0].passed);
    assert_eq!(results[0].positions[0].matched_text, "Rate");
}
