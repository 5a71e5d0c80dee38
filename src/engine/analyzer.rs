use std::collections::HashSet;

use tracing::debug;

use super::matcher::{find_occurrences, KeywordRule};
use crate::models::{MatchPosition, TopicResult};
use crate::registry::{AnalysisOverlay, TopicRegistry};

/// Run every topic in the registry against a transcript
///
/// Returns one result per topic, in registry order. Never fails: invalid
/// patterns were already reduced to skips when the registry was built.
pub fn analyze(
    transcript: &str,
    registry: &TopicRegistry,
    overlay: &AnalysisOverlay,
) -> Vec<TopicResult> {
    registry
        .entries()
        .iter()
        .map(|entry| {
            let topic = &entry.topic;

            let custom: Vec<KeywordRule> = overlay
                .custom_keywords_for(&topic.id)
                .iter()
                .filter_map(|k| KeywordRule::compile(k))
                .collect();
            let keywords: Vec<KeywordRule> = entry
                .keyword_rules()
                .iter()
                .cloned()
                .chain(custom)
                .collect();

            let occurrences = find_occurrences(
                transcript,
                &keywords,
                entry.pattern_rules(),
                overlay.active_for(&topic.id),
            );

            let positions = dedup_by_start(occurrences.positions);

            debug!(
                "Topic {}: {} labels, {} positions",
                topic.id,
                occurrences.labels.len(),
                positions.len()
            );

            TopicResult {
                topic: topic.clone(),
                passed: !occurrences.labels.is_empty(),
                match_labels: occurrences.labels,
                positions,
            }
        })
        .collect()
}

/// Keep the first-discovered position per start offset, then sort by start
fn dedup_by_start(positions: Vec<MatchPosition>) -> Vec<MatchPosition> {
    let mut seen = HashSet::new();
    let mut kept: Vec<MatchPosition> = positions
        .into_iter()
        .filter(|p| seen.insert(p.start))
        .collect();
    kept.sort_by_key(|p| p.start);
    kept
}
