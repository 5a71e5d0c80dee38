use serde::{Deserialize, Serialize};

use crate::models::{ScoringMode, TopicResult};

/// Letter-style band for a percent score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Good,
    NeedsWork,
    Failed,
}

impl Grade {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            100.. => Grade::Excellent,
            67..=99 => Grade::Good,
            33..=66 => Grade::NeedsWork,
            _ => Grade::Failed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::Excellent => "EXCELLENT",
            Grade::Good => "GOOD",
            Grade::NeedsWork => "NEEDS WORK",
            Grade::Failed => "FAILED",
        }
    }
}

/// Aggregate score over a set of topic results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// 0-100, rounded half up
    pub percent: u8,
    /// Standard topics that passed
    pub passed_count: usize,
    /// Number of standard topics
    pub scored_total: usize,
    /// Inverted topics that matched
    pub flagged_count: usize,
    pub grade: Grade,
}

impl ScoreSummary {
    /// Every scored topic passed and nothing was flagged
    pub fn fully_passed(&self) -> bool {
        self.passed_count == self.scored_total && self.flagged_count == 0
    }
}

/// Per-topic outcome shown on the checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicVerdict {
    Pass,
    Fail,
    NotApplicable,
    RedFlag,
    Clean,
}

impl TopicVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            TopicVerdict::Pass => "PASS",
            TopicVerdict::Fail => "FAIL",
            TopicVerdict::NotApplicable => "N/A",
            TopicVerdict::RedFlag => "RED FLAG",
            TopicVerdict::Clean => "CLEAN",
        }
    }
}

pub fn verdict(result: &TopicResult) -> TopicVerdict {
    match (result.topic.scoring_mode, result.passed) {
        (ScoringMode::Inverted, true) => TopicVerdict::RedFlag,
        (ScoringMode::Inverted, false) => TopicVerdict::Clean,
        (ScoringMode::Neutral, false) => TopicVerdict::NotApplicable,
        (ScoringMode::Standard, false) => TopicVerdict::Fail,
        (_, true) => TopicVerdict::Pass,
    }
}

/// Score a call
///
/// Only standard topics are in the denominator. An empty population scores
/// 100. Inverted matches are counted in `flagged_count` and never move the
/// percentage.
pub fn score(results: &[TopicResult]) -> ScoreSummary {
    let mut passed_count = 0;
    let mut scored_total = 0;
    let mut flagged_count = 0;

    for result in results {
        match result.topic.scoring_mode {
            ScoringMode::Standard => {
                scored_total += 1;
                if result.passed {
                    passed_count += 1;
                }
            }
            ScoringMode::Inverted => {
                if result.passed {
                    flagged_count += 1;
                }
            }
            ScoringMode::Neutral => {}
        }
    }

    let percent = round_half_up_percent(passed_count, scored_total);

    ScoreSummary {
        percent,
        passed_count,
        scored_total,
        flagged_count,
        grade: Grade::from_percent(percent),
    }
}

fn round_half_up_percent(passed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    // floor(100 * p / t + 1/2) in integers
    let pct = (200 * passed + total) / (2 * total);
    pct.min(100) as u8
}

/// Standard topics that were not covered
pub fn missed_topics(results: &[TopicResult]) -> Vec<&TopicResult> {
    results.iter().filter(|r| r.is_missed()).collect()
}

/// Inverted topics that matched
pub fn red_flags(results: &[TopicResult]) -> Vec<&TopicResult> {
    results.iter().filter(|r| r.is_red_flag()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Topic;

    fn result(id: &str, mode: ScoringMode, passed: bool) -> TopicResult {
        TopicResult {
            topic: Topic::new(id, id, mode),
            passed,
            match_labels: if passed { vec![id.to_string()] } else { vec![] },
            positions: vec![],
        }
    }

    fn standard(passed_flags: &[bool]) -> Vec<TopicResult> {
        passed_flags
            .iter()
            .enumerate()
            .map(|(i, &p)| result(&format!("t{}", i), ScoringMode::Standard, p))
            .collect()
    }

    #[test]
    fn test_empty_population_scores_100() {
        let summary = score(&[result("redflag", ScoringMode::Inverted, false)]);

        assert_eq!(summary.percent, 100);
        assert_eq!(summary.scored_total, 0);
        assert_eq!(summary.grade, Grade::Excellent);
    }

    #[test]
    fn test_round_half_up_at_boundary() {
        // 1/8 = 12.5%
        let mut flags = vec![false; 8];
        flags[0] = true;
        assert_eq!(score(&standard(&flags)).percent, 13);

        // 5/8 = 62.5%
        let flags = [true, true, true, true, true, false, false, false];
        assert_eq!(score(&standard(&flags)).percent, 63);

        // 2/3 = 66.67%
        assert_eq!(score(&standard(&[true, true, false])).percent, 67);
        // 1/3 = 33.33%
        assert_eq!(score(&standard(&[true, false, false])).percent, 33);
    }

    #[test]
    fn test_neutral_and_inverted_excluded() {
        let mut results = standard(&[true, false]);
        let base = score(&results);

        results.push(result("flatrate", ScoringMode::Neutral, false));
        results.push(result("stops", ScoringMode::Neutral, true));
        results.push(result("redflag", ScoringMode::Inverted, true));
        let summary = score(&results);

        assert_eq!(summary.scored_total, base.scored_total);
        assert_eq!(summary.percent, 50);
        assert_eq!(summary.flagged_count, 1);
        assert!(!summary.fully_passed());
    }

    #[test]
    fn test_clean_red_flag_topic() {
        let results = vec![
            result("price", ScoringMode::Standard, true),
            result("redflag", ScoringMode::Inverted, false),
        ];
        let summary = score(&results);

        assert_eq!(summary.percent, 100);
        assert_eq!(summary.flagged_count, 0);
        assert!(summary.fully_passed());
        assert_eq!(verdict(&results[1]), TopicVerdict::Clean);
    }

    #[test]
    fn test_verdicts() {
        assert_eq!(verdict(&result("a", ScoringMode::Standard, true)), TopicVerdict::Pass);
        assert_eq!(verdict(&result("a", ScoringMode::Standard, false)), TopicVerdict::Fail);
        assert_eq!(verdict(&result("a", ScoringMode::Neutral, true)), TopicVerdict::Pass);
        assert_eq!(
            verdict(&result("a", ScoringMode::Neutral, false)),
            TopicVerdict::NotApplicable
        );
        assert_eq!(verdict(&result("a", ScoringMode::Inverted, true)), TopicVerdict::RedFlag);
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(Grade::from_percent(100), Grade::Excellent);
        assert_eq!(Grade::from_percent(67), Grade::Good);
        assert_eq!(Grade::from_percent(66), Grade::NeedsWork);
        assert_eq!(Grade::from_percent(33), Grade::NeedsWork);
        assert_eq!(Grade::from_percent(32), Grade::Failed);
    }

    #[test]
    fn test_missed_and_red_flags() {
        let results = vec![
            result("price", ScoringMode::Standard, false),
            result("flatrate", ScoringMode::Neutral, false),
            result("redflag", ScoringMode::Inverted, true),
        ];

        let missed = missed_topics(&results);
        let flags = red_flags(&results);

        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].topic_id(), "price");
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].topic_id(), "redflag");
    }
}
