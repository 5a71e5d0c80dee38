use serde::{Deserialize, Serialize};

use super::{ScoringMode, Topic};

/// One occurrence of a keyword or pattern in the transcript
///
/// Offsets are UTF-8 byte offsets into the transcript, `start < end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPosition {
    pub start: usize,
    pub end: usize,
    /// The transcript text covered by `start..end`
    pub matched_text: String,
}

/// Detection outcome for a single topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicResult {
    pub topic: Topic,
    /// True iff `match_labels` is non-empty
    pub passed: bool,
    /// Unique labels in the order they were first matched
    pub match_labels: Vec<String>,
    /// Sorted by start, at most one position per start offset
    pub positions: Vec<MatchPosition>,
}

impl TopicResult {
    pub fn topic_id(&self) -> &str {
        &self.topic.id
    }

    pub fn scoring_mode(&self) -> ScoringMode {
        self.topic.scoring_mode
    }

    /// Matched and the topic flags an unwanted condition
    pub fn is_red_flag(&self) -> bool {
        self.passed && self.topic.scoring_mode == ScoringMode::Inverted
    }

    /// Missed a topic that counts toward the score
    pub fn is_missed(&self) -> bool {
        !self.passed && self.topic.scoring_mode.is_scored()
    }
}

/// A contiguous run of transcript text, highlighted for at most one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            topic_id: None,
        }
    }

    pub fn highlighted(text: impl Into<String>, topic_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            topic_id: Some(topic_id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_flag_and_missed() {
        let flagged = TopicResult {
            topic: Topic::new("redflag", "Unusual Promises", ScoringMode::Inverted),
            passed: true,
            match_labels: vec!["Guarantee".to_string()],
            positions: vec![],
        };
        assert!(flagged.is_red_flag());
        assert!(!flagged.is_missed());

        let missed = TopicResult {
            topic: Topic::new("insurance", "Insurance", ScoringMode::Standard),
            passed: false,
            match_labels: vec![],
            positions: vec![],
        };
        assert!(missed.is_missed());

        let neutral = TopicResult {
            topic: Topic::new("flatrate", "Flat Rate", ScoringMode::Neutral),
            passed: false,
            match_labels: vec![],
            positions: vec![],
        };
        assert!(!neutral.is_missed());
    }

    #[test]
    fn test_plain_segment_omits_topic_id() {
        let json = serde_json::to_string(&Segment::plain("hello")).unwrap();
        assert_eq!(json, r#"{"text":"hello"}"#);
    }
}
