use serde::{Deserialize, Serialize};

/// How a topic's verdict feeds into the call score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// No match is a fail and the topic counts toward the score
    #[default]
    Standard,
    /// No match is "not applicable"; excluded from the score
    Neutral,
    /// A match is a red flag; excluded from the score, absence is clean
    Inverted,
}

impl ScoringMode {
    /// Whether this topic belongs to the scoring population
    pub fn is_scored(&self) -> bool {
        matches!(self, ScoringMode::Standard)
    }
}

/// A regex rule attached to a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPattern {
    /// Regex source, compiled case-insensitively
    pub pattern: String,
    /// Label reported when the pattern matches
    pub label: String,
    /// Numeric parameter (e.g. an hourly rate) gating this pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<u32>,
}

impl TopicPattern {
    pub fn new(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: label.into(),
            parameter: None,
        }
    }

    pub fn with_parameter(mut self, parameter: u32) -> Self {
        self.parameter = Some(parameter);
        self
    }
}

/// A named detection rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Unique stable identifier
    pub id: String,
    /// Human-readable name
    pub label: String,
    /// Literal keywords, matched case-insensitively on word boundaries
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Regex patterns
    #[serde(default)]
    pub patterns: Vec<TopicPattern>,
    #[serde(default)]
    pub scoring_mode: ScoringMode,
    /// Badge text shown for a missed neutral topic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miss_label: Option<String>,
}

impl Topic {
    pub fn new(id: impl Into<String>, label: impl Into<String>, scoring_mode: ScoringMode) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            keywords: Vec::new(),
            patterns: Vec::new(),
            scoring_mode,
            miss_label: None,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn with_pattern(mut self, pattern: TopicPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn with_miss_label(mut self, label: impl Into<String>) -> Self {
        self.miss_label = Some(label.into());
        self
    }

    /// Distinct parameters used by this topic's patterns, in pattern order
    pub fn parameters(&self) -> Vec<u32> {
        let mut params = Vec::new();
        for p in self.patterns.iter().filter_map(|p| p.parameter) {
            if !params.contains(&p) {
                params.push(p);
            }
        }
        params
    }
}
