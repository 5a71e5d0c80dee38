use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::models::{MatchPosition, TopicPattern};

/// A literal keyword compiled to a case-insensitive whole-word regex
#[derive(Debug, Clone)]
pub struct KeywordRule {
    keyword: String,
    regex: Regex,
}

impl KeywordRule {
    /// Compile a keyword; metacharacters in the keyword are matched literally
    pub fn compile(keyword: &str) -> Option<Self> {
        let source = format!(r"\b{}\b", regex::escape(keyword));
        match RegexBuilder::new(&source).case_insensitive(true).build() {
            Ok(regex) => Some(Self {
                keyword: keyword.to_string(),
                regex,
            }),
            Err(e) => {
                warn!("Skipping keyword {:?}: {}", keyword, e);
                None
            }
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

/// A topic pattern with its regex compiled once
///
/// A source that fails to compile is kept with `regex: None` so the failure
/// is only reported once and the pattern is skipped on every run.
#[derive(Debug, Clone)]
pub struct PatternRule {
    label: String,
    parameter: Option<u32>,
    regex: Option<Regex>,
}

impl PatternRule {
    pub fn compile(pattern: &TopicPattern) -> Self {
        let regex = match RegexBuilder::new(&pattern.pattern)
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!(
                    "Pattern {:?} ({}) failed to compile and will be skipped: {}",
                    pattern.pattern, pattern.label, e
                );
                None
            }
        };

        Self {
            label: pattern.label.clone(),
            parameter: pattern.parameter,
            regex,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parameter(&self) -> Option<u32> {
        self.parameter
    }

    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }
}

/// Which parameterized patterns are live for a run
#[derive(Debug, Clone, Copy)]
pub enum ActiveParameters<'a> {
    /// No filtering
    All,
    /// Only patterns whose parameter is in the set (unparameterized always run)
    Only(&'a BTreeSet<u32>),
}

impl ActiveParameters<'_> {
    pub fn allows(&self, parameter: Option<u32>) -> bool {
        match (self, parameter) {
            (_, None) | (ActiveParameters::All, _) => true,
            (ActiveParameters::Only(set), Some(p)) => set.contains(&p),
        }
    }
}

/// Raw matcher output for one topic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occurrences {
    /// Unique labels in first-encounter order (keywords, then patterns)
    pub labels: Vec<String>,
    /// One entry per occurrence, in discovery order, not deduplicated
    pub positions: Vec<MatchPosition>,
}

impl Occurrences {
    fn push_label(&mut self, label: &str) {
        if !self.labels.iter().any(|l| l == label) {
            self.labels.push(label.to_string());
        }
    }

    fn scan(&mut self, transcript: &str, regex: &Regex, label: &str) {
        let mut found = false;
        for m in regex.find_iter(transcript) {
            if m.start() == m.end() {
                continue;
            }
            found = true;
            self.positions.push(MatchPosition {
                start: m.start(),
                end: m.end(),
                matched_text: m.as_str().to_string(),
            });
        }
        if found {
            self.push_label(label);
        }
    }
}

/// Find every keyword and active pattern occurrence in a transcript
///
/// Keywords run first, in order, then patterns, in order. Each rule scans for
/// all non-overlapping matches left to right.
pub fn find_occurrences(
    transcript: &str,
    keywords: &[KeywordRule],
    patterns: &[PatternRule],
    active: ActiveParameters<'_>,
) -> Occurrences {
    let mut occurrences = Occurrences::default();

    if transcript.is_empty() {
        return occurrences;
    }

    for rule in keywords {
        occurrences.scan(transcript, &rule.regex, &rule.keyword);
    }

    for rule in patterns {
        if !active.allows(rule.parameter) {
            continue;
        }
        if let Some(regex) = &rule.regex {
            occurrences.scan(transcript, regex, &rule.label);
        }
    }

    occurrences
}
