pub mod catalog;
pub mod overlay;

pub use catalog::*;
pub use overlay::*;

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::{KeywordRule, PatternRule};
use crate::models::Topic;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate topic id: {0}")]
    DuplicateTopic(String),
    #[error("topic has an empty id")]
    EmptyId,
}

/// A topic with its keyword and pattern regexes compiled
#[derive(Debug, Clone)]
pub struct RegisteredTopic {
    pub topic: Topic,
    pub(crate) keywords: Vec<KeywordRule>,
    pub(crate) patterns: Vec<PatternRule>,
}

impl RegisteredTopic {
    fn compile(topic: Topic) -> Self {
        let keywords = topic
            .keywords
            .iter()
            .filter_map(|k| KeywordRule::compile(k))
            .collect();
        let patterns: Vec<PatternRule> = topic.patterns.iter().map(PatternRule::compile).collect();

        let skipped = patterns.iter().filter(|p| !p.is_valid()).count();
        if skipped > 0 {
            warn!("Topic {}: {} pattern(s) will be skipped", topic.id, skipped);
        }

        Self {
            topic,
            keywords,
            patterns,
        }
    }

    pub fn keyword_rules(&self) -> &[KeywordRule] {
        &self.keywords
    }

    pub fn pattern_rules(&self) -> &[PatternRule] {
        &self.patterns
    }
}

/// Immutable catalog of topics, in evaluation order
///
/// Order matters: results come back in registry order and earlier topics win
/// highlight ties.
#[derive(Debug, Clone)]
pub struct TopicRegistry {
    entries: Vec<RegisteredTopic>,
}

impl TopicRegistry {
    /// Build a registry, rejecting duplicate or empty ids
    pub fn new(topics: Vec<Topic>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for topic in &topics {
            if topic.id.trim().is_empty() {
                return Err(RegistryError::EmptyId);
            }
            if !seen.insert(topic.id.as_str()) {
                return Err(RegistryError::DuplicateTopic(topic.id.clone()));
            }
        }
        Ok(Self::compile(topics))
    }

    /// The built-in moving-company catalog
    pub fn builtin() -> Self {
        Self::compile(default_topics())
    }

    /// Load a catalog from a JSON array of topics
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog: {:?}", path))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let topics: Vec<Topic> =
            serde_json::from_str(json).context("Failed to parse topic catalog JSON")?;
        Ok(Self::new(topics)?)
    }

    fn compile(topics: Vec<Topic>) -> Self {
        let entries: Vec<RegisteredTopic> = topics.into_iter().map(RegisteredTopic::compile).collect();
        debug!("Registry loaded with {} topics", entries.len());
        Self { entries }
    }

    pub fn entries(&self) -> &[RegisteredTopic] {
        &self.entries
    }

    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.entries.iter().map(|e| &e.topic)
    }

    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.topics().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
