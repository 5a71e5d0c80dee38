use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::engine::ActiveParameters;

/// Per-run additions to the base registry
///
/// Scoped to one `analyze` call; the registry itself is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOverlay {
    /// topic id -> extra keywords, appended after the topic's own
    #[serde(default)]
    pub custom_keywords: BTreeMap<String, Vec<String>>,
    /// topic id -> live parameters; a topic without an entry runs all of them
    #[serde(default)]
    pub active_parameters: BTreeMap<String, BTreeSet<u32>>,
}

impl AnalysisOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom_keywords<I, S>(mut self, topic_id: &str, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_keywords
            .entry(topic_id.to_string())
            .or_default()
            .extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn with_active_parameters<I>(mut self, topic_id: &str, parameters: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        self.active_parameters
            .insert(topic_id.to_string(), parameters.into_iter().collect());
        self
    }

    pub fn custom_keywords_for(&self, topic_id: &str) -> &[String] {
        self.custom_keywords
            .get(topic_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn active_for(&self, topic_id: &str) -> ActiveParameters<'_> {
        match self.active_parameters.get(topic_id) {
            Some(set) => ActiveParameters::Only(set),
            None => ActiveParameters::All,
        }
    }
}
