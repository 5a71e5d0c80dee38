use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::{Topic, TopicResult};
use crate::registry::{AnalysisOverlay, TopicRegistry};

/// Invalid user configuration, rejected before analysis runs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("custom keyword for topic {topic} is empty")]
    EmptyKeyword { topic: String },
    #[error("unknown topic id: {0}")]
    UnknownTopic(String),
    #[error("topic {topic} has no pattern for parameter {parameter}")]
    UnknownParameter { topic: String, parameter: u32 },
}

/// What to do when a required topic is missed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailBehavior {
    /// List the missed topics
    #[default]
    ShowMissed,
    /// Additionally mark the call for manual review
    FlagReview,
}

/// Reviewer settings, usually loaded from a JSON file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Topics shown and scored; `None` means all
    #[serde(default)]
    pub enabled_topic_ids: Option<Vec<String>>,
    #[serde(default)]
    pub fail_behavior: FailBehavior,
    /// Record rep name and call date with each saved call
    #[serde(default)]
    pub track_rep: bool,
    /// Extra keywords per topic id, matched like built-in keywords on word
    /// boundaries; a keyword such as `$500` or `c.o.d.` that starts or ends
    /// with punctuation only matches where a word character sits beside it
    #[serde(default)]
    pub custom_keywords: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub active_parameters: BTreeMap<String, BTreeSet<u32>>,
}

impl Settings {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {:?}", path))?;
        serde_json::from_str(&content).context("Failed to parse settings JSON")
    }

    /// Validate against the registry and build the per-run overlay
    ///
    /// Custom keywords are trimmed, lowercased and deduplicated.
    pub fn overlay(&self, registry: &TopicRegistry) -> Result<AnalysisOverlay, ConfigError> {
        if let Some(ids) = &self.enabled_topic_ids {
            for id in ids {
                check_topic(registry, id)?;
            }
        }

        let mut overlay = AnalysisOverlay::new();

        for (topic_id, keywords) in &self.custom_keywords {
            check_topic(registry, topic_id)?;

            let mut normalized: Vec<String> = Vec::with_capacity(keywords.len());
            for keyword in keywords {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(ConfigError::EmptyKeyword {
                        topic: topic_id.clone(),
                    });
                }
                if !has_word_edges(&keyword) {
                    warn!(
                        "Custom keyword {:?} for {} starts or ends with a non-word character and will only match next to a letter or digit",
                        keyword, topic_id
                    );
                }
                if !normalized.contains(&keyword) {
                    normalized.push(keyword);
                }
            }
            overlay = overlay.with_custom_keywords(topic_id, normalized);
        }

        for (topic_id, parameters) in &self.active_parameters {
            let topic = check_topic(registry, topic_id)?;
            let known = topic.parameters();
            if let Some(&parameter) = parameters.iter().find(|p| !known.contains(p)) {
                return Err(ConfigError::UnknownParameter {
                    topic: topic_id.clone(),
                    parameter,
                });
            }
            overlay = overlay.with_active_parameters(topic_id, parameters.iter().copied());
        }

        Ok(overlay)
    }

    pub fn is_enabled(&self, topic_id: &str) -> bool {
        self.enabled_topic_ids
            .as_ref()
            .is_none_or(|ids| ids.iter().any(|id| id == topic_id))
    }

    /// Drop results for disabled topics, keeping registry order
    pub fn filter_enabled(&self, results: Vec<TopicResult>) -> Vec<TopicResult> {
        results
            .into_iter()
            .filter(|r| self.is_enabled(r.topic_id()))
            .collect()
    }

    /// Whether the call should be marked for manual review
    ///
    /// An empty transcript is never flagged; there is nothing to review yet.
    pub fn needs_review(&self, transcript: &str, results: &[TopicResult]) -> bool {
        self.fail_behavior == FailBehavior::FlagReview
            && !transcript.trim().is_empty()
            && results.iter().any(|r| r.is_missed())
    }
}

/// Keywords match on word boundaries, so both ends must be word characters
fn has_word_edges(keyword: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    keyword.chars().next().is_some_and(is_word) && keyword.chars().last().is_some_and(is_word)
}

fn check_topic<'a>(registry: &'a TopicRegistry, topic_id: &str) -> Result<&'a Topic, ConfigError> {
    registry
        .get(topic_id)
        .ok_or_else(|| ConfigError::UnknownTopic(topic_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyze;

    #[test]
    fn test_settings_json_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();

        assert_eq!(settings, Settings::default());
        assert!(settings.is_enabled("anything"));
        assert_eq!(settings.fail_behavior, FailBehavior::ShowMissed);
    }

    #[test]
    fn test_fail_behavior_kebab_case() {
        let settings: Settings =
            serde_json::from_str(r#"{"fail_behavior": "flag-review"}"#).unwrap();
        assert_eq!(settings.fail_behavior, FailBehavior::FlagReview);
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let mut settings = Settings::default();
        settings
            .custom_keywords
            .insert("insurance".to_string(), vec!["valuation".to_string(), "   ".to_string()]);

        let err = settings.overlay(&TopicRegistry::builtin()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyKeyword {
                topic: "insurance".to_string()
            }
        );
    }

    #[test]
    fn test_keywords_normalized() {
        let mut settings = Settings::default();
        settings.custom_keywords.insert(
            "insurance".to_string(),
            vec![" Bill of Lading ".to_string(), "bill of lading".to_string()],
        );

        let overlay = settings.overlay(&TopicRegistry::builtin()).unwrap();
        assert_eq!(
            overlay.custom_keywords_for("insurance"),
            &["bill of lading".to_string()]
        );
    }

    #[test]
    fn test_punctuated_keywords_accepted_but_edge_checked() {
        assert!(has_word_edges("bill of lading"));
        assert!(has_word_edges("c.o.d"));
        assert!(!has_word_edges("c.o.d."));
        assert!(!has_word_edges("$500"));

        let mut settings = Settings::default();
        settings.custom_keywords.insert(
            "payment".to_string(),
            vec!["C.O.D.".to_string(), "$500".to_string()],
        );
        let registry = TopicRegistry::builtin();
        let overlay = settings.overlay(&registry).unwrap();
        assert_eq!(
            overlay.custom_keywords_for("payment"),
            &["c.o.d.".to_string(), "$500".to_string()]
        );

        let results = analyze("We take c.o.d. today, or $500 now.", &registry, &overlay);
        let payment = results.iter().find(|r| r.topic_id() == "payment").unwrap();
        assert!(payment.match_labels.is_empty());
    }

    #[test]
    fn test_unknown_topic_and_parameter_rejected() {
        let registry = TopicRegistry::builtin();

        let mut settings = Settings::default();
        settings
            .custom_keywords
            .insert("nope".to_string(), vec!["x".to_string()]);
        assert_eq!(
            settings.overlay(&registry).unwrap_err(),
            ConfigError::UnknownTopic("nope".to_string())
        );

        let mut settings = Settings::default();
        settings
            .active_parameters
            .insert("price".to_string(), [185, 186].into_iter().collect());
        assert_eq!(
            settings.overlay(&registry).unwrap_err(),
            ConfigError::UnknownParameter {
                topic: "price".to_string(),
                parameter: 186
            }
        );
    }

    #[test]
    fn test_filter_enabled_and_review() {
        let registry = TopicRegistry::builtin();
        let settings = Settings {
            enabled_topic_ids: Some(vec!["insurance".to_string(), "redflag".to_string()]),
            fail_behavior: FailBehavior::FlagReview,
            ..Default::default()
        };

        let transcript = "No mention of anything.";
        let results = analyze(transcript, &registry, &settings.overlay(&registry).unwrap());
        let results = settings.filter_enabled(results);

        let ids: Vec<&str> = results.iter().map(|r| r.topic_id()).collect();
        assert_eq!(ids, vec!["insurance", "redflag"]);
        assert!(settings.needs_review(transcript, &results));
    }

    #[test]
    fn test_empty_transcript_not_flagged_for_review() {
        let registry = TopicRegistry::builtin();
        let settings = Settings {
            fail_behavior: FailBehavior::FlagReview,
            ..Default::default()
        };
        let overlay = settings.overlay(&registry).unwrap();

        for transcript in ["", "  \n "] {
            let results = analyze(transcript, &registry, &overlay);
            assert!(results.iter().any(|r| r.is_missed()));
            assert!(!settings.needs_review(transcript, &results));
        }
    }
}
