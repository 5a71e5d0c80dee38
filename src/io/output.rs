use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{build_segments, missed_topics, red_flags, score, verdict, ScoreSummary, TopicVerdict};
use crate::models::{ScoringMode, Segment, TopicResult};

/// One row of the checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    pub topic_id: String,
    pub label: String,
    pub verdict: TopicVerdict,
    /// Text shown on the badge; neutral misses use the topic's miss label
    pub badge: String,
    pub match_labels: Vec<String>,
}

/// Machine-readable analysis output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub score: ScoreSummary,
    pub needs_review: bool,
    pub checklist: Vec<ChecklistEntry>,
    pub results: Vec<TopicResult>,
    pub segments: Vec<Segment>,
}

impl AnalysisReport {
    /// Build from already-filtered results; nothing is re-analyzed
    pub fn new(transcript: &str, results: Vec<TopicResult>, needs_review: bool) -> Self {
        let checklist = results
            .iter()
            .map(|r| {
                let verdict = verdict(r);
                let badge = match (verdict, &r.topic.miss_label) {
                    (TopicVerdict::NotApplicable, Some(label)) => label.clone(),
                    _ => verdict.label().to_string(),
                };
                ChecklistEntry {
                    topic_id: r.topic.id.clone(),
                    label: r.topic.label.clone(),
                    verdict,
                    badge,
                    match_labels: r.match_labels.clone(),
                }
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            score: score(&results),
            needs_review,
            checklist,
            segments: build_segments(transcript, &results),
            results,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable scorecard with an annotated transcript
pub struct Scorecard<'a> {
    report: &'a AnalysisReport,
}

impl<'a> Scorecard<'a> {
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self { report }
    }

    /// Format the scorecard as text
    pub fn format(&self) -> String {
        let report = self.report;
        let s = &report.score;
        let mut output = String::new();

        output.push_str(&format!(
            "Score: {}% ({}), {} of {} required topics covered\n",
            s.percent,
            s.grade.label(),
            s.passed_count,
            s.scored_total
        ));

        let missed = missed_topics(&report.results);
        if missed.is_empty() {
            output.push_str("All required disclosures addressed\n");
        } else {
            let labels: Vec<&str> = missed.iter().map(|r| r.topic.label.as_str()).collect();
            output.push_str(&format!("Missing: {}\n", labels.join(", ")));
        }

        let flags = red_flags(&report.results);
        if !flags.is_empty() {
            let labels: Vec<&str> = flags
                .iter()
                .flat_map(|r| r.match_labels.iter().map(String::as_str))
                .take(3)
                .collect();
            output.push_str(&format!(
                "{} unusual promise{} detected: {}\n",
                flags.len(),
                if flags.len() > 1 { "s" } else { "" },
                labels.join(", ")
            ));
        }

        if report.needs_review {
            output.push_str("FLAGGED FOR REVIEW\n");
        }

        output.push_str("\nChecklist\n---------\n");
        for entry in &report.checklist {
            output.push_str(&format!("[{:<8}] {}", entry.badge, entry.label));
            if !entry.match_labels.is_empty() {
                output.push_str(&format!(": {}", entry.match_labels.join(", ")));
            }
            output.push('\n');
        }

        output.push_str("\nTranscript\n----------\n");
        output.push_str(&annotate(&report.segments, &report.results));
        output.push('\n');

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Render segments as text, marking highlights as `[text|topic]`
///
/// Red-flag highlights are marked with `!` so they stand out in plain text.
pub fn annotate(segments: &[Segment], results: &[TopicResult]) -> String {
    let mut output = String::new();
    for segment in segments {
        match &segment.topic_id {
            None => output.push_str(&segment.text),
            Some(topic_id) => {
                let inverted = results
                    .iter()
                    .any(|r| r.topic_id() == topic_id && r.scoring_mode() == ScoringMode::Inverted);
                let marker = if inverted { "!" } else { "" };
                output.push_str(&format!("[{}|{}{}]", segment.text, marker, topic_id));
            }
        }
    }
    output
}
