use chrono::NaiveDate;

use crate::models::{CallType, MoveSize, ScoringMode, TopicResult};

/// Characters of transcript sent for a summary
pub const SUMMARY_TRANSCRIPT_CHARS: usize = 4000;
/// Characters of transcript quoted in a dispute letter prompt
pub const DISPUTE_TRANSCRIPT_CHARS: usize = 1500;

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a professional sales call analyst for a moving company. \
Write a 2-3 sentence summary of this sales call. Cover: what the customer needed, what was quoted or \
discussed (pricing, services, coverage), and the outcome or next steps. Be concise, factual, and \
professional. No bullet points.";

pub const DISPUTE_SYSTEM_PROMPT: &str = "You are a professional business dispute response writer for a \
moving company. Write formal, factual, legally sound dispute responses.";

/// Facts about a reviewed call used to draft a dispute response
#[derive(Debug, Clone)]
pub struct DisputeContext<'a> {
    pub rep_name: &'a str,
    pub call_date: Option<NaiveDate>,
    pub call_type: CallType,
    pub move_size: MoveSize,
    pub notes: &'a str,
    pub transcript: &'a str,
    pub results: &'a [TopicResult],
}

pub fn build_summary_prompt(transcript: &str) -> String {
    format!(
        "Summarize this sales call:\n\n{}",
        truncate_chars(transcript, SUMMARY_TRANSCRIPT_CHARS)
    )
}

/// Build the user prompt for a dispute response letter
pub fn build_dispute_prompt(ctx: &DisputeContext<'_>) -> String {
    let disclosed: Vec<String> = ctx
        .results
        .iter()
        .filter(|r| r.passed && r.topic.scoring_mode != ScoringMode::Inverted)
        .map(|r| {
            let labels: Vec<&str> = r.match_labels.iter().take(3).map(String::as_str).collect();
            format!("{}: {}", r.topic.label, labels.join(", "))
        })
        .collect();

    let missed: Vec<&str> = ctx
        .results
        .iter()
        .filter(|r| r.is_missed())
        .map(|r| r.topic.label.as_str())
        .collect();

    let red_flags: Vec<String> = ctx
        .results
        .iter()
        .filter(|r| r.is_red_flag())
        .map(|r| r.match_labels.join(", "))
        .collect();

    let rep = if ctx.rep_name.trim().is_empty() {
        "our sales representative"
    } else {
        ctx.rep_name.trim()
    };
    let call_type = match ctx.call_type.describe() {
        "" => "local",
        other => other,
    };

    let mut prompt = String::new();

    prompt.push_str(
        "You are a professional dispute resolution specialist for a moving company. Write a formal, \
professional dispute response letter based on the following sales call record. The letter should be \
addressed generically (no specific customer name needed) and is for internal use or submission to a \
dispute resolution body or credit card company.\n\n",
    );

    prompt.push_str("CALL DETAILS:\n");
    prompt.push_str(&format!("- Representative: {}\n", rep));
    prompt.push_str(&format!("- Call Date: {}\n", format_call_date(ctx.call_date)));
    prompt.push_str(&format!("- Move Type: {} move\n", call_type));
    prompt.push_str(&format!(
        "- Move Size: {}\n\n",
        ctx.move_size.describe().unwrap_or("unspecified")
    ));

    prompt.push_str("TOPICS DISCLOSED ON THE CALL:\n");
    if disclosed.is_empty() {
        prompt.push_str("None confirmed\n\n");
    } else {
        prompt.push_str(&disclosed.join("\n"));
        prompt.push_str("\n\n");
    }

    prompt.push_str("TOPICS NOT DETECTED:\n");
    if missed.is_empty() {
        prompt.push_str("None, all required topics covered\n\n");
    } else {
        prompt.push_str(&missed.join(", "));
        prompt.push_str("\n\n");
    }

    if !red_flags.is_empty() {
        prompt.push_str("UNUSUAL COMMITMENTS DETECTED:\n");
        prompt.push_str(&red_flags.join("; "));
        prompt.push_str("\n\n");
    }

    if !ctx.notes.trim().is_empty() {
        prompt.push_str("REVIEWER NOTES:\n");
        prompt.push_str(ctx.notes.trim());
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!(
        "TRANSCRIPT EXCERPT (first {} chars):\n",
        DISPUTE_TRANSCRIPT_CHARS
    ));
    let excerpt = truncate_chars(ctx.transcript, DISPUTE_TRANSCRIPT_CHARS);
    if excerpt.trim().is_empty() {
        prompt.push_str("Not available\n\n");
    } else {
        prompt.push_str(excerpt);
        prompt.push_str("\n\n");
    }

    prompt.push_str(
        "Write a 3-5 paragraph professional dispute response. Cover: (1) what disclosures were made on \
the call and when, (2) what the customer was told regarding pricing and terms, (3) a firm but \
professional statement that the company fulfilled its obligations. Do NOT make up specifics not in the \
data above. Use formal business letter language. Do not include salutation lines or signature blocks, \
just the body paragraphs.",
    );

    prompt
}

/// e.g. "January 5, 2026"
pub fn format_call_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => "the call date".to_string(),
    }
}

/// Longest prefix of at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
