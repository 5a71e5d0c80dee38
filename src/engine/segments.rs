use crate::models::{Segment, TopicResult};

struct Span<'a> {
    start: usize,
    end: usize,
    topic_id: &'a str,
}

/// Split a transcript into plain and highlighted segments
///
/// Spans from all results are sorted by start (ties go to the topic listed
/// first) and selected greedily: a span overlapping an already kept span is
/// dropped entirely. The segments concatenate back to the transcript.
///
/// Positions that fall outside the transcript or off a char boundary (e.g. a
/// stale stored record) are ignored.
pub fn build_segments(transcript: &str, results: &[TopicResult]) -> Vec<Segment> {
    let mut spans: Vec<Span<'_>> = results
        .iter()
        .flat_map(|r| {
            r.positions.iter().map(move |p| Span {
                start: p.start,
                end: p.end,
                topic_id: r.topic_id(),
            })
        })
        .filter(|s| {
            s.start < s.end
                && s.end <= transcript.len()
                && transcript.is_char_boundary(s.start)
                && transcript.is_char_boundary(s.end)
        })
        .collect();

    // sort_by_key is stable, preserving result order on equal starts
    spans.sort_by_key(|s| s.start);

    let mut kept: Vec<Span<'_>> = Vec::with_capacity(spans.len());
    for span in spans {
        if kept.last().is_none_or(|last| span.start >= last.end) {
            kept.push(span);
        }
    }

    let mut segments = Vec::with_capacity(kept.len() * 2 + 1);
    let mut cursor = 0;

    for span in kept {
        if span.start > cursor {
            segments.push(Segment::plain(&transcript[cursor..span.start]));
        }
        segments.push(Segment::highlighted(
            &transcript[span.start..span.end],
            span.topic_id,
        ));
        cursor = span.end;
    }

    if cursor < transcript.len() {
        segments.push(Segment::plain(&transcript[cursor..]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchPosition, ScoringMode, Topic};

    fn result(id: &str, spans: &[(usize, usize)], transcript: &str) -> TopicResult {
        TopicResult {
            topic: Topic::new(id, id, ScoringMode::Standard),
            passed: !spans.is_empty(),
            match_labels: if spans.is_empty() { vec![] } else { vec![id.to_string()] },
            positions: spans
                .iter()
                .map(|&(start, end)| MatchPosition {
                    start,
                    end,
                    matched_text: transcript[start..end].to_string(),
                })
                .collect(),
        }
    }

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_no_results_single_plain_segment() {
        let segments = build_segments("hello there", &[]);
        assert_eq!(segments, vec![Segment::plain("hello there")]);
    }

    #[test]
    fn test_empty_transcript_no_segments() {
        assert!(build_segments("", &[]).is_empty());
    }

    #[test]
    fn test_gaps_and_trailing_text() {
        let text = "We quote a price and a deposit today";
        let results = vec![
            result("price", &[(11, 16)], text),
            result("payment", &[(23, 30)], text),
        ];

        let segments = build_segments(text, &results);

        assert_eq!(
            segments,
            vec![
                Segment::plain("We quote a "),
                Segment::highlighted("price", "price"),
                Segment::plain(" and a "),
                Segment::highlighted("deposit", "payment"),
                Segment::plain(" today"),
            ]
        );
        assert_eq!(joined(&segments), text);
    }

    #[test]
    fn test_tie_goes_to_first_result() {
        let text = "full coverage";
        let results = vec![
            result("insurance", &[(5, 13)], text),
            result("extras", &[(5, 13)], text),
        ];

        let segments = build_segments(text, &results);
        assert_eq!(segments[1], Segment::highlighted("coverage", "insurance"));

        let reversed = vec![results[1].clone(), results[0].clone()];
        let segments = build_segments(text, &reversed);
        assert_eq!(segments[1], Segment::highlighted("coverage", "extras"));
    }

    #[test]
    fn test_overlapping_span_dropped_entirely() {
        let text = "price will never change";
        let results = vec![
            result("price", &[(0, 5)], text),
            result("redflag", &[(0, 23)], text),
            result("other", &[(3, 10)], text),
        ];

        let segments = build_segments(text, &results);

        assert_eq!(
            segments,
            vec![
                Segment::highlighted("price", "price"),
                Segment::plain(" will never change"),
            ]
        );
    }

    #[test]
    fn test_adjacent_spans_both_kept() {
        let text = "abcdef";
        let results = vec![result("a", &[(0, 3)], text), result("b", &[(3, 6)], text)];

        let segments = build_segments(text, &results);

        assert_eq!(
            segments,
            vec![Segment::highlighted("abc", "a"), Segment::highlighted("def", "b")]
        );
    }

    #[test]
    fn test_out_of_range_positions_ignored() {
        let text = "café deposit";
        let mut stale = result("payment", &[], text);
        stale.positions = vec![
            MatchPosition { start: 4, end: 6, matched_text: "é".to_string() },
            MatchPosition { start: 20, end: 30, matched_text: "gone".to_string() },
        ];

        let segments = build_segments(text, &[stale]);
        assert_eq!(segments, vec![Segment::plain(text)]);
    }
}
