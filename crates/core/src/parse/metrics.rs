//! Parser for the metric-list reply format.
//!
//! Expected template:
//!
//! ```text
//! METRICS:
//! Color: Normal - Healthy brown color - appearance
//! ...
//! RECOMMENDATIONS:
//! 1. Stay hydrated
//! ...
//! ```
//!
//! Metric lines split on `:` into name and rest, the rest on `-` into
//! value, description and category. Lines that do not match are skipped
//! without emitting a partial record.

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{HealthMetric, MetricCategory, MetricReport, Severity};

const METRICS_MARKER: &str = "METRICS:";
const RECOMMENDATIONS_MARKER: &str = "RECOMMENDATIONS:";

/// Parses a raw model reply into a [`MetricReport`].
///
/// # Errors
///
/// Returns [`AnalysisError::Format`] if either section marker is absent, or
/// if no metrics or no recommendations survive parsing. Both cases mean "the
/// reply could not be understood", not a system fault.
pub fn parse_metric_report(content: &str) -> AnalysisResult<MetricReport> {
    let metrics_start = content.find(METRICS_MARKER);
    let recommendations_start = content.find(RECOMMENDATIONS_MARKER);

    let (metrics_start, recommendations_start) = match (metrics_start, recommendations_start) {
        (Some(m), Some(r)) => (m, r),
        _ => {
            return Err(AnalysisError::Format(
                "response format not recognized".to_string(),
            ))
        }
    };

    // A reply with the sections out of order yields an empty metrics list
    // and fails the emptiness check below.
    let metrics_text = if metrics_start <= recommendations_start {
        &content[metrics_start..recommendations_start]
    } else {
        ""
    };
    let recommendations_text = &content[recommendations_start..];

    let metrics = parse_metrics(metrics_text);
    let recommendations = parse_recommendations(recommendations_text);

    if metrics.is_empty() || recommendations.is_empty() {
        return Err(AnalysisError::Format(
            "failed to extract metrics or recommendations from analysis".to_string(),
        ));
    }

    Ok(MetricReport {
        metrics,
        recommendations,
    })
}

fn parse_metrics(section: &str) -> Vec<HealthMetric> {
    let mut metrics = Vec::new();

    // Skip the marker line itself.
    for line in section.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }

        let mut parts = line.splitn(3, ':');
        let name = match parts.next() {
            Some(name) => name.trim(),
            None => continue,
        };
        let rest = match parts.next() {
            Some(rest) => rest,
            None => continue,
        };

        let fields: Vec<&str> = rest.split('-').collect();
        if fields.len() < 3 {
            continue;
        }

        let value = fields[0].trim();
        let description = fields[1].trim();
        let category = match MetricCategory::from_token(fields[2]) {
            Some(category) => category,
            None => continue,
        };

        let severity = Severity::coerce(value);

        metrics.push(HealthMetric {
            name: name.to_string(),
            value: severity,
            severity,
            description: description.to_string(),
            category,
        });
    }

    metrics
}

fn parse_recommendations(section: &str) -> Vec<String> {
    let mut recommendations = Vec::new();

    for line in section.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() || line.starts_with(RECOMMENDATIONS_MARKER) {
            continue;
        }

        // Strip leading numbering and bullets ("1. ", "- ", ...).
        let cleaned = line
            .trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | ' '))
            .trim();
        if !cleaned.is_empty() {
            recommendations.push(cleaned.to_string());
        }
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
METRICS:
Color: Normal - Healthy brown color - appearance
Shape: Mild - Slightly irregular - appearance
Mucus: Severe - Visible mucus present - composition
Texture: Moderate - Uneven texture - consistency
RECOMMENDATIONS:
1. Stay hydrated
2. Increase fibre intake
3. Monitor for changes";

    #[test]
    fn test_well_formed_reply_counts_match() {
        let report = parse_metric_report(WELL_FORMED).unwrap();
        assert_eq!(report.metrics.len(), 4);
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn test_metric_fields_extracted() {
        let report = parse_metric_report(WELL_FORMED).unwrap();
        let color = &report.metrics[0];
        assert_eq!(color.name, "Color");
        assert_eq!(color.value, Severity::Normal);
        assert_eq!(color.severity, Severity::Normal);
        assert_eq!(color.description, "Healthy brown color");
        assert_eq!(color.category, MetricCategory::Appearance);
    }

    #[test]
    fn test_recommendation_numbering_stripped() {
        let report = parse_metric_report(WELL_FORMED).unwrap();
        assert_eq!(report.recommendations[0], "Stay hydrated");
        assert_eq!(report.recommendations[1], "Increase fibre intake");
    }

    #[test]
    fn test_missing_metrics_marker_fails() {
        let result = parse_metric_report("RECOMMENDATIONS:\n1. Rest");
        assert!(matches!(result, Err(AnalysisError::Format(_))));
    }

    #[test]
    fn test_missing_recommendations_marker_fails() {
        let result = parse_metric_report("METRICS:\nColor: Normal - Fine - appearance");
        assert!(matches!(result, Err(AnalysisError::Format(_))));
    }

    #[test]
    fn test_out_of_vocabulary_value_coerces_to_moderate() {
        let content = "\
METRICS:
Blood: Critical - Blood visible - composition
RECOMMENDATIONS:
1. Seek medical attention";
        let report = parse_metric_report(content).unwrap();
        assert_eq!(report.metrics[0].severity, Severity::Moderate);
        assert_eq!(report.metrics[0].value, Severity::Moderate);
    }

    #[test]
    fn test_malformed_metric_lines_are_skipped() {
        let content = "\
METRICS:
just prose with no structure
Color: Normal - Healthy - appearance
Size: Normal - missing category part
RECOMMENDATIONS:
1. Stay hydrated";
        let report = parse_metric_report(content).unwrap();
        assert_eq!(report.metrics.len(), 1);
        assert_eq!(report.metrics[0].name, "Color");
    }

    #[test]
    fn test_unknown_category_skips_line() {
        let content = "\
METRICS:
Color: Normal - Healthy - texture
Shape: Normal - Fine - appearance
RECOMMENDATIONS:
1. Keep it up";
        let report = parse_metric_report(content).unwrap();
        assert_eq!(report.metrics.len(), 1);
        assert_eq!(report.metrics[0].name, "Shape");
    }

    #[test]
    fn test_empty_metrics_after_parsing_fails() {
        let content = "\
METRICS:
nothing matches here
RECOMMENDATIONS:
1. Rest";
        assert!(matches!(
            parse_metric_report(content),
            Err(AnalysisError::Format(_))
        ));
    }

    #[test]
    fn test_empty_recommendations_after_parsing_fails() {
        let content = "\
METRICS:
Color: Normal - Healthy - appearance
RECOMMENDATIONS:
1.
- ";
        assert!(matches!(
            parse_metric_report(content),
            Err(AnalysisError::Format(_))
        ));
    }

    #[test]
    fn test_sections_out_of_order_fail() {
        let content = "RECOMMENDATIONS:\n1. Rest\nMETRICS:\nColor: Normal - Fine - appearance";
        assert!(matches!(
            parse_metric_report(content),
            Err(AnalysisError::Format(_))
        ));
    }

    #[test]
    fn test_end_to_end_single_metric_scenario() {
        let content =
            "METRICS:\nColor: Normal - Healthy brown color - appearance\nRECOMMENDATIONS:\n1. Stay hydrated";
        let report = parse_metric_report(content).unwrap();
        assert_eq!(report.metrics.len(), 1);
        assert_eq!(report.metrics[0].name, "Color");
        assert_eq!(report.metrics[0].severity, Severity::Normal);
        assert_eq!(report.recommendations, vec!["Stay hydrated".to_string()]);
    }
}
