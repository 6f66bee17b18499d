//! Analysis orchestration.
//!
//! Ties the pipeline together: decode the uploaded image, ask the vision
//! model for an analysis in the configured reply format, parse the reply,
//! save the result to history, and hand the record back. A failed history
//! write is logged and swallowed so the caller still receives their result.

use crate::config::ReportVariant;
use crate::error::{AnalysisError, AnalysisResult};
use crate::history::HistoryService;
use crate::parse::{parse_metric_report, parse_stool_report};
use crate::types::AnalysisRecord;
use base64::{engine::general_purpose, Engine as _};
use gutlog_ai::{ModelPrompt, VisionModel};
use std::sync::Arc;

/// Format template requested from providers that return the metric-list
/// reply format.
const METRICS_INSTRUCTIONS: &str = "\
You are a medical professional specialized in analyzing stool samples.
Analyze the provided stool image and return your analysis in the following format:

METRICS:
Color: [Normal/Mild/Moderate/Severe] - [Description of what this indicates] - appearance
Shape: [Normal/Mild/Moderate/Severe] - [Description of what this indicates] - appearance
Size: [Normal/Mild/Moderate/Severe] - [Description of what this indicates] - appearance
Mucus: [Normal/Mild/Moderate/Severe] - [Description of what this indicates] - composition
Blood: [Normal/Mild/Moderate/Severe] - [Description of what this indicates] - composition
Texture: [Normal/Mild/Moderate/Severe] - [Description of what this indicates] - consistency
Firmness: [Normal/Mild/Moderate/Severe] - [Description of what this indicates] - consistency

RECOMMENDATIONS:
1. [First specific recommendation based on the analysis]
2. [Second specific recommendation]
3. [Third specific recommendation]

Be professional but approachable in your analysis. Focus on actionable insights.";

const METRICS_REQUEST: &str =
    "Please analyze this stool sample and provide the metrics and recommendations in the specified format.";

/// Six-section template requested from providers that return a prose
/// report.
const REPORT_INSTRUCTIONS: &str = "\
Here's an analysis of the stool image, remembering that I am an AI and this is not a substitute for professional medical advice:

1. Color: Describe the color in detail, including any variations or patterns.

2. Consistency: Describe the consistency in detail, noting whether it's soft, hard, loose, or has other characteristics.

3. Shape: Classify according to the Bristol Stool Scale, providing detailed observations about the shape and form.

4. Health Score: Rate from 1-10, expressing it as X/10, and explain the reasoning for this score.

5. Concerns: List and explain any potential health concerns or issues that should be monitored.

6. Recommendations: Provide detailed recommendations for improving stool health and when to seek medical attention.

Be specific and medical in your analysis. Include a disclaimer about seeking professional medical advice.";

/// Orchestrates one image analysis end to end.
#[derive(Clone)]
pub struct AnalysisService {
    model: Arc<dyn VisionModel>,
    history: HistoryService,
    variant: ReportVariant,
}

impl AnalysisService {
    pub fn new(
        model: Arc<dyn VisionModel>,
        history: HistoryService,
        variant: ReportVariant,
    ) -> Self {
        Self {
            model,
            history,
            variant,
        }
    }

    /// Analyses a base64-encoded image (optionally data-URI prefixed) and
    /// returns the parsed record.
    ///
    /// The record is also appended to history; if that write fails, the
    /// failure is logged and the record is still returned.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::ImageDecode`] if the payload is not valid base64
    /// - [`AnalysisError::Collaborator`] if the model call fails or the
    ///   reply carries no text
    /// - [`AnalysisError::Format`] if the reply cannot be parsed (the
    ///   metric-list format only; the prose format degrades to defaults
    ///   instead)
    pub async fn analyze(&self, image: &str) -> AnalysisResult<AnalysisRecord> {
        // Strip an optional "data:image/...;base64," prefix.
        let encoded = match image.split_once(',') {
            Some((_, rest)) => rest,
            None => image,
        };
        let bytes = general_purpose::STANDARD
            .decode(encoded)
            .map_err(AnalysisError::ImageDecode)?;

        let prompt = self.prompt();
        let reply = self.model.describe_image(&prompt, &bytes).await?;
        if reply.trim().is_empty() {
            return Err(AnalysisError::Collaborator(
                "no analysis received from the model".to_string(),
            ));
        }

        let record = self.parse_reply(&reply)?;

        match self.history.append(record.clone()) {
            Ok(entry) => tracing::debug!("saved analysis {} to history", entry.id),
            Err(e) => tracing::error!("failed to save analysis result: {e}"),
        }

        Ok(record)
    }

    fn prompt(&self) -> ModelPrompt {
        match self.variant {
            ReportVariant::Metrics => ModelPrompt::new(METRICS_INSTRUCTIONS, METRICS_REQUEST),
            ReportVariant::Report => ModelPrompt::new(REPORT_INSTRUCTIONS, ""),
        }
    }

    fn parse_reply(&self, reply: &str) -> AnalysisResult<AnalysisRecord> {
        match self.variant {
            ReportVariant::Metrics => {
                Ok(AnalysisRecord::Metrics(parse_metric_report(reply)?))
            }
            ReportVariant::Report => {
                let analysis = parse_stool_report(reply);
                if analysis.is_all_unknown() {
                    tracing::warn!("all main analysis fields are unknown; probable parsing miss");
                }
                Ok(AnalysisRecord::Report { analysis })
            }
        }
    }
}
