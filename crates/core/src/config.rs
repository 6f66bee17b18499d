//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the
//! services, so no process-wide environment state is consulted during
//! request handling and the orchestrator can be constructed with substitute
//! collaborators in tests.

use crate::error::{AnalysisError, AnalysisResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which vision provider the service talks to.
///
/// Each provider is strictly paired with the reply format its prompt
/// requests, and therefore with the matching parser variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenAi,
}

impl Provider {
    /// The reply format this provider is prompted to produce.
    pub fn report_variant(self) -> ReportVariant {
        match self {
            Provider::Gemini => ReportVariant::Report,
            Provider::OpenAi => ReportVariant::Metrics,
        }
    }
}

impl FromStr for Provider {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            other => Err(AnalysisError::Validation(format!(
                "unknown provider '{other}' (expected 'gemini' or 'openai')"
            ))),
        }
    }
}

/// Which reply format the parser should expect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportVariant {
    /// METRICS/RECOMMENDATIONS sections
    Metrics,
    /// Six numbered prose sections
    Report,
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    provider: Provider,
    api_key: String,
    model_name: Option<String>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Validation`] if the API key is empty.
    pub fn new(
        data_dir: PathBuf,
        provider: Provider,
        api_key: String,
        model_name: Option<String>,
    ) -> AnalysisResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AnalysisError::Validation(
                "api_key cannot be empty".into(),
            ));
        }

        Ok(Self {
            data_dir,
            provider,
            api_key,
            model_name,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parses_case_insensitively() {
        assert_eq!("gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!(" OpenAI ".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert!("claude".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_variant_pairing() {
        assert_eq!(Provider::Gemini.report_variant(), ReportVariant::Report);
        assert_eq!(Provider::OpenAi.report_variant(), ReportVariant::Metrics);
    }

    #[test]
    fn test_config_rejects_empty_api_key() {
        let result = CoreConfig::new(
            PathBuf::from("/tmp"),
            Provider::Gemini,
            "   ".to_string(),
            None,
        );
        assert!(matches!(result, Err(AnalysisError::Validation(_))));
    }
}
