//! # gutlog Core
//!
//! Core business logic for the gutlog stool-analysis service.
//!
//! This crate contains the parsing and persistence pipeline:
//! - Typed analysis records (metric reports and prose reports)
//! - Heuristic parsers for the two supported model reply formats
//! - History persistence and date-filtered queries over the blob store
//! - The analysis orchestrator tying model call, parse, and persist together
//!
//! **No API concerns**: HTTP routing, status-code mapping, and OpenAPI
//! documentation belong in the server binary.

pub mod analysis;
pub mod config;
pub mod error;
pub mod history;
pub mod parse;
pub mod sanitize;
pub mod types;

pub use analysis::AnalysisService;
pub use config::{CoreConfig, Provider, ReportVariant};
pub use error::{AnalysisError, AnalysisResult};
pub use history::HistoryService;
pub use sanitize::{history_storage_key, sanitize_storage_key};
pub use types::{
    AnalysisRecord, HealthMetric, HistoryEntry, MetricCategory, MetricReport, Severity,
    StoolAnalysis,
};
