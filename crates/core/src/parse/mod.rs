//! Heuristic parsers for the model's free-text replies.
//!
//! The true contract with the AI collaborator is an informally specified
//! text template, so the fragile string matching lives here, isolated from
//! the network call and unit-testable on raw strings.

mod metrics;
mod report;

pub use metrics::parse_metric_report;
pub use report::parse_stool_report;
