//! History persistence and querying.
//!
//! The entire history lives as one JSON array under one fixed key in the
//! blob store. Appending is a whole-array read-modify-write with no locking:
//! two concurrent appends race and the last writer wins. This is an accepted
//! limitation of the design, kept deliberately.

use crate::error::{AnalysisError, AnalysisResult};
use crate::sanitize::history_storage_key;
use crate::types::{AnalysisRecord, HistoryEntry};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use gutlog_blobstore::JsonStore;
use std::sync::Arc;
use uuid::Uuid;

/// Append and query operations over the stored history array.
#[derive(Clone)]
pub struct HistoryService {
    store: Arc<dyn JsonStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn JsonStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> AnalysisResult<Vec<HistoryEntry>> {
        match self.store.get(&history_storage_key())? {
            Some(value) => {
                serde_json::from_value(value).map_err(AnalysisError::Deserialization)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Appends `record` to the history with a fresh id and the current UTC
    /// timestamp, returning the stored entry.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Persistence`] if the blob store read or
    /// write fails; callers in the analysis path catch and log this rather
    /// than failing the in-flight request.
    pub fn append(&self, record: AnalysisRecord) -> AnalysisResult<HistoryEntry> {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            date: Utc::now(),
            record,
        };

        let mut entries = self.load()?;
        entries.push(entry.clone());

        let value = serde_json::to_value(&entries).map_err(AnalysisError::Serialization)?;
        self.store.put(&history_storage_key(), &value)?;

        Ok(entry)
    }

    /// Returns the history filtered to `[start, end]` inclusive and sorted
    /// descending by date.
    ///
    /// Bounds are optional ISO-8601 strings; an absent bound excludes
    /// nothing. The sort is stable, so entries with equal dates keep their
    /// store order. `end < start` yields an empty result, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Validation`] if a supplied bound does not
    /// parse, and [`AnalysisError::Persistence`] /
    /// [`AnalysisError::Deserialization`] if the stored array cannot be
    /// read.
    pub fn query(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> AnalysisResult<Vec<HistoryEntry>> {
        let start = start.map(parse_iso_timestamp).transpose()?;
        let end = end.map(parse_iso_timestamp).transpose()?;

        let mut entries = self.load()?;

        if start.is_some() || end.is_some() {
            entries.retain(|entry| {
                if let Some(start) = start {
                    if entry.date < start {
                        return false;
                    }
                }
                if let Some(end) = end {
                    if entry.date > end {
                        return false;
                    }
                }
                true
            });
        }

        entries.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(entries)
    }
}

/// Parses an ISO-8601 timestamp or date string into a UTC instant.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC), and a
/// bare `YYYY-MM-DD` (read as midnight UTC), so query bounds can be given
/// as either full timestamps or plain dates.
pub fn parse_iso_timestamp(input: &str) -> AnalysisResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(AnalysisError::Validation(format!(
        "not a valid ISO-8601 timestamp: '{input}'"
    )))
}
