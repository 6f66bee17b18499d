//! Storage-key sanitisation.
//!
//! The blob store accepts a conservative character set for keys. This module
//! maps arbitrary identifier strings into that set by *removing* (not
//! replacing) anything outside alphanumerics and `._-`.

/// Fixed identifier for the history array in the blob store.
const HISTORY_KEY: &str = "stool_analysis_history";

/// Sanitize a storage key to only allow alphanumeric and `._-` symbols.
///
/// Total over all inputs: an empty string sanitises to an empty string, and
/// sanitising an already-clean key is a no-op.
pub fn sanitize_storage_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

/// Returns the sanitized storage key for history data.
pub fn history_storage_key() -> String {
    sanitize_storage_key(HISTORY_KEY)
}
