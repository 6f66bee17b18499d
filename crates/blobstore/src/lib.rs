//! # gutlog blobstore
//!
//! Key-value JSON blob storage for gutlog.
//!
//! This crate provides the storage boundary used by the history service: a
//! small [`JsonStore`] trait for reading and writing one JSON value per string
//! key, plus two implementations:
//!
//! - [`FsJsonStore`] — one `<key>.json` file per key under a root directory
//! - [`MemoryJsonStore`] — an in-process map, intended for tests
//!
//! **No schema concerns**: callers own the shape of the stored values. This
//! crate only moves `serde_json::Value`s in and out of storage.

mod error;
mod store;

pub use error::{BlobStoreError, BlobStoreResult};
pub use store::{FsJsonStore, JsonStore, MemoryJsonStore};
