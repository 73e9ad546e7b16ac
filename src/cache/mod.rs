//! Client-side query cache.
//!
//! This module provides the `QueryCache` used by every screen to read
//! server-backed collections and to apply optimistic mutations. Values
//! are replaced wholesale per key, never merged field-by-field, so
//! readers always observe a consistent whole value.

pub mod store;

pub use store::{CacheEntry, FetchError, QueryCache, QueryStatus};
