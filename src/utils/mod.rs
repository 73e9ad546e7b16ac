//! Shared helpers: list filtering/ordering and local input validation.

pub mod filter;
pub mod validate;
