//! REST API client module for the league administration backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! backend to manage leagues, groups, teams, players, matches and
//! users, plus the login and password-recovery endpoints.
//!
//! Authenticated requests carry the opaque bearer token obtained from
//! the login endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
