//! leaguedesk-core - the headless core of the leaguedesk admin client.
//!
//! This crate owns everything beneath the UI of a mobile administration
//! client for a sports-league backend: typed models, the REST API
//! client, a query cache with optimistic mutations, the forgot-password
//! state machine, session/credential persistence and the search/display
//! helpers list screens share. The UI layer renders whatever data and
//! `Notice`s this crate hands back.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod notice;
pub mod service;
pub mod utils;

use std::io;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use api::{ApiClient, ApiError};
pub use auth::{RecoveryFlow, RecoveryState, Session, StartRoute};
pub use cache::{CacheEntry, FetchError, QueryCache, QueryStatus};
pub use config::Config;
pub use notice::{Notice, NoticeKind};
pub use service::{confirm, AdminService, Confirmed};

/// Initialize the tracing subscriber for logging.
/// Use the RUST_LOG env var to control log level (e.g. RUST_LOG=debug).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}
