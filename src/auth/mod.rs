//! Authentication module for sessions, credentials and recovery.
//!
//! This module provides:
//! - `Session`: persisted login state (token + logged-in flag)
//! - `CredentialStore`: remembered login credentials via the OS keyring
//! - `RecoveryFlow`: the multi-step forgot-password state machine
//!
//! The session file is read once at startup to pick the initial route.

pub mod credentials;
pub mod recovery;
pub mod session;

pub use credentials::CredentialStore;
pub use recovery::{RecoveryFlow, RecoveryState};
pub use session::{Session, SessionData, StartRoute};
