//! User-facing notices. Every mutation resolves into one of these - the
//! UI toasts it and moves on; errors never bubble past this boundary.

use crate::api::ApiError;

/// Fallback shown when the server gave us nothing usable.
pub const GENERIC_FAILURE: &str = "Something went wrong, please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub detail: Option<String>,
}

impl Notice {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            detail: None,
        }
    }

    pub fn success_with(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            detail: Some(detail.into()),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            detail: None,
        }
    }

    pub fn error_with(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            detail: Some(detail.into()),
        }
    }

    /// Error notice carrying the server's message as the detail line.
    pub fn from_api_error(title: impl Into<String>, err: &ApiError) -> Self {
        Self::error_with(title, err.user_message())
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}
