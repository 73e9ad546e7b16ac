//! Forgot-password flow: request a code, verify it, set a new password.
//!
//! The flow is an explicit state machine. Each step carries forward
//! exactly what the next step needs (the email after step 1, email plus
//! verified code after step 2), so the password step is unreachable
//! without a prior successful verification. Failures keep the flow in
//! its current step; only success or an explicit `cancel` leaves it.

use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::notice::Notice;
use crate::utils::validate::{is_valid_email, is_valid_password, MIN_PASSWORD_CHARS};

/// Reset codes are numeric and this long.
pub const CODE_LENGTH: usize = 6;

/// Server-side validity window of a reset code, for the UI to display.
/// Expiry itself is enforced by the backend.
pub const CODE_EXPIRY_HOURS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryState {
    AwaitingEmail,
    AwaitingToken { email: String },
    AwaitingNewPassword { email: String, token: String },
    Completed,
}

pub struct RecoveryFlow {
    api: ApiClient,
    state: RecoveryState,
}

impl RecoveryFlow {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RecoveryState::AwaitingEmail,
        }
    }

    pub fn state(&self) -> &RecoveryState {
        &self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == RecoveryState::Completed
    }

    /// Explicit abandonment: back to the start, dropping carried state.
    pub fn cancel(&mut self) {
        self.state = RecoveryState::AwaitingEmail;
    }

    fn wrong_step() -> Notice {
        Notice::error("Please complete the previous step first.")
    }

    /// Step 1: ask the backend to email a reset code. Malformed input
    /// is rejected locally without a network call.
    pub async fn submit_email(&mut self, email: &str) -> Notice {
        if self.state != RecoveryState::AwaitingEmail {
            return Self::wrong_step();
        }
        if !is_valid_email(email) {
            return Notice::error("Please enter a valid email address.");
        }

        match self.api.forgot_password(email).await {
            Ok(()) => {
                debug!(email, "reset code requested");
                self.state = RecoveryState::AwaitingToken {
                    email: email.to_string(),
                };
                Notice::success("Verification code has been sent to your email.")
            }
            Err(err) => {
                warn!(error = %err, "reset code request failed");
                Notice::from_api_error("Could not send verification code", &err)
            }
        }
    }

    /// Re-send the code without leaving the verification step.
    pub async fn resend_code(&mut self) -> Notice {
        let email = match &self.state {
            RecoveryState::AwaitingToken { email } => email.clone(),
            _ => return Self::wrong_step(),
        };
        match self.api.forgot_password(&email).await {
            Ok(()) => Notice::success("Verification code has been re-sent."),
            Err(err) => Notice::from_api_error("Could not re-send verification code", &err),
        }
    }

    /// Step 2: verify the emailed code. A negative verification stays
    /// put; the code is single-purpose proof required by step 3, not a
    /// standing credential.
    pub async fn submit_code(&mut self, code: &str) -> Notice {
        let email = match &self.state {
            RecoveryState::AwaitingToken { email } => email.clone(),
            _ => return Self::wrong_step(),
        };
        if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Notice::error(format!("Enter the {}-digit code from your email.", CODE_LENGTH));
        }

        match self.api.check_token(&email, code).await {
            Ok(true) => {
                self.state = RecoveryState::AwaitingNewPassword {
                    email,
                    token: code.to_string(),
                };
                Notice::success("Code verified.")
            }
            Ok(false) => Notice::error("Incorrect or expired code."),
            Err(err) => {
                warn!(error = %err, "code verification failed");
                Notice::from_api_error("Could not verify code", &err)
            }
        }
    }

    /// Step 3: set the new password. Local checks run in order and
    /// short-circuit: length first, then confirmation match; neither
    /// failure touches the network. The carried token is not discarded
    /// on failure - whether a failed attempt consumes it is the
    /// server's call.
    pub async fn submit_password(&mut self, new_password: &str, confirm_password: &str) -> Notice {
        let (email, token) = match &self.state {
            RecoveryState::AwaitingNewPassword { email, token } => {
                (email.clone(), token.clone())
            }
            _ => return Self::wrong_step(),
        };
        if !is_valid_password(new_password) {
            return Notice::error(format!(
                "Password must be at least {} characters long.",
                MIN_PASSWORD_CHARS
            ));
        }
        if new_password != confirm_password {
            return Notice::error("Passwords do not match!");
        }

        match self.api.reset_password(&email, &token, new_password).await {
            Ok(true) => {
                self.state = RecoveryState::Completed;
                Notice::success("Password reset successfully")
            }
            Ok(false) => Notice::error("Something went wrong"),
            Err(err) => {
                warn!(error = %err, "password reset failed");
                Notice::error("Failed to reset password. Please try again later.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // An unroutable base URL: these tests only exercise paths that must
    // never reach the network.
    fn offline_flow() -> RecoveryFlow {
        let api = ApiClient::new("http://127.0.0.1:1").expect("client");
        RecoveryFlow::new(api)
    }

    #[tokio::test]
    async fn test_malformed_email_rejected_locally() {
        let mut flow = offline_flow();
        let notice = flow.submit_email("not-an-email").await;
        assert!(notice.is_error());
        assert_eq!(*flow.state(), RecoveryState::AwaitingEmail);
    }

    #[tokio::test]
    async fn test_code_step_unreachable_without_email() {
        let mut flow = offline_flow();
        let notice = flow.submit_code("123456").await;
        assert!(notice.is_error());
        assert_eq!(*flow.state(), RecoveryState::AwaitingEmail);
    }

    #[tokio::test]
    async fn test_password_step_unreachable_without_verification() {
        let mut flow = offline_flow();
        let notice = flow.submit_password("longenough1", "longenough1").await;
        assert!(notice.is_error());
        assert_eq!(*flow.state(), RecoveryState::AwaitingEmail);
    }

    #[tokio::test]
    async fn test_cancel_resets_carried_state() {
        let mut flow = offline_flow();
        flow.state = RecoveryState::AwaitingNewPassword {
            email: "a@b.com".into(),
            token: "123456".into(),
        };
        flow.cancel();
        assert_eq!(*flow.state(), RecoveryState::AwaitingEmail);
    }

    #[tokio::test]
    async fn test_short_password_blocked_before_mismatch_check() {
        let mut flow = offline_flow();
        flow.state = RecoveryState::AwaitingNewPassword {
            email: "a@b.com".into(),
            token: "123456".into(),
        };
        // Both checks would fail; length must win because checks
        // short-circuit in order.
        let notice = flow.submit_password("short", "different").await;
        assert!(notice.title.contains("at least 8 characters"));
    }

    #[tokio::test]
    async fn test_non_numeric_code_rejected_locally() {
        let mut flow = offline_flow();
        flow.state = RecoveryState::AwaitingToken {
            email: "a@b.com".into(),
        };
        let notice = flow.submit_code("abc123").await;
        assert!(notice.is_error());
        assert!(matches!(
            flow.state(),
            RecoveryState::AwaitingToken { .. }
        ));
    }
}
