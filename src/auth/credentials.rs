use anyhow::{Context, Result};
use keyring::Entry;

/// Keyring service name under which remembered logins are filed.
const SERVICE_NAME: &str = "leaguedesk";

/// "Remember me" storage: the login password for an email, kept in the
/// OS keychain rather than on disk. The session token itself lives in
/// the session file; this only exists to prefill the login form.
pub struct CredentialStore {
    service: String,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}

impl CredentialStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, email: &str) -> Result<Entry> {
        Entry::new(&self.service, email).context("Failed to create keyring entry")
    }

    /// Remember the password for an email address
    pub fn remember(&self, email: &str, password: &str) -> Result<()> {
        self.entry(email)?
            .set_password(password)
            .context("Failed to store password in keychain")
    }

    /// Retrieve the remembered password, if any
    pub fn recall(&self, email: &str) -> Result<String> {
        self.entry(email)?
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Drop the remembered password for an email address
    pub fn forget(&self, email: &str) -> Result<()> {
        self.entry(email)?
            .delete_credential()
            .context("Failed to delete credential from keychain")
    }

    /// Check whether a password is remembered for this email
    pub fn is_remembered(&self, email: &str) -> bool {
        self.entry(email)
            .map(|entry| entry.get_password().is_ok())
            .unwrap_or(false)
    }
}
