use serde::{Deserialize, Serialize};

use super::{Record, Searchable};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl Record for User {
    fn record_id(&self) -> i64 {
        self.id
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }
}

/// Write payload for register-user. The reset fields are blanked on
/// creation; the backend fills them during password recovery.
#[derive(Debug, Clone, Serialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "resetToken")]
    pub reset_token: String,
    #[serde(rename = "resetTokenExpiry")]
    pub reset_token_expiry: String,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            reset_token: String::new(),
            reset_token_expiry: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}
