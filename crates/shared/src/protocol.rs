use serde::{Deserialize, Serialize};

use crate::domain::UserRecord;

/// Body of `GET /` on the user collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListResponse {
    #[serde(default)]
    pub users: Option<Vec<UserRecord>>,
}

impl UserListResponse {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users: Some(users) }
    }

    /// Records in API order; an absent or `null` sequence is treated as empty.
    pub fn records(&self) -> &[UserRecord] {
        self.users.as_deref().unwrap_or_default()
    }
}

/// Outbound body for create (`POST /`) and update (`PUT /{id}`).
///
/// `password` is write-only: it is never read back from the API and is left
/// out of the JSON entirely when not set, so an update without a password
/// keeps the stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

impl UserDraft {
    /// Field values as typed into a form. Whitespace is trimmed everywhere
    /// except the password; an empty password becomes `None`.
    pub fn from_form(
        username: &str,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Self {
        Self {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: (!password.is_empty()).then(|| password.to_string()),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
        }
    }

    /// Names of required fields that are still empty.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.username.is_empty() {
            missing.push("username");
        }
        if self.email.is_empty() {
            missing.push("email");
        }
        missing
    }
}

/// Create and update replies come back either as the bare record or wrapped
/// under a `user` key depending on the deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MutationResponse {
    Wrapped { user: UserRecord },
    Bare(UserRecord),
}

impl MutationResponse {
    pub fn into_record(self) -> UserRecord {
        match self {
            Self::Wrapped { user } => user,
            Self::Bare(user) => user,
        }
    }
}
