use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

pub const MISSING_ID: &str = "N/A";
pub const MISSING_USERNAME: &str = "Unknown";
pub const MISSING_EMAIL: &str = "No email provided";
pub const MISSING_NAME_PART: &str = "Not specified";

/// Identifier assigned by the remote API. Some deployments hand out numeric
/// ids, others opaque strings, so both are accepted and displayed verbatim.
/// Numbers that do not fit an `i64` are kept as their rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl UserId {
    /// Builds an id from free-form input such as a form field or CLI argument.
    /// Only canonical integers become numbers, so `007` or `+5` go out as typed.
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(number) if number.to_string() == trimmed => Self::Number(number),
            _ => Self::Text(trimmed.to_string()),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }

    /// Two ids refer to the same record when their rendered forms match,
    /// regardless of whether the API sent a number or a string.
    pub fn same_record(&self, other: &UserId) -> bool {
        self.to_string() == other.to_string()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UserIdVisitor)
    }
}

struct UserIdVisitor;

impl<'de> de::Visitor<'de> for UserIdVisitor {
    type Value = UserId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a numeric or string user id")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<UserId, E> {
        Ok(UserId::Number(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<UserId, E> {
        Ok(i64::try_from(value)
            .map(UserId::Number)
            .unwrap_or_else(|_| UserId::Text(value.to_string())))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<UserId, E> {
        Ok(UserId::Text(value.to_string()))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<UserId, E> {
        Ok(UserId::Text(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<UserId, E> {
        Ok(UserId::Text(value))
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One user as returned by the API. Every field is optional because the
/// service is inconsistent about naming (`id` vs `_id`, split names vs a
/// combined `name`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserRecord {
    /// The identifier the API assigned, preferring `id` over `_id`.
    pub fn user_id(&self) -> Option<&UserId> {
        self.id
            .as_ref()
            .filter(|id| !id.is_blank())
            .or_else(|| self.object_id.as_ref().filter(|id| !id.is_blank()))
    }

    fn name_part(&self, index: usize) -> Option<&str> {
        self.name
            .as_deref()
            .and_then(|name| name.split(' ').nth(index))
            .filter(|part| !part.is_empty())
    }

    /// Values usable to prefill an edit form: explicit fields first, then the
    /// combined `name`. Unlike [`normalize`], nothing falls back to a
    /// placeholder string.
    pub fn present_first_name(&self) -> Option<&str> {
        present(&self.first_name).or_else(|| self.name_part(0))
    }

    pub fn present_last_name(&self) -> Option<&str> {
        present(&self.last_name).or_else(|| self.name_part(1))
    }

    /// Whether anything besides the id would show up on a card.
    pub fn has_display_fields(&self) -> bool {
        present(&self.username).is_some()
            || present(&self.email).is_some()
            || self.present_first_name().is_some()
            || self.present_last_name().is_some()
    }
}

/// Fully populated user ready for display. Produced by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Fills every display field, falling back to the documented defaults when
/// the API omitted a value, sent `null`, or sent an empty string.
pub fn normalize(record: &UserRecord) -> DisplayUser {
    DisplayUser {
        id: record
            .user_id()
            .map(ToString::to_string)
            .unwrap_or_else(|| MISSING_ID.to_string()),
        username: present(&record.username)
            .unwrap_or(MISSING_USERNAME)
            .to_string(),
        email: present(&record.email).unwrap_or(MISSING_EMAIL).to_string(),
        first_name: record
            .present_first_name()
            .unwrap_or(MISSING_NAME_PART)
            .to_string(),
        last_name: record
            .present_last_name()
            .unwrap_or(MISSING_NAME_PART)
            .to_string(),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
